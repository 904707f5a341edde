use crate::job_progress::percent;
use crate::resolver::{add_missing_dependencies, resolution_error};
use crate::{
    EngineContext, EngineError, JobOutcome, JobProgress, JobState, Result as EngineErrorResult,
};

use cm_archive::ArchiveWriter;
use cm_core::{
    ARCHIVE_FORMAT_VERSION, ArchiveInfo, Dependency, DependencyKey, DependencyKind, DependencyRef,
    ErrorLocation, ExportDescriptor, TreeContext,
};
use cm_db::ExportDescriptorRepository;

use std::panic::Location;

use chrono::Utc;
use log::{debug, info};
use tokio_util::sync::CancellationToken;

/// Export every package of a named descriptor into one archive.
pub struct ExportJob {
    ctx: EngineContext,
    descriptor_name: String,
    user: String,
}

impl ExportJob {
    pub fn new(
        ctx: EngineContext,
        descriptor_name: impl Into<String>,
        user: impl Into<String>,
    ) -> Self {
        Self {
            ctx,
            descriptor_name: descriptor_name.into(),
            user: user.into(),
        }
    }

    pub async fn run(
        self,
        progress: &JobProgress,
        cancel: &CancellationToken,
    ) -> EngineErrorResult<JobOutcome> {
        progress.set_state(JobState::Init);
        let descriptor = self.load_descriptor().await?;

        progress.set_state(JobState::Resolving);
        let Some((roots, tree)) = self.resolve(&descriptor, cancel).await? else {
            info!("Export of '{}' cancelled while resolving", descriptor.name);
            return Ok(JobOutcome::cancelled(serde_json::json!({
                "descriptorName": descriptor.name,
                "complete": false,
            })));
        };

        progress.set_state(JobState::Packaging);
        self.package(&descriptor, &roots, &tree, progress, cancel)
            .await
    }

    async fn load_descriptor(&self) -> EngineErrorResult<ExportDescriptor> {
        let descriptor = ExportDescriptorRepository::new(self.ctx.pool.clone())
            .find_by_name(&self.descriptor_name)
            .await?
            .ok_or_else(|| EngineError::DescriptorNotFound {
                name: self.descriptor_name.clone(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        descriptor
            .validate()
            .map_err(|source| EngineError::InvalidDescriptor {
                source,
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(descriptor)
    }

    /// Seed every root, then resolve across the whole descriptor so objects
    /// shared between packages are included once.
    ///
    /// Returns `None` when cancelled.
    async fn resolve(
        &self,
        descriptor: &ExportDescriptor,
        cancel: &CancellationToken,
    ) -> EngineErrorResult<Option<(Vec<Dependency>, TreeContext)>> {
        let model = self.ctx.model.as_ref();
        let mut tree = TreeContext::with_exclusions(descriptor.exclusions.iter().cloned());
        let mut roots = Vec::with_capacity(descriptor.packages.len());

        for reference in &descriptor.packages {
            let mut root = model
                .lookup(reference)
                .await
                .map_err(|e| resolution_error(&reference.key(), e))?;
            root.kind = DependencyKind::DeployableElement;

            if !tree.add_package(&root.key()) {
                debug!("Package {} listed twice in '{}'", root.key(), descriptor.name);
                continue;
            }
            let ancestors = model
                .ancestors(&root)
                .await
                .map_err(|e| resolution_error(&root.key(), e))?;
            tree.add_ancestors(&root.key(), &ancestors);
            roots.push(root);
        }

        for root in &roots {
            match add_missing_dependencies(root, &mut tree, model, cancel).await {
                Ok(added) => debug!("Resolved {}: {added} dependencies", root.key()),
                Err(EngineError::Cancelled { .. }) => return Ok(None),
                Err(e) => return Err(e),
            }
        }

        Ok(Some((roots, tree)))
    }

    async fn package(
        &self,
        descriptor: &ExportDescriptor,
        roots: &[Dependency],
        tree: &TreeContext,
        progress: &JobProgress,
        cancel: &CancellationToken,
    ) -> EngineErrorResult<JobOutcome> {
        let model = self.ctx.model.as_ref();
        // Dropping the writer on an early return removes the temp file.
        let mut writer = ArchiveWriter::create(&self.ctx.archive_dir, &descriptor.name)?;
        let mut complete = true;

        for (index, root) in roots.iter().enumerate() {
            if cancel.is_cancelled() {
                info!(
                    "Export of '{}' cancelled after {index} of {} packages",
                    descriptor.name,
                    roots.len()
                );
                complete = false;
                break;
            }

            progress.report(
                percent(index, roots.len()),
                format!("processing {}", root.name),
            );

            let root_key = root.key();
            writer.begin_package(&root_key, &root.name);

            for key in tree.package_post_order(&root_key) {
                if writer.contains(&key) {
                    continue;
                }
                let dependency = if key == root_key {
                    root.clone()
                } else {
                    model
                        .lookup(&DependencyRef::from(&key))
                        .await
                        .map_err(|e| resolution_error(&key, e))?
                };
                let payload = model.serialize(&dependency).await?;
                writer.add_object(&dependency, &root_key, ancestors_of(tree, &key), &payload)?;
            }

            progress.report(
                percent(index + 1, roots.len()),
                format!("processing {}", root.name),
            );
        }

        let info = ArchiveInfo {
            source_server: self.ctx.identity.server_address.clone(),
            created_by: self.user.clone(),
            created_at: Utc::now(),
            format_version: ARCHIVE_FORMAT_VERSION,
            server_version: self.ctx.identity.server_version.clone(),
            server_build: self.ctx.identity.server_build.clone(),
            repository_id: self.ctx.identity.repository_id.clone(),
            descriptor_name: descriptor.name.clone(),
            complete,
        };
        let summary = writer.finish(&info)?;
        self.ctx.metrics.objects_exported(summary.object_count);

        info!(
            "Exported '{}' to {}: {} packages, {} objects{}",
            descriptor.name,
            summary.archive_ref,
            summary.packages.len(),
            summary.object_count,
            if complete { "" } else { " (incomplete)" }
        );

        let result = serde_json::to_value(&summary).unwrap_or_default();
        Ok(if complete {
            JobOutcome::completed(result)
        } else {
            JobOutcome::cancelled(result)
        })
    }
}

fn ancestors_of(tree: &TreeContext, key: &DependencyKey) -> Vec<DependencyRef> {
    tree.entry(key)
        .map(|entry| entry.ancestors.iter().map(DependencyRef::from).collect())
        .unwrap_or_default()
}
