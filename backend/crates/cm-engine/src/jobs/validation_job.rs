use crate::job_progress::percent;
use crate::jobs::attach_results;
use crate::{EngineContext, JobOutcome, JobProgress, JobState, Result as EngineErrorResult};

use cm_archive::ArchiveReader;
use cm_core::{
    ArchiveDetail, DependencyRef, IdentityMap, ImportDescriptor, ObjectModelError, TreeContext,
    ValidationContext, ValidationResult, ValidationResults,
};
use cm_db::{IdMapRepository, ValidationResultsRepository};

use log::{debug, info};
use serde_json::json;
use tokio_util::sync::CancellationToken;

/// Check every package of an archive against the target before import.
pub struct ValidationJob {
    ctx: EngineContext,
    archive_ref: String,
}

impl ValidationJob {
    pub fn new(ctx: EngineContext, archive_ref: impl Into<String>) -> Self {
        Self {
            ctx,
            archive_ref: archive_ref.into(),
        }
    }

    pub async fn run(
        self,
        progress: &JobProgress,
        cancel: &CancellationToken,
    ) -> EngineErrorResult<JobOutcome> {
        progress.set_state(JobState::Init);
        let reader = ArchiveReader::open(&self.ctx.archive_dir, &self.archive_ref)?;
        let archive_ref = reader.archive_ref().to_string();

        let results_repo = ValidationResultsRepository::new(self.ctx.pool.clone());
        let mut descriptor = ImportDescriptor::from_summary(&reader.summary());
        attach_results(&mut descriptor, results_repo.find(&archive_ref).await?);
        let mut validation = ValidationContext::from_descriptor(&descriptor);

        let mut tree = TreeContext::new();
        for detail in reader.details() {
            tree.insert_included(detail.key.clone(), detail.package.clone());
            tree.add_ancestors(&detail.key, &detail.ancestors);
        }

        let same_repository = reader.info().repository_id == self.ctx.identity.repository_id;
        let mut id_map: Option<IdentityMap> = None;

        progress.set_state(JobState::Validating);
        let total = descriptor.packages.len();
        let mut cancelled = false;

        for (index, package) in descriptor.packages.iter().enumerate() {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            if validation.already_validated(&package.root) {
                debug!("{} already validated, skipping", package.root);
                continue;
            }

            progress.report(percent(index, total), format!("validating {}", package.name));

            if !same_repository && id_map.is_none() {
                id_map = Some(
                    IdMapRepository::new(self.ctx.pool.clone())
                        .get_id_map(&reader.info().source_server)
                        .await?,
                );
            }

            let mut results = ValidationResults::new(package.root.clone());
            for detail in reader.package_details(&package.root) {
                if validation.is_dependency_validated(&detail.key) {
                    if let Some(prior) = validation.dependency_result(&detail.key) {
                        debug!("{} already validated, reusing result", detail.key);
                        results.insert(prior.clone());
                        continue;
                    }
                }
                let result = self
                    .validate_object(detail, &tree, id_map.as_ref(), &mut validation)
                    .await?;
                validation.mark_validated(detail.key.clone());
                results.insert(result);
            }

            debug!("{} validated: {:?}", package.root, results.status());
            validation.store_results(results);
            progress.report(percent(index + 1, total), format!("validated {}", package.name));
        }

        validation.apply_to(&mut descriptor);
        let all_results: Vec<ValidationResults> = descriptor
            .packages
            .iter()
            .filter_map(|package| package.results.clone())
            .collect();
        results_repo.save(&archive_ref, &all_results).await?;

        info!(
            "Validated {archive_ref}: {} of {} packages have results",
            all_results.len(),
            total
        );

        let result = json!({
            "descriptor": descriptor,
            "absentAncestors": validation.absent_ancestors(),
        });
        Ok(if cancelled {
            JobOutcome::cancelled(result)
        } else {
            JobOutcome::completed(result)
        })
    }

    async fn validate_object(
        &self,
        detail: &ArchiveDetail,
        tree: &TreeContext,
        id_map: Option<&IdentityMap>,
        validation: &mut ValidationContext,
    ) -> EngineErrorResult<ValidationResult> {
        let model = self.ctx.model.as_ref();
        let mut result = ValidationResult::pass(detail.key.clone());

        let mapped_target = id_map.and_then(|map| map.target_id(&detail.key));
        match model.validate(detail, mapped_target).await {
            Ok(outcome) => {
                for warning in outcome.warnings {
                    result.add_warning(warning);
                }
                for failure in outcome.failures {
                    result.add_failure(failure);
                }
            }
            Err(ObjectModelError::Incompatible { message, .. }) => result.add_failure(message),
            Err(e) => return Err(e.into()),
        }

        for ancestor in tree.missing_ancestors(&detail.key) {
            let reference = DependencyRef::from(&ancestor);
            let on_target = model.exists_on_target(&reference, id_map).await?;
            validation.record_absent_ancestor(detail.key.clone(), ancestor.clone());
            result.add_absent_ancestor(ancestor, on_target);
        }

        Ok(result)
    }
}
