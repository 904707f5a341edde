use crate::job_progress::percent;
use crate::jobs::attach_results;
use crate::{EngineContext, JobOutcome, JobProgress, JobState, Result as EngineErrorResult};

use cm_archive::ArchiveReader;
use cm_core::{
    ArchiveDetail, DependencyKey, IdentityMap, IdentityMapping, ImportDescriptor, ImportLogEntry,
    ImportLogStatus, ImportPackage, InstallAction, InstallOutcome, ObjectModelError,
    PolicySettings, TransactionLogEntry, TransactionStatus, ValidationResults,
};
use cm_db::{IdMapRepository, ImportLogRepository, SettingsRepository, ValidationResultsRepository};

use chrono::Utc;
use log::{error, info, warn};
use serde::Serialize;
use tokio::sync::OwnedMutexGuard;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageReport {
    pub root: DependencyKey,
    pub name: String,
    pub status: ImportLogStatus,
    pub installed: usize,
    pub skipped: usize,
    pub message: Option<String>,
}

impl PackageReport {
    fn new(package: &ImportPackage) -> Self {
        Self {
            root: package.root.clone(),
            name: package.name.clone(),
            status: ImportLogStatus::Running,
            installed: 0,
            skipped: 0,
            message: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// Id of the import log run, the `archiveLogId` clients query
    pub run_id: String,
    pub archive_ref: String,
    pub packages: Vec<PackageReport>,
}

/// Install the packages of one archive into the target.
///
/// Holds the publisher lock from construction until [`ImportJob::run`]
/// returns.
pub struct ImportJob {
    ctx: EngineContext,
    archive_ref: String,
    run_id: String,
    _publisher: OwnedMutexGuard<()>,
}

impl ImportJob {
    /// Fails with `PublisherLockUnavailable` while another import runs.
    #[track_caller]
    pub fn new(ctx: EngineContext, archive_ref: impl Into<String>) -> EngineErrorResult<Self> {
        let publisher = ctx.publisher_lock.try_acquire()?;
        Ok(Self {
            ctx,
            archive_ref: archive_ref.into(),
            run_id: Uuid::new_v4().to_string(),
            _publisher: publisher,
        })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub async fn run(
        self,
        progress: &JobProgress,
        cancel: &CancellationToken,
    ) -> EngineErrorResult<JobOutcome> {
        progress.set_state(JobState::Installing);
        let result = self.install(progress, cancel).await;

        if let Err(e) = self.ctx.model.flush_caches().await {
            warn!("Failed to flush object model caches after import {}: {e}", self.run_id);
        }

        // Releases the publisher lock.
        drop(self);
        result
    }

    async fn install(
        &self,
        progress: &JobProgress,
        cancel: &CancellationToken,
    ) -> EngineErrorResult<JobOutcome> {
        let mut reader = ArchiveReader::open(&self.ctx.archive_dir, &self.archive_ref)?;
        let archive_ref = reader.archive_ref().to_string();
        let info = reader.info().clone();

        let id_maps = IdMapRepository::new(self.ctx.pool.clone());
        let mut id_map = if info.repository_id == self.ctx.identity.repository_id {
            None
        } else {
            Some(id_maps.get_id_map(&info.source_server).await?)
        };

        let mut descriptor = ImportDescriptor::from_summary(&reader.summary());
        let stored = ValidationResultsRepository::new(self.ctx.pool.clone())
            .find(&archive_ref)
            .await?;
        attach_results(&mut descriptor, stored);

        let policy = SettingsRepository::new(self.ctx.pool.clone())
            .get_policy()
            .await?;
        let log = ImportLogRepository::new(self.ctx.pool.clone());

        let mut report = ImportReport {
            run_id: self.run_id.clone(),
            archive_ref: archive_ref.clone(),
            packages: Vec::with_capacity(descriptor.packages.len()),
        };
        let total = descriptor.packages.len();
        let mut cancelled = false;

        for (index, package) in descriptor.packages.iter().enumerate() {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            progress.report(percent(index, total), format!("installing {}", package.name));
            let package_report = match self
                .install_package(&mut reader, &archive_ref, package, &mut id_map, &policy, &log)
                .await
            {
                Ok(package_report) => package_report,
                Err(e) => {
                    // Mappings of objects already installed must survive the failure.
                    if let Some(map) = &id_map {
                        if let Err(save_error) = id_maps.save_id_map(map).await {
                            error!(
                                "Failed to save identity map for {} after import error: {save_error}",
                                map.source_server
                            );
                        }
                    }
                    return Err(e);
                }
            };
            self.ctx.metrics.objects_installed(package_report.installed);
            report.packages.push(package_report);
            progress.report(percent(index + 1, total), format!("installed {}", package.name));
        }

        if let Some(map) = &id_map {
            id_maps.save_id_map(map).await?;
        }

        info!(
            "Import {} of {archive_ref}: {} packages processed{}",
            self.run_id,
            report.packages.len(),
            if cancelled { " (cancelled)" } else { "" }
        );

        let result = serde_json::to_value(&report).unwrap_or_default();
        Ok(if cancelled {
            JobOutcome::cancelled(result)
        } else {
            JobOutcome::completed(result)
        })
    }

    async fn install_package(
        &self,
        reader: &mut ArchiveReader,
        archive_ref: &str,
        package: &ImportPackage,
        id_map: &mut Option<IdentityMap>,
        policy: &PolicySettings,
        log: &ImportLogRepository,
    ) -> EngineErrorResult<PackageReport> {
        let mut report = PackageReport::new(package);
        let entry = ImportLogEntry {
            id: Uuid::new_v4().to_string(),
            run_id: self.run_id.clone(),
            archive_ref: archive_ref.to_string(),
            package_key: package.root.clone(),
            status: ImportLogStatus::Running,
            message: None,
            started_at: Utc::now(),
            finished_at: None,
        };
        log.create_entry(&entry).await?;

        if package
            .results
            .as_ref()
            .is_some_and(ValidationResults::has_failures)
        {
            let message = "validation failed";
            log.finish_entry(&entry.id, ImportLogStatus::Aborted, Some(message))
                .await?;
            info!("Package {} aborted: {message}", package.root);
            report.status = ImportLogStatus::Aborted;
            report.message = Some(message.to_string());
            return Ok(report);
        }

        let details: Vec<ArchiveDetail> = reader
            .package_details(&package.root)
            .into_iter()
            .cloned()
            .collect();

        for detail in &details {
            let payload = match reader.read_object(detail) {
                Ok(payload) => payload,
                Err(e) => {
                    record_failure(log, &entry.id, detail, &e.to_string()).await;
                    return Err(e.into());
                }
            };

            match self
                .ctx
                .model
                .install(detail, &payload, id_map.as_ref(), policy)
                .await
            {
                Ok(outcome) => {
                    let status = if outcome.action == InstallAction::Skipped {
                        report.skipped += 1;
                        TransactionStatus::Skipped
                    } else {
                        report.installed += 1;
                        TransactionStatus::Installed
                    };
                    log.record_transaction(&transaction(&entry.id, detail, status, None))
                        .await?;
                    if let Some(map) = id_map.as_mut() {
                        record_mapping(map, detail, &outcome);
                    }
                }
                Err(e @ ObjectModelError::Storage { .. }) => {
                    record_failure(log, &entry.id, detail, &e.to_string()).await;
                    return Err(e.into());
                }
                Err(e) => {
                    let message = format!("{}: {e}", detail.key);
                    log.record_transaction(&transaction(
                        &entry.id,
                        detail,
                        TransactionStatus::Failed,
                        Some(e.to_string()),
                    ))
                    .await?;
                    log.finish_entry(&entry.id, ImportLogStatus::Aborted, Some(&message))
                        .await?;
                    warn!("Package {} aborted: {message}", package.root);
                    report.status = ImportLogStatus::Aborted;
                    report.message = Some(message);
                    return Ok(report);
                }
            }
        }

        log.finish_entry(&entry.id, ImportLogStatus::Completed, None)
            .await?;
        report.status = ImportLogStatus::Completed;
        Ok(report)
    }
}

fn transaction(
    entry_id: &str,
    detail: &ArchiveDetail,
    status: TransactionStatus,
    message: Option<String>,
) -> TransactionLogEntry {
    TransactionLogEntry {
        entry_id: entry_id.to_string(),
        object_key: detail.key.clone(),
        status,
        message,
        recorded_at: Utc::now(),
    }
}

/// Log the object in flight as failed and close its entry, ignoring errors.
async fn record_failure(log: &ImportLogRepository, entry_id: &str, detail: &ArchiveDetail, message: &str) {
    let failed = transaction(
        entry_id,
        detail,
        TransactionStatus::Failed,
        Some(message.to_string()),
    );
    if let Err(e) = log.record_transaction(&failed).await {
        error!("Failed to record failed transaction for {}: {e}", detail.key);
    }
    if let Err(e) = log
        .finish_entry(entry_id, ImportLogStatus::Aborted, Some(message))
        .await
    {
        error!("Failed to close import log entry {entry_id}: {e}");
    }
}

/// Remember where an installed object landed on the target.
fn record_mapping(map: &mut IdentityMap, detail: &ArchiveDetail, outcome: &InstallOutcome) {
    if outcome.action == InstallAction::Skipped {
        return;
    }

    if map.get(&detail.key).is_some() {
        map.resolve(&detail.key, outcome.target_id.clone());
        return;
    }

    let mapping = if outcome.action == InstallAction::Created {
        IdentityMapping {
            target_id: Some(outcome.target_id.clone()),
            ..IdentityMapping::new_object(&detail.object_type, &detail.id, &detail.name)
        }
    } else {
        IdentityMapping::existing(
            &detail.object_type,
            &detail.id,
            &detail.name,
            &outcome.target_id,
        )
    };
    map.insert(mapping);
}
