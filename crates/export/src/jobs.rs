//! Background export jobs.
//!
//! Each export runs as a detached tokio task that derives its content and
//! writes the artifact to the configured output directory. Submission is
//! fire-and-forget: the job id is returned immediately, status lives in a
//! shared registry, and failures are recorded and logged, never retried.

use crate::csv::{export_filename, full_report_csv, metrics_csv};
use crate::report::build_report;
use chrono::Utc;
use ctv_core::config::{DerivationConfig, ExportConfig};
use ctv_core::types::{AttributionMode, CampaignRecord};
use ctv_derivation::snapshot::snapshot;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// Sectioned full-campaign CSV.
    FullCsv,
    /// Compact key/value metrics CSV.
    MetricsCsv,
    /// Plain-text rendering of the multi-page report.
    Report,
}

impl ExportKind {
    fn filename_prefix(self) -> &'static str {
        match self {
            ExportKind::FullCsv => "CTV_Attribution",
            ExportKind::MetricsCsv => "CTV_Metrics",
            ExportKind::Report => "CTV_Report",
        }
    }

    fn extension(self) -> &'static str {
        match self {
            ExportKind::FullCsv | ExportKind::MetricsCsv => "csv",
            ExportKind::Report => "txt",
        }
    }
}

#[derive(Debug, Clone)]
pub enum ExportStatus {
    Pending,
    Completed { path: PathBuf },
    Failed { error: String },
}

/// Registry and spawner for export jobs.
#[derive(Clone)]
pub struct ExportManager {
    jobs: Arc<DashMap<Uuid, ExportStatus>>,
    output_dir: PathBuf,
    derivation: DerivationConfig,
}

impl ExportManager {
    pub fn new(export: &ExportConfig, derivation: DerivationConfig) -> Self {
        Self {
            jobs: Arc::new(DashMap::new()),
            output_dir: PathBuf::from(&export.output_dir),
            derivation,
        }
    }

    /// Spawn an export job and return its id without waiting for the write.
    pub fn submit(
        &self,
        kind: ExportKind,
        record: CampaignRecord,
        mode: AttributionMode,
        threshold_percent: u8,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.jobs.insert(id, ExportStatus::Pending);

        let jobs = Arc::clone(&self.jobs);
        let output_dir = self.output_dir.clone();
        let derivation = self.derivation.clone();
        tokio::spawn(async move {
            let status =
                run_export(kind, &record, mode, threshold_percent, &derivation, &output_dir).await;
            match &status {
                ExportStatus::Completed { path } => {
                    info!(job_id = %id, campaign = %record.id, path = %path.display(), "export completed");
                }
                ExportStatus::Failed { error } => {
                    error!(job_id = %id, campaign = %record.id, error, "export failed");
                }
                ExportStatus::Pending => {}
            }
            jobs.insert(id, status);
        });

        id
    }

    pub fn status(&self, id: Uuid) -> Option<ExportStatus> {
        self.jobs.get(&id).map(|entry| entry.clone())
    }

    /// Poll until the job leaves the pending state. `None` for unknown ids.
    pub async fn wait(&self, id: Uuid) -> Option<ExportStatus> {
        loop {
            match self.status(id) {
                Some(ExportStatus::Pending) => {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                }
                other => return other,
            }
        }
    }
}

async fn run_export(
    kind: ExportKind,
    record: &CampaignRecord,
    mode: AttributionMode,
    threshold_percent: u8,
    derivation: &DerivationConfig,
    output_dir: &Path,
) -> ExportStatus {
    let generated = Utc::now();
    let content = match kind {
        ExportKind::FullCsv => full_report_csv(record, mode, generated),
        ExportKind::MetricsCsv => {
            let snap = snapshot(record, mode, threshold_percent, derivation);
            metrics_csv(&snap)
        }
        ExportKind::Report => build_report(record, mode, generated).render_text(),
    };

    let filename = export_filename(
        kind.filename_prefix(),
        &record.name,
        generated.date_naive(),
        kind.extension(),
    );
    let path = output_dir.join(filename);

    let result = async {
        tokio::fs::create_dir_all(output_dir).await?;
        tokio::fs::write(&path, content).await
    }
    .await;

    match result {
        Ok(()) => ExportStatus::Completed { path },
        Err(e) => ExportStatus::Failed {
            error: e.to_string(),
        },
    }
}
