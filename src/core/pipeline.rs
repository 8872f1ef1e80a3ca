use crate::core::{ConfigProvider, MatchInputs, Pipeline, ProgressSink, Storage};
use crate::domain::model::Report;
use crate::io;
use crate::matching::run_matching;
use crate::utils::error::{MatchError, Result};
use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};

const REPORT_SHEET: &str = "Resultado";

/// Logs progress at debug level every ten percent.
#[derive(Default)]
struct TracingProgress {
    last_logged: AtomicU8,
}

impl ProgressSink for TracingProgress {
    fn on_progress(&self, percent: u8) {
        let step = percent / 10 * 10;
        if step > 0 && self.last_logged.fetch_max(step, Ordering::Relaxed) < step {
            tracing::debug!("🔎 Matching progress: {}%", step);
        }
    }
}

pub struct MatchPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> MatchPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    async fn read_input(&self, path: &str) -> Result<crate::domain::model::Table> {
        tracing::debug!("Reading table from: {}", path);
        let bytes = self.storage.read_file(path).await?;
        io::read_table(bytes, path)
    }

    fn render(report: &Report, format: &str) -> Result<Vec<u8>> {
        match format {
            "xlsx" => io::xlsx::write_table(&report.to_table(), REPORT_SHEET),
            "csv" => io::csv::write_table(&report.to_table()),
            "json" => Ok(serde_json::to_vec_pretty(&report.rows)?),
            other => Err(MatchError::InvalidConfigValueError {
                field: "output.formats".to_string(),
                value: other.to_string(),
                reason: "supported formats are xlsx, csv and json".to_string(),
            }),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for MatchPipeline<S, C> {
    async fn extract(&self) -> Result<MatchInputs> {
        let contacts = self.read_input(self.config.contacts_path()).await?;
        let roster = self.read_input(self.config.roster_path()).await?;

        tracing::debug!(
            "Loaded {} contacts and {} roster rows",
            contacts.len(),
            roster.len()
        );

        Ok(MatchInputs { contacts, roster })
    }

    async fn transform(&self, inputs: MatchInputs) -> Result<Report> {
        let options = self.config.match_options();
        tracing::debug!(
            "Matching with mode={}, order={:?}, parallel={}",
            options.mode.as_str(),
            options.order,
            options.parallel
        );

        // 比對為 CPU 密集工作，移出 async runtime
        let report = tokio::task::spawn_blocking(move || {
            let progress = TracingProgress::default();
            run_matching(&inputs.contacts, &inputs.roster, &options, &progress)
        })
        .await
        .map_err(|e| MatchError::ProcessingError {
            message: format!("matching task failed: {}", e),
        })??;

        Ok(report)
    }

    async fn load(&self, report: Report) -> Result<String> {
        let mut primary = None;

        for format in self.config.output_formats() {
            let bytes = Self::render(&report, format)?;
            let file_name = format!("{}.{}", self.config.output_filename(), format);
            let path = Path::new(self.config.output_path())
                .join(&file_name)
                .to_string_lossy()
                .into_owned();

            self.storage.write_file(&path, &bytes).await?;
            tracing::debug!("Wrote {} report ({} bytes) to {}", format, bytes.len(), path);

            primary.get_or_insert(path);
        }

        primary.ok_or_else(|| MatchError::MissingConfigError {
            field: "output.formats".to_string(),
        })
    }
}
