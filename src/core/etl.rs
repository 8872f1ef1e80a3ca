use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::RunMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: RunMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        let monitor = RunMonitor::new(monitor_enabled);
        if monitor_enabled && !monitor.is_enabled() {
            tracing::warn!("⚠️ Monitoring requested but this build has no system monitor");
        }
        Self { pipeline, monitor }
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitor.is_enabled()
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting contact matching...");
        if self.monitoring_enabled() {
            tracing::debug!("Recording memory and timing per phase");
        }

        // Extract
        tracing::info!("📥 Reading contacts and roster...");
        let inputs = self.pipeline.extract().await?;
        tracing::info!(
            "📥 Read {} contacts and {} roster rows",
            inputs.contacts.len(),
            inputs.roster.len()
        );
        self.monitor.record_phase("extract", inputs.contacts.len() + inputs.roster.len());

        // Transform
        tracing::info!("🔎 Matching contacts...");
        let report = self.pipeline.transform(inputs).await?;
        tracing::info!("🔎 Matched {} contacts", report.len());
        self.monitor.record_phase("transform", report.len());

        // Load
        tracing::info!("💾 Writing report...");
        let rows = report.len();
        let output_path = self.pipeline.load(report).await?;
        tracing::info!("💾 Report saved to: {}", output_path);
        self.monitor.record_phase("load", rows);

        self.monitor.log_final_stats();
        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MatchInputs;
    use crate::domain::model::{CellValue, Report, ReportRow, Table};
    use crate::utils::error::MatchError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPipeline {
        calls: Mutex<Vec<&'static str>>,
        fail_transform: bool,
    }

    fn row(cedula: &str) -> ReportRow {
        ReportRow {
            cedula: cedula.to_string(),
            nombre: "Ana".to_string(),
            nombre_egresado: "ANA LOPEZ".to_string(),
            tipo: String::new(),
            telefono1: String::new(),
            telefono2: String::new(),
            telefono: None,
            certeza: 100.0,
            primer_nombre: "Ana".to_string(),
            display_name: "Ana".to_string(),
            overlap: 1,
            similarity: 1.0,
        }
    }

    #[async_trait::async_trait]
    impl Pipeline for RecordingPipeline {
        async fn extract(&self) -> Result<MatchInputs> {
            self.calls.lock().unwrap().push("extract");
            let mut contacts = Table::new(vec!["Nombre".to_string()]);
            contacts.push_row(vec![CellValue::from("Ana")]);
            Ok(MatchInputs {
                contacts,
                roster: Table::default(),
            })
        }

        async fn transform(&self, inputs: MatchInputs) -> Result<Report> {
            self.calls.lock().unwrap().push("transform");
            if self.fail_transform {
                return Err(MatchError::ProcessingError {
                    message: "boom".to_string(),
                });
            }
            Ok(Report {
                rows: (0..inputs.contacts.len()).map(|i| row(&i.to_string())).collect(),
            })
        }

        async fn load(&self, report: Report) -> Result<String> {
            self.calls.lock().unwrap().push("load");
            Ok(format!("out/{}.xlsx", report.len()))
        }
    }

    #[tokio::test]
    async fn test_run_calls_phases_in_order() {
        let engine = EtlEngine::new_with_monitoring(RecordingPipeline::default(), true);
        assert_eq!(engine.monitoring_enabled(), cfg!(feature = "cli"));
        let output = engine.run().await.unwrap();

        assert_eq!(output, "out/1.xlsx");
        assert_eq!(
            *engine.pipeline().calls.lock().unwrap(),
            vec!["extract", "transform", "load"]
        );
    }

    #[tokio::test]
    async fn test_run_stops_on_transform_error() {
        let pipeline = RecordingPipeline {
            fail_transform: true,
            ..Default::default()
        };
        let engine = EtlEngine::new(pipeline);
        assert!(!engine.monitoring_enabled());

        let err = engine.run().await.unwrap_err();
        assert!(matches!(err, MatchError::ProcessingError { .. }));
        assert_eq!(*engine.pipeline().calls.lock().unwrap(), vec!["extract", "transform"]);
    }
}
