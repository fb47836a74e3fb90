use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Runs import, unit filtering and report writing. Returns the report path.
    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting unit aggregation");

        tracing::info!("Importing sales journals...");
        let journals = self.pipeline.extract().await?;
        tracing::info!("Imported {} journals", journals.len());
        self.monitor.log_stats("Extract");

        tracing::info!("Aggregating units...");
        let result = self.pipeline.transform(journals).await?;
        let units: usize = result.sheets.iter().map(|s| s.entries.len()).sum();
        tracing::info!(
            "Aggregated {} units across {} months",
            units,
            result.sheets.len()
        );
        self.monitor.log_stats("Transform");

        tracing::info!("Writing report...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Report written to {}", output_path);
        self.monitor.log_stats("Load");

        self.monitor.log_final_stats();
        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Journal, TransformResult};
    use crate::domain::model::{SheetOutcome, Table, UnitSheet};
    use crate::utils::error::AggError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubPipeline {
        calls: AtomicUsize,
        fail_transform: bool,
    }

    #[async_trait::async_trait]
    impl Pipeline for StubPipeline {
        async fn extract(&self) -> Result<Vec<Journal>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![Journal {
                key: "March 2024".to_string(),
                file_name: "Sales Journal for March 2024.xlsx".to_string(),
                table: Table::default(),
            }])
        }

        async fn transform(&self, journals: Vec<Journal>) -> Result<TransformResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_transform {
                return Err(AggError::ProcessingError {
                    message: "boom".to_string(),
                });
            }
            Ok(TransformResult {
                sheets: journals
                    .into_iter()
                    .map(|j| UnitSheet {
                        key: j.key,
                        unit_header: "0".to_string(),
                        amount_header: "1".to_string(),
                        entries: vec![],
                        total_label: "Total Rent".to_string(),
                        empty_message: "no units containing G, H, or I".to_string(),
                        outcome: SheetOutcome::NoUnits,
                    })
                    .collect(),
                skipped_amounts: 0,
            })
        }

        async fn load(&self, result: TransformResult) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("out/{}.xlsx", result.sheets[0].key))
        }
    }

    #[tokio::test]
    async fn test_run_executes_all_phases() {
        let engine = EtlEngine::new(StubPipeline {
            calls: AtomicUsize::new(0),
            fail_transform: false,
        });

        let output = engine.run().await.unwrap();

        assert_eq!(output, "out/March 2024.xlsx");
        assert_eq!(engine.pipeline.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_run_stops_on_failed_phase() {
        let engine = EtlEngine::new_with_monitoring(
            StubPipeline {
                calls: AtomicUsize::new(0),
                fail_transform: true,
            },
            true,
        );

        assert!(engine.run().await.is_err());
        assert_eq!(engine.pipeline.calls.load(Ordering::SeqCst), 2);
    }
}
