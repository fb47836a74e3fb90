use crate::core::filter::UnitFilter;
use crate::core::journal::{is_journal_file, journal_key, order_sources, parse_workbook};
use crate::core::report::{default_report_filename, render};
use crate::core::{ConfigProvider, EntryKind, Journal, Pipeline, Storage, TransformResult};
use crate::domain::model::JournalSource;
use crate::utils::error::{AggError, Result};
use std::path::Path;

pub struct UnitAggregationPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> UnitAggregationPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    /// Finds the journals the input path refers to, in report order.
    pub async fn plan(&self) -> Result<Vec<JournalSource>> {
        let input = self.config.input_path();
        let invalid = || AggError::InvalidInputPath {
            path: input.to_string(),
        };

        let sources = match self.storage.entry_kind(input).await? {
            EntryKind::Directory => self
                .storage
                .list_files(input)
                .await?
                .into_iter()
                .filter(|name| is_journal_file(name))
                .map(|name| JournalSource {
                    key: journal_key(&name),
                    path: Path::new(input).join(&name).to_string_lossy().into_owned(),
                    file_name: name,
                })
                .collect::<Vec<_>>(),
            EntryKind::File => {
                let file_name = Path::new(input)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .ok_or_else(invalid)?;
                if !is_journal_file(&file_name) {
                    return Err(invalid());
                }
                vec![JournalSource {
                    key: journal_key(&file_name),
                    file_name,
                    path: input.to_string(),
                }]
            }
            EntryKind::Missing => return Err(invalid()),
        };

        if sources.is_empty() {
            return Err(AggError::NoJournalsFound {
                path: input.to_string(),
            });
        }

        Ok(order_sources(sources))
    }

    fn report_filename(&self) -> String {
        match self.config.report_filename() {
            Some(name) => name.to_string(),
            None => default_report_filename(
                chrono::Local::now().date_naive(),
                self.config.output_format(),
            ),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for UnitAggregationPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Journal>> {
        let sources = self.plan().await?;
        let mut journals = Vec::with_capacity(sources.len());

        for source in sources {
            tracing::debug!("Reading journal '{}' from {}", source.key, source.path);
            let bytes = self.storage.read_file(&source.path).await?;
            let table = parse_workbook(bytes, &source.file_name)?;
            tracing::info!(
                "📄 Imported '{}' ({} rows)",
                source.file_name,
                table.rows.len()
            );
            journals.push(Journal {
                key: source.key,
                file_name: source.file_name,
                table,
            });
        }

        Ok(journals)
    }

    async fn transform(&self, journals: Vec<Journal>) -> Result<TransformResult> {
        let filter = UnitFilter::from_config(&self.config)?;
        let mut sheets = Vec::with_capacity(journals.len());
        let mut skipped_amounts = 0;

        for journal in &journals {
            let (sheet, skipped) = filter.apply(journal)?;
            tracing::debug!(
                "'{}': {} units, total {:.2}",
                sheet.key,
                sheet.entries.len(),
                sheet.total()
            );
            skipped_amounts += skipped;
            sheets.push(sheet);
        }

        if skipped_amounts > 0 {
            tracing::warn!("⚠️ Skipped {} rows with invalid amounts", skipped_amounts);
        }

        Ok(TransformResult {
            sheets,
            skipped_amounts,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let filename = self.report_filename();
        let output_path = Path::new(self.config.output_path())
            .join(&filename)
            .to_string_lossy()
            .into_owned();

        let data = render(
            &result.sheets,
            self.config.output_format(),
            self.config.include_summary(),
        )?;

        tracing::debug!("Writing report ({} bytes) to {}", data.len(), output_path);
        self.storage.write_file(&output_path, &data).await?;

        Ok(output_path)
    }
}
