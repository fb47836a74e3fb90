pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::domain::model::{InvalidAmountPolicy, OutputFormat};
use crate::utils::error::Result;
use crate::utils::validation::{validate_provider, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const DEFAULT_UNIT_LETTERS: &str = "GHI";
pub const DEFAULT_UNIT_COLUMN: usize = 2;
pub const DEFAULT_AMOUNT_COLUMN: usize = 6;
pub const DEFAULT_TOTAL_LABEL: &str = "Total Rent";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "unit-agg"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Aggregate G/H/I unit rent from monthly sales journals into one report")
)]
pub struct CliConfig {
    /// A 'Sales Journal for <Month> <Year>.xlsx' file or a folder of them
    #[cfg_attr(feature = "cli", arg(short, long))]
    pub input: String,

    /// Folder the report is written to
    #[cfg_attr(feature = "cli", arg(long, default_value = "."))]
    pub output_path: String,

    /// Report file name (defaults to '<today> unit aggregation report.xlsx')
    #[cfg_attr(feature = "cli", arg(long))]
    pub output_file: Option<String>,

    #[cfg_attr(feature = "cli", arg(long, value_enum, default_value_t = OutputFormat::Xlsx))]
    pub format: OutputFormat,

    /// Letters that mark a unit code for aggregation
    #[cfg_attr(feature = "cli", arg(long, default_value = DEFAULT_UNIT_LETTERS))]
    pub unit_letters: String,

    /// 1-based column holding the unit code
    #[cfg_attr(feature = "cli", arg(long, default_value_t = DEFAULT_UNIT_COLUMN))]
    pub unit_column: usize,

    /// 1-based column holding the rent amount
    #[cfg_attr(feature = "cli", arg(long, default_value_t = DEFAULT_AMOUNT_COLUMN))]
    pub amount_column: usize,

    #[cfg_attr(feature = "cli", arg(long, default_value = DEFAULT_TOTAL_LABEL))]
    pub total_label: String,

    #[cfg_attr(
        feature = "cli",
        arg(long, value_enum, default_value_t = InvalidAmountPolicy::Error)
    )]
    pub on_invalid_amount: InvalidAmountPolicy,

    /// Add a per-month summary to the report
    #[cfg_attr(feature = "cli", arg(long))]
    pub summary: bool,

    /// List the journals that would be processed and exit
    #[cfg_attr(feature = "cli", arg(long))]
    pub dry_run: bool,

    #[cfg_attr(feature = "cli", arg(short, long, help = "Enable verbose output"))]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[cfg_attr(feature = "cli", arg(long))]
    pub log_json: bool,

    /// Log CPU and memory usage per phase
    #[cfg_attr(feature = "cli", arg(long))]
    pub monitor: bool,
}

impl CliConfig {
    /// Defaults for everything except the input path.
    pub fn with_input(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output_path: ".".to_string(),
            output_file: None,
            format: OutputFormat::Xlsx,
            unit_letters: DEFAULT_UNIT_LETTERS.to_string(),
            unit_column: DEFAULT_UNIT_COLUMN,
            amount_column: DEFAULT_AMOUNT_COLUMN,
            total_label: DEFAULT_TOTAL_LABEL.to_string(),
            on_invalid_amount: InvalidAmountPolicy::Error,
            summary: false,
            dry_run: false,
            verbose: false,
            log_json: false,
            monitor: false,
        }
    }
}

impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn report_filename(&self) -> Option<&str> {
        self.output_file.as_deref()
    }

    fn output_format(&self) -> OutputFormat {
        self.format
    }

    fn unit_letters(&self) -> &str {
        &self.unit_letters
    }

    fn unit_column(&self) -> usize {
        self.unit_column
    }

    fn amount_column(&self) -> usize {
        self.amount_column
    }

    fn total_label(&self) -> &str {
        &self.total_label
    }

    fn on_invalid_amount(&self) -> InvalidAmountPolicy {
        self.on_invalid_amount
    }

    fn include_summary(&self) -> bool {
        self.summary
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
