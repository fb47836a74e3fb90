use crate::config::{
    DEFAULT_AMOUNT_COLUMN, DEFAULT_TOTAL_LABEL, DEFAULT_UNIT_COLUMN, DEFAULT_UNIT_LETTERS,
};
use crate::core::ConfigProvider;
use crate::domain::model::{InvalidAmountPolicy, OutputFormat};
use crate::utils::error::{AggError, Result};
use crate::utils::validation::{validate_log_level, validate_provider, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub input: InputConfig,
    pub filter: Option<FilterConfig>,
    pub load: LoadConfig,
    pub error_handling: Option<ErrorHandlingConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Journal file or folder of journals.
    pub path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    pub unit_letters: Option<String>,
    pub unit_column: Option<usize>,
    pub amount_column: Option<usize>,
    pub total_label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub filename: Option<String>,
    pub format: Option<OutputFormat>,
    pub include_summary: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorHandlingConfig {
    pub on_invalid_amount: Option<InvalidAmountPolicy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AggError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AggError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}")?;

        let result = re.replace_all(content, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    fn filter(&self) -> Option<&FilterConfig> {
        self.filter.as_ref()
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.input.path
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn report_filename(&self) -> Option<&str> {
        self.load.filename.as_deref()
    }

    fn output_format(&self) -> OutputFormat {
        self.load.format.unwrap_or_default()
    }

    fn unit_letters(&self) -> &str {
        self.filter()
            .and_then(|f| f.unit_letters.as_deref())
            .unwrap_or(DEFAULT_UNIT_LETTERS)
    }

    fn unit_column(&self) -> usize {
        self.filter()
            .and_then(|f| f.unit_column)
            .unwrap_or(DEFAULT_UNIT_COLUMN)
    }

    fn amount_column(&self) -> usize {
        self.filter()
            .and_then(|f| f.amount_column)
            .unwrap_or(DEFAULT_AMOUNT_COLUMN)
    }

    fn total_label(&self) -> &str {
        self.filter()
            .and_then(|f| f.total_label.as_deref())
            .unwrap_or(DEFAULT_TOTAL_LABEL)
    }

    fn on_invalid_amount(&self) -> InvalidAmountPolicy {
        self.error_handling
            .as_ref()
            .and_then(|e| e.on_invalid_amount)
            .unwrap_or_default()
    }

    fn include_summary(&self) -> bool {
        self.load.include_summary.unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)?;
        if let Some(level) = self.log_level() {
            validate_log_level("monitoring.log_level", level)?;
        }
        Ok(())
    }
}
