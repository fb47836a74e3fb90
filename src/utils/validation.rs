use crate::core::ConfigProvider;
use crate::utils::error::{AggError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(AggError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(AggError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(AggError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_file_extensions(
    field_name: &str,
    files: &[String],
    allowed_extensions: &[&str],
) -> Result<()> {
    let allowed_set: HashSet<String> = allowed_extensions
        .iter()
        .map(|ext| ext.to_lowercase())
        .collect();

    for file in files {
        if let Some(extension) = std::path::Path::new(file)
            .extension()
            .and_then(|ext| ext.to_str())
        {
            if !allowed_set.contains(&extension.to_lowercase()) {
                return Err(AggError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: file.clone(),
                    reason: format!(
                        "Unsupported file extension: {}. Allowed extensions: {}",
                        extension,
                        allowed_extensions.join(", ")
                    ),
                });
            }
        } else {
            return Err(AggError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: file.clone(),
                reason: "File has no extension or invalid filename".to_string(),
            });
        }
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AggError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_unit_letters(field_name: &str, letters: &str) -> Result<()> {
    validate_non_empty_string(field_name, letters)?;
    if let Some(bad) = letters.chars().find(|c| !c.is_ascii_alphanumeric()) {
        return Err(AggError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: letters.to_string(),
            reason: format!("Unit letters must be ASCII letters or digits, found '{}'", bad),
        });
    }
    Ok(())
}

pub fn validate_log_level(field_name: &str, level: &str) -> Result<()> {
    const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
    if !LEVELS.contains(&level.to_lowercase().as_str()) {
        return Err(AggError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: level.to_string(),
            reason: format!("Log level must be one of: {}", LEVELS.join(", ")),
        });
    }
    Ok(())
}

/// Checks shared by every configuration source.
pub fn validate_provider<C: ConfigProvider>(config: &C) -> Result<()> {
    validate_path("input", config.input_path())?;
    validate_path("output_path", config.output_path())?;
    validate_unit_letters("unit_letters", config.unit_letters())?;
    validate_positive_number("unit_column", config.unit_column(), 1)?;
    validate_positive_number("amount_column", config.amount_column(), 1)?;
    validate_non_empty_string("total_label", config.total_label())?;

    if let Some(filename) = config.report_filename() {
        validate_path("output_file", filename)?;
        validate_file_extensions(
            "output_file",
            &[filename.to_string()],
            &[config.output_format().extension()],
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("input", "./journals").is_ok());
        assert!(validate_path("input", "").is_err());
        assert!(validate_path("input", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_log_level() {
        assert!(validate_log_level("log_level", "debug").is_ok());
        assert!(validate_log_level("log_level", "WARN").is_ok());
        assert!(validate_log_level("log_level", "loud").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("unit_column", 2, 1).is_ok());
        assert!(validate_positive_number("unit_column", 0, 1).is_err());
    }

    #[test]
    fn test_validate_file_extensions() {
        let files = vec!["report.xlsx".to_string(), "REPORT.XLSX".to_string()];
        assert!(validate_file_extensions("output_file", &files, &["xlsx"]).is_ok());

        let invalid_files = vec!["report.csv".to_string()];
        assert!(validate_file_extensions("output_file", &invalid_files, &["xlsx"]).is_err());

        let no_ext = vec!["report".to_string()];
        assert!(validate_file_extensions("output_file", &no_ext, &["xlsx"]).is_err());
    }

    #[test]
    fn test_validate_unit_letters() {
        assert!(validate_unit_letters("unit_letters", "GHI").is_ok());
        assert!(validate_unit_letters("unit_letters", "").is_err());
        assert!(validate_unit_letters("unit_letters", "G-H").is_err());
    }
}
