use crate::utils::error::{Result, WriterError};
use std::path::{Component, Path};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(WriterError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(WriterError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// A filename is resolved against the output directory, so it must be relative.
/// Nested names such as `sub/result.json` are allowed; missing directories are
/// not created.
pub fn validate_filename(field_name: &str, filename: &str) -> Result<()> {
    validate_non_empty_string(field_name, filename)?;
    validate_path(field_name, filename)?;

    let path = Path::new(filename);
    let anchored = path.is_absolute()
        || path.has_root()
        || matches!(path.components().next(), Some(Component::Prefix(_)));
    if anchored {
        return Err(WriterError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: filename.to_string(),
            reason: "Filename must be relative to the output directory".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(WriterError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(WriterError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}
