use crate::utils::error::{RegistrarError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(RegistrarError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(RegistrarError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u32, min_value: u32) -> Result<()> {
    if value < min_value {
        return Err(RegistrarError::ValidationError {
            message: format!("{} must be at least {} (got {})", field_name, min_value, value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RegistrarError::ValidationError {
            message: format!("{} cannot be empty or whitespace-only", field_name),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| RegistrarError::MissingConfigError {
        field: field_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("audit.path", "registration.log").is_ok());
        assert!(validate_path("audit.path", "").is_err());
        assert!(validate_path("audit.path", "   ").is_err());
        assert!(validate_path("audit.path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("capacity", 30, 1).is_ok());
        assert!(validate_positive_number("capacity", 0, 1).is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("first name", "Ada").is_ok());
        assert!(validate_non_empty_string("first name", " \t").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("roster".to_string());
        assert_eq!(
            validate_required_field("storage.data_dir", &present).unwrap(),
            "roster"
        );
        let missing: Option<String> = None;
        assert!(matches!(
            validate_required_field("storage.data_dir", &missing),
            Err(RegistrarError::MissingConfigError { .. })
        ));
    }
}
