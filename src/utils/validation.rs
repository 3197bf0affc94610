use crate::utils::error::{LawMateError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(LawMateError::MissingConfigError {
            field: field_name.to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(LawMateError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(LawMateError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| LawMateError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LawMateError::InvalidConfigValueError {
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
        return Err(LawMateError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 只做最基本的 email 形狀檢查，真正的驗證交給後端
pub fn validate_email(field_name: &str, value: &str) -> Result<()> {
    let trimmed = value.trim();
    let valid = match trimmed.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    };

    if !valid {
        return Err(LawMateError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Not a valid email address".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("backend.base_url", "https://example.com").is_ok());
        assert!(validate_url("backend.base_url", "http://localhost:5000").is_ok());
        assert!(validate_url("backend.base_url", "").is_err());
        assert!(validate_url("backend.base_url", "invalid-url").is_err());
        assert!(validate_url("backend.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_empty_url_is_missing_config() {
        let err = validate_url("backend.base_url", "").unwrap_err();
        assert!(matches!(err, LawMateError::MissingConfigError { .. }));
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("backend.timeout_seconds", 30, 1, 300).is_ok());
        assert!(validate_range("backend.timeout_seconds", 0, 1, 300).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("email", "asha@example.in").is_ok());
        assert!(validate_email("email", "asha").is_err());
        assert!(validate_email("email", "@example.in").is_err());
        assert!(validate_email("email", "asha@localhost").is_err());
    }
}
