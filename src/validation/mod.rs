use std::fmt;
use url::Url;

pub const SEO_TITLE_MAX_LEN: usize = 120;
pub const SEO_DESCRIPTION_MAX_LEN: usize = 500;
pub const SITE_NAME_MAX_LEN: usize = 120;
pub const KEYWORD_MAX_LEN: usize = 64;
pub const EMAIL_MAX_LEN: usize = 254;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

pub fn validate_required(field: &str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }

    Ok(())
}

pub fn validate_max_len(field: &str, value: &str, max_len: usize) -> ValidationResult {
    if value.chars().count() > max_len {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters", max_len),
        ));
    }

    Ok(())
}

/// Empty is allowed; otherwise a single `@` with a dotted domain.
pub fn validate_optional_email(field: &str, value: &str) -> ValidationResult {
    if value.is_empty() {
        return Ok(());
    }
    validate_max_len(field, value, EMAIL_MAX_LEN)?;

    let mut parts = value.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err(ValidationError::new(field, "must be a valid email address")),
    };

    let domain_ok = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.');
    if local.is_empty() || !domain_ok || value.chars().any(char::is_whitespace) {
        return Err(ValidationError::new(field, "must be a valid email address"));
    }

    Ok(())
}

/// Empty is allowed; otherwise an absolute http(s) URL.
pub fn validate_optional_url(field: &str, value: &str) -> ValidationResult {
    if value.is_empty() {
        return Ok(());
    }

    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(ValidationError::new(field, "must be an http(s) URL")),
    }
}

/// Like [`validate_optional_url`] but also accepts site-relative paths.
pub fn validate_optional_asset_ref(field: &str, value: &str) -> ValidationResult {
    if value.starts_with('/') && !value.starts_with("//") {
        return Ok(());
    }
    validate_optional_url(field, value)
}
