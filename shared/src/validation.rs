pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_SLUG_LENGTH: usize = 100;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("Email is empty")]
    EmptyEmail,
    #[error("Email exceeds maximum length of {MAX_EMAIL_LENGTH}")]
    EmailTooLong,
    #[error("Email must contain an @")]
    MissingAt,
    #[error("Email is not a valid email address")]
    InvalidEmail,
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() { return Err(ValidationError::EmptyEmail); }
    if email.len() > MAX_EMAIL_LENGTH { return Err(ValidationError::EmailTooLong); }
    if !email.contains('@') { return Err(ValidationError::MissingAt); }

    // The crate accepts bare local hosts like `a@b`; a subscriber needs a routable domain.
    let domain = email.rsplit('@').next().unwrap_or_default();
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(ValidationError::InvalidEmail);
    }

    if !email_address::EmailAddress::is_valid(email) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(())
}

pub fn is_valid_email(email: &str) -> bool {
    validate_email(email).is_ok()
}

/// Slugs are ASCII word characters and hyphens only.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= MAX_SLUG_LENGTH
        && slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
