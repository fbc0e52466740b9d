use thiserror::Error;

/// Form-level validation failures, caught before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),
    #[error("Title must be at least {0} characters")]
    TitleTooShort(usize),
    #[error("Name is required")]
    NameRequired,
}

const MIN_PASSWORD_LEN: usize = 6;
const MIN_TITLE_LEN: usize = 2;

/// Minimal email shape check: one `@` with a dot somewhere after it.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::InvalidEmail);
    };
    if local.is_empty() || domain.len() < 3 || !domain.contains('.') || domain.contains('@') {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LEN));
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().chars().count() < MIN_TITLE_LEN {
        return Err(ValidationError::TitleTooShort(MIN_TITLE_LEN));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::NameRequired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(validate_email("ana@example.com").is_ok());
        assert!(validate_email("a.b+tag@sub.example.org").is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        for email in ["", "no-at.example.com", "@example.com", "a@b", "a@@b.com"] {
            assert_eq!(validate_email(email), Err(ValidationError::InvalidEmail));
        }
    }

    #[test]
    fn password_needs_six_characters() {
        assert!(validate_password("secret").is_ok());
        assert_eq!(
            validate_password("short"),
            Err(ValidationError::PasswordTooShort(6))
        );
    }

    #[test]
    fn title_needs_two_characters() {
        assert!(validate_title("Do").is_ok());
        assert_eq!(validate_title(" x "), Err(ValidationError::TitleTooShort(2)));
    }
}
