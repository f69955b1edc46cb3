//! Form rules for login, signup and profile edits.

use storepilot_core::Email;

use super::AccountError;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Minimum display name length, in characters.
pub const MIN_NAME_LENGTH: usize = 3;

/// Check a password: at least [`MIN_PASSWORD_LENGTH`] ASCII letters and
/// digits, with at least one of each.
///
/// # Errors
///
/// Returns `AccountError::WeakPassword` naming the broken rule.
pub fn validate_password(password: &str) -> Result<(), AccountError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AccountError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if !password.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AccountError::WeakPassword(
            "password may only contain letters and digits".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_alphabetic())
        || !password.chars().any(|c| c.is_ascii_digit())
    {
        return Err(AccountError::WeakPassword(
            "password must contain at least one letter and one digit".to_string(),
        ));
    }
    Ok(())
}

/// Trim a display name and check its length.
///
/// # Errors
///
/// Returns `AccountError::NameTooShort` for names under [`MIN_NAME_LENGTH`].
pub fn validate_name(name: &str) -> Result<String, AccountError> {
    let name = name.trim();
    if name.chars().count() < MIN_NAME_LENGTH {
        return Err(AccountError::NameTooShort {
            min: MIN_NAME_LENGTH,
        });
    }
    Ok(name.to_string())
}

/// Parse an email from a form field.
///
/// # Errors
///
/// Returns `AccountError::InvalidEmail`.
pub fn validate_email(email: &str) -> Result<Email, AccountError> {
    Ok(Email::parse(email)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_rules() {
        assert!(validate_password("abc123").is_ok());
        assert!(validate_password("Changeme2024").is_ok());

        for weak in ["ab1", "abcdef", "123456", "abc 123", "abc-123", "pässw0rd"] {
            assert!(
                matches!(validate_password(weak), Err(AccountError::WeakPassword(_))),
                "{weak:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_name_rules() {
        assert_eq!(validate_name("  Ana ").ok().as_deref(), Some("Ana"));
        assert!(matches!(
            validate_name(" Al "),
            Err(AccountError::NameTooShort { min: 3 })
        ));
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("john@mail.com").is_ok());
        assert!(matches!(
            validate_email("john"),
            Err(AccountError::InvalidEmail(_))
        ));
    }
}
