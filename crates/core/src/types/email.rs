//! Email address type used by the login, signup and profile forms.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Reasons an [`Email`] fails to parse.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input is empty after trimming.
    #[error("email is required")]
    Empty,
    /// The input is longer than the RFC 5321 limit.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input has no `@`, or more than one.
    #[error("email must contain exactly one @ symbol")]
    AtSymbol,
    /// Nothing before the `@`.
    #[error("email local part cannot be empty")]
    EmptyLocalPart,
    /// Nothing after the `@`.
    #[error("email domain cannot be empty")]
    EmptyDomain,
    /// Whitespace or control characters inside the address.
    #[error("email cannot contain whitespace")]
    Whitespace,
}

/// A syntactically valid email address.
///
/// Surrounding whitespace is trimmed; the address itself is kept as typed
/// because the remote account API compares emails verbatim.
///
/// ```
/// use storepilot_core::Email;
///
/// assert!(Email::parse("john@mail.com").is_ok());
/// assert!(Email::parse("  john@mail.com ").is_ok());
///
/// assert!(Email::parse("").is_err());
/// assert!(Email::parse("john.mail.com").is_err());
/// assert!(Email::parse("john@@mail.com").is_err());
/// assert!(Email::parse("john doe@mail.com").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email` from user input.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] describing the first rule the input breaks.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(EmailError::Whitespace);
        }

        let (local, domain) = s.split_once('@').ok_or(EmailError::AtSymbol)?;
        if domain.contains('@') {
            return Err(EmailError::AtSymbol);
        }
        if local.is_empty() {
            return Err(EmailError::EmptyLocalPart);
        }
        if domain.is_empty() {
            return Err(EmailError::EmptyDomain);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the part before the `@`.
    #[must_use]
    pub fn local_part(&self) -> &str {
        self.0.split_once('@').map_or("", |(local, _)| local)
    }

    /// Returns the part after the `@`.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, domain)| domain)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl core::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_common_shapes() {
        for ok in [
            "john@mail.com",
            "first.last+promo@shop.example.co.uk",
            "a@b",
            "  padded@mail.com\t",
        ] {
            assert!(Email::parse(ok).is_ok(), "{ok} should parse");
        }
    }

    #[test]
    fn test_parse_trims_input() {
        let email = Email::parse("  john@mail.com  ").unwrap();
        assert_eq!(email.as_str(), "john@mail.com");
    }

    #[test]
    fn test_parse_rejections() {
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
        assert_eq!(Email::parse("mail.com"), Err(EmailError::AtSymbol));
        assert_eq!(Email::parse("a@b@c"), Err(EmailError::AtSymbol));
        assert_eq!(Email::parse("@mail.com"), Err(EmailError::EmptyLocalPart));
        assert_eq!(Email::parse("john@"), Err(EmailError::EmptyDomain));
        assert_eq!(Email::parse("jo hn@mail.com"), Err(EmailError::Whitespace));
    }

    #[test]
    fn test_parse_too_long() {
        let long = format!("{}@mail.com", "x".repeat(250));
        assert_eq!(
            Email::parse(&long),
            Err(EmailError::TooLong {
                max: Email::MAX_LENGTH
            })
        );
    }

    #[test]
    fn test_parts() {
        let email = Email::parse("john@mail.com").unwrap();
        assert_eq!(email.local_part(), "john");
        assert_eq!(email.domain(), "mail.com");
    }

    #[test]
    fn test_serde_validates_on_deserialize() {
        let email: Email = serde_json::from_str("\"john@mail.com\"").unwrap();
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"john@mail.com\"");

        assert!(serde_json::from_str::<Email>("\"not-an-email\"").is_err());
    }
}
