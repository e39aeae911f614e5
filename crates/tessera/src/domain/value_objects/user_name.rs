//! UserName - Display name of a User

use serde::Serialize;

use crate::domain::errors::DomainError;

pub const MAX_USER_NAME_CHARS: usize = 100;

/// Trimmed, non-empty display name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct UserName(String);

impl UserName {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let name = raw.trim();

        if name.is_empty() {
            return Err(DomainError::invalid_field("name", "must not be empty"));
        }
        if name.chars().count() > MAX_USER_NAME_CHARS {
            return Err(DomainError::invalid_field(
                "name",
                format!("must be at most {MAX_USER_NAME_CHARS} characters"),
            ));
        }
        if name.chars().any(char::is_control) {
            return Err(DomainError::invalid_field(
                "name",
                "must not contain control characters",
            ));
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_surrounding_whitespace() {
        let name = UserName::parse("  Ada Lovelace ").unwrap();
        assert_eq!(name.as_str(), "Ada Lovelace");
    }

    #[test]
    fn test_rejects_blank() {
        assert!(matches!(
            UserName::parse("   "),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_length_limit_counts_chars_not_bytes() {
        let at_limit = "é".repeat(MAX_USER_NAME_CHARS);
        assert!(UserName::parse(&at_limit).is_ok());

        let over = "a".repeat(MAX_USER_NAME_CHARS + 1);
        assert!(UserName::parse(&over).is_err());
    }

    #[test]
    fn test_rejects_control_characters() {
        assert!(UserName::parse("Ada\u{0007}").is_err());
    }
}
