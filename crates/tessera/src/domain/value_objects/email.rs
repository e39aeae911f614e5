//! Email - Unique key of a User

use serde::Serialize;

use crate::domain::errors::DomainError;

const MAX_EMAIL_CHARS: usize = 254;
const MAX_LOCAL_PART_CHARS: usize = 64;

/// Normalized (trimmed, lowercased) email address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let email = raw.trim().to_lowercase();

        if email.is_empty() {
            return Err(DomainError::invalid_field("email", "must not be empty"));
        }
        if email.chars().count() > MAX_EMAIL_CHARS {
            return Err(DomainError::invalid_field(
                "email",
                format!("must be at most {MAX_EMAIL_CHARS} characters"),
            ));
        }
        if email.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(DomainError::invalid_field(
                "email",
                "must not contain whitespace",
            ));
        }

        let (local, domain) = match email.split_once('@') {
            Some(parts) => parts,
            None => return Err(DomainError::invalid_field("email", "missing '@'")),
        };

        if domain.contains('@') {
            return Err(DomainError::invalid_field("email", "more than one '@'"));
        }
        if local.is_empty() || local.chars().count() > MAX_LOCAL_PART_CHARS {
            return Err(DomainError::invalid_field(
                "email",
                format!("local part must be 1-{MAX_LOCAL_PART_CHARS} characters"),
            ));
        }
        if !Self::is_valid_domain(domain) {
            return Err(DomainError::invalid_field("email", "invalid domain"));
        }

        Ok(Self(email))
    }

    fn is_valid_domain(domain: &str) -> bool {
        if !domain.contains('.') {
            return false;
        }
        domain.split('.').all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_alphanumeric() || c == '-')
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_case_and_whitespace() {
        let email = Email::parse("  Ada@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "ada@example.com");
    }

    #[test]
    fn test_normalized_forms_are_equal() {
        assert_eq!(
            Email::parse("ADA@example.com").unwrap(),
            Email::parse("ada@EXAMPLE.com").unwrap()
        );
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        for raw in [
            "",
            "ada",
            "@example.com",
            "ada@",
            "ada@example",
            "ada@@example.com",
            "ada@exa mple.com",
            "ada@.example.com",
            "ada@example..com",
            "ada@-example.com",
        ] {
            assert!(
                matches!(Email::parse(raw), Err(DomainError::Validation(_))),
                "expected {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_accepts_subdomains_and_plus_tags() {
        assert!(Email::parse("ada+news@mail.example.co.uk").is_ok());
    }

    #[test]
    fn test_rejects_overlong_local_part() {
        let raw = format!("{}@example.com", "a".repeat(65));
        assert!(Email::parse(&raw).is_err());
    }
}
