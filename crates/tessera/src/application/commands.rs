//! Commands - Validated use-case input
//!
//! Built once at the boundary from raw input. Construction is all-or-nothing:
//! a command either holds only valid fields or is not built at all.

use crate::domain::{DomainError, Email, UserName};

/// Create a new User
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUser {
    pub name: UserName,
    pub email: Email,
}

impl CreateUser {
    pub fn new(name: &str, email: &str) -> Result<Self, DomainError> {
        Ok(Self {
            name: UserName::parse(name)?,
            email: Email::parse(email)?,
        })
    }
}

/// Change one or more attributes of an existing User
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUser {
    pub name: Option<UserName>,
    pub email: Option<Email>,
}

impl UpdateUser {
    pub fn new(name: Option<&str>, email: Option<&str>) -> Result<Self, DomainError> {
        if name.is_none() && email.is_none() {
            return Err(DomainError::Validation(
                "at least one of name, email must be provided".to_string(),
            ));
        }

        Ok(Self {
            name: name.map(UserName::parse).transpose()?,
            email: email.map(Email::parse).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_valid() {
        let cmd = CreateUser::new("Ada", "Ada@Example.com").unwrap();
        assert_eq!(cmd.name.as_str(), "Ada");
        assert_eq!(cmd.email.as_str(), "ada@example.com");
    }

    #[test]
    fn test_create_user_fails_on_any_bad_field() {
        assert!(CreateUser::new("", "ada@example.com").is_err());
        assert!(CreateUser::new("Ada", "not-an-email").is_err());
    }

    #[test]
    fn test_update_user_requires_a_field() {
        assert!(matches!(
            UpdateUser::new(None, None),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_update_user_is_atomic() {
        // A valid name does not rescue an invalid email
        assert!(UpdateUser::new(Some("Grace"), Some("nope")).is_err());

        let cmd = UpdateUser::new(None, Some("grace@example.com")).unwrap();
        assert!(cmd.name.is_none());
        assert_eq!(cmd.email.unwrap().as_str(), "grace@example.com");
    }
}
