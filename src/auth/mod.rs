pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::Deserialize;
use validator::Validate;

// Re-export necessary items
pub use extractors::Authenticated;
pub use middleware::{AuthMiddleware, Session, AUTH_HEADER};
pub use password::{hash_password, verify_password};
pub use token::{generate_token, issue_token, verify_token, Claims};

/// The minimum accepted password length, mirrored by the `length` rule on
/// `Credentials`. A policy knob rather than a business rule.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Represents the payload for account creation (`POST /users`) and login
/// (`POST /users/login`). The two endpoints accept the same shape.
#[derive(Debug, Deserialize, Validate)]
pub struct Credentials {
    /// The account's email address.
    /// Must be a valid email format; unique across accounts on signup.
    #[validate(email)]
    pub email: String,
    /// The account's password.
    /// Must be at least `MIN_PASSWORD_LENGTH` characters long.
    #[validate(length(min = 6))]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_credentials_validation() {
        let valid = Credentials {
            email: "a@b.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = Credentials {
            email: "myemail.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let short_password = Credentials {
            email: "a@b.com".to_string(),
            password: "123".to_string(),
        };
        assert!(short_password.validate().is_err());

        let empty_password = Credentials {
            email: "a@b.com".to_string(),
            password: String::new(),
        };
        assert!(empty_password.validate().is_err());
    }

    #[test]
    fn test_password_threshold_matches_constant() {
        let at_threshold = Credentials {
            email: "a@b.com".to_string(),
            password: "x".repeat(MIN_PASSWORD_LENGTH),
        };
        assert!(at_threshold.validate().is_ok());

        let below_threshold = Credentials {
            email: "a@b.com".to_string(),
            password: "x".repeat(MIN_PASSWORD_LENGTH - 1),
        };
        assert!(below_threshold.validate().is_err());
    }
}
