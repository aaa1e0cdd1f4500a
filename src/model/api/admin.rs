use argon2::Config;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::model::db::admin::NewAdmin;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Raw admin credentials, received from a user. These are never stored
/// directly, since the password is in plaintext.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

impl AdminCredentials {
    /// Check the credentials are acceptable for registration: a plausible
    /// email address and a password of minimum length.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if !plausible_email(&self.email) {
            errors.push(FieldError::new("email", "a valid email address is required"));
        }
        if self.password.len() < MIN_PASSWORD_LENGTH {
            errors.push(FieldError::new(
                "password",
                format!("password must be at least {MIN_PASSWORD_LENGTH} characters"),
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl TryFrom<AdminCredentials> for NewAdmin {
    type Error = Vec<FieldError>;

    /// Convert [`AdminCredentials`] to a [`NewAdmin`] by hashing the password.
    fn try_from(cred: AdminCredentials) -> Result<Self, Self::Error> {
        cred.validate()?;

        // 16 bytes is recommended for password hashing:
        //  https://en.wikipedia.org/wiki/Argon2
        let mut salt = [0_u8; 16];
        rand::thread_rng().fill(&mut salt);
        let password_hash =
            argon2::hash_encoded(cred.password.as_bytes(), &salt, &Config::default()).unwrap(); // Safe because the default `Config` is valid.
        Ok(Self {
            email: cred.email,
            password_hash,
        })
    }
}

/// A deliberately loose email shape check: one `@` with a non-empty local
/// part and domain. Real verification would need a confirmation mail.
fn plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.starts_with('.') && domain.contains('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod examples {
    use super::*;

    impl AdminCredentials {
        pub fn example() -> Self {
            Self {
                email: "alice@example.com".into(),
                password: "correct-horse-battery".into(),
            }
        }

        pub fn example2() -> Self {
            Self {
                email: "bob@example.com".into(),
                password: "totallysecurepassword".into(),
            }
        }
    }
}
