//! Authentication and staff account management.
//!
//! Passwords are hashed with Argon2id. Login failures are always reported
//! as `InvalidCredentials` so responses do not reveal whether an email
//! exists.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use thiserror::Error;

use tillpoint_core::{Email, UserId};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::{CreateUserInput, UpdateUserInput, User};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors from authentication and account management.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email/password pair did not match.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password does not meet requirements.
    #[error("{0}")]
    WeakPassword(String),

    /// Email address failed validation.
    #[error("{0}")]
    InvalidEmail(String),

    /// Password hashing failed.
    #[error("password hashing failed")]
    Hash(argon2::password_hash::Error),

    /// Underlying repository error.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Authentication service over the user repository.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Verify an email/password pair and return the matching user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email or a
    /// wrong password.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let Some((user, hash)) = self.users.get_credentials(&email).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &hash)?;
        Ok(user)
    }

    /// Create a staff account, hashing the password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` or `AuthError::WeakPassword` when
    /// validation fails, and `AuthError::Repository` with a `Conflict` for
    /// duplicate emails.
    pub async fn create_user(&self, input: &CreateUserInput) -> Result<User, AuthError> {
        let email =
            Email::parse(&input.email).map_err(|e| AuthError::InvalidEmail(e.to_string()))?;
        validate_password(&input.password)?;
        let hash = hash_password(&input.password)?;

        let user = self
            .users
            .create(
                &email,
                &hash,
                &input.full_name,
                input.role,
                input.image_url.as_deref(),
            )
            .await?;
        Ok(user)
    }

    /// Update a staff account. An absent or empty password keeps the
    /// stored hash.
    ///
    /// # Errors
    ///
    /// Same failure modes as `create_user`, plus `NotFound` for a missing
    /// user.
    pub async fn update_user(&self, id: UserId, input: &UpdateUserInput) -> Result<User, AuthError> {
        let email =
            Email::parse(&input.email).map_err(|e| AuthError::InvalidEmail(e.to_string()))?;

        let hash = match input.password.as_deref() {
            Some(password) if !password.is_empty() => {
                validate_password(password)?;
                Some(hash_password(password)?)
            }
            _ => None,
        };

        let user = self
            .users
            .update(
                id,
                &email,
                &input.full_name,
                input.role,
                input.image_url.as_deref(),
                hash.as_deref(),
            )
            .await?;
        Ok(user)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(AuthError::Hash)
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_password_is_rejected() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn eight_characters_is_enough() {
        assert!(validate_password("12345678").is_ok());
    }

    #[test]
    fn hash_then_verify_roundtrip() {
        let hash = hash_password("correct horse battery").expect("hash");
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn garbage_hash_is_invalid_credentials() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
