//! Registration, login and password handling.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::user::{NewUser, User};
use crate::models::config::ServerConfig;
use crate::repository::{UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult};

fn hash_password(password: &str) -> ServiceResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::Internal(format!("password hashing failed: {e}")))
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

fn issue_token(config: &ServerConfig, user: &User) -> ServiceResult<String> {
    AuthenticatedUser::new(user.id, &user.email)
        .to_token(config.jwt_secret())
        .map_err(|e| ServiceError::Internal(format!("token signing failed: {e}")))
}

/// Creates an account and returns it with a fresh bearer token.
pub fn register_user<R>(
    repo: &R,
    config: &ServerConfig,
    email: &str,
    password: &str,
    name: Option<String>,
) -> ServiceResult<(User, String)>
where
    R: UserReader + UserWriter + ?Sized,
{
    let email = email.to_lowercase().trim().to_string();

    if repo
        .get_user_by_email(&email)
        .map_err(ServiceError::from)?
        .is_some()
    {
        return Err(ServiceError::Conflict("email already registered".into()));
    }

    let password_hash = hash_password(password)?;
    let user = repo
        .create_user(&NewUser::new(email, password_hash, name))
        .map_err(ServiceError::from)?;

    let token = issue_token(config, &user)?;
    Ok((user, token))
}

/// Verifies credentials and returns the account with a fresh bearer token.
pub fn login_user<R>(
    repo: &R,
    config: &ServerConfig,
    email: &str,
    password: &str,
) -> ServiceResult<(User, String)>
where
    R: UserReader + ?Sized,
{
    let user = repo
        .get_user_by_email(email)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::Unauthorized)?;

    if !verify_password(password, &user.password_hash) {
        return Err(ServiceError::Unauthorized);
    }

    let token = issue_token(config, &user)?;
    Ok((user, token))
}

/// Resolves the account behind a validated token.
pub fn current_user<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<User>
where
    R: UserReader + ?Sized,
{
    repo.get_user_by_id(user.sub)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        assert!(!verify_password("anything", "not a phc string"));
    }
}
