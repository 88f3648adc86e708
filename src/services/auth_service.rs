//! Authentication service - login and JWT handling.
//!
//! Password hashing lives in the domain `Password` value object.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{Password, User, UserResponse, UserWithUnit};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Verified against when the e-mail is unknown, so both failures cost the same.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$ZHVtbXlzYWx0MTIzNDU2$2oXqJmxQp9kJ8F7rN8Jx2m0L0n8p3l0d4s2k8h1v3aE";

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Returned after a successful login
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    #[schema(example = "Login successful")]
    pub message: String,
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 604800)]
    pub expires_in: i64,
    pub user: UserResponse,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials and issue a token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Verify a JWT and extract its claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

fn generate_token(user: &User, config: &Config) -> AppResult<String> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?)
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let found = self.uow.users().find_by_email(&email).await?;

        let hash = found
            .as_ref()
            .map(|user| user.password_hash.as_str())
            .unwrap_or(DUMMY_HASH);
        let password_valid = Password::from_hash(hash).verify(&password);

        let user = match found {
            Some(user) if password_valid => user,
            _ => {
                tracing::info!(email = %email, "Rejected login attempt");
                return Err(AppError::InvalidCredentials);
            }
        };

        let token = generate_token(&user, &self.config)?;

        let unit = match user.unit_id {
            Some(_) => self
                .uow
                .users()
                .find_with_unit(user.id)
                .await?
                .and_then(|row| row.unit),
            None => None,
        };

        tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

        Ok(TokenResponse {
            message: "Login successful".to_string(),
            token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.config.jwt_expiration_hours * SECONDS_PER_HOUR,
            user: UserResponse::from(UserWithUnit { user, unit }),
        })
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::infra::MockUserRepository;
    use crate::services::testing::{self, TestUnitOfWork};

    const SECRET: &str = "test-secret-key-at-least-32-chars!";

    fn service(users: MockUserRepository) -> Authenticator<TestUnitOfWork> {
        Authenticator::new(
            TestUnitOfWork::new().with_users(users).into_arc(),
            Config::for_secret(SECRET),
        )
    }

    fn stored_user(password: &str) -> User {
        User {
            password_hash: Password::new(password).unwrap().into_string(),
            ..testing::user(UserRole::Staff)
        }
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_token() {
        let user = stored_user("password123");
        let user_id = user.id;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let auth = service(users);
        let response = auth
            .login("staff@ancheta.com".into(), "password123".into())
            .await
            .unwrap();

        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 168 * 3600);
        assert_eq!(response.user.id, user_id);

        let claims = auth.verify_token(&response.token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, "staff");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let user = stored_user("password123");
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let err = service(users)
            .login("staff@ancheta.com".into(), "not-the-password".into())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_unknown_email_matches_wrong_password() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));

        let err = service(users)
            .login("nobody@ancheta.com".into(), "password123".into())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let user = testing::user(UserRole::Tenant);
        let foreign = generate_token(&user, &Config::for_secret("another-secret-key-32-chars-long!!"))
            .unwrap();

        let auth = service(MockUserRepository::new());
        assert!(auth.verify_token(&foreign).is_err());
        assert!(auth.verify_token("garbage").is_err());
    }
}
