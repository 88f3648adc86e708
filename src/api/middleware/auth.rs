//! JWT authentication middleware.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::{Actor, UserResponse, UserRole};
use crate::errors::AppError;

/// The account behind the bearer token, loaded fresh for each request.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    /// Full profile, returned by `/auth/me`
    pub profile: UserResponse,
}

impl CurrentUser {
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.id,
            role: self.role,
        }
    }
}

impl From<UserResponse> for CurrentUser {
    fn from(profile: UserResponse) -> Self {
        Self {
            id: profile.id,
            email: profile.email.clone(),
            name: profile.name.clone(),
            role: profile.role,
            profile,
        }
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// JWT authentication middleware.
///
/// Verifies the bearer token, then loads the account (cache first, database
/// second). Tokens for deleted accounts are rejected.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let claims = state.auth_service.verify_token(token)?;

    let profile = match state.cached_user(claims.sub).await {
        Some(profile) => profile,
        None => {
            let profile = match state.user_service.current_user(claims.sub).await {
                Ok(profile) => profile,
                Err(AppError::NotFound(_)) => {
                    tracing::debug!(user_id = %claims.sub, "Token for a deleted account");
                    return Err(AppError::Unauthorized);
                }
                Err(e) => return Err(e),
            };
            state.remember_user(&profile).await;
            profile
        }
    };

    request.extensions_mut().insert(CurrentUser::from(profile));

    Ok(next.run(request).await)
}

/// Forbidden unless the user holds one of `allowed`.
pub fn require_role(user: &CurrentUser, allowed: &[UserRole]) -> Result<(), AppError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Manager or staff.
pub fn require_staff(user: &CurrentUser) -> Result<(), AppError> {
    require_role(user, &[UserRole::Manager, UserRole::Staff])
}

pub fn require_manager(user: &CurrentUser) -> Result<(), AppError> {
    require_role(user, &[UserRole::Manager])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn current(role: UserRole) -> CurrentUser {
        CurrentUser::from(UserResponse {
            id: Uuid::new_v4(),
            email: "someone@ancheta.com".into(),
            name: "Someone".into(),
            role,
            phone: None,
            unit_id: None,
            unit_number: None,
            floor: None,
            building: None,
            created_at: Utc::now(),
        })
    }

    #[test]
    fn test_require_role() {
        let staff = current(UserRole::Staff);
        assert!(require_role(&staff, &[UserRole::Manager, UserRole::Staff]).is_ok());
        assert!(matches!(
            require_role(&staff, &[UserRole::Manager]),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn test_tenant_is_not_staff() {
        let tenant = current(UserRole::Tenant);
        assert!(require_staff(&tenant).is_err());
        assert!(require_manager(&current(UserRole::Manager)).is_ok());
        assert_eq!(tenant.actor().role, UserRole::Tenant);
    }
}
