//! Tenant service - tenant accounts and unit occupancy.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{Config, TENANT_EMAIL_ATTEMPTS};
use crate::domain::{
    next_tenant_email, CreateTenant, NewUser, Password, TenantCreated, TenantSummary,
    UserResponse, UserRole,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait TenantService: Send + Sync {
    /// Create a tenant with the next sequential login e-mail and the
    /// default password; the credentials are returned once
    async fn create_tenant(&self, request: CreateTenant) -> AppResult<TenantCreated>;

    async fn list_tenants(&self) -> AppResult<Vec<TenantSummary>>;

    async fn assign_unit(&self, tenant_id: Uuid, unit_id: Uuid) -> AppResult<UserResponse>;

    async fn remove_unit(&self, tenant_id: Uuid) -> AppResult<UserResponse>;
}

pub struct TenantManager<U: UnitOfWork> {
    uow: Arc<U>,
    email_domain: String,
    default_password: String,
}

impl<U: UnitOfWork> TenantManager<U> {
    pub fn new(uow: Arc<U>, config: &Config) -> Self {
        Self {
            uow,
            email_domain: config.tenant_email_domain.clone(),
            default_password: config.tenant_default_password.clone(),
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> TenantService for TenantManager<U> {
    async fn create_tenant(&self, request: CreateTenant) -> AppResult<TenantCreated> {
        let password_hash = Password::new(&self.default_password)?.into_string();
        let name = request.name.trim().to_string();
        let phone = request.phone.filter(|p| !p.trim().is_empty());

        let mut attempt = 0;
        loop {
            attempt += 1;
            let existing = self.uow.users().tenant_emails().await?;
            let email = next_tenant_email(&existing, &self.email_domain);

            let created = self
                .uow
                .users()
                .create(NewUser {
                    email: email.clone(),
                    password_hash: password_hash.clone(),
                    name: name.clone(),
                    role: UserRole::Tenant,
                    phone: phone.clone(),
                })
                .await;

            match created {
                Ok(tenant) => {
                    tracing::info!(tenant_id = %tenant.id, email = %email, "Tenant account created");
                    return Ok(TenantCreated {
                        tenant: UserResponse::from(tenant),
                        login_email: email,
                        login_password: self.default_password.clone(),
                    });
                }
                // Another request took the same address in between
                Err(AppError::Conflict(_)) if attempt < TENANT_EMAIL_ATTEMPTS => {
                    tracing::debug!(email = %email, attempt, "Tenant e-mail taken, retrying");
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn list_tenants(&self) -> AppResult<Vec<TenantSummary>> {
        self.uow.users().tenant_summaries().await
    }

    async fn assign_unit(&self, tenant_id: Uuid, unit_id: Uuid) -> AppResult<UserResponse> {
        let row = self.uow.users().assign_unit(tenant_id, unit_id).await?;
        tracing::info!(tenant_id = %tenant_id, unit_id = %unit_id, "Tenant assigned to unit");
        Ok(UserResponse::from(row))
    }

    async fn remove_unit(&self, tenant_id: Uuid) -> AppResult<UserResponse> {
        let row = self.uow.users().remove_unit(tenant_id).await?;
        tracing::info!(tenant_id = %tenant_id, "Tenant removed from unit");
        Ok(UserResponse::from(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;
    use crate::infra::MockUserRepository;
    use crate::services::testing::{self, TestUnitOfWork};

    fn service(users: MockUserRepository) -> TenantManager<TestUnitOfWork> {
        TenantManager::new(
            TestUnitOfWork::new().with_users(users).into_arc(),
            &Config::for_secret("test-secret-key-at-least-32-chars!"),
        )
    }

    fn created(new_user: NewUser) -> User {
        User {
            email: new_user.email,
            name: new_user.name,
            phone: new_user.phone,
            ..testing::user(UserRole::Tenant)
        }
    }

    #[tokio::test]
    async fn test_create_tenant_uses_next_email() {
        let mut users = MockUserRepository::new();
        users.expect_tenant_emails().returning(|| {
            Ok(vec![
                "tenant@ancheta.com".to_string(),
                "tenant9@ancheta.com".to_string(),
                "tenant10@ancheta.com".to_string(),
            ])
        });
        users
            .expect_create()
            .withf(|u| u.email == "tenant11@ancheta.com" && u.role == UserRole::Tenant)
            .times(1)
            .returning(|u| Ok(created(u)));

        let result = service(users)
            .create_tenant(CreateTenant {
                name: "Juan Dela Cruz".into(),
                phone: None,
            })
            .await
            .unwrap();

        assert_eq!(result.login_email, "tenant11@ancheta.com");
        assert_eq!(result.login_password, "password123");
        assert_eq!(result.tenant.role, UserRole::Tenant);
    }

    #[tokio::test]
    async fn test_create_tenant_retries_taken_email() {
        let mut users = MockUserRepository::new();
        let mut seq = mockall::Sequence::new();

        users
            .expect_tenant_emails()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![]));
        users
            .expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(AppError::conflict("Email is already registered")));
        users
            .expect_tenant_emails()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec!["tenant@ancheta.com".to_string()]));
        users
            .expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|u| Ok(created(u)));

        let result = service(users)
            .create_tenant(CreateTenant {
                name: "Ana".into(),
                phone: Some("09170000000".into()),
            })
            .await
            .unwrap();

        assert_eq!(result.login_email, "tenant2@ancheta.com");
    }

    #[tokio::test]
    async fn test_assign_occupied_unit_fails() {
        let mut users = MockUserRepository::new();
        users
            .expect_assign_unit()
            .returning(|_, _| Err(AppError::BadRequest("Unit is already occupied".into())));

        let err = service(users)
            .assign_unit(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
