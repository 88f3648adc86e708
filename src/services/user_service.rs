//! User service - staff accounts and profiles.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    Actor, CreateUser, NewUser, Password, UpdateProfile, UserFilter, UserResponse,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait UserService: Send + Sync {
    /// The account behind a token; used by the auth middleware
    async fn current_user(&self, id: Uuid) -> AppResult<UserResponse>;

    async fn list_users(&self, filter: UserFilter) -> AppResult<Vec<UserResponse>>;

    /// Self, or anyone for manager/staff
    async fn get_user(&self, actor: Actor, id: Uuid) -> AppResult<UserResponse>;

    /// Create a manager or staff account
    async fn create_user(&self, request: CreateUser) -> AppResult<UserResponse>;

    /// Self, or anyone for a manager
    async fn update_user(
        &self,
        actor: Actor,
        id: Uuid,
        changes: UpdateProfile,
    ) -> AppResult<UserResponse>;

    async fn delete_user(&self, actor: Actor, id: Uuid) -> AppResult<()>;
}

pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn current_user(&self, id: Uuid) -> AppResult<UserResponse> {
        self.uow
            .users()
            .find_with_unit(id)
            .await?
            .map(UserResponse::from)
            .ok_or_not_found("User")
    }

    async fn list_users(&self, filter: UserFilter) -> AppResult<Vec<UserResponse>> {
        let users = self.uow.users().list(filter).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    async fn get_user(&self, actor: Actor, id: Uuid) -> AppResult<UserResponse> {
        if !actor.can_view(id) {
            return Err(AppError::Forbidden);
        }
        self.current_user(id).await
    }

    async fn create_user(&self, request: CreateUser) -> AppResult<UserResponse> {
        if request.role.is_tenant() {
            return Err(AppError::validation(
                "Tenant accounts are created through /tenants",
            ));
        }

        let password_hash = Password::new(&request.password)?.into_string();
        let user = self
            .uow
            .users()
            .create(NewUser {
                email: request.email,
                password_hash,
                name: request.name.trim().to_string(),
                role: request.role,
                phone: request.phone.filter(|p| !p.trim().is_empty()),
            })
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User account created");
        Ok(UserResponse::from(user))
    }

    async fn update_user(
        &self,
        actor: Actor,
        id: Uuid,
        changes: UpdateProfile,
    ) -> AppResult<UserResponse> {
        if actor.id != id && !actor.is_manager() {
            return Err(AppError::Forbidden);
        }

        self.uow.users().update_profile(id, changes).await?;
        self.current_user(id).await
    }

    async fn delete_user(&self, actor: Actor, id: Uuid) -> AppResult<()> {
        if actor.id == id {
            return Err(AppError::BadRequest(
                "You cannot delete your own account".into(),
            ));
        }

        self.uow.users().delete(id).await?;
        tracing::info!(user_id = %id, deleted_by = %actor.id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{UserRole, UserWithUnit};
    use crate::infra::MockUserRepository;
    use crate::services::testing::{self, TestUnitOfWork};
    use mockall::predicate::eq;

    fn service(users: MockUserRepository) -> UserManager<TestUnitOfWork> {
        UserManager::new(TestUnitOfWork::new().with_users(users).into_arc())
    }

    #[tokio::test]
    async fn test_current_user_includes_unit() {
        let mut tenant = testing::user(UserRole::Tenant);
        let unit = testing::unit(1_200_000);
        tenant.unit_id = Some(unit.id);
        let tenant_id = tenant.id;

        let mut users = MockUserRepository::new();
        users
            .expect_find_with_unit()
            .with(eq(tenant_id))
            .returning(move |_| {
                Ok(Some(UserWithUnit {
                    user: tenant.clone(),
                    unit: Some(unit.clone()),
                }))
            });

        let response = service(users).current_user(tenant_id).await.unwrap();
        assert_eq!(response.unit_number.as_deref(), Some("101"));
        assert_eq!(response.building.as_deref(), Some("Building A"));
    }

    #[tokio::test]
    async fn test_current_user_missing() {
        let mut users = MockUserRepository::new();
        users.expect_find_with_unit().returning(|_| Ok(None));

        let err = service(users).current_user(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_tenant_cannot_view_other_users() {
        let tenant = testing::actor(UserRole::Tenant);
        let err = service(MockUserRepository::new())
            .get_user(tenant, Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden));
    }

    #[tokio::test]
    async fn test_create_user_rejects_tenant_role() {
        let request = CreateUser {
            email: "someone@ancheta.com".into(),
            password: "password123".into(),
            name: "Someone".into(),
            role: UserRole::Tenant,
            phone: None,
        };

        let err = service(MockUserRepository::new())
            .create_user(request)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let mut users = MockUserRepository::new();
        users
            .expect_create()
            .withf(|new_user| {
                new_user.password_hash != "password123"
                    && new_user.password_hash.starts_with("$argon2")
                    && new_user.role == UserRole::Staff
            })
            .returning(|new_user| {
                Ok(crate::domain::User {
                    email: new_user.email,
                    name: new_user.name,
                    ..testing::user(UserRole::Staff)
                })
            });

        let response = service(users)
            .create_user(CreateUser {
                email: "staff2@ancheta.com".into(),
                password: "password123".into(),
                name: " Maria ".into(),
                role: UserRole::Staff,
                phone: Some("  ".into()),
            })
            .await
            .unwrap();

        assert_eq!(response.email, "staff2@ancheta.com");
        assert_eq!(response.name, "Maria");
    }

    #[tokio::test]
    async fn test_staff_cannot_edit_someone_else() {
        let staff = testing::actor(UserRole::Staff);
        let err = service(MockUserRepository::new())
            .update_user(staff, Uuid::new_v4(), UpdateProfile::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden));
    }

    #[tokio::test]
    async fn test_cannot_delete_self() {
        let manager = testing::actor(UserRole::Manager);
        let err = service(MockUserRepository::new())
            .delete_user(manager, manager.id)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
