//! User profile service.

use sampark_common::{AppError, AppResult};
use sampark_db::entities::{user, user::Role};
use sampark_db::repositories::UserRepository;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for updating a profile.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileInput {
    #[validate(length(min = 2, max = 256))]
    pub name: Option<String>,
    #[validate(length(min = 10, max = 20))]
    pub mobile: Option<String>,
    #[validate(length(max = 1024))]
    pub avatar_url: Option<String>,
}

/// Input for changing a password.
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordInput {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

/// User profile service.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    bcrypt_cost: u32,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository, bcrypt_cost: u32) -> Self {
        Self {
            user_repo,
            bcrypt_cost,
        }
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// List users, optionally by role.
    pub async fn list(
        &self,
        role: Option<Role>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<user::Model>> {
        self.user_repo.list(role, limit, offset).await
    }

    /// Update the caller's profile.
    pub async fn update_profile(
        &self,
        user_id: &str,
        input: UpdateProfileInput,
    ) -> AppResult<user::Model> {
        input.validate()?;

        if let Some(mobile) = &input.mobile {
            if let Some(other) = self.user_repo.find_by_mobile(mobile).await? {
                if other.id != user_id {
                    return Err(AppError::DuplicateIdentity(mobile.clone()));
                }
            }
        }

        let user = self.user_repo.get_by_id(user_id).await?;
        let mut model: user::ActiveModel = user.into();

        if let Some(name) = input.name {
            model.name = Set(name);
        }
        if let Some(mobile) = input.mobile {
            model.mobile = Set(Some(mobile));
        }
        if let Some(avatar_url) = input.avatar_url {
            model.avatar_url = Set(Some(avatar_url));
        }
        model.updated_at = Set(Some(chrono::Utc::now().into()));

        self.user_repo.update(model).await
    }

    /// Change the caller's password, verifying the current one first.
    pub async fn change_password(
        &self,
        user_id: &str,
        input: ChangePasswordInput,
    ) -> AppResult<()> {
        input.validate()?;

        let user = self.user_repo.get_by_id(user_id).await?;

        if !super::auth::verify_password(&input.current_password, &user.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        let new_hash = super::auth::hash_password(&input.new_password, self.bcrypt_cost).await?;

        let mut model: user::ActiveModel = user.into();
        model.password_hash = Set(new_hash);
        model.updated_at = Set(Some(chrono::Utc::now().into()));
        self.user_repo.update(model).await?;

        Ok(())
    }

    /// Deactivate an account. Admin only; the API layer enforces the role.
    pub async fn deactivate(&self, user_id: &str) -> AppResult<()> {
        self.user_repo.get_by_id(user_id).await?;
        self.user_repo.deactivate(user_id).await
    }
}
