//! User repository.

use std::sync::Arc;

use crate::entities::{
    user::{self, Role},
    User,
};
use chrono::Utc;
use sampark_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new user.
    pub async fn create(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a user by ID, erroring if absent.
    pub async fn get_by_id(&self, id: &str) -> AppResult<user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by email (case-insensitive on the stored lowercase form).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Email.eq(email.to_lowercase()))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by mobile number.
    pub async fn find_by_mobile(&self, mobile: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Mobile.eq(mobile))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a user.
    pub async fn update(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List users, optionally filtered by role.
    pub async fn list(
        &self,
        role: Option<Role>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<user::Model>> {
        let mut query = User::find().order_by_desc(user::Column::CreatedAt);

        if let Some(r) = role {
            query = query.filter(user::Column::Role.eq(r));
        }

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count users with a given role.
    pub async fn count_by_role(&self, role: Role) -> AppResult<u64> {
        User::find()
            .filter(user::Column::Role.eq(role))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Top volunteers by points.
    pub async fn leaderboard(&self, limit: u64) -> AppResult<Vec<user::Model>> {
        User::find()
            .filter(user::Column::Role.eq(Role::Volunteer))
            .filter(user::Column::IsActive.eq(true))
            .order_by_desc(user::Column::Points)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Add points atomically.
    pub async fn add_points(&self, id: &str, points: i32) -> AppResult<()> {
        use sea_orm::sea_query::Expr;

        User::update_many()
            .col_expr(
                user::Column::Points,
                Expr::col(user::Column::Points).add(points),
            )
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Increment the completed-tasks counter atomically.
    pub async fn increment_tasks_completed(&self, id: &str) -> AppResult<()> {
        use sea_orm::sea_query::Expr;

        User::update_many()
            .col_expr(
                user::Column::TasksCompleted,
                Expr::col(user::Column::TasksCompleted).add(1),
            )
            .filter(user::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Increment the resolved-complaints counter atomically.
    pub async fn increment_complaints_resolved(&self, id: &str) -> AppResult<()> {
        use sea_orm::sea_query::Expr;

        User::update_many()
            .col_expr(
                user::Column::ComplaintsResolved,
                Expr::col(user::Column::ComplaintsResolved).add(1),
            )
            .filter(user::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Increment the collaborations counter atomically.
    pub async fn increment_collaborations(&self, id: &str) -> AppResult<()> {
        use sea_orm::sea_query::Expr;

        User::update_many()
            .col_expr(
                user::Column::Collaborations,
                Expr::col(user::Column::Collaborations).add(1),
            )
            .filter(user::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Set the computed level.
    pub async fn set_level(&self, id: &str, level: i32) -> AppResult<()> {
        use sea_orm::sea_query::Expr;

        User::update_many()
            .col_expr(user::Column::Level, Expr::value(level))
            .filter(user::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Record a successful login timestamp.
    pub async fn touch_last_login(&self, id: &str) -> AppResult<()> {
        use sea_orm::sea_query::Expr;

        User::update_many()
            .col_expr(user::Column::LastLoginAt, Expr::value(Utc::now()))
            .filter(user::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Deactivate a user account.
    pub async fn deactivate(&self, id: &str) -> AppResult<()> {
        use sea_orm::sea_query::Expr;

        User::update_many()
            .col_expr(user::Column::IsActive, Expr::value(false))
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
