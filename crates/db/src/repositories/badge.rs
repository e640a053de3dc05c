//! Badge repository.

use std::sync::Arc;

use crate::entities::{badge, Badge};
use chrono::Utc;
use sampark_common::{generate_id, AppError, AppResult};
use sea_orm::{
    sea_query::OnConflict, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder,
};

/// Badge repository for database operations.
#[derive(Clone)]
pub struct BadgeRepository {
    db: Arc<DatabaseConnection>,
}

impl BadgeRepository {
    /// Create a new badge repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Award a badge if the user does not already hold it.
    ///
    /// Backed by the unique (user, badge) index with a do-nothing conflict
    /// clause, so concurrent awards collapse to a single row. Returns `true`
    /// only for the call that inserted.
    pub async fn award_once(&self, user_id: &str, badge: &str) -> AppResult<bool> {
        let model = badge::ActiveModel {
            id: Set(generate_id()),
            user_id: Set(user_id.to_string()),
            badge: Set(badge.to_string()),
            awarded_at: Set(Utc::now().into()),
        };

        let result = Badge::insert(model)
            .on_conflict(
                OnConflict::columns([badge::Column::UserId, badge::Column::Badge])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result > 0)
    }

    /// Badges held by a user, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<badge::Model>> {
        Badge::find()
            .filter(badge::Column::UserId.eq(user_id))
            .order_by_desc(badge::Column::AwardedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Whether the user holds a badge.
    pub async fn has_badge(&self, user_id: &str, badge: &str) -> AppResult<bool> {
        let found = Badge::find()
            .filter(badge::Column::UserId.eq(user_id))
            .filter(badge::Column::Badge.eq(badge))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(found.is_some())
    }
}
