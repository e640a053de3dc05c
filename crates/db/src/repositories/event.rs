//! Event repository.

use std::sync::Arc;

use crate::entities::{event, Event};
use chrono::Utc;
use sampark_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// Event repository for database operations.
#[derive(Clone)]
pub struct EventRepository {
    db: Arc<DatabaseConnection>,
}

impl EventRepository {
    /// Create a new event repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new event.
    pub async fn create(&self, model: event::ActiveModel) -> AppResult<event::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an event by ID, erroring if absent.
    pub async fn get_by_id(&self, id: &str) -> AppResult<event::Model> {
        Event::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Event {id} not found")))
    }

    /// List events, newest start first.
    pub async fn list(&self, limit: u64, offset: u64) -> AppResult<Vec<event::Model>> {
        Event::find()
            .order_by_desc(event::Column::StartsAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Events that have not started yet, soonest first.
    pub async fn upcoming(&self, limit: u64) -> AppResult<Vec<event::Model>> {
        Event::find()
            .filter(event::Column::StartsAt.gt(Utc::now()))
            .order_by_asc(event::Column::StartsAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an event.
    pub async fn update(&self, model: event::ActiveModel) -> AppResult<event::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an event.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Event::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
