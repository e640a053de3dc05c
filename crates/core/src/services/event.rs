//! Campaign event service.

use sampark_common::{AppError, AppResult};
use sampark_db::entities::event;
use sampark_db::repositories::EventRepository;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for creating an event.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEventInput {
    #[validate(length(min = 3, max = 256))]
    pub title: String,
    #[validate(length(min = 1, max = 8192))]
    pub description: String,
    #[validate(length(max = 512))]
    pub location: Option<String>,
    pub starts_at: chrono::DateTime<chrono::Utc>,
    pub ends_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Input for updating an event. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEventInput {
    #[validate(length(min = 3, max = 256))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 8192))]
    pub description: Option<String>,
    #[validate(length(max = 512))]
    pub location: Option<String>,
    pub starts_at: Option<chrono::DateTime<chrono::Utc>>,
    pub ends_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Campaign event service.
#[derive(Clone)]
pub struct EventService {
    event_repo: EventRepository,
}

impl EventService {
    /// Create a new event service.
    #[must_use]
    pub const fn new(event_repo: EventRepository) -> Self {
        Self { event_repo }
    }

    /// Create an event.
    pub async fn create(&self, created_by: &str, input: CreateEventInput) -> AppResult<event::Model> {
        input.validate()?;

        if let Some(ends_at) = input.ends_at {
            if ends_at <= input.starts_at {
                return Err(AppError::Validation(
                    "Event must end after it starts".to_string(),
                ));
            }
        }

        let model = event::ActiveModel {
            id: Set(crate::generate_id()),
            title: Set(input.title),
            description: Set(input.description),
            location: Set(input.location),
            starts_at: Set(input.starts_at.into()),
            ends_at: Set(input.ends_at.map(Into::into)),
            created_by: Set(created_by.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.event_repo.create(model).await
    }

    /// Get an event by ID.
    pub async fn get(&self, id: &str) -> AppResult<event::Model> {
        self.event_repo.get_by_id(id).await
    }

    /// List events.
    pub async fn list(&self, limit: u64, offset: u64) -> AppResult<Vec<event::Model>> {
        self.event_repo.list(limit, offset).await
    }

    /// Upcoming events, soonest first.
    pub async fn upcoming(&self, limit: u64) -> AppResult<Vec<event::Model>> {
        self.event_repo.upcoming(limit).await
    }

    /// Update an event.
    pub async fn update(&self, id: &str, input: UpdateEventInput) -> AppResult<event::Model> {
        input.validate()?;

        let event = self.event_repo.get_by_id(id).await?;
        let mut model: event::ActiveModel = event.into();

        if let Some(title) = input.title {
            model.title = Set(title);
        }
        if let Some(description) = input.description {
            model.description = Set(description);
        }
        if let Some(location) = input.location {
            model.location = Set(Some(location));
        }
        if let Some(starts_at) = input.starts_at {
            model.starts_at = Set(starts_at.into());
        }
        if let Some(ends_at) = input.ends_at {
            model.ends_at = Set(Some(ends_at.into()));
        }

        self.event_repo.update(model).await
    }

    /// Delete an event.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.event_repo.get_by_id(id).await?;
        self.event_repo.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_rejects_end_before_start() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = EventService::new(EventRepository::new(db));

        let starts_at = Utc::now() + Duration::days(1);
        let result = service
            .create(
                "admin1",
                CreateEventInput {
                    title: "Rally at the maidan".to_string(),
                    description: "Bring water".to_string(),
                    location: None,
                    starts_at,
                    ends_at: Some(starts_at - Duration::hours(2)),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
