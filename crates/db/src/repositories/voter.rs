//! Voter record repository.

use std::sync::Arc;

use crate::entities::{
    voter::{self, VoterCategory},
    Voter,
};
use sampark_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

/// Filters for listing voters.
#[derive(Debug, Default, Clone)]
pub struct VoterFilter {
    pub ward: Option<String>,
    pub booth: Option<String>,
    pub category: Option<VoterCategory>,
    /// Matched against name and phone with a LIKE pattern.
    pub search: Option<String>,
}

/// Voter repository for database operations.
#[derive(Clone)]
pub struct VoterRepository {
    db: Arc<DatabaseConnection>,
}

impl VoterRepository {
    /// Create a new voter repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new voter record.
    pub async fn create(&self, model: voter::ActiveModel) -> AppResult<voter::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a voter by ID, erroring if absent.
    pub async fn get_by_id(&self, id: &str) -> AppResult<voter::Model> {
        Voter::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Voter {id} not found")))
    }

    /// Find the voter record linked to a user account.
    pub async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<voter::Model>> {
        Voter::find()
            .filter(voter::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a voter by phone number.
    pub async fn find_by_phone(&self, phone: &str) -> AppResult<Option<voter::Model>> {
        Voter::find()
            .filter(voter::Column::Phone.eq(phone))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a voter record.
    pub async fn update(&self, model: voter::ActiveModel) -> AppResult<voter::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a voter record.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Voter::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// List voters matching the filter, newest first.
    pub async fn list(
        &self,
        filter: &VoterFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<voter::Model>> {
        self.filtered(filter)
            .order_by_desc(voter::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count voters matching the filter.
    pub async fn count(&self, filter: &VoterFilter) -> AppResult<u64> {
        self.filtered(filter)
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count voters in a category.
    pub async fn count_by_category(&self, category: VoterCategory) -> AppResult<u64> {
        Voter::find()
            .filter(voter::Column::Category.eq(category))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    fn filtered(&self, filter: &VoterFilter) -> sea_orm::Select<Voter> {
        let mut query = Voter::find();

        if let Some(ward) = &filter.ward {
            query = query.filter(voter::Column::Ward.eq(ward));
        }
        if let Some(booth) = &filter.booth {
            query = query.filter(voter::Column::Booth.eq(booth));
        }
        if let Some(category) = filter.category {
            query = query.filter(voter::Column::Category.eq(category));
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{search}%");
            query = query.filter(
                Condition::any()
                    .add(voter::Column::Name.like(&pattern))
                    .add(voter::Column::Phone.like(&pattern)),
            );
        }

        query
    }
}
