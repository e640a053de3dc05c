//! Complaint repository.
//!
//! Lifecycle transitions are single conditional UPDATE statements filtered on
//! the expected prior state; the returned row count is the authoritative
//! answer to "did this call win the transition".

use std::sync::Arc;

use crate::entities::{
    complaint::{self, ComplaintStatus},
    Complaint,
};
use chrono::Utc;
use sampark_common::{AppError, AppResult};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

/// Filters for listing complaints.
#[derive(Debug, Default, Clone)]
pub struct ComplaintFilter {
    pub status: Option<ComplaintStatus>,
    pub assigned_to: Option<String>,
    pub created_by: Option<String>,
}

/// Complaint repository for database operations.
#[derive(Clone)]
pub struct ComplaintRepository {
    db: Arc<DatabaseConnection>,
}

impl ComplaintRepository {
    /// Create a new complaint repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new complaint.
    pub async fn create(&self, model: complaint::ActiveModel) -> AppResult<complaint::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a complaint by ID, erroring if absent.
    pub async fn get_by_id(&self, id: &str) -> AppResult<complaint::Model> {
        Complaint::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Complaint {id} not found")))
    }

    /// List complaints matching the filter, newest first.
    pub async fn list(
        &self,
        filter: &ComplaintFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<complaint::Model>> {
        let mut query = Complaint::find().order_by_desc(complaint::Column::CreatedAt);

        if let Some(status) = filter.status {
            query = query.filter(complaint::Column::Status.eq(status));
        }
        if let Some(assigned_to) = &filter.assigned_to {
            query = query.filter(complaint::Column::AssignedTo.eq(assigned_to));
        }
        if let Some(created_by) = &filter.created_by {
            query = query.filter(complaint::Column::CreatedBy.eq(created_by));
        }

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a complaint.
    pub async fn update(&self, model: complaint::ActiveModel) -> AppResult<complaint::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Assign a volunteer to an unassigned, unresolved complaint.
    ///
    /// Returns `false` when the complaint was already assigned or resolved.
    pub async fn assign(&self, id: &str, volunteer_id: &str) -> AppResult<bool> {
        let result = Complaint::update_many()
            .col_expr(complaint::Column::AssignedTo, Expr::value(volunteer_id))
            .col_expr(complaint::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(complaint::Column::Id.eq(id))
            .filter(complaint::Column::AssignedTo.is_null())
            .filter(complaint::Column::Status.ne(ComplaintStatus::Resolved))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Let a volunteer claim an unassigned pending complaint, taking it
    /// straight to `in_progress`.
    ///
    /// Returns `false` when the complaint was already claimed or is past
    /// pending; at most one caller wins the claim.
    pub async fn accept(&self, id: &str, volunteer_id: &str) -> AppResult<bool> {
        let result = Complaint::update_many()
            .col_expr(complaint::Column::AssignedTo, Expr::value(volunteer_id))
            .col_expr(
                complaint::Column::Status,
                Expr::value(ComplaintStatus::InProgress),
            )
            .col_expr(complaint::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(complaint::Column::Id.eq(id))
            .filter(complaint::Column::Status.eq(ComplaintStatus::Pending))
            .filter(complaint::Column::AssignedTo.is_null())
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Delete a complaint outright.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let result = Complaint::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Complaint {id} not found")));
        }
        Ok(())
    }

    /// Move a pending complaint to `in_progress`.
    pub async fn begin_resolution(&self, id: &str) -> AppResult<bool> {
        let result = Complaint::update_many()
            .col_expr(
                complaint::Column::Status,
                Expr::value(ComplaintStatus::InProgress),
            )
            .col_expr(complaint::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(complaint::Column::Id.eq(id))
            .filter(complaint::Column::Status.eq(ComplaintStatus::Pending))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Resolve an in-progress complaint, recording notes and proof.
    ///
    /// At most one caller observes `true` for a given complaint.
    pub async fn resolve(&self, id: &str, notes: &str, photo: Option<&str>) -> AppResult<bool> {
        let result = Complaint::update_many()
            .col_expr(
                complaint::Column::Status,
                Expr::value(ComplaintStatus::Resolved),
            )
            .col_expr(complaint::Column::ResolutionNotes, Expr::value(notes))
            .col_expr(complaint::Column::ResolutionPhoto, Expr::value(photo))
            .col_expr(complaint::Column::ResolvedAt, Expr::value(Utc::now()))
            .col_expr(complaint::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(complaint::Column::Id.eq(id))
            .filter(complaint::Column::Status.eq(ComplaintStatus::InProgress))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Flag a non-resolved complaint for admin attention.
    pub async fn flag(&self, id: &str) -> AppResult<bool> {
        let result = Complaint::update_many()
            .col_expr(
                complaint::Column::Status,
                Expr::value(ComplaintStatus::Flagged),
            )
            .col_expr(complaint::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(complaint::Column::Id.eq(id))
            .filter(complaint::Column::Status.ne(ComplaintStatus::Resolved))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Revert a flagged complaint back to `pending`. Admin only at the
    /// service layer.
    pub async fn reopen(&self, id: &str) -> AppResult<bool> {
        let result = Complaint::update_many()
            .col_expr(
                complaint::Column::Status,
                Expr::value(ComplaintStatus::Pending),
            )
            .col_expr(complaint::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(complaint::Column::Id.eq(id))
            .filter(complaint::Column::Status.eq(ComplaintStatus::Flagged))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Approve a resolved complaint for the public showcase.
    ///
    /// Returns `false` if the complaint is not resolved or was already
    /// approved, so the approval (and any point award tied to it) fires once.
    pub async fn approve_resolution(&self, id: &str) -> AppResult<bool> {
        let result = Complaint::update_many()
            .col_expr(complaint::Column::ApprovedByAdmin, Expr::value(true))
            .col_expr(complaint::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(complaint::Column::Id.eq(id))
            .filter(complaint::Column::Status.eq(ComplaintStatus::Resolved))
            .filter(complaint::Column::ApprovedByAdmin.eq(false))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Resolved complaints that an admin approved for public display.
    pub async fn showcase(&self, limit: u64, offset: u64) -> AppResult<Vec<complaint::Model>> {
        Complaint::find()
            .filter(complaint::Column::Status.eq(ComplaintStatus::Resolved))
            .filter(complaint::Column::ApprovedByAdmin.eq(true))
            .order_by_desc(complaint::Column::ResolvedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count complaints with a given status.
    pub async fn count_by_status(&self, status: ComplaintStatus) -> AppResult<u64> {
        Complaint::find()
            .filter(complaint::Column::Status.eq(status))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
