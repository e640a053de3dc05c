//! Task repository.

use std::sync::Arc;

use crate::entities::{
    task::{self, TaskStatus},
    Task,
};
use chrono::Utc;
use sampark_common::{AppError, AppResult};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

/// Filters for listing tasks.
#[derive(Debug, Default, Clone)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<String>,
    pub created_by: Option<String>,
}

/// Task repository for database operations.
#[derive(Clone)]
pub struct TaskRepository {
    db: Arc<DatabaseConnection>,
}

impl TaskRepository {
    /// Create a new task repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new task.
    pub async fn create(&self, model: task::ActiveModel) -> AppResult<task::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a task by ID, erroring if absent.
    pub async fn get_by_id(&self, id: &str) -> AppResult<task::Model> {
        Task::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Task {id} not found")))
    }

    /// List tasks matching the filter, newest first.
    pub async fn list(
        &self,
        filter: &TaskFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<task::Model>> {
        let mut query = Task::find().order_by_desc(task::Column::CreatedAt);

        if let Some(status) = filter.status {
            query = query.filter(task::Column::Status.eq(status));
        }
        if let Some(assigned_to) = &filter.assigned_to {
            query = query.filter(task::Column::AssignedTo.eq(assigned_to));
        }
        if let Some(created_by) = &filter.created_by {
            query = query.filter(task::Column::CreatedBy.eq(created_by));
        }

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a task.
    pub async fn update(&self, model: task::ActiveModel) -> AppResult<task::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Assign a volunteer to an incomplete task. The status is untouched;
    /// the assignee starts the task themselves.
    pub async fn assign(&self, id: &str, volunteer_id: &str) -> AppResult<bool> {
        let result = Task::update_many()
            .col_expr(task::Column::AssignedTo, Expr::value(volunteer_id))
            .col_expr(task::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(task::Column::Id.eq(id))
            .filter(task::Column::Status.ne(TaskStatus::Completed))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Move a pending task to `in_progress`.
    pub async fn begin(&self, id: &str) -> AppResult<bool> {
        let result = Task::update_many()
            .col_expr(task::Column::Status, Expr::value(TaskStatus::InProgress))
            .col_expr(task::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(task::Column::Id.eq(id))
            .filter(task::Column::Status.eq(TaskStatus::Pending))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Complete a task.
    ///
    /// Guarded on the prior status, so exactly one caller observes `true`
    /// and the completion reward is paid once.
    pub async fn complete(&self, id: &str) -> AppResult<bool> {
        let result = Task::update_many()
            .col_expr(task::Column::Status, Expr::value(TaskStatus::Completed))
            .col_expr(task::Column::CompletedAt, Expr::value(Utc::now()))
            .col_expr(task::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(task::Column::Id.eq(id))
            .filter(task::Column::Status.ne(TaskStatus::Completed))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Delete a task outright.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let result = Task::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Task {id} not found")));
        }
        Ok(())
    }

    /// Add a collaborator to a task if not already present.
    ///
    /// A single conditional jsonb append: the membership check lives in the
    /// WHERE clause, so two racing joins cannot lose an entry or both count
    /// as the first join. Returns `false` if the user already collaborates
    /// on the task or the task is completed.
    pub async fn add_collaborator(&self, id: &str, user_id: &str) -> AppResult<bool> {
        let member = serde_json::json!([user_id]).to_string();
        let result = Task::update_many()
            .col_expr(
                task::Column::Collaborators,
                Expr::cust_with_values("collaborators || ?::jsonb", [member.clone()]),
            )
            .col_expr(task::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(task::Column::Id.eq(id))
            .filter(task::Column::Status.ne(TaskStatus::Completed))
            .filter(Expr::cust_with_values(
                "NOT (collaborators @> ?::jsonb)",
                [member],
            ))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Count tasks with a given status.
    pub async fn count_by_status(&self, status: TaskStatus) -> AppResult<u64> {
        Task::find()
            .filter(task::Column::Status.eq(status))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
