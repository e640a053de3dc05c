//! Audit repositories.

use std::sync::Arc;

use crate::entities::{audit_log, login_audit, AuditLog, LoginAudit};
use sampark_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// Administrative action log repository.
#[derive(Clone)]
pub struct AuditLogRepository {
    db: Arc<DatabaseConnection>,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record an entry.
    pub async fn record(&self, model: audit_log::ActiveModel) -> AppResult<audit_log::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Recent entries, newest first, optionally scoped to an actor.
    pub async fn list(
        &self,
        actor_id: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<audit_log::Model>> {
        let mut query = AuditLog::find().order_by_desc(audit_log::Column::CreatedAt);

        if let Some(actor) = actor_id {
            query = query.filter(audit_log::Column::ActorId.eq(actor));
        }

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Login audit repository.
#[derive(Clone)]
pub struct LoginAuditRepository {
    db: Arc<DatabaseConnection>,
}

impl LoginAuditRepository {
    /// Create a new login audit repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record a login attempt.
    pub async fn record(&self, model: login_audit::ActiveModel) -> AppResult<login_audit::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Recent attempts for a user, newest first.
    pub async fn list_for_user(
        &self,
        user_id: &str,
        limit: u64,
    ) -> AppResult<Vec<login_audit::Model>> {
        LoginAudit::find()
            .filter(login_audit::Column::UserId.eq(user_id))
            .order_by_desc(login_audit::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
