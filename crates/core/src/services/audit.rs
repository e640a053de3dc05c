//! Administrative action auditing.

use sampark_common::AppResult;
use sampark_db::entities::audit_log;
use sampark_db::repositories::AuditLogRepository;
use sea_orm::Set;
use tracing::warn;

/// Audit service for administrative actions.
#[derive(Clone)]
pub struct AuditService {
    audit_repo: AuditLogRepository,
}

impl AuditService {
    /// Create a new audit service.
    #[must_use]
    pub const fn new(audit_repo: AuditLogRepository) -> Self {
        Self { audit_repo }
    }

    /// Record an administrative action. Best effort; auditing must never
    /// fail the action it describes.
    pub async fn record(
        &self,
        actor_id: &str,
        action: &str,
        target_kind: Option<&str>,
        target_id: Option<&str>,
        detail: Option<serde_json::Value>,
    ) {
        let model = audit_log::ActiveModel {
            id: Set(crate::generate_id()),
            actor_id: Set(actor_id.to_string()),
            action: Set(action.to_string()),
            target_kind: Set(target_kind.map(String::from)),
            target_id: Set(target_id.map(String::from)),
            detail: Set(detail),
            created_at: Set(chrono::Utc::now().into()),
        };

        if let Err(e) = self.audit_repo.record(model).await {
            warn!(error = %e, action, "Failed to record audit entry");
        }
    }

    /// Recent entries, optionally scoped to an actor.
    pub async fn list(
        &self,
        actor_id: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<audit_log::Model>> {
        self.audit_repo.list(actor_id, limit, offset).await
    }
}
