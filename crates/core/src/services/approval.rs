//! Registration approval service.
//!
//! Promotion from request to account happens inside a transaction: the
//! request flips to its terminal status and the account rows are created
//! together, or not at all. The status flip is a conditional UPDATE on the
//! pending state, so two admins reviewing the same request cannot both
//! promote it; the loser gets a not-found error and no second account.

use chrono::Utc;
use sampark_common::{AppError, AppResult};
use sampark_db::entities::{
    user, user::Role, voter, voter::VoterCategory, volunteer_request,
    volunteer_request::RequestStatus,
};
use sampark_db::repositories::{VolunteerRequestRepository, VoterRequestRepository};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, warn};

use super::email::EmailService;

/// Registration approval service.
#[derive(Clone)]
pub struct ApprovalService {
    db: Arc<DatabaseConnection>,
    volunteer_repo: VolunteerRequestRepository,
    voter_repo: VoterRequestRepository,
    email: EmailService,
}

impl ApprovalService {
    /// Create a new approval service.
    #[must_use]
    pub const fn new(
        db: Arc<DatabaseConnection>,
        volunteer_repo: VolunteerRequestRepository,
        voter_repo: VoterRequestRepository,
        email: EmailService,
    ) -> Self {
        Self {
            db,
            volunteer_repo,
            voter_repo,
            email,
        }
    }

    /// Approve a volunteer request, creating the volunteer account.
    pub async fn approve_volunteer(
        &self,
        request_id: &str,
        reviewer_id: &str,
    ) -> AppResult<user::Model> {
        let request = self.volunteer_repo.get_by_id(request_id).await?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let won = self
            .volunteer_repo
            .mark_reviewed(&txn, request_id, RequestStatus::Approved, reviewer_id)
            .await?;
        if !won {
            txn.rollback()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Err(AppError::NotFound(format!(
                "Request {request_id} not found or already reviewed"
            )));
        }

        let created = promote_account(
            &txn,
            &request.email,
            Role::Volunteer,
            reviewer_id,
            || user::ActiveModel {
                id: Set(crate::generate_id()),
                name: Set(request.name.clone()),
                email: Set(request.email.clone()),
                mobile: Set(request.mobile.clone()),
                role: Set(Role::Volunteer),
                password_hash: Set(request.password_hash.clone()),
                avatar_url: Set(request.avatar_url.clone()),
                is_approved: Set(true),
                approved_by: Set(Some(reviewer_id.to_string())),
                approved_at: Set(Some(Utc::now().into())),
                last_login_at: Set(None),
                is_active: Set(true),
                points: Set(0),
                level: Set(1),
                tasks_completed: Set(0),
                complaints_resolved: Set(0),
                collaborations: Set(0),
                created_at: Set(Utc::now().into()),
                updated_at: Set(None),
            },
        )
        .await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(user_id = %created.id, request_id, "Volunteer request approved");
        self.notify_reviewed(&request.email, &request.name, true)
            .await;

        Ok(created)
    }

    /// Reject a volunteer request.
    pub async fn reject_volunteer(&self, request_id: &str, reviewer_id: &str) -> AppResult<()> {
        let request = self.volunteer_repo.get_by_id(request_id).await?;

        let won = self
            .volunteer_repo
            .mark_reviewed(
                self.db.as_ref(),
                request_id,
                RequestStatus::Rejected,
                reviewer_id,
            )
            .await?;
        if !won {
            return Err(AppError::NotFound(format!(
                "Request {request_id} not found or already reviewed"
            )));
        }

        info!(request_id, "Volunteer request rejected");
        self.notify_reviewed(&request.email, &request.name, false)
            .await;

        Ok(())
    }

    /// Approve a voter request, creating the voter account and record.
    pub async fn approve_voter(
        &self,
        request_id: &str,
        reviewer_id: &str,
    ) -> AppResult<user::Model> {
        let request = self.voter_repo.get_by_id(request_id).await?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let won = self
            .voter_repo
            .mark_reviewed(&txn, request_id, RequestStatus::Approved, reviewer_id)
            .await?;
        if !won {
            txn.rollback()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Err(AppError::NotFound(format!(
                "Request {request_id} not found or already reviewed"
            )));
        }

        let created = promote_account(
            &txn,
            &request.email,
            Role::Voter,
            reviewer_id,
            || user::ActiveModel {
                id: Set(crate::generate_id()),
                name: Set(request.name.clone()),
                email: Set(request.email.clone()),
                mobile: Set(request.mobile.clone()),
                role: Set(Role::Voter),
                password_hash: Set(request.password_hash.clone()),
                avatar_url: Set(None),
                is_approved: Set(true),
                approved_by: Set(Some(reviewer_id.to_string())),
                approved_at: Set(Some(Utc::now().into())),
                last_login_at: Set(None),
                is_active: Set(true),
                points: Set(0),
                level: Set(1),
                tasks_completed: Set(0),
                complaints_resolved: Set(0),
                collaborations: Set(0),
                created_at: Set(Utc::now().into()),
                updated_at: Set(None),
            },
        )
        .await?;

        let now = Utc::now();

        // Voter roll entry linked to the account. The externally issued
        // voter-ID rides along in the notes field.
        let voter_model = voter::ActiveModel {
            id: Set(crate::generate_id()),
            user_id: Set(Some(created.id.clone())),
            name: Set(request.name.clone()),
            phone: Set(request.mobile.clone()),
            address: Set(request.address.clone()),
            ward: Set(request.ward.clone()),
            booth: Set(request.area.clone()),
            category: Set(VoterCategory::Supporter),
            notes: Set(request
                .voter_id_number
                .as_ref()
                .map(|epic| format!("Voter ID: {epic}"))),
            created_at: Set(now.into()),
            updated_at: Set(None),
        };

        voter_model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(user_id = %created.id, request_id, "Voter request approved");
        self.notify_reviewed(&request.email, &request.name, true)
            .await;

        Ok(created)
    }

    /// Reject a voter request.
    pub async fn reject_voter(&self, request_id: &str, reviewer_id: &str) -> AppResult<()> {
        let request = self.voter_repo.get_by_id(request_id).await?;

        let won = self
            .voter_repo
            .mark_reviewed(
                self.db.as_ref(),
                request_id,
                RequestStatus::Rejected,
                reviewer_id,
            )
            .await?;
        if !won {
            return Err(AppError::NotFound(format!(
                "Request {request_id} not found or already reviewed"
            )));
        }

        info!(request_id, "Voter request rejected");
        self.notify_reviewed(&request.email, &request.name, false)
            .await;

        Ok(())
    }

    /// Notify the applicant of the outcome. Best effort.
    async fn notify_reviewed(&self, email: &str, name: &str, approved: bool) {
        let result = if approved {
            self.email.send_approval_notice(email, name).await
        } else {
            self.email.send_rejection_notice(email, name).await
        };

        if let Err(e) = result {
            warn!(error = %e, email, "Failed to send review notification");
        }
    }
}

/// Create or upgrade the credential record for an approved request.
///
/// Email is the sole identity invariant: when the address already owns an
/// account (a registered voter applying to volunteer, say), the approval
/// flips role and approval on that row instead of creating a second one.
async fn promote_account<C, F>(
    conn: &C,
    email: &str,
    role: Role,
    reviewer_id: &str,
    fresh: F,
) -> AppResult<user::Model>
where
    C: ConnectionTrait,
    F: FnOnce() -> user::ActiveModel,
{
    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(conn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    match existing {
        Some(account) => {
            let now = Utc::now();
            let mut model: user::ActiveModel = account.into();
            model.role = Set(role);
            model.is_approved = Set(true);
            model.approved_by = Set(Some(reviewer_id.to_string()));
            model.approved_at = Set(Some(now.into()));
            model.updated_at = Set(Some(now.into()));
            model
                .update(conn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))
        }
        None => fresh()
            .insert(conn)
            .await
            .map_err(|e| map_insert_err(&e, email)),
    }
}

/// Unique violations on the user insert mean the identity got taken between
/// intake and approval.
fn map_insert_err(err: &sea_orm::DbErr, email: &str) -> AppError {
    let message = err.to_string();
    if message.contains("duplicate key") || message.contains("unique constraint") {
        AppError::DuplicateIdentity(email.to_string())
    } else {
        AppError::Database(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn pending_request(id: &str) -> volunteer_request::Model {
        volunteer_request::Model {
            id: id.to_string(),
            name: "Ravi Kumar".to_string(),
            email: "ravi@example.org".to_string(),
            mobile: Some("9123456780".to_string()),
            password_hash: "$2b$04$hash".to_string(),
            avatar_url: None,
            message: None,
            status: RequestStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            created_at: Utc::now().into(),
        }
    }

    fn service(db: Arc<DatabaseConnection>) -> ApprovalService {
        ApprovalService::new(
            db.clone(),
            VolunteerRequestRepository::new(db.clone()),
            VoterRequestRepository::new(db),
            EmailService::new(None, "http://localhost:3000".to_string()),
        )
    }

    #[tokio::test]
    async fn test_approve_volunteer_already_reviewed_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // initial request load
                .append_query_results([[pending_request("req1")]])
                // conditional review update touches zero rows
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );
        let service = service(db);

        let result = service.approve_volunteer("req1", "admin1").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_reject_volunteer_already_reviewed_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[pending_request("req1")]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );
        let service = service(db);

        let result = service.reject_volunteer("req1", "admin1").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_reject_volunteer_pending_succeeds() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[pending_request("req1")]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let service = service(db);

        service.reject_volunteer("req1", "admin1").await.unwrap();
    }
}
