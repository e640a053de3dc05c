//! Complaint lifecycle service.

use sampark_common::{AppError, AppResult};
use sampark_db::entities::{
    complaint,
    complaint::{ComplaintStatus, Priority},
    user::Role,
};
use sampark_db::repositories::{ComplaintFilter, ComplaintRepository, UserRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::gamification::GamificationService;

/// Input for filing a complaint.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateComplaintInput {
    #[validate(length(min = 3, max = 256))]
    pub title: String,
    #[validate(length(min = 10, max = 8192))]
    pub description: String,
    #[validate(length(max = 512))]
    pub location: Option<String>,
    pub priority: Option<Priority>,
}

/// Input for resolving a complaint. Notes are mandatory; a resolution with
/// nothing to say is not reviewable.
#[derive(Debug, Deserialize, Validate)]
pub struct ResolveComplaintInput {
    #[validate(length(min = 1, max = 8192))]
    pub resolution_notes: String,
    #[validate(length(max = 1024))]
    pub resolution_photo: Option<String>,
}

/// Complaint lifecycle service.
#[derive(Clone)]
pub struct ComplaintService {
    complaint_repo: ComplaintRepository,
    user_repo: UserRepository,
    gamification: GamificationService,
}

impl ComplaintService {
    /// Create a new complaint service.
    #[must_use]
    pub const fn new(
        complaint_repo: ComplaintRepository,
        user_repo: UserRepository,
        gamification: GamificationService,
    ) -> Self {
        Self {
            complaint_repo,
            user_repo,
            gamification,
        }
    }

    /// File a new complaint.
    pub async fn create(
        &self,
        created_by: &str,
        input: CreateComplaintInput,
    ) -> AppResult<complaint::Model> {
        input.validate()?;

        let model = complaint::ActiveModel {
            id: Set(crate::generate_id()),
            title: Set(input.title),
            description: Set(input.description),
            location: Set(input.location),
            status: Set(ComplaintStatus::Pending),
            priority: Set(input.priority.unwrap_or_default()),
            assigned_to: Set(None),
            created_by: Set(created_by.to_string()),
            resolution_notes: Set(None),
            resolution_photo: Set(None),
            resolved_at: Set(None),
            approved_by_admin: Set(false),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        self.complaint_repo.create(model).await
    }

    /// Get a complaint by ID.
    pub async fn get(&self, id: &str) -> AppResult<complaint::Model> {
        self.complaint_repo.get_by_id(id).await
    }

    /// List complaints.
    pub async fn list(
        &self,
        filter: &ComplaintFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<complaint::Model>> {
        self.complaint_repo.list(filter, limit, offset).await
    }

    /// Assign a volunteer to a complaint.
    ///
    /// The assignee must be an approved, active volunteer.
    pub async fn assign(&self, id: &str, volunteer_id: &str) -> AppResult<complaint::Model> {
        let volunteer = self.user_repo.get_by_id(volunteer_id).await?;
        if volunteer.role != Role::Volunteer || !volunteer.is_approved || !volunteer.is_active {
            return Err(AppError::BadRequest(
                "Assignee must be an active approved volunteer".to_string(),
            ));
        }

        if !self.complaint_repo.assign(id, volunteer_id).await? {
            return Err(AppError::NotFound(
                "Complaint is already assigned or resolved".to_string(),
            ));
        }

        self.complaint_repo.get_by_id(id).await
    }

    /// Let a volunteer claim an unassigned pending complaint for themselves.
    pub async fn accept(&self, id: &str, volunteer_id: &str) -> AppResult<complaint::Model> {
        let volunteer = self.user_repo.get_by_id(volunteer_id).await?;
        if !volunteer.is_approved || !volunteer.is_active {
            return Err(AppError::Forbidden(
                "Account is not eligible to accept complaints".to_string(),
            ));
        }

        if !self.complaint_repo.accept(id, volunteer_id).await? {
            return Err(AppError::NotFound(
                "Complaint is already assigned or not pending".to_string(),
            ));
        }

        self.complaint_repo.get_by_id(id).await
    }

    /// Delete a complaint. Admin only; the API layer enforces the role.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.complaint_repo.delete(id).await
    }

    /// Start working a pending complaint. Only the assignee (or an admin)
    /// may start it.
    pub async fn begin(&self, id: &str, actor_id: &str, actor_is_admin: bool) -> AppResult<()> {
        let complaint = self.complaint_repo.get_by_id(id).await?;
        self.ensure_assignee(&complaint, actor_id, actor_is_admin)?;

        if !self.complaint_repo.begin_resolution(id).await? {
            return Err(AppError::NotFound("Complaint is not pending".to_string()));
        }

        Ok(())
    }

    /// Resolve an in-progress complaint and pay the assignee's reward.
    ///
    /// The conditional status flip fires at most once, so the reward cannot
    /// be paid twice no matter how many resolve calls race.
    pub async fn resolve(
        &self,
        id: &str,
        actor_id: &str,
        actor_is_admin: bool,
        input: ResolveComplaintInput,
    ) -> AppResult<complaint::Model> {
        input.validate()?;

        let complaint = self.complaint_repo.get_by_id(id).await?;
        self.ensure_assignee(&complaint, actor_id, actor_is_admin)?;

        let won = self
            .complaint_repo
            .resolve(
                id,
                &input.resolution_notes,
                input.resolution_photo.as_deref(),
            )
            .await?;
        if !won {
            return Err(AppError::NotFound(
                "Complaint is not in progress".to_string(),
            ));
        }

        if let Some(assignee) = &complaint.assigned_to {
            self.gamification
                .award_complaint_resolution(assignee)
                .await?;
        }

        self.complaint_repo.get_by_id(id).await
    }

    /// Flag a complaint for admin attention.
    pub async fn flag(&self, id: &str) -> AppResult<()> {
        if !self.complaint_repo.flag(id).await? {
            return Err(AppError::NotFound(
                "Resolved complaints cannot be flagged".to_string(),
            ));
        }
        Ok(())
    }

    /// Return a flagged complaint to the pending pool. Admin only; the API
    /// layer enforces the role.
    pub async fn reopen(&self, id: &str) -> AppResult<()> {
        if !self.complaint_repo.reopen(id).await? {
            return Err(AppError::NotFound("Complaint is not flagged".to_string()));
        }
        Ok(())
    }

    /// Approve a resolved complaint for the public showcase.
    ///
    /// A pure display gate; the resolution reward was already paid when the
    /// complaint resolved.
    pub async fn approve_resolution(&self, id: &str) -> AppResult<complaint::Model> {
        if !self.complaint_repo.approve_resolution(id).await? {
            return Err(AppError::NotFound(
                "Complaint is not resolved or is already approved".to_string(),
            ));
        }

        self.complaint_repo.get_by_id(id).await
    }

    /// Approved resolutions for public display.
    pub async fn showcase(&self, limit: u64, offset: u64) -> AppResult<Vec<complaint::Model>> {
        self.complaint_repo.showcase(limit, offset).await
    }

    fn ensure_assignee(
        &self,
        complaint: &complaint::Model,
        actor_id: &str,
        actor_is_admin: bool,
    ) -> AppResult<()> {
        if actor_is_admin {
            return Ok(());
        }
        match &complaint.assigned_to {
            Some(assignee) if assignee == actor_id => Ok(()),
            _ => Err(AppError::Forbidden(
                "Only the assigned volunteer can work this complaint".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;
    use sampark_db::entities::user;
    use sampark_db::repositories::BadgeRepository;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};

    fn service(db: Arc<DatabaseConnection>) -> ComplaintService {
        ComplaintService::new(
            ComplaintRepository::new(db.clone()),
            UserRepository::new(db.clone()),
            GamificationService::new(UserRepository::new(db.clone()), BadgeRepository::new(db)),
        )
    }

    fn complaint_row(status: ComplaintStatus, assigned_to: Option<&str>) -> complaint::Model {
        complaint::Model {
            id: "c1".to_string(),
            title: "Broken streetlight".to_string(),
            description: "The light at the corner has been out for a week".to_string(),
            location: Some("Ward 4".to_string()),
            status,
            priority: Priority::Medium,
            assigned_to: assigned_to.map(String::from),
            created_by: "voter1".to_string(),
            resolution_notes: None,
            resolution_photo: None,
            resolved_at: None,
            approved_by_admin: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn volunteer(id: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            name: "Ravi Kumar".to_string(),
            email: "ravi@example.org".to_string(),
            mobile: None,
            role: user::Role::Volunteer,
            password_hash: "hash".to_string(),
            avatar_url: None,
            is_approved: true,
            approved_by: None,
            approved_at: None,
            last_login_at: None,
            is_active: true,
            points: 0,
            level: 1,
            tasks_completed: 0,
            complaints_resolved: 0,
            collaborations: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_resolve_requires_assignee() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[complaint_row(
                    ComplaintStatus::InProgress,
                    Some("vol1"),
                )]])
                .into_connection(),
        );
        let service = service(db);

        let result = service
            .resolve(
                "c1",
                "someone-else",
                false,
                ResolveComplaintInput {
                    resolution_notes: "Replaced the bulb".to_string(),
                    resolution_photo: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_resolve_without_notes_rejected() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = service(db);

        let result = service
            .resolve(
                "c1",
                "vol1",
                false,
                ResolveComplaintInput {
                    resolution_notes: String::new(),
                    resolution_photo: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_accept_already_claimed_fails() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[volunteer("vol1")]])
                // conditional claim touches zero rows
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );
        let service = service(db);

        let result = service.accept("c1", "vol1").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_resolve_pays_reward_to_assignee() {
        let mut resolved = complaint_row(ComplaintStatus::Resolved, Some("vol1"));
        resolved.resolution_notes = Some("Replaced the bulb".to_string());

        let mut rewarded = volunteer("vol1");
        rewarded.points = 15;
        rewarded.complaints_resolved = 1;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // complaint lookup
                .append_query_results([[complaint_row(
                    ComplaintStatus::InProgress,
                    Some("vol1"),
                )]])
                // winning resolve flip, point credit, counter bump
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                // counter read-back for level/badge refresh
                .append_query_results([[rewarded]])
                // final re-read
                .append_query_results([[resolved]])
                .into_connection(),
        );
        let service = service(db);

        let complaint = service
            .resolve(
                "c1",
                "vol1",
                false,
                ResolveComplaintInput {
                    resolution_notes: "Replaced the bulb".to_string(),
                    resolution_photo: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(complaint.status, ComplaintStatus::Resolved);
    }

    #[tokio::test]
    async fn test_assign_rejects_unapproved_volunteer() {
        let mut unapproved = volunteer("vol1");
        unapproved.is_approved = false;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[unapproved]])
                .into_connection(),
        );
        let service = service(db);

        let result = service.assign("c1", "vol1").await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_approve_resolution_twice_fails() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // conditional approval touches zero rows the second time
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );
        let service = service(db);

        let result = service.approve_resolution("c1").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
