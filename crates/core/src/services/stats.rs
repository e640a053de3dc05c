//! Dashboard statistics service.

use sampark_common::AppResult;
use sampark_db::entities::{complaint::ComplaintStatus, task::TaskStatus, user::Role};
use sampark_db::repositories::{
    ComplaintRepository, TaskRepository, UserRepository, VolunteerRequestRepository,
    VoterRequestRepository,
};
use serde::Serialize;

use super::voter::{VoterBreakdown, VoterService};

/// Aggregate counts for the admin dashboard.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub volunteers: u64,
    pub voters: u64,
    pub pending_volunteer_requests: u64,
    pub pending_voter_requests: u64,
    pub complaints_pending: u64,
    pub complaints_in_progress: u64,
    pub complaints_resolved: u64,
    pub complaints_flagged: u64,
    pub tasks_pending: u64,
    pub tasks_in_progress: u64,
    pub tasks_completed: u64,
    pub voter_breakdown: VoterBreakdown,
}

/// Dashboard statistics service.
#[derive(Clone)]
pub struct StatsService {
    user_repo: UserRepository,
    complaint_repo: ComplaintRepository,
    task_repo: TaskRepository,
    volunteer_request_repo: VolunteerRequestRepository,
    voter_request_repo: VoterRequestRepository,
    voter_service: VoterService,
}

impl StatsService {
    /// Create a new statistics service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        complaint_repo: ComplaintRepository,
        task_repo: TaskRepository,
        volunteer_request_repo: VolunteerRequestRepository,
        voter_request_repo: VoterRequestRepository,
        voter_service: VoterService,
    ) -> Self {
        Self {
            user_repo,
            complaint_repo,
            task_repo,
            volunteer_request_repo,
            voter_request_repo,
            voter_service,
        }
    }

    /// Collect dashboard counts.
    pub async fn dashboard(&self) -> AppResult<DashboardStats> {
        Ok(DashboardStats {
            volunteers: self.user_repo.count_by_role(Role::Volunteer).await?,
            voters: self.user_repo.count_by_role(Role::Voter).await?,
            pending_volunteer_requests: self.volunteer_request_repo.count_pending().await?,
            pending_voter_requests: self.voter_request_repo.count_pending().await?,
            complaints_pending: self
                .complaint_repo
                .count_by_status(ComplaintStatus::Pending)
                .await?,
            complaints_in_progress: self
                .complaint_repo
                .count_by_status(ComplaintStatus::InProgress)
                .await?,
            complaints_resolved: self
                .complaint_repo
                .count_by_status(ComplaintStatus::Resolved)
                .await?,
            complaints_flagged: self
                .complaint_repo
                .count_by_status(ComplaintStatus::Flagged)
                .await?,
            tasks_pending: self.task_repo.count_by_status(TaskStatus::Pending).await?,
            tasks_in_progress: self
                .task_repo
                .count_by_status(TaskStatus::InProgress)
                .await?,
            tasks_completed: self
                .task_repo
                .count_by_status(TaskStatus::Completed)
                .await?,
            voter_breakdown: self.voter_service.breakdown().await?,
        })
    }
}
