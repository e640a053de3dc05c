//! Task lifecycle service.

use sampark_common::{AppError, AppResult};
use sampark_db::entities::{
    complaint::Priority,
    task,
    task::TaskStatus,
    user::Role,
};
use sampark_db::repositories::{TaskFilter, TaskRepository, UserRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::gamification::{GamificationService, DEFAULT_TASK_POINTS};

/// Input for creating a task.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskInput {
    #[validate(length(min = 3, max = 256))]
    pub title: String,
    #[validate(length(min = 1, max = 8192))]
    pub description: String,
    pub priority: Option<Priority>,
    pub assigned_to: Option<String>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    #[validate(range(min = 1, max = 1000))]
    pub points_reward: Option<i32>,
}

/// Task lifecycle service.
#[derive(Clone)]
pub struct TaskService {
    task_repo: TaskRepository,
    user_repo: UserRepository,
    gamification: GamificationService,
}

impl TaskService {
    /// Create a new task service.
    #[must_use]
    pub const fn new(
        task_repo: TaskRepository,
        user_repo: UserRepository,
        gamification: GamificationService,
    ) -> Self {
        Self {
            task_repo,
            user_repo,
            gamification,
        }
    }

    /// Create a task.
    pub async fn create(&self, created_by: &str, input: CreateTaskInput) -> AppResult<task::Model> {
        input.validate()?;

        if let Some(assignee) = &input.assigned_to {
            self.ensure_active_volunteer(assignee).await?;
        }

        // Assigned or not, a new task waits for its assignee to start it.
        let model = task::ActiveModel {
            id: Set(crate::generate_id()),
            title: Set(input.title),
            description: Set(input.description),
            status: Set(TaskStatus::Pending),
            priority: Set(input.priority.unwrap_or_default()),
            assigned_to: Set(input.assigned_to),
            created_by: Set(created_by.to_string()),
            due_date: Set(input.due_date.map(Into::into)),
            points_reward: Set(input.points_reward.unwrap_or(DEFAULT_TASK_POINTS)),
            completed_at: Set(None),
            collaborators: Set(serde_json::json!([])),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        self.task_repo.create(model).await
    }

    /// Get a task by ID.
    pub async fn get(&self, id: &str) -> AppResult<task::Model> {
        self.task_repo.get_by_id(id).await
    }

    /// List tasks.
    pub async fn list(
        &self,
        filter: &TaskFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<task::Model>> {
        self.task_repo.list(filter, limit, offset).await
    }

    /// Assign a volunteer to a task.
    pub async fn assign(&self, id: &str, volunteer_id: &str) -> AppResult<task::Model> {
        self.ensure_active_volunteer(volunteer_id).await?;

        if !self.task_repo.assign(id, volunteer_id).await? {
            return Err(AppError::NotFound("Task is already completed".to_string()));
        }

        self.task_repo.get_by_id(id).await
    }

    /// Start a pending task. Only the assignee (or an admin) may start it.
    pub async fn begin(&self, id: &str, actor_id: &str, actor_is_admin: bool) -> AppResult<()> {
        let task = self.task_repo.get_by_id(id).await?;

        if !actor_is_admin && task.assigned_to.as_deref() != Some(actor_id) {
            return Err(AppError::Forbidden(
                "Only the assigned volunteer can start this task".to_string(),
            ));
        }

        if !self.task_repo.begin(id).await? {
            return Err(AppError::NotFound("Task is not pending".to_string()));
        }

        Ok(())
    }

    /// Complete a task and pay the assignee's reward.
    ///
    /// The completion flip fires at most once, so the reward is paid once
    /// no matter how many completion calls race.
    pub async fn complete(
        &self,
        id: &str,
        actor_id: &str,
        actor_is_admin: bool,
    ) -> AppResult<task::Model> {
        let task = self.task_repo.get_by_id(id).await?;

        if !actor_is_admin && task.assigned_to.as_deref() != Some(actor_id) {
            return Err(AppError::Forbidden(
                "Only the assigned volunteer can complete this task".to_string(),
            ));
        }

        if !self.task_repo.complete(id).await? {
            return Err(AppError::NotFound("Task is already completed".to_string()));
        }

        if let Some(assignee) = &task.assigned_to {
            self.gamification
                .award_task_completion(assignee, task.points_reward)
                .await?;
        }

        self.task_repo.get_by_id(id).await
    }

    /// Delete a task. Admin only; the API layer enforces the role.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.task_repo.delete(id).await
    }

    /// Join a task as a collaborator.
    ///
    /// The assignee is not a collaborator of their own task; everyone else
    /// gets the collaboration reward on first join only.
    pub async fn join(&self, id: &str, user_id: &str) -> AppResult<task::Model> {
        self.ensure_active_volunteer(user_id).await?;

        let task = self.task_repo.get_by_id(id).await?;
        if task.assigned_to.as_deref() == Some(user_id) {
            return Err(AppError::BadRequest(
                "Assignee is already working this task".to_string(),
            ));
        }

        if self.task_repo.add_collaborator(id, user_id).await? {
            self.gamification.award_collaboration(user_id).await?;
        }

        self.task_repo.get_by_id(id).await
    }

    async fn ensure_active_volunteer(&self, user_id: &str) -> AppResult<()> {
        let user = self.user_repo.get_by_id(user_id).await?;
        if user.role != Role::Volunteer || !user.is_approved || !user.is_active {
            return Err(AppError::BadRequest(
                "User must be an active approved volunteer".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;
    use sampark_db::repositories::BadgeRepository;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};

    fn service(db: Arc<DatabaseConnection>) -> TaskService {
        TaskService::new(
            TaskRepository::new(db.clone()),
            UserRepository::new(db.clone()),
            GamificationService::new(UserRepository::new(db.clone()), BadgeRepository::new(db)),
        )
    }

    fn volunteer(id: &str) -> sampark_db::entities::user::Model {
        sampark_db::entities::user::Model {
            id: id.to_string(),
            name: "Ravi Kumar".to_string(),
            email: "ravi@example.org".to_string(),
            mobile: None,
            role: Role::Volunteer,
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

    fn task_row(status: TaskStatus, assigned_to: Option<&str>) -> task::Model {
        task::Model {
            id: "t1".to_string(),
            title: "Door to door".to_string(),
            description: "Cover booth 12".to_string(),
            status,
            priority: Priority::Medium,
            assigned_to: assigned_to.map(String::from),
            created_by: "admin1".to_string(),
            due_date: None,
            points_reward: DEFAULT_TASK_POINTS,
            completed_at: None,
            collaborators: serde_json::json!([]),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_complete_requires_assignee() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[task_row(TaskStatus::InProgress, Some("vol1"))]])
                .into_connection(),
        );
        let service = service(db);

        let result = service.complete("t1", "vol2", false).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_start_requires_assignee() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[task_row(TaskStatus::Pending, Some("vol1"))]])
                .into_connection(),
        );
        let service = service(db);

        let result = service.begin("t1", "vol2", false).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_start_already_started_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[task_row(TaskStatus::InProgress, Some("vol1"))]])
                // conditional start touches zero rows
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );
        let service = service(db);

        let result = service.begin("t1", "vol1", false).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_join_existing_collaborator_pays_nothing() {
        // The conditional append touches zero rows for a repeat join; the
        // mock script carries no award statements, so any point write here
        // would fail the test.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // volunteer lookup
                .append_query_results([[volunteer("vol2")]])
                // task lookup
                .append_query_results([[task_row(TaskStatus::InProgress, Some("vol1"))]])
                // conditional append finds the member already present
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                // final re-read
                .append_query_results([[task_row(TaskStatus::InProgress, Some("vol1"))]])
                .into_connection(),
        );
        let service = service(db);

        let task = service.join("t1", "vol2").await.unwrap();

        assert_eq!(task.status, TaskStatus::InProgress);
    }

    #[tokio::test]
    async fn test_join_rejects_assignee() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // volunteer lookup
                .append_query_results([[volunteer("vol1")]])
                // task lookup
                .append_query_results([[task_row(TaskStatus::InProgress, Some("vol1"))]])
                .into_connection(),
        );
        let service = service(db);

        let result = service.join("t1", "vol1").await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
