//! Registration request repositories.
//!
//! Both request kinds share the same review rule: a request is reviewed at
//! most once. `mark_reviewed` enforces it with a conditional UPDATE keyed on
//! the pending status; the caller that sees `false` lost the race or came
//! late.

use std::sync::Arc;

use crate::entities::{
    volunteer_request::{self, RequestStatus},
    voter_request, VolunteerRequest, VoterRequest,
};
use chrono::Utc;
use sampark_common::{AppError, AppResult};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

/// Volunteer registration request repository.
#[derive(Clone)]
pub struct VolunteerRequestRepository {
    db: Arc<DatabaseConnection>,
}

impl VolunteerRequestRepository {
    /// Create a new volunteer request repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new request.
    pub async fn create(
        &self,
        model: volunteer_request::ActiveModel,
    ) -> AppResult<volunteer_request::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a request by ID, erroring if absent.
    pub async fn get_by_id(&self, id: &str) -> AppResult<volunteer_request::Model> {
        VolunteerRequest::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Request {id} not found")))
    }

    /// Find a pending request by email, used to reject duplicate intake.
    pub async fn find_pending_by_email(
        &self,
        email: &str,
    ) -> AppResult<Option<volunteer_request::Model>> {
        VolunteerRequest::find()
            .filter(volunteer_request::Column::Email.eq(email.to_lowercase()))
            .filter(volunteer_request::Column::Status.eq(RequestStatus::Pending))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List requests, optionally filtered by status, newest first.
    pub async fn list(
        &self,
        status: Option<RequestStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<volunteer_request::Model>> {
        let mut query =
            VolunteerRequest::find().order_by_desc(volunteer_request::Column::CreatedAt);

        if let Some(s) = status {
            query = query.filter(volunteer_request::Column::Status.eq(s));
        }

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count pending requests.
    pub async fn count_pending(&self) -> AppResult<u64> {
        VolunteerRequest::find()
            .filter(volunteer_request::Column::Status.eq(RequestStatus::Pending))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Transition a pending request to a terminal status.
    ///
    /// Returns `false` if the request was already reviewed (or does not
    /// exist); exactly one concurrent reviewer observes `true`.
    pub async fn mark_reviewed<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
        status: RequestStatus,
        reviewer_id: &str,
    ) -> AppResult<bool> {
        let result = VolunteerRequest::update_many()
            .col_expr(volunteer_request::Column::Status, Expr::value(status))
            .col_expr(
                volunteer_request::Column::ReviewedBy,
                Expr::value(reviewer_id),
            )
            .col_expr(volunteer_request::Column::ReviewedAt, Expr::value(Utc::now()))
            .filter(volunteer_request::Column::Id.eq(id))
            .filter(volunteer_request::Column::Status.eq(RequestStatus::Pending))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}

/// Voter registration request repository.
#[derive(Clone)]
pub struct VoterRequestRepository {
    db: Arc<DatabaseConnection>,
}

impl VoterRequestRepository {
    /// Create a new voter request repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new request.
    pub async fn create(
        &self,
        model: voter_request::ActiveModel,
    ) -> AppResult<voter_request::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a request by ID, erroring if absent.
    pub async fn get_by_id(&self, id: &str) -> AppResult<voter_request::Model> {
        VoterRequest::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Request {id} not found")))
    }

    /// Find a pending request by email, used to reject duplicate intake.
    pub async fn find_pending_by_email(
        &self,
        email: &str,
    ) -> AppResult<Option<voter_request::Model>> {
        VoterRequest::find()
            .filter(voter_request::Column::Email.eq(email.to_lowercase()))
            .filter(voter_request::Column::Status.eq(RequestStatus::Pending))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List requests, optionally filtered by status, newest first.
    pub async fn list(
        &self,
        status: Option<RequestStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<voter_request::Model>> {
        let mut query = VoterRequest::find().order_by_desc(voter_request::Column::CreatedAt);

        if let Some(s) = status {
            query = query.filter(voter_request::Column::Status.eq(s));
        }

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count pending requests.
    pub async fn count_pending(&self) -> AppResult<u64> {
        VoterRequest::find()
            .filter(voter_request::Column::Status.eq(RequestStatus::Pending))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Transition a pending request to a terminal status.
    ///
    /// Same contract as the volunteer variant: `false` means already
    /// reviewed.
    pub async fn mark_reviewed<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
        status: RequestStatus,
        reviewer_id: &str,
    ) -> AppResult<bool> {
        let result = VoterRequest::update_many()
            .col_expr(voter_request::Column::Status, Expr::value(status))
            .col_expr(voter_request::Column::ReviewedBy, Expr::value(reviewer_id))
            .col_expr(voter_request::Column::ReviewedAt, Expr::value(Utc::now()))
            .filter(voter_request::Column::Id.eq(id))
            .filter(voter_request::Column::Status.eq(RequestStatus::Pending))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_request(id: &str, status: RequestStatus) -> volunteer_request::Model {
        volunteer_request::Model {
            id: id.to_string(),
            name: "Asha Rao".to_string(),
            email: "asha@example.org".to_string(),
            mobile: Some("9876543210".to_string()),
            password_hash: "$2b$12$hash".to_string(),
            avatar_url: None,
            message: Some("I want to help".to_string()),
            status,
            reviewed_by: None,
            reviewed_at: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_mark_reviewed_pending_request_succeeds() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = VolunteerRequestRepository::new(db.clone());
        let won = repo
            .mark_reviewed(db.as_ref(), "req1", RequestStatus::Approved, "admin1")
            .await
            .unwrap();

        assert!(won);
    }

    #[tokio::test]
    async fn test_mark_reviewed_already_reviewed_loses() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = VolunteerRequestRepository::new(db.clone());
        let won = repo
            .mark_reviewed(db.as_ref(), "req1", RequestStatus::Rejected, "admin1")
            .await
            .unwrap();

        assert!(!won);
    }

    #[tokio::test]
    async fn test_get_by_id_returns_request() {
        let request = create_test_request("req1", RequestStatus::Pending);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[request.clone()]])
                .into_connection(),
        );

        let repo = VolunteerRequestRepository::new(db);
        let found = repo.get_by_id("req1").await.unwrap();

        assert_eq!(found.id, "req1");
        assert_eq!(found.status, RequestStatus::Pending);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<volunteer_request::Model>::new()])
                .into_connection(),
        );

        let repo = VolunteerRequestRepository::new(db);
        let result = repo.get_by_id("nonexistent").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_count_pending() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(3))
                }]])
                .into_connection(),
        );

        let repo = VolunteerRequestRepository::new(db);
        let count = repo.count_pending().await.unwrap();

        assert_eq!(count, 3);
    }
}
