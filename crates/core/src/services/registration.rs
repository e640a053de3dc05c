//! Registration intake service.
//!
//! Volunteers and voters do not get accounts directly; they file a request
//! that an admin later approves or rejects. The password is hashed at
//! intake so the plaintext never persists anywhere. The one exception is
//! the public voter self-registration path, which creates an active voter
//! account on the spot.

use chrono::Utc;
use sampark_common::{AppError, AppResult, DataCipher};
use sampark_db::entities::{
    login_audit, user, user::Role, voter, voter::VoterCategory, volunteer_request, voter_request,
    volunteer_request::RequestStatus,
};
use sampark_db::repositories::{
    LoginAuditRepository, UserRepository, VolunteerRequestRepository, VoterRequestRepository,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, TransactionTrait};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;
use validator::Validate;

/// Input for a volunteer registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct VolunteerSignupInput {
    #[validate(length(min = 2, max = 256))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 10, max = 20))]
    pub mobile: Option<String>,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    pub avatar_url: Option<String>,
    #[validate(length(max = 2048))]
    pub message: Option<String>,
}

/// Input for a voter registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct VoterSignupInput {
    #[validate(length(min = 2, max = 256))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 10, max = 20))]
    pub mobile: Option<String>,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(max = 32))]
    pub voter_id_number: Option<String>,
    #[validate(length(max = 2048))]
    pub address: Option<String>,
    pub ward: Option<String>,
    pub area: Option<String>,
    #[validate(length(max = 2048))]
    pub message: Option<String>,
}

/// Input for public voter self-registration.
#[derive(Debug, Deserialize, Validate)]
pub struct VoterRegistrationInput {
    #[validate(length(min = 2, max = 256))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 10, max = 20))]
    pub mobile: Option<String>,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(max = 32))]
    pub voter_id_number: Option<String>,
    #[validate(length(max = 2048))]
    pub address: Option<String>,
    pub ward: Option<String>,
    pub area: Option<String>,
}

/// Registration intake service.
#[derive(Clone)]
pub struct RegistrationService {
    db: Arc<DatabaseConnection>,
    user_repo: UserRepository,
    volunteer_repo: VolunteerRequestRepository,
    voter_repo: VoterRequestRepository,
    login_audit_repo: LoginAuditRepository,
    cipher: DataCipher,
    ip_salt: String,
    bcrypt_cost: u32,
}

impl RegistrationService {
    /// Create a new registration service.
    #[must_use]
    pub const fn new(
        db: Arc<DatabaseConnection>,
        user_repo: UserRepository,
        volunteer_repo: VolunteerRequestRepository,
        voter_repo: VoterRequestRepository,
        login_audit_repo: LoginAuditRepository,
        cipher: DataCipher,
        ip_salt: String,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            db,
            user_repo,
            volunteer_repo,
            voter_repo,
            login_audit_repo,
            cipher,
            ip_salt,
            bcrypt_cost,
        }
    }

    /// File a volunteer registration request.
    pub async fn submit_volunteer(
        &self,
        input: VolunteerSignupInput,
    ) -> AppResult<volunteer_request::Model> {
        input.validate()?;
        let email = input.email.to_lowercase();

        self.ensure_identity_free(&email, input.mobile.as_deref())
            .await?;
        if self
            .volunteer_repo
            .find_pending_by_email(&email)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateIdentity(email));
        }

        let password_hash = super::auth::hash_password(&input.password, self.bcrypt_cost).await?;

        let model = volunteer_request::ActiveModel {
            id: Set(crate::generate_id()),
            name: Set(input.name),
            email: Set(email),
            mobile: Set(input.mobile),
            password_hash: Set(password_hash),
            avatar_url: Set(input.avatar_url),
            message: Set(input.message),
            status: Set(RequestStatus::Pending),
            reviewed_by: Set(None),
            reviewed_at: Set(None),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.volunteer_repo.create(model).await
    }

    /// File a voter registration request.
    pub async fn submit_voter(&self, input: VoterSignupInput) -> AppResult<voter_request::Model> {
        input.validate()?;
        let email = input.email.to_lowercase();

        self.ensure_identity_free(&email, input.mobile.as_deref())
            .await?;
        if self
            .voter_repo
            .find_pending_by_email(&email)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateIdentity(email));
        }

        let password_hash = super::auth::hash_password(&input.password, self.bcrypt_cost).await?;

        let model = voter_request::ActiveModel {
            id: Set(crate::generate_id()),
            name: Set(input.name),
            email: Set(email),
            mobile: Set(input.mobile),
            password_hash: Set(password_hash),
            voter_id_number: Set(input.voter_id_number),
            address: Set(input.address),
            ward: Set(input.ward),
            area: Set(input.area),
            message: Set(input.message),
            status: Set(RequestStatus::Pending),
            reviewed_by: Set(None),
            reviewed_at: Set(None),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.voter_repo.create(model).await
    }

    /// Register a voter directly, with no admin review.
    ///
    /// Creates the credential row and its voter-roll entry in one
    /// transaction, then writes an encrypted registration-audit row so the
    /// phone and voter-ID linkage is recoverable only with the data key.
    pub async fn register_voter(
        &self,
        input: VoterRegistrationInput,
        source_ip: Option<&str>,
    ) -> AppResult<user::Model> {
        input.validate()?;
        let email = input.email.to_lowercase();

        self.ensure_identity_free(&email, input.mobile.as_deref())
            .await?;

        let password_hash = super::auth::hash_password(&input.password, self.bcrypt_cost).await?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let now = Utc::now();
        let account = user::ActiveModel {
            id: Set(crate::generate_id()),
            name: Set(input.name.clone()),
            email: Set(email),
            mobile: Set(input.mobile.clone()),
            role: Set(Role::Voter),
            password_hash: Set(password_hash),
            avatar_url: Set(None),
            is_approved: Set(true),
            approved_by: Set(None),
            approved_at: Set(Some(now.into())),
            last_login_at: Set(None),
            is_active: Set(true),
            points: Set(0),
            level: Set(1),
            tasks_completed: Set(0),
            complaints_resolved: Set(0),
            collaborations: Set(0),
            created_at: Set(now.into()),
            updated_at: Set(None),
        }
        .insert(&txn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        let voter_model = voter::ActiveModel {
            id: Set(crate::generate_id()),
            user_id: Set(Some(account.id.clone())),
            name: Set(input.name),
            phone: Set(input.mobile.clone()),
            address: Set(input.address),
            ward: Set(input.ward),
            booth: Set(input.area),
            category: Set(VoterCategory::Supporter),
            notes: Set(input
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

        self.record_registration(
            &account.id,
            input.mobile.as_deref(),
            input.voter_id_number.as_deref(),
            source_ip,
        )
        .await;

        Ok(account)
    }

    /// Encrypted audit row for a self-registration. Best effort.
    async fn record_registration(
        &self,
        user_id: &str,
        phone: Option<&str>,
        epic: Option<&str>,
        source_ip: Option<&str>,
    ) {
        let encrypt = |value: Option<&str>| match value.map(|v| self.cipher.encrypt(v)).transpose()
        {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Failed to encrypt registration audit field");
                None
            }
        };

        let model = login_audit::ActiveModel {
            id: Set(crate::generate_id()),
            user_id: Set(Some(user_id.to_string())),
            phone_encrypted: Set(encrypt(phone)),
            epic_encrypted: Set(encrypt(epic)),
            ip_hash: Set(source_ip.map(|ip| sampark_common::hash_ip(&self.ip_salt, ip))),
            success: Set(true),
            created_at: Set(Utc::now().into()),
        };

        if let Err(e) = self.login_audit_repo.record(model).await {
            warn!(error = %e, "Failed to record voter registration audit");
        }
    }

    /// List volunteer requests with optional status filter.
    pub async fn list_volunteer_requests(
        &self,
        status: Option<RequestStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<volunteer_request::Model>> {
        self.volunteer_repo.list(status, limit, offset).await
    }

    /// List voter requests with optional status filter.
    pub async fn list_voter_requests(
        &self,
        status: Option<RequestStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<voter_request::Model>> {
        self.voter_repo.list(status, limit, offset).await
    }

    /// Reject intake when the email or mobile already belongs to an account.
    async fn ensure_identity_free(&self, email: &str, mobile: Option<&str>) -> AppResult<()> {
        if self.user_repo.find_by_email(email).await?.is_some() {
            return Err(AppError::DuplicateIdentity(email.to_string()));
        }

        if let Some(mobile) = mobile {
            if self.user_repo.find_by_mobile(mobile).await?.is_some() {
                return Err(AppError::DuplicateIdentity(mobile.to_string()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;
    use sampark_db::entities::user;
    use sea_orm::{DatabaseBackend, MockDatabase};

    const TEST_KEY: &str = "MDEyMzQ1Njc4OWFiY2RlZjAxMjM0NTY3ODlhYmNkZWY=";

    fn service(db: Arc<sea_orm::DatabaseConnection>) -> RegistrationService {
        RegistrationService::new(
            db.clone(),
            UserRepository::new(db.clone()),
            VolunteerRequestRepository::new(db.clone()),
            VoterRequestRepository::new(db.clone()),
            LoginAuditRepository::new(db),
            DataCipher::from_base64_key(TEST_KEY).unwrap(),
            "pepper".to_string(),
            4,
        )
    }

    fn existing_user() -> user::Model {
        user::Model {
            id: "user1".to_string(),
            name: "Asha Rao".to_string(),
            email: "asha@example.org".to_string(),
            mobile: Some("9876543210".to_string()),
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

    fn volunteer_input(email: &str) -> VolunteerSignupInput {
        VolunteerSignupInput {
            name: "Ravi Kumar".to_string(),
            email: email.to_string(),
            mobile: Some("9123456780".to_string()),
            password: "longenough".to_string(),
            avatar_url: None,
            message: None,
        }
    }

    #[tokio::test]
    async fn test_submit_volunteer_duplicate_email_rejected() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing_user()]])
                .into_connection(),
        );
        let service = service(db);

        let result = service
            .submit_volunteer(volunteer_input("asha@example.org"))
            .await;

        assert!(matches!(result, Err(AppError::DuplicateIdentity(_))));
    }

    #[tokio::test]
    async fn test_submit_volunteer_invalid_email_rejected() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = service(db);

        let result = service.submit_volunteer(volunteer_input("not-an-email")).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    fn registration_input(email: &str) -> VoterRegistrationInput {
        VoterRegistrationInput {
            name: "Meena Devi".to_string(),
            email: email.to_string(),
            mobile: Some("9123456781".to_string()),
            password: "longenough".to_string(),
            voter_id_number: Some("ABC1234567".to_string()),
            address: Some("12 Market Road".to_string()),
            ward: Some("Ward 4".to_string()),
            area: Some("Booth 17".to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_voter_duplicate_email_rejected() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing_user()]])
                .into_connection(),
        );
        let service = service(db);

        let result = service
            .register_voter(registration_input("asha@example.org"), None)
            .await;

        assert!(matches!(result, Err(AppError::DuplicateIdentity(_))));
    }

    #[tokio::test]
    async fn test_register_voter_creates_account_and_roll_entry() {
        let mut created = existing_user();
        created.id = "user2".to_string();
        created.email = "meena@example.org".to_string();
        created.role = user::Role::Voter;

        let voter_row = sampark_db::entities::voter::Model {
            id: "voter1".to_string(),
            user_id: Some("user2".to_string()),
            name: "Meena Devi".to_string(),
            phone: Some("9123456781".to_string()),
            address: Some("12 Market Road".to_string()),
            ward: Some("Ward 4".to_string()),
            booth: Some("Booth 17".to_string()),
            category: sampark_db::entities::voter::VoterCategory::Supporter,
            notes: Some("Voter ID: ABC1234567".to_string()),
            created_at: Utc::now().into(),
            updated_at: None,
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // email and mobile are both free
                .append_query_results([Vec::<user::Model>::new(), Vec::new()])
                // account insert
                .append_query_results([[created.clone()]])
                // voter-roll insert; the audit write after commit fails on
                // the exhausted mock but is best effort
                .append_query_results([[voter_row]])
                .into_connection(),
        );
        let service = service(db);

        let account = service
            .register_voter(registration_input("meena@example.org"), Some("203.0.113.9"))
            .await
            .unwrap();

        assert_eq!(account.id, "user2");
        assert_eq!(account.role, user::Role::Voter);
        assert!(account.is_approved);
    }

    #[tokio::test]
    async fn test_submit_volunteer_short_password_rejected() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = service(db);

        let mut input = volunteer_input("ravi@example.org");
        input.password = "short".to_string();

        let result = service.submit_volunteer(input).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
