//! Authentication service: password hashing, token issuance, and login.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sampark_common::{
    config::AuthConfig, AppError, AppResult, DataCipher,
};
use sampark_db::entities::{login_audit, user, user::Role};
use sampark_db::repositories::{LoginAuditRepository, UserRepository};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::warn;
use validator::Validate;

/// Bearer token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub sub: String,
    /// Role at issuance time. Authorization re-checks the database row, so
    /// a stale role here only widens the token, never the access.
    pub role: String,
    /// Display name.
    pub name: String,
    /// Issued-at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
}

/// Input for login. The identifier is an email address or a mobile number.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(length(min = 1, max = 256))]
    pub identifier: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Hash a password with bcrypt at the given cost.
///
/// Runs on the blocking pool; bcrypt at production cost takes long enough
/// to stall the async executor otherwise.
pub async fn hash_password(password: &str, cost: u32) -> AppResult<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("hash task failed: {e}")))?
        .map_err(|e| AppError::Internal(format!("bcrypt hash: {e}")))
}

/// Verify a password against a bcrypt hash on the blocking pool.
pub async fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("verify task failed: {e}")))?
        .map_err(|e| AppError::Internal(format!("bcrypt verify: {e}")))
}

/// Authentication service.
#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    login_audit_repo: LoginAuditRepository,
    config: AuthConfig,
    cipher: DataCipher,
    ip_salt: String,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        login_audit_repo: LoginAuditRepository,
        config: AuthConfig,
        cipher: DataCipher,
        ip_salt: String,
    ) -> Self {
        Self {
            user_repo,
            login_audit_repo,
            config,
            cipher,
            ip_salt,
        }
    }

    /// bcrypt cost in effect.
    #[must_use]
    pub const fn bcrypt_cost(&self) -> u32 {
        self.config.bcrypt_cost
    }

    /// Issue a signed access token for a user.
    pub fn issue_token(&self, user: &user::Model) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.clone(),
            role: user.role.as_str().to_string(),
            name: user.name.clone(),
            iat: now.timestamp(),
            exp: (now + chrono::Duration::hours(self.config.token_ttl_hours)).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("token encode: {e}")))
    }

    /// Verify a token signature and expiry, returning the claims.
    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthenticated)
    }

    /// Authenticate a user and issue a token.
    ///
    /// An identifier containing `@` is looked up as an email, anything else
    /// as a mobile number. Unknown identifier and wrong password both
    /// surface as [`AppError::InvalidCredentials`]; a volunteer whose
    /// credentials check out but whose account is still unapproved gets
    /// [`AppError::PendingApproval`] instead, so the frontend can explain
    /// the wait.
    pub async fn login(
        &self,
        input: LoginInput,
        source_ip: Option<&str>,
    ) -> AppResult<(user::Model, String)> {
        input.validate()?;

        let found = if input.identifier.contains('@') {
            self.user_repo
                .find_by_email(&input.identifier.to_lowercase())
                .await?
        } else {
            self.user_repo.find_by_mobile(&input.identifier).await?
        };

        let Some(user) = found else {
            self.record_attempt(None, None, source_ip, false).await;
            return Err(AppError::InvalidCredentials);
        };

        if !verify_password(&input.password, &user.password_hash).await? {
            self.record_attempt(Some(&user.id), user.mobile.as_deref(), source_ip, false)
                .await;
            return Err(AppError::InvalidCredentials);
        }

        // Credentials are valid from here on; remaining checks may disclose
        // account state.
        if user.role == Role::Volunteer && !user.is_approved {
            self.record_attempt(Some(&user.id), user.mobile.as_deref(), source_ip, false)
                .await;
            return Err(AppError::PendingApproval);
        }

        if !user.is_active {
            self.record_attempt(Some(&user.id), user.mobile.as_deref(), source_ip, false)
                .await;
            return Err(AppError::Forbidden("Account is deactivated".to_string()));
        }

        self.user_repo.touch_last_login(&user.id).await?;
        self.record_attempt(Some(&user.id), user.mobile.as_deref(), source_ip, true)
            .await;

        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    /// Record a login attempt in the audit trail. Best effort; a failed
    /// audit write must not block the login itself.
    async fn record_attempt(
        &self,
        user_id: Option<&str>,
        phone: Option<&str>,
        source_ip: Option<&str>,
        success: bool,
    ) {
        let phone_encrypted = match phone.map(|p| self.cipher.encrypt(p)).transpose() {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Failed to encrypt phone for login audit");
                None
            }
        };

        let model = login_audit::ActiveModel {
            id: Set(crate::generate_id()),
            user_id: Set(user_id.map(String::from)),
            phone_encrypted: Set(phone_encrypted),
            epic_encrypted: Set(None),
            ip_hash: Set(source_ip.map(|ip| sampark_common::hash_ip(&self.ip_salt, ip))),
            success: Set(success),
            created_at: Set(Utc::now().into()),
        };

        if let Err(e) = self.login_audit_repo.record(model).await {
            warn!(error = %e, "Failed to record login attempt");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    const TEST_KEY: &str = "MDEyMzQ1Njc4OWFiY2RlZjAxMjM0NTY3ODlhYmNkZWY=";

    fn test_service(db: Arc<sea_orm::DatabaseConnection>) -> AuthService {
        AuthService::new(
            UserRepository::new(db.clone()),
            LoginAuditRepository::new(db),
            AuthConfig {
                jwt_secret: "test-secret".to_string(),
                token_ttl_hours: 8,
                bcrypt_cost: 4,
            },
            DataCipher::from_base64_key(TEST_KEY).unwrap(),
            "pepper".to_string(),
        )
    }

    fn test_user(role: Role, is_approved: bool, password_hash: &str) -> user::Model {
        user::Model {
            id: "user1".to_string(),
            name: "Asha Rao".to_string(),
            email: "asha@example.org".to_string(),
            mobile: Some("9876543210".to_string()),
            role,
            password_hash: password_hash.to_string(),
            avatar_url: None,
            is_approved,
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

    fn empty_db() -> Arc<sea_orm::DatabaseConnection> {
        Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        )
    }

    #[tokio::test]
    async fn test_password_hash_and_verify() {
        let hash = hash_password("s3cret", 4).await.unwrap();
        assert!(verify_password("s3cret", &hash).await.unwrap());
        assert!(!verify_password("wrong", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_token_round_trip() {
        let service = test_service(empty_db());
        let user = test_user(Role::Admin, true, "x");

        let token = service.issue_token(&user).unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.sub, "user1");
        assert_eq!(claims.role, "admin");
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn test_tampered_token_rejected() {
        let service = test_service(empty_db());
        let user = test_user(Role::Admin, true, "x");

        let mut token = service.issue_token(&user).unwrap();
        token.push('x');

        assert!(matches!(
            service.verify_token(&token),
            Err(AppError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let service = test_service(empty_db());

        let now = Utc::now();
        let claims = Claims {
            sub: "user1".to_string(),
            role: "admin".to_string(),
            name: "Asha".to_string(),
            iat: (now - chrono::Duration::hours(10)).timestamp(),
            exp: (now - chrono::Duration::hours(2)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test-secret".as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            service.verify_token(&token),
            Err(AppError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_login_unknown_identifier_is_invalid_credentials() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // user lookup comes back empty
                .append_query_results([Vec::<user::Model>::new()])
                // audit insert
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[login_audit_row()]])
                .into_connection(),
        );
        let service = test_service(db);

        let result = service
            .login(
                LoginInput {
                    identifier: "nobody@example.org".to_string(),
                    password: "whatever".to_string(),
                },
                None,
            )
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_by_mobile_succeeds() {
        let hash = hash_password("s3cret", 4).await.unwrap();
        let user = test_user(Role::Volunteer, true, &hash);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // mobile lookup
                .append_query_results([[user.clone()]])
                // touch_last_login
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                // audit insert
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[login_audit_row()]])
                .into_connection(),
        );
        let service = test_service(db);

        let (logged_in, token) = service
            .login(
                LoginInput {
                    identifier: "9876543210".to_string(),
                    password: "s3cret".to_string(),
                },
                Some("203.0.113.7"),
            )
            .await
            .unwrap();

        assert_eq!(logged_in.id, user.id);
        assert!(!token.is_empty());
    }

    #[tokio::test]
    async fn test_login_unapproved_volunteer_is_pending_approval() {
        let hash = hash_password("s3cret", 4).await.unwrap();
        let user = test_user(Role::Volunteer, false, &hash);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[login_audit_row()]])
                .into_connection(),
        );
        let service = test_service(db);

        let result = service
            .login(
                LoginInput {
                    identifier: "asha@example.org".to_string(),
                    password: "s3cret".to_string(),
                },
                Some("203.0.113.7"),
            )
            .await;

        assert!(matches!(result, Err(AppError::PendingApproval)));
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_invalid_credentials() {
        let hash = hash_password("s3cret", 4).await.unwrap();
        let user = test_user(Role::Volunteer, true, &hash);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[login_audit_row()]])
                .into_connection(),
        );
        let service = test_service(db);

        let result = service
            .login(
                LoginInput {
                    identifier: "asha@example.org".to_string(),
                    password: "not-it".to_string(),
                },
                None,
            )
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    fn login_audit_row() -> login_audit::Model {
        login_audit::Model {
            id: "la1".to_string(),
            user_id: None,
            phone_encrypted: None,
            epic_encrypted: None,
            ip_hash: None,
            success: false,
            created_at: Utc::now().into(),
        }
    }
}
