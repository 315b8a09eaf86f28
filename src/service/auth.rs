use crate::config::SessionConfig;
use crate::database::session::SessionRepository;
use crate::database::user::{UserRepository, dummy_verify, hash_password, verify_password};
use crate::error::app_error::AppError;
use crate::models::session::Session;
use crate::models::user::{RegisterForm, User};
use crate::util::normalize_email;
use chrono::{Duration, Utc};
use uuid::Uuid;
use validator::Validate;

/// Registration, login and session resolution over any store that keeps
/// accounts and sessions.
pub struct AuthService<'a, R> {
    repo: &'a R,
    session_ttl: Duration,
}

impl<'a, R> AuthService<'a, R>
where
    R: UserRepository + SessionRepository + Send + Sync,
{
    pub fn new(repo: &'a R, config: &SessionConfig) -> Self {
        Self {
            repo,
            session_ttl: Duration::hours(config.ttl_hours),
        }
    }

    pub async fn register(&self, form: &RegisterForm) -> Result<User, AppError> {
        let form = form.normalized();
        form.validate()?;

        if self.repo.get_user_by_email(&form.email).await?.is_some() {
            return Err(AppError::DuplicateAccount(form.email));
        }

        let password_hash = hash_password(&form.password)?;
        let user = self
            .repo
            .create_user(&form.first_name, &form.last_name, &form.email, &password_hash)
            .await?;

        tracing::info!(user_id = %user.id, "account registered");
        Ok(user)
    }

    /// Verifies the credentials and opens a session bound to the account.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let email = normalize_email(email);

        let Some(user) = self.repo.get_user_by_email(&email).await? else {
            dummy_verify(password);
            return Err(AppError::InvalidCredentials);
        };

        verify_password(&user, password)?;

        let session = self.repo.create_session(&user.id, Utc::now() + self.session_ttl).await?;
        tracing::info!(user_id = %user.id, session_id = %session.id, "session opened");
        Ok(session)
    }

    /// Closes the session if there is one. Calling it without a session is a no-op.
    pub async fn logout(&self, session_id: Option<&Uuid>) -> Result<(), AppError> {
        if let Some(session_id) = session_id {
            self.repo.delete_session(session_id).await?;
            tracing::info!(session_id = %session_id, "session closed");
        }
        Ok(())
    }

    /// Account behind a cookie's session reference, if the session is still
    /// live and belongs to that account. A lapsed session is deleted.
    pub async fn resolve_session(&self, session_id: &Uuid, user_id: &Uuid) -> Result<Option<User>, AppError> {
        let Some(session) = self.repo.get_session(session_id).await? else {
            return Ok(None);
        };
        if session.user_id != *user_id {
            tracing::warn!(session_id = %session.id, "session cookie names a different account");
            return Ok(None);
        }
        if session.is_expired(Utc::now()) {
            self.repo.delete_session(&session.id).await?;
            tracing::debug!(session_id = %session.id, expired_at = %session.expires_at, "lapsed session removed");
            return Ok(None);
        }

        self.repo.get_user_by_id(&session.user_id).await
    }
}
