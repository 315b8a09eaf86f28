use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::user::User;
use argon2::Argon2;
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use std::sync::LazyLock;
use uuid::Uuid;

/// A real Argon2 hash generated once at startup, used as a timing decoy
/// so that login requests for unknown emails take as long as requests for
/// existing accounts.
static DUMMY_HASH: LazyLock<Option<String>> = LazyLock::new(|| hash_password("dummy-never-matches").ok());

#[async_trait::async_trait]
pub trait UserRepository {
    async fn create_user(&self, first_name: &str, last_name: &str, email: &str, password_hash: &str) -> Result<User, AppError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError>;
}

#[async_trait::async_trait]
impl UserRepository for PostgresRepository {
    async fn create_user(&self, first_name: &str, last_name: &str, email: &str, password_hash: &str) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, first_name, last_name)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, first_name, last_name
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(first_name)
        .bind(last_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::DuplicateAccount(email.to_string()),
            other => AppError::from(other),
        })?;

        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, first_name, last_name
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, first_name, last_name
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

/// Salted Argon2 PHC string for `password`.
pub(crate) fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub(crate) fn verify_password(user: &User, password: &str) -> Result<(), AppError> {
    let password_hash = PasswordHash::new(&user.password_hash).map_err(|e| AppError::password_hash("Failed to parse stored password hash", e))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &password_hash)
        .map_err(|_| AppError::InvalidCredentials)
}

/// Throwaway verification against [`DUMMY_HASH`] for unknown emails.
pub(crate) fn dummy_verify(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref()
        && let Ok(parsed) = PasswordHash::new(hash)
    {
        let _ = Argon2::default().verify_password(password.as_bytes(), &parsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_hash(hash: String) -> User {
        User {
            id: Uuid::new_v4(),
            email: "demo@betterhunt.app".to_string(),
            password_hash: hash,
            first_name: "Demo".to_string(),
            last_name: "User".to_string(),
        }
    }

    #[test]
    fn hash_is_salted_and_never_plaintext() {
        let first = hash_password("hunter-2").unwrap();
        let second = hash_password("hunter-2").unwrap();
        assert_ne!(first, second);
        assert!(!first.contains("hunter-2"));
        assert!(first.starts_with("$argon2"));
    }

    #[test]
    fn verify_accepts_matching_password() {
        let user = user_with_hash(hash_password("abc").unwrap());
        assert!(verify_password(&user, "abc").is_ok());
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let user = user_with_hash(hash_password("abc").unwrap());
        assert!(matches!(verify_password(&user, "abd"), Err(AppError::InvalidCredentials)));
    }

    #[test]
    fn corrupt_stored_hash_is_internal_error() {
        let user = user_with_hash("plaintext".to_string());
        assert!(matches!(verify_password(&user, "plaintext"), Err(AppError::PasswordHash { .. })));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn postgres_unique_email_maps_to_duplicate_account() {
        let repo = PostgresRepository {
            pool: crate::test_utils::database_pool().await,
        };
        let email = format!("{}@example.com", Uuid::new_v4());
        let hash = hash_password("abc").unwrap();

        repo.create_user("Demo", "User", &email, &hash).await.unwrap();
        let err = repo.create_user("Demo", "User", &email, &hash).await.unwrap_err();

        assert!(matches!(err, AppError::DuplicateAccount(ref e) if *e == email));
        assert!(repo.get_user_by_email(&email).await.unwrap().is_some());
    }
}
