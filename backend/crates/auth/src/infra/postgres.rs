//! PostgreSQL Credential Store

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::user_record::UserRecord;
use crate::domain::repository::CredentialStore;
use crate::domain::value_object::{UserId, user_name::UserName, user_password::UserPassword};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed credential store
///
/// Uniqueness is enforced by the `users.user_name` unique index, so
/// concurrent registrations race safely inside the database.
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Number of registered users
    pub async fn count(&self) -> AuthResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

impl CredentialStore for PgCredentialStore {
    async fn register(
        &self,
        user_name: &UserName,
        password_hash: &UserPassword,
    ) -> AuthResult<UserRecord> {
        let record = UserRecord::new(user_name.clone(), password_hash.clone());

        // ON CONFLICT DO NOTHING returns no row when the name is taken
        let inserted = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO users (
                user_id,
                user_name,
                password_hash,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_name) DO NOTHING
            RETURNING user_id
            "#,
        )
        .bind(record.user_id.into_uuid())
        .bind(record.user_name.as_str())
        .bind(record.password_hash.as_phc_string())
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        match inserted {
            Some(_) => Ok(record),
            None => Err(AuthError::DuplicateUser),
        }
    }

    async fn find_by_username(&self, user_name: &UserName) -> AuthResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                user_name,
                password_hash,
                created_at,
                updated_at
            FROM users
            WHERE user_name = $1
            "#,
        )
        .bind(user_name.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_record))
    }
}

/// Unique violations (SQLSTATE 23505) mean the name is taken
fn map_unique_violation(err: sqlx::Error) -> AuthError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AuthError::DuplicateUser,
        _ => AuthError::Database(err),
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    user_name: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_record(self) -> UserRecord {
        UserRecord {
            user_id: UserId::from_uuid(self.user_id),
            user_name: UserName::from_db(self.user_name),
            password_hash: UserPassword::from_db(self.password_hash),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_into_record() {
        let now = Utc::now();
        let uuid = Uuid::new_v4();
        let row = UserRow {
            user_id: uuid,
            user_name: "alice".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA".to_string(),
            created_at: now,
            updated_at: now,
        };

        let record = row.into_record();
        assert_eq!(record.user_id.as_uuid(), &uuid);
        assert_eq!(record.user_name.as_str(), "alice");
        assert_eq!(record.password_hash.salt().as_deref(), Some("c2FsdHNhbHQ"));
    }

    #[test]
    fn test_non_unique_errors_stay_database_errors() {
        let err = map_unique_violation(sqlx::Error::RowNotFound);
        assert!(matches!(err, AuthError::Database(_)));
    }

    // Database-backed cases: run with DATABASE_URL set and `--ignored`

    fn hash() -> UserPassword {
        UserPassword::from_db("$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA")
    }

    #[sqlx::test(migrations = "../../../database/migrations")]
    #[ignore = "requires a PostgreSQL server via DATABASE_URL"]
    async fn test_register_conflict_is_duplicate_user(pool: PgPool) {
        let store = PgCredentialStore::new(pool);
        let name = UserName::new("alice").unwrap();

        let first = store.register(&name, &hash()).await.unwrap();
        let err = store.register(&name, &hash()).await.unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUser));

        assert_eq!(store.count().await.unwrap(), 1);
        let found = store.find_by_username(&name).await.unwrap().unwrap();
        assert_eq!(found.user_id, first.user_id);
        assert!(
            store
                .find_by_username(&UserName::new("Alice").unwrap())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[sqlx::test(migrations = "../../../database/migrations")]
    #[ignore = "requires a PostgreSQL server via DATABASE_URL"]
    async fn test_unique_violation_from_database_maps_to_duplicate_user(pool: PgPool) {
        let store = PgCredentialStore::new(pool.clone());
        store
            .register(&UserName::new("bob").unwrap(), &hash())
            .await
            .unwrap();

        // Plain INSERT without ON CONFLICT surfaces SQLSTATE 23505
        let err = sqlx::query(
            "INSERT INTO users (user_id, user_name, password_hash) VALUES ($1, $2, $3)",
        )
        .bind(Uuid::new_v4())
        .bind("bob")
        .bind("unused")
        .execute(&pool)
        .await
        .unwrap_err();

        assert_eq!(
            err.as_database_error().and_then(|e| e.code()).as_deref(),
            Some("23505")
        );
        assert!(matches!(map_unique_violation(err), AuthError::DuplicateUser));
    }

    #[sqlx::test(migrations = "../../../database/migrations")]
    #[ignore = "requires a PostgreSQL server via DATABASE_URL"]
    async fn test_concurrent_registration_has_one_winner(pool: PgPool) {
        let store = PgCredentialStore::new(pool);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .register(&UserName::new("carol").unwrap(), &hash())
                        .await
                })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(AuthError::DuplicateUser) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
