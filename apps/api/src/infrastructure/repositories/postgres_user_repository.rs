use async_trait::async_trait;
use sqlx::{PgConnection, PgExecutor, PgPool, Postgres, Transaction};
use tokio::sync::Mutex;

use crate::domain::repositories::{RepositoryError, UserRepository, UserStore, UserTransaction};
use crate::domain::user::{User, FIRST_USER_ID};

/// Row shape of the `users` table
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    first_name: String,
    last_name: String,
    email: String,
    age: i32,
    active: bool,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: Some(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            age: row.age,
            active: row.active,
        }
    }
}

/// PostgreSQL implementation of UserStore
///
/// Provides persistence for users using SQLx against PostgreSQL. Queries are
/// checked at runtime so the crate builds without a live database.
#[derive(Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    /// Creates a new PostgresUserStore
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepositoryError> {
        queries::find_by_id(&self.pool, id).await
    }

    async fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
        queries::find_all(&self.pool).await
    }

    async fn save(&self, user: User) -> Result<User, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        queries::save(&mut conn, &user).await
    }

    async fn delete_by_id(&self, id: i32) -> Result<(), RepositoryError> {
        queries::delete_by_id(&self.pool, id).await
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError> {
        queries::exists_by_email(&self.pool, email).await
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    type Transaction = PostgresUserTransaction;

    async fn begin(&self) -> Result<Self::Transaction, RepositoryError> {
        let tx = self.pool.begin().await?;
        Ok(PostgresUserTransaction { tx: Mutex::new(tx) })
    }
}

/// A single PostgreSQL transaction exposed through the repository contract
///
/// Rolled back by sqlx when dropped without `commit`.
pub struct PostgresUserTransaction {
    tx: Mutex<Transaction<'static, Postgres>>,
}

#[async_trait]
impl UserRepository for PostgresUserTransaction {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepositoryError> {
        let mut tx = self.tx.lock().await;
        queries::find_by_id(&mut **tx, id).await
    }

    async fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
        let mut tx = self.tx.lock().await;
        queries::find_all(&mut **tx).await
    }

    async fn save(&self, user: User) -> Result<User, RepositoryError> {
        let mut tx = self.tx.lock().await;
        queries::save(&mut **tx, &user).await
    }

    async fn delete_by_id(&self, id: i32) -> Result<(), RepositoryError> {
        let mut tx = self.tx.lock().await;
        queries::delete_by_id(&mut **tx, id).await
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError> {
        let mut tx = self.tx.lock().await;
        queries::exists_by_email(&mut **tx, email).await
    }
}

#[async_trait]
impl UserTransaction for PostgresUserTransaction {
    async fn commit(self) -> Result<(), RepositoryError> {
        self.tx.into_inner().commit().await?;
        Ok(())
    }
}

/// Statements shared by the pool-backed store and its transactions
mod queries {
    use super::*;

    pub(super) async fn find_by_id<'e, E>(executor: E, id: i32) -> Result<Option<User>, RepositoryError>
    where
        E: PgExecutor<'e>,
    {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, first_name, last_name, email, age, active
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(row.map(User::from))
    }

    pub(super) async fn find_all<'e, E>(executor: E) -> Result<Vec<User>, RepositoryError>
    where
        E: PgExecutor<'e>,
    {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, first_name, last_name, email, age, active
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(executor)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    pub(super) async fn save(conn: &mut PgConnection, user: &User) -> Result<User, RepositoryError> {
        let row = match user.id {
            None => {
                sqlx::query_as::<_, UserRow>(
                    r#"
                    INSERT INTO users (first_name, last_name, email, age, active)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING id, first_name, last_name, email, age, active
                    "#,
                )
                .bind(&user.first_name)
                .bind(&user.last_name)
                .bind(&user.email)
                .bind(user.age)
                .bind(user.active)
                .fetch_one(&mut *conn)
                .await?
            }
            Some(id) => {
                let row = sqlx::query_as::<_, UserRow>(
                    r#"
                    INSERT INTO users (id, first_name, last_name, email, age, active)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    ON CONFLICT (id) DO UPDATE SET
                        first_name = EXCLUDED.first_name,
                        last_name = EXCLUDED.last_name,
                        email = EXCLUDED.email,
                        age = EXCLUDED.age,
                        active = EXCLUDED.active
                    RETURNING id, first_name, last_name, email, age, active
                    "#,
                )
                .bind(id)
                .bind(&user.first_name)
                .bind(&user.last_name)
                .bind(&user.email)
                .bind(user.age)
                .bind(user.active)
                .fetch_one(&mut *conn)
                .await?;

                advance_id_sequence(conn, id).await?;
                row
            }
        };

        Ok(User::from(row))
    }

    /// Moves the identity sequence past an explicitly inserted id
    ///
    /// Explicit ids do not consume the sequence, so without this a later
    /// default-id insert could draw the same value.
    async fn advance_id_sequence(conn: &mut PgConnection, id: i32) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            SELECT setval(pg_get_serial_sequence('users', 'id'), $1)
            WHERE $1 >= COALESCE(
                pg_sequence_last_value(pg_get_serial_sequence('users', 'id')::regclass) + 1,
                $2
            )
            "#,
        )
        .bind(i64::from(id))
        .bind(i64::from(FIRST_USER_ID))
        .execute(conn)
        .await?;

        Ok(())
    }

    pub(super) async fn delete_by_id<'e, E>(executor: E, id: i32) -> Result<(), RepositoryError>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(user_id = id, "delete matched no rows");
        }

        Ok(())
    }

    pub(super) async fn exists_by_email<'e, E>(executor: E, email: &str) -> Result<bool, RepositoryError>
    where
        E: PgExecutor<'e>,
    {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(executor)
            .await?;

        Ok(exists)
    }
}
