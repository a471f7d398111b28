//! Handle user database requests.

use crate::error::Result;
use crate::user::User;
use sqlx::{Pool, Postgres};

#[derive(Clone)]
pub struct UserRepository {
    pool: Pool<Postgres>,
}

impl UserRepository {
    /// Create a new [`UserRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert [`User`] into database.
    ///
    /// Returns `false` when the username is already taken, so the
    /// caller can re-render the form instead of surfacing a fault.
    pub async fn insert(&self, user: &User) -> Result<bool> {
        let result = sqlx::query(
            r#"INSERT INTO tb_user (username, password, email, tel)
                VALUES ($1, $2, $3, $4)"#,
        )
        .bind(&user.username)
        .bind(&user.password)
        .bind(&user.email)
        .bind(&user.tel)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(true),
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                Ok(false)
            },
            Err(err) => Err(err.into()),
        }
    }

    /// Find one user by username and password digest.
    pub async fn find_by_credentials(
        &self,
        username: &str,
        password_digest: &str,
    ) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT no, username, password, email, tel
                FROM tb_user
                WHERE username = $1 AND password = $2"#,
        )
        .bind(username)
        .bind(password_digest)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
