//! Handle subject database requests.

use sqlx::{Pool, Postgres};

use crate::error::Result;
use crate::subject::Subject;

#[derive(Clone)]
pub struct SubjectRepository {
    pool: Pool<Postgres>,
}

impl SubjectRepository {
    /// Create a new [`SubjectRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Every subject, ordered by number.
    pub async fn all(&self) -> Result<Vec<Subject>> {
        let subjects = sqlx::query_as::<_, Subject>(
            r#"SELECT no, name, intro, create_date, is_hot
                FROM tb_subject
                ORDER BY no"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(subjects)
    }

    /// Find one subject using the `no` field.
    pub async fn find_by_no(&self, no: i32) -> Result<Option<Subject>> {
        let subject = sqlx::query_as::<_, Subject>(
            r#"SELECT no, name, intro, create_date, is_hot
                FROM tb_subject
                WHERE no = $1"#,
        )
        .bind(no)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subject)
    }
}
