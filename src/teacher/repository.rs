//! Handle teacher database requests.

use sqlx::{Pool, Postgres};

use crate::error::Result;
use crate::teacher::{SubjectAverage, Teacher, TeacherExport, Vote};

#[derive(Clone)]
pub struct TeacherRepository {
    pool: Pool<Postgres>,
}

impl TeacherRepository {
    /// Create a new [`TeacherRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Every teacher, ordered by number.
    pub async fn all(&self) -> Result<Vec<Teacher>> {
        let teachers = sqlx::query_as::<_, Teacher>(
            r#"SELECT no, name, detail, photo, good_count, bad_count, sno
                FROM tb_teacher
                ORDER BY no"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(teachers)
    }

    /// Teachers belonging to one subject.
    pub async fn by_subject(&self, sno: i32) -> Result<Vec<Teacher>> {
        let teachers = sqlx::query_as::<_, Teacher>(
            r#"SELECT no, name, detail, photo, good_count, bad_count, sno
                FROM tb_teacher
                WHERE sno = $1
                ORDER BY no"#,
        )
        .bind(sno)
        .fetch_all(&self.pool)
        .await?;

        Ok(teachers)
    }

    /// Record one vote on a teacher.
    ///
    /// The increment happens inside the UPDATE so concurrent votes on
    /// the same row serialize in the database; the application never
    /// reads, adds one and writes back. Returns whether a row matched.
    pub async fn cast_vote(&self, no: i32, vote: Vote) -> Result<bool> {
        let query = format!(
            "UPDATE tb_teacher SET {column} = {column} + 1 WHERE no = $1",
            column = vote.column()
        );

        let result = sqlx::query(&query).bind(no).execute(&self.pool).await?;

        Ok(result.rows_affected() == 1)
    }

    /// Every teacher flattened with its subject name.
    pub async fn all_with_subject(&self) -> Result<Vec<TeacherExport>> {
        let teachers = sqlx::query_as::<_, TeacherExport>(
            r#"SELECT t.name, t.detail, t.good_count, t.bad_count,
                    s.name AS subject
                FROM tb_teacher t
                JOIN tb_subject s ON s.no = t.sno
                ORDER BY t.no"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(teachers)
    }

    /// Mean good/bad counts per subject.
    ///
    /// The inner join naturally drops subjects without teachers.
    pub async fn subject_averages(&self) -> Result<Vec<SubjectAverage>> {
        let averages = sqlx::query_as::<_, SubjectAverage>(
            r#"SELECT s.name,
                    AVG(t.good_count)::DOUBLE PRECISION AS good,
                    AVG(t.bad_count)::DOUBLE PRECISION AS bad
                FROM tb_teacher t
                JOIN tb_subject s ON s.no = t.sno
                GROUP BY s.no, s.name
                ORDER BY s.no"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(averages)
    }
}
