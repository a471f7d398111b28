mod repository;

pub use repository::*;

use serde::{Deserialize, Serialize};

/// Teacher as saved on database.
#[derive(
    Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow,
)]
pub struct Teacher {
    pub no: i32,
    pub name: String,
    pub detail: String,
    pub photo: String,
    pub good_count: i32,
    pub bad_count: i32,
    pub sno: i32,
}

/// Direction of a vote over a teacher.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Vote {
    Praise,
    Criticize,
}

impl Vote {
    /// Counter column the vote lands on.
    pub(crate) fn column(self) -> &'static str {
        match self {
            Vote::Praise => "good_count",
            Vote::Criticize => "bad_count",
        }
    }
}

/// Teacher row flattened with its subject name, as exported.
#[derive(Clone, Debug, Default, PartialEq, Serialize, sqlx::FromRow)]
pub struct TeacherExport {
    pub name: String,
    pub detail: String,
    pub good_count: i32,
    pub bad_count: i32,
    pub subject: String,
}

/// Per-subject vote averages.
#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct SubjectAverage {
    pub name: String,
    pub good: f64,
    pub bad: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_column_mapping() {
        assert_eq!(Vote::Praise.column(), "good_count");
        assert_eq!(Vote::Criticize.column(), "bad_count");
    }
}
