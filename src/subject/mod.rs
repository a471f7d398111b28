mod repository;

pub use repository::*;

use serde::{Deserialize, Serialize};

/// Subject as saved on database.
///
/// Read-only here: rows are provisioned by administration, never by
/// this service.
#[derive(
    Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow,
)]
pub struct Subject {
    pub no: i32,
    pub name: String,
    pub intro: String,
    pub create_date: Option<chrono::NaiveDate>,
    pub is_hot: bool,
}
