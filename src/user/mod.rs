mod repository;

pub use repository::*;

use serde::{Deserialize, Serialize};

/// User as saved on database.
///
/// Created once on registration and never mutated by this service.
#[derive(
    Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow,
)]
pub struct User {
    pub no: i32,
    pub username: String,
    /// Fixed-length hex digest, never the raw password.
    #[serde(skip)]
    pub password: String,
    pub email: String,
    pub tel: String,
}
