//! Subject listing.

use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::error::Result;
use crate::subject::{Subject, SubjectRepository};

/// Handler listing every subject.
pub async fn handler(State(state): State<AppState>) -> Result<Json<Vec<Subject>>> {
    let subjects =
        SubjectRepository::new(state.db.postgres.clone()).all().await?;

    Ok(Json(subjects))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use sqlx::{Pool, Postgres};

    use super::*;
    use crate::*;

    #[sqlx::test(fixtures("../../fixtures/subjects.sql"))]
    async fn test_subjects_are_listed_in_order(pool: Pool<Postgres>) {
        let app = app(test_state(pool));

        let response =
            make_request(app, Method::GET, "/", String::default(), &[]).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let subjects: Vec<Subject> = serde_json::from_slice(&body).unwrap();
        assert_eq!(subjects.len(), 3);
        assert_eq!(subjects[0].name, "Python");
        assert!(subjects[0].is_hot);
        assert_eq!(subjects[2].create_date, None);
    }
}
