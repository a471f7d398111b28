//! Vote casting over teachers.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use crate::AppState;
use crate::error::Result;
use crate::router::{CODE_INVALID_TEACHER, CODE_VOTE_RECORDED, Outcome};
use crate::teacher::{TeacherRepository, Vote};

const HINT_RECORDED: &str = "vote recorded";
const HINT_INVALID_TEACHER: &str = "invalid teacher id";

#[derive(Debug, Default, Deserialize)]
pub struct Params {
    tno: Option<String>,
}

/// Handler for `/praise/`.
pub async fn praise(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<Outcome>> {
    cast(state, params, Vote::Praise).await
}

/// Handler for `/criticize/`.
pub async fn criticize(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<Outcome>> {
    cast(state, params, Vote::Criticize).await
}

async fn cast(
    state: AppState,
    params: Params,
    vote: Vote,
) -> Result<Json<Outcome>> {
    let Some(tno) = params.tno.as_deref().and_then(|s| s.parse::<i32>().ok())
    else {
        return Ok(Json(Outcome::new(
            CODE_INVALID_TEACHER,
            HINT_INVALID_TEACHER,
        )));
    };

    let recorded = TeacherRepository::new(state.db.postgres.clone())
        .cast_vote(tno, vote)
        .await?;

    if recorded {
        tracing::debug!(teacher = tno, ?vote, "vote recorded");
        Ok(Json(Outcome::new(CODE_VOTE_RECORDED, HINT_RECORDED)))
    } else {
        Ok(Json(Outcome::new(CODE_INVALID_TEACHER, HINT_INVALID_TEACHER)))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode, header};
    use http_body_util::BodyExt;
    use sqlx::{Pool, Postgres};

    use super::*;
    use crate::router::CODE_NOT_LOGGED_IN;
    use crate::teacher::TeacherRepository;
    use crate::*;

    async fn outcome_of(
        response: axum::http::Response<axum::body::Body>,
    ) -> Outcome {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[sqlx::test(fixtures("../../fixtures/subjects.sql"))]
    async fn test_praise_and_criticize_increment(pool: Pool<Postgres>) {
        let state = test_state(pool.clone());
        state.sessions.update(TEST_SESSION, |session| {
            session.user_id = Some(1);
        });
        let app = app(state);
        let cookie = format!("sid={TEST_SESSION}");

        let response = make_request(
            app.clone(),
            Method::GET,
            "/praise/?tno=1",
            String::default(),
            &[("cookie", &cookie)],
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            outcome_of(response).await,
            Outcome::new(CODE_VOTE_RECORDED, "vote recorded")
        );

        let response = make_request(
            app,
            Method::GET,
            "/criticize/?tno=1",
            String::default(),
            &[("cookie", &cookie)],
        )
        .await;
        assert_eq!(outcome_of(response).await.code, CODE_VOTE_RECORDED);

        let teachers =
            TeacherRepository::new(pool).by_subject(1).await.unwrap();
        assert_eq!(teachers[0].good_count, 5);
        assert_eq!(teachers[0].bad_count, 2);
    }

    #[sqlx::test(fixtures("../../fixtures/subjects.sql"))]
    async fn test_malformed_or_unknown_id_is_rejected(pool: Pool<Postgres>) {
        let state = test_state(pool.clone());
        state.sessions.update(TEST_SESSION, |session| {
            session.user_id = Some(1);
        });
        let app = app(state);
        let cookie = format!("sid={TEST_SESSION}");

        for path in ["/praise/", "/praise/?tno=abc", "/praise/?tno=999"] {
            let response = make_request(
                app.clone(),
                Method::GET,
                path,
                String::default(),
                &[("cookie", &cookie)],
            )
            .await;
            assert_eq!(
                outcome_of(response).await.code,
                CODE_INVALID_TEACHER
            );
        }

        let teachers =
            TeacherRepository::new(pool).by_subject(1).await.unwrap();
        assert_eq!(teachers[0].good_count, 4);
    }

    #[sqlx::test(fixtures("../../fixtures/subjects.sql"))]
    async fn test_vote_without_session_is_gated(pool: Pool<Postgres>) {
        let app = app(test_state(pool.clone()));

        // Machine clients get the coded payload.
        let response = make_request(
            app.clone(),
            Method::GET,
            "/praise/?tno=1",
            String::default(),
            &[("x-requested-with", "XMLHttpRequest")],
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(outcome_of(response).await.code, CODE_NOT_LOGGED_IN);

        // Browsers get sent to the login page with a return target.
        let response = make_request(
            app,
            Method::GET,
            "/praise/?tno=1",
            String::default(),
            &[],
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/login/?backurl=/praise/?tno=1"
        );

        // Either way no vote was cast.
        let teachers =
            TeacherRepository::new(pool).by_subject(1).await.unwrap();
        assert_eq!(teachers[0].good_count, 4);
    }
}
