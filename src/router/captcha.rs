//! Image verification code issuing.

use axum::Extension;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use crate::error::Result;
use crate::session::SessionId;
use crate::{AppState, code};

const CONTENT_TYPE: &str = "image/png";

/// Handler issuing a fresh image code.
///
/// The code replaces any pending one in the session before the image
/// leaves, so only the latest issue can pass the login check.
pub async fn handler(
    State(state): State<AppState>,
    Extension(sid): Extension<SessionId>,
) -> Result<impl IntoResponse> {
    let code = code::image_code();
    state.sessions.update(&sid.0, |session| {
        session.pending_image_code = Some(code.clone());
    });

    let bytes = state.captcha.render(&code)?;

    Ok(([(header::CONTENT_TYPE, CONTENT_TYPE)], bytes))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode, header};
    use http_body_util::BodyExt;
    use sqlx::{Pool, Postgres};

    use crate::*;

    #[sqlx::test]
    async fn test_issue_overwrites_pending_code(pool: Pool<Postgres>) {
        let state = test_state(pool);
        let app = app(state.clone());

        // The test renderer echoes the code as the body.
        let response = make_request(
            app.clone(),
            Method::GET,
            "/captcha/",
            String::default(),
            &[("cookie", "sid=testsession")],
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/png"
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let first = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(first.len(), code::IMAGE_CODE_LENGTH);
        assert_eq!(
            state.sessions.get(TEST_SESSION).pending_image_code.as_deref(),
            Some(first.as_str())
        );

        let response = make_request(
            app,
            Method::GET,
            "/captcha/",
            String::default(),
            &[("cookie", "sid=testsession")],
        )
        .await;
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let second = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(
            state.sessions.get(TEST_SESSION).pending_image_code.as_deref(),
            Some(second.as_str())
        );
    }

    #[sqlx::test]
    async fn test_first_contact_sets_session_cookie(pool: Pool<Postgres>) {
        let app = app(test_state(pool));

        let response = make_request(
            app,
            Method::GET,
            "/captcha/",
            String::default(),
            &[],
        )
        .await;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("fresh session cookie")
            .to_str()
            .unwrap();
        assert!(cookie.starts_with("sid="));
        assert!(cookie.contains("HttpOnly"));
    }
}
