//! Registration workflow.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Form, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::Result;
use crate::session::SessionId;
use crate::user::{User, UserRepository};
use crate::{AppState, router};

const HINT_WRONG_PHONE_CODE: &str =
    "enter the correct phone verification code";
const HINT_PASSWORDS_DIFFER: &str = "password and confirmation must match";
const HINT_USERNAME_TAKEN: &str = "username already taken";
const HINT_REGISTERED: &str = "registered, please log in";

/// Registration page model.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Page {
    pub hint: String,
}

/// Handler rendering the registration page model.
pub async fn page() -> Json<Page> {
    Json(Page::default())
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Body {
    #[validate(custom(function = "crate::router::validate_username"))]
    #[serde(default)]
    pub username: String,
    #[validate(length(
        min = 8,
        max = 20,
        message = "password must be at least 8 characters"
    ))]
    #[serde(default)]
    pub password: String,
    #[validate(length(
        min = 8,
        max = 20,
        message = "confirm the password"
    ))]
    #[serde(default)]
    pub repassword: String,
    #[serde(default)]
    pub email: String,
    #[validate(custom(function = "crate::router::validate_tel"))]
    #[serde(default)]
    pub tel: String,
    #[validate(length(
        equal = 6,
        message = "enter the 6-digit phone code"
    ))]
    #[serde(default)]
    pub code: String,
    #[validate(custom(function = "crate::router::validate_agreement"))]
    #[serde(default)]
    pub agreement: String,
}

/// Handler for registration submissions.
///
/// A successful registration answers with the login page model so the
/// browser lands on the form it needs next.
pub async fn handler(
    State(state): State<AppState>,
    Extension(sid): Extension<SessionId>,
    Form(body): Form<Body>,
) -> Result<Response> {
    if let Err(errors) = body.validate() {
        return Ok(rerender(router::first_hint(&errors)));
    }

    if state.hasher.digest(&body.repassword)
        != state.hasher.digest(&body.password)
    {
        return Ok(rerender(HINT_PASSWORDS_DIFFER.to_owned()));
    }

    let pending = state.sessions.get(&sid.0).pending_phone_code;
    if pending.as_deref() != Some(body.code.as_str()) {
        return Ok(rerender(HINT_WRONG_PHONE_CODE.to_owned()));
    }

    let user = User {
        no: 0,
        username: body.username.clone(),
        password: state.hasher.digest(&body.password),
        email: body.email.clone(),
        tel: body.tel.clone(),
    };

    let created = UserRepository::new(state.db.postgres.clone())
        .insert(&user)
        .await?;
    if !created {
        return Ok(rerender(HINT_USERNAME_TAKEN.to_owned()));
    }

    tracing::info!(user = %body.username, "account created");

    Ok(Json(super::login::Page {
        hint: HINT_REGISTERED.to_owned(),
        backurl: "/".to_owned(),
    })
    .into_response())
}

fn rerender(hint: String) -> Response {
    Json(Page { hint }).into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use sqlx::{Pool, Postgres};

    use super::*;
    use crate::*;

    const FORM: &str = "application/x-www-form-urlencoded";

    fn form_body(code: &str) -> String {
        format!(
            "username=new_student&password=supersecret\
             &repassword=supersecret&email=new@example.com\
             &tel=13912345678&code={code}&agreement=on"
        )
    }

    async fn hint_of(
        response: axum::http::Response<axum::body::Body>,
    ) -> String {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let page: serde_json::Value = serde_json::from_slice(&body).unwrap();
        page["hint"].as_str().unwrap().to_owned()
    }

    #[sqlx::test]
    async fn test_register_creates_user(pool: Pool<Postgres>) {
        let state = test_state(pool.clone());
        state.sessions.update(TEST_SESSION, |session| {
            session.pending_phone_code = Some("123456".into());
        });
        let app = app(state.clone());

        let response = make_request(
            app,
            Method::POST,
            "/register/",
            form_body("123456"),
            &[("content-type", FORM), ("cookie", "sid=testsession")],
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(hint_of(response).await, HINT_REGISTERED);

        let digest = state.hasher.digest("supersecret");
        let user = UserRepository::new(pool)
            .find_by_credentials("new_student", &digest)
            .await
            .unwrap()
            .expect("registered user");
        assert_eq!(user.tel, "13912345678");
        assert_eq!(user.email, "new@example.com");
    }

    #[sqlx::test]
    async fn test_wrong_phone_code_rejects(pool: Pool<Postgres>) {
        let state = test_state(pool.clone());
        state.sessions.update(TEST_SESSION, |session| {
            session.pending_phone_code = Some("123456".into());
        });
        let app = app(state);

        // Phone codes compare exactly, unlike image codes.
        let response = make_request(
            app,
            Method::POST,
            "/register/",
            form_body("654321"),
            &[("content-type", FORM), ("cookie", "sid=testsession")],
        )
        .await;
        assert_eq!(hint_of(response).await, HINT_WRONG_PHONE_CODE);

        let digest = test_state_digest();
        let user = UserRepository::new(pool)
            .find_by_credentials("new_student", &digest)
            .await
            .unwrap();
        assert!(user.is_none());
    }

    fn test_state_digest() -> String {
        crate::crypto::Hasher::new().digest("supersecret")
    }

    #[sqlx::test]
    async fn test_mismatched_confirmation_rejects(pool: Pool<Postgres>) {
        let state = test_state(pool);
        state.sessions.update(TEST_SESSION, |session| {
            session.pending_phone_code = Some("123456".into());
        });
        let app = app(state);

        let body = form_body("123456")
            .replace("repassword=supersecret", "repassword=other-secret");
        let response = make_request(
            app,
            Method::POST,
            "/register/",
            body,
            &[("content-type", FORM), ("cookie", "sid=testsession")],
        )
        .await;

        assert_eq!(hint_of(response).await, HINT_PASSWORDS_DIFFER);
    }

    #[sqlx::test]
    async fn test_missing_agreement_rejects(pool: Pool<Postgres>) {
        let state = test_state(pool);
        state.sessions.update(TEST_SESSION, |session| {
            session.pending_phone_code = Some("123456".into());
        });
        let app = app(state);

        let body = form_body("123456").replace("&agreement=on", "");
        let response = make_request(
            app,
            Method::POST,
            "/register/",
            body,
            &[("content-type", FORM), ("cookie", "sid=testsession")],
        )
        .await;

        assert_eq!(
            hint_of(response).await,
            "you must accept the user agreement"
        );
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql"))]
    async fn test_taken_username_rejects(pool: Pool<Postgres>) {
        let state = test_state(pool);
        state.sessions.update(TEST_SESSION, |session| {
            session.pending_phone_code = Some("123456".into());
        });
        let app = app(state);

        let body = form_body("123456")
            .replace("username=new_student", "username=student_007");
        let response = make_request(
            app,
            Method::POST,
            "/register/",
            body,
            &[("content-type", FORM), ("cookie", "sid=testsession")],
        )
        .await;

        assert_eq!(hint_of(response).await, HINT_USERNAME_TAKEN);
    }
}
