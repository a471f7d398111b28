//! Login workflow.
//!
//! The image code is checked before anything touches the database, and
//! a mismatch answers with the same hint whether or not the username
//! exists.

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Extension, Form, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::Result;
use crate::session::SessionId;
use crate::user::UserRepository;
use crate::{AppState, router};

const HINT_WRONG_CODE: &str = "enter the correct verification code";
const HINT_WRONG_CREDENTIALS: &str = "invalid username or password";
const DEFAULT_BACKURL: &str = "/";

/// Login page model, rendered by the front-end as the form.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Page {
    pub hint: String,
    pub backurl: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Params {
    backurl: Option<String>,
}

/// Handler rendering the login page model.
pub async fn page(Query(params): Query<Params>) -> Json<Page> {
    Json(Page {
        hint: String::default(),
        backurl: params
            .backurl
            .unwrap_or_else(|| DEFAULT_BACKURL.to_owned()),
    })
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
        equal = 4,
        message = "enter the 4-character verification code"
    ))]
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub backurl: String,
}

/// Handler for login submissions.
pub async fn handler(
    State(state): State<AppState>,
    Extension(sid): Extension<SessionId>,
    Form(body): Form<Body>,
) -> Result<Response> {
    let backurl = if body.backurl.is_empty() {
        DEFAULT_BACKURL.to_owned()
    } else {
        body.backurl.clone()
    };

    if let Err(errors) = body.validate() {
        return Ok(rerender(router::first_hint(&errors), backurl));
    }

    let pending = state.sessions.get(&sid.0).pending_image_code;
    let matched = pending
        .is_some_and(|pending| pending.eq_ignore_ascii_case(&body.code));
    if !matched {
        return Ok(rerender(HINT_WRONG_CODE.to_owned(), backurl));
    }

    let digest = state.hasher.digest(&body.password);
    let user = UserRepository::new(state.db.postgres.clone())
        .find_by_credentials(&body.username, &digest)
        .await?;

    match user {
        Some(user) => {
            state.sessions.update(&sid.0, |session| {
                session.user_id = Some(user.no);
                session.username = Some(user.username.clone());
            });
            tracing::info!(user = %user.username, "login succeeded");

            Ok(Redirect::to(&backurl).into_response())
        },
        None => Ok(rerender(HINT_WRONG_CREDENTIALS.to_owned(), backurl)),
    }
}

fn rerender(hint: String, backurl: String) -> Response {
    Json(Page { hint, backurl }).into_response()
}
