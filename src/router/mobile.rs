//! Phone verification code issuing.

use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::Deserialize;

use crate::router::{
    CODE_INVALID_PHONE, CODE_SMS_FAILED, CODE_SMS_SENT, Outcome,
};
use crate::session::SessionId;
use crate::{AppState, code, router};

const HINT_SENT: &str = "verification code sent";
const HINT_FAILED: &str = "could not send code, try again later";
const HINT_INVALID_PHONE: &str = "enter a valid phone number";

#[derive(Debug, Default, Deserialize)]
pub struct Params {
    tel: Option<String>,
}

/// Handler issuing a fresh phone code through the delivery channel.
///
/// The code is pinned to the session before the gateway call, so a
/// slow gateway cannot race a second issue into an older code.
pub async fn handler(
    State(state): State<AppState>,
    Extension(sid): Extension<SessionId>,
    Query(params): Query<Params>,
) -> Json<Outcome> {
    let Some(tel) =
        params.tel.filter(|tel| router::validate_tel(tel).is_ok())
    else {
        return Json(Outcome::new(CODE_INVALID_PHONE, HINT_INVALID_PHONE));
    };

    let code = code::phone_code();
    state.sessions.update(&sid.0, |session| {
        session.pending_phone_code = Some(code.clone());
    });

    match state.delivery.send(&tel, &code).await {
        Ok(()) => Json(Outcome::new(CODE_SMS_SENT, HINT_SENT)),
        Err(err) => {
            tracing::warn!(error = %err, "phone code delivery failed");
            Json(Outcome::new(CODE_SMS_FAILED, HINT_FAILED))
        },
    }
}
