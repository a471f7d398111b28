//! Session teardown.

use axum::Extension;
use axum::extract::State;
use axum::response::Redirect;

use crate::AppState;
use crate::session::SessionId;

/// Handler dropping the whole session, identity and pending codes
/// alike, then returning to the landing page.
pub async fn handler(
    State(state): State<AppState>,
    Extension(sid): Extension<SessionId>,
) -> Redirect {
    state.sessions.clear(&sid.0);

    Redirect::to("/")
}
