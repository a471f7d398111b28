//! Request-level authorization gate.

use axum::Json;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, header::HeaderName};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::AppState;
use crate::router::{CODE_NOT_LOGGED_IN, Outcome};
use crate::session::SessionId;

/// Paths served only to logged-in sessions, matched verbatim.
///
/// Chart pages are listed one by one; a new `/bar/<n>` variant stays
/// open until added here.
pub const LOGIN_REQUIRED_PATHS: [&str; 8] = [
    "/praise/",
    "/criticize/",
    "/pdf/",
    "/excel/",
    "/bar/1",
    "/bar/2",
    "/teachers_data/",
    "/subjects_data/",
];

const HINT_NOT_LOGGED_IN: &str = "please log in first";
const REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");
const XML_HTTP_REQUEST: &str = "XMLHttpRequest";

/// Middleware guarding [`LOGIN_REQUIRED_PATHS`].
///
/// Performs no state transition itself: machine clients get the coded
/// payload, browsers get sent to the login page with a return target.
pub async fn check_login(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    if LOGIN_REQUIRED_PATHS.contains(&req.uri().path()) {
        let authenticated = req
            .extensions()
            .get::<SessionId>()
            .is_some_and(|sid| state.sessions.get(&sid.0).is_authenticated());

        if !authenticated {
            if is_xhr(req.headers()) {
                return Json(Outcome::new(
                    CODE_NOT_LOGGED_IN,
                    HINT_NOT_LOGGED_IN,
                ))
                .into_response();
            }

            let backurl = req
                .uri()
                .path_and_query()
                .map(|target| target.as_str())
                .unwrap_or("/");
            return Redirect::to(&format!("/login/?backurl={backurl}"))
                .into_response();
        }
    }

    next.run(req).await
}

fn is_xhr(headers: &HeaderMap) -> bool {
    headers
        .get(REQUESTED_WITH)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == XML_HTTP_REQUEST)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_verbatim_only() {
        assert!(LOGIN_REQUIRED_PATHS.contains(&"/praise/"));
        assert!(LOGIN_REQUIRED_PATHS.contains(&"/bar/2"));
        // No prefix matching: unlisted chart variants pass the gate.
        assert!(!LOGIN_REQUIRED_PATHS.contains(&"/bar/3"));
        assert!(!LOGIN_REQUIRED_PATHS.contains(&"/praise"));
        assert!(!LOGIN_REQUIRED_PATHS.contains(&"/"));
    }

    #[test]
    fn test_is_xhr_requires_exact_marker() {
        let mut headers = HeaderMap::new();
        assert!(!is_xhr(&headers));

        headers.insert(REQUESTED_WITH, "XMLHttpRequest".parse().unwrap());
        assert!(is_xhr(&headers));

        headers.insert(REQUESTED_WITH, "fetch".parse().unwrap());
        assert!(!is_xhr(&headers));
    }
}
