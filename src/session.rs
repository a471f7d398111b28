//! Browser-session state.
//!
//! Every browser gets a `sid` cookie on first contact. The record
//! behind it holds at most one pending code of each kind plus, once
//! logged in, the acting user. Logout drops the whole record.

use axum::extract::Request;
use axum::http::{HeaderValue, header};
use axum::middleware::Next;
use axum::response::Response;
use dashmap::DashMap;
use rand::distributions::{Alphanumeric, DistString};
use rand::rngs::OsRng;

const SESSION_COOKIE: &str = "sid";
const SESSION_ID_LENGTH: usize = 32;

/// Per-browser state.
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub pending_image_code: Option<String>,
    pub pending_phone_code: Option<String>,
    pub user_id: Option<i32>,
    pub username: Option<String>,
}

impl Session {
    /// Whether the login handler stored an identity in this session.
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}

/// Shared map of live sessions, keyed by the cookie value.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: DashMap<String, Session>,
}

impl SessionStore {
    /// Create a new [`SessionStore`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the session behind `id`; unknown ids read as empty.
    pub fn get(&self, id: &str) -> Session {
        self.inner
            .get(id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Mutate the session behind `id`, creating it when absent.
    pub fn update(&self, id: &str, apply: impl FnOnce(&mut Session)) {
        let mut entry = self.inner.entry(id.to_owned()).or_default();
        apply(&mut entry);
    }

    /// Drop the whole record: pending codes and identity alike.
    pub fn clear(&self, id: &str) {
        self.inner.remove(id);
    }
}

/// Session id bound to the current request.
#[derive(Clone, Debug)]
pub struct SessionId(pub String);

/// Middleware that binds a session id to every request.
///
/// Reuses the `sid` cookie when the browser presents one, otherwise
/// mints a fresh id and sets the cookie on the way out.
pub async fn attach(mut req: Request, next: Next) -> Response {
    let existing = req
        .headers()
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_session_cookie);

    let (id, fresh) = match existing {
        Some(id) => (id, false),
        None => (
            Alphanumeric.sample_string(&mut OsRng, SESSION_ID_LENGTH),
            true,
        ),
    };

    req.extensions_mut().insert(SessionId(id.clone()));

    let mut response = next.run(req).await;

    if fresh {
        let cookie =
            format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax");
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    response
}

fn parse_session_cookie(header: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty())
            .then(|| value.to_owned())
    })
}
