//! profpoll is a small teacher rating service: browse subjects, vote
//! on teachers, chart the results and export them.

pub mod captcha;
pub mod code;
pub mod config;
pub mod crypto;
pub mod database;
pub mod delivery;
pub mod error;
pub mod gate;
pub mod router;
pub mod session;
pub mod subject;
pub mod teacher;
pub mod user;

use std::sync::Arc;
use std::time::Duration;

use axum::http::header;
use axum::routing::get;
use axum::{Router, middleware};
pub use error::ServerError;
use tower::ServiceBuilder;
use tower_http::LatencyUnit;
use tower_http::sensitive_headers::SetSensitiveHeadersLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};

/// MUST NEVER be used in production.
#[cfg(test)]
pub async fn make_request(
    app: Router,
    method: axum::http::Method,
    path: &str,
    body: String,
    headers: &[(&str, &str)],
) -> axum::http::Response<axum::body::Body> {
    use axum::extract::Request;
    use tower::util::ServiceExt;

    let mut builder = Request::builder().method(method).uri(path);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }

    app.oneshot(builder.body(axum::body::Body::from(body)).unwrap())
        .await
        .unwrap()
}

/// Session id every handler test pre-seeds through its cookie header.
#[cfg(test)]
pub const TEST_SESSION: &str = "testsession";

/// State with fakes for the injected capabilities.
#[cfg(test)]
pub fn test_state(pool: sqlx::PgPool) -> AppState {
    AppState {
        config: Arc::new(config::Configuration::default()),
        db: database::Database { postgres: pool },
        sessions: Arc::new(session::SessionStore::new()),
        hasher: Arc::new(crypto::Hasher::new()),
        delivery: Arc::new(delivery::RecordingDelivery::default()),
        captcha: Arc::new(captcha::EchoRenderer),
    }
}

/// State sharing between routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Configuration>,
    pub db: database::Database,
    pub sessions: Arc<session::SessionStore>,
    pub hasher: Arc<crypto::Hasher>,
    pub delivery: Arc<dyn delivery::CodeDelivery>,
    pub captcha: Arc<dyn captcha::ImageRenderer>,
}

/// Create router.
pub fn app(state: AppState) -> Router {
    let middleware_stack = ServiceBuilder::new()
        // Add high level tracing/logging to all requests.
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new().level(tracing::Level::INFO),
                )
                .on_request(DefaultOnRequest::new())
                .on_response(
                    DefaultOnResponse::new()
                        .latency_unit(LatencyUnit::Micros),
                ),
        )
        // Set a timeout.
        .layer(TimeoutLayer::new(Duration::from_secs(10)))
        // Remove sensitive headers from trace.
        .layer(SetSensitiveHeadersLayer::new([
            header::COOKIE,
            header::SET_COOKIE,
        ]));

    Router::new()
        // `GET /` goes to the subject list.
        .route("/", get(router::subjects::handler))
        // `GET /teachers/?sno=` goes to one subject's teachers.
        .route("/teachers/", get(router::teachers::handler))
        // Voting. Both sit in the protected table.
        .route("/praise/", get(router::vote::praise))
        .route("/criticize/", get(router::vote::criticize))
        // Account workflow.
        .route(
            "/login/",
            get(router::login::page).post(router::login::handler),
        )
        .route(
            "/register/",
            get(router::register::page).post(router::register::handler),
        )
        .route("/logout/", get(router::logout::handler))
        // Verification codes.
        .route("/captcha/", get(router::captcha::handler))
        .route("/mobile/", get(router::mobile::handler))
        // Exports. Both sit in the protected table.
        .route("/excel/", get(router::export::excel))
        .route("/pdf/", get(router::export::pdf))
        // Charts. The path format matches the protected table entries.
        .route("/bar/{no}", get(router::charts::page))
        .route("/teachers_data/", get(router::charts::teachers_data))
        .route("/subjects_data/", get(router::charts::subjects_data))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            gate::check_login,
        ))
        .route_layer(middleware::from_fn(session::attach))
        .with_state(state)
        .layer(middleware_stack)
}

/// Initialize the application state.
pub async fn initialize_state() -> Result<AppState, Box<dyn std::error::Error>>
{
    // read configuration file. let it in memory.
    let config = config::Configuration::default().read()?;

    let db = match config.postgres {
        Some(ref postgres) => database::Database::new(postgres).await?,
        None => {
            tracing::error!("missing `postgres` entry on `config.yaml` file");
            std::process::exit(0);
        },
    };

    // execute migrations scripts on start.
    sqlx::migrate!().run(&db.postgres).await?;

    let delivery: Arc<dyn delivery::CodeDelivery> = match &config.sms {
        Some(sms) => Arc::new(delivery::SmsGateway::new(sms)?),
        None => {
            tracing::warn!(
                "missing `sms` entry on `config.yaml` file, phone codes will fail"
            );
            Arc::new(delivery::DisabledDelivery)
        },
    };

    Ok(AppState {
        config,
        db,
        sessions: Arc::new(session::SessionStore::new()),
        hasher: Arc::new(crypto::Hasher::new()),
        delivery,
        captcha: Arc::new(captcha::GlyphRenderer),
    })
}
