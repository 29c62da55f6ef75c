use axum::{
    extract::{DefaultBodyLimit, Query, State},
    http::{HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tracing::info;

use crate::catalog::store::Library;
use crate::cli::ServeArgs;
use crate::core::types::Version;
use crate::lookup::{LookupConfig, LookupEngine, LookupError};
use crate::utils::validation::validate_query;

/// Requests carry only a query string
pub const MAX_REQUEST_BODY_SIZE: usize = 16 * 1024;

/// Shared application state
pub struct AppState {
    pub library: Library,
    pub default_version: Version,
    pub config: LookupConfig,
}

impl AppState {
    pub fn new(library: Library, default_version: Version) -> Self {
        Self {
            library,
            default_version,
            config: LookupConfig::default(),
        }
    }
}

/// Enhanced error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    pub details: Option<String>,
}

/// Query parameters for verse lookups
#[derive(Deserialize)]
pub struct VerseQueryParams {
    /// Reference, e.g. "John 3:16-18"
    q: Option<String>,
    /// Translation identifier; the server default when omitted
    version: Option<String>,
}

/// Create a safe error response that prevents information disclosure
/// while logging detailed errors server-side for debugging
pub fn create_safe_error_response(
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> ErrorResponse {
    if let Some(internal_msg) = internal_error {
        tracing::error!("Internal error ({}): {}", error_type, internal_msg);
    }

    ErrorResponse {
        error: user_message.to_string(),
        error_type: error_type.to_string(),
        details: None,
    }
}

/// Run the web server
///
/// # Errors
///
/// Returns an error if the library cannot be loaded, the tokio runtime cannot
/// be created, or the server fails to start.
pub fn run(args: ServeArgs) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move { run_server(args).await })
}

/// Routes without middleware
pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/verse/", get(verse_handler))
        .route("/verse", get(verse_handler))
        .route("/api/versions", get(versions_handler))
        .with_state(state)
}

/// Create the application router with all routes and middleware configured.
///
/// # Errors
///
/// Returns an error if the rate limiter cannot be configured.
pub fn create_router(state: Arc<AppState>) -> anyhow::Result<Router> {
    // Configure IP-based rate limiting
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(10)
        .burst_size(50)
        .finish()
        .ok_or_else(|| anyhow::anyhow!("invalid rate limit configuration"))?;

    let app = routes(state).layer(
        ServiceBuilder::new()
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods([Method::GET, Method::OPTIONS]),
            )
            // Security headers for browser protection
            .layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static("x-content-type-options"),
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static("x-frame-options"),
                HeaderValue::from_static("DENY"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static("referrer-policy"),
                HeaderValue::from_static("strict-origin-when-cross-origin"),
            ))
            .layer(GovernorLayer {
                config: Arc::new(governor_conf),
            })
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(30),
            ))
            .layer(ConcurrencyLimitLayer::new(100))
            .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_SIZE)),
    );

    Ok(app)
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let library = Library::load_from_file(&args.library)?;
    info!(
        translations = library.len(),
        verses = library.verse_count_total(),
        "Loaded library"
    );
    let state = Arc::new(AppState::new(library, args.default_translation));
    let app = create_router(state)?;

    let addr = format!("{}:{}", args.address, args.port);
    println!("Starting lectionary server at http://{addr}");

    if args.open {
        let _ = open::that(format!("http://{addr}/api/versions"));
    }

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn error_response(status: StatusCode, body: ErrorResponse) -> Response {
    (status, Json(body)).into_response()
}

/// Map a lookup failure to a status code and a client-safe body
fn lookup_error_response(err: &LookupError) -> Response {
    match err {
        LookupError::InvalidFormat(msg) => error_response(
            StatusCode::BAD_REQUEST,
            create_safe_error_response("invalid_format", &format!("Invalid reference: {msg}"), None),
        ),
        LookupError::TooManyVerses(limit) => error_response(
            StatusCode::BAD_REQUEST,
            create_safe_error_response(
                "too_many_verses",
                &format!("Reference expands to more than {limit} verses"),
                None,
            ),
        ),
        LookupError::NotFound(msg) => error_response(
            StatusCode::NOT_FOUND,
            create_safe_error_response("not_found", &format!("Not found: {msg}"), None),
        ),
        LookupError::LookupFailure(msg) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            create_safe_error_response("lookup_failure", "Failed to look up verses", Some(msg)),
        ),
    }
}

/// API endpoint for resolving a reference
async fn verse_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<VerseQueryParams>,
) -> Response {
    let raw = params.q.unwrap_or_default();
    if raw.trim().is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            create_safe_error_response("missing_query", "Missing query parameter 'q'", None),
        );
    }

    let query = match validate_query(&raw) {
        Ok(query) => query,
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                create_safe_error_response("invalid_query", &e.to_string(), None),
            );
        }
    };

    let version = params
        .version
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map_or(state.default_version, Version::from_id);
    info!(query, version = %version, "Verse request");

    let engine = LookupEngine::with_config(&state.library, state.config.clone());
    match engine.find(query, version) {
        Ok(verses) => Json(verses).into_response(),
        Err(err) => lookup_error_response(&err),
    }
}

#[derive(Serialize)]
struct VersionInfo {
    id: Version,
    books: usize,
    verses: usize,
}

/// API endpoint listing loaded translations
async fn versions_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let versions: Vec<VersionInfo> = state
        .library
        .versions()
        .map(|(id, translation)| VersionInfo {
            id,
            books: translation.len(),
            verses: translation.verse_count(),
        })
        .collect();

    Json(serde_json::json!({
        "count": versions.len(),
        "versions": versions,
    }))
}
