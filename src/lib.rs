use std::sync::Arc;

use axum::{Router, extract::FromRef, http::HeaderName, middleware};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Request gate and its collaborators.
pub mod config;
pub mod cookies;
pub mod gate;
pub mod locale;
pub mod paths;
pub mod session;
pub mod uri;

// HTTP surface behind (and beside) the gate.
pub mod handlers;
pub mod models;
pub mod routes;
use routes::{pages, public};

// --- Public Re-exports ---

pub use config::{AppConfig, ConfigError};
pub use gate::{GateDecision, RequestGate};
pub use locale::{
    LocaleNormalizer, LocaleOutcome, LocaleSet, LocaleState, PrefixLocaleNormalizer,
};
pub use paths::{PathClass, PathClassifier};

/// AppState
///
/// The single immutable container shared by every request: the compiled gate,
/// the locale-normalization collaborator, and the configuration both were
/// built from.
#[derive(Clone)]
pub struct AppState {
    /// Path tables and session policy, compiled once at startup.
    pub gate: Arc<RequestGate>,
    /// The collaborator the gate delegates to for locale prefixes.
    pub locale: LocaleState,
    /// The loaded, immutable configuration.
    pub config: AppConfig,
}

impl AppState {
    /// from_config
    ///
    /// Builds the gate and the default "always prefix" normalizer from one
    /// configuration.
    pub fn from_config(config: AppConfig) -> Result<Self, ConfigError> {
        let gate = RequestGate::from_config(&config)?;
        let locale = Arc::new(PrefixLocaleNormalizer::new(
            gate.locales().clone(),
            config.locale_cookie.clone(),
        )) as LocaleState;

        Ok(Self {
            gate: Arc::new(gate),
            locale,
            config,
        })
    }
}

// --- Axum FromRef Extractor Implementations ---

// Page handlers only need the compiled gate, not the whole state.
impl FromRef<AppState> for Arc<RequestGate> {
    fn from_ref(app_state: &AppState) -> Arc<RequestGate> {
        app_state.gate.clone()
    }
}

/// create_router
///
/// Assembles the routing structure, wraps the page routes (and their
/// fallback) in the request gate, and adds the observability layers.
pub fn create_router(state: AppState) -> Router {
    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 1. Gated pages. `layer` rather than `route_layer` so the fallback is
    //    gated too.
    let gated = pages::page_routes().layer(middleware::from_fn_with_state(
        state.clone(),
        gate::request_gate,
    ));

    // 2. Ungated routes are merged after the gate layer is applied.
    let base_router = gated.merge(public::public_routes()).with_state(state);

    // 3. Observability and Correlation Layers (outermost)
    base_router.layer(
        ServiceBuilder::new()
            // 3a. Request ID Generation: a UUID for every incoming request.
            .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
            // 3b. Request Tracing: one span per request, carrying the request ID.
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(trace_span_logger)
                    .on_response(
                        DefaultOnResponse::new()
                            .level(Level::INFO)
                            .latency_unit(tower_http::LatencyUnit::Millis),
                    ),
            )
            // 3c. Request ID Propagation: echo x-request-id back to the client.
            .layer(PropagateRequestIdLayer::new(x_request_id)),
    )
}

/// trace_span_logger
///
/// Customizes the `TraceLayer` span so every log line of a request, including
/// the gate's decisions, is correlated by its request ID.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
