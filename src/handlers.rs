use std::sync::Arc;

use crate::{
    gate::RequestGate,
    models::{ErrorBody, PageView},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// health
///
/// [Ungated Route] Liveness probe for load balancers.
pub async fn health() -> &'static str {
    "ok"
}

/// render_home
///
/// [Gated Route] The home page of a locale: `/{locale}` or `/{locale}/`.
pub async fn render_home(
    State(gate): State<Arc<RequestGate>>,
    Path(locale): Path<String>,
) -> Response {
    page_view(&gate, &locale, "")
}

/// render_page
///
/// [Gated Route] Any other page under a locale. By the time a request gets
/// here the gate has already enforced the session policy for its path.
pub async fn render_page(
    State(gate): State<Arc<RequestGate>>,
    Path((locale, page)): Path<(String, String)>,
) -> Response {
    page_view(&gate, &locale, &page)
}

/// not_found
///
/// [Gated Fallback] Anything no page route matches.
pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("not found"))).into_response()
}

fn page_view(gate: &RequestGate, locale: &str, page: &str) -> Response {
    // Only canonical codes reach the handlers through the normalizer; a
    // mismatch means a custom normalizer let something odd through.
    let Some(locale) = gate
        .locales()
        .resolve(locale)
        .filter(|canonical| *canonical == locale)
    else {
        return (StatusCode::NOT_FOUND, Json(ErrorBody::new("unsupported locale")))
            .into_response();
    };

    let page = page.trim_matches('/');
    Json(PageView {
        locale: locale.to_string(),
        page: format!("/{page}"),
    })
    .into_response()
}
