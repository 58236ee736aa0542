use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Page Router Module
///
/// Every page the portal serves lives under a locale segment. Unprefixed
/// paths never reach these routes: the gate's locale normalizer redirects
/// them first.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        // GET /{locale} and /{locale}/
        // The home page of a locale.
        .route("/{locale}", get(handlers::render_home))
        .route("/{locale}/", get(handlers::render_home))
        // GET /{locale}/{*page}
        // Any other page; the wildcard keeps nested paths like
        // `password-reset/success` in one parameter.
        .route("/{locale}/{*page}", get(handlers::render_page))
        // Unmatched requests still pass through the gate before the 404.
        .fallback(handlers::not_found)
}
