use axum::http::{Uri, uri::PathAndQuery};

/// with_path
///
/// Rebuilds `uri` with a new path, keeping its scheme, authority and query.
/// Origin-form request URIs (the usual case behind a server) stay relative.
///
/// A path that is not a valid URI path cannot come out of a validated
/// configuration; if one does, the result degrades to `/` rather than failing.
pub fn with_path(uri: &Uri, path: &str) -> Uri {
    let candidate = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    };
    let Ok(path_and_query) = PathAndQuery::try_from(candidate) else {
        tracing::warn!(path, "redirect path is not a valid URI path");
        return Uri::from_static("/");
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.clone());
    Uri::from_parts(parts).unwrap_or_else(|_| Uri::from(path_and_query))
}

/// True when `path` can be used as the path of a URI.
pub fn is_valid_path(path: &str) -> bool {
    PathAndQuery::try_from(path).is_ok_and(|pq| pq.query().is_none())
}
