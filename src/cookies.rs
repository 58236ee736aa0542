use axum::http::{HeaderMap, HeaderValue, header};

/// One year, in seconds.
const LOCALE_COOKIE_MAX_AGE: u32 = 31_536_000;

/// read_cookie
///
/// Looks `name` up across every `Cookie` header of a request. Names compare
/// exactly; a value wrapped in double quotes is unwrapped. Headers that are
/// not valid visible ASCII are skipped.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|line| line.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| {
            let value = value.trim();
            value
                .strip_prefix('"')
                .and_then(|inner| inner.strip_suffix('"'))
                .unwrap_or(value)
                .to_string()
        })
}

/// locale_cookie
///
/// `Set-Cookie` value remembering the client's locale for a year.
pub fn locale_cookie(name: &str, locale: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{name}={locale}; Path=/; Max-Age={LOCALE_COOKIE_MAX_AGE}; SameSite=Lax"
    ))
    .ok()
}
