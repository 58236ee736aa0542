use std::sync::Arc;

use axum::http::{HeaderMap, Uri, header, request::Parts};

use crate::{config::ConfigError, cookies, uri::with_path};

/// LocaleSet
///
/// The fixed set of locale codes the portal is served in, plus the one used
/// when a request carries no usable hint. Codes keep their configured casing;
/// matching against request data is case-insensitive.
#[derive(Clone, Debug)]
pub struct LocaleSet {
    codes: Vec<String>,
    default: String,
}

impl LocaleSet {
    pub fn new(codes: Vec<String>, default: &str) -> Result<Self, ConfigError> {
        if codes.is_empty() {
            return Err(ConfigError::NoLocales);
        }
        let default = codes
            .iter()
            .find(|code| code.eq_ignore_ascii_case(default))
            .cloned()
            .ok_or_else(|| ConfigError::UnknownDefaultLocale(default.to_string()))?;
        Ok(Self { codes, default })
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn default_locale(&self) -> &str {
        &self.default
    }

    /// Maps a path segment or language tag to its canonical supported code.
    pub fn resolve(&self, segment: &str) -> Option<&str> {
        self.codes
            .iter()
            .find(|code| code.eq_ignore_ascii_case(segment))
            .map(String::as_str)
    }

    /// Splits a leading locale segment off `path`.
    ///
    /// Returns the canonical locale (if the first segment is one) and the
    /// logical remainder, which always starts with `/`.
    pub fn split_prefix<'p>(&self, path: &'p str) -> (Option<&str>, &'p str) {
        let trimmed = path.strip_prefix('/').unwrap_or(path);
        let (first, rest) = match trimmed.find('/') {
            Some(idx) => (&trimmed[..idx], &trimmed[idx..]),
            None => (trimmed, ""),
        };
        match self.resolve(first) {
            Some(locale) if rest.is_empty() => (Some(locale), "/"),
            Some(locale) => (Some(locale), rest),
            None if path.is_empty() => (None, "/"),
            None => (None, path),
        }
    }
}

/// LocaleOutcome
///
/// The collaborator's verdict on a request. The gate forwards it unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleOutcome {
    /// The path already carries a canonical locale prefix.
    /// `remember` asks for the locale cookie to be (re)written.
    Continue { locale: String, remember: bool },
    /// The client must retry at the locale-prefixed URL.
    Redirect(Uri),
}

/// LocaleNormalizer Contract
///
/// Enforces a supported-locale prefix on every page URL. Implementations must
/// be idempotent: a path they would let through must not be redirected again.
pub trait LocaleNormalizer: Send + Sync {
    fn normalize(&self, parts: &Parts) -> LocaleOutcome;
}

/// Shared handle to the active normalizer, stored in `AppState`.
pub type LocaleState = Arc<dyn LocaleNormalizer>;

/// PrefixLocaleNormalizer
///
/// "Always prefix" policy: every page lives under `/{locale}/...`. Unprefixed
/// requests are redirected to the locale negotiated from the locale cookie,
/// then `Accept-Language`, then the default.
#[derive(Clone, Debug)]
pub struct PrefixLocaleNormalizer {
    locales: LocaleSet,
    cookie_name: String,
}

impl PrefixLocaleNormalizer {
    pub fn new(locales: LocaleSet, cookie_name: impl Into<String>) -> Self {
        Self {
            locales,
            cookie_name: cookie_name.into(),
        }
    }

    /// negotiate
    ///
    /// Picks the locale for a request that has none in its path.
    pub fn negotiate(&self, headers: &HeaderMap) -> String {
        if let Some(code) = cookies::read_cookie(headers, &self.cookie_name)
            .as_deref()
            .and_then(|value| self.locales.resolve(value))
        {
            return code.to_string();
        }

        let accept_language = headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok());
        if let Some(code) = accept_language.and_then(|value| self.best_accepted(value)) {
            return code.to_string();
        }

        self.locales.default_locale().to_string()
    }

    /// Best supported match for an `Accept-Language` header value.
    ///
    /// Exact tags win over primary-subtag matches (`uk-UA` → `uk`); ties keep
    /// header order. `q=0` ranges are never selected.
    fn best_accepted(&self, header_value: &str) -> Option<&str> {
        let mut best: Option<(f32, &str)> = None;
        for (tag, quality) in parse_accept_language(header_value) {
            if quality <= 0.0 {
                continue;
            }
            let candidate = self.locales.resolve(tag).or_else(|| {
                let primary = tag.split('-').next().unwrap_or(tag);
                self.locales.resolve(primary)
            });
            if let Some(code) = candidate {
                if best.is_none_or(|(q, _)| quality > q) {
                    best = Some((quality, code));
                }
            }
        }
        best.map(|(_, code)| code)
    }
}

impl LocaleNormalizer for PrefixLocaleNormalizer {
    fn normalize(&self, parts: &Parts) -> LocaleOutcome {
        let path = parts.uri.path();
        let first = path
            .trim_start_matches('/')
            .split('/')
            .next()
            .unwrap_or_default();

        match self.locales.split_prefix(path) {
            // 1. Canonical prefix: let it through.
            (Some(locale), _) if first == locale => {
                let remember = cookies::read_cookie(&parts.headers, &self.cookie_name)
                    .is_none_or(|current| current != locale);
                LocaleOutcome::Continue {
                    locale: locale.to_string(),
                    remember,
                }
            }
            // 2. Supported locale in the wrong case: canonicalize.
            (Some(locale), rest) => {
                LocaleOutcome::Redirect(with_path(&parts.uri, &join_locale(locale, rest)))
            }
            // 3. No prefix: negotiate one.
            (None, rest) => {
                let locale = self.negotiate(&parts.headers);
                LocaleOutcome::Redirect(with_path(&parts.uri, &join_locale(&locale, rest)))
            }
        }
    }
}

/// `/{locale}` for the home page, `/{locale}{rest}` otherwise.
fn join_locale(locale: &str, rest: &str) -> String {
    if rest == "/" {
        format!("/{locale}")
    } else {
        format!("/{locale}{rest}")
    }
}

/// Parses `Accept-Language` into `(tag, q)` pairs in header order.
/// Malformed q-values count as `1.0`; `*` is skipped.
fn parse_accept_language(value: &str) -> impl Iterator<Item = (&str, f32)> {
    value.split(',').filter_map(|range| {
        let mut pieces = range.split(';').map(str::trim);
        let tag = pieces.next().filter(|tag| !tag.is_empty() && *tag != "*")?;
        let quality = pieces
            .find_map(|param| param.strip_prefix("q="))
            .and_then(|q| q.parse::<f32>().ok())
            .unwrap_or(1.0);
        Some((tag, quality))
    })
}
