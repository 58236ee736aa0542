use axum::{
    extract::{Request, State},
    http::{Uri, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;

use crate::{
    AppState,
    config::{AppConfig, ConfigError},
    cookies,
    locale::{LocaleOutcome, LocaleSet},
    paths::{PathClass, PathClassifier},
    session,
    uri::with_path,
};

/// GateDecision
///
/// The single terminal outcome of running a request through the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Hand the request to the locale normalizer.
    Delegate,
    /// A signed-in user asked for a page meant for anonymous visitors.
    RedirectHome(Uri),
    /// An anonymous user asked for a protected page.
    RedirectLogin(Uri),
}

/// RequestGate
///
/// Decides, per request, between locale normalization, login redirect and
/// home redirect. Holds no mutable state: one instance is shared by every
/// request.
#[derive(Debug, Clone)]
pub struct RequestGate {
    classifier: PathClassifier,
    locales: LocaleSet,
    login_path: String,
    home_path: String,
    session_cookie: String,
}

impl RequestGate {
    pub fn new(
        classifier: PathClassifier,
        locales: LocaleSet,
        login_path: impl Into<String>,
        home_path: impl Into<String>,
        session_cookie: impl Into<String>,
    ) -> Self {
        Self {
            classifier,
            locales,
            login_path: login_path.into(),
            home_path: home_path.into(),
            session_cookie: session_cookie.into(),
        }
    }

    /// from_config
    ///
    /// Validates `config` and compiles its path tables.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let locales = LocaleSet::new(config.locales.clone(), &config.default_locale)?;
        let classifier =
            PathClassifier::new(&config.public_paths, &config.auth_only_paths, &locales)?;
        Ok(Self::new(
            classifier,
            locales,
            &config.login_path,
            &config.home_path,
            &config.session_cookie,
        ))
    }

    pub fn classifier(&self) -> &PathClassifier {
        &self.classifier
    }

    pub fn locales(&self) -> &LocaleSet {
        &self.locales
    }

    pub fn session_cookie(&self) -> &str {
        &self.session_cookie
    }

    /// decide
    ///
    /// The gate's state machine. `token` is the raw session cookie value and
    /// `now` the current time in seconds since the epoch.
    ///
    /// 1. Root: always delegate, so locale negotiation runs first for the
    ///    bare origin.
    /// 2. Public: delegate, unless the page is auth-only and the session is
    ///    valid, in which case go home.
    /// 3. Anything else is protected: no session means login; a session on
    ///    an auth-only page means home; otherwise delegate.
    pub fn decide(&self, uri: &Uri, token: Option<&str>, now: i64) -> GateDecision {
        let path = uri.path();

        match self.classifier.classify(path) {
            // 1. Root
            PathClass::Root => GateDecision::Delegate,
            // 2. Public
            PathClass::AuthOnly if session::is_authenticated_at(token, now) => {
                GateDecision::RedirectHome(self.redirect_target(uri, &self.home_path))
            }
            PathClass::AuthOnly | PathClass::Public => GateDecision::Delegate,
            // 3. Protected (fail-closed default)
            PathClass::Protected => {
                if !session::is_authenticated_at(token, now) {
                    return GateDecision::RedirectLogin(
                        self.redirect_target(uri, &self.login_path),
                    );
                }
                // Unreachable with a validated configuration, where auth-only
                // pages are always public.
                if self.classifier.is_auth_only(path) {
                    return GateDecision::RedirectHome(self.redirect_target(uri, &self.home_path));
                }
                GateDecision::Delegate
            }
        }
    }

    /// redirect_target
    ///
    /// Rewrites `uri` to point at the logical page `target` under the
    /// request's locale: `/{locale}/{target without outer slashes}`. The
    /// locale is the request's first path segment when it is supported, the
    /// default otherwise. Scheme, authority and query are kept.
    ///
    /// Applying it to its own output yields the same URI.
    pub fn redirect_target(&self, uri: &Uri, target: &str) -> Uri {
        let locale = self
            .locales
            .split_prefix(uri.path())
            .0
            .unwrap_or_else(|| self.locales.default_locale());
        let page = target.trim_matches('/');
        with_path(uri, &format!("/{locale}/{page}"))
    }
}

/// request_gate
///
/// Axum middleware wrapping every page route. Runs the gate's decision and,
/// when it delegates, the locale normalizer from the application state.
///
/// Redirects use `307 Temporary Redirect`. When a request is let through, the
/// response refreshes the locale cookie if the normalizer asks for it.
pub async fn request_gate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let token = cookies::read_cookie(request.headers(), state.gate.session_cookie());
    let decision = state
        .gate
        .decide(request.uri(), token.as_deref(), Utc::now().timestamp());

    match decision {
        GateDecision::RedirectHome(location) => {
            tracing::debug!(
                path = %request.uri().path(),
                %location,
                "authenticated user sent home"
            );
            redirect(&location)
        }
        GateDecision::RedirectLogin(location) => {
            tracing::debug!(
                path = %request.uri().path(),
                %location,
                "anonymous user sent to login"
            );
            redirect(&location)
        }
        GateDecision::Delegate => {
            let (parts, body) = request.into_parts();
            let outcome = state.locale.normalize(&parts);

            match outcome {
                LocaleOutcome::Redirect(location) => {
                    tracing::debug!(path = %parts.uri.path(), %location, "locale prefix enforced");
                    redirect(&location)
                }
                LocaleOutcome::Continue { locale, remember } => {
                    tracing::debug!(path = %parts.uri.path(), %locale, remember, "request let through");
                    let mut response = next.run(Request::from_parts(parts, body)).await;
                    if remember {
                        if let Some(cookie) =
                            cookies::locale_cookie(&state.config.locale_cookie, &locale)
                        {
                            response.headers_mut().append(header::SET_COOKIE, cookie);
                        }
                    }
                    response
                }
            }
        }
    }
}

fn redirect(location: &Uri) -> Response {
    Redirect::temporary(&location.to_string()).into_response()
}
