use std::{collections::HashSet, env};

use thiserror::Error;

use crate::uri::is_valid_path;

/// Reference deployment: the portal is served in English and Ukrainian.
const DEFAULT_LOCALES: &[&str] = &["en", "uk"];

/// Pages reachable without a session.
const DEFAULT_PUBLIC_PATHS: &[&str] = &[
    "/",
    "/login",
    "/password-reset",
    "/password-reset/success",
    "/curator-search",
    "/complaints",
    "/support",
    "/faq",
];

/// Public pages that only make sense before signing in.
const DEFAULT_AUTH_ONLY_PATHS: &[&str] = &["/login", "/password-reset/success", "/password-reset"];

/// ConfigError
///
/// Every way a configuration can be rejected at startup. The gate itself never
/// produces errors; all of its failure modes are folded into its decisions.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("at least one supported locale must be configured")]
    NoLocales,
    #[error("invalid locale code `{0}`")]
    InvalidLocale(String),
    #[error("locale `{0}` is configured more than once")]
    DuplicateLocale(String),
    #[error("default locale `{0}` is not one of the supported locales")]
    UnknownDefaultLocale(String),
    #[error("path template `{0}` must be an absolute URI path")]
    InvalidTemplate(String),
    #[error("auth-only path `{0}` is not listed as a public path")]
    AuthOnlyNotPublic(String),
    #[error("failed to compile path matcher: {0}")]
    Pattern(#[from] regex::Error),
}

/// AppConfig
///
/// Holds the gate's entire configuration. It is immutable once loaded and is
/// pulled into handlers and middleware through `FromRef`, so every request
/// sees the same locale set and path tables.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls the log output format.
    pub env: Env,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // Supported locale codes, in canonical casing.
    pub locales: Vec<String>,
    // Locale used when a request carries no usable locale hint.
    pub default_locale: String,
    // Templates of pages reachable without a session.
    pub public_paths: Vec<String>,
    // Templates of public pages that signed-in users are sent away from.
    pub auth_only_paths: Vec<String>,
    // Logical page anonymous users are redirected to.
    pub login_path: String,
    // Logical page signed-in users are redirected to.
    pub home_path: String,
    // Cookie carrying the session token.
    pub session_cookie: String,
    // Cookie remembering the last locale the client used.
    pub locale_cookie: String,
}

/// Env
///
/// Runtime context: human-readable logs locally, JSON logs in production.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// default
    ///
    /// The reference deployment configuration. Reads nothing from the
    /// environment, which keeps tests independent of the host.
    fn default() -> Self {
        Self {
            env: Env::Local,
            bind_addr: "0.0.0.0:3000".to_string(),
            locales: to_owned_list(DEFAULT_LOCALES),
            default_locale: "en".to_string(),
            public_paths: to_owned_list(DEFAULT_PUBLIC_PATHS),
            auth_only_paths: to_owned_list(DEFAULT_AUTH_ONLY_PATHS),
            login_path: "/login".to_string(),
            home_path: "/".to_string(),
            session_cookie: "token".to_string(),
            locale_cookie: "NEXT_LOCALE".to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Startup entry point implementing the **fail-fast** principle.
    ///
    /// # Panics
    /// Panics when the environment describes an invalid configuration, so the
    /// server never starts with a gate it cannot enforce.
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(config) => config,
            Err(e) => panic!("FATAL: invalid gate configuration: {e}"),
        }
    }

    /// try_load
    ///
    /// Reads every setting from the environment, falling back to the
    /// reference deployment values, and validates the result.
    pub fn try_load() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let config = Self {
            env,
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            locales: list_var("SUPPORTED_LOCALES").unwrap_or(defaults.locales),
            default_locale: env::var("DEFAULT_LOCALE").unwrap_or(defaults.default_locale),
            public_paths: list_var("PUBLIC_PATHS").unwrap_or(defaults.public_paths),
            auth_only_paths: list_var("AUTH_ONLY_PATHS").unwrap_or(defaults.auth_only_paths),
            login_path: env::var("LOGIN_PATH").unwrap_or(defaults.login_path),
            home_path: env::var("HOME_PATH").unwrap_or(defaults.home_path),
            session_cookie: env::var("SESSION_COOKIE").unwrap_or(defaults.session_cookie),
            locale_cookie: env::var("LOCALE_COOKIE").unwrap_or(defaults.locale_cookie),
        };

        config.validate()?;
        Ok(config)
    }

    /// validate
    ///
    /// Checks the invariants the gate relies on:
    /// 1. The locale set is non-empty, well formed and free of duplicates.
    /// 2. The default locale belongs to the set.
    /// 3. Every template and redirect target is an absolute URI path.
    /// 4. Auth-only pages are a subset of public pages.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Locale set
        if self.locales.is_empty() {
            return Err(ConfigError::NoLocales);
        }
        let mut seen = HashSet::new();
        for code in &self.locales {
            if !is_locale_code(code) {
                return Err(ConfigError::InvalidLocale(code.clone()));
            }
            if !seen.insert(code.to_ascii_lowercase()) {
                return Err(ConfigError::DuplicateLocale(code.clone()));
            }
        }

        // 2. Default locale
        if !self.locales.iter().any(|code| code == &self.default_locale) {
            return Err(ConfigError::UnknownDefaultLocale(self.default_locale.clone()));
        }

        // 3. Templates and redirect targets
        let templates = self
            .public_paths
            .iter()
            .chain(&self.auth_only_paths)
            .chain([&self.login_path, &self.home_path]);
        for template in templates {
            if !template.starts_with('/') || !is_valid_path(template) {
                return Err(ConfigError::InvalidTemplate(template.clone()));
            }
        }

        // 4. Auth-only ⊆ public
        let public: HashSet<String> = self.public_paths.iter().map(|p| template_key(p)).collect();
        if let Some(stray) = self
            .auth_only_paths
            .iter()
            .find(|p| !public.contains(&template_key(p)))
        {
            return Err(ConfigError::AuthOnlyNotPublic(stray.clone()));
        }

        Ok(())
    }
}

/// Comparison key for templates: case-folded, trailing slashes dropped.
fn template_key(template: &str) -> String {
    template.trim_end_matches('/').to_ascii_lowercase()
}

fn is_locale_code(code: &str) -> bool {
    (2..=8).contains(&code.len())
        && code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Reads a comma separated variable. Unset or blank yields `None`.
fn list_var(name: &str) -> Option<Vec<String>> {
    let raw = env::var(name).ok()?;
    let items: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();
    (!items.is_empty()).then_some(items)
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
