use regex::{Regex, RegexBuilder};

use crate::{config::ConfigError, locale::LocaleSet};

/// PathClass
///
/// Where a request path sits in the access policy. Computed per request from
/// the path alone; authentication state never influences it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// The bare origin, with or without a locale segment.
    Root,
    /// Public page meant only for visitors who are not signed in.
    AuthOnly,
    /// Page reachable without a session.
    Public,
    /// Anything else. Requires a valid session.
    Protected,
}

/// PathMatcher
///
/// A list of page templates compiled into one anchored, case-insensitive
/// pattern. Each template may appear under an optional locale segment and
/// with an optional trailing slash.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    // `None` for an empty template list, which matches nothing.
    pattern: Option<Regex>,
}

impl PathMatcher {
    pub fn new<S: AsRef<str>>(templates: &[S], locales: &LocaleSet) -> Result<Self, ConfigError> {
        let locale_alternatives = locales
            .codes()
            .iter()
            .map(|code| regex::escape(code))
            .collect::<Vec<_>>()
            .join("|");

        // `/` trims to the empty alternative, so the root template matches
        // `/`, `/en` and `/en/` alike.
        let page_alternatives = templates
            .iter()
            .map(|template| regex::escape(template.as_ref().trim_end_matches('/')))
            .collect::<Vec<_>>()
            .join("|");

        if templates.is_empty() {
            return Ok(Self { pattern: None });
        }

        let source = format!("^(?:/(?:{locale_alternatives}))?(?:{page_alternatives})/?$");
        let pattern = RegexBuilder::new(&source).case_insensitive(true).build()?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    pub fn matches(&self, path: &str) -> bool {
        self.pattern
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(path))
    }
}

/// PathClassifier
///
/// Owns the three matchers the gate consults. Built once from configuration
/// and shared read-only between requests.
#[derive(Debug, Clone)]
pub struct PathClassifier {
    root: PathMatcher,
    public: PathMatcher,
    auth_only: PathMatcher,
}

impl PathClassifier {
    pub fn new<S: AsRef<str>>(
        public_paths: &[S],
        auth_only_paths: &[S],
        locales: &LocaleSet,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            root: PathMatcher::new(&["/"][..], locales)?,
            public: PathMatcher::new(public_paths, locales)?,
            auth_only: PathMatcher::new(auth_only_paths, locales)?,
        })
    }

    pub fn is_root(&self, path: &str) -> bool {
        self.root.matches(path)
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public.matches(path)
    }

    pub fn is_auth_only(&self, path: &str) -> bool {
        self.auth_only.matches(path)
    }

    /// Root wins over everything, auth-only over plain public.
    pub fn classify(&self, path: &str) -> PathClass {
        if self.is_root(path) {
            PathClass::Root
        } else if self.is_public(path) && self.is_auth_only(path) {
            PathClass::AuthOnly
        } else if self.is_public(path) {
            PathClass::Public
        } else {
            PathClass::Protected
        }
    }
}
