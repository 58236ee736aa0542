use axum::http::{Request, Uri, header, request::Parts};
use portal_gate::{LocaleNormalizer, LocaleOutcome, LocaleSet, PrefixLocaleNormalizer};

// --- Helper Functions ---

fn locales() -> LocaleSet {
    LocaleSet::new(vec!["en".to_string(), "uk".to_string()], "en").unwrap()
}

fn normalizer() -> PrefixLocaleNormalizer {
    PrefixLocaleNormalizer::new(locales(), "NEXT_LOCALE")
}

fn parts(uri: &str, headers: &[(header::HeaderName, &str)]) -> Parts {
    let mut builder = Request::builder().uri(uri);
    for (name, value) in headers {
        builder = builder.header(name, *value);
    }
    let (parts, _) = builder.body(()).unwrap().into_parts();
    parts
}

fn redirect(to: &str) -> LocaleOutcome {
    LocaleOutcome::Redirect(to.parse::<Uri>().unwrap())
}

// --- LocaleSet ---

#[test]
fn test_locale_set_rejects_unknown_default() {
    assert!(LocaleSet::new(vec!["en".to_string()], "uk").is_err());
    assert!(LocaleSet::new(Vec::new(), "en").is_err());
}

#[test]
fn test_resolve_returns_canonical_code() {
    let set = locales();
    assert_eq!(set.resolve("UK"), Some("uk"));
    assert_eq!(set.resolve("en"), Some("en"));
    assert_eq!(set.resolve("fr"), None);
    assert_eq!(set.resolve(""), None);
}

#[test]
fn test_split_prefix() {
    let set = locales();
    assert_eq!(set.split_prefix("/uk/faq"), (Some("uk"), "/faq"));
    assert_eq!(set.split_prefix("/EN"), (Some("en"), "/"));
    assert_eq!(set.split_prefix("/en/"), (Some("en"), "/"));
    assert_eq!(set.split_prefix("/faq/x"), (None, "/faq/x"));
    assert_eq!(set.split_prefix("/"), (None, "/"));
    assert_eq!(set.split_prefix("/english/faq"), (None, "/english/faq"));
}

// --- PrefixLocaleNormalizer ---

#[test]
fn test_prefixed_path_continues() {
    let outcome = normalizer().normalize(&parts("/uk/faq", &[]));
    assert_eq!(
        outcome,
        LocaleOutcome::Continue {
            locale: "uk".to_string(),
            remember: true
        }
    );
}

#[test]
fn test_matching_cookie_is_not_rewritten() {
    let outcome = normalizer().normalize(&parts(
        "/uk/faq",
        &[(header::COOKIE, "token=abc; NEXT_LOCALE=uk")],
    ));
    assert_eq!(
        outcome,
        LocaleOutcome::Continue {
            locale: "uk".to_string(),
            remember: false
        }
    );
}

#[test]
fn test_unprefixed_path_uses_default_locale() {
    assert_eq!(normalizer().normalize(&parts("/faq", &[])), redirect("/en/faq"));
    assert_eq!(normalizer().normalize(&parts("/", &[])), redirect("/en"));
}

#[test]
fn test_wrong_case_prefix_is_canonicalized() {
    assert_eq!(
        normalizer().normalize(&parts("/UK/faq?x=1", &[])),
        redirect("/uk/faq?x=1")
    );
    assert_eq!(normalizer().normalize(&parts("/En", &[])), redirect("/en"));
}

#[test]
fn test_cookie_beats_accept_language() {
    let outcome = normalizer().normalize(&parts(
        "/support",
        &[
            (header::COOKIE, "NEXT_LOCALE=uk"),
            (header::ACCEPT_LANGUAGE, "en-US,en;q=0.9"),
        ],
    ));
    assert_eq!(outcome, redirect("/uk/support"));
}

#[test]
fn test_unsupported_cookie_falls_back_to_accept_language() {
    let outcome = normalizer().normalize(&parts(
        "/support",
        &[
            (header::COOKIE, "NEXT_LOCALE=fr"),
            (header::ACCEPT_LANGUAGE, "fr-FR, uk;q=0.8, en;q=0.5"),
        ],
    ));
    assert_eq!(outcome, redirect("/uk/support"));
}

#[test]
fn test_accept_language_weights_and_subtags() {
    let cases = [
        ("uk-UA", "/uk/faq"),
        ("en;q=0.2, uk;q=0.7", "/uk/faq"),
        ("uk;q=0, en;q=0.1", "/en/faq"),
        ("de, fr;q=0.9", "/en/faq"),
        ("*", "/en/faq"),
        ("EN-gb;q=0.5, uk-UA;q=0.5", "/en/faq"),
    ];
    for (accept, expected) in cases {
        let outcome =
            normalizer().normalize(&parts("/faq", &[(header::ACCEPT_LANGUAGE, accept)]));
        assert_eq!(outcome, redirect(expected), "Accept-Language: {accept}");
    }
}

#[test]
fn test_redirect_preserves_origin_and_query() {
    let outcome = normalizer().normalize(&parts("https://portal.example.edu/faq?q=exam", &[]));
    assert_eq!(outcome, redirect("https://portal.example.edu/en/faq?q=exam"));
}

#[test]
fn test_normalization_is_idempotent() {
    let normalizer = normalizer();
    for path in ["/", "/faq", "/UK/login", "/profile/settings?tab=1"] {
        let LocaleOutcome::Redirect(location) = normalizer.normalize(&parts(path, &[])) else {
            panic!("{path} should be redirected");
        };
        let again = normalizer.normalize(&parts(&location.to_string(), &[]));
        assert!(
            matches!(again, LocaleOutcome::Continue { .. }),
            "{path} -> {location} was redirected again"
        );
    }
}
