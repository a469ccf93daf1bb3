//! URL resolution against the agent scope.

use url::Url;

/// Error type for URL resolution failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Resolve a resource reference into the canonical URL used as request identity.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Join relative references (`/`, `index.html`) against the scope
/// 3. Lowercase the host
/// 4. Remove fragment (#...)
/// 5. Keep query string intact (do not reorder)
pub fn resolve(scope: &Url, input: &str) -> Result<Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = scope.join(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if let Some(host) = parsed.host_str() {
        let lowered = host.to_lowercase();
        parsed
            .set_host(Some(&lowered))
            .map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    }

    parsed.set_fragment(None);

    Ok(parsed)
}

/// Whether two URLs share scheme, host and port.
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.origin() == b.origin()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> Url {
        Url::parse("http://localhost:8080/").unwrap()
    }

    #[test]
    fn test_resolve_root() {
        let url = resolve(&scope(), "/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/");
    }

    #[test]
    fn test_resolve_relative_document() {
        let url = resolve(&scope(), "index.html").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/index.html");
    }

    #[test]
    fn test_resolve_relative_under_nested_scope() {
        let nested = Url::parse("http://localhost:8080/editor/").unwrap();
        assert_eq!(resolve(&nested, "index.html").unwrap().as_str(), "http://localhost:8080/editor/index.html");
        assert_eq!(resolve(&nested, "/").unwrap().as_str(), "http://localhost:8080/");
    }

    #[test]
    fn test_resolve_absolute_ignores_scope() {
        let url = resolve(&scope(), "https://cdn.tailwindcss.com").unwrap();
        assert_eq!(url.as_str(), "https://cdn.tailwindcss.com/");
    }

    #[test]
    fn test_resolve_lowercase_host() {
        let url = resolve(&scope(), "https://UNPKG.com/lucide@latest").unwrap();
        assert_eq!(url.host_str(), Some("unpkg.com"));
    }

    #[test]
    fn test_resolve_remove_fragment() {
        let url = resolve(&scope(), "/index.html#toolbar").unwrap();
        assert_eq!(url.fragment(), None);
        assert_eq!(url.path(), "/index.html");
    }

    #[test]
    fn test_resolve_preserve_query() {
        let url = resolve(&scope(), "https://fonts.googleapis.com/css2?family=Inter&display=swap").unwrap();
        assert_eq!(url.query(), Some("family=Inter&display=swap"));
    }

    #[test]
    fn test_resolve_unsupported_scheme() {
        let result = resolve(&scope(), "file:///etc/passwd");
        assert!(matches!(result, Err(UrlError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_resolve_empty() {
        assert!(matches!(resolve(&scope(), ""), Err(UrlError::Empty)));
        assert!(matches!(resolve(&scope(), "   "), Err(UrlError::Empty)));
    }

    #[test]
    fn test_same_origin() {
        let a = Url::parse("http://localhost:8080/index.html").unwrap();
        let b = Url::parse("http://localhost:8080/app.js?v=2").unwrap();
        let other_port = Url::parse("http://localhost:9090/").unwrap();
        let other_scheme = Url::parse("https://localhost:8080/").unwrap();

        assert!(same_origin(&a, &b));
        assert!(!same_origin(&a, &other_port));
        assert!(!same_origin(&a, &other_scheme));
    }
}
