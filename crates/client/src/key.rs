//! Fact-check keys.
//!
//! The job store matches keys by exact string equality, so every transport
//! runs request URLs through [`fact_check_key`] before calling the
//! coordinator. Two spellings of the same page must produce the same key.

use url::Url;

/// Why a URL could not be turned into a key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("empty URL")]
    Empty,

    #[error("only http and https pages can be checked, got {0}")]
    UnsupportedScheme(String),

    #[error("malformed URL: {0}")]
    Malformed(#[from] url::ParseError),
}

/// Canonical key for a page URL.
///
/// Surrounding whitespace is trimmed, `https://` is assumed when no scheme is
/// given and the fragment is dropped. Scheme and host come out lowercase from
/// the parser. The path (including a trailing slash) and the query are kept
/// exactly, so `?a=1&b=2` and `?b=2&a=1` are different pages.
pub fn fact_check_key(input: &str) -> Result<String, KeyError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(KeyError::Empty);
    }

    let mut page = if trimmed.contains("://") {
        Url::parse(trimmed)?
    } else {
        Url::parse(&format!("https://{trimmed}"))?
    };

    if !matches!(page.scheme(), "http" | "https") {
        return Err(KeyError::UnsupportedScheme(page.scheme().to_string()));
    }

    page.set_fragment(None);
    Ok(page.into())
}

/// Icon URL for a source page: `https://{host}/favicon.ico`.
///
/// Returns None when the URL has no host.
pub fn favicon_for(source_url: &str) -> Option<String> {
    let parsed = Url::parse(source_url).ok()?;
    let host = parsed.host_str()?;
    Some(format!("https://{host}/favicon.ico"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_does_not_split_jobs() {
        let a = fact_check_key("https://news.example.com/story#comments").unwrap();
        let b = fact_check_key("https://news.example.com/story").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, "https://news.example.com/story");
    }

    #[test]
    fn test_scheme_and_host_case_does_not_split_jobs() {
        let key = fact_check_key("HTTPS://News.Example.COM/Story").unwrap();
        assert_eq!(key, "https://news.example.com/Story");
    }

    #[test]
    fn test_whitespace_and_missing_scheme() {
        assert_eq!(fact_check_key("  news.example.com/story \n").unwrap(), "https://news.example.com/story");
        assert_eq!(fact_check_key("example.com").unwrap(), "https://example.com/");
    }

    #[test]
    fn test_http_is_a_distinct_page() {
        let key = fact_check_key("http://example.com/a").unwrap();
        assert_eq!(key, "http://example.com/a");
        assert_ne!(key, fact_check_key("https://example.com/a").unwrap());
    }

    #[test]
    fn test_trailing_slash_is_kept() {
        let a = fact_check_key("https://example.com/story").unwrap();
        let b = fact_check_key("https://example.com/story/").unwrap();
        assert_ne!(a, b);
        assert!(b.ends_with("/story/"));
    }

    #[test]
    fn test_query_is_kept_in_order() {
        let key = fact_check_key("https://example.com/search?b=2&a=1#top").unwrap();
        assert_eq!(key, "https://example.com/search?b=2&a=1");
        assert_ne!(key, fact_check_key("https://example.com/search?a=1&b=2").unwrap());
    }

    #[test]
    fn test_rejected_inputs() {
        assert_eq!(fact_check_key(""), Err(KeyError::Empty));
        assert_eq!(fact_check_key(" \t "), Err(KeyError::Empty));
        assert!(matches!(fact_check_key("ftp://example.com/file"), Err(KeyError::UnsupportedScheme(s)) if s == "ftp"));
        assert!(matches!(fact_check_key("https://"), Err(KeyError::Malformed(_))));
    }

    #[test]
    fn test_favicon_for() {
        assert_eq!(
            favicon_for("https://www.nature.com/articles/123").as_deref(),
            Some("https://www.nature.com/favicon.ico")
        );
        assert_eq!(favicon_for("not a url"), None);
    }
}
