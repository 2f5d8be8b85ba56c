//! Site root handling: splitting absolute URLs into a site-relative path.

use url::Url;

use crate::error::UrlError;

/// Base URL of the site (`wwwroot`), always stored with a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRoot {
    url: Url,
}

impl SiteRoot {
    /// Parse a `wwwroot` such as `http://www.example.com/moodle`.
    ///
    /// Any query or fragment on the root is dropped.
    pub fn parse(wwwroot: &str) -> Result<Self, UrlError> {
        let mut base = wwwroot.trim().trim_end_matches('/').to_string();
        base.push('/');
        let mut url = Url::parse(&base).map_err(|_| UrlError::InvalidRoot(wwwroot.to_string()))?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(UrlError::InvalidRoot(wwwroot.to_string()));
        }
        url.set_query(None);
        url.set_fragment(None);
        Ok(Self { url })
    }

    /// Root as a string, with trailing slash.
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Resolve `input` (absolute, or relative to the root) into a full URL.
    pub(crate) fn resolve(&self, input: &str) -> Result<Url, UrlError> {
        let parsed = match Url::parse(input) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => self.url.join(input),
            Err(e) => Err(e),
        };
        parsed.map_err(|source| UrlError::Parse {
            input: input.to_string(),
            source,
        })
    }

    /// Path of `url` relative to the root, still percent-encoded.
    ///
    /// Returns `None` when the URL has a different origin or sits outside the
    /// root's path prefix.
    pub(crate) fn relative_path<'a>(&self, url: &'a Url) -> Option<&'a str> {
        if url.scheme() != self.url.scheme()
            || url.host_str() != self.url.host_str()
            || url.port_or_known_default() != self.url.port_or_known_default()
        {
            return None;
        }
        let prefix = self.url.path();
        let path = url.path();
        if let Some(rest) = path.strip_prefix(prefix) {
            return Some(rest);
        }
        // `http://host/moodle` without the trailing slash is the root itself.
        if path == prefix.trim_end_matches('/') {
            return Some("");
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> SiteRoot {
        SiteRoot::parse("http://www.example.com/moodle").unwrap()
    }

    #[test]
    fn root_gets_trailing_slash() {
        assert_eq!(root().as_str(), "http://www.example.com/moodle/");
        assert_eq!(
            SiteRoot::parse("https://example.com/").unwrap().as_str(),
            "https://example.com/"
        );
    }

    #[test]
    fn rejects_non_http_roots() {
        assert!(SiteRoot::parse("ftp://example.com/moodle").is_err());
        assert!(SiteRoot::parse("not a url").is_err());
    }

    #[test]
    fn relative_path_of_absolute_url() {
        let root = root();
        let url = root
            .resolve("http://www.example.com/moodle/course/view.php?id=3")
            .unwrap();
        assert_eq!(root.relative_path(&url), Some("course/view.php"));
    }

    #[test]
    fn relative_input_joins_root() {
        let root = root();
        let url = root.resolve("foo/bar.php").unwrap();
        assert_eq!(url.as_str(), "http://www.example.com/moodle/foo/bar.php");
        assert_eq!(root.relative_path(&url), Some("foo/bar.php"));
    }

    #[test]
    fn root_without_slash_is_empty_path() {
        let root = root();
        let url = root.resolve("http://www.example.com/moodle").unwrap();
        assert_eq!(root.relative_path(&url), Some(""));
    }

    #[test]
    fn other_origin_or_prefix_is_outside() {
        let root = root();
        let other_host = root.resolve("http://elsewhere.com/moodle/a.php").unwrap();
        assert_eq!(root.relative_path(&other_host), None);
        let other_prefix = root.resolve("http://www.example.com/moodlex/a.php").unwrap();
        assert_eq!(root.relative_path(&other_prefix), None);
    }
}
