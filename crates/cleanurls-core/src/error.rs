//! Error type for URL parsing against the site root.

use thiserror::Error;

/// Failure to turn an input string into a [`StructuredUrl`](crate::url_model::StructuredUrl).
///
/// Rule declines and partial unclean parses are not errors; they are normal
/// outcomes reported through [`CleanPath`](crate::url_model::CleanPath) and
/// [`UncleanResult`](crate::uncleaner::UncleanResult).
#[derive(Debug, Error)]
pub enum UrlError {
    /// The input is neither an absolute URL nor a path relative to the site root.
    #[error("invalid URL {input:?}: {source}")]
    Parse {
        input: String,
        #[source]
        source: url::ParseError,
    },
    /// The URL is well formed but does not live under the configured `wwwroot`.
    #[error("URL {url} is outside the site root {root}")]
    OutsideRoot { url: String, root: String },
    /// The configured `wwwroot` is not an http(s) base URL.
    #[error("invalid site root {0:?}: expected an http or https URL")]
    InvalidRoot(String),
}
