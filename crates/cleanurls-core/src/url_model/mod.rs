//! URL modeling: structured script URLs and their cleaned form.
//!
//! A [`StructuredUrl`] is the internal form (`course/view.php?id=5`), a
//! [`CleanPath`] the shortened one (`course/short%23course`). Both keep the
//! site root as an opaque prefix and render back to absolute URL strings.

mod path;
mod query;
mod segment;

use std::fmt;

pub use path::SiteRoot;
pub use query::QueryParams;
pub use segment::{
    decode_segment, encode_segment, id_from_slug_segment, name_segment, slug_segment,
};

use crate::error::UrlError;

/// Script URL relative to the site root: path, ordered query and fragment.
///
/// The path is kept percent-encoded exactly as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredUrl {
    root: SiteRoot,
    path: String,
    query: QueryParams,
    fragment: Option<String>,
}

impl StructuredUrl {
    pub fn new(
        root: SiteRoot,
        path: impl Into<String>,
        query: QueryParams,
        fragment: Option<String>,
    ) -> Self {
        Self {
            root,
            path: path.into(),
            query,
            fragment,
        }
    }

    /// Parse an absolute URL under `root`, or a path relative to it.
    pub fn parse(input: &str, root: &SiteRoot) -> Result<Self, UrlError> {
        let url = root.resolve(input)?;
        let path = root
            .relative_path(&url)
            .ok_or_else(|| UrlError::OutsideRoot {
                url: input.to_string(),
                root: root.as_str().to_string(),
            })?
            .to_string();
        let query = url.query().map(QueryParams::parse).unwrap_or_default();
        Ok(Self {
            root: root.clone(),
            path,
            query,
            fragment: url.fragment().map(str::to_string),
        })
    }

    pub fn root(&self) -> &SiteRoot {
        &self.root
    }

    /// Site-relative script path, e.g. `course/view.php`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Raw (still encoded) path segments.
    pub fn raw_segments(&self) -> Vec<&str> {
        if self.path.is_empty() {
            Vec::new()
        } else {
            self.path.split('/').collect()
        }
    }
}

impl fmt::Display for StructuredUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_url(f, &self.root, &self.path, &self.query, self.fragment.as_deref())
    }
}

/// Shortened form of a URL: encoded segments plus the surviving query and fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanPath {
    root: SiteRoot,
    segments: Vec<String>,
    query: QueryParams,
    fragment: Option<String>,
    rewritten: bool,
}

impl CleanPath {
    /// The input URL, untouched.
    pub fn unchanged(url: &StructuredUrl) -> Self {
        Self {
            root: url.root.clone(),
            segments: url.raw_segments().into_iter().map(str::to_string).collect(),
            query: url.query.clone(),
            fragment: url.fragment.clone(),
            rewritten: false,
        }
    }

    /// A rewritten path. `segments` must already be encoded.
    pub fn rewritten(url: &StructuredUrl, segments: Vec<String>, query: QueryParams) -> Self {
        Self {
            root: url.root.clone(),
            segments,
            query,
            fragment: url.fragment.clone(),
            rewritten: true,
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Whether a rule changed the URL.
    pub fn is_rewritten(&self) -> bool {
        self.rewritten
    }

    /// Site-relative path, segments joined with `/`.
    pub fn path(&self) -> String {
        self.segments.join("/")
    }
}

impl fmt::Display for CleanPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_url(
            f,
            &self.root,
            &self.path(),
            &self.query,
            self.fragment.as_deref(),
        )
    }
}

fn write_url(
    f: &mut fmt::Formatter<'_>,
    root: &SiteRoot,
    path: &str,
    query: &QueryParams,
    fragment: Option<&str>,
) -> fmt::Result {
    write!(f, "{}{}", root.as_str(), path)?;
    if !query.is_empty() {
        write!(f, "?{}", query.to_query_string())?;
    }
    if let Some(fragment) = fragment {
        write!(f, "#{}", fragment)?;
    }
    Ok(())
}
