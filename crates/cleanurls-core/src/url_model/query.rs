//! Ordered query parameters that render verbatim.

use url::form_urlencoded;

/// One `key=value` piece: decoded for lookups, raw for rendering.
#[derive(Debug, Clone)]
struct Param {
    key: String,
    value: String,
    raw: String,
}

impl Param {
    fn parse(raw: &str) -> Option<Self> {
        let (key, value) = form_urlencoded::parse(raw.as_bytes()).next()?;
        Some(Self {
            key: key.into_owned(),
            value: value.into_owned(),
            raw: raw.to_string(),
        })
    }

    fn new(key: String, value: String) -> Self {
        let raw = form_urlencoded::Serializer::new(String::new())
            .append_pair(&key, &value)
            .finish();
        Self { key, value, raw }
    }
}

/// Ordered `key=value` pairs of a query string.
///
/// Every piece keeps the text it arrived with, so removing one parameter
/// leaves the others byte-for-byte as they were. The whole raw string is kept
/// until the first edit, which also preserves empty pieces (`a=1&&b=2`).
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    params: Vec<Param>,
    raw: Option<String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw query string (without the leading `?`).
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::default();
        }
        Self {
            params: raw.split('&').filter_map(Param::parse).collect(),
            raw: Some(raw.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty() && self.raw.as_deref().map_or(true, str::is_empty)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.params.iter().any(|p| p.key == key)
    }

    /// Take the ids under `keys` off the front of the query.
    ///
    /// Succeeds only when the query starts with exactly those keys, in that
    /// order, each written as a plain positive integer (`id=5`), and none of
    /// them appears again later. Putting `key=<id>` pieces back in front of
    /// what is left then rebuilds the original query text. Leaves the query
    /// untouched and returns `None` otherwise.
    pub fn take_leading_ids<const N: usize>(&mut self, keys: [&str; N]) -> Option<[i64; N]> {
        if self.params.len() < N {
            return None;
        }
        let mut ids = [0; N];
        for ((param, key), slot) in self.params.iter().zip(keys).zip(ids.iter_mut()) {
            let id = param.value.parse::<i64>().ok().filter(|id| *id > 0)?;
            if param.key != key || param.raw != format!("{key}={id}") {
                return None;
            }
            *slot = id;
        }
        if self.params[N..]
            .iter()
            .any(|p| keys.contains(&p.key.as_str()))
        {
            return None;
        }
        if let Some(raw) = &self.raw {
            // Empty pieces in the consumed prefix, or a lone trailing `&`, would be lost.
            let pieces: Vec<&str> = raw.split('&').collect();
            if pieces.iter().take(N).any(|p| p.is_empty())
                || (pieces.len() == N + 1 && raw.ends_with('&'))
            {
                return None;
            }
        }
        self.params.drain(..N);
        self.raw = self.raw.as_deref().map(|raw| {
            raw.splitn(N + 1, '&')
                .nth(N)
                .unwrap_or_default()
                .to_string()
        });
        Some(ids)
    }

    /// Append the pieces of `other` after the existing ones, raw text included.
    pub fn append(&mut self, other: &QueryParams) {
        if self.is_empty() {
            *self = other.clone();
            return;
        }
        if other.is_empty() {
            return;
        }
        let left = self.to_query_string();
        let right = other.to_query_string();
        self.params.extend(other.params.iter().cloned());
        self.raw = Some(format!("{left}&{right}"));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|p| (p.key.as_str(), p.value.as_str()))
    }

    /// Query string without the leading `?`.
    pub fn to_query_string(&self) -> String {
        if let Some(raw) = &self.raw {
            return raw.clone();
        }
        self.params
            .iter()
            .map(|p| p.raw.as_str())
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl PartialEq for QueryParams {
    fn eq(&self, other: &Self) -> bool {
        self.params.len() == other.params.len()
            && self
                .params
                .iter()
                .zip(&other.params)
                .all(|(a, b)| a.key == b.key && a.value == b.value)
    }
}

impl Eq for QueryParams {}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(k, v)| Param::new(k.into(), v.into()))
                .collect(),
            raw: None,
        }
    }
}
