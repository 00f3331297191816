//! Route derivation from the current location.

use std::fmt;

use url::{Origin, Url};

/// Lowercased path plus raw query string of a location.
///
/// Two locations with the same key resolve to the same navigation state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey(String);

impl RouteKey {
    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The parts of the current location the resolver works from.
#[derive(Debug, Clone)]
pub struct Route {
    path: String,
    query: Option<String>,
    base: Option<Url>,
    key: RouteKey,
}

impl Route {
    /// Derives a route from an absolute URL.
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        let path = url.path().to_lowercase();
        let query = url.query().map(str::to_string);
        let key = match &query {
            Some(q) => RouteKey(format!("{path}?{q}")),
            None => RouteKey(path.clone()),
        };
        Self { path, query, base: origin_base(url), key }
    }

    /// Lowercased path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Memoization key for this route.
    #[must_use]
    pub fn key(&self) -> &RouteKey {
        &self.key
    }

    /// Base URL that link hrefs are resolved against: the page origin.
    ///
    /// `None` for opaque origins (`file:`, `data:`), where no href resolves.
    #[must_use]
    pub fn base(&self) -> Option<&Url> {
        self.base.as_ref()
    }

    /// First non-empty value of a query parameter.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty())
    }

    /// Returns `true` for the site root, the home document, or any
    /// directory path.
    #[must_use]
    pub fn is_home(&self, home_document: &str) -> bool {
        self.path.ends_with('/') || ends_with_document(&self.path, home_document)
    }

    /// Last path segment, if non-empty.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.path.rsplit('/').next().filter(|f| !f.is_empty())
    }
}

/// First value of a query parameter on an arbitrary URL.
#[must_use]
pub fn first_query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs().find(|(k, _)| k == key).map(|(_, v)| v.into_owned())
}

/// Returns `true` if `path` ends with `/<document>`.
#[must_use]
pub fn ends_with_document(path: &str, document: &str) -> bool {
    path.strip_suffix(document).is_some_and(|rest| rest.ends_with('/'))
}

fn origin_base(url: &Url) -> Option<Url> {
    match url.origin() {
        origin @ Origin::Tuple(..) => Url::parse(&origin.ascii_serialization()).ok(),
        Origin::Opaque(_) => None,
    }
}
