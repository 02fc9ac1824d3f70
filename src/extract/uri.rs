//! Minimal RFC 3986 splitter for URL candidates
//!
//! Splits a candidate into scheme, userinfo, host, port, path, query and
//! fragment without validating or normalising any component. Candidates
//! written without a scheme are split as if they started with `//`.

use once_cell::sync::Lazy;
use regex::Regex;

// <scheme>://<authority><path>?<query>#<fragment>
const URI_PATTERN: &str =
    r"^(?:([A-Za-z][A-Za-z0-9+.\-]*):)?(?://([^/?#]*))?([^?#]*)(?:\?([^#]*))?(?:#(.*))?$";

// <authority><path>?<query>#<fragment>
const SCHEMELESS_PATTERN: &str = r"^([^/?#]*)([^?#]*)(?:\?([^#]*))?(?:#(.*))?$";

// userinfo runs up to the last '@'
const AUTHORITY_PATTERN: &str = r"^(?:(.*)@)?(.*?)(?::([0-9]*))?$";

static URI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(URI_PATTERN).expect("Failed to compile URI pattern"));

static SCHEMELESS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(SCHEMELESS_PATTERN).expect("Failed to compile URI pattern"));

static AUTHORITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(AUTHORITY_PATTERN).expect("Failed to compile authority pattern"));

/// Components of a URL candidate, borrowed from the candidate.
///
/// A component is `None` when its delimiter is absent and `Some("")` when
/// the delimiter is present but nothing follows it, e.g. the port of
/// `example.com:`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UriParts<'a> {
    pub scheme: Option<&'a str>,
    pub userinfo: Option<&'a str>,
    pub host: Option<&'a str>,
    pub port: Option<&'a str>,
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub fragment: Option<&'a str>,
}

impl<'a> UriParts<'a> {
    /// Split `candidate`.
    ///
    /// With `has_scheme` the candidate must start with a valid scheme
    /// followed by `//`, otherwise it has no authority and so no host.
    pub fn split(candidate: &'a str, has_scheme: bool) -> Self {
        let (scheme, authority, path, query, fragment) = if has_scheme {
            let Some(caps) = URI_RE.captures(candidate) else {
                return Self::default();
            };
            (
                caps.get(1).map(|m| m.as_str()),
                caps.get(2).map(|m| m.as_str()),
                caps.get(3).map_or("", |m| m.as_str()),
                caps.get(4).map(|m| m.as_str()),
                caps.get(5).map(|m| m.as_str()),
            )
        } else {
            let Some(caps) = SCHEMELESS_RE.captures(candidate) else {
                return Self::default();
            };
            (
                None,
                caps.get(1).map(|m| m.as_str()),
                caps.get(2).map_or("", |m| m.as_str()),
                caps.get(3).map(|m| m.as_str()),
                caps.get(4).map(|m| m.as_str()),
            )
        };

        let mut parts = Self {
            scheme,
            path,
            query,
            fragment,
            ..Self::default()
        };
        if let Some(authority) = authority
            && let Some(caps) = AUTHORITY_RE.captures(authority)
        {
            parts.userinfo = caps.get(1).map(|m| m.as_str());
            parts.host = caps.get(2).map(|m| m.as_str());
            parts.port = caps.get(3).map(|m| m.as_str());
        }
        parts
    }

    /// Whether anything follows the host: a port, path, query or fragment.
    pub fn has_trailing_components(&self) -> bool {
        self.port.is_some_and(|p| !p.is_empty())
            || !self.path.is_empty()
            || self.query.is_some_and(|q| !q.is_empty())
            || self.fragment.is_some_and(|f| !f.is_empty())
    }
}
