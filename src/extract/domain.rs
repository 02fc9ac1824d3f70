//! Host and TLD validation of a repaired candidate
//!
//! The last gate before a candidate is emitted. Decides whether the host is
//! a real `label.tld` pair, an IPv4 literal, `localhost` or, when enabled, an
//! email address, and applies the ignore/permit lists and the optional DNS
//! confirmation.

use std::fmt;
use std::net::Ipv4Addr;

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashSet;

use crate::core::constants::defaults;
use crate::core::types::is_numeric_tld;
use crate::dns::DnsConfirmer;
use crate::extract::uri::UriParts;

static HOSTNAME_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-zA-Z0-9]|[a-zA-Z0-9][a-zA-Z0-9\-]*[a-zA-Z0-9])$")
        .expect("Failed to compile hostname label pattern")
});

const SCHEME_MARKER: &str = "://";

/// Everything the validator needs besides the candidate itself.
#[derive(Clone, Copy)]
pub struct ValidationOptions<'a> {
    pub extract_email: bool,
    pub extract_localhost: bool,
    pub allow_mixed_case_hostname: bool,
    pub with_scheme_only: bool,
    /// Lower-cased hosts that are never accepted.
    pub ignore_list: &'a FxHashSet<String>,
    /// Lower-cased hosts that are the only ones accepted, when non-empty.
    pub permit_list: &'a FxHashSet<String>,
    /// Set when the host must also resolve.
    pub dns: Option<&'a dyn DnsConfirmer>,
}

/// Why a candidate was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Empty,
    MissingScheme,
    EmailDisabled,
    EmailWithComponents,
    NoHost,
    MixedCaseHost,
    Ignored,
    NotPermitted,
    NumericTldWithoutIp,
    TooFewLabels,
    TldMismatch,
    InvalidLabel,
    Unresolvable,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::Empty => "empty candidate",
            Rejection::MissingScheme => "no scheme",
            Rejection::EmailDisabled => "email extraction disabled",
            Rejection::EmailWithComponents => "email with port, path, query or fragment",
            Rejection::NoHost => "no host",
            Rejection::MixedCaseHost => "mixed case host",
            Rejection::Ignored => "host on ignore list",
            Rejection::NotPermitted => "host not on permit list",
            Rejection::NumericTldWithoutIp => "numeric TLD on a non-IP host",
            Rejection::TooFewLabels => "host has a single label",
            Rejection::TldMismatch => "host does not end with the matched TLD",
            Rejection::InvalidLabel => "invalid second-level label",
            Rejection::Unresolvable => "host does not resolve",
        };
        write!(f, "{reason}")
    }
}

/// Check `candidate`, whose host is expected to end with `tld`.
pub fn validate(
    candidate: &str,
    tld: &str,
    opts: &ValidationOptions<'_>,
) -> Result<(), Rejection> {
    if candidate.is_empty() {
        return Err(Rejection::Empty);
    }

    let has_scheme = candidate.contains(SCHEME_MARKER);
    if !has_scheme && opts.with_scheme_only {
        return Err(Rejection::MissingScheme);
    }

    let parts = UriParts::split(candidate, has_scheme);

    // user@host without a scheme reads as an email address
    if !has_scheme && let Some(userinfo) = parts.userinfo {
        if !opts.extract_email {
            return Err(Rejection::EmailDisabled);
        }
        if userinfo.is_empty() {
            return Err(Rejection::NoHost);
        }
        if parts.has_trailing_components() {
            return Err(Rejection::EmailWithComponents);
        }
    }

    let raw_host = match parts.host {
        Some(host) if !host.is_empty() => host,
        _ => return Err(Rejection::NoHost),
    };
    if !opts.allow_mixed_case_hostname && is_mixed_case(raw_host) {
        return Err(Rejection::MixedCaseHost);
    }

    let host = raw_host.to_lowercase();
    if opts.ignore_list.contains(&host) {
        return Err(Rejection::Ignored);
    }
    if !opts.permit_list.is_empty() && !opts.permit_list.contains(&host) {
        return Err(Rejection::NotPermitted);
    }

    if host.parse::<Ipv4Addr>().is_ok() {
        return Ok(());
    }
    if is_numeric_tld(tld) {
        return Err(Rejection::NumericTldWithoutIp);
    }

    if !(opts.extract_localhost && host == defaults::LOCALHOST) {
        let labels: Vec<&str> = host.split('.').collect();
        let [.., second_level, top_level] = labels.as_slice() else {
            return Err(Rejection::TooFewLabels);
        };
        if format!(".{top_level}") != tld.to_lowercase() {
            return Err(Rejection::TldMismatch);
        }
        if !HOSTNAME_LABEL_RE.is_match(second_level) {
            return Err(Rejection::InvalidLabel);
        }
    }

    if let Some(dns) = opts.dns
        && !dns.resolvable(&host)
    {
        return Err(Rejection::Unresolvable);
    }
    Ok(())
}

fn is_mixed_case(host: &str) -> bool {
    host.chars().any(char::is_uppercase) && host.chars().any(char::is_lowercase)
}
