//! The extraction engine
//!
//! [`UrlExtract`] owns the TLD matcher, the stop characters and the
//! validation settings. Every call scans the text for TLD occurrences and
//! turns each one into a candidate: expand it to a span, repair the span,
//! validate it. Accepted spans consume the text they cover, so TLD
//! occurrences inside an emitted URL are never tried again.

use log::{debug, error, info};
use once_cell::sync::OnceCell;
use rustc_hash::{FxHashMap, FxHashSet};
use std::ops::Range;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::core::constants::defaults;
use crate::core::error::{Result, UrlExtractError};
use crate::core::types::{TldMatch, UrlMatch};
use crate::dns::{DnsCheck, DnsConfirmer};
use crate::extract::domain::{self, ValidationOptions};
use crate::extract::enclosure::LineBalance;
use crate::extract::stop_chars::StopChars;
use crate::extract::tld_matcher::TldMatcher;
use crate::extract::{boundary, enclosure};
use crate::tld::{CacheFile, TldCatalog};

/// Per-call extraction switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FindOptions {
    /// Drop repeated URLs, keeping the first occurrence
    pub only_unique: bool,
    /// Accept only hosts that resolve
    pub check_dns: bool,
    /// Accept only URLs written with a `scheme://` prefix
    pub with_scheme_only: bool,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn only_unique(mut self, only_unique: bool) -> Self {
        self.only_unique = only_unique;
        self
    }

    pub fn check_dns(mut self, check_dns: bool) -> Self {
        self.check_dns = check_dns;
        self
    }

    pub fn with_scheme_only(mut self, with_scheme_only: bool) -> Self {
        self.with_scheme_only = with_scheme_only;
        self
    }
}

#[derive(Clone)]
pub struct UrlExtract {
    catalog: TldCatalog,
    matcher: TldMatcher,
    stop_chars: StopChars,
    extract_email: bool,
    extract_localhost: bool,
    allow_mixed_case_hostname: bool,
    ignore_list: FxHashSet<String>,
    permit_list: FxHashSet<String>,
    limit: Option<usize>,
    dns: OnceCell<Arc<dyn DnsConfirmer>>,
}

impl std::fmt::Debug for UrlExtract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlExtract")
            .field("tlds", &self.catalog.len())
            .field("stop_chars", &self.stop_chars)
            .field("extract_email", &self.extract_email)
            .field("extract_localhost", &self.extract_localhost)
            .field("allow_mixed_case_hostname", &self.allow_mixed_case_hostname)
            .field("ignore_list", &self.ignore_list)
            .field("permit_list", &self.permit_list)
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

impl UrlExtract {
    /// Extractor over the bundled TLD list.
    pub fn new() -> Result<Self> {
        Self::with_catalog(TldCatalog::bundled())
    }

    pub fn with_catalog(catalog: TldCatalog) -> Result<Self> {
        let matcher = TldMatcher::new(&catalog, true)?;
        info!("Loaded {} TLDs", catalog.len());
        Ok(Self {
            catalog,
            matcher,
            stop_chars: StopChars::default(),
            extract_email: false,
            extract_localhost: true,
            allow_mixed_case_hostname: true,
            ignore_list: FxHashSet::default(),
            permit_list: FxHashSet::default(),
            limit: Some(defaults::LIMIT),
            dns: OnceCell::new(),
        })
    }

    /// Extractor over the list cached in `cache`, or the bundled one.
    pub fn from_cache(cache: &CacheFile) -> Result<Self> {
        Self::with_catalog(cache.load()?)
    }

    pub fn catalog(&self) -> &TldCatalog {
        &self.catalog
    }

    /// Replace the TLD catalog and recompile the matcher.
    pub fn set_catalog(&mut self, catalog: TldCatalog) -> Result<()> {
        self.matcher = TldMatcher::new(&catalog, self.extract_localhost)?;
        self.catalog = catalog;
        info!("Reloaded TLD matcher with {} TLDs", self.catalog.len());
        Ok(())
    }

    /// Download a fresh TLD list into `cache` and start using it.
    pub async fn update(&mut self, cache: &CacheFile) -> Result<()> {
        cache.update().await?;
        self.set_catalog(cache.load()?)
    }

    /// Like [`UrlExtract::update`], but only when the cached list is older
    /// than `days`. Returns whether the list was refreshed.
    pub async fn update_when_older(&mut self, cache: &CacheFile, days: u64) -> Result<bool> {
        if !cache.update_when_older(days).await? {
            return Ok(false);
        }
        self.set_catalog(cache.load()?)?;
        Ok(true)
    }

    pub fn extract_email(&self) -> bool {
        self.extract_email
    }

    pub fn set_extract_email(&mut self, extract_email: bool) {
        self.extract_email = extract_email;
    }

    pub fn extract_localhost(&self) -> bool {
        self.extract_localhost
    }

    /// Toggle `localhost` as a TLD. Recompiles the matcher.
    pub fn set_extract_localhost(&mut self, extract_localhost: bool) -> Result<()> {
        if self.extract_localhost != extract_localhost {
            self.matcher = TldMatcher::new(&self.catalog, extract_localhost)?;
            self.extract_localhost = extract_localhost;
        }
        Ok(())
    }

    pub fn allow_mixed_case_hostname(&self) -> bool {
        self.allow_mixed_case_hostname
    }

    pub fn set_allow_mixed_case_hostname(&mut self, allow: bool) {
        self.allow_mixed_case_hostname = allow;
    }

    pub fn ignore_list(&self) -> &FxHashSet<String> {
        &self.ignore_list
    }

    /// Hosts that are never extracted. Matching is case-insensitive.
    pub fn set_ignore_list<I, S>(&mut self, hosts: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ignore_list = normalize_hosts(hosts);
    }

    /// Read the ignore list from a file with one host per line.
    pub fn load_ignore_list(&mut self, path: &Path) -> Result<()> {
        self.ignore_list = read_host_list(path)?;
        Ok(())
    }

    pub fn permit_list(&self) -> &FxHashSet<String> {
        &self.permit_list
    }

    /// When non-empty, the only hosts that are extracted.
    pub fn set_permit_list<I, S>(&mut self, hosts: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.permit_list = normalize_hosts(hosts);
    }

    /// Read the permit list from a file with one host per line.
    pub fn load_permit_list(&mut self, path: &Path) -> Result<()> {
        self.permit_list = read_host_list(path)?;
        Ok(())
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Maximum number of URLs one call may find, `None` for no limit.
    pub fn set_limit(&mut self, limit: Option<usize>) {
        self.limit = limit;
    }

    pub fn stop_chars(&self) -> &StopChars {
        &self.stop_chars
    }

    pub fn stop_chars_left(&self) -> &FxHashSet<char> {
        self.stop_chars.left()
    }

    pub fn set_stop_chars_left<I: IntoIterator<Item = char>>(&mut self, stop_chars: I) {
        self.stop_chars.set_left(stop_chars);
    }

    pub fn stop_chars_right(&self) -> &FxHashSet<char> {
        self.stop_chars.right()
    }

    pub fn set_stop_chars_right<I: IntoIterator<Item = char>>(&mut self, stop_chars: I) {
        self.stop_chars.set_right(stop_chars);
    }

    pub fn stop_chars_left_from_scheme(&self) -> &FxHashSet<char> {
        self.stop_chars.left_from_scheme()
    }

    pub fn set_stop_chars_left_from_scheme<I: IntoIterator<Item = char>>(&mut self, stop_chars: I) {
        self.stop_chars.set_left_from_scheme(stop_chars);
    }

    pub fn after_tld_chars(&self) -> &FxHashSet<char> {
        self.stop_chars.after_tld()
    }

    pub fn set_after_tld_chars<I: IntoIterator<Item = char>>(&mut self, after_tld: I) {
        self.stop_chars.set_after_tld(after_tld);
    }

    pub fn enclosures(&self) -> &[(char, char)] {
        self.stop_chars.enclosures()
    }

    pub fn add_enclosure(&mut self, left: &str, right: &str) -> Result<()> {
        self.stop_chars.add_enclosure(left, right)
    }

    pub fn remove_enclosure(&mut self, left: &str, right: &str) -> Result<bool> {
        self.stop_chars.remove_enclosure(left, right)
    }

    /// Use `confirmer` for DNS checks instead of the default [`DnsCheck`].
    pub fn set_dns_confirmer(&mut self, confirmer: Arc<dyn DnsConfirmer>) {
        self.dns = OnceCell::with_value(confirmer);
    }

    fn dns_confirmer(&self) -> &dyn DnsConfirmer {
        self.dns
            .get_or_init(|| Arc::new(DnsCheck::new()) as Arc<dyn DnsConfirmer>)
            .as_ref()
    }

    /// Lazily yield every URL in `text`, left to right.
    ///
    /// The result limit does not apply here.
    pub fn gen_urls<'a>(&'a self, text: &'a str, opts: &FindOptions) -> UrlIter<'a> {
        let dns = opts.check_dns.then(|| self.dns_confirmer());
        self.iter_with(text, opts, dns)
    }

    /// All URLs in `text` as strings.
    pub fn find_urls(&self, text: &str, only_unique: bool) -> Result<Vec<String>> {
        let opts = FindOptions::new().only_unique(only_unique);
        Ok(self
            .find_urls_with(text, &opts)?
            .into_iter()
            .map(UrlMatch::into_url)
            .collect())
    }

    /// All URLs in `text` with their byte offsets.
    ///
    /// Fails with [`UrlExtractError::LimitReached`] carrying the URLs found
    /// so far when the text holds more URLs than the limit.
    pub fn find_urls_with(&self, text: &str, opts: &FindOptions) -> Result<Vec<UrlMatch>> {
        let prefetched;
        let dns: Option<&dyn DnsConfirmer> = if opts.check_dns {
            prefetched = self.prefetch_dns(text, opts);
            Some(&prefetched)
        } else {
            None
        };

        let mut found = Vec::new();
        for url in self.iter_with(text, opts, dns) {
            if let Some(limit) = self.limit
                && found.len() >= limit
            {
                error!("Limit for extracting URLs was reached. [{limit} URLs]");
                return Err(UrlExtractError::LimitReached { limit, found });
            }
            found.push(url);
        }

        if opts.only_unique {
            let mut seen = FxHashSet::default();
            found.retain(|m| seen.insert(m.url.clone()));
        }
        debug!("Found {} URLs", found.len());
        Ok(found)
    }

    /// Whether `text` holds at least one URL.
    pub fn has_urls(&self, text: &str, with_scheme_only: bool) -> bool {
        let opts = FindOptions::new().with_scheme_only(with_scheme_only);
        self.gen_urls(text, &opts).next().is_some()
    }

    fn iter_with<'a>(
        &'a self,
        text: &'a str,
        opts: &FindOptions,
        dns: Option<&'a dyn DnsConfirmer>,
    ) -> UrlIter<'a> {
        UrlIter {
            text,
            stop: &self.stop_chars,
            validation: ValidationOptions {
                extract_email: self.extract_email,
                extract_localhost: self.extract_localhost,
                allow_mixed_case_hostname: self.allow_mixed_case_hostname,
                with_scheme_only: opts.with_scheme_only,
                ignore_list: &self.ignore_list,
                permit_list: &self.permit_list,
                dns,
            },
            matches: Box::new(self.matcher.scan(text)),
            cursor: 0,
            balance: LineBalance::default(),
        }
    }

    /// Resolve every host a DNS-checked scan of `text` would ask about in
    /// one batch, so the confirmer can run the lookups concurrently.
    fn prefetch_dns(&self, text: &str, opts: &FindOptions) -> Prefetched<'_> {
        let recorder = HostRecorder::default();
        self.iter_with(text, opts, Some(&recorder)).for_each(drop);
        let hosts = recorder.into_hosts();

        let fallback = self.dns_confirmer();
        let answers = fallback.resolvable_many(&hosts);
        debug!("Resolved {} hosts ahead of extraction", hosts.len());
        Prefetched {
            answers: hosts.into_iter().zip(answers).collect(),
            fallback,
        }
    }
}

/// Lazy sequence of the URLs in one text.
///
/// Created by [`UrlExtract::gen_urls`].
pub struct UrlIter<'a> {
    text: &'a str,
    stop: &'a StopChars,
    validation: ValidationOptions<'a>,
    matches: Box<dyn Iterator<Item = TldMatch<'a>> + 'a>,
    cursor: usize,
    balance: LineBalance,
}

impl Iterator for UrlIter<'_> {
    type Item = UrlMatch;

    fn next(&mut self) -> Option<UrlMatch> {
        while let Some(tld) = self.matches.next() {
            // already part of an emitted URL
            if tld.start < self.cursor {
                continue;
            }
            match self.candidate(&tld) {
                Some(span) => {
                    self.cursor = span.end;
                    return Some(UrlMatch::from_span(self.text, span));
                }
                None => self.cursor = tld.end(),
            }
        }
        None
    }
}

impl UrlIter<'_> {
    /// Span of the URL anchored at `tld`, if there is one.
    fn candidate(&mut self, tld: &TldMatch<'_>) -> Option<Range<usize>> {
        if !self.is_tld_boundary(tld) {
            return None;
        }

        let span = boundary::expand(self.text, tld, self.stop);
        let span = enclosure::resolve(self.text, span, tld, self.stop, &mut self.balance);
        let span = boundary::trim_to_scheme(self.text, span, tld, self.stop);
        let span = boundary::trim_leading(self.text, span, tld);
        // unwrapping "[example.com:]" leaves the ':' behind
        let span = boundary::trim_trailing(self.text, span, tld, self.stop);
        if span.start > tld.start || span.end < tld.end() {
            return None;
        }

        let candidate = &self.text[span.clone()];
        match domain::validate(candidate, tld.tld, &self.validation) {
            Ok(()) => {
                debug!("Accepted '{candidate}' at {}..{}", span.start, span.end);
                Some(span)
            }
            Err(reason) => {
                debug!("Rejected '{candidate}': {reason}");
                None
            }
        }
    }

    /// A TLD must follow a non-stop character and be followed by the end of
    /// the text or a character allowed after a TLD.
    fn is_tld_boundary(&self, tld: &TldMatch<'_>) -> bool {
        let Some(prev) = self.text[..tld.start].chars().next_back() else {
            return false;
        };
        if self.stop.is_left_stop(prev) {
            return false;
        }
        self.text[tld.end()..]
            .chars()
            .next()
            .is_none_or(|next| self.stop.is_after_tld(next))
    }
}

/// Confirms every host and remembers which ones were asked about.
#[derive(Default)]
struct HostRecorder {
    hosts: Mutex<Vec<String>>,
}

impl HostRecorder {
    fn into_hosts(self) -> Vec<String> {
        let mut hosts = self.hosts.into_inner().unwrap_or_else(|e| e.into_inner());
        let mut seen = FxHashSet::default();
        hosts.retain(|host| seen.insert(host.clone()));
        hosts
    }
}

impl DnsConfirmer for HostRecorder {
    fn resolvable(&self, host: &str) -> bool {
        if let Ok(mut hosts) = self.hosts.lock() {
            hosts.push(host.to_string());
        }
        true
    }
}

/// Answers from a batch lookup, falling back to a live lookup.
struct Prefetched<'a> {
    answers: FxHashMap<String, bool>,
    fallback: &'a dyn DnsConfirmer,
}

impl DnsConfirmer for Prefetched<'_> {
    fn resolvable(&self, host: &str) -> bool {
        match self.answers.get(host) {
            Some(answer) => *answer,
            None => self.fallback.resolvable(host),
        }
    }
}

fn normalize_hosts<I, S>(hosts: I) -> FxHashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    hosts
        .into_iter()
        .map(|host| host.as_ref().trim().to_lowercase())
        .filter(|host| !host.is_empty())
        .collect()
}

/// One host per line, `#` starts a comment line.
fn read_host_list(path: &Path) -> Result<FxHashSet<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(normalize_hosts(
        content.lines().filter(|line| !line.trim_start().starts_with('#')),
    ))
}
