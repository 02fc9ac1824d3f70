//! Case-insensitive matcher over every known TLD
//!
//! All catalog entries, the IPv4 octet pseudo-TLDs `.0` ... `.255` and,
//! optionally, `localhost` are compiled into a single alternation. Entries are
//! ordered longest first so that at any position the longest TLD wins
//! (`.community` before `.com`).

use log::debug;
use regex::{Regex, RegexBuilder};

use crate::core::constants::defaults;
use crate::core::error::Result;
use crate::core::types::TldMatch;
use crate::tld::TldCatalog;

/// The alternation of ~1700 literals needs more room than the regex default.
const REGEX_SIZE_LIMIT: usize = 64 * (1 << 20);

#[derive(Debug, Clone)]
pub struct TldMatcher {
    regex: Regex,
    tld_count: usize,
}

impl TldMatcher {
    pub fn new(catalog: &TldCatalog, extract_localhost: bool) -> Result<Self> {
        let mut tlds: Vec<String> = catalog.entries().iter().cloned().collect();
        tlds.extend((0..=255u8).map(|octet| format!(".{octet}")));
        if extract_localhost {
            tlds.push(defaults::LOCALHOST.to_string());
        }
        tlds.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });
        tlds.dedup();

        let alternation = tlds
            .iter()
            .map(|tld| regex::escape(tld))
            .collect::<Vec<_>>()
            .join("|");
        let regex = RegexBuilder::new(&format!("(?:{alternation})"))
            .case_insensitive(true)
            .size_limit(REGEX_SIZE_LIMIT)
            .dfa_size_limit(REGEX_SIZE_LIMIT)
            .build()?;

        debug!("Compiled TLD matcher over {} entries", tlds.len());
        Ok(Self {
            regex,
            tld_count: tlds.len(),
        })
    }

    /// Number of alternatives the matcher was compiled from.
    pub fn tld_count(&self) -> usize {
        self.tld_count
    }

    /// Lazily yield every TLD occurrence in `text`, left to right.
    ///
    /// Occurrences never overlap. Calling `scan` again restarts from the
    /// beginning of the text.
    pub fn scan<'a>(&'a self, text: &'a str) -> impl Iterator<Item = TldMatch<'a>> + 'a {
        self.regex.find_iter(text).map(|m| TldMatch {
            tld: m.as_str(),
            start: m.start(),
        })
    }
}
