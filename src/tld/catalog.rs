use once_cell::sync::Lazy;
use std::collections::BTreeSet;

/// TLD list shipped with the crate, in the IANA file format.
const BUNDLED_TLDS: &str = include_str!("../../data/tlds-alpha-by-domain.txt");

static BUNDLED: Lazy<TldCatalog> = Lazy::new(|| TldCatalog::parse(BUNDLED_TLDS));

/// Set of known top-level domains.
///
/// Entries are stored lower-cased with a leading dot (`.com`). Punycode
/// entries are stored twice, once as written and once decoded (`.xn--p1ai`
/// and `.рф`), so both spellings are recognised in text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TldCatalog {
    entries: BTreeSet<String>,
}

impl TldCatalog {
    /// Parse a TLD list in the IANA format: one TLD per line, `#` comments.
    pub fn parse(content: &str) -> Self {
        Self::from_entries(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    /// Build a catalog from bare or dotted TLD names.
    pub fn from_entries<I, S>(tlds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = BTreeSet::new();
        for tld in tlds {
            let tld = tld.as_ref().trim().trim_start_matches('.').to_lowercase();
            if tld.is_empty() {
                continue;
            }
            if tld.starts_with("xn--") {
                let (unicode, result) = idna::domain_to_unicode(&tld);
                if result.is_ok() && unicode != tld {
                    entries.insert(format!(".{unicode}"));
                }
            }
            entries.insert(format!(".{tld}"));
        }
        Self { entries }
    }

    /// The list of TLDs bundled with the crate.
    pub fn bundled() -> Self {
        BUNDLED.clone()
    }

    pub fn entries(&self) -> &BTreeSet<String> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive membership test for a dotted TLD such as `.COM`.
    pub fn contains(&self, tld: &str) -> bool {
        self.entries.contains(&tld.to_lowercase())
    }
}
