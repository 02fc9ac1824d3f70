use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// A URL or email accepted by the extractor.
///
/// `start` and `end` are byte offsets into the text the match was found in,
/// so `&text[m.start..m.end] == m.url` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct UrlMatch {
    /// The extracted URL, exactly as it appears in the text
    pub url: String,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
}

impl UrlMatch {
    /// Create a match from the source text and the accepted span.
    pub fn from_span(text: &str, span: Range<usize>) -> Self {
        Self {
            url: text[span.clone()].to_string(),
            start: span.start,
            end: span.end,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The `(start, end)` pair of this match.
    pub fn indices(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    pub fn into_url(self) -> String {
        self.url
    }
}

impl fmt::Display for UrlMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

/// One occurrence of a catalog TLD in a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TldMatch<'t> {
    /// The matched text, in the case it was written with
    pub tld: &'t str,
    /// Byte offset of the occurrence
    pub start: usize,
}

impl TldMatch<'_> {
    /// Byte offset one past the occurrence.
    pub fn end(&self) -> usize {
        self.start + self.tld.len()
    }

    /// Whether this is one of the `.0` ... `.255` pseudo-TLDs.
    pub fn is_numeric(&self) -> bool {
        is_numeric_tld(self.tld)
    }
}

/// Whether `tld` is an IPv4 octet placeholder such as `.168`.
pub fn is_numeric_tld(tld: &str) -> bool {
    tld.strip_prefix('.')
        .is_some_and(|octet| !octet.is_empty() && octet.parse::<u8>().is_ok())
}
