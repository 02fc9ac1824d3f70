//! Stop characters and enclosure pairs
//!
//! Holds the character sets that end the boundary scan, the characters that
//! may follow a TLD and the table of enclosure pairs. Every change to the
//! enclosure table recomputes the after-TLD set because closing characters
//! are always allowed right after a TLD, e.g. `(example.com)`.

use rustc_hash::FxHashSet;

use crate::core::constants::chars;
use crate::core::error::{Result, UrlExtractError};

/// Characters every stop set keeps so that a scan always ends on them.
const MANDATORY_STOP: [char; 3] = ['"', '<', '>'];

#[derive(Debug, Clone)]
pub struct StopChars {
    left: FxHashSet<char>,
    right: FxHashSet<char>,
    left_from_scheme: FxHashSet<char>,
    after_tld: FxHashSet<char>,
    enclosures: Vec<(char, char)>,
}

impl Default for StopChars {
    fn default() -> Self {
        let mut left: FxHashSet<char> = chars::WHITESPACE.into_iter().collect();
        left.extend(chars::GENERAL_STOP);
        left.extend(chars::LEFT_ONLY_STOP);

        let mut right: FxHashSet<char> = chars::WHITESPACE.into_iter().collect();
        right.extend(chars::GENERAL_STOP);

        let mut left_from_scheme = left.clone();
        left_from_scheme.extend(chars::LEFT_FROM_SCHEME_STOP);

        let mut stop_chars = Self {
            left,
            right,
            left_from_scheme,
            after_tld: FxHashSet::default(),
            enclosures: chars::ENCLOSURES.to_vec(),
        };
        stop_chars.after_tld = stop_chars.compute_after_tld();
        stop_chars
    }
}

impl StopChars {
    pub fn left(&self) -> &FxHashSet<char> {
        &self.left
    }

    pub fn right(&self) -> &FxHashSet<char> {
        &self.right
    }

    pub fn left_from_scheme(&self) -> &FxHashSet<char> {
        &self.left_from_scheme
    }

    pub fn after_tld(&self) -> &FxHashSet<char> {
        &self.after_tld
    }

    pub fn enclosures(&self) -> &[(char, char)] {
        &self.enclosures
    }

    /// Replace the characters that end the scan on the left of a TLD.
    ///
    /// Whitespace, `"`, `<` and `>` are always kept.
    pub fn set_left<I: IntoIterator<Item = char>>(&mut self, stop_chars: I) {
        self.left = with_mandatory(stop_chars);
    }

    /// Replace the characters that end the scan on the right of a TLD.
    ///
    /// Whitespace, `"`, `<` and `>` are always kept.
    pub fn set_right<I: IntoIterator<Item = char>>(&mut self, stop_chars: I) {
        self.right = with_mandatory(stop_chars);
    }

    /// Replace the characters that end the scan left of a `scheme://` marker.
    pub fn set_left_from_scheme<I: IntoIterator<Item = char>>(&mut self, stop_chars: I) {
        self.left_from_scheme = with_mandatory(stop_chars);
    }

    /// Override the characters allowed right after a TLD.
    ///
    /// The override holds until the enclosure table changes.
    pub fn set_after_tld<I: IntoIterator<Item = char>>(&mut self, after_tld: I) {
        self.after_tld = after_tld.into_iter().collect();
    }

    /// Add an enclosure pair, e.g. `("%", "%")`.
    pub fn add_enclosure(&mut self, left: &str, right: &str) -> Result<()> {
        let pair = (single_char(left)?, single_char(right)?);
        if !self.enclosures.contains(&pair) {
            self.enclosures.push(pair);
        }
        self.after_tld = self.compute_after_tld();
        Ok(())
    }

    /// Remove an enclosure pair. Returns whether the pair was present.
    pub fn remove_enclosure(&mut self, left: &str, right: &str) -> Result<bool> {
        let pair = (single_char(left)?, single_char(right)?);
        let before = self.enclosures.len();
        self.enclosures.retain(|p| *p != pair);
        self.after_tld = self.compute_after_tld();
        Ok(self.enclosures.len() != before)
    }

    pub fn is_left_stop(&self, c: char) -> bool {
        self.left.contains(&c)
    }

    pub fn is_right_stop(&self, c: char) -> bool {
        self.right.contains(&c)
    }

    pub fn is_left_stop_from_scheme(&self, c: char) -> bool {
        self.left_from_scheme.contains(&c)
    }

    pub fn is_after_tld(&self, c: char) -> bool {
        self.after_tld.contains(&c)
    }

    /// Whether `c` closes any enclosure pair.
    pub fn is_closer(&self, c: char) -> bool {
        self.enclosures.iter().any(|(_, right)| *right == c)
    }

    /// Closing character paired with the opener `c`.
    pub fn closer_for(&self, c: char) -> Option<char> {
        self.enclosures
            .iter()
            .find(|(left, _)| *left == c)
            .map(|(_, right)| *right)
    }

    /// Whether `c` opens any enclosure pair.
    pub fn is_opener(&self, c: char) -> bool {
        self.closer_for(c).is_some()
    }

    fn compute_after_tld(&self) -> FxHashSet<char> {
        let mut after_tld: FxHashSet<char> = chars::WHITESPACE.into_iter().collect();
        after_tld.extend(chars::AFTER_TLD);
        after_tld.extend(self.enclosures.iter().map(|(_, right)| *right));
        after_tld
    }
}

fn with_mandatory<I: IntoIterator<Item = char>>(stop_chars: I) -> FxHashSet<char> {
    let mut set: FxHashSet<char> = stop_chars.into_iter().collect();
    set.extend(chars::WHITESPACE);
    set.extend(MANDATORY_STOP);
    set
}

fn single_char(s: &str) -> Result<char> {
    let mut it = s.chars();
    match (it.next(), it.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(UrlExtractError::InvalidEnclosure(format!(
            "'{s}' must be exactly one character"
        ))),
    }
}
