//! Enclosure and markdown repair of an expanded span
//!
//! The boundary scan happily swallows brackets, quotes and markdown link
//! syntax around a URL. This pass trims them again:
//!
//! 1. `[label](target)` is split so only the part holding the TLD remains.
//! 2. An opener left unbalanced earlier on the same line, as in
//!    `( example.com/path)`, closes the span at its matching closer.
//! 3. The right-most opener before the TLD is unwrapped together with its
//!    paired closer. Only as many closers as there are paired openers are
//!    skipped, so unmatched brackets inside the URL survive:
//!    `(http://x.org/wiki/A_(B))` keeps `A_(B)`.
//! 4. A closer right after the TLD ends the URL: `example.com)/path`.
//!
//! Steps 3 and 4 repeat until nothing changes. Every round strictly shrinks
//! the span and the number of rounds is capped.
//!
//! Step 2 reads opener and closer counts from a [`LineBalance`] that follows
//! the scan through the text, so each line is counted once however many
//! candidates it holds.

use std::ops::Range;

use crate::core::constants::defaults;
use crate::core::types::TldMatch;
use crate::extract::stop_chars::StopChars;

/// Trim enclosures and markdown syntax from `span`.
///
/// The returned span always still contains `tld`.
pub fn resolve(
    text: &str,
    span: Range<usize>,
    tld: &TldMatch<'_>,
    stop: &StopChars,
    balance: &mut LineBalance,
) -> Range<usize> {
    balance.move_to(text, span.start, stop.enclosures());

    let span = split_markdown(text, span, tld.start);
    let span = close_outer_enclosure(text, span, tld, balance, stop);
    unwrap_enclosures(text, span, tld, stop)
}

/// Opener and closer counts of every enclosure pair between the start of the
/// current line and a position in the text.
///
/// The position mostly moves forward. Moving back within the line undoes the
/// counts of the characters passed again; moving onto an earlier line starts
/// over.
#[derive(Debug, Default)]
pub struct LineBalance {
    line_start: usize,
    pos: usize,
    opened: Vec<usize>,
    closed: Vec<usize>,
}

impl LineBalance {
    /// Count up to `target`, a char boundary of `text`.
    pub fn move_to(&mut self, text: &str, target: usize, pairs: &[(char, char)]) {
        let bytes = text.as_bytes();
        if target < self.line_start || self.opened.len() != pairs.len() {
            let line_start = memchr::memrchr(b'\n', &bytes[..target]).map_or(0, |pos| pos + 1);
            self.restart(line_start, pairs.len());
        } else if target > self.pos
            && let Some(newline) = memchr::memrchr(b'\n', &bytes[self.pos..target])
        {
            self.restart(self.pos + newline + 1, pairs.len());
        }

        if target >= self.pos {
            for c in text[self.pos..target].chars() {
                self.count(c, pairs, true);
            }
        } else {
            for c in text[target..self.pos].chars() {
                self.count(c, pairs, false);
            }
        }
        self.pos = target;
    }

    /// Whether more `pairs[index]` openers than closers precede the position.
    pub fn is_open(&self, index: usize) -> bool {
        match (self.opened.get(index), self.closed.get(index)) {
            (Some(opened), Some(closed)) => opened > closed,
            _ => false,
        }
    }

    fn restart(&mut self, line_start: usize, pair_count: usize) {
        self.line_start = line_start;
        self.pos = line_start;
        self.opened = vec![0; pair_count];
        self.closed = vec![0; pair_count];
    }

    fn count(&mut self, c: char, pairs: &[(char, char)], forward: bool) {
        for (index, &(opener, closer)) in pairs.iter().enumerate() {
            let slot = if c == opener {
                &mut self.opened[index]
            } else if c == closer {
                &mut self.closed[index]
            } else {
                continue;
            };
            *slot = if forward { *slot + 1 } else { slot.saturating_sub(1) };
        }
    }
}

/// Keep only the half of `[label](target)` that holds the TLD.
fn split_markdown(text: &str, span: Range<usize>, tld_start: usize) -> Range<usize> {
    let s = &text[span.clone()];
    let tld_rel = tld_start - span.start;

    // a URL is never shorter than 3 characters
    let left_bracket = s.find('[');
    match left_bracket {
        Some(pos) if pos + 3 > tld_rel => return span,
        None if tld_rel < 2 => return span,
        _ => {}
    }

    match s.find(')') {
        Some(pos) if pos >= tld_rel => {}
        _ => return span,
    }

    match s.rfind("](") {
        Some(middle) if middle > tld_rel => {
            let inner_start = left_bracket.map_or(0, |pos| pos + 1);
            span.start + inner_start..span.start + middle
        }
        _ => span,
    }
}

/// Close the span at the partner of an opener left open before it.
///
/// Only asymmetric pairs take part; quote characters double as apostrophes
/// in prose and say nothing reliable about nesting.
fn close_outer_enclosure(
    text: &str,
    span: Range<usize>,
    tld: &TldMatch<'_>,
    balance: &LineBalance,
    stop: &StopChars,
) -> Range<usize> {
    let mut end = span.end;
    for (index, &(opener, closer)) in stop.enclosures().iter().enumerate() {
        if opener == closer || !balance.is_open(index) {
            continue;
        }

        let mut depth = 0usize;
        for (offset, c) in text[tld.end()..span.end].char_indices() {
            if c == opener {
                depth += 1;
            } else if c == closer {
                if depth == 0 {
                    end = end.min(tld.end() + offset);
                    break;
                }
                depth -= 1;
            }
        }
    }
    span.start..end
}

fn unwrap_enclosures(
    text: &str,
    mut span: Range<usize>,
    tld: &TldMatch<'_>,
    stop: &StopChars,
) -> Range<usize> {
    for _ in 0..defaults::MAX_ENCLOSURE_DEPTH {
        if let Some(inner) = unwrap_once(text, span.clone(), tld, stop) {
            span = inner;
        } else if let Some(shorter) = cut_at_closer_after_tld(text, span.clone(), tld, stop) {
            span = shorter;
        } else {
            break;
        }
    }
    span
}

/// Remove the right-most opener before the TLD and its paired closer.
fn unwrap_once(
    text: &str,
    span: Range<usize>,
    tld: &TldMatch<'_>,
    stop: &StopChars,
) -> Option<Range<usize>> {
    let s = &text[span.clone()];
    let tld_rel = tld.start - span.start;

    let (left_pos, opener) = s[..tld_rel]
        .char_indices()
        .rev()
        .find(|(_, c)| stop.is_opener(*c))?;
    let closer = stop.closer_for(opener)?;

    let opened = s[..left_pos + opener.len_utf8()].matches(opener).count();
    let closed = s[left_pos..].matches(closer).count();
    // pair only what can be paired, further closers belong to the URL
    let pairs = opened.min(closed).max(1);

    let mut right_pos = Some(s.len());
    for _ in 0..pairs {
        right_pos = right_pos.and_then(|pos| s[..pos].rfind(closer));
    }
    let right_pos = match right_pos {
        Some(pos) if pos >= tld_rel + tld.tld.len() => pos,
        _ => s.len(),
    };

    Some(span.start + left_pos + opener.len_utf8()..span.start + right_pos)
}

/// `example.com)/path` ends at the closer right after the TLD.
fn cut_at_closer_after_tld(
    text: &str,
    span: Range<usize>,
    tld: &TldMatch<'_>,
    stop: &StopChars,
) -> Option<Range<usize>> {
    let after = tld.end();
    if after >= span.end {
        return None;
    }
    let next = text[after..span.end].chars().next()?;
    stop.is_closer(next).then_some(span.start..after)
}
