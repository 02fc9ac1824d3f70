//! Boundary expansion around a confirmed TLD occurrence
//!
//! Grows a span outward from the TLD until a stop character or the edge of
//! the text is reached on each side. Offsets are bytes, but every step moves
//! over a whole `char`.

use std::ops::Range;

use crate::core::constants::chars;
use crate::core::types::TldMatch;
use crate::extract::stop_chars::StopChars;

const SCHEME_MARKER: &str = "://";

/// Expand `tld` to the full candidate span in `text`.
pub fn expand(text: &str, tld: &TldMatch<'_>, stop: &StopChars) -> Range<usize> {
    let (mut start, possible_markdown) = scan_left(text, tld.start, stop);
    let (mut end, first_close_paren) = scan_right(text, tld.start, stop);

    // `[label](target)`: the target ends at its closing parenthesis even when
    // the right scan ran further
    if possible_markdown && let Some(close) = first_close_paren {
        end = close;
    }

    while start < tld.start && text[start..].starts_with('/') {
        start += 1;
    }

    trim_trailing(text, start..end, tld, stop)
}

/// Drop one trailing character allowed after a TLD, as in `example.com.` or
/// `example.com,`. A trailing slash is kept.
///
/// Applies only when the TLD ends the span once the character is gone.
pub fn trim_trailing(
    text: &str,
    span: Range<usize>,
    tld: &TldMatch<'_>,
    stop: &StopChars,
) -> Range<usize> {
    let candidate = &text[span.clone()];
    match candidate.chars().next_back() {
        Some(last)
            if last != '/'
                && stop.is_after_tld(last)
                && candidate[..candidate.len() - last.len_utf8()].ends_with(tld.tld) =>
        {
            span.start..span.end - last.len_utf8()
        }
        _ => span,
    }
}

/// Returns the start of the span and whether the scan crossed a `](` pair.
fn scan_left(text: &str, from: usize, stop: &StopChars) -> (usize, bool) {
    let mut start = from;
    let mut possible_markdown = false;
    loop {
        let Some(prev) = text[..start].chars().next_back() else {
            break;
        };
        if prev == ']' && text[start..].starts_with('(') {
            possible_markdown = true;
        }
        if stop.is_left_stop(prev) {
            break;
        }
        start -= prev.len_utf8();
    }
    (start, possible_markdown)
}

/// Returns the exclusive end of the span and the end of the first `)` passed.
fn scan_right(text: &str, from: usize, stop: &StopChars) -> (usize, Option<usize>) {
    let mut chars = text[from..].chars();
    let mut end = from + chars.next().map_or(0, char::len_utf8);
    let mut first_close_paren = None;
    for c in chars {
        if stop.is_right_stop(c) {
            break;
        }
        end += c.len_utf8();
        if c == ')' && first_close_paren.is_none() {
            first_close_paren = Some(end);
        }
    }
    (end, first_close_paren)
}

/// Move the start of `span` up to the scheme of a `scheme://` marker found
/// before the TLD.
///
/// The scheme extends left from the marker until a character from the
/// left-from-scheme stop set, so `job:https://example.co` starts at `https`.
pub fn trim_to_scheme(
    text: &str,
    span: Range<usize>,
    tld: &TldMatch<'_>,
    stop: &StopChars,
) -> Range<usize> {
    let Some(marker) = text[span.start..tld.start].rfind(SCHEME_MARKER) else {
        return span;
    };
    let mut start = span.start + marker;
    while start > span.start {
        let Some(prev) = text[..start].chars().next_back() else {
            break;
        };
        if stop.is_left_stop_from_scheme(prev) {
            break;
        }
        start -= prev.len_utf8();
    }
    start..span.end
}

/// Strip what can never start a URL: surrounding whitespace, a leading
/// `//` and one leading unreserved character such as `-` or `.`.
///
/// The TLD itself is never cut.
pub fn trim_leading(text: &str, span: Range<usize>, tld: &TldMatch<'_>) -> Range<usize> {
    let candidate = &text[span.clone()];
    let mut start = span.start + (candidate.len() - candidate.trim_start().len());
    let end = span.end - (candidate.len() - candidate.trim_end().len());

    if start + 2 <= tld.start && text[start..].starts_with("//") {
        start += 2;
    }
    if start < tld.start
        && let Some(first) = text[start..].chars().next()
        && chars::LEADING_UNRESERVED.contains(&first)
    {
        start += first.len_utf8();
    }
    start..end.max(start)
}
