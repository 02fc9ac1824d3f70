//! Output formatting for extracted URLs

use serde::Serialize;

use crate::core::constants::output_formats;
use crate::core::error::{Result, UrlExtractError};
use crate::core::types::UrlMatch;

#[derive(Serialize)]
struct JsonReport<'a> {
    count: usize,
    urls: &'a [UrlMatch],
}

/// Render `matches` in the requested output format.
///
/// Text output prints one URL per line, followed by its byte offsets when
/// `indices` is set. JSON output always carries the offsets.
pub fn render(matches: &[UrlMatch], output_format: &str, indices: bool) -> Result<String> {
    match output_format {
        output_formats::JSON => render_json(matches),
        _ => Ok(render_text(matches, indices)),
    }
}

fn render_text(matches: &[UrlMatch], indices: bool) -> String {
    let mut out = String::new();
    for m in matches {
        out.push_str(&m.url);
        if indices {
            out.push_str(&format!(" {} {}", m.start, m.end));
        }
        out.push('\n');
    }
    out
}

fn render_json(matches: &[UrlMatch]) -> Result<String> {
    let report = JsonReport {
        count: matches.len(),
        urls: matches,
    };
    let mut out = serde_json::to_string_pretty(&report)
        .map_err(|e| UrlExtractError::InvalidArgument(format!("Could not encode JSON: {e}")))?;
    out.push('\n');
    Ok(out)
}

/// Print `matches` to stdout.
pub fn display_results(matches: &[UrlMatch], output_format: &str, indices: bool) -> Result<()> {
    print!("{}", render(matches, output_format, indices)?);
    Ok(())
}
