//! URL extraction engine
//!
//! The pipeline for one TLD occurrence runs through these modules in order:
//! [`tld_matcher`] finds it, [`boundary`] grows it into a span, [`enclosure`]
//! trims brackets and markdown, [`domain`] validates the host with the help
//! of [`uri`]. [`extractor`] drives the pipeline over a whole text.

pub mod boundary;
pub mod domain;
pub mod enclosure;
pub mod extractor;
pub mod stop_chars;
pub mod tld_matcher;
pub mod uri;

pub use domain::Rejection;
pub use extractor::{FindOptions, UrlExtract, UrlIter};
pub use stop_chars::StopChars;
pub use tld_matcher::TldMatcher;
