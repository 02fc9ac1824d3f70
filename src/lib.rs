//! Find URLs and email addresses in free text.
//!
//! Extraction is anchored on top-level domains: every known TLD in the text
//! is grown into a candidate, trimmed of surrounding punctuation and
//! brackets, and kept when its host is a valid domain name.
//!
//! ```no_run
//! use urlextract::UrlExtract;
//!
//! let extractor = UrlExtract::new()?;
//! let urls = extractor.find_urls("Let's have URL example.com as an example.", false)?;
//! assert_eq!(urls, ["example.com"]);
//! # Ok::<(), urlextract::UrlExtractError>(())
//! ```

pub mod config;
pub mod core;
pub mod dns;
pub mod extract;
pub mod logging;
pub mod tld;
pub mod ui;

pub use config::{CliConfig, Config};
pub use crate::core::error::{Result, UrlExtractError};
pub use crate::core::types::{TldMatch, UrlMatch};
pub use dns::{DnsCheck, DnsConfirmer};
pub use extract::{FindOptions, UrlExtract, UrlIter};
pub use tld::{CacheFile, TldCatalog};
