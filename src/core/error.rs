use std::fmt;

use crate::core::types::UrlMatch;

/// Comprehensive error types for urlextract operations
#[derive(Debug)]
pub enum UrlExtractError {
    /// IO error (file operations, etc.)
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// Enclosure pair that is not made of two single characters
    InvalidEnclosure(String),

    /// Invalid argument error
    InvalidArgument(String),

    /// HTTP client error
    Http(reqwest::Error),

    /// Regex compilation error
    Regex(regex::Error),

    /// TOML parsing error
    TomlParsing(toml::de::Error),

    /// Cached TLD file could not be located, read or written
    CacheFile(String),

    /// More URLs were found than the configured limit allows
    LimitReached {
        /// The limit that was exceeded
        limit: usize,
        /// URLs accumulated before the limit was hit
        found: Vec<UrlMatch>,
    },
}

impl UrlExtractError {
    /// URLs collected before the extraction stopped, if this is the limit condition.
    pub fn partial_results(&self) -> Option<&[UrlMatch]> {
        match self {
            UrlExtractError::LimitReached { found, .. } => Some(found),
            _ => None,
        }
    }
}

impl fmt::Display for UrlExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlExtractError::Io(err) => write!(f, "IO error: {err}"),
            UrlExtractError::Config(msg) => write!(f, "Configuration error: {msg}"),
            UrlExtractError::InvalidEnclosure(msg) => write!(f, "Invalid enclosure: {msg}"),
            UrlExtractError::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            UrlExtractError::Http(err) => write!(f, "HTTP error: {err}"),
            UrlExtractError::Regex(err) => write!(f, "Regex error: {err}"),
            UrlExtractError::TomlParsing(err) => write!(f, "TOML parsing error: {err}"),
            UrlExtractError::CacheFile(msg) => write!(f, "Cache file error: {msg}"),
            UrlExtractError::LimitReached { limit, .. } => {
                write!(f, "Limit reached: more than {limit} URLs found")
            }
        }
    }
}

impl std::error::Error for UrlExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UrlExtractError::Io(err) => Some(err),
            UrlExtractError::Http(err) => Some(err),
            UrlExtractError::Regex(err) => Some(err),
            UrlExtractError::TomlParsing(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for UrlExtractError {
    fn from(err: std::io::Error) -> Self {
        UrlExtractError::Io(err)
    }
}

impl From<reqwest::Error> for UrlExtractError {
    fn from(err: reqwest::Error) -> Self {
        UrlExtractError::Http(err)
    }
}

impl From<regex::Error> for UrlExtractError {
    fn from(err: regex::Error) -> Self {
        UrlExtractError::Regex(err)
    }
}

impl From<toml::de::Error> for UrlExtractError {
    fn from(err: toml::de::Error) -> Self {
        UrlExtractError::TomlParsing(err)
    }
}

/// Type alias for Results using UrlExtractError
pub type Result<T> = std::result::Result<T, UrlExtractError>;
