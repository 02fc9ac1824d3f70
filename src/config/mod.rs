//! Configuration management
//!
//! This module handles loading configuration from TOML files, merging it
//! with CLI arguments and applying it to an extractor.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::core::constants::{defaults, files, output_formats, validation};
use crate::core::error::{Result, UrlExtractError};
use crate::dns::DnsCheck;
use crate::extract::UrlExtract;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Extract email addresses as well as URLs
    pub extract_email: Option<bool>,

    /// Recognise `localhost` as a host
    pub extract_localhost: Option<bool>,

    /// Accept hosts such as `Example.com` that mix upper and lower case
    pub allow_mixed_case_hostname: Option<bool>,

    /// Maximum number of URLs extracted from one input
    pub limit: Option<usize>,

    /// Extract any number of URLs
    pub no_limit: Option<bool>,

    /// Hosts that are never extracted
    pub ignore_list: Option<Vec<String>>,

    /// File with hosts that are never extracted, one per line
    pub ignore_file: Option<PathBuf>,

    /// When set, the only hosts that are extracted
    pub permit_list: Option<Vec<String>>,

    /// File with the only hosts that are extracted, one per line
    pub permit_file: Option<PathBuf>,

    /// Characters ending a URL on its left side
    pub stop_chars_left: Option<String>,

    /// Characters ending a URL on its right side
    pub stop_chars_right: Option<String>,

    /// Characters ending a scheme on its left side
    pub stop_chars_left_from_scheme: Option<String>,

    /// Characters allowed right after a TLD
    pub after_tld_chars: Option<String>,

    /// Enclosure pairs replacing the default ones, e.g. `[["(", ")"]]`
    pub enclosures: Option<Vec<(String, String)>>,

    /// Directory of the cached TLD list
    pub cache_dir: Option<PathBuf>,

    /// Refresh the cached TLD list when older than this many days
    pub update_when_older_days: Option<u64>,

    /// DNS lookup timeout in seconds
    pub dns_timeout: Option<u64>,

    /// Treat hosts whose lookup timed out as resolvable
    pub dns_accept_on_timeout: Option<bool>,

    /// Number of concurrent DNS lookups
    pub dns_max_workers: Option<usize>,

    /// Output format (text, json)
    pub output_format: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extract_email: Some(false),
            extract_localhost: Some(true),
            allow_mixed_case_hostname: Some(true),
            limit: Some(defaults::LIMIT),
            no_limit: Some(false),
            ignore_list: None,
            ignore_file: None,
            permit_list: None,
            permit_file: None,
            stop_chars_left: None,
            stop_chars_right: None,
            stop_chars_left_from_scheme: None,
            after_tld_chars: None,
            enclosures: None,
            cache_dir: None,
            update_when_older_days: None,
            dns_timeout: Some(defaults::DNS_TIMEOUT_SECONDS),
            dns_accept_on_timeout: Some(false),
            dns_max_workers: Some(defaults::DNS_MAX_WORKERS),
            output_format: Some(output_formats::DEFAULT.to_string()),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            UrlExtractError::Config(format!(
                "Could not read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            UrlExtractError::Config(format!(
                "Invalid TOML in config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Try to find and load a config file in standard locations
    pub fn load_from_standard_locations() -> Self {
        if let Ok(config) = Self::load_from_file(files::CONFIG_FILE_NAME) {
            return config;
        }

        // Parent directories, up to 3 levels
        for i in 1..=3 {
            let path = format!("{}{}", "../".repeat(i), files::CONFIG_FILE_NAME);
            if let Ok(config) = Self::load_from_file(&path) {
                return config;
            }
        }

        Self::default()
    }

    /// Merge this config with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli_config: &CliConfig) {
        // Extraction
        if cli_config.extract_email {
            self.extract_email = Some(true);
        }
        if cli_config.no_localhost {
            self.extract_localhost = Some(false);
        }
        if let Some(limit) = cli_config.limit {
            self.limit = Some(limit);
            self.no_limit = Some(false);
        }
        if cli_config.no_limit {
            self.no_limit = Some(true);
            self.limit = None;
        }

        // Host lists
        if let Some(ref ignore_file) = cli_config.ignore_file {
            self.ignore_file = Some(ignore_file.clone());
        }
        if let Some(ref permit_file) = cli_config.permit_file {
            self.permit_file = Some(permit_file.clone());
        }

        // TLD cache
        if let Some(ref cache_dir) = cli_config.cache_dir {
            self.cache_dir = Some(cache_dir.clone());
        }

        // DNS
        if let Some(dns_timeout) = cli_config.dns_timeout {
            self.dns_timeout = Some(dns_timeout);
        }

        // Output & format
        if let Some(ref output_format) = cli_config.output_format {
            self.output_format = Some(output_format.clone());
        }
    }

    /// Effective result limit, `None` when unlimited
    pub fn effective_limit(&self) -> Option<usize> {
        if self.no_limit.unwrap_or(false) {
            None
        } else {
            Some(self.limit.unwrap_or(defaults::LIMIT))
        }
    }

    /// Get DNS timeout as Duration
    pub fn dns_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.dns_timeout.unwrap_or(defaults::DNS_TIMEOUT_SECONDS))
    }

    /// Build the DNS checker described by this configuration
    pub fn dns_check(&self) -> DnsCheck {
        DnsCheck::new()
            .timeout(self.dns_timeout_duration())
            .accept_on_timeout(self.dns_accept_on_timeout.unwrap_or(false))
            .max_workers(self.dns_max_workers.unwrap_or(defaults::DNS_MAX_WORKERS))
    }

    /// Configure `extractor` with every option set in this configuration
    pub fn apply_to(&self, extractor: &mut UrlExtract) -> Result<()> {
        if let Some(extract_email) = self.extract_email {
            extractor.set_extract_email(extract_email);
        }
        if let Some(extract_localhost) = self.extract_localhost {
            extractor.set_extract_localhost(extract_localhost)?;
        }
        if let Some(allow) = self.allow_mixed_case_hostname {
            extractor.set_allow_mixed_case_hostname(allow);
        }
        extractor.set_limit(self.effective_limit());

        if let Some(ref hosts) = self.ignore_list {
            extractor.set_ignore_list(hosts);
        }
        if let Some(ref path) = self.ignore_file {
            extractor.load_ignore_list(path)?;
        }
        if let Some(ref hosts) = self.permit_list {
            extractor.set_permit_list(hosts);
        }
        if let Some(ref path) = self.permit_file {
            extractor.load_permit_list(path)?;
        }

        if let Some(ref chars) = self.stop_chars_left {
            extractor.set_stop_chars_left(chars.chars());
        }
        if let Some(ref chars) = self.stop_chars_right {
            extractor.set_stop_chars_right(chars.chars());
        }
        if let Some(ref chars) = self.stop_chars_left_from_scheme {
            extractor.set_stop_chars_left_from_scheme(chars.chars());
        }
        if let Some(ref enclosures) = self.enclosures {
            for (left, right) in extractor.enclosures().to_vec() {
                extractor.remove_enclosure(&left.to_string(), &right.to_string())?;
            }
            for (left, right) in enclosures {
                extractor.add_enclosure(left, right)?;
            }
        }
        // after the enclosures, which recompute the after-TLD set
        if let Some(ref chars) = self.after_tld_chars {
            extractor.set_after_tld_chars(chars.chars());
        }

        if self.dns_timeout.is_some()
            || self.dns_accept_on_timeout.is_some()
            || self.dns_max_workers.is_some()
        {
            extractor.set_dns_confirmer(Arc::new(self.dns_check()));
        }
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate DNS timeout
        if let Some(timeout) = self.dns_timeout {
            if timeout == 0 {
                return Err(UrlExtractError::Config(
                    "DNS timeout cannot be 0. Expected a positive integer representing seconds."
                        .to_string(),
                ));
            }
            if timeout > validation::MAX_DNS_TIMEOUT_SECONDS {
                return Err(UrlExtractError::Config(format!(
                    "DNS timeout of {timeout} seconds is too large. Expected at most {} seconds.",
                    validation::MAX_DNS_TIMEOUT_SECONDS
                )));
            }
        }

        // Validate DNS workers
        if let Some(workers) = self.dns_max_workers {
            if workers == 0 {
                return Err(UrlExtractError::Config(
                    "DNS worker count cannot be 0. Expected a positive integer.".to_string(),
                ));
            }
            if workers > validation::MAX_DNS_WORKERS {
                return Err(UrlExtractError::Config(format!(
                    "DNS worker count of {workers} is too high. Expected at most {}.",
                    validation::MAX_DNS_WORKERS
                )));
            }
        }

        // Validate limit
        if self.limit == Some(0) {
            return Err(UrlExtractError::Config(
                "Limit cannot be 0. Expected a positive integer or no_limit = true.".to_string(),
            ));
        }
        if self.limit.is_some() && self.no_limit == Some(true) {
            return Err(UrlExtractError::Config(
                "Options limit and no_limit cannot be used together.".to_string(),
            ));
        }

        // Validate enclosures
        if let Some(ref enclosures) = self.enclosures {
            for (left, right) in enclosures {
                if left.chars().count() != 1 || right.chars().count() != 1 {
                    return Err(UrlExtractError::Config(format!(
                        "Enclosure ('{left}', '{right}') must be a pair of single characters."
                    )));
                }
            }
        }

        // Validate output format
        if let Some(ref format) = self.output_format
            && !output_formats::ALL.contains(&format.as_str())
        {
            return Err(UrlExtractError::Config(format!(
                "Invalid output format '{format}'. Expected one of: {}.",
                output_formats::ALL.join(", ")
            )));
        }

        Ok(())
    }
}

/// Configuration options that can come from CLI
#[derive(Debug, Default)]
pub struct CliConfig {
    // Extraction
    pub extract_email: bool,    // --extract-email
    pub no_localhost: bool,     // --no-localhost
    pub limit: Option<usize>,   // --limit
    pub no_limit: bool,         // --no-limit

    // Host lists
    pub ignore_file: Option<PathBuf>, // --ignore-file
    pub permit_file: Option<PathBuf>, // --permit-file

    // TLD cache
    pub cache_dir: Option<PathBuf>, // --cache-dir

    // DNS
    pub dns_timeout: Option<u64>, // --dns-timeout

    // Output & format
    pub quiet: bool,                   // --quiet
    pub verbose: bool,                 // --verbose
    pub output_format: Option<String>, // --format

    // Configuration
    pub config_file: Option<String>, // --config
    pub no_config: bool,             // --no-config
}
