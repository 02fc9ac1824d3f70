// Command-line interface definitions and parsing for urlextract

use crate::config::CliConfig;
use crate::core::constants::{output_formats, validation};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Text file to extract URLs from (reads stdin when omitted)
    pub input_file: Option<PathBuf>,

    // Extraction
    /// Print every URL only once
    #[arg(short = 'u', long, help_heading = "Extraction")]
    pub unique: bool,

    /// Extract email addresses as well
    #[arg(long, help_heading = "Extraction")]
    pub extract_email: bool,

    /// Do not recognise localhost as a host
    #[arg(long, help_heading = "Extraction")]
    pub no_localhost: bool,

    /// Only extract URLs that carry a scheme such as https://
    #[arg(long, help_heading = "Extraction")]
    pub with_scheme_only: bool,

    /// Maximum number of URLs to extract (default: 10000)
    #[arg(long, value_name = "COUNT", help_heading = "Extraction")]
    pub limit: Option<usize>,

    /// Extract any number of URLs
    #[arg(long, conflicts_with = "limit", help_heading = "Extraction")]
    pub no_limit: bool,

    // Filtering
    /// File with hosts to skip, one per line
    #[arg(long, value_name = "FILE", help_heading = "Filtering")]
    pub ignore_file: Option<PathBuf>,

    /// File with the only hosts to keep, one per line
    #[arg(long, value_name = "FILE", help_heading = "Filtering")]
    pub permit_file: Option<PathBuf>,

    // DNS
    /// Keep only URLs whose host resolves
    #[arg(long, help_heading = "DNS")]
    pub check_dns: bool,

    /// DNS lookup timeout in seconds (default: 5)
    #[arg(long, value_name = "SECONDS", help_heading = "DNS")]
    pub dns_timeout: Option<u64>,

    // TLD list
    /// Directory holding the cached TLD list
    #[arg(long, value_name = "DIR", help_heading = "TLD List")]
    pub cache_dir: Option<PathBuf>,

    /// Download a fresh TLD list before extracting
    #[arg(long, help_heading = "TLD List")]
    pub update: bool,

    // Output & Verbosity
    /// Print the byte offsets of every URL
    #[arg(long, help_heading = "Output & Verbosity")]
    pub indices: bool,

    /// Output format (default: text)
    #[arg(long, value_name = "FORMAT", value_parser = output_formats::ALL, help_heading = "Output & Verbosity")]
    pub format: Option<String>,

    /// Suppress all log output
    #[arg(short = 'q', long, help_heading = "Output & Verbosity")]
    pub quiet: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long, help_heading = "Output & Verbosity")]
    pub verbose: bool,

    // Configuration
    /// Use specific config file
    #[arg(long, value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Ignore config files
    #[arg(long, help_heading = "Configuration")]
    pub no_config: bool,
}

/// Convert the parsed command line into a `CliConfig`
pub fn cli_to_config(cli: &Cli) -> CliConfig {
    let mut cli_config = CliConfig {
        extract_email: cli.extract_email,
        no_localhost: cli.no_localhost,
        limit: cli.limit,
        no_limit: cli.no_limit,
        ignore_file: cli.ignore_file.clone(),
        permit_file: cli.permit_file.clone(),
        cache_dir: cli.cache_dir.clone(),
        dns_timeout: None,
        quiet: cli.quiet,
        verbose: cli.verbose,
        output_format: cli.format.clone(),
        config_file: cli.config.clone(),
        no_config: cli.no_config,
    };

    if let Some(timeout) = cli.dns_timeout {
        if timeout > validation::MAX_DNS_TIMEOUT_SECONDS {
            eprintln!(
                "Warning: DNS timeout of {timeout} seconds is above the maximum of {} seconds and will be rejected.",
                validation::MAX_DNS_TIMEOUT_SECONDS
            );
        }
        cli_config.dns_timeout = Some(timeout);
    }

    cli_config
}
