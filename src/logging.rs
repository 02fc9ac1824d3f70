use crate::config::Config;
use log::{debug, info, warn};
use std::path::Path;

/// Initialize the logger with appropriate level based on verbosity
pub fn init_logger(verbose: bool, quiet: bool) {
    let level = if quiet {
        log::LevelFilter::Off
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    debug!("Logger initialized with level: {level:?}");
}

/// Log configuration information
pub fn log_config_info(config: &Config) {
    let extract_email = config.extract_email.unwrap_or(false);
    let extract_localhost = config.extract_localhost.unwrap_or(true);
    let limit = config
        .effective_limit()
        .map_or_else(|| "none".to_string(), |limit| limit.to_string());
    let dns_timeout = config.dns_timeout_duration().as_secs();
    let dns_workers = config.dns_max_workers.unwrap_or(0);

    info!(
        "Configuration: extract_email={extract_email}, extract_localhost={extract_localhost}, limit={limit}"
    );
    info!("DNS: timeout={dns_timeout}s, workers={dns_workers}");
}

/// Log which input is being read
pub fn log_input_info(input: Option<&Path>, bytes: usize) {
    match input {
        Some(path) => info!("Reading {bytes} bytes from {}", path.display()),
        None => info!("Reading {bytes} bytes from stdin"),
    }
}

/// Log extraction completion
pub fn log_extraction_complete(url_count: usize, duration_ms: u128) {
    if url_count == 0 {
        info!("Extraction complete: no URLs found ({duration_ms}ms)");
    } else {
        info!("Extraction complete: {url_count} URL(s) found ({duration_ms}ms)");
    }
}

/// Log warning information
pub fn log_warning(message: &str) {
    warn!("{message}");
}
