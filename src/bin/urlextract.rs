use clap::Parser;
use urlextract::config::{CliConfig, Config};
use urlextract::core::constants::output_formats;
use urlextract::core::error::UrlExtractError;
use urlextract::logging;
use urlextract::tld::CacheFile;
use urlextract::ui::output;
use urlextract::ui::{Cli, cli_to_config};
use urlextract::{FindOptions, UrlExtract};

use std::io::Read;
use std::time::Instant;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match run_urlextract_logic(&cli).await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Main extraction logic extracted from main() for testing
pub async fn run_urlextract_logic(cli: &Cli) -> Result<i32, Box<dyn std::error::Error>> {
    let cli_config = cli_to_config(cli);
    let config = load_and_merge_config(&cli_config)?;

    logging::init_logger(cli_config.verbose, cli_config.quiet);
    logging::log_config_info(&config);

    let cache = CacheFile::new(config.cache_dir.as_deref())?;
    let mut extractor = UrlExtract::from_cache(&cache)?;
    refresh_tld_list(cli, &config, &cache, &mut extractor).await?;
    config.apply_to(&mut extractor)?;

    let text = read_input(cli)?;
    logging::log_input_info(cli.input_file.as_deref(), text.len());

    let opts = FindOptions::new()
        .only_unique(cli.unique)
        .check_dns(cli.check_dns)
        .with_scheme_only(cli.with_scheme_only);

    // DNS checks block on their own runtime and must not run on an async worker
    let started = Instant::now();
    let result =
        tokio::task::spawn_blocking(move || extractor.find_urls_with(&text, &opts)).await?;

    let output_format = config
        .output_format
        .as_deref()
        .unwrap_or(output_formats::DEFAULT);

    match result {
        Ok(urls) => {
            logging::log_extraction_complete(urls.len(), started.elapsed().as_millis());
            output::display_results(&urls, output_format, cli.indices)?;
            Ok(0)
        }
        Err(e @ UrlExtractError::LimitReached { .. }) => {
            let partial = e.partial_results().unwrap_or_default();
            output::display_results(partial, output_format, cli.indices)?;
            eprintln!("Error: {e}");
            Ok(1)
        }
        Err(e) => Err(e.into()),
    }
}

/// Load the config file selected on the command line and merge the CLI over it
fn load_and_merge_config(cli_config: &CliConfig) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if cli_config.no_config {
        Config::default()
    } else if let Some(ref config_path) = cli_config.config_file {
        Config::load_from_file(config_path)?
    } else {
        Config::load_from_standard_locations()
    };

    config.merge_with_cli(cli_config);
    config.validate()?;
    Ok(config)
}

/// Download a new TLD list when asked to, or when the cached one is too old
async fn refresh_tld_list(
    cli: &Cli,
    config: &Config,
    cache: &CacheFile,
    extractor: &mut UrlExtract,
) -> Result<(), Box<dyn std::error::Error>> {
    if cli.update {
        extractor.update(cache).await?;
        return Ok(());
    }

    if let Some(days) = config.update_when_older_days
        && let Err(e) = extractor.update_when_older(cache, days).await
    {
        // keep using the stale list
        logging::log_warning(&format!("Could not refresh the TLD list: {e}"));
    }
    Ok(())
}

fn read_input(cli: &Cli) -> Result<String, Box<dyn std::error::Error>> {
    let text = match cli.input_file {
        Some(ref path) => std::fs::read_to_string(path).map_err(|e| {
            UrlExtractError::InvalidArgument(format!(
                "Could not read input file '{}': {e}",
                path.display()
            ))
        })?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(text)
}
