/// Application-wide constants to avoid magic values throughout the codebase.
///
/// This module centralizes the default character sets, limits and file names
/// used by the extractor, the TLD cache and the command-line tool.
/// Output format constants
pub mod output_formats {
    /// Text output format - one URL per line
    pub const TEXT: &str = "text";
    /// JSON output format - structured output for automation
    pub const JSON: &str = "json";

    /// Default output format
    pub const DEFAULT: &str = TEXT;

    /// All valid output formats
    pub const ALL: [&str; 2] = [TEXT, JSON];
}

/// Default character sets used by the boundary scan
pub mod chars {
    /// ASCII whitespace
    pub const WHITESPACE: [char; 6] = [' ', '\t', '\n', '\r', '\x0b', '\x0c'];

    /// Characters that end a scan in both directions
    pub const GENERAL_STOP: [char; 4] = ['"', '<', '>', ';'];

    /// Extra characters that end the leftward scan only
    pub const LEFT_ONLY_STOP: [char; 5] = ['|', '=', ']', ')', '}'];

    /// Extra characters that end the leftward scan from a `scheme://` marker
    pub const LEFT_FROM_SCHEME_STOP: [char; 1] = [':'];

    /// Characters allowed right after a TLD, besides whitespace and closers
    pub const AFTER_TLD: [char; 9] = ['/', '"', '\'', '<', '>', '?', ':', '.', ','];

    /// Characters a URL never starts with once enclosures are removed
    pub const LEADING_UNRESERVED: [char; 4] = ['-', '.', '~', '_'];

    /// Default enclosure pairs
    pub const ENCLOSURES: [(char, char); 7] = [
        ('(', ')'),
        ('{', '}'),
        ('[', ']'),
        ('"', '"'),
        ('\\', '\\'),
        ('\'', '\''),
        ('`', '`'),
    ];
}

/// Default configuration values
pub mod defaults {
    /// Default maximum number of URLs one call may extract
    pub const LIMIT: usize = 10_000;
    /// Default DNS lookup timeout in seconds
    pub const DNS_TIMEOUT_SECONDS: u64 = 5;
    /// Default number of concurrent DNS lookups
    pub const DNS_MAX_WORKERS: usize = 2;
    /// Maximum number of enclosure unwrapping rounds for one candidate
    pub const MAX_ENCLOSURE_DEPTH: usize = 16;
    /// Pseudo-TLD used to recognise `localhost`
    pub const LOCALHOST: &str = "localhost";
}

/// Validation constants
pub mod validation {
    /// Maximum reasonable DNS timeout in seconds
    pub const MAX_DNS_TIMEOUT_SECONDS: u64 = 300;
    /// Maximum reasonable number of concurrent DNS lookups
    pub const MAX_DNS_WORKERS: usize = 256;
}

/// TLD cache file constants
pub mod files {
    /// Name used for the user cache directory
    pub const APP_NAME: &str = "urlextract";
    /// File name of the cached list of TLDs downloaded from IANA
    pub const CACHE_FILE_NAME: &str = "tlds-alpha-by-domain.txt";
    /// Where the list of TLDs is downloaded from
    pub const IANA_TLD_URL: &str = "https://data.iana.org/TLD/tlds-alpha-by-domain.txt";
    /// Configuration file searched for in the working directory and its parents
    pub const CONFIG_FILE_NAME: &str = ".urlextract.toml";
    /// Default refresh age of the cached TLD list used by the CLI
    pub const DEFAULT_UPDATE_DAYS: u64 = 30;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_formats_constants() {
        assert_eq!(output_formats::TEXT, "text");
        assert_eq!(output_formats::JSON, "json");
        assert_eq!(output_formats::DEFAULT, "text");
        assert_eq!(output_formats::ALL.len(), 2);
    }

    #[test]
    fn test_closers_of_default_enclosures() {
        let closers: Vec<char> = chars::ENCLOSURES.iter().map(|(_, right)| *right).collect();
        assert!(closers.contains(&')'));
        assert!(closers.contains(&'`'));
        assert_eq!(closers.len(), 7);
    }

    #[test]
    fn test_defaults_constants() {
        assert_eq!(defaults::LIMIT, 10_000);
        assert_eq!(defaults::DNS_TIMEOUT_SECONDS, 5);
        assert_eq!(defaults::DNS_MAX_WORKERS, 2);
    }
}
