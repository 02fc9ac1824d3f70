//! On-disk cache of the IANA TLD list
//!
//! The cache lives in a user-writable directory. When no cached list exists
//! the bundled one is used. Updates download into a temporary file next to
//! the cache and rename it into place, so a reader never sees a partial list.

use chrono::{DateTime, Local, TimeDelta};
use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::core::constants::files;
use crate::core::error::{Result, UrlExtractError};
use crate::tld::TldCatalog;

#[derive(Debug, Clone)]
pub struct CacheFile {
    dir: PathBuf,
    source_url: String,
}

impl CacheFile {
    /// Use `cache_dir` when given, otherwise the first writable of the user
    /// cache directory and the system temp directory.
    pub fn new(cache_dir: Option<&Path>) -> Result<Self> {
        let dir = match cache_dir {
            Some(dir) => {
                if !is_writable_dir(dir) {
                    return Err(UrlExtractError::CacheFile(format!(
                        "Cache directory '{}' is not writable",
                        dir.display()
                    )));
                }
                dir.to_path_buf()
            }
            None => default_cache_dir()?,
        };
        debug!("Using TLD cache directory '{}'", dir.display());

        Ok(Self {
            dir,
            source_url: files::IANA_TLD_URL.to_string(),
        })
    }

    /// Download the list from `url` instead of IANA.
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of the cached list.
    pub fn path(&self) -> PathBuf {
        self.dir.join(files::CACHE_FILE_NAME)
    }

    /// Load the cached list, or the bundled one when nothing is cached yet.
    pub fn load(&self) -> Result<TldCatalog> {
        let path = self.path();
        if !path.exists() {
            info!(
                "No cached TLD list at '{}', using the bundled list",
                path.display()
            );
            return Ok(TldCatalog::bundled());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            UrlExtractError::CacheFile(format!("Cannot read '{}': {e}", path.display()))
        })?;
        let catalog = TldCatalog::parse(&content);
        if catalog.is_empty() {
            return Err(UrlExtractError::CacheFile(format!(
                "Cached TLD list '{}' is empty",
                path.display()
            )));
        }
        debug!("Loaded {} TLDs from '{}'", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Download a fresh list and replace the cached one.
    pub async fn update(&self) -> Result<()> {
        info!("Downloading TLD list from {}", self.source_url);
        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;
        let content = client
            .get(&self.source_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        if TldCatalog::parse(&content).is_empty() {
            return Err(UrlExtractError::CacheFile(format!(
                "Downloaded TLD list from {} is empty",
                self.source_url
            )));
        }

        let path = self.path();
        let tmp_path = self
            .dir
            .join(format!("{}.{}.tmp", files::CACHE_FILE_NAME, std::process::id()));
        tokio::fs::write(&tmp_path, content.as_bytes()).await?;
        if let Err(e) = tokio::fs::rename(&tmp_path, &path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        info!("Updated TLD list at '{}'", path.display());
        Ok(())
    }

    /// Update when the cached list is missing or older than `days`.
    ///
    /// Returns whether an update was made.
    pub async fn update_when_older(&self, days: u64) -> Result<bool> {
        let stale = match self.last_modified() {
            None => true,
            Some(modified) => Local::now().signed_duration_since(modified) > max_age(days),
        };
        if !stale {
            debug!("Cached TLD list is newer than {days} days");
            return Ok(false);
        }
        self.update().await?;
        Ok(true)
    }

    /// Modification time of the cached list, `None` if there is none.
    pub fn last_modified(&self) -> Option<DateTime<Local>> {
        let modified = std::fs::metadata(self.path()).ok()?.modified().ok()?;
        Some(DateTime::<Local>::from(modified))
    }
}

/// `days` as a duration, saturating at the largest one chrono can hold.
fn max_age(days: u64) -> TimeDelta {
    i64::try_from(days)
        .ok()
        .and_then(TimeDelta::try_days)
        .unwrap_or(TimeDelta::MAX)
}

fn default_cache_dir() -> Result<PathBuf> {
    let candidates = dirs::cache_dir()
        .map(|dir| dir.join(files::APP_NAME))
        .into_iter()
        .chain(std::iter::once(std::env::temp_dir().join(files::APP_NAME)));

    for dir in candidates {
        if is_writable_dir(&dir) {
            return Ok(dir);
        }
        debug!("Cache directory '{}' is not writable", dir.display());
    }
    Err(UrlExtractError::CacheFile(
        "Cache directories are not writable".to_string(),
    ))
}

fn is_writable_dir(dir: &Path) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }
    std::fs::metadata(dir).is_ok_and(|meta| meta.is_dir() && !meta.permissions().readonly())
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use mockito::Server;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    const TLD_LIST: &str = "# Version 2024010100, Last Updated Mon Jan  1 07:07:01 2024 UTC\nCOM\nCZ\nXN--P1AI\n";

    #[test]
    fn test_load__when_nothing_cached() -> TestResult {
        let dir = tempfile::tempdir()?;
        let cache = CacheFile::new(Some(dir.path()))?;

        assert!(cache.last_modified().is_none());
        assert_eq!(cache.load()?, TldCatalog::bundled());
        Ok(())
    }

    #[test]
    fn test_load__when_cached() -> TestResult {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join(files::CACHE_FILE_NAME), "IO\n")?;
        let cache = CacheFile::new(Some(dir.path()))?;

        let catalog = cache.load()?;

        assert_eq!(catalog.len(), 1);
        assert!(catalog.contains(".io"));
        assert!(cache.last_modified().is_some());
        Ok(())
    }

    #[test]
    fn test_load__when_cached_list_is_empty() -> TestResult {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join(files::CACHE_FILE_NAME), "# nothing\n")?;
        let cache = CacheFile::new(Some(dir.path()))?;

        assert!(matches!(cache.load(), Err(UrlExtractError::CacheFile(_))));
        Ok(())
    }

    #[test]
    fn test_new__creates_missing_dir() -> TestResult {
        let dir = tempfile::tempdir()?;
        let nested = dir.path().join("a").join("b");
        let cache = CacheFile::new(Some(&nested))?;

        assert!(nested.is_dir());
        assert_eq!(cache.path(), nested.join(files::CACHE_FILE_NAME));
        Ok(())
    }

    #[tokio::test]
    async fn test_update__writes_cache_file() -> TestResult {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/tlds.txt")
            .with_status(200)
            .with_body(TLD_LIST)
            .create_async()
            .await;
        let dir = tempfile::tempdir()?;
        let cache =
            CacheFile::new(Some(dir.path()))?.with_source_url(server.url() + "/tlds.txt");

        cache.update().await?;

        let catalog = cache.load()?;
        assert!(catalog.contains(".cz"));
        assert!(catalog.contains(".рф"));
        assert_eq!(std::fs::read_dir(dir.path())?.count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_update__when_server_fails() -> TestResult {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/tlds.txt")
            .with_status(500)
            .create_async()
            .await;
        let dir = tempfile::tempdir()?;
        let cache =
            CacheFile::new(Some(dir.path()))?.with_source_url(server.url() + "/tlds.txt");

        let result = cache.update().await;

        assert!(matches!(result, Err(UrlExtractError::Http(_))));
        assert!(!cache.path().exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_update__when_list_is_empty() -> TestResult {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/tlds.txt")
            .with_status(200)
            .with_body("# empty\n")
            .create_async()
            .await;
        let dir = tempfile::tempdir()?;
        let cache =
            CacheFile::new(Some(dir.path()))?.with_source_url(server.url() + "/tlds.txt");

        assert!(matches!(
            cache.update().await,
            Err(UrlExtractError::CacheFile(_))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_when_older__skips_fresh_cache() -> TestResult {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/tlds.txt")
            .with_status(200)
            .with_body(TLD_LIST)
            .expect(1)
            .create_async()
            .await;
        let dir = tempfile::tempdir()?;
        let cache =
            CacheFile::new(Some(dir.path()))?.with_source_url(server.url() + "/tlds.txt");

        assert!(cache.update_when_older(7).await?);
        assert!(!cache.update_when_older(7).await?);
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_update_when_older__when_days_exceed_i64() -> TestResult {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join(files::CACHE_FILE_NAME), TLD_LIST)?;
        let cache = CacheFile::new(Some(dir.path()))?.with_source_url("http://127.0.0.1:9/tlds.txt");

        assert!(!cache.update_when_older(u64::MAX).await?);
        Ok(())
    }

    #[test]
    fn test_max_age__saturates() {
        assert_eq!(max_age(7), TimeDelta::days(7));
        assert_eq!(max_age(u64::MAX), TimeDelta::MAX);
        assert_eq!(max_age(i64::MAX as u64), TimeDelta::MAX);
    }
}
