//! TLD catalog and its on-disk cache

pub mod cache;
pub mod catalog;

pub use cache::CacheFile;
pub use catalog::TldCatalog;
