//! DNS confirmation of extracted hosts
//!
//! The extractor only asks one question: does this host resolve? Anything
//! implementing [`DnsConfirmer`] can answer it. [`DnsCheck`] is the default
//! implementation backed by the system resolver.

mod check;

pub use check::{DnsCheck, HostResolver, SystemResolver};

/// Decides whether a host name resolves.
///
/// Implementations own their timeout policy: a lookup that cannot be
/// decided in time must still produce a plain `bool`.
pub trait DnsConfirmer: Send + Sync {
    fn resolvable(&self, host: &str) -> bool;

    /// Answer for several hosts at once, in input order.
    fn resolvable_many(&self, hosts: &[String]) -> Vec<bool> {
        hosts.iter().map(|host| self.resolvable(host)).collect()
    }
}
