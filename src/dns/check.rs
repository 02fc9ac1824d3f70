use async_trait::async_trait;
use futures::{StreamExt, stream};
use log::{debug, warn};
use once_cell::sync::OnceCell;
use std::io;
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};
use tokio::time::{Duration, timeout};

use super::DnsConfirmer;
use crate::core::constants::defaults;

/// Asynchronous host lookup used by [`DnsCheck`].
#[async_trait]
pub trait HostResolver: Send + Sync {
    /// Whether `host` has at least one address.
    async fn lookup(&self, host: &str) -> io::Result<bool>;
}

/// Resolves through the operating system resolver.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResolver;

#[async_trait]
impl HostResolver for SystemResolver {
    async fn lookup(&self, host: &str) -> io::Result<bool> {
        let mut addrs = tokio::net::lookup_host((host, 0)).await?;
        Ok(addrs.next().is_some())
    }
}

/// [`DnsConfirmer`] that resolves hosts with a per-lookup timeout.
///
/// Lookups run on a private single-threaded tokio runtime, created on first
/// use, so the blocking methods must not be called from inside an async
/// task. Batches resolve at most `max_workers` hosts concurrently.
pub struct DnsCheck {
    resolver: Arc<dyn HostResolver>,
    timeout: Duration,
    accept_on_timeout: bool,
    max_workers: usize,
    runtime: OnceCell<Runtime>,
}

impl Default for DnsCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DnsCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsCheck")
            .field("timeout", &self.timeout)
            .field("accept_on_timeout", &self.accept_on_timeout)
            .field("max_workers", &self.max_workers)
            .finish()
    }
}

impl DnsCheck {
    pub fn new() -> Self {
        Self::with_resolver(Arc::new(SystemResolver))
    }

    pub fn with_resolver(resolver: Arc<dyn HostResolver>) -> Self {
        Self {
            resolver,
            timeout: Duration::from_secs(defaults::DNS_TIMEOUT_SECONDS),
            accept_on_timeout: false,
            max_workers: defaults::DNS_MAX_WORKERS,
            runtime: OnceCell::new(),
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether a lookup that times out counts as resolvable.
    pub fn accept_on_timeout(mut self, accept: bool) -> Self {
        self.accept_on_timeout = accept;
        self
    }

    /// Upper bound of concurrent lookups in a batch, at least 1.
    pub fn max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    /// Resolve `host` under the configured timeout.
    pub async fn check(&self, host: &str) -> bool {
        match timeout(self.timeout, self.resolver.lookup(host)).await {
            Ok(Ok(found)) => found,
            Ok(Err(e)) => {
                debug!("DNS lookup of '{host}' failed: {e}");
                false
            }
            Err(_) => {
                debug!(
                    "DNS lookup of '{host}' timed out after {:?}, accepting: {}",
                    self.timeout, self.accept_on_timeout
                );
                self.accept_on_timeout
            }
        }
    }

    /// Resolve all `hosts` with at most `max_workers` lookups in flight.
    pub async fn check_many(&self, hosts: &[String]) -> Vec<bool> {
        let mut answers: Vec<(usize, bool)> = stream::iter(hosts.iter().enumerate())
            .map(|(index, host)| async move { (index, self.check(host).await) })
            .buffer_unordered(self.max_workers)
            .collect()
            .await;
        answers.sort_unstable_by_key(|(index, _)| *index);
        answers.into_iter().map(|(_, found)| found).collect()
    }

    fn runtime(&self) -> Option<&Runtime> {
        match self
            .runtime
            .get_or_try_init(|| Builder::new_current_thread().enable_all().build())
        {
            Ok(runtime) => Some(runtime),
            Err(e) => {
                warn!("Cannot start DNS runtime, treating lookups as timed out: {e}");
                None
            }
        }
    }
}

impl DnsConfirmer for DnsCheck {
    fn resolvable(&self, host: &str) -> bool {
        match self.runtime() {
            Some(runtime) => runtime.block_on(self.check(host)),
            None => self.accept_on_timeout,
        }
    }

    fn resolvable_many(&self, hosts: &[String]) -> Vec<bool> {
        match self.runtime() {
            Some(runtime) => runtime.block_on(self.check_many(hosts)),
            None => vec![self.accept_on_timeout; hosts.len()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    /// Resolves hosts starting with "ok", never answers for "slow".
    struct FakeResolver {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl FakeResolver {
        fn new() -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl HostResolver for FakeResolver {
        async fn lookup(&self, host: &str) -> io::Result<bool> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            let result = if host.starts_with("slow") {
                sleep(Duration::from_secs(60)).await;
                Ok(true)
            } else if host.starts_with("err") {
                Err(io::Error::other("no such host"))
            } else {
                sleep(Duration::from_millis(5)).await;
                Ok(host.starts_with("ok"))
            };

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }
    }

    fn fake_check(resolver: Arc<FakeResolver>) -> DnsCheck {
        DnsCheck::with_resolver(resolver).timeout(Duration::from_millis(50))
    }

    #[test]
    fn test_resolvable_answers() {
        let check = fake_check(Arc::new(FakeResolver::new()));

        assert!(check.resolvable("ok.example.com"));
        assert!(!check.resolvable("missing.example.com"));
        assert!(!check.resolvable("err.example.com"));
    }

    #[test]
    fn test_timeout_follows_policy() {
        let rejecting = fake_check(Arc::new(FakeResolver::new()));
        assert!(!rejecting.resolvable("slow.example.com"));

        let accepting = fake_check(Arc::new(FakeResolver::new())).accept_on_timeout(true);
        assert!(accepting.resolvable("slow.example.com"));
        // a definite answer is not affected by the policy
        assert!(!accepting.resolvable("missing.example.com"));
    }

    #[test]
    fn test_resolvable_many_keeps_order_and_bounds_workers() {
        let resolver = Arc::new(FakeResolver::new());
        let check = fake_check(resolver.clone()).max_workers(2);
        let hosts: Vec<String> = ["ok1.cz", "no.cz", "ok2.cz", "ok3.cz", "no2.cz", "ok4.cz"]
            .iter()
            .map(|h| h.to_string())
            .collect();

        let answers = check.resolvable_many(&hosts);

        assert_eq!(answers, vec![true, false, true, true, false, true]);
        assert!(resolver.peak.load(Ordering::SeqCst) <= 2);
    }

    #[test]
    fn test_max_workers_is_at_least_one() {
        let check = DnsCheck::new().max_workers(0);
        assert_eq!(check.max_workers, 1);
    }

    #[test]
    fn test_system_resolver_localhost() {
        let check = DnsCheck::new();
        assert!(check.resolvable("localhost"));
        assert!(check.resolvable("127.0.0.1"));
    }
}
