use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of "now" for expiry checks, in milliseconds since the Unix epoch.
///
/// Everything that compares a token's `exp` against the current time takes a
/// clock instead of reading the system time directly, so the comparison is
/// deterministic under test.
pub trait Clock: Send + Sync + 'static {
    fn now_millis(&self) -> u64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Wall-clock time sampled once, then advanced by tokio's monotonic clock.
///
/// Immune to wall-clock jumps after start-up, and follows tokio's paused
/// clock in tests (`tokio::time::advance` moves it too).
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin_millis: u64,
    start: tokio::time::Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self::starting_at(SystemClock.now_millis())
    }

    pub fn starting_at(origin_millis: u64) -> Self {
        Self {
            origin_millis,
            start: tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now_millis(&self) -> u64 {
        self.origin_millis + self.start.elapsed().as_millis() as u64
    }
}

/// Manually driven clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct FixedClock(Arc<AtomicU64>);

impl FixedClock {
    pub fn new(now_millis: u64) -> Self {
        Self(Arc::new(AtomicU64::new(now_millis)))
    }

    pub fn set(&self, now_millis: u64) {
        self.0.store(now_millis, Ordering::SeqCst);
    }

    pub fn advance_secs(&self, secs: u64) {
        self.0.fetch_add(secs * 1000, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}
