//! Bounded predicate polling.
//!
//! Every blocking operation in this crate funnels through [`wait`]: a
//! synchronous poll loop that re-evaluates a caller-supplied predicate until
//! it reports success or a timeout elapses. Elapsed time is measured on the
//! monotonic clock, so wall-clock adjustments cannot skew a wait.

use std::time::{Duration, Instant};

/// Default timeout applied when the caller does not override it.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_millis(1000);
/// Default pause between predicate probes.
pub const DEFAULT_POLL_DELAY: Duration = Duration::from_millis(50);

/// A bounded polling request: how long to keep probing, and how long to
/// sleep between probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitSpec {
    pub timeout: Duration,
    pub delay: Duration,
}

impl WaitSpec {
    /// A zero delay would busy-spin the calling thread, so it is clamped to
    /// one millisecond.
    pub fn new(timeout: Duration, delay: Duration) -> Self {
        let delay = if delay.is_zero() {
            Duration::from_millis(1)
        } else {
            delay
        };
        Self { timeout, delay }
    }
}

impl Default for WaitSpec {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_WAIT_TIMEOUT,
            delay: DEFAULT_POLL_DELAY,
        }
    }
}

/// Repeatedly invokes `predicate`, returning `true` as soon as it succeeds.
///
/// The timeout is checked after each predicate call, so a wait never gives up
/// while a probe is still in flight; it returns `false` once the elapsed time
/// exceeds `spec.timeout`. The predicate may mutate shared state (this is how
/// resolvers couple polling with tree refreshes) and must therefore tolerate
/// being called repeatedly.
pub fn wait(spec: WaitSpec, mut predicate: impl FnMut() -> bool) -> bool {
    let started = Instant::now();
    loop {
        if predicate() {
            return true;
        }
        if started.elapsed() > spec.timeout {
            return false;
        }
        std::thread::sleep(spec.delay);
    }
}
