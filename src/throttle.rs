use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// Process-wide admission gate driven by upstream throttling signals.
///
/// A single `ThrottleGate` is shared by every in-flight request. The upstream
/// client records the `Retry-After` deadline it receives; the engine checks
/// the gate before doing any segmentation or upstream work and fails fast
/// while the window is closed. Updates race without locking: the signal is
/// advisory and an occasional extra upstream call during the race window is
/// tolerable.
#[derive(Debug)]
pub struct ThrottleGate {
    base: Instant,
    /// Milliseconds after `base` at which work may resume; 0 means open.
    resume_at_ms: AtomicU64,
}

impl Default for ThrottleGate {
    fn default() -> Self {
        Self::new()
    }
}

impl ThrottleGate {
    #[must_use]
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            resume_at_ms: AtomicU64::new(0),
        }
    }

    /// Remaining wait if the gate is closed at `now`, `None` once the
    /// deadline has passed. An expired deadline is cleared on read.
    #[must_use]
    pub fn check(&self, now: Instant) -> Option<Duration> {
        let resume_ms = self.resume_at_ms.load(Ordering::Relaxed);
        if resume_ms == 0 {
            return None;
        }
        let resume_at = self.base + Duration::from_millis(resume_ms);
        if now >= resume_at {
            self.resume_at_ms.store(0, Ordering::Relaxed);
            return None;
        }
        Some(resume_at - now)
    }

    /// Record an upstream throttle signal: close the gate until
    /// `now + resume_after`. A later deadline always wins over an earlier one.
    #[allow(clippy::cast_possible_truncation)]
    pub fn record(&self, resume_after: Duration, now: Instant) {
        let resume_at = now + resume_after;
        let resume_ms = resume_at.duration_since(self.base).as_millis() as u64;
        self.resume_at_ms.fetch_max(resume_ms.max(1), Ordering::Relaxed);
    }
}

/// Shared spacing gate enforcing a minimum interval between upstream calls.
///
/// All concurrent callers stamp the same value, so the interval is a single
/// global throttle rather than a per-caller budget. The stamp is taken
/// immediately before dispatch, not after completion, so overlapping calls
/// cannot under-space below the minimum.
#[derive(Debug)]
pub struct PacingGate {
    base: Instant,
    min_interval: Duration,
    /// Offset of the most recent dispatch plus one; 0 means no dispatch yet.
    last_request_ms: AtomicU64,
}

impl PacingGate {
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            base: Instant::now(),
            min_interval,
            last_request_ms: AtomicU64::new(0),
        }
    }

    /// Suspend the current task until the minimum spacing has elapsed, then
    /// stamp the dispatch time.
    pub async fn pace(&self) {
        let stamped = self.last_request_ms.load(Ordering::Relaxed);
        if stamped != 0 {
            let last = self.base + Duration::from_millis(stamped - 1);
            let elapsed = Instant::now().saturating_duration_since(last);
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        self.stamp(Instant::now());
    }

    #[allow(clippy::cast_possible_truncation)]
    fn stamp(&self, now: Instant) {
        let offset_ms = now.duration_since(self.base).as_millis() as u64;
        self.last_request_ms.store(offset_ms + 1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_starts_open() {
        let gate = ThrottleGate::new();
        assert_eq!(gate.check(Instant::now()), None);
    }

    #[test]
    fn test_record_closes_gate_until_deadline() {
        let gate = ThrottleGate::new();
        let now = Instant::now();
        gate.record(Duration::from_secs(30), now);

        let wait = gate.check(now).expect("gate should be closed");
        assert!(wait <= Duration::from_secs(30));
        assert!(wait > Duration::from_secs(29));
    }

    #[test]
    fn test_gate_reopens_after_deadline() {
        let gate = ThrottleGate::new();
        let now = Instant::now();
        gate.record(Duration::from_secs(10), now);

        assert_eq!(gate.check(now + Duration::from_secs(11)), None);
        // cleared on read, later checks take the fast path
        assert_eq!(gate.check(now), None);
    }

    #[test]
    fn test_later_deadline_wins() {
        let gate = ThrottleGate::new();
        let now = Instant::now();
        gate.record(Duration::from_secs(60), now);
        gate.record(Duration::from_secs(5), now);

        let wait = gate.check(now).expect("gate should be closed");
        assert!(wait > Duration::from_secs(50));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_call_is_not_paced() {
        let gate = PacingGate::new(Duration::from_millis(200));
        let before = Instant::now();
        gate.pace().await;
        assert_eq!(Instant::now(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_consecutive_calls_are_spaced() {
        let gate = PacingGate::new(Duration::from_millis(200));
        gate.pace().await;
        let before = Instant::now();
        gate.pace().await;
        assert!(Instant::now().duration_since(before) >= Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_elapsed_interval_skips_the_wait() {
        let gate = PacingGate::new(Duration::from_millis(200));
        gate.pace().await;
        tokio::time::sleep(Duration::from_millis(300)).await;

        let before = Instant::now();
        gate.pace().await;
        assert_eq!(Instant::now(), before);
    }
}
