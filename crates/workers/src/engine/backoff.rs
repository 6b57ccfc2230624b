use std::time::Duration;

use rand::Rng;

/// Wait between failed polls of the engine. Activity retries belong to the
/// engine, not to this.
///
/// The n-th consecutive failure waits a random time in `[cap/2, cap]`, with
/// `cap = min(ceiling, initial * 2^n)`.
#[derive(Debug, Clone)]
pub struct PollBackoff {
    pub initial: Duration,
    pub ceiling: Duration,
}

impl Default for PollBackoff {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(200),
            ceiling: Duration::from_secs(30),
        }
    }
}

impl PollBackoff {
    pub fn cap(&self, consecutive_failures: u32) -> Duration {
        let factor = 1u32.checked_shl(consecutive_failures).unwrap_or(u32::MAX);
        self.initial.saturating_mul(factor).min(self.ceiling)
    }

    pub fn delay(&self, consecutive_failures: u32) -> Duration {
        let cap = self.cap(consecutive_failures);
        if cap.is_zero() {
            return cap;
        }
        rand::thread_rng().gen_range(cap / 2..=cap)
    }
}
