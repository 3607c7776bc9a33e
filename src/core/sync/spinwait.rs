/*!
 * Spin-Wait Backoff
 *
 * Pacing for busy-wait loops. A poller never parks on a queue: it keeps
 * re-checking its condition, only changing how long it pauses between polls.
 *
 * 1. **Tight spin phase**: just `spin_loop()`
 * 2. **Yield phase**: `yield_now()` every iteration
 * 3. **Sleep phase**: exponentially increasing sleep, capped
 */

use super::config::SpinConfig;
use std::thread;
use std::time::Duration;

/// Per-acquisition backoff state
#[derive(Debug)]
pub struct SpinWait {
    config: SpinConfig,
    polls: u32,
    sleep_ns: u64,
}

impl SpinWait {
    pub fn new(config: SpinConfig) -> Self {
        Self {
            config,
            polls: 0,
            sleep_ns: 1_000,
        }
    }

    /// Number of pauses taken so far
    #[inline]
    pub fn polls(&self) -> u32 {
        self.polls
    }

    /// Pause before the next poll
    pub fn snooze(&mut self) {
        let yield_end = self.config.spin_phase.saturating_add(self.config.yield_phase);

        if self.polls < self.config.spin_phase {
            std::hint::spin_loop();
        } else if self.polls < yield_end || self.config.max_sleep.is_zero() {
            thread::yield_now();
        } else {
            let cap = self.config.max_sleep.as_nanos() as u64;
            thread::sleep(Duration::from_nanos(self.sleep_ns.min(cap)));
            self.sleep_ns = (self.sleep_ns * 2).min(cap);
        }

        self.polls = self.polls.saturating_add(1);
    }

    /// Start over after a successful poll
    pub fn reset(&mut self) {
        self.polls = 0;
        self.sleep_ns = 1_000;
    }
}

impl Default for SpinWait {
    fn default() -> Self {
        Self::new(SpinConfig::default())
    }
}
