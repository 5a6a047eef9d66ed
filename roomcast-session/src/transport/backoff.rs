use std::time::Duration;

/// Cycling reconnect delay.
///
/// Every connection attempt advances the counter by `step`, wrapping back to
/// zero once it has reached `max`. The value is not applied to the attempt
/// that advanced it; it is the delay before the next one.
#[derive(Debug, Clone)]
pub struct Backoff {
    current: Duration,
    step: Duration,
    max: Duration,
}

impl Backoff {
    pub fn new(step: Duration, max: Duration) -> Self {
        Self {
            current: Duration::ZERO,
            step,
            max,
        }
    }

    /// Called on every connection attempt.
    pub fn advance(&mut self) -> Duration {
        if self.current >= self.max {
            self.current = Duration::ZERO;
        }
        self.current += self.step;
        self.current
    }

    /// Delay to wait before the next attempt.
    pub fn current(&self) -> Duration {
        self.current
    }
}
