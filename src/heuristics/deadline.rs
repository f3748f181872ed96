use std::time::{Duration, Instant};

/// Wall-clock budget checked cooperatively by the search loops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    start: Instant,
    limit: Option<Duration>,
}

impl Deadline {
    /// Deadline `seconds` from now. Non-finite or negative budgets mean "no limit"
    /// and "already expired" respectively.
    pub fn after_secs(seconds: f64) -> Self {
        let limit = if seconds > 0.0 {
            // budgets too large for a Duration are treated as unlimited
            Duration::try_from_secs_f64(seconds).ok()
        } else {
            Some(Duration::ZERO)
        };
        Deadline { start: Instant::now(), limit }
    }

    pub fn unlimited() -> Self {
        Deadline { start: Instant::now(), limit: None }
    }

    #[inline]
    pub fn expired(&self) -> bool {
        match self.limit {
            Some(limit) => self.start.elapsed() >= limit,
            None => false,
        }
    }

    /// Seconds since the deadline was created
    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}
