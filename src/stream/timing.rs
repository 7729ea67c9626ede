use crate::foundation::core::Timestamp;
use crate::foundation::error::{SuperShowError, SuperShowResult};

/// Traversal duration and creation cadence derived from a speed setting.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct StreamTiming {
    pub speed: f64,
    pub traversal_ms: f64,
    pub creation_interval_ms: f64,
}

impl StreamTiming {
    pub const BASE_SPEED: f64 = 500.0;
    pub const BASE_TRAVERSAL_MS: f64 = 15_000.0;
    /// Words created per traversal duration.
    pub const WORDS_PER_TRAVERSAL: f64 = 15.0;

    /// Faster speeds shorten the traversal; the creation interval scales with it.
    pub fn for_speed(speed: f64) -> SuperShowResult<Self> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(SuperShowError::validation("speed must be finite and > 0"));
        }
        let traversal_ms = Self::BASE_TRAVERSAL_MS * (Self::BASE_SPEED / speed);
        Ok(Self {
            speed,
            traversal_ms,
            creation_interval_ms: traversal_ms / Self::WORDS_PER_TRAVERSAL,
        })
    }
}

/// Fires at most once per interval; the first poll after a reset fires immediately.
#[derive(Clone, Copy, Debug)]
pub struct CreationClock {
    interval_ms: f64,
    last: Option<Timestamp>,
}

impl CreationClock {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last: None,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn set_interval(&mut self, interval_ms: f64) {
        self.interval_ms = interval_ms;
    }

    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn poll(&mut self, now: Timestamp) -> bool {
        let due = match self.last {
            None => true,
            Some(last) => now.since(last) >= self.interval_ms,
        };
        if due {
            self.last = Some(now);
        }
        due
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stream/timing.rs"]
mod tests;
