//! Trailing-edge debounce driven by explicit timestamps.
//!
//! The host owns the real timer. It asks for [`Debounce::deadline_ms`], sleeps
//! until then, and calls [`Debounce::take_due`] with the current time. Each
//! [`Debounce::push`] replaces the pending value and restarts the quiet
//! period, so a burst of N pushes yields exactly one value: the last.

#[cfg(test)]
#[path = "debounce_test.rs"]
mod debounce_test;

#[derive(Debug, Clone)]
pub struct Debounce<T> {
    delay_ms: f64,
    pending: Option<(f64, T)>,
}

impl<T> Debounce<T> {
    pub fn new(delay_ms: f64) -> Self {
        Self { delay_ms, pending: None }
    }

    /// Replace the pending value and restart the quiet period at `now_ms`.
    pub fn push(&mut self, value: T, now_ms: f64) {
        self.pending = Some((now_ms + self.delay_ms, value));
    }

    /// When the pending value becomes due, if any.
    pub fn deadline_ms(&self) -> Option<f64> {
        self.pending.as_ref().map(|(due, _)| *due)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending value if its quiet period has elapsed.
    pub fn take_due(&mut self, now_ms: f64) -> Option<T> {
        if self.deadline_ms().is_some_and(|due| now_ms >= due) { self.flush() } else { None }
    }

    /// Take the pending value regardless of the deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(_, value)| value)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
