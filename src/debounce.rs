//! Debounce gate for keystroke-driven queries
//!
//! The gate is driven by the caller's clock: every raw update carries the
//! instant it happened, and the event loop polls with the current instant.
//! This keeps the gate on the UI thread with no timer threads of its own.

use std::time::{Duration, Instant};

/// Raw text as typed plus its settled copy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub raw: String,
    pub debounced: String,
}

/// Delays a query until the input has been stationary for a quiet period
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet_period: Duration,
    query: SearchQuery,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            query: SearchQuery::default(),
            deadline: None,
        }
    }

    /// Record a raw update, restarting the quiet period.
    ///
    /// An empty string is a normal value and is debounced like any other.
    pub fn push(&mut self, raw: impl Into<String>, now: Instant) {
        self.query.raw = raw.into();
        self.deadline = Some(now + self.quiet_period);
    }

    /// Emit the settled value if the quiet period has elapsed since the last push
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.query.debounced = self.query.raw.clone();
                Some(self.query.debounced.clone())
            }
            _ => None,
        }
    }

    /// How long the event loop may sleep before the pending value is due
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn raw(&self) -> &str {
        &self.query.raw
    }

    pub fn debounced(&self) -> &str {
        &self.query.debounced
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Drop both copies and any pending emission
    pub fn reset(&mut self) {
        self.query = SearchQuery::default();
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(300);

    #[test]
    fn burst_emits_once_with_last_value() {
        let start = Instant::now();
        let mut gate = Debouncer::new(QUIET);

        let mut emitted = Vec::new();
        for (i, raw) in ["j", "jo", "joh", "john"].iter().enumerate() {
            let at = start + Duration::from_millis(100 * i as u64);
            if let Some(v) = gate.poll(at) {
                emitted.push(v);
            }
            gate.push(*raw, at);
        }
        // Still inside the quiet period of the last keystroke
        assert_eq!(gate.poll(start + Duration::from_millis(550)), None);

        if let Some(v) = gate.poll(start + Duration::from_millis(600)) {
            emitted.push(v);
        }
        assert_eq!(emitted, vec!["john".to_string()]);
        assert_eq!(gate.debounced(), "john");
        assert!(!gate.is_pending());
    }

    #[test]
    fn poll_after_emission_is_silent() {
        let start = Instant::now();
        let mut gate = Debouncer::new(QUIET);
        gate.push("ann", start);

        assert_eq!(gate.poll(start + QUIET), Some("ann".to_string()));
        assert_eq!(gate.poll(start + QUIET * 2), None);
    }

    #[test]
    fn clearing_input_is_debounced() {
        let start = Instant::now();
        let mut gate = Debouncer::new(QUIET);
        gate.push("an", start);
        gate.poll(start + QUIET);

        gate.push("", start + QUIET);
        assert_eq!(gate.raw(), "");
        assert_eq!(gate.debounced(), "an");
        assert_eq!(gate.poll(start + QUIET + Duration::from_millis(10)), None);
        assert_eq!(gate.poll(start + QUIET * 2), Some(String::new()));
    }

    #[test]
    fn time_until_due_counts_down() {
        let start = Instant::now();
        let mut gate = Debouncer::new(QUIET);
        assert_eq!(gate.time_until_due(start), None);

        gate.push("x", start);
        assert_eq!(
            gate.time_until_due(start + Duration::from_millis(100)),
            Some(Duration::from_millis(200))
        );
        assert_eq!(gate.time_until_due(start + QUIET * 2), Some(Duration::ZERO));
    }

    #[test]
    fn reset_discards_pending_value() {
        let start = Instant::now();
        let mut gate = Debouncer::new(QUIET);
        gate.push("smith", start);
        gate.reset();

        assert_eq!(gate.poll(start + QUIET), None);
        assert_eq!(gate.query(), &SearchQuery::default());
    }
}
