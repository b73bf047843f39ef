//! Per-event retry accounting
//!
//! Attempt counting is keyed strictly by `event_id`, not by delivery: a
//! broker redelivery of the same event accumulates toward the same counter.
//! State is process-local and lives only for a single message's redelivery
//! sequence (cleared on success or exhaustion), so a process restart resets
//! in-flight counters and redelivery after a restart can extend effective
//! attempts past the ceiling. Known limitation, bounded in practice by the
//! dead-letter ceiling itself.

use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Default)]
struct RetryState {
    attempts: u32,
    errors: Vec<String>,
}

/// Outcome of recording a handler failure
#[derive(Debug)]
pub enum FailureOutcome {
    /// Attempts remain; the message should be requeued
    Retry { attempt: u32 },
    /// Ceiling reached; the message should be rejected to the dead-letter
    /// queue. Carries every error captured across the attempts.
    Exhausted { attempts: u32, errors: Vec<String> },
}

/// Attempt counter and exception log per in-flight event
#[derive(Debug)]
pub struct RetryTracker {
    max_attempts: u32,
    states: HashMap<Uuid, RetryState>,
}

impl RetryTracker {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            states: HashMap::new(),
        }
    }

    /// Record a failed attempt for an event and decide whether to retry
    ///
    /// Exhaustion removes the event's state; the next failure for the same
    /// `event_id` starts a fresh count.
    pub fn record_failure(&mut self, event_id: Uuid, error: String) -> FailureOutcome {
        let state = self.states.entry(event_id).or_default();
        state.attempts += 1;
        state.errors.push(error);
        let attempts = state.attempts;

        if attempts >= self.max_attempts {
            let state = self.states.remove(&event_id).unwrap_or_default();
            FailureOutcome::Exhausted {
                attempts: state.attempts,
                errors: state.errors,
            }
        } else {
            FailureOutcome::Retry { attempt: attempts }
        }
    }

    /// Drop any retry state for an event (called on success)
    pub fn clear(&mut self, event_id: Uuid) {
        self.states.remove(&event_id);
    }

    /// Number of events with retry state (used by tests)
    pub fn tracked_events(&self) -> usize {
        self.states.len()
    }
}
