//! Progress record for one checkout attempt.

use serde::{Deserialize, Serialize};

use crate::state::CheckoutState;

/// Tracks a checkout attempt's state, completed unit-of-work steps, and
/// failure reason.
///
/// The engine compensates completed steps in reverse order when a later
/// step fails. The attempt is a request-scoped record returned with the
/// placed order, not a persisted saga.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutAttempt {
    state: CheckoutState,
    completed_steps: Vec<String>,
    failure_reason: Option<String>,
}

impl CheckoutAttempt {
    /// Creates a fresh attempt in the `Started` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    pub fn state(&self) -> CheckoutState {
        self.state
    }

    /// Returns the completed unit-of-work steps, in execution order.
    pub fn completed_steps(&self) -> &[String] {
        &self.completed_steps
    }

    /// Returns the failure reason, if the attempt failed.
    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    /// Advances to the next state. Terminal states are sticky.
    pub fn advance(&mut self, state: CheckoutState) {
        if !self.state.is_terminal() {
            self.state = state;
        }
    }

    /// Records a completed unit-of-work step.
    pub fn record_step(&mut self, step: &str) {
        self.completed_steps.push(step.to_string());
    }

    /// Marks the attempt failed with a reason.
    pub fn fail(&mut self, reason: impl Into<String>) {
        if self.state.can_fail() {
            self.state = CheckoutState::Failed;
            self.failure_reason = Some(reason.into());
        }
    }
}
