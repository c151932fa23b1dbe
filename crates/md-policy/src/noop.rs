//! A policy that never dispatches.

use crate::{Action, Observation, Policy};

/// A [`Policy`] that always returns an empty action.
///
/// Orders pile up unassigned, so a day run with it never finishes once a
/// customer has ordered.  Useful for stepping the clock in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPolicy;

impl Policy for NoopPolicy {
    fn act(&mut self, _obs: &Observation) -> Action {
        Action::default()
    }

    fn name(&self) -> &str {
        "noop"
    }
}
