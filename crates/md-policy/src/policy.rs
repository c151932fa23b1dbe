//! The `Policy` trait: the dispatch extension point.

use crate::{Action, Observation};

/// Maps an observation to an action.
///
/// Called once per step by the episode driver.  The observation is borrowed
/// read-only; a policy may keep its own state between calls.
///
/// # Example
///
/// ```rust,ignore
/// struct Idle;
///
/// impl Policy for Idle {
///     fn act(&mut self, _obs: &Observation) -> Action {
///         Action::default()
///     }
/// }
/// ```
pub trait Policy {
    fn act(&mut self, obs: &Observation) -> Action;

    /// Label used in logs and output rows.
    fn name(&self) -> &str {
        "policy"
    }
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn act(&mut self, obs: &Observation) -> Action {
        (**self).act(obs)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
