//! Policy.
use super::Env;

/// A policy on an environment.
///
/// Policy is a mapping from an observation batch to an action batch.
/// The mapping can be either of deterministic or stochastic.
pub trait Policy<E: Env> {
    /// Sample an action batch given an observation batch.
    fn sample(&mut self, obs: &E::Obs) -> E::Act;
}
