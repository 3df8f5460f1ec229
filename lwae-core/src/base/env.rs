//! Environment.
use super::{Act, Info, Obs, Step};
use crate::record::Record;
use anyhow::Result;

/// Represents a vectorized environment: `n_procs` simulation instances
/// advancing in lockstep within one synchronous call.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Observation of the environment.
    type Obs: Obs;

    /// Action of the environment.
    type Act: Act;

    /// Information in the [`Step`] object.
    type Info: Info;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Resets all instances and returns the initial observation batch.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Performs an environment step on all instances.
    ///
    /// Instances reporting episode termination are reset in place before the
    /// next observation batch is assembled, so the returned observation never
    /// mixes frames across episode boundaries.
    fn step(&mut self, a: &Self::Act) -> (Step<Self>, Record)
    where
        Self: Sized;

    /// Returns the number of valid actions.
    fn n_actions(&self) -> i64;

    /// Returns the number of environment instances.
    fn n_procs(&self) -> usize;
}
