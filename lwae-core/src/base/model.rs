//! Frozen-policy inference and trainable latent models.
use super::{Env, Policy};
use crate::record::Record;
use anyhow::Result;
use std::path::Path;

/// Read-only inference over a frozen policy.
///
/// Implementations expose the policy's internal representation without
/// exposing any way to update its parameters. The latent batch is detached:
/// no gradient flows back into the policy.
pub trait LatentPolicy<E: Env>: Policy<E> {
    /// The latent representation, one row per environment instance.
    type Latent;

    /// Computes the latent batch for an observation batch.
    fn latent(&self, obs: &E::Obs) -> Self::Latent;
}

/// A trainable model over latent batches.
///
/// This is the counterpart of [`LatentPolicy`]: it is the only interface in
/// the training loop through which parameters change.
pub trait LatentModel<T> {
    /// Set the model to training mode.
    fn train(&mut self);

    /// Set the model to evaluation mode.
    fn eval(&mut self);

    /// Return if it is in training mode.
    fn is_train(&self) -> bool;

    /// Performs an optimization step on a latent batch and returns
    /// loss values for recording.
    fn opt_step(&mut self, latent: &T) -> Record;

    /// Save the parameters of the model in the given directory.
    fn save_params(&self, path: &Path) -> Result<()>;

    /// Load the parameters of the model from the given directory.
    fn load_params(&mut self, path: &Path) -> Result<()>;
}
