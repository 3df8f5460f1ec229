//! Definition of interfaces of neural networks.
use tch::nn::VarStore;

/// Neural network module that can be initialized with [`VarStore`] and configuration.
///
/// Modules consisting a neural network should share a [`VarStore`].
/// Structs implementing this trait are initialized with a given [`VarStore`].
/// `forward` takes a `train` flag because modules may contain batch
/// normalization layers, which behave differently in training and evaluation.
///
/// [`VarStore`]: https://docs.rs/tch/0.16.0/tch/nn/struct.VarStore.html
pub trait SubModel {
    /// Configuration from which [`SubModel`] is constructed.
    type Config;

    /// Input of the [`SubModel`].
    type Input;

    /// Output of the [`SubModel`].
    type Output;

    /// Builds [`SubModel`] with [`VarStore`] and [`SubModel::Config`].
    fn build(var_store: &VarStore, config: Self::Config) -> Self;

    /// A generalized forward function.
    fn forward(&self, input: &Self::Input, train: bool) -> Self::Output;
}
