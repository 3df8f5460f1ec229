#![warn(missing_docs)]
//! Core abstractions for training an autoencoder on a frozen agent's latent space.
pub mod error;
pub mod record;

mod base;
pub use base::{Act, Env, Info, LatentModel, LatentPolicy, Obs, Policy, Step};

mod trainer;
pub use trainer::{Trainer, TrainerConfig};
