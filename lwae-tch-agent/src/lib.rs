//! Frozen agent and latent autoencoder implemented with [tch](https://crates.io/crates/tch).
pub mod agent;
pub mod explorer;
pub mod mmd;
pub mod model;
pub mod opt;
pub mod util;
pub mod wae;
