//! The frozen pretrained agent.
//!
//! The agent is used only through its read-only inference surface: the
//! latent batch it produces for a stacked observation and the action
//! distribution of its policy head. Its parameters are loaded once from a
//! checkpoint and never updated.
mod base;
mod config;

pub use base::{AgentModel, LatentAgent};
pub use config::AgentModelConfig;
