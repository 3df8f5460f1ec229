//! Configuration of the frozen agent.
use crate::util::OutDim;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`AgentModel`](super::AgentModel).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct AgentModelConfig {
    /// The number of stacked frames in an observation.
    pub n_stack: i64,

    /// Dimension of the latent vector.
    pub latent_dim: i64,

    /// The number of actions, i.e. the output dimension of the policy head.
    pub n_actions: i64,
}

impl Default for AgentModelConfig {
    fn default() -> Self {
        Self {
            n_stack: 4,
            latent_dim: 32,
            n_actions: 0,
        }
    }
}

impl AgentModelConfig {
    /// Sets the dimension of the latent vector.
    pub fn latent_dim(mut self, v: i64) -> Self {
        self.latent_dim = v;
        self
    }

    /// Sets the number of actions.
    pub fn n_actions(mut self, v: i64) -> Self {
        self.n_actions = v;
        self
    }

    /// Constructs [`AgentModelConfig`] from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`AgentModelConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

impl OutDim for AgentModelConfig {
    fn get_out_dim(&self) -> i64 {
        self.n_actions
    }

    fn set_out_dim(&mut self, out_dim: i64) {
        self.n_actions = out_dim;
    }
}
