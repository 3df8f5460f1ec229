//! Configuration of [`WaeModel`](super::WaeModel).
use super::{DecoderConfig, EncoderConfig};
use crate::{
    opt::OptimizerConfig,
    util::{KernelForm, OutDim},
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`WaeModel`](super::WaeModel).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct WaeModelConfig {
    /// Configuration of the encoder.
    pub encoder_config: EncoderConfig,

    /// Configuration of the decoder.
    pub decoder_config: DecoderConfig,

    /// Configuration of the optimizers of both networks.
    pub opt_config: OptimizerConfig,

    /// Weight of the distribution-matching penalty.
    pub mmd_weight: f64,

    /// Standard deviation of the normal reference sample.
    pub sigma: f64,

    /// Form of the kernel statistic.
    pub kernel_form: KernelForm,
}

impl Default for WaeModelConfig {
    fn default() -> Self {
        Self {
            encoder_config: EncoderConfig::default(),
            decoder_config: DecoderConfig::default(),
            opt_config: OptimizerConfig::Adam { lr: 1e-4 },
            mmd_weight: 32.0,
            sigma: 1.0,
            kernel_form: KernelForm::Legacy,
        }
    }
}

impl WaeModelConfig {
    /// Sets the dimension of the normalized code on both networks.
    pub fn z_dim(mut self, v: i64) -> Self {
        self.encoder_config.set_out_dim(v);
        self.decoder_config.in_dim = v;
        self
    }

    /// Sets the dimension of the agent latent vector on both networks.
    pub fn agent_latent_dim(mut self, v: i64) -> Self {
        self.encoder_config.in_dim = v;
        self.decoder_config.out_dim = v;
        self
    }

    /// Sets the learning rate of both optimizers.
    pub fn learning_rate(mut self, lr: f64) -> Self {
        self.opt_config = OptimizerConfig::Adam { lr };
        self
    }

    /// Sets the form of the kernel statistic.
    pub fn kernel_form(mut self, v: KernelForm) -> Self {
        self.kernel_form = v;
        self
    }

    /// Constructs [`WaeModelConfig`] from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`WaeModelConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_wae_model_config() -> Result<()> {
        let config = WaeModelConfig::default()
            .z_dim(8)
            .learning_rate(1e-3)
            .kernel_form(KernelForm::Corrected);

        let dir = TempDir::new("wae_model_config")?;
        let path = dir.path().join("wae.yaml");

        config.save(&path)?;
        let config_ = WaeModelConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }
}
