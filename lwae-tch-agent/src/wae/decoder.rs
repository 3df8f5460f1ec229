use crate::{model::SubModel, util::OutDim};
use serde::{Deserialize, Serialize};
use tch::{nn, nn::ModuleT, Device, Tensor};

/// Configuration of [`Decoder`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct DecoderConfig {
    pub(super) in_dim: i64,
    pub(super) units: Vec<i64>,
    pub(super) out_dim: i64,
}

impl DecoderConfig {
    /// Constructs a configuration.
    pub fn new(in_dim: i64, units: Vec<i64>, out_dim: i64) -> Self {
        Self {
            in_dim,
            units,
            out_dim,
        }
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            in_dim: 16,
            units: vec![32, 32],
            out_dim: 32,
        }
    }
}

impl OutDim for DecoderConfig {
    fn get_out_dim(&self) -> i64 {
        self.out_dim
    }

    fn set_out_dim(&mut self, out_dim: i64) {
        self.out_dim = out_dim;
    }
}

/// Reconstructs the agent's latent vector from the normalized code.
pub struct Decoder {
    device: Device,
    seq: nn::SequentialT,
}

impl Decoder {
    fn create_net(var_store: &nn::VarStore, config: &DecoderConfig) -> nn::SequentialT {
        let p = &(var_store.root() / "decoder");
        let mut seq = nn::seq_t();
        let mut in_dim = config.in_dim;

        for (i, &out_dim) in config.units.iter().enumerate() {
            seq = seq
                .add(nn::linear(
                    p / format!("l{}", i),
                    in_dim,
                    out_dim,
                    Default::default(),
                ))
                .add(nn::batch_norm1d(
                    p / format!("bn{}", i),
                    out_dim,
                    Default::default(),
                ))
                .add_fn(|x| x.leaky_relu());
            in_dim = out_dim;
        }

        seq.add(nn::linear(
            p / format!("l{}", config.units.len()),
            in_dim,
            config.out_dim,
            Default::default(),
        ))
    }
}

impl SubModel for Decoder {
    type Config = DecoderConfig;
    type Input = Tensor;
    type Output = Tensor;

    fn forward(&self, x: &Self::Input, train: bool) -> Tensor {
        self.seq.forward_t(&x.to(self.device), train)
    }

    fn build(var_store: &nn::VarStore, config: Self::Config) -> Self {
        let device = var_store.device();
        let seq = Self::create_net(var_store, &config);

        Self { device, seq }
    }
}
