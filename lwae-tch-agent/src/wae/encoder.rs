use super::normalize;
use crate::{model::SubModel, util::OutDim};
use serde::{Deserialize, Serialize};
use tch::{nn, nn::ModuleT, Device, Tensor};

/// Configuration of [`Encoder`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EncoderConfig {
    pub(super) in_dim: i64,
    pub(super) units: Vec<i64>,
    pub(super) out_dim: i64,
}

impl EncoderConfig {
    /// Constructs a configuration.
    pub fn new(in_dim: i64, units: Vec<i64>, out_dim: i64) -> Self {
        Self {
            in_dim,
            units,
            out_dim,
        }
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            in_dim: 32,
            units: vec![32, 32],
            out_dim: 16,
        }
    }
}

impl OutDim for EncoderConfig {
    fn get_out_dim(&self) -> i64 {
        self.out_dim
    }

    fn set_out_dim(&mut self, out_dim: i64) {
        self.out_dim = out_dim;
    }
}

/// Maps the agent's latent vector to an L2-normalized code.
///
/// Hidden layers are linear, batch-normalized and leaky-ReLU activated;
/// the output layer is linear and its rows are normalized onto the unit
/// sphere.
pub struct Encoder {
    device: Device,
    seq: nn::SequentialT,
}

impl Encoder {
    fn create_net(var_store: &nn::VarStore, config: &EncoderConfig) -> nn::SequentialT {
        let p = &(var_store.root() / "encoder");
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

impl SubModel for Encoder {
    type Config = EncoderConfig;
    type Input = Tensor;
    type Output = Tensor;

    fn forward(&self, x: &Self::Input, train: bool) -> Tensor {
        normalize(&self.seq.forward_t(&x.to(self.device), train))
    }

    fn build(var_store: &nn::VarStore, config: Self::Config) -> Self {
        let device = var_store.device();
        let seq = Self::create_net(var_store, &config);

        Self { device, seq }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;
    use tch::{nn::VarStore, Kind};

    #[test]
    fn test_encoder_output_is_normalized() {
        tch::manual_seed(42);
        let vs = VarStore::new(Device::Cpu);
        let encoder = Encoder::build(&vs, EncoderConfig::default());

        let x = Tensor::randn(&[8, 32], (Kind::Float, Device::Cpu));
        let z = encoder.forward(&x, true);
        assert_eq!(z.size(), vec![8, 16]);

        let norms = (&z * &z)
            .sum_dim_intlist(&[1i64][..], false, Kind::Float)
            .sqrt();
        for norm in Vec::<f32>::try_from(&norms).unwrap() {
            assert!((norm - 1.0).abs() < 1e-3);
        }
    }
}
