//! The autoencoder pair trained on the frozen agent's latent codes.
//!
//! [`Encoder`] maps the agent's latent vector down to a lower-dimensional,
//! L2-normalized code; [`Decoder`] maps it back up. [`WaeModel`] owns both
//! networks together with their optimizers and performs the joint
//! optimization step (reconstruction plus distribution-matching penalty).
mod base;
mod config;
mod decoder;
mod encoder;

pub use base::{reconstruction_loss, WaeModel};
pub use config::WaeModelConfig;
pub use decoder::{Decoder, DecoderConfig};
pub use encoder::{Encoder, EncoderConfig};
use tch::{Kind, Tensor};

/// Stabilizing offset added to the L2 norm before division.
pub const NORM_EPS: f64 = 1e-4;

/// Projects each row onto the unit sphere.
///
/// The epsilon keeps a zero row finite; its output norm approaches but does
/// not reach 1.
pub fn normalize(x: &Tensor) -> Tensor {
    let norm = (x * x)
        .sum_dim_intlist(&[1i64][..], true, Kind::Float)
        .sqrt();
    x / (norm + NORM_EPS)
}

#[cfg(test)]
mod tests {
    use super::normalize;
    use std::convert::TryFrom;
    use tch::{Device, Kind, Tensor};

    fn row_norms(x: &Tensor) -> Vec<f32> {
        let n = (x * x)
            .sum_dim_intlist(&[1i64][..], false, Kind::Float)
            .sqrt();
        Vec::<f32>::try_from(&n).unwrap()
    }

    #[test]
    fn test_normalize_gives_unit_rows() {
        tch::manual_seed(42);
        let x = Tensor::randn(&[16, 8], (Kind::Float, Device::Cpu)) * 10.0;

        for norm in row_norms(&normalize(&x)) {
            assert!((norm - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_normalize_zero_input_is_finite() {
        let x = Tensor::zeros(&[4, 8], (Kind::Float, Device::Cpu));
        let y = normalize(&x);

        let values = Vec::<f32>::try_from(&y.flatten(0, -1)).unwrap();
        assert!(values.iter().all(|v| v.is_finite()));

        for norm in row_norms(&y) {
            assert!(norm < 1.0);
        }
    }
}
