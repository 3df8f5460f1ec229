//! Observation of [`AtariVecEnv`](crate::AtariVecEnv).
use lwae_core::Obs;
use lwae_tch_agent::util::arrayd_to_tensor;
use ndarray::{ArrayD, IxDyn};
use tch::Tensor;

use crate::{FRAME_SIZE, N_STACK};

/// A batch of stacked observations, shape `(n_procs, 4, 80, 80)`.
///
/// Values are grayscale intensities in `[0, 1]`, frames ordered oldest
/// first along the stack dimension.
#[derive(Debug, Clone)]
pub struct StackedObs {
    frames: ArrayD<f32>,
}

impl StackedObs {
    /// Wraps a flat buffer of `n_procs * 4 * 80 * 80` values.
    pub fn from_flat(buf: Vec<f32>, n_procs: usize) -> Self {
        let shape = IxDyn(&[n_procs, N_STACK, FRAME_SIZE, FRAME_SIZE]);
        Self {
            frames: ArrayD::from_shape_vec(shape, buf).expect("Obs buffer size mismatch"),
        }
    }

    /// Returns the underlying array.
    pub fn as_array(&self) -> &ArrayD<f32> {
        &self.frames
    }
}

impl Obs for StackedObs {
    fn dummy(n: usize) -> Self {
        Self {
            frames: ArrayD::zeros(IxDyn(&[n, N_STACK, FRAME_SIZE, FRAME_SIZE])),
        }
    }

    fn len(&self) -> usize {
        self.frames.shape()[0]
    }
}

impl From<StackedObs> for Tensor {
    fn from(obs: StackedObs) -> Tensor {
        let shape = obs
            .frames
            .shape()
            .iter()
            .map(|&x| x as i64)
            .collect::<Vec<_>>();
        arrayd_to_tensor::<_, f32>(obs.frames, false).reshape(shape.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obs_shape_and_conversion() {
        let n = N_STACK * FRAME_SIZE * FRAME_SIZE;
        let obs = StackedObs::from_flat(vec![0.5; 2 * n], 2);
        assert_eq!(obs.len(), 2);

        let t: Tensor = obs.into();
        assert_eq!(
            t.size(),
            vec![2, N_STACK as i64, FRAME_SIZE as i64, FRAME_SIZE as i64]
        );
    }
}
