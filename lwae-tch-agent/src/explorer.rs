//! Exploration strategy over the frozen agent's action distribution.
use serde::{Deserialize, Serialize};
use tch::Tensor;

/// Epsilon-greedy explorer with a fixed epsilon.
///
/// One uniform draw decides for the whole batch: with probability `eps`
/// every instance takes a uniformly random action, otherwise every instance
/// takes the arg-max of its action distribution. Arg-max ties break to the
/// first index.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpsilonGreedy {
    pub eps: f64,
}

impl EpsilonGreedy {
    /// Constructs an epsilon-greedy explorer.
    pub fn new(eps: f64) -> Self {
        Self { eps }
    }

    /// Takes an action batch based on the action probabilities.
    ///
    /// `p` has shape `(n_procs, n_actions)`; the returned tensor holds one
    /// action index per instance.
    pub fn action(&mut self, p: &Tensor) -> Tensor {
        let is_random = fastrand::f64() < self.eps;

        if is_random {
            let n_procs = p.size()[0] as u32;
            let n_actions = p.size()[1] as u32;
            Tensor::from_slice(
                (0..n_procs)
                    .map(|_| fastrand::u32(..n_actions) as i64)
                    .collect::<Vec<_>>()
                    .as_slice(),
            )
        } else {
            p.argmax(-1, false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;
    use tch::{Device, Kind};

    #[test]
    fn test_greedy_takes_argmax() {
        let mut explorer = EpsilonGreedy::new(0.0);
        let p = Tensor::from_slice(&[0.1f32, 0.2, 0.6, 0.1, 0.7, 0.1, 0.1, 0.1])
            .reshape(&[2, 4]);

        for _ in 0..10 {
            let act = Vec::<i64>::try_from(&explorer.action(&p)).unwrap();
            assert_eq!(act, vec![2, 0]);
        }
    }

    #[test]
    fn test_greedy_ties_break_to_first_index() {
        let mut explorer = EpsilonGreedy::new(0.0);
        let p = Tensor::from_slice(&[0.1f32, 0.4, 0.4, 0.1]).reshape(&[1, 4]);

        let act = Vec::<i64>::try_from(&explorer.action(&p)).unwrap();
        assert_eq!(act, vec![1]);
    }

    #[test]
    fn test_random_actions_are_uniform() {
        fastrand::seed(42);
        let mut explorer = EpsilonGreedy::new(1.0);
        let p = Tensor::zeros(&[4, 4], (Kind::Float, Device::Cpu));

        let mut counts = [0usize; 4];
        for _ in 0..1000 {
            for a in Vec::<i64>::try_from(&explorer.action(&p)).unwrap() {
                counts[a as usize] += 1;
            }
        }

        // 4000 samples over 4 actions; each bucket should be near 1000.
        for &count in counts.iter() {
            assert!(count > 700 && count < 1300, "counts: {:?}", counts);
        }
    }
}
