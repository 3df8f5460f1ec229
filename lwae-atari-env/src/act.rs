//! Action for [`AtariVecEnv`](crate::AtariVecEnv).
use lwae_core::Act;
use std::convert::TryFrom;
use tch::Tensor;

/// A batch of discrete actions, one per environment instance.
#[derive(Debug, Clone)]
pub struct VecAct {
    pub act: Vec<i64>,
}

impl VecAct {
    pub fn new(act: Vec<i64>) -> Self {
        Self { act }
    }
}

impl Act for VecAct {
    fn len(&self) -> usize {
        self.act.len()
    }
}

impl From<Vec<i64>> for VecAct {
    fn from(act: Vec<i64>) -> Self {
        Self { act }
    }
}

impl From<Tensor> for VecAct {
    fn from(t: Tensor) -> Self {
        let act = Vec::<i64>::try_from(&t.flatten(0, -1))
            .expect("Failed to convert from Tensor to Vec");
        Self { act }
    }
}
