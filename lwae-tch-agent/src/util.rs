//! Utilities.
use lwae_core::{
    error::LwaeError,
    record::{Record, RecordValue},
};
use ndarray::ArrayD;
use num_traits::cast::AsPrimitive;
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, str::FromStr};
use tch::{nn::VarStore, Tensor};

/// Interface for handling output dimensions.
pub trait OutDim {
    /// Returns the output dimension.
    fn get_out_dim(&self) -> i64;

    /// Sets the output dimension.
    fn set_out_dim(&mut self, v: i64);
}

/// Kernel statistic forms of the distribution-matching penalty.
///
/// See [`crate::mmd`] for the difference between the two.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Copy)]
pub enum KernelForm {
    /// Pairwise terms built from raw coordinate sums; the default, since
    /// existing checkpoints were trained under it.
    Legacy,

    /// True pairwise squared distances.
    Corrected,
}

impl FromStr for KernelForm {
    type Err = LwaeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "legacy" => Ok(Self::Legacy),
            "corrected" => Ok(Self::Corrected),
            _ => Err(LwaeError::UnknownKernelForm(s.into())),
        }
    }
}

/// Returns the mean and standard deviation of the parameters.
pub fn param_stats(var_store: &VarStore) -> Record {
    let mut record = Record::empty();

    for (k, v) in var_store.variables() {
        let m = f32::try_from(v.mean(tch::Kind::Float)).expect("Failed to convert Tensor to f32");
        let k_mean = format!("{}_mean", &k);
        record.insert(k_mean, RecordValue::Scalar(m));

        let m = f32::try_from(v.std(false)).expect("Failed to convert Tensor to f32");
        let k_std = format!("{}_std", k);
        record.insert(k_std, RecordValue::Scalar(m));
    }

    record
}

/// Converts [`ndarray::ArrayD`] to [`Tensor`].
pub fn arrayd_to_tensor<T1, T2>(a: ArrayD<T1>, add_batch_dim: bool) -> Tensor
where
    T1: AsPrimitive<T2>,
    T2: Copy + 'static + tch::kind::Element,
{
    let v = a.iter().map(|e| e.as_()).collect::<Vec<_>>();
    let t: Tensor = TryFrom::<Vec<T2>>::try_from(v).unwrap();

    match add_batch_dim {
        true => t.unsqueeze(0),
        false => t,
    }
}
