use super::{Decoder, Encoder, WaeModelConfig};
use crate::{
    mmd::mmd_normal_penalty,
    model::SubModel,
    opt::Optimizer,
    util::KernelForm,
};
use anyhow::Result;
use log::{info, trace};
use lwae_core::{
    record::{Record, RecordValue::Scalar},
    LatentModel,
};
use std::{convert::TryFrom, fs, path::Path};
use tch::{nn, Device, Reduction, Tensor};

/// Stabilizing offset applied to both sides of the reconstruction error.
const TINY: f64 = 1e-15;

/// Mean squared error between the reconstruction and the agent latent.
///
/// Both sides are offset by a small constant against exact-zero values; at
/// f32 precision the offset does not bias the loss.
pub fn reconstruction_loss(z_a_hat: &Tensor, z_a: &Tensor) -> Tensor {
    (z_a_hat + TINY).mse_loss(&(z_a + TINY), Reduction::Mean)
}

/// The autoencoder pair with its optimizers.
///
/// Encoder and decoder each own a variable store and an Adam optimizer.
/// One optimization step backpropagates the combined loss (reconstruction
/// plus weighted distribution-matching penalty) through both networks and
/// zeroes both gradient buffers afterwards.
pub struct WaeModel {
    device: Device,
    q_vs: nn::VarStore,
    p_vs: nn::VarStore,
    q: Encoder,
    p: Decoder,
    opt_q: Optimizer,
    opt_p: Optimizer,
    mmd_weight: f64,
    sigma: f64,
    kernel_form: KernelForm,
    train: bool,
}

impl WaeModel {
    /// Builds the model on the given device.
    pub fn build(config: WaeModelConfig, device: Device) -> Result<Self> {
        let q_vs = nn::VarStore::new(device);
        let q = Encoder::build(&q_vs, config.encoder_config);
        let opt_q = config.opt_config.build(&q_vs)?;

        let p_vs = nn::VarStore::new(device);
        let p = Decoder::build(&p_vs, config.decoder_config);
        let opt_p = config.opt_config.build(&p_vs)?;

        Ok(Self {
            device,
            q_vs,
            p_vs,
            q,
            p,
            opt_q,
            opt_p,
            mmd_weight: config.mmd_weight,
            sigma: config.sigma,
            kernel_form: config.kernel_form,
            train: true,
        })
    }

    /// Encodes an agent latent batch.
    pub fn encode(&self, z_a: &Tensor) -> Tensor {
        self.q.forward(z_a, self.train)
    }

    /// Decodes a normalized code batch.
    pub fn decode(&self, z: &Tensor) -> Tensor {
        self.p.forward(z, self.train)
    }

    /// Returns the variable store of the encoder.
    pub fn encoder_var_store(&self) -> &nn::VarStore {
        &self.q_vs
    }

    /// Returns the variable store of the decoder.
    pub fn decoder_var_store(&self) -> &nn::VarStore {
        &self.p_vs
    }

    /// Returns the mean and standard deviation of the parameters.
    pub fn param_stats(&self) -> Record {
        crate::util::param_stats(&self.q_vs).merge(crate::util::param_stats(&self.p_vs))
    }

    fn opt_step_(&mut self, z_a: &Tensor) -> Record {
        let z_a = z_a.to(self.device);

        let z = self.q.forward(&z_a, self.train);
        let z_a_hat = self.p.forward(&z, self.train);
        let recon_loss = reconstruction_loss(&z_a_hat, &z_a);

        // The penalty term takes its own encoder pass; batch norm sees the
        // batch once per loss term.
        let z = self.q.forward(&z_a, self.train);
        let mmd_loss = self.mmd_weight * mmd_normal_penalty(&z, self.sigma, self.kernel_form);

        let loss = &recon_loss + &mmd_loss;
        loss.backward();
        self.opt_p.step();
        self.opt_q.step();
        self.opt_q.zero_grad();
        self.opt_p.zero_grad();

        let recon_loss =
            f32::try_from(recon_loss).expect("Failed to convert Tensor to f32");
        let mmd_loss = f32::try_from(mmd_loss).expect("Failed to convert Tensor to f32");
        trace!("WAE opt step, recon: {}, mmd: {}", recon_loss, mmd_loss);

        Record::from_slice(&[
            ("loss_recon", Scalar(recon_loss)),
            ("loss_mmd", Scalar(mmd_loss)),
        ])
    }
}

impl LatentModel<Tensor> for WaeModel {
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn opt_step(&mut self, latent: &Tensor) -> Record {
        self.opt_step_(latent)
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        self.q_vs.save(path.join("Q").as_path())?;
        self.p_vs.save(path.join("P").as_path())?;
        info!("Save WAE model to {:?}", path);
        Ok(())
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        self.q_vs.load(path.join("Q").as_path())?;
        self.p_vs.load(path.join("P").as_path())?;
        info!("Load WAE model from {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tch::Kind;
    use tempdir::TempDir;

    fn model() -> WaeModel {
        WaeModel::build(WaeModelConfig::default().z_dim(8), Device::Cpu).unwrap()
    }

    fn flatten_params(vs: &nn::VarStore) -> Vec<f32> {
        let vars = vs.variables();
        let mut names = vars.keys().cloned().collect::<Vec<_>>();
        names.sort();
        names
            .iter()
            .flat_map(|k| Vec::<f32>::try_from(&vars[k].flatten(0, -1)).unwrap())
            .collect()
    }

    #[test]
    fn test_identity_round_trip_loss_is_zero() {
        tch::manual_seed(42);
        let z_a = Tensor::randn(&[8, 32], (Kind::Float, Device::Cpu));
        let loss = f32::try_from(reconstruction_loss(&z_a.copy(), &z_a)).unwrap();
        assert!(loss.abs() < 1e-10);
    }

    #[test]
    fn test_opt_step_updates_parameters() {
        tch::manual_seed(42);
        let mut model = model();
        let z_a = Tensor::randn(&[16, 32], (Kind::Float, Device::Cpu));

        let q_before = flatten_params(&model.q_vs);
        let p_before = flatten_params(&model.p_vs);

        let record = model.opt_step(&z_a);
        assert!(record.get_scalar("loss_recon").unwrap().is_finite());
        assert!(record.get_scalar("loss_mmd").unwrap().is_finite());

        assert_ne!(q_before, flatten_params(&model.q_vs));
        assert_ne!(p_before, flatten_params(&model.p_vs));
    }

    #[test]
    fn test_save_load_round_trip() -> Result<()> {
        tch::manual_seed(42);
        let model = model();
        let dir = TempDir::new("wae_model")?;
        model.save_params(dir.path())?;

        assert!(dir.path().join("Q").exists());
        assert!(dir.path().join("P").exists());

        let mut restored = model();
        restored.load_params(dir.path())?;

        for (vs, vs_) in [
            (&model.q_vs, &restored.q_vs),
            (&model.p_vs, &restored.p_vs),
        ] {
            let vars = vs.variables();
            let vars_ = vs_.variables();
            assert_eq!(vars.len(), vars_.len());
            for (name, v) in vars.iter() {
                assert_eq!(v.size(), vars_[name].size());
            }
        }
        assert_eq!(flatten_params(&model.q_vs), flatten_params(&restored.q_vs));
        Ok(())
    }
}
