//! Train a [`LatentModel`] on the latent codes of a frozen policy.
mod config;

use crate::{
    record::{RecordValue::Scalar, Recorder},
    Env, LatentModel, LatentPolicy,
};
use anyhow::Result;
pub use config::TrainerConfig;
use log::info;
use std::path::Path;

/// Manages the online training loop.
///
/// Every step performs, in order:
///
/// 1. query the frozen policy for the latent batch of the current stacked
///    observation (no gradient),
/// 2. one optimization step of the latent model on that batch,
/// 3. sample an action batch from the policy (epsilon-greedy),
/// 4. advance all environment instances in lockstep.
///
/// An epoch is `frames_per_epoch / n_procs` steps. After each epoch the
/// model parameters are written into the model directory; there is no
/// versioning, a later epoch overwrites the previous files.
pub struct Trainer<E>
where
    E: Env,
{
    /// Configuration of the environment for training.
    env_config: E::Config,

    /// Where to save the trained model.
    model_dir: Option<String>,

    /// Simulated frames per epoch over all instances.
    frames_per_epoch: usize,

    /// The number of epochs.
    epochs: usize,

    /// Interval of recording losses in steps.
    record_interval: usize,

    /// Interval of reporting progress in steps.
    progress_interval: usize,
}

impl<E> Trainer<E>
where
    E: Env,
{
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig, env_config: E::Config) -> Self {
        Self {
            env_config,
            model_dir: config.model_dir,
            frames_per_epoch: config.frames_per_epoch,
            epochs: config.epochs,
            record_interval: config.record_interval,
            progress_interval: config.progress_interval,
        }
    }

    fn save_model<T, M: LatentModel<T>>(model: &M, model_dir: &str) {
        match model.save_params(Path::new(model_dir)) {
            Ok(()) => info!("Saved the model in {:?}.", model_dir),
            Err(_) => info!("Failed to save model in {:?}.", model_dir),
        }
    }

    /// Runs one epoch and returns the number of frames simulated in it.
    fn train_epoch<P, M>(
        &mut self,
        env: &mut E,
        policy: &mut P,
        model: &mut M,
        recorder: &mut dyn Recorder,
        epoch: usize,
    ) -> Result<usize>
    where
        P: LatentPolicy<E>,
        M: LatentModel<P::Latent>,
    {
        let mut obs = env.reset()?;
        let n_procs = env.n_procs();
        let steps = self.frames_per_epoch / n_procs;
        let total_frames = self.epochs * self.frames_per_epoch;

        for i in 0..steps {
            let z_a = policy.latent(&obs);
            let mut record = model.opt_step(&z_a);

            let act = policy.sample(&obs);
            let (step, _) = env.step(&act);
            obs = step.obs;

            if i % self.record_interval == 0 {
                info!(
                    "recon: {:.4}, mmd: {:.8}",
                    record.get_scalar("loss_recon")?,
                    record.get_scalar("loss_mmd")?,
                );
                record.insert("epoch", Scalar(epoch as f32));
                recorder.write(record);
            }

            if i % self.progress_interval == 0 {
                let frames = i * n_procs + epoch * self.frames_per_epoch;
                info!(
                    "{} frames processed, {:.2}% complete",
                    frames,
                    100.0 * frames as f32 / total_frames as f32,
                );
            }
        }

        Ok(steps * n_procs)
    }

    /// Train the model.
    pub fn train<P, M>(
        &mut self,
        policy: &mut P,
        model: &mut M,
        recorder: &mut dyn Recorder,
    ) -> Result<()>
    where
        P: LatentPolicy<E>,
        M: LatentModel<P::Latent>,
    {
        let mut env = E::build(&self.env_config, 0)?;
        model.train();

        for epoch in 0..self.epochs {
            self.train_epoch(&mut env, policy, model, recorder, epoch)?;

            if let Some(model_dir) = self.model_dir.clone() {
                Self::save_model::<P::Latent, _>(model, &model_dir);
            }
        }

        Ok(())
    }
}
