//! Drives the full training loop against a mock environment.
use anyhow::Result;
use lwae_atari_env::{NullInfo, StackedObs, VecAct};
use lwae_core::{
    record::{BufferedRecorder, Record},
    Env, LatentModel, LatentPolicy, Obs, Policy, Step, Trainer, TrainerConfig,
};
use lwae_tch_agent::{
    agent::{AgentModelConfig, LatentAgent},
    wae::{WaeModel, WaeModelConfig},
};
use std::convert::TryFrom;
use tch::Device;
use tempdir::TempDir;

/// An environment that never terminates and always observes zero frames.
struct MockEnv {
    batch_size: usize,
    n_actions: i64,
}

#[derive(Clone)]
struct MockEnvConfig {
    batch_size: usize,
    n_actions: i64,
}

impl Env for MockEnv {
    type Config = MockEnvConfig;
    type Obs = StackedObs;
    type Act = VecAct;
    type Info = NullInfo;

    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self {
            batch_size: config.batch_size,
            n_actions: config.n_actions,
        })
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        Ok(StackedObs::dummy(self.batch_size))
    }

    fn step(&mut self, a: &Self::Act) -> (Step<Self>, Record) {
        let step = Step::new(
            StackedObs::dummy(self.batch_size),
            a.clone(),
            vec![0.0; self.batch_size],
            vec![0; self.batch_size],
            NullInfo,
        );
        (step, Record::empty())
    }

    fn n_actions(&self) -> i64 {
        self.n_actions
    }

    fn n_procs(&self) -> usize {
        self.batch_size
    }
}

fn env_config() -> MockEnvConfig {
    MockEnvConfig {
        batch_size: 2,
        n_actions: 4,
    }
}

fn agent() -> LatentAgent<MockEnv> {
    LatentAgent::build(
        AgentModelConfig::default().n_actions(4),
        0.2,
        Device::Cpu,
    )
}

fn model() -> Result<WaeModel> {
    WaeModel::build(WaeModelConfig::default().z_dim(8), Device::Cpu)
}

fn encoder_params(model: &WaeModel) -> Vec<f32> {
    let vars = model.encoder_var_store().variables();
    let mut names = vars.keys().cloned().collect::<Vec<_>>();
    names.sort();
    names
        .iter()
        .flat_map(|k| Vec::<f32>::try_from(&vars[k].flatten(0, -1)).unwrap())
        .collect()
}

#[test]
fn test_parameters_change_between_steps() -> Result<()> {
    tch::manual_seed(42);
    let mut env = MockEnv::build(&env_config(), 0)?;
    let mut agent = agent();
    let mut model = model()?;

    let obs = env.reset()?;
    let z_a = agent.latent(&obs);
    assert_eq!(z_a.size(), vec![2, 32]);
    model.opt_step(&z_a);
    let after_first = encoder_params(&model);

    let act = agent.sample(&obs);
    let (step, _) = env.step(&act);
    let z_a = agent.latent(&step.obs);
    model.opt_step(&z_a);
    let after_second = encoder_params(&model);

    assert_ne!(after_first, after_second);
    Ok(())
}

#[test]
fn test_epoch_checkpoint_round_trip() -> Result<()> {
    tch::manual_seed(7);
    let dir = TempDir::new("lwae_e2e")?;
    let model_dir = dir.path().join("model");

    let trainer_config = TrainerConfig::default()
        .epochs(1)
        .frames_per_epoch(8)
        .record_interval(1)
        .progress_interval(100)
        .model_dir(model_dir.to_str().unwrap());

    let mut trainer = Trainer::<MockEnv>::build(trainer_config, env_config());
    let mut agent = agent();
    let mut model = model()?;
    let mut recorder = BufferedRecorder::new();

    trainer.train(&mut agent, &mut model, &mut recorder)?;

    assert!(model_dir.join("Q").exists());
    assert!(model_dir.join("P").exists());
    assert!(!recorder.is_empty());

    let mut restored = WaeModel::build(WaeModelConfig::default().z_dim(8), Device::Cpu)?;
    restored.load_params(&model_dir)?;

    for (vs, vs_) in [
        (model.encoder_var_store(), restored.encoder_var_store()),
        (model.decoder_var_store(), restored.decoder_var_store()),
    ] {
        let vars = vs.variables();
        let vars_ = vs_.variables();
        assert_eq!(vars.len(), vars_.len());
        for (name, v) in vars.iter() {
            assert_eq!(v.size(), vars_[name].size());
        }
    }
    Ok(())
}
