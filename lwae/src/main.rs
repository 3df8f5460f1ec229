//! Trains a normalized autoencoder on the latent space of a frozen,
//! pretrained Atari agent.
use anyhow::Result;
use clap::Parser;
use log::info;
use lwae_atari_env::{Ablation, AtariEnvConfig, AtariVecEnv};
use lwae_core::{record::NullRecorder, Env as _, Trainer, TrainerConfig};
use lwae_tch_agent::{
    agent::{AgentModelConfig, LatentAgent},
    util::KernelForm,
    wae::{WaeModel, WaeModelConfig},
};
use std::{fs, path::PathBuf};

type Agent = LatentAgent<AtariVecEnv>;

#[derive(Parser, Debug)]
#[command(name = "lwae", version, about = "Latent autoencoder training")]
struct Args {
    /// Name of the Atari ROM, e.g. space_invaders
    #[arg(long, default_value = "space_invaders")]
    env: String,

    /// Path of the frozen agent checkpoint
    #[arg(long)]
    agent_file: PathBuf,

    /// Directory holding the Atari ROMs; ATARI_ROM_DIR is consulted when absent
    #[arg(long)]
    rom_dir: Option<PathBuf>,

    /// The number of environment instances advancing in lockstep
    #[arg(long, default_value_t = 64)]
    batch_size: usize,

    /// Probability of taking a uniformly random action batch
    #[arg(long, default_value_t = 0.2)]
    epsilon: f64,

    /// Learning rate of both autoencoder optimizers
    #[arg(long, default_value_t = 1e-4)]
    ae_lr: f64,

    /// Where to save Q and P after each epoch; derived from the run
    /// parameters when empty
    #[arg(long, default_value = "")]
    checkpoint_dir: String,

    /// Dimension of the normalized autoencoder code
    #[arg(long, default_value_t = 16)]
    latent: i64,

    /// Dimension of the frozen agent's latent vector
    #[arg(long, default_value_t = 32)]
    agent_latent: i64,

    /// Screen ablation: none, bottom, top or score
    #[arg(long, default_value = "none")]
    missing: Ablation,

    /// Free-form run information, used in the default checkpoint directory
    #[arg(long, default_value = "")]
    info: String,

    /// The number of million-frame epochs
    #[arg(long, default_value_t = 15)]
    m_frames: usize,

    /// Emulator steps per decision
    #[arg(long, default_value_t = 8)]
    fskip: usize,

    /// CUDA device index; falls back to CPU when CUDA is unavailable
    #[arg(long, default_value_t = 0)]
    gpu: usize,

    /// Kernel statistic form: legacy or corrected
    #[arg(long, default_value = "legacy")]
    kernel: KernelForm,

    /// Print the configurations and exit
    #[arg(long)]
    show_config: bool,
}

fn init() -> Args {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    tch::manual_seed(42);

    Args::parse()
}

fn device(gpu: usize) -> tch::Device {
    if tch::Cuda::is_available() {
        tch::Device::Cuda(gpu)
    } else {
        tch::Device::Cpu
    }
}

fn env_config(args: &Args) -> AtariEnvConfig {
    let config = AtariEnvConfig::default()
        .name(args.env.as_str())
        .batch_size(args.batch_size)
        .fskip(args.fskip)
        .ablation(args.missing);

    match &args.rom_dir {
        Some(dir) => config.rom_dir(dir),
        None => config,
    }
}

fn checkpoint_dir(args: &Args, env_config: &AtariEnvConfig) -> String {
    if !args.checkpoint_dir.is_empty() {
        return args.checkpoint_dir.clone();
    }

    let agent = args
        .agent_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "agent".to_string());

    format!(
        "normalized_{}_{}_latent{}_lr{}_fskip{}_eps{}",
        args.info,
        agent,
        args.latent,
        args.ae_lr,
        env_config.effective_fskip(),
        args.epsilon,
    )
}

fn n_actions(env_config: &AtariEnvConfig) -> Result<i64> {
    // Probes a single instance for the size of the minimal action set.
    let probe = AtariVecEnv::build(&env_config.clone().batch_size(1), 0)?;
    Ok(probe.n_actions())
}

fn show_config(
    env_config: &AtariEnvConfig,
    wae_config: &WaeModelConfig,
    trainer_config: &TrainerConfig,
) -> Result<()> {
    println!("Device: {:?}", device(0));
    println!("{}", serde_yaml::to_string(&env_config)?);
    println!("{}", serde_yaml::to_string(&wae_config)?);
    println!("{}", serde_yaml::to_string(&trainer_config)?);
    Ok(())
}

fn train(args: Args) -> Result<()> {
    let device = device(args.gpu);
    let env_config = env_config(&args);
    let model_dir = checkpoint_dir(&args, &env_config);

    let wae_config = WaeModelConfig::default()
        .z_dim(args.latent)
        .agent_latent_dim(args.agent_latent)
        .learning_rate(args.ae_lr)
        .kernel_form(args.kernel);
    let trainer_config = TrainerConfig::default()
        .epochs(args.m_frames)
        .model_dir(model_dir.as_str());

    if args.show_config {
        return show_config(&env_config, &wae_config, &trainer_config);
    }

    info!("Device: {:?}", device);
    fs::create_dir_all(&model_dir)?;

    let n_actions = n_actions(&env_config)?;
    let agent_config = AgentModelConfig::default()
        .latent_dim(args.agent_latent)
        .n_actions(n_actions);

    let mut agent = Agent::build(agent_config, args.epsilon, device);
    agent.load(&args.agent_file)?;

    let mut model = WaeModel::build(wae_config, device)?;
    let mut recorder = NullRecorder {};

    let mut trainer = Trainer::<AtariVecEnv>::build(trainer_config, env_config);
    trainer.train(&mut agent, &mut model, &mut recorder)?;

    info!("Saved the final model in {:?}", model_dir);
    Ok(())
}

fn main() -> Result<()> {
    let args = init();
    train(args)
}
