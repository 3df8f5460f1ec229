use super::AgentModelConfig;
use crate::explorer::EpsilonGreedy;
use anyhow::Result;
use log::{info, trace};
use lwae_core::{error::LwaeError, Env, LatentPolicy, Policy};
use std::{marker::PhantomData, path::Path};
use tch::{nn, nn::Module, no_grad, Device, Kind, Tensor};

/// The frozen agent's networks: a convolutional encoder from the stacked
/// observation to the latent vector, plus linear policy and value heads.
///
/// The value head is declared so that checkpoints load exactly; it is not
/// used during training.
pub struct AgentModel {
    device: Device,
    var_store: nn::VarStore,
    n_actions: i64,
    conv: nn::Sequential,
    pi: nn::Linear,
    v: nn::Linear,
}

impl AgentModel {
    fn conv_cfg() -> nn::ConvConfig {
        nn::ConvConfig {
            stride: 2,
            padding: 1,
            ..Default::default()
        }
    }

    // Input frames are 80x80; four stride-2 convolutions bring them to 5x5.
    fn create_net(
        var_store: &nn::VarStore,
        n_stack: i64,
        latent_dim: i64,
    ) -> nn::Sequential {
        let p = &var_store.root();
        nn::seq()
            .add(nn::conv2d(p / "c1", n_stack, 32, 3, Self::conv_cfg()))
            .add_fn(|xs| xs.elu())
            .add(nn::conv2d(p / "c2", 32, 32, 3, Self::conv_cfg()))
            .add_fn(|xs| xs.elu())
            .add(nn::conv2d(p / "c3", 32, 32, 3, Self::conv_cfg()))
            .add_fn(|xs| xs.elu())
            .add(nn::conv2d(p / "c4", 32, 32, 3, Self::conv_cfg()))
            .add_fn(|xs| xs.elu().flat_view())
            .add(nn::linear(p / "l1", 32 * 5 * 5, latent_dim, Default::default()))
    }

    /// Builds the agent with freshly initialized, frozen parameters.
    pub fn build(config: AgentModelConfig, device: Device) -> Self {
        let mut var_store = nn::VarStore::new(device);
        let conv = Self::create_net(&var_store, config.n_stack, config.latent_dim);
        let p = &var_store.root();
        let pi = nn::linear(
            p / "pi",
            config.latent_dim,
            config.n_actions,
            Default::default(),
        );
        let v = nn::linear(p / "v", config.latent_dim, 1, Default::default());
        var_store.freeze();

        Self {
            device,
            var_store,
            n_actions: config.n_actions,
            conv,
            pi,
            v,
        }
    }

    /// Computes the latent batch for a stacked observation batch.
    pub fn latent(&self, x: &Tensor) -> Tensor {
        self.conv.forward(&x.to(self.device))
    }

    /// Action logits of the policy head.
    pub fn pi(&self, z: &Tensor) -> Tensor {
        let logits = self.pi.forward(z);
        debug_assert_eq!(logits.size().as_slice()[1], self.n_actions);
        logits
    }

    /// State value of the critic head.
    pub fn value(&self, z: &Tensor) -> Tensor {
        self.v.forward(z)
    }

    /// Returns the variable store.
    pub fn get_var_store(&self) -> &nn::VarStore {
        &self.var_store
    }

    /// Save parameters of the agent.
    pub fn save<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        self.var_store.save(&path)?;
        info!("Save frozen agent to {:?}", path.as_ref());
        Ok(())
    }

    /// Load parameters of the agent from a checkpoint.
    ///
    /// Fails fast when the file does not exist; a name or shape mismatch
    /// against the declared architecture also fails.
    pub fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(LwaeError::AgentCheckpointNotFound(path.to_path_buf()).into());
        }
        self.var_store.load(path)?;
        info!("Load frozen agent from {:?}", path);
        for (name, _) in self.var_store.variables().iter() {
            trace!("Load variable {}", name);
        }
        Ok(())
    }
}

/// The frozen agent together with its exploration strategy.
///
/// Implements the read-only inference surface used by the training loop:
/// latent batches through [`LatentPolicy`] and epsilon-greedy actions
/// through [`Policy`].
pub struct LatentAgent<E>
where
    E: Env,
    E::Obs: Into<Tensor>,
    E::Act: From<Tensor>,
{
    model: AgentModel,
    explorer: EpsilonGreedy,
    phantom: PhantomData<E>,
}

impl<E> LatentAgent<E>
where
    E: Env,
    E::Obs: Into<Tensor>,
    E::Act: From<Tensor>,
{
    /// Builds the agent.
    pub fn build(config: AgentModelConfig, epsilon: f64, device: Device) -> Self {
        let model = AgentModel::build(config, device);

        Self {
            model,
            explorer: EpsilonGreedy::new(epsilon),
            phantom: PhantomData,
        }
    }

    /// Load parameters of the agent from a checkpoint.
    pub fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        self.model.load(path)
    }

    /// Returns the underlying model.
    pub fn model(&self) -> &AgentModel {
        &self.model
    }
}

impl<E> Policy<E> for LatentAgent<E>
where
    E: Env,
    E::Obs: Into<Tensor>,
    E::Act: From<Tensor>,
{
    fn sample(&mut self, obs: &E::Obs) -> E::Act {
        let model = &self.model;
        let explorer = &mut self.explorer;
        no_grad(|| {
            let z = model.latent(&obs.clone().into());
            let p = model.pi(&z).softmax(-1, Kind::Float);
            explorer.action(&p).into()
        })
    }
}

impl<E> LatentPolicy<E> for LatentAgent<E>
where
    E: Env,
    E::Obs: Into<Tensor>,
    E::Act: From<Tensor>,
{
    type Latent = Tensor;

    fn latent(&self, obs: &E::Obs) -> Tensor {
        no_grad(|| self.model.latent(&obs.clone().into()).detach())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;
    use tempdir::TempDir;

    fn config() -> AgentModelConfig {
        AgentModelConfig::default().n_actions(6)
    }

    #[test]
    fn test_forward_shapes() {
        tch::manual_seed(42);
        let model = AgentModel::build(config(), Device::Cpu);

        let obs = Tensor::randn(&[2, 4, 80, 80], (Kind::Float, Device::Cpu));
        let z = model.latent(&obs);
        assert_eq!(z.size(), vec![2, 32]);
        assert_eq!(model.pi(&z).size(), vec![2, 6]);
        assert_eq!(model.value(&z).size(), vec![2, 1]);
    }

    #[test]
    fn test_load_missing_checkpoint_fails() {
        let mut model = AgentModel::build(config(), Device::Cpu);
        let err = model.load("no/such/checkpoint").unwrap_err();
        assert!(err.downcast_ref::<LwaeError>().is_some());
    }

    #[test]
    fn test_save_load_round_trip() -> Result<()> {
        tch::manual_seed(42);
        let model = AgentModel::build(config(), Device::Cpu);
        let dir = TempDir::new("frozen_agent")?;
        let path = dir.path().join("agent.pt");
        model.save(&path)?;

        let mut model_ = AgentModel::build(config(), Device::Cpu);
        model_.load(&path)?;

        let obs = Tensor::randn(&[1, 4, 80, 80], (Kind::Float, Device::Cpu));
        let diff = (model.latent(&obs) - model_.latent(&obs))
            .abs()
            .sum(Kind::Float);
        assert!(f64::try_from(diff).unwrap() < 1e-6);
        Ok(())
    }
}
