//! Vectorized environment batch.
use crate::{
    env::AtariInstance, AtariEnvConfig, FrameStack, StackedObs, VecAct, FRAME_SIZE, N_STACK,
};
use anyhow::Result;
use lwae_core::{error::LwaeError, record::Record, Env, Info, Step};

/// Empty struct.
pub struct NullInfo;

impl Info for NullInfo {}

/// `batch_size` game instances advancing in lockstep.
///
/// Each instance keeps its own four-frame [`FrameStack`]. When an instance
/// reports a terminal step, it is reset in place and its history refilled
/// from the newest frame before the next observation batch is assembled;
/// other instances are untouched.
pub struct AtariVecEnv {
    instances: Vec<AtariInstance>,
    stacks: Vec<FrameStack>,
    n_actions: i64,
    n_procs: usize,
}

impl AtariVecEnv {
    fn observe(&self) -> StackedObs {
        let frame_len = N_STACK * FRAME_SIZE * FRAME_SIZE;
        let mut buf = vec![0f32; self.n_procs * frame_len];

        for (k, stack) in self.stacks.iter().enumerate() {
            stack.write_stacked(&mut buf[k * frame_len..(k + 1) * frame_len]);
        }

        StackedObs::from_flat(buf, self.n_procs)
    }
}

impl Env for AtariVecEnv {
    type Config = AtariEnvConfig;
    type Obs = StackedObs;
    type Act = VecAct;
    type Info = NullInfo;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        if config.batch_size == 0 {
            return Err(LwaeError::InvalidBatchSize(0).into());
        }

        let instances = (0..config.batch_size)
            .map(|k| AtariInstance::build(config, seed + k as i64))
            .collect::<Result<Vec<_>>>()?;
        let n_actions = instances[0].n_actions();
        let stacks = vec![
            FrameStack::new(N_STACK, FRAME_SIZE * FRAME_SIZE);
            config.batch_size
        ];

        Ok(Self {
            instances,
            stacks,
            n_actions,
            n_procs: config.batch_size,
        })
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        for (instance, stack) in self.instances.iter_mut().zip(self.stacks.iter_mut()) {
            let frame = instance.reset();
            stack.fill(frame);
        }

        Ok(self.observe())
    }

    fn step(&mut self, a: &Self::Act) -> (Step<Self>, Record) {
        debug_assert_eq!(a.act.len(), self.n_procs);
        let mut reward = Vec::with_capacity(self.n_procs);
        let mut is_done = Vec::with_capacity(self.n_procs);

        for k in 0..self.n_procs {
            let (frame, r, done) = self.instances[k].step(a.act[k] as usize);
            self.stacks[k].push(frame);

            if done == 1 {
                let first = self.instances[k].reset();
                self.stacks[k].push(first);
                self.stacks[k].reset_to_latest();
            }

            reward.push(r);
            is_done.push(done);
        }

        let step = Step::new(self.observe(), a.clone(), reward, is_done, NullInfo);
        (step, Record::empty())
    }

    fn n_actions(&self) -> i64 {
        self.n_actions
    }

    fn n_procs(&self) -> usize {
        self.n_procs
    }
}
