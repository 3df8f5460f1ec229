//! A single emulator instance with preprocessing.
use crate::{
    ale::{Ale, AleAction, AleConfig},
    Ablation, AtariEnvConfig, FRAME_SIZE,
};
use anyhow::{bail, Result};
use image::{
    imageops::{grayscale, resize, FilterType::Triangle},
    ImageBuffer, Luma, Rgb,
};

/// One game instance of the batch.
///
/// Preprocessing follows the usual Atari wrapper chain: frame skip with
/// max-pooling of the last two raw frames, grayscale, 80x80 resize, values
/// scaled to `[0, 1]`, then the configured ablation.
pub(crate) struct AtariInstance {
    env: Ale,
    actions: Vec<AleAction>,
    episodic_life: bool,
    lives: usize,
    was_real_done: bool,
    // Observation buffer for frame skipping
    obs_buffer: [Vec<u8>; 2],
    fskip: usize,
    ablation: Ablation,
}

impl AtariInstance {
    pub fn build(config: &AtariEnvConfig, seed: i64) -> Result<Self> {
        let rom_path = config.rom_path();
        if !rom_path.is_file() {
            bail!("Atari ROM not found: {:?}", rom_path);
        }

        let env = Ale::new(
            &rom_path,
            AleConfig {
                random_seed: seed as i32,
                ..AleConfig::default()
            },
        );
        let actions = env.minimal_actions();

        Ok(Self {
            env,
            actions,
            episodic_life: config.episodic_life,
            lives: 0,
            was_real_done: true,
            obs_buffer: [vec![], vec![]],
            fskip: config.effective_fskip(),
            ablation: config.ablation,
        })
    }

    pub fn n_actions(&self) -> i64 {
        self.actions.len() as i64
    }

    fn render(&self) -> Vec<u8> {
        let mut obs = vec![0u8; self.env.rgb24_size()];
        self.env.rgb24(&mut obs);
        obs
    }

    fn episodic_life_step(&mut self, a: usize) -> (Vec<u8>, f32, i8) {
        let reward = self.env.take_action(self.actions[a]) as f32;
        let mut done = self.env.is_game_over();
        self.was_real_done = done;
        let lives = self.env.lives() as usize;

        if self.episodic_life && lives < self.lives && lives > 0 {
            done = true;
            self.lives = lives;
        }

        (self.render(), reward, done as i8)
    }

    fn skip_and_max(&mut self, a: usize) -> (Vec<u8>, f32, i8) {
        let mut total_reward = 0f32;
        let mut done = 0;

        for i in 0..self.fskip {
            let (obs, reward, done_) = self.episodic_life_step(a);
            total_reward += reward;
            done = done_;
            if i + 2 == self.fskip {
                self.obs_buffer[0] = obs;
            } else if i + 1 == self.fskip {
                self.obs_buffer[1] = obs;
            }
            if done_ == 1 {
                break;
            }
        }

        // Max pooling
        let obs = self.obs_buffer[0]
            .iter()
            .zip(self.obs_buffer[1].iter())
            .map(|(&a, &b)| a.max(b))
            .collect::<Vec<_>>();

        (obs, total_reward, done)
    }

    fn warp_and_grayscale(w: u32, h: u32, obs: Vec<u8>) -> Vec<f32> {
        // `obs.len()` is w * h * 3 where (w, h) is the size of the frame.
        let img = ImageBuffer::<Rgb<u8>, _>::from_vec(w, h, obs).unwrap();
        let img = resize(&img, FRAME_SIZE as u32, FRAME_SIZE as u32, Triangle);
        let img: ImageBuffer<Luma<u8>, _> = grayscale(&img);
        let buf = img.to_vec();
        assert_eq!(buf.len(), FRAME_SIZE * FRAME_SIZE);
        buf.iter().map(|&v| v as f32 / 255.0).collect()
    }

    fn preprocess(&self, obs: Vec<u8>) -> Vec<f32> {
        let (w, h) = (self.env.width(), self.env.height());
        let mut frame = Self::warp_and_grayscale(w, h, obs);
        self.ablation.apply(&mut frame);
        frame
    }

    /// Starts a new episode and returns its first preprocessed frame.
    pub fn reset(&mut self) -> Vec<f32> {
        if self.was_real_done {
            self.env.reset();
        } else {
            // no-op step to advance from the lost-life state
            self.env.take_action(AleAction::Noop);
        }

        self.was_real_done = false;
        self.lives = self.env.lives() as usize;

        let obs = self.render();
        self.obs_buffer[0] = obs.clone();
        self.obs_buffer[1] = obs.clone();

        self.preprocess(obs)
    }

    /// Advances the instance by one decision.
    pub fn step(&mut self, a: usize) -> (Vec<f32>, f32, i8) {
        let (obs, reward, done) = self.skip_and_max(a);
        (self.preprocess(obs), reward, done)
    }
}
