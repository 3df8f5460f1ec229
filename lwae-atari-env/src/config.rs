//! Configuration of [`AtariVecEnv`](crate::AtariVecEnv).
use crate::Ablation;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::{Path, PathBuf},
};

/// Configuration of [`AtariVecEnv`](crate::AtariVecEnv).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AtariEnvConfig {
    /// Name of the game, e.g. `space_invaders`.
    pub name: String,

    /// Directory holding the ROMs; `ATARI_ROM_DIR` is consulted when absent.
    pub rom_dir: Option<PathBuf>,

    /// The number of environment instances advancing in lockstep.
    pub batch_size: usize,

    /// Emulator steps per decision.
    pub fskip: usize,

    /// Screen ablation applied to every frame.
    pub ablation: Ablation,

    /// Ends an episode on life loss.
    pub episodic_life: bool,
}

impl Default for AtariEnvConfig {
    fn default() -> Self {
        Self {
            name: "space_invaders".to_string(),
            rom_dir: None,
            batch_size: 64,
            fskip: 8,
            ablation: Ablation::None,
            episodic_life: false,
        }
    }
}

impl AtariEnvConfig {
    /// Sets the name of the game.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the ROM directory.
    pub fn rom_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.rom_dir = Some(dir.into());
        self
    }

    /// Sets the number of environment instances.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Sets the number of emulator steps per decision.
    pub fn fskip(mut self, v: usize) -> Self {
        self.fskip = v;
        self
    }

    /// Sets the screen ablation.
    pub fn ablation(mut self, v: Ablation) -> Self {
        self.ablation = v;
        self
    }

    /// Sets episodic life mode.
    pub fn episodic_life(mut self, v: bool) -> Self {
        self.episodic_life = v;
        self
    }

    /// The frame skip actually used by the environment.
    ///
    /// Space Invaders needs an odd frame skip: bullets are visible only on
    /// alternating frames, and an even skip would make them invisible for
    /// the whole run.
    pub fn effective_fskip(&self) -> usize {
        if self.name == "space_invaders" && self.fskip % 2 == 0 {
            self.fskip - 1
        } else {
            self.fskip
        }
    }

    /// Resolves the path of the ROM file.
    pub fn rom_path(&self) -> PathBuf {
        let dir = self
            .rom_dir
            .clone()
            .or_else(|| std::env::var("ATARI_ROM_DIR").ok().map(PathBuf::from))
            .or_else(|| dirs::home_dir().map(|home| home.join("atari_rom")))
            .unwrap_or_else(|| PathBuf::from("."));
        dir.join(format!("{}.bin", self.name))
    }

    /// Constructs [`AtariEnvConfig`] from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`AtariEnvConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_invaders_forces_odd_fskip() {
        let config = AtariEnvConfig::default().fskip(8);
        assert_eq!(config.effective_fskip(), 7);

        let config = AtariEnvConfig::default().fskip(7);
        assert_eq!(config.effective_fskip(), 7);

        let config = AtariEnvConfig::default().name("pong").fskip(8);
        assert_eq!(config.effective_fskip(), 8);
    }
}
