//! Safe wrapper of the Arcade Learning Environment.
use c_str_macro::c_str;
use std::ffi::CString;
use std::path::{Path, PathBuf};

/// Actions of the Atari console.
#[derive(Copy, Clone, Debug, num_derive::FromPrimitive)]
#[repr(i32)]
pub enum AleAction {
    Noop = 0,
    Fire = 1,
    Up = 2,
    Right = 3,
    Left = 4,
    Down = 5,
    UpRight = 6,
    UpLeft = 7,
    DownRight = 8,
    DownLeft = 9,
    UpFire = 10,
    RightFire = 11,
    LeftFire = 12,
    DownFire = 13,
    UpRightFire = 14,
    UpLeftFire = 15,
    DownRightFire = 16,
    DownLeftFire = 17,
}

/// Configuration of the emulator.
pub struct AleConfig {
    /// Random seed of the emulator; if 0, set to time.
    pub random_seed: i32,
    /// Average the last 2 frames.
    pub color_averaging: bool,
    /// Emulator-internal frame skip; 1 is no skip.
    pub frame_skip: i32,
    /// Sticky action probability.
    pub repeat_action_probability: f32,
    /// Directory where screens are recorded.
    pub record_screen_dir: Option<PathBuf>,
}

impl Default for AleConfig {
    fn default() -> Self {
        Self {
            random_seed: 0,
            color_averaging: false,
            frame_skip: 1,
            repeat_action_probability: 0.25,
            record_screen_dir: None,
        }
    }
}

/// The emulator of a single game instance.
pub struct Ale {
    inner: *mut atari_env_sys::ALEInterface,
}

// The inner pointer is only touched through &mut self.
unsafe impl Send for Ale {}

impl Drop for Ale {
    fn drop(&mut self) {
        unsafe {
            atari_env_sys::ALE_del(self.inner);
        }
    }
}

impl Ale {
    /// Creates an emulator and loads a ROM.
    pub fn new(rom_path: &Path, config: AleConfig) -> Self {
        let ale = unsafe { atari_env_sys::ALE_new() };
        unsafe {
            atari_env_sys::setInt(ale, c_str!("random_seed").as_ptr(), config.random_seed);
            atari_env_sys::setBool(
                ale,
                c_str!("color_averaging").as_ptr(),
                config.color_averaging,
            );
            atari_env_sys::setInt(ale, c_str!("frame_skip").as_ptr(), config.frame_skip);
            atari_env_sys::setFloat(
                ale,
                c_str!("repeat_action_probability").as_ptr(),
                config.repeat_action_probability,
            );

            if let Some(path) = config.record_screen_dir {
                let path = CString::new(path.to_str().unwrap()).unwrap();
                atari_env_sys::setString(ale, c_str!("record_screen_dir").as_ptr(), path.as_ptr());
            }
            let rom_path = CString::new(rom_path.to_str().unwrap()).unwrap();
            atari_env_sys::loadROM(ale, rom_path.as_ptr());
        }
        unsafe {
            atari_env_sys::reset_game(ale);
        }

        Self { inner: ale }
    }

    /// Returns the actions that have an effect in the loaded game.
    pub fn minimal_actions(&self) -> Vec<AleAction> {
        let n = unsafe { atari_env_sys::getMinimalActionSize(self.inner) } as usize;
        let mut buf = vec![AleAction::Noop; n];
        unsafe {
            atari_env_sys::getMinimalActionSet(self.inner, buf.as_mut_ptr() as *mut i32);
        }
        buf
    }

    /// Returns `true` if the game ended.
    pub fn is_game_over(&self) -> bool {
        unsafe { atari_env_sys::game_over(self.inner) }
    }

    /// Starts a new episode.
    pub fn reset(&mut self) {
        unsafe {
            atari_env_sys::reset_game(self.inner);
        }
    }

    /// Advances the emulator by one action and returns the reward.
    pub fn take_action(&mut self, action: AleAction) -> i32 {
        let ret: ::std::os::raw::c_int = unsafe { atari_env_sys::act(self.inner, action as i32) };
        ret.into()
    }

    /// Remaining lives in the game.
    pub fn lives(&self) -> u32 {
        unsafe { atari_env_sys::lives(self.inner) as u32 }
    }

    /// Width of the screen in pixels.
    pub fn width(&self) -> u32 {
        unsafe { atari_env_sys::getScreenWidth(self.inner) as u32 }
    }

    /// Height of the screen in pixels.
    pub fn height(&self) -> u32 {
        unsafe { atari_env_sys::getScreenHeight(self.inner) as u32 }
    }

    /// Size of an RGB screen buffer in bytes.
    pub fn rgb24_size(&self) -> usize {
        (self.width() as usize) * (self.height() as usize) * 3
    }

    /// Reads the screen as RGB, regardless of endianness.
    pub fn rgb24(&self, buf: &mut [u8]) {
        unsafe {
            atari_env_sys::getScreenRGB2(self.inner, buf.as_mut_ptr());
        }
    }
}
