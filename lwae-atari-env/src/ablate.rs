//! Screen ablation applied before frames enter the observation history.
use crate::FRAME_SIZE;
use lwae_core::error::LwaeError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// Rows occupied by the score bar at the top of the screen.
const SCORE_ROWS: usize = 10;

/// A mask removing part of a grayscale frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Ablation {
    /// Identity, the frame is left untouched.
    None,

    /// Zeroes the lower half of the frame.
    Bottom,

    /// Zeroes the upper half of the frame.
    Top,

    /// Zeroes the score bar rows.
    Score,
}

impl FromStr for Ablation {
    type Err = LwaeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "bottom" => Ok(Self::Bottom),
            "top" => Ok(Self::Top),
            "score" => Ok(Self::Score),
            _ => Err(LwaeError::UnknownAblation(s.into())),
        }
    }
}

impl Ablation {
    /// Applies the mask in place to a `FRAME_SIZE` x `FRAME_SIZE` frame.
    pub fn apply(&self, frame: &mut [f32]) {
        debug_assert_eq!(frame.len(), FRAME_SIZE * FRAME_SIZE);
        let rows = match self {
            Self::None => return,
            Self::Bottom => FRAME_SIZE / 2..FRAME_SIZE,
            Self::Top => 0..FRAME_SIZE / 2,
            Self::Score => 0..SCORE_ROWS,
        };

        for row in rows {
            for v in frame[row * FRAME_SIZE..(row + 1) * FRAME_SIZE].iter_mut() {
                *v = 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Vec<f32> {
        vec![1.0; FRAME_SIZE * FRAME_SIZE]
    }

    #[test]
    fn test_parse() {
        assert_eq!("none".parse::<Ablation>().unwrap(), Ablation::None);
        assert_eq!("bottom".parse::<Ablation>().unwrap(), Ablation::Bottom);
        assert!("blur".parse::<Ablation>().is_err());
    }

    #[test]
    fn test_none_is_identity() {
        let mut f = frame();
        Ablation::None.apply(&mut f);
        assert!(f.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_bottom_zeroes_lower_half() {
        let mut f = frame();
        Ablation::Bottom.apply(&mut f);

        let half = FRAME_SIZE * FRAME_SIZE / 2;
        assert!(f[..half].iter().all(|&v| v == 1.0));
        assert!(f[half..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_score_zeroes_top_rows() {
        let mut f = frame();
        Ablation::Score.apply(&mut f);

        assert!(f[..SCORE_ROWS * FRAME_SIZE].iter().all(|&v| v == 0.0));
        assert!(f[SCORE_ROWS * FRAME_SIZE..].iter().all(|&v| v == 1.0));
    }
}
