//! Difficulty progression

use serde::{Deserialize, Serialize};

use crate::consts::{DIFFICULTY_STEP, MAX_DIFFICULTY, MIN_DIFFICULTY};

/// Brick density knob in [1, 10]; steps up by a fixed amount per cleared level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    value: f32,
    step: f32,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::new(MIN_DIFFICULTY, DIFFICULTY_STEP)
    }
}

impl Difficulty {
    pub fn new(value: f32, step: f32) -> Self {
        Self {
            value: value.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY),
            step: step.abs(),
        }
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[inline]
    pub fn is_max(&self) -> bool {
        self.value >= MAX_DIFFICULTY
    }

    /// Step up after a cleared level, never past the maximum
    ///
    /// Returns false if already at the cap.
    pub fn advance(&mut self) -> bool {
        if self.is_max() {
            return false;
        }
        self.value = snap(self.value + self.step).min(MAX_DIFFICULTY);
        true
    }

    /// Back to the minimum (game over)
    pub fn reset(&mut self) {
        self.value = MIN_DIFFICULTY;
    }
}

/// Round to the nearest thousandth so repeated steps land on the exact decimal
fn snap(value: f32) -> f32 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::brick_map::target_brick_count;

    #[test]
    fn test_advance_steps() {
        let mut d = Difficulty::default();
        assert_eq!(d.value(), 1.0);
        assert!(d.advance());
        assert!((d.value() - 1.2).abs() < 1e-5);
    }

    #[test]
    fn test_advance_caps_at_max() {
        let mut d = Difficulty::new(9.9, 0.2);
        assert!(d.advance());
        assert_eq!(d.value(), 10.0);
        assert!(!d.advance());
        assert_eq!(d.value(), 10.0);

        let mut d = Difficulty::default();
        for _ in 0..100 {
            d.advance();
        }
        assert_eq!(d.value(), 10.0);
    }

    #[test]
    fn test_advance_stays_on_step_grid() {
        let mut d = Difficulty::default();
        for step in 1..=45usize {
            assert!(!d.is_max(), "capped early at step {}", step);
            assert!(d.advance());
            // Difficulty in tenths: 10, 12, 14, ..., 100
            let tenths = 10 + 2 * step;
            assert_eq!(d.value(), tenths as f32 / 10.0, "step {}", step);
            assert_eq!(target_brick_count(8, 15, d.value()), 120 * tenths / 100);
        }
        assert!(d.is_max());
        assert_eq!(d.value(), MAX_DIFFICULTY);
        assert!(!d.advance());
    }

    #[test]
    fn test_reset_and_clamp() {
        let mut d = Difficulty::new(42.0, 0.2);
        assert!(d.is_max());
        d.reset();
        assert_eq!(d.value(), MIN_DIFFICULTY);
        assert_eq!(Difficulty::new(-3.0, 0.2).value(), MIN_DIFFICULTY);
    }
}
