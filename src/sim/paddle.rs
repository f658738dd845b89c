//! The player's paddle
//!
//! Horizontal-only. Position is tracked in a floating-point accumulator and
//! the exposed rectangle snaps to whole pixels, so slow speeds still move the
//! paddle without drifting.

use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::settings::Settings;

/// Horizontal movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Rectangle used for collision and drawing
    pub rect: Rect,
    /// Left edge, unsnapped
    position: f32,
    /// Pixels per move
    pub speed: f32,
    screen_width: f32,
}

impl Paddle {
    /// Create a paddle centred horizontally near the bottom of the screen
    pub fn new(settings: &Settings) -> Self {
        let (w, h) = settings.paddle_size;
        let y = settings.screen_height - settings.paddle_bottom_offset;
        let mut paddle = Self {
            rect: Rect::new(0.0, y, w, h),
            position: 0.0,
            speed: settings.paddle_speed,
            screen_width: settings.screen_width,
        };
        paddle.center();
        paddle
    }

    /// Move one step in `direction`, clamped to the screen
    pub fn move_dir(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.position -= self.speed,
            Direction::Right => self.position += self.speed,
        }
        self.sync_rect();
    }

    /// Centre the paddle on `x` (mouse control), clamped to the screen
    pub fn move_to(&mut self, x: f32) {
        self.position = x - self.rect.w / 2.0;
        self.sync_rect();
    }

    /// Return to the horizontal centre of the screen
    pub fn center(&mut self) {
        self.move_to(self.screen_width / 2.0);
    }

    /// Unsnapped left edge
    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn screen_width(&self) -> f32 {
        self.screen_width
    }

    fn sync_rect(&mut self) {
        let max_left = (self.screen_width - self.rect.w).max(0.0);
        self.position = self.position.clamp(0.0, max_left);
        self.rect.set_left(self.position.floor());
        if self.rect.right() > self.screen_width {
            self.rect.set_right(self.screen_width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_starts_centered() {
        let settings = Settings::default();
        let paddle = Paddle::new(&settings);
        assert_eq!(paddle.rect.center().x, settings.screen_width / 2.0);
        assert_eq!(paddle.rect.top(), settings.screen_height - settings.paddle_bottom_offset);
    }

    #[test]
    fn test_clamps_at_walls() {
        let settings = Settings::default();
        let mut paddle = Paddle::new(&settings);
        for _ in 0..1000 {
            paddle.move_dir(Direction::Left);
        }
        assert_eq!(paddle.rect.left(), 0.0);
        assert_eq!(paddle.position(), 0.0);

        for _ in 0..1000 {
            paddle.move_dir(Direction::Right);
        }
        assert_eq!(paddle.rect.right(), settings.screen_width);
    }

    #[test]
    fn test_slow_speed_still_moves() {
        let settings = Settings {
            paddle_speed: 0.5,
            ..Default::default()
        };
        let mut paddle = Paddle::new(&settings);
        let start = paddle.rect.left();
        for _ in 0..5 {
            paddle.move_dir(Direction::Right);
        }
        assert_eq!(paddle.rect.left(), start + 2.0);
    }

    #[test]
    fn test_move_to_clamps() {
        let settings = Settings::default();
        let mut paddle = Paddle::new(&settings);
        paddle.move_to(-500.0);
        assert_eq!(paddle.rect.left(), 0.0);
        paddle.move_to(5000.0);
        assert_eq!(paddle.rect.right(), settings.screen_width);
    }

    proptest! {
        #[test]
        fn prop_paddle_stays_on_screen(
            moves in proptest::collection::vec(any::<bool>(), 0..400),
            speed in 0.1f32..80.0,
        ) {
            let settings = Settings { paddle_speed: speed, ..Default::default() };
            let mut paddle = Paddle::new(&settings);
            for right in moves {
                paddle.move_dir(if right { Direction::Right } else { Direction::Left });
                prop_assert!(paddle.rect.left() >= 0.0);
                prop_assert!(paddle.rect.right() <= settings.screen_width);
            }
        }
    }
}
