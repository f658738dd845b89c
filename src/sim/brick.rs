//! Brick entities
//!
//! Static and moving bricks share geometry and the destroyed flag; moving
//! behaviour lives in [`MovingState`]. A moving brick never looks at its
//! neighbours itself: the owning level computes a [`MoveContext`] from the
//! row bucket and hands it in.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::{BRICK_COLLISION_COOLDOWN, WALL_COLLISION_COOLDOWN};

/// Per-frame neighbourhood facts for a moving brick, computed by the level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveContext {
    /// Row occupancy is above half capacity
    pub frozen: bool,
    /// Moving one step would overlap another brick in the row
    pub blocked: bool,
    pub screen_width: f32,
}

/// Horizontal motion state of a moving brick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovingState {
    /// Pixels per frame, sign is direction
    pub velocity: i32,
    pub is_frozen: bool,
    /// Frames left before another reversal is allowed
    pub collision_cooldown: u32,
}

impl MovingState {
    pub fn new(speed: i32, moving_right: bool) -> Self {
        let speed = speed.abs();
        Self {
            velocity: if moving_right { speed } else { -speed },
            is_frozen: false,
            collision_cooldown: 0,
        }
    }

    /// Advance one frame
    pub fn advance(&mut self, rect: &mut Rect, ctx: MoveContext) {
        self.collision_cooldown = self.collision_cooldown.saturating_sub(1);
        self.is_frozen = ctx.frozen;
        if self.is_frozen {
            return;
        }

        if ctx.blocked {
            // Hold position until allowed to turn around
            if self.collision_cooldown == 0 {
                self.velocity = -self.velocity;
                self.collision_cooldown = BRICK_COLLISION_COOLDOWN;
            }
        } else {
            rect.x += self.velocity as f32;
        }

        if rect.left() <= 0.0 {
            self.velocity = self.velocity.abs();
            rect.set_left(0.0);
            self.collision_cooldown = WALL_COLLISION_COOLDOWN;
        } else if rect.right() >= ctx.screen_width {
            self.velocity = -self.velocity.abs();
            rect.set_right(ctx.screen_width);
            self.collision_cooldown = WALL_COLLISION_COOLDOWN;
        }
    }
}

/// Brick variant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BrickKind {
    Static,
    Moving(MovingState),
}

/// A brick entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub id: u32,
    pub rect: Rect,
    /// Row bucket this brick belongs to
    pub row: usize,
    pub is_destroyed: bool,
    pub kind: BrickKind,
}

impl Brick {
    pub fn new_static(id: u32, rect: Rect, row: usize) -> Self {
        Self {
            id,
            rect,
            row,
            is_destroyed: false,
            kind: BrickKind::Static,
        }
    }

    pub fn new_moving(id: u32, rect: Rect, row: usize, state: MovingState) -> Self {
        Self {
            id,
            rect,
            row,
            is_destroyed: false,
            kind: BrickKind::Moving(state),
        }
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        matches!(self.kind, BrickKind::Moving(_))
    }

    pub fn destroy(&mut self) {
        self.is_destroyed = true;
    }

    /// Where this brick would be after one unobstructed step (moving bricks only)
    pub fn probe_rect(&self) -> Option<Rect> {
        match self.kind {
            BrickKind::Moving(state) => {
                Some(self.rect.translated(Vec2::new(state.velocity as f32, 0.0)))
            }
            BrickKind::Static => None,
        }
    }

    /// Advance one frame; static bricks ignore the context
    pub fn update(&mut self, ctx: MoveContext) {
        if self.is_destroyed {
            return;
        }
        if let BrickKind::Moving(ref mut state) = self.kind {
            state.advance(&mut self.rect, ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: f32 = 800.0;

    fn ctx(frozen: bool, blocked: bool) -> MoveContext {
        MoveContext {
            frozen,
            blocked,
            screen_width: SCREEN,
        }
    }

    fn moving(x: f32, right: bool) -> Brick {
        Brick::new_moving(1, Rect::new(x, 0.0, 100.0, 20.0), 0, MovingState::new(3, right))
    }

    #[test]
    fn test_moves_when_clear() {
        let mut brick = moving(200.0, true);
        brick.update(ctx(false, false));
        assert_eq!(brick.rect.x, 203.0);
    }

    #[test]
    fn test_frozen_does_not_move() {
        let mut brick = moving(200.0, true);
        brick.update(ctx(true, false));
        assert_eq!(brick.rect.x, 200.0);
        assert!(matches!(brick.kind, BrickKind::Moving(s) if s.is_frozen));
    }

    #[test]
    fn test_blocked_reverses_with_cooldown() {
        let mut brick = moving(200.0, true);
        brick.update(ctx(false, true));
        assert_eq!(brick.rect.x, 200.0);
        let BrickKind::Moving(state) = brick.kind else {
            panic!("expected moving brick");
        };
        assert_eq!(state.velocity, -3);
        assert_eq!(state.collision_cooldown, BRICK_COLLISION_COOLDOWN);

        // Still blocked during cooldown: holds position, keeps direction
        brick.update(ctx(false, true));
        assert_eq!(brick.rect.x, 200.0);
        assert!(matches!(brick.kind, BrickKind::Moving(s) if s.velocity == -3));
    }

    #[test]
    fn test_wall_bounce() {
        let mut brick = moving(SCREEN - 101.0, true);
        brick.update(ctx(false, false));
        assert_eq!(brick.rect.right(), SCREEN);
        assert!(matches!(brick.kind, BrickKind::Moving(s) if s.velocity < 0));

        let mut brick = moving(1.0, false);
        brick.update(ctx(false, false));
        assert_eq!(brick.rect.left(), 0.0);
        assert!(matches!(brick.kind, BrickKind::Moving(s) if s.velocity > 0));
    }

    #[test]
    fn test_static_ignores_update() {
        let mut brick = Brick::new_static(1, Rect::new(0.0, 0.0, 100.0, 20.0), 0);
        brick.update(ctx(false, false));
        assert_eq!(brick.rect.x, 0.0);
        assert!(brick.probe_rect().is_none());
    }
}
