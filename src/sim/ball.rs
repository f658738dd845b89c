//! Ball entity
//!
//! A ball is either attached to the paddle (position slaved to it, zero
//! velocity) or free (position integrates velocity every frame).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::paddle::Paddle;
use crate::settings::Settings;

/// Ball state - attached to paddle or free-moving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallState {
    /// Sitting on top of the paddle, waiting for launch input
    Attached,
    /// In flight
    Free,
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub state: BallState,
    /// Cosmetic angular velocity (radians per frame), no physical effect
    pub spin: f32,
    /// Cosmetic rotation accumulated from spin
    pub rotation: f32,
    /// Set on paddle contact, cleared once the ball no longer overlaps it
    #[serde(default)]
    pub paddle_hit: bool,
}

impl Ball {
    /// Create a ball sitting on the paddle
    pub fn attached(id: u32, paddle: &Paddle, radius: f32) -> Self {
        let mut ball = Self {
            id,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius,
            state: BallState::Attached,
            spin: 0.0,
            rotation: 0.0,
            paddle_hit: false,
        };
        ball.update_attached(paddle);
        ball
    }

    /// Create a ball already in flight
    pub fn free(id: u32, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
            state: BallState::Free,
            spin: 0.0,
            rotation: 0.0,
            paddle_hit: false,
        }
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.state == BallState::Attached
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.state == BallState::Free
    }

    /// Bounding square of the ball
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.radius * 2.0, self.radius * 2.0)
    }

    /// Keep an attached ball on top of the paddle centre
    pub fn update_attached(&mut self, paddle: &Paddle) {
        if self.is_attached() {
            self.pos = Vec2::new(paddle.rect.center().x, paddle.rect.top() - self.radius);
            self.vel = Vec2::ZERO;
        }
    }

    /// Launch the ball from attached state
    ///
    /// The paddle's offset from screen centre picks the direction: left of
    /// centre sends the ball up and to the right, and vice versa.
    /// Returns false if the ball was already free.
    pub fn launch(&mut self, paddle: &Paddle, settings: &Settings) -> bool {
        if !self.is_attached() {
            return false;
        }
        let half_screen = settings.screen_width / 2.0;
        let offset = ((paddle.rect.center().x - half_screen) / half_screen).clamp(-1.0, 1.0);
        let angle = (-offset * settings.max_launch_angle).to_radians();

        self.vel = Vec2::new(angle.sin(), -angle.cos()) * settings.ball_speed;
        self.state = BallState::Free;
        self.paddle_hit = false;
        true
    }

    /// Advance one frame
    pub fn update(&mut self, paddle: &Paddle, spin_friction: f32) {
        match self.state {
            BallState::Attached => self.update_attached(paddle),
            BallState::Free => {
                self.pos += self.vel;
            }
        }
        self.rotation += self.spin;
        self.spin *= spin_friction;
        if self.spin.abs() < 1e-4 {
            self.spin = 0.0;
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}
