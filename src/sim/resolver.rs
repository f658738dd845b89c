//! Per-frame collision orchestration
//!
//! For every free ball, in order: walls, paddle, bricks, then the stuck-ball
//! check. Lost balls are removed after the loop and balls released by moving
//! bricks are handed back to the caller so ids stay owned by the game state.
//! Ball-ball contacts are resolved in a separate pass afterwards.

use glam::Vec2;
use rand::Rng;

use super::ball::Ball;
use super::collision::{
    bounce, brick_collision_normal, paddle_reflection, resolve_ball_ball_collision, spawn_velocity, unstuck,
};
use super::geometry::circle_intersects_rect;
use super::level::Level;
use super::paddle::Paddle;
use super::scoreboard::Scoreboard;
use super::state::GameEvent;
use crate::consts::{SPAWN_ANGLE_MAX, SPAWN_ANGLE_MIN, SPIN_PER_DEGREE};
use crate::settings::Settings;

/// Outcome of the wall check for one ball
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallHit {
    None,
    Bounced,
    /// Crossed the bottom edge
    Lost,
}

/// A ball to add once the per-ball loop is done
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawn {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// What a collision pass produced beyond in-place ball updates
#[derive(Debug, Clone, Default)]
pub struct FrameOutcome {
    /// Ids of balls removed for leaving the screen
    pub lost: Vec<u32>,
    pub spawns: Vec<Spawn>,
}

/// Borrowed view of everything a collision pass touches
pub struct Resolver<'a, R: Rng> {
    pub settings: &'a Settings,
    pub paddle: &'a Paddle,
    pub level: &'a mut Level,
    pub scoreboard: &'a mut Scoreboard,
    pub rng: &'a mut R,
    pub events: &'a mut Vec<GameEvent>,
}

impl<R: Rng> Resolver<'_, R> {
    /// Run wall, paddle, brick and stuck checks for every free ball
    pub fn resolve_balls(&mut self, balls: &mut Vec<Ball>) -> FrameOutcome {
        let mut outcome = FrameOutcome::default();

        for ball in balls.iter_mut().filter(|b| b.is_free()) {
            if self.check_wall_collision(ball) == WallHit::Lost {
                outcome.lost.push(ball.id);
                continue;
            }
            self.check_paddle_collision(ball);
            if let Some(spawn) = self.check_brick_collision(ball) {
                outcome.spawns.push(spawn);
            }
            self.check_ball_stuck(ball);
        }

        if !outcome.lost.is_empty() {
            balls.retain(|b| !outcome.lost.contains(&b.id));
        }
        outcome
    }

    /// Side and top walls reflect; the bottom edge loses the ball
    pub fn check_wall_collision(&mut self, ball: &mut Ball) -> WallHit {
        let rect = ball.rect();
        let width = self.settings.screen_width;

        if rect.bottom() >= self.settings.screen_height {
            log::debug!("Ball {} lost at x={:.1}", ball.id, ball.pos.x);
            self.events.push(GameEvent::BallLost { ball_id: ball.id });
            return WallHit::Lost;
        }

        let normal = if rect.left() <= 0.0 && ball.vel.x < 0.0 {
            ball.pos.x = ball.radius;
            Vec2::X
        } else if rect.right() >= width && ball.vel.x > 0.0 {
            ball.pos.x = width - ball.radius;
            Vec2::NEG_X
        } else if rect.top() <= 0.0 && ball.vel.y < 0.0 {
            ball.pos.y = ball.radius;
            Vec2::Y
        } else {
            return WallHit::None;
        };

        self.apply_bounce(ball, normal);
        self.events.push(GameEvent::WallHit { ball_id: ball.id });
        WallHit::Bounced
    }

    /// Reflect off the paddle once per continuous contact; returns true on a new contact
    pub fn check_paddle_collision(&mut self, ball: &mut Ball) -> bool {
        let paddle = &self.paddle.rect;
        if !ball.rect().overlaps(paddle) {
            ball.paddle_hit = false;
            return false;
        }
        if ball.paddle_hit {
            return false;
        }

        ball.vel = paddle_reflection(
            ball.pos.x,
            paddle,
            self.settings.ball_speed,
            self.settings.max_reflection_angle,
            self.settings.min_y_velocity,
        );
        // Sit the ball on the paddle so the next frame starts clear of it
        ball.pos.y = ball.pos.y.min(paddle.top() - ball.radius);
        ball.paddle_hit = true;
        self.events.push(GameEvent::PaddleHit { ball_id: ball.id });
        true
    }

    /// Destroy the first brick the ball touches and bounce off it
    ///
    /// Only rows the ball spans or is about to enter are searched. Returns a
    /// spawn request when the destroyed brick was a moving one.
    pub fn check_brick_collision(&mut self, ball: &mut Ball) -> Option<Spawn> {
        let rect = ball.rect();
        let rows = self.level.get_ball_collision_rows(&rect, ball.vel);
        let hit = self
            .level
            .bricks_in_rows(&rows)
            .into_iter()
            .find(|id| {
                self.level.brick(*id).is_some_and(|brick| {
                    !brick.is_destroyed && circle_intersects_rect(ball.pos, ball.radius, &brick.rect)
                })
            })?;

        let brick = self.level.destroy_brick(hit)?;

        let normal = brick_collision_normal(&rect, ball.vel, &brick.rect);
        self.apply_bounce(ball, normal);

        let points = self.settings.brick_reward;
        self.scoreboard.increase(points);
        self.events.push(GameEvent::BrickDestroyed {
            brick_id: brick.id,
            points,
            moving: brick.is_moving(),
        });

        if brick.is_moving() {
            let vel = spawn_velocity(
                self.settings.ball_speed,
                SPAWN_ANGLE_MIN,
                SPAWN_ANGLE_MAX,
                &mut *self.rng,
            );
            Some(Spawn {
                pos: brick.rect.center(),
                vel,
            })
        } else {
            None
        }
    }

    /// Nudge a ball that has settled into a degenerate path along a wall
    pub fn check_ball_stuck(&mut self, ball: &mut Ball) -> bool {
        let fixed = unstuck(
            ball,
            self.settings.screen_width,
            self.settings.min_y_velocity,
        );
        if fixed {
            log::debug!("Unstuck ball {} -> vel {:?}", ball.id, ball.vel);
        }
        fixed
    }

    fn apply_bounce(&mut self, ball: &mut Ball, normal: Vec2) {
        let result = bounce(
            ball.vel,
            normal,
            self.settings.bounce_jitter,
            self.settings.min_y_velocity,
            &mut *self.rng,
        );
        ball.vel = result.velocity;
        ball.spin += result.perturbation.to_degrees() * SPIN_PER_DEGREE;
    }
}

/// Pairwise ball-ball pass over free balls; returns the number of bounces
pub fn resolve_ball_collisions(balls: &mut [Ball], events: &mut Vec<GameEvent>) -> usize {
    let mut bounces = 0;
    for i in 0..balls.len() {
        let (head, tail) = balls.split_at_mut(i + 1);
        let a = &mut head[i];
        if !a.is_free() {
            continue;
        }
        for b in tail.iter_mut().filter(|b| b.is_free()) {
            if resolve_ball_ball_collision(a, b) {
                events.push(GameEvent::BallsCollided { a: a.id, b: b.id });
                bounces += 1;
            }
        }
    }
    bounces
}
