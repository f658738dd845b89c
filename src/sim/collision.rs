//! Collision response for circles against axis-aligned rectangles
//!
//! Pure functions: each takes velocities/geometry and returns the response.
//! The per-frame orchestration lives in `resolver`.

use glam::Vec2;
use rand::Rng;

use super::ball::Ball;
use super::geometry::Rect;
use crate::sign;

/// Velocities below this on an axis count as zero when checking for a stuck ball
pub const STUCK_EPSILON: f32 = 0.05;

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    let n = normal.normalize_or_zero();
    velocity - 2.0 * velocity.dot(n) * n
}

/// Raise |vy| to at least `min_y`, keeping the overall speed where possible
///
/// `fallback_sign` picks the vertical direction when vy is exactly zero.
pub fn enforce_min_vertical(velocity: Vec2, min_y: f32, fallback_sign: f32) -> Vec2 {
    if velocity.y.abs() >= min_y {
        return velocity;
    }
    let speed = velocity.length();
    let y_sign = if velocity.y != 0.0 {
        sign(velocity.y)
    } else if fallback_sign != 0.0 {
        sign(fallback_sign)
    } else {
        1.0
    };
    let vy = y_sign * min_y;
    let vx = (speed * speed - vy * vy).max(0.0).sqrt();
    let x_sign = if velocity.x != 0.0 { sign(velocity.x) } else { 1.0 };
    Vec2::new(x_sign * vx, vy)
}

/// Result of a generic bounce
#[derive(Debug, Clone, Copy)]
pub struct Bounce {
    pub velocity: Vec2,
    /// Random rotation applied after reflection (radians)
    pub perturbation: f32,
}

/// Reflect off `normal`, jitter the direction by up to ±`jitter_deg` degrees,
/// then guarantee at least `min_y` vertical speed
///
/// The jitter breaks perfectly periodic paths such as a ball bouncing forever
/// along one vertical line.
pub fn bounce(
    velocity: Vec2,
    normal: Vec2,
    jitter_deg: f32,
    min_y: f32,
    rng: &mut impl Rng,
) -> Bounce {
    let reflected = reflect_velocity(velocity, normal);
    let perturbation = if jitter_deg > 0.0 {
        rng.random_range(-jitter_deg..=jitter_deg).to_radians()
    } else {
        0.0
    };
    let rotated = Vec2::from_angle(perturbation).rotate(reflected);
    // A pure side-wall hit with no vertical motion heads down toward the paddle
    let fallback = if normal.y != 0.0 { normal.y } else { 1.0 };
    Bounce {
        velocity: enforce_min_vertical(rotated, min_y, fallback),
        perturbation,
    }
}

/// Outgoing velocity for a ball striking the paddle
///
/// The hit offset from the paddle centre, in [-1, 1], scales the reflection
/// angle; the ball always leaves upward with at least `min_y` vertical speed.
pub fn paddle_reflection(
    ball_x: f32,
    paddle: &Rect,
    speed: f32,
    max_angle_deg: f32,
    min_y: f32,
) -> Vec2 {
    let half_width = paddle.w / 2.0;
    let offset = ((ball_x - paddle.center().x) / half_width).clamp(-1.0, 1.0);
    let angle = (offset * max_angle_deg).to_radians();

    let vx = angle.cos() * speed * sign(offset);
    let vy = -(speed * speed - vx * vx).max(0.0).sqrt();
    let v = enforce_min_vertical(Vec2::new(vx, vy), min_y, -1.0);
    Vec2::new(v.x, -v.y.abs())
}

/// Collision normal for a ball that overlaps a brick
///
/// Each axis is judged on its own: moving right with the ball's right edge
/// past the brick's left edge gives x = -1, and so on. When both axes
/// qualify the shallower penetration wins; equal depth is a corner hit.
pub fn brick_collision_normal(ball: &Rect, velocity: Vec2, brick: &Rect) -> Vec2 {
    let mut normal = Vec2::ZERO;
    let mut pen = Vec2::ZERO;

    if velocity.x > 0.0 && ball.right() >= brick.left() && ball.left() < brick.left() {
        normal.x = -1.0;
        pen.x = ball.right() - brick.left();
    } else if velocity.x < 0.0 && ball.left() <= brick.right() && ball.right() > brick.right() {
        normal.x = 1.0;
        pen.x = brick.right() - ball.left();
    }

    if velocity.y > 0.0 && ball.bottom() >= brick.top() && ball.top() < brick.top() {
        normal.y = -1.0;
        pen.y = ball.bottom() - brick.top();
    } else if velocity.y < 0.0 && ball.top() <= brick.bottom() && ball.bottom() > brick.bottom() {
        normal.y = 1.0;
        pen.y = brick.bottom() - ball.top();
    }

    if normal.x != 0.0 && normal.y != 0.0 {
        if pen.x < pen.y {
            normal.y = 0.0;
        } else if pen.y < pen.x {
            normal.x = 0.0;
        }
    }

    if normal == Vec2::ZERO {
        // Ball already inside the brick: turn back along the dominant axis
        normal = if velocity.y != 0.0 {
            Vec2::new(0.0, -sign(velocity.y))
        } else if velocity.x != 0.0 {
            Vec2::new(-sign(velocity.x), 0.0)
        } else {
            Vec2::Y
        };
    }

    normal.normalize()
}

/// Velocity for a ball released by a destroyed moving brick
///
/// Downward, between `min_deg` and `max_deg` from horizontal.
pub fn spawn_velocity(speed: f32, min_deg: f32, max_deg: f32, rng: &mut impl Rng) -> Vec2 {
    let angle = rng.random_range(min_deg..=max_deg).to_radians();
    Vec2::new(angle.cos(), angle.sin()) * speed
}

/// Separate two overlapping balls and exchange their normal velocity components
///
/// Each ball keeps its own pre-collision speed. Returns true if the balls
/// were approaching and their velocities changed.
pub fn resolve_ball_ball_collision(a: &mut Ball, b: &mut Ball) -> bool {
    let delta = b.pos - a.pos;
    let dist = delta.length();
    let min_dist = a.radius + b.radius;
    if dist >= min_dist {
        return false;
    }

    let normal = if dist > 1e-6 { delta / dist } else { Vec2::X };
    let overlap = min_dist - dist;
    a.pos -= normal * (overlap / 2.0);
    b.pos += normal * (overlap / 2.0);

    let approach = (a.vel - b.vel).dot(normal);
    if approach <= 0.0 {
        return false;
    }

    let speed_a = a.speed();
    let speed_b = b.speed();
    let an = a.vel.dot(normal);
    let bn = b.vel.dot(normal);
    let va = a.vel + (bn - an) * normal;
    let vb = b.vel + (an - bn) * normal;

    a.vel = with_speed(va, speed_a, reflect_velocity(a.vel, normal));
    b.vel = with_speed(vb, speed_b, reflect_velocity(b.vel, normal));
    true
}

fn with_speed(direction: Vec2, speed: f32, fallback: Vec2) -> Vec2 {
    if direction.length_squared() > 1e-8 {
        direction.normalize() * speed
    } else {
        fallback
    }
}

/// Push a ball out of a degenerate state flush against a boundary
///
/// Near-zero vertical speed against the top wall, or near-zero horizontal
/// speed against a side wall, gets a push toward the interior. Returns true
/// if a correction was applied.
pub fn unstuck(ball: &mut Ball, screen_width: f32, min_y: f32) -> bool {
    let rect = ball.rect();
    let speed = ball.speed();
    let mut corrected = false;

    if ball.vel.y.abs() < STUCK_EPSILON && rect.top() <= 0.0 {
        ball.pos.y = ball.radius;
        let vy = min_y;
        let vx = sign(ball.vel.x) * (speed * speed - vy * vy).max(0.0).sqrt();
        ball.vel = Vec2::new(vx, vy);
        corrected = true;
    }

    let speed = ball.speed();
    if ball.vel.x.abs() < STUCK_EPSILON {
        let push = if rect.left() <= 0.0 {
            ball.pos.x = ball.radius;
            Some(1.0)
        } else if rect.right() >= screen_width {
            ball.pos.x = screen_width - ball.radius;
            Some(-1.0)
        } else {
            None
        };
        if let Some(dir) = push {
            let vx = dir * min_y;
            let y_sign = if ball.vel.y != 0.0 { sign(ball.vel.y) } else { 1.0 };
            let vy = y_sign * (speed * speed - vx * vx).max(min_y * min_y).sqrt();
            ball.vel = Vec2::new(vx, vy);
            corrected = true;
        }
    }

    corrected
}
