//! Brickfall - a brick breaker game core
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (ball physics, collisions, levels, progression)
//! - `settings`: Data-driven game configuration
//! - `highscores`: Top-10 leaderboard
//! - `error`: Error types surfaced at the simulation boundary
//!
//! Rendering, audio and menus are not part of this crate. They observe the
//! simulation through [`sim::GameState`] geometry and the [`sim::GameEvent`] queue.

pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration defaults
///
/// All speeds are in pixels per frame; the simulation advances one frame per tick.
pub mod consts {
    /// Target frame rate for the outer loop
    pub const FPS: u32 = 120;

    /// Playfield dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Brick cell size
    pub const BRICK_WIDTH: f32 = 100.0;
    pub const BRICK_HEIGHT: f32 = 20.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    pub const PADDLE_SPEED: f32 = 6.0;
    /// Distance from the bottom of the screen to the paddle's top edge
    pub const PADDLE_BOTTOM_OFFSET: f32 = 60.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 15.0;
    pub const BALL_SPEED: f32 = 5.0;
    /// Launch direction spread from vertical at the screen edges (degrees)
    pub const MAX_LAUNCH_ANGLE: f32 = 45.0;
    /// Spin decays by this factor every frame
    pub const SPIN_FRICTION: f32 = 0.98;
    /// Spin (radians per frame) gained per degree of bounce perturbation
    pub const SPIN_PER_DEGREE: f32 = 0.01;

    /// Paddle reflection: full deflection at the paddle edge (degrees)
    pub const MAX_REFLECTION_ANGLE: f32 = 90.0;
    /// Minimum vertical speed after any bounce
    pub const MIN_Y_VELOCITY: f32 = 1.5;
    /// Random perturbation applied to every bounce (± degrees)
    pub const BOUNCE_JITTER: f32 = 3.0;

    /// Moving bricks
    pub const MOVING_BRICK_CHANCE: f64 = 0.15;
    pub const MOVING_BRICK_SPEED: i32 = 3;
    /// Frames before a moving brick may reverse again after hitting a neighbour
    pub const BRICK_COLLISION_COOLDOWN: u32 = 10;
    /// Frames before a moving brick may reverse again after hitting a wall
    pub const WALL_COLLISION_COOLDOWN: u32 = 5;
    /// Spawned power-up balls leave within this downward cone (degrees from horizontal)
    pub const SPAWN_ANGLE_MIN: f32 = 60.0;
    pub const SPAWN_ANGLE_MAX: f32 = 120.0;

    /// Scoring and lives
    pub const BRICK_REWARD: u32 = 10;
    pub const STARTING_LIVES: u32 = 3;

    /// Difficulty progression
    pub const MIN_DIFFICULTY: f32 = 1.0;
    pub const MAX_DIFFICULTY: f32 = 10.0;
    pub const DIFFICULTY_STEP: f32 = 0.2;

    /// Level banner overlay duration (2 seconds at 120 Hz)
    pub const BANNER_DURATION_FRAMES: u32 = 2 * 120;
}

/// Sign of `value` as -1, 0 or 1 (unlike `f32::signum`, zero maps to zero)
#[inline]
pub fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
