//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per tick, speeds in pixels per frame
//! - Seeded RNG only
//! - Stable iteration order (balls by creation, bricks by row then id)
//! - No rendering or platform dependencies

pub mod ball;
pub mod brick;
pub mod brick_map;
pub mod collision;
pub mod geometry;
pub mod input;
pub mod level;
pub mod paddle;
pub mod progression;
pub mod resolver;
pub mod scoreboard;
pub mod state;
pub mod tick;

pub use ball::{Ball, BallState};
pub use brick::{Brick, BrickKind, MovingState};
pub use brick_map::{BrickMap, Cell};
pub use collision::{bounce, paddle_reflection, reflect_velocity};
pub use geometry::Rect;
pub use input::{InputMapper, InputMode, RawInput, autopilot};
pub use level::{Level, LevelSource};
pub use paddle::{Direction, Paddle};
pub use progression::Difficulty;
pub use resolver::Resolver;
pub use scoreboard::{Lives, Scoreboard};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
