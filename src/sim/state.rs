//! Game state and lifecycle
//!
//! Everything one game needs: settings, the seeded RNG, the current level,
//! paddle and balls, plus the score/lives/difficulty sinks. Frame stepping
//! lives in `tick`; this module owns the transitions between levels, lives
//! and games.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::level::{Level, LevelSource};
use super::paddle::Paddle;
use super::progression::Difficulty;
use super::resolver::{Resolver, resolve_ball_collisions};
use super::scoreboard::{Lives, Scoreboard};
use crate::error::SimError;
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay (attached balls wait for launch input)
    Playing,
    /// "Level N" overlay; the paddle moves but nothing is launched
    LevelBanner { level: u32, remaining: u32 },
    /// Game is paused
    Paused,
    /// Out of lives
    GameOver,
    /// A fixed level source ran out of layouts
    Completed,
}

/// Something observable happened during a frame
///
/// Renderers and audio drain these; the simulation never reads them back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BallLaunched { ball_id: u32 },
    WallHit { ball_id: u32 },
    PaddleHit { ball_id: u32 },
    BrickDestroyed { brick_id: u32, points: u32, moving: bool },
    /// Extra ball released by a moving brick
    BallSpawned { ball_id: u32 },
    BallsCollided { a: u32, b: u32 },
    BallLost { ball_id: u32 },
    LifeLost { remaining: u32 },
    LevelComplete { level: u32 },
    LevelStarted { level: u32 },
    AllLevelsCleared { score: i64 },
    GameOver { score: i64, level: u32 },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub source: LevelSource,
    pub phase: GamePhase,
    /// Current level index (0-based)
    pub level_index: u32,
    pub difficulty: Difficulty,
    pub scoreboard: Scoreboard,
    pub lives: Lives,
    /// Simulation frame counter
    pub frame: u64,
    pub paddle: Paddle,
    /// Active balls (creation order)
    pub balls: Vec<Ball>,
    pub level: Level,
    events: Vec<GameEvent>,
    next_ball_id: u32,
}

impl GameState {
    /// New game with procedurally generated levels
    pub fn new(settings: Settings, seed: u64) -> Result<Self, SimError> {
        Self::with_source(settings, LevelSource::Procedural, seed)
    }

    /// New game drawing layouts from `source`
    pub fn with_source(settings: Settings, source: LevelSource, seed: u64) -> Result<Self, SimError> {
        settings.validate()?;

        let mut rng = Pcg32::seed_from_u64(seed);
        let difficulty = Difficulty::new(settings.difficulty, settings.difficulty_step);
        let level = Level::new(0, &settings, difficulty.value(), &source, &mut rng)?;

        let mut state = Self {
            paddle: Paddle::new(&settings),
            lives: Lives::new(settings.starting_lives),
            settings,
            seed,
            rng,
            source,
            phase: GamePhase::Playing,
            level_index: 0,
            difficulty,
            scoreboard: Scoreboard::default(),
            frame: 0,
            balls: Vec::new(),
            level,
            events: Vec::new(),
            next_ball_id: 1,
        };

        state.spawn_ball_attached();
        state.start_banner();
        log::info!("New game (seed {})", seed);
        Ok(state)
    }

    #[inline]
    pub fn score(&self) -> i64 {
        self.scoreboard.score()
    }

    #[inline]
    pub fn level_number(&self) -> u32 {
        self.level_index + 1
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver | GamePhase::Completed)
    }

    /// Events recorded since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    fn next_ball_id(&mut self) -> u32 {
        let id = self.next_ball_id;
        self.next_ball_id += 1;
        id
    }

    /// Spawn a ball attached to the paddle
    pub fn spawn_ball_attached(&mut self) -> u32 {
        let id = self.next_ball_id();
        log::debug!("Ball {} attached to paddle", id);
        self.balls
            .push(Ball::attached(id, &self.paddle, self.settings.ball_radius));
        id
    }

    /// Spawn a ball already in flight
    pub fn spawn_ball_free(&mut self, pos: Vec2, vel: Vec2) -> u32 {
        let id = self.next_ball_id();
        self.balls
            .push(Ball::free(id, pos, vel, self.settings.ball_radius));
        log::debug!("Spawned ball {} at {:?}", id, pos);
        self.events.push(GameEvent::BallSpawned { ball_id: id });
        id
    }

    /// Launch every attached ball; returns how many left the paddle
    pub fn launch_attached(&mut self) -> usize {
        let mut launched = 0;
        for ball in &mut self.balls {
            if ball.launch(&self.paddle, &self.settings) {
                self.events.push(GameEvent::BallLaunched { ball_id: ball.id });
                launched += 1;
            }
        }
        launched
    }

    /// Per-frame collision work for all balls
    ///
    /// Walls, paddle, bricks and stuck checks per ball, then spawned balls
    /// join, then the ball-ball pass. An emptied ball list costs a life.
    pub fn resolve_collisions(&mut self) {
        let outcome = {
            let mut resolver = Resolver {
                settings: &self.settings,
                paddle: &self.paddle,
                level: &mut self.level,
                scoreboard: &mut self.scoreboard,
                rng: &mut self.rng,
                events: &mut self.events,
            };
            resolver.resolve_balls(&mut self.balls)
        };

        for spawn in outcome.spawns {
            self.spawn_ball_free(spawn.pos, spawn.vel);
        }

        resolve_ball_collisions(&mut self.balls, &mut self.events);

        if self.balls.is_empty() {
            self.lose_life();
        }
    }

    /// Last ball gone: penalty, one life, fresh ball on the paddle
    pub fn lose_life(&mut self) {
        let penalty = self.settings.ball_lost_penalty;
        if penalty > 0 {
            self.scoreboard.decrease(penalty);
        }
        let remaining = self.lives.decrement();
        self.events.push(GameEvent::LifeLost { remaining });
        log::info!("Life lost, {} remaining", remaining);

        self.spawn_ball_attached();
        if self.lives.is_exhausted() {
            self.game_over();
        }
    }

    /// Out of lives: difficulty drops back to the minimum
    pub fn game_over(&mut self) {
        self.difficulty.reset();
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver {
            score: self.score(),
            level: self.level_number(),
        });
        log::info!(
            "Game over on level {} with score {}",
            self.level_number(),
            self.score()
        );
    }

    /// Move on after the last brick of a level falls
    ///
    /// Difficulty steps up, the next level is built, and paddle and ball are
    /// reset behind the level banner. A fixed source with no next layout
    /// completes the game instead.
    pub fn advance_level(&mut self) {
        self.events.push(GameEvent::LevelComplete {
            level: self.level_number(),
        });
        let next_index = self.level_index + 1;
        let mut next_difficulty = self.difficulty;
        next_difficulty.advance();

        match Level::new(
            next_index,
            &self.settings,
            next_difficulty.value(),
            &self.source,
            &mut self.rng,
        ) {
            Ok(level) => {
                self.level_index = next_index;
                self.difficulty = next_difficulty;
                self.level = level;
                self.reset_level();
                self.start_banner();
            }
            Err(err) => {
                if !matches!(err, SimError::NoMoreLevels { .. }) {
                    log::error!("Failed to build level {}: {}", next_index + 1, err);
                }
                log::info!("All levels cleared with score {}", self.score());
                self.phase = GamePhase::Completed;
                self.events.push(GameEvent::AllLevelsCleared {
                    score: self.score(),
                });
            }
        }
    }

    /// Per-level reset: paddle centred, one ball attached
    pub fn reset_level(&mut self) {
        self.paddle.center();
        self.balls.clear();
        self.spawn_ball_attached();
    }

    /// Start over from level one with zero score and full lives
    pub fn full_reset(&mut self) -> Result<(), SimError> {
        self.level_index = 0;
        self.scoreboard.reset();
        self.lives.reset();
        self.level = Level::new(
            0,
            &self.settings,
            self.difficulty.value(),
            &self.source,
            &mut self.rng,
        )?;
        self.reset_level();
        self.start_banner();
        Ok(())
    }

    /// Show the level banner, or go straight to play when it is disabled
    fn start_banner(&mut self) {
        let level = self.level_number();
        if self.settings.banner_frames == 0 {
            self.phase = GamePhase::Playing;
            self.events.push(GameEvent::LevelStarted { level });
        } else {
            self.phase = GamePhase::LevelBanner {
                level,
                remaining: self.settings.banner_frames,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::brick_map::BrickMap;

    fn quick_settings() -> Settings {
        Settings {
            banner_frames: 0,
            ..Settings::default()
        }
    }

    fn fixed(layouts: &[&str]) -> LevelSource {
        LevelSource::Fixed(
            layouts
                .iter()
                .map(|l| BrickMap::parse(l).unwrap())
                .collect(),
        )
    }

    #[test]
    fn test_new_game() {
        let state = GameState::new(Settings::default(), 12345).unwrap();
        assert_eq!(state.balls.len(), 1);
        assert!(state.balls[0].is_attached());
        assert_eq!(state.lives.count(), 3);
        assert_eq!(state.score(), 0);
        assert_eq!(
            state.phase,
            GamePhase::LevelBanner {
                level: 1,
                remaining: 240
            }
        );
        // Difficulty 1 on an 8x15 grid
        assert_eq!(state.level.brick_count(), 12);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = Settings {
            ball_speed: -1.0,
            ..Settings::default()
        };
        assert!(matches!(
            GameState::new(settings, 1),
            Err(SimError::InvalidSetting { .. })
        ));
    }

    #[test]
    fn test_lose_life_respawns() {
        let mut state = GameState::new(quick_settings(), 1).unwrap();
        state.balls.clear();
        state.lose_life();
        assert_eq!(state.lives.count(), 2);
        assert_eq!(state.balls.len(), 1);
        assert!(state.balls[0].is_attached());
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_last_life_ends_game() {
        let mut state = GameState::new(quick_settings(), 1).unwrap();
        state.difficulty = Difficulty::new(5.0, 0.2);
        state.lives = Lives::new(1);
        state.balls.clear();
        state.lose_life();
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.difficulty.value(), 1.0);
        assert!(
            state
                .events()
                .iter()
                .any(|e| matches!(e, GameEvent::GameOver { .. }))
        );
    }

    #[test]
    fn test_ball_lost_penalty() {
        let settings = Settings {
            ball_lost_penalty: 25,
            ..quick_settings()
        };
        let mut state = GameState::new(settings, 1).unwrap();
        state.balls.clear();
        state.lose_life();
        assert_eq!(state.score(), -25);
    }

    #[test]
    fn test_advance_level_steps_difficulty() {
        let mut state = GameState::new(Settings::default(), 7).unwrap();
        state.scoreboard.increase(40);
        state.advance_level();
        assert_eq!(state.level_index, 1);
        assert!((state.difficulty.value() - 1.2).abs() < 1e-5);
        assert_eq!(state.balls.len(), 1);
        assert!(state.balls[0].is_attached());
        assert_eq!(state.score(), 40);
        assert!(matches!(
            state.phase,
            GamePhase::LevelBanner { level: 2, .. }
        ));
    }

    #[test]
    fn test_fixed_source_completes() {
        let mut state =
            GameState::with_source(quick_settings(), fixed(&["1100", "0011"]), 3).unwrap();
        state.advance_level();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level.brick_count(), 2);

        state.advance_level();
        assert_eq!(state.phase, GamePhase::Completed);
        assert!(state.is_finished());
        // Still reports the last level actually played
        assert_eq!(state.level_index, 1);
        assert_eq!(state.level_number(), 2);
        assert!((state.difficulty.value() - 1.2).abs() < 1e-5);
    }

    #[test]
    fn test_full_reset() {
        let mut state = GameState::new(quick_settings(), 9).unwrap();
        state.scoreboard.increase(100);
        state.lives.decrement();
        state.advance_level();
        state.advance_level();

        state.full_reset().unwrap();
        assert_eq!(state.level_index, 0);
        assert_eq!(state.score(), 0);
        assert_eq!(state.lives.count(), 3);
        assert_eq!(state.balls.len(), 1);
        assert_eq!(state.paddle.rect.center().x, 400.0);
    }

    #[test]
    fn test_spawned_ball_ids_unique() {
        let mut state = GameState::new(quick_settings(), 1).unwrap();
        let a = state.spawn_ball_free(Vec2::new(100.0, 100.0), Vec2::new(0.0, 5.0));
        let b = state.spawn_ball_attached();
        assert_ne!(a, b);
        assert_ne!(a, state.balls[0].id);
        assert_eq!(state.drain_events(), vec![
            GameEvent::LevelStarted { level: 1 },
            GameEvent::BallSpawned { ball_id: a }
        ]);
        assert!(state.events().is_empty());
    }
}
