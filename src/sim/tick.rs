//! Fixed-step simulation tick
//!
//! One call advances the game by exactly one frame. All speeds are per frame,
//! so the outer loop's frame rate decides wall-clock speed.

use super::paddle::Direction;
use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Keyboard movement at paddle speed
    pub movement: Option<Direction>,
    /// Absolute paddle centre x (mouse); takes precedence over `movement`
    pub target_x: Option<f32>,
    /// Launch attached balls
    pub launch: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }

    match state.phase {
        GamePhase::Paused | GamePhase::GameOver | GamePhase::Completed => return,
        _ => {}
    }

    state.frame += 1;
    move_paddle(state, input);

    if let GamePhase::LevelBanner { level, remaining } = state.phase {
        // Banner is non-blocking: the paddle moves and attached balls follow it
        let friction = state.settings.spin_friction;
        for ball in &mut state.balls {
            ball.update(&state.paddle, friction);
        }
        let remaining = remaining.saturating_sub(1);
        if remaining == 0 {
            state.phase = GamePhase::Playing;
            state.push_event(GameEvent::LevelStarted { level });
        } else {
            state.phase = GamePhase::LevelBanner { level, remaining };
        }
        return;
    }

    if input.launch {
        state.launch_attached();
    }

    state.level.update();

    let friction = state.settings.spin_friction;
    for ball in &mut state.balls {
        ball.update(&state.paddle, friction);
    }

    state.resolve_collisions();

    if state.phase == GamePhase::GameOver {
        return;
    }
    if state.level.is_level_complete() {
        state.advance_level();
    }
}

fn move_paddle(state: &mut GameState, input: &TickInput) {
    if let Some(x) = input.target_x {
        state.paddle.move_to(x);
    } else if let Some(direction) = input.movement {
        state.paddle.move_dir(direction);
    }
}
