//! Input mapping
//!
//! Turns raw per-frame device state into a [`TickInput`]. The last device
//! the player touched decides the mode: any key press switches to keyboard
//! control, a mouse click switches to mouse control.

use serde::{Deserialize, Serialize};

use super::paddle::Direction;
use super::state::{GamePhase, GameState};
use super::tick::TickInput;

/// Raw device state sampled once per frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawInput {
    pub left: bool,
    pub right: bool,
    /// Launch key (space)
    pub launch_key: bool,
    /// Pause key, edge-triggered by the caller
    pub pause_key: bool,
    /// Cursor x in playfield coordinates
    pub mouse_x: Option<f32>,
    /// Mouse button pressed this frame
    pub mouse_click: bool,
}

impl RawInput {
    fn any_key(&self) -> bool {
        self.left || self.right || self.launch_key
    }
}

/// Active control scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InputMode {
    #[default]
    Keyboard,
    Mouse,
}

/// Stateful raw-input to tick-input translation
#[derive(Debug, Clone, Default)]
pub struct InputMapper {
    mode: InputMode,
}

impl InputMapper {
    pub fn new(mode: InputMode) -> Self {
        Self { mode }
    }

    #[inline]
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn map(&mut self, raw: &RawInput) -> TickInput {
        if raw.any_key() {
            self.mode = InputMode::Keyboard;
        } else if raw.mouse_click {
            self.mode = InputMode::Mouse;
        }

        match self.mode {
            InputMode::Keyboard => TickInput {
                movement: if raw.left {
                    Some(Direction::Left)
                } else if raw.right {
                    Some(Direction::Right)
                } else {
                    None
                },
                target_x: None,
                launch: raw.launch_key,
                pause: raw.pause_key,
            },
            InputMode::Mouse => TickInput {
                movement: None,
                target_x: raw.mouse_x,
                launch: raw.mouse_click,
                pause: raw.pause_key,
            },
        }
    }
}

/// Demo player: tracks the lowest descending ball with keyboard-speed moves
///
/// Aims slightly off-centre, drifting over time, so rebounds vary instead of
/// settling into a loop.
pub fn autopilot(state: &GameState) -> TickInput {
    let mut input = TickInput::default();
    if state.phase != GamePhase::Playing && !matches!(state.phase, GamePhase::LevelBanner { .. }) {
        return input;
    }

    input.launch = state.balls.iter().any(|b| b.is_attached());

    let paddle_y = state.paddle.rect.top();
    let threat = state
        .balls
        .iter()
        .filter(|b| b.is_free() && b.vel.y > 0.0 && b.pos.y < paddle_y)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

    let target = match threat {
        Some(ball) => {
            let drift = ((state.frame / 97) % 5) as f32 - 2.0;
            ball.pos.x + drift * 0.15 * state.paddle.rect.w
        }
        None => state.settings.screen_width / 2.0,
    };

    let center = state.paddle.rect.center().x;
    let deadzone = state.paddle.speed;
    input.movement = if target < center - deadzone {
        Some(Direction::Left)
    } else if target > center + deadzone {
        Some(Direction::Right)
    } else {
        None
    };
    input
}
