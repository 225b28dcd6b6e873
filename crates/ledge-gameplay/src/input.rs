//! Input polling for player controls.
//!
//! Key-down state is sampled once per tick. Edge detection ("just pressed")
//! compares the current sample against the previous one.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur in the input system.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Key name not recognized
    #[error("unknown key: {0}")]
    UnknownKey(String),
}

/// Keys the game polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// A key
    A,
    /// D key
    D,
    /// Space bar
    Space,
    /// F1 function key
    F1,
}

impl KeyCode {
    /// Every polled key.
    pub const ALL: [KeyCode; 6] = [
        KeyCode::Left,
        KeyCode::Right,
        KeyCode::A,
        KeyCode::D,
        KeyCode::Space,
        KeyCode::F1,
    ];
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyCode::Left => "Left",
            KeyCode::Right => "Right",
            KeyCode::A => "A",
            KeyCode::D => "D",
            KeyCode::Space => "Space",
            KeyCode::F1 => "F1",
        };
        f.write_str(name)
    }
}

impl FromStr for KeyCode {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyCode::ALL
            .into_iter()
            .find(|key| key.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| InputError::UnknownKey(s.to_string()))
    }
}

/// State of a button (pressed, just pressed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    /// Currently held down
    pub pressed: bool,
    /// Went down this frame
    pub just_pressed: bool,
}

impl ButtonState {
    /// Creates a released button.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pressed: false,
            just_pressed: false,
        }
    }

    /// Records this frame's sample, deriving the edges from the last one.
    pub fn update(&mut self, is_pressed: bool) {
        self.just_pressed = is_pressed && !self.pressed;
        self.pressed = is_pressed;
    }

    /// Clears the per-frame edge.
    pub fn clear_frame(&mut self) {
        self.just_pressed = false;
    }
}

/// Game actions that can be bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Accelerate left
    MoveLeft,
    /// Accelerate right
    MoveRight,
    /// Jump (held for a higher jump)
    Jump,
    /// Toggle collision outlines
    ToggleDebug,
}

/// Processed input for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Input {
    /// Horizontal intent: -1, 0 or 1
    pub movement: f32,
    /// Jump held
    pub jump: bool,
    /// Debug toggle went down this tick
    pub toggle_debug_pressed: bool,
}

impl Input {
    /// Creates an idle input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Input holding left or right.
    #[must_use]
    pub fn moving(direction: f32) -> Self {
        Self {
            movement: direction.signum() * f32::from(direction != 0.0),
            ..Self::default()
        }
    }

    /// Same input with jump held or released.
    #[must_use]
    pub fn with_jump(mut self, jump: bool) -> Self {
        self.jump = jump;
        self
    }

    /// Whether there is any horizontal intent.
    #[must_use]
    pub fn has_movement(&self) -> bool {
        self.movement != 0.0
    }
}

/// Key binding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBinding {
    /// Primary key
    pub primary: KeyCode,
    /// Optional alternative key
    pub secondary: Option<KeyCode>,
}

impl KeyBinding {
    /// Binding with a single key.
    #[must_use]
    pub const fn new(primary: KeyCode) -> Self {
        Self {
            primary,
            secondary: None,
        }
    }

    /// Binding with two keys.
    #[must_use]
    pub const fn with_secondary(primary: KeyCode, secondary: KeyCode) -> Self {
        Self {
            primary,
            secondary: Some(secondary),
        }
    }

    /// Whether `key` triggers this binding.
    #[must_use]
    pub fn matches(&self, key: KeyCode) -> bool {
        self.primary == key || self.secondary == Some(key)
    }
}

/// Tracks raw key state and turns it into [`Input`].
#[derive(Debug)]
pub struct InputManager {
    key_states: HashMap<KeyCode, ButtonState>,
    bindings: HashMap<Action, KeyBinding>,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    /// Creates a manager with the default bindings.
    #[must_use]
    pub fn new() -> Self {
        let mut manager = Self {
            key_states: HashMap::new(),
            bindings: HashMap::new(),
        };
        manager.set_default_bindings();
        manager
    }

    /// Arrows or A/D to move, Space to jump, F1 for collision outlines.
    pub fn set_default_bindings(&mut self) {
        self.bindings.clear();
        self.bindings.insert(
            Action::MoveLeft,
            KeyBinding::with_secondary(KeyCode::Left, KeyCode::A),
        );
        self.bindings.insert(
            Action::MoveRight,
            KeyBinding::with_secondary(KeyCode::Right, KeyCode::D),
        );
        self.bindings
            .insert(Action::Jump, KeyBinding::new(KeyCode::Space));
        self.bindings
            .insert(Action::ToggleDebug, KeyBinding::new(KeyCode::F1));
    }

    /// Current binding for an action.
    #[must_use]
    pub fn get_binding(&self, action: Action) -> Option<&KeyBinding> {
        self.bindings.get(&action)
    }

    /// Records one key's state for this frame.
    pub fn update_key(&mut self, key: KeyCode, is_pressed: bool) {
        self.key_states.entry(key).or_default().update(is_pressed);
    }

    /// Records a full keyboard sample: listed keys are down, all others up.
    pub fn poll(&mut self, keys_down: &[KeyCode]) {
        for key in KeyCode::ALL {
            self.update_key(key, keys_down.contains(&key));
        }
    }

    /// Clears the per-frame edges.
    pub fn end_frame(&mut self) {
        for state in self.key_states.values_mut() {
            state.clear_frame();
        }
    }

    /// Whether a key is held.
    #[must_use]
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.key_states.get(&key).is_some_and(|state| state.pressed)
    }

    /// Whether a key went down this frame.
    #[must_use]
    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.key_states
            .get(&key)
            .is_some_and(|state| state.just_pressed)
    }

    /// Whether any key bound to an action is held.
    #[must_use]
    pub fn is_action_pressed(&self, action: Action) -> bool {
        self.bindings.get(&action).is_some_and(|binding| {
            self.is_key_pressed(binding.primary)
                || binding
                    .secondary
                    .is_some_and(|key| self.is_key_pressed(key))
        })
    }

    /// Whether any key bound to an action went down this frame.
    #[must_use]
    pub fn is_action_just_pressed(&self, action: Action) -> bool {
        self.bindings.get(&action).is_some_and(|binding| {
            self.is_key_just_pressed(binding.primary)
                || binding
                    .secondary
                    .is_some_and(|key| self.is_key_just_pressed(key))
        })
    }

    /// Builds this frame's gameplay input. Left wins when both directions
    /// are held.
    #[must_use]
    pub fn process(&self) -> Input {
        let movement = if self.is_action_pressed(Action::MoveLeft) {
            -1.0
        } else if self.is_action_pressed(Action::MoveRight) {
            1.0
        } else {
            0.0
        };

        Input {
            movement,
            jump: self.is_action_pressed(Action::Jump),
            toggle_debug_pressed: self.is_action_just_pressed(Action::ToggleDebug),
        }
    }
}
