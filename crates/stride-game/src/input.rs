//! Input system with action-based mapping
//!
//! Raw keyboard events are mapped to actions, and the held actions are
//! collapsed into one [`InputSample`] per simulation step.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::info;
use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Game actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    /// Move forward (W by default)
    MoveForward,
    /// Move backward (S by default)
    MoveBackward,
    /// Move left (A by default)
    MoveLeft,
    /// Move right (D by default)
    MoveRight,
    /// Sprint modifier (Shift by default)
    Sprint,
    /// Dodge (Space by default)
    Dodge,
}

/// Per-step snapshot consumed by the locomotion core
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSample {
    /// Right minus left, nominally in [-1, 1]
    pub horizontal: f32,
    /// Forward minus backward, nominally in [-1, 1]
    pub vertical: f32,
    /// Sprint modifier held
    pub sprint: bool,
    /// Dodge pressed this step
    pub dodge: bool,
}

impl InputSample {
    /// Sample with only movement axes set
    pub fn axes(horizontal: f32, vertical: f32) -> Self {
        Self {
            horizontal,
            vertical,
            ..Default::default()
        }
    }

    /// Same sample with the sprint modifier held
    pub fn sprinting(mut self) -> Self {
        self.sprint = true;
        self
    }

    /// Same sample with dodge pressed
    pub fn dodging(mut self) -> Self {
        self.dodge = true;
        self
    }
}

/// Current state of all inputs for a frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Actions currently held down
    pub held: HashSet<InputAction>,
    /// Actions that were just pressed this frame
    pub just_pressed: HashSet<InputAction>,
    /// Actions that were just released this frame
    pub just_released: HashSet<InputAction>,
    /// Whether the cursor is captured (invisible, locked)
    pub cursor_captured: bool,
}

impl InputState {
    /// Create a new empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an action is currently held
    pub fn is_held(&self, action: InputAction) -> bool {
        self.held.contains(&action)
    }

    /// Check if an action was just pressed this frame
    pub fn is_just_pressed(&self, action: InputAction) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Check if an action was just released this frame
    pub fn is_just_released(&self, action: InputAction) -> bool {
        self.just_released.contains(&action)
    }

    /// Collapse held actions into axis values.
    ///
    /// Dodge is edge-triggered, sprint is level-triggered.
    pub fn sample(&self) -> InputSample {
        InputSample {
            horizontal: self.axis(InputAction::MoveRight, InputAction::MoveLeft),
            vertical: self.axis(InputAction::MoveForward, InputAction::MoveBackward),
            sprint: self.is_held(InputAction::Sprint),
            dodge: self.is_just_pressed(InputAction::Dodge),
        }
    }

    fn axis(&self, positive: InputAction, negative: InputAction) -> f32 {
        let mut value = 0.0;
        if self.is_held(positive) {
            value += 1.0;
        }
        if self.is_held(negative) {
            value -= 1.0;
        }
        value
    }

    /// Clear frame-specific data (call at end of frame)
    pub fn clear_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

/// Maps physical keys to game actions
#[derive(Debug, Clone)]
pub struct InputBindings {
    bindings: HashMap<KeyCode, InputAction>,
}

impl Default for InputBindings {
    fn default() -> Self {
        let mut bindings = Self {
            bindings: HashMap::new(),
        };

        bindings.bind(KeyCode::KeyW, InputAction::MoveForward);
        bindings.bind(KeyCode::KeyS, InputAction::MoveBackward);
        bindings.bind(KeyCode::KeyA, InputAction::MoveLeft);
        bindings.bind(KeyCode::KeyD, InputAction::MoveRight);

        // Arrow keys as alternative
        bindings.bind(KeyCode::ArrowUp, InputAction::MoveForward);
        bindings.bind(KeyCode::ArrowDown, InputAction::MoveBackward);
        bindings.bind(KeyCode::ArrowLeft, InputAction::MoveLeft);
        bindings.bind(KeyCode::ArrowRight, InputAction::MoveRight);

        bindings.bind(KeyCode::ShiftLeft, InputAction::Sprint);
        bindings.bind(KeyCode::ShiftRight, InputAction::Sprint);
        bindings.bind(KeyCode::Space, InputAction::Dodge);

        bindings
    }
}

impl InputBindings {
    /// Create new input bindings with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a key to an action, replacing any previous binding for that key
    pub fn bind(&mut self, key: KeyCode, action: InputAction) {
        self.bindings.insert(key, action);
    }

    /// Unbind a key
    pub fn unbind(&mut self, key: KeyCode) {
        self.bindings.remove(&key);
    }

    /// Get the action for a key, if any
    pub fn get_key_action(&self, key: KeyCode) -> Option<InputAction> {
        self.bindings.get(&key).copied()
    }
}

/// Input handler that processes raw events and updates state
#[derive(Debug, Default)]
pub struct InputHandler {
    /// Current input state
    pub state: InputState,
    /// Input bindings
    pub bindings: InputBindings,
}

impl InputHandler {
    /// Create a new input handler with default bindings
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a keyboard event
    pub fn handle_keyboard(&mut self, physical_key: PhysicalKey, element_state: ElementState) {
        let PhysicalKey::Code(key_code) = physical_key else {
            return;
        };
        let Some(action) = self.bindings.get_key_action(key_code) else {
            return;
        };

        match element_state {
            ElementState::Pressed => {
                if self.state.held.insert(action) {
                    self.state.just_pressed.insert(action);
                }
            }
            ElementState::Released => {
                if self.state.held.remove(&action) {
                    self.state.just_released.insert(action);
                }
            }
        }
    }

    /// Press a key (convenience for scripted input)
    pub fn press(&mut self, key: KeyCode) {
        self.handle_keyboard(PhysicalKey::Code(key), ElementState::Pressed);
    }

    /// Release a key (convenience for scripted input)
    pub fn release(&mut self, key: KeyCode) {
        self.handle_keyboard(PhysicalKey::Code(key), ElementState::Released);
    }

    /// Snapshot for the current step
    pub fn sample(&self) -> InputSample {
        self.state.sample()
    }

    /// Clear frame-specific input data
    pub fn end_frame(&mut self) {
        self.state.clear_frame();
    }

    /// Request exclusive cursor capture for the whole process.
    ///
    /// Idempotent. Returns true only on the call that performed the capture.
    pub fn request_cursor_capture(&mut self) -> bool {
        if self.state.cursor_captured {
            return false;
        }
        self.state.cursor_captured = true;
        info!("Cursor captured");
        true
    }

    /// Give the cursor back to the OS
    pub fn release_cursor(&mut self) {
        if self.state.cursor_captured {
            self.state.cursor_captured = false;
            info!("Cursor released");
        }
    }
}
