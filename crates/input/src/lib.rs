//! Keyboard input for the driving game: held keys, per-frame edges and latched actions.

use std::collections::HashSet;

/// Single-trigger actions that stay latched until the frame loop resets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Talk, pick up, read, deliver (E or Space).
    Interact,
    /// Open/close the inventory panel (I).
    ToggleInventory,
    /// Open/close the help panel (H).
    ToggleHelp,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Interact, Action::ToggleInventory, Action::ToggleHelp];

    /// Whether `key` triggers this action.
    pub fn is_bound_to(self, key: KeyCode) -> bool {
        match self {
            Action::Interact => matches!(key, KeyCode::KeyE | KeyCode::Space),
            Action::ToggleInventory => key == KeyCode::KeyI,
            Action::ToggleHelp => key == KeyCode::KeyH,
        }
    }

    fn index(self) -> usize {
        match self {
            Action::Interact => 0,
            Action::ToggleInventory => 1,
            Action::ToggleHelp => 2,
        }
    }
}

/// Fixed key bindings.
pub mod bindings {
    use super::KeyCode;

    pub const FORWARD: [KeyCode; 2] = [KeyCode::KeyW, KeyCode::ArrowUp];
    pub const BACK: [KeyCode; 2] = [KeyCode::KeyS, KeyCode::ArrowDown];
    pub const LEFT: [KeyCode; 2] = [KeyCode::KeyA, KeyCode::ArrowLeft];
    pub const RIGHT: [KeyCode; 2] = [KeyCode::KeyD, KeyCode::ArrowRight];
    pub const JUMP: KeyCode = KeyCode::Space;
    pub const SAVE: KeyCode = KeyCode::F5;
    pub const LOAD: KeyCode = KeyCode::F9;
}

/// Manages input state between frames.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed since the last reset.
    keys_pressed: HashSet<KeyCode>,
    /// Latched actions, indexed by [`Action::index`].
    latched: [bool; 3],
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a keyboard event. Returns true when the platform default for the
    /// key (page scroll on Space, browser-style refresh on F5) must be suppressed.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) -> bool {
        match state {
            ElementState::Pressed => {
                let fresh = self.keys_held.insert(key);
                if fresh {
                    self.keys_pressed.insert(key);
                    for action in Action::ALL {
                        if action.is_bound_to(key) && !self.latched[action.index()] {
                            self.latched[action.index()] = true;
                            log::trace!("{:?} latched by {:?}", action, key);
                        }
                    }
                }
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
                for action in Action::ALL {
                    if action.is_bound_to(key) {
                        self.latched[action.index()] = false;
                    }
                }
            }
        }
        matches!(key, bindings::JUMP | bindings::SAVE | bindings::LOAD)
    }

    /// Collapse latched actions and per-frame edges. Call once per processed frame.
    pub fn reset_action_flags(&mut self) {
        self.latched = [false; 3];
        self.keys_pressed.clear();
    }

    /// Release everything (window lost focus).
    pub fn clear(&mut self) {
        self.keys_held.clear();
        self.reset_action_flags();
    }

    // Query methods

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key went down since the last reset.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Whether `action` was triggered and not yet reset.
    pub fn was_action_pressed(&self, action: Action) -> bool {
        self.latched[action.index()]
    }

    fn any_held(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|k| self.is_key_held(*k))
    }

    /// Accelerate (W / ↑).
    pub fn is_forward_held(&self) -> bool {
        self.any_held(&bindings::FORWARD)
    }

    /// Brake / reverse (S / ↓).
    pub fn is_back_held(&self) -> bool {
        self.any_held(&bindings::BACK)
    }

    /// Steering input: +1 left, -1 right, 0 none. Right wins when both are held.
    pub fn turn_direction(&self) -> f32 {
        let mut turn = 0.0;
        if self.any_held(&bindings::LEFT) {
            turn = 1.0;
        }
        if self.any_held(&bindings::RIGHT) {
            turn = -1.0;
        }
        turn
    }

    /// Check if jump is held (Space).
    pub fn is_jump_held(&self) -> bool {
        self.is_key_held(bindings::JUMP)
    }

    /// Save request this frame (F5).
    pub fn is_save_pressed(&self) -> bool {
        self.is_key_pressed(bindings::SAVE)
    }

    /// Load request this frame (F9).
    pub fn is_load_pressed(&self) -> bool {
        self.is_key_pressed(bindings::LOAD)
    }

    /// Digit 1-9 pressed this frame, as a zero-based index.
    pub fn pressed_digit(&self) -> Option<usize> {
        const DIGITS: [KeyCode; 9] = [
            KeyCode::Digit1,
            KeyCode::Digit2,
            KeyCode::Digit3,
            KeyCode::Digit4,
            KeyCode::Digit5,
            KeyCode::Digit6,
            KeyCode::Digit7,
            KeyCode::Digit8,
            KeyCode::Digit9,
        ];
        DIGITS.iter().position(|k| self.is_key_pressed(*k))
    }
}

// Re-export for convenience
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;
