//! Raw input to per-frame intents
//!
//! Browser event handlers call into [`InputAdapter`] as events arrive; the
//! frame loop drains it once per frame with [`InputAdapter::take_intents`].

use crate::game::Intents;

/// What a key does, independent of game status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Jump / continue / restart depending on status
    Primary,
    Dismiss,
    Restart,
    ToggleAutopilot,
}

/// Map a `KeyboardEvent.key` value to an action
pub fn classify_key(key: &str) -> Option<KeyAction> {
    match key {
        " " | "ArrowUp" | "w" | "W" => Some(KeyAction::Primary),
        "Enter" | "Escape" => Some(KeyAction::Dismiss),
        "r" | "R" => Some(KeyAction::Restart),
        "i" | "I" => Some(KeyAction::ToggleAutopilot),
        _ => None,
    }
}

/// Accumulates input between frames
#[derive(Debug, Default)]
pub struct InputAdapter {
    /// Trigger currently down
    down: bool,
    /// A fresh press arrived since the last drain
    pressed: bool,
    dismiss: bool,
    restart: bool,
}

impl InputAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger went down. Auto-repeat while already down is not a new press.
    pub fn press(&mut self) {
        if !self.down {
            self.down = true;
            self.pressed = true;
        }
    }

    pub fn release(&mut self) {
        self.down = false;
    }

    pub fn request_dismiss(&mut self) {
        self.dismiss = true;
    }

    pub fn request_restart(&mut self) {
        self.restart = true;
    }

    /// Window lost focus: drop the held state so a missed keyup can't leave
    /// the trigger stuck down
    pub fn blur(&mut self) {
        self.down = false;
    }

    pub fn is_held(&self) -> bool {
        self.down
    }

    /// Intents for this frame. One-shot requests are consumed.
    pub fn take_intents(&mut self) -> Intents {
        let intents = Intents {
            jump_pressed: self.pressed,
            jump_held: self.down,
            dismiss: self.dismiss,
            restart: self.restart,
        };
        self.pressed = false;
        self.dismiss = false;
        self.restart = false;
        intents
    }
}
