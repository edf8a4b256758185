// ==============================================================================
// input.rs — RAW KEY STATE -> InputIntent
// ------------------------------------------------------------------------------
// Bindings follow the reference controls:
//   W / ArrowUp     accelerate forward
//   S / ArrowDown   accelerate reverse
//   A / ArrowLeft   steer left
//   D / ArrowRight  steer right
//   Space           brake
// Key repeat and debouncing stay with whoever captures the events.
// ==============================================================================

use crate::force_model::InputIntent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Forward,
    Reverse,
    Left,
    Right,
    Brake,
}

impl Control {
    /// Case-insensitive; `None` for unbound keys.
    pub fn from_key(key: &str) -> Option<Self> {
        if key == " " {
            return Some(Control::Brake);
        }
        match key.to_ascii_lowercase().as_str() {
            "w" | "arrowup" => Some(Control::Forward),
            "s" | "arrowdown" => Some(Control::Reverse),
            "a" | "arrowleft" => Some(Control::Left),
            "d" | "arrowright" => Some(Control::Right),
            "space" | "spacebar" => Some(Control::Brake),
            _ => None,
        }
    }
}

/// Held state per control. Last press/release wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardState {
    intent: InputIntent,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the key is not bound.
    pub fn set_key(&mut self, key: &str, pressed: bool) -> bool {
        let Some(control) = Control::from_key(key) else { return false };
        let flag = match control {
            Control::Forward => &mut self.intent.accelerate_forward,
            Control::Reverse => &mut self.intent.accelerate_reverse,
            Control::Left => &mut self.intent.steer_left,
            Control::Right => &mut self.intent.steer_right,
            Control::Brake => &mut self.intent.brake,
        };
        *flag = pressed;
        true
    }

    /// Replace all flags at once (clients that send the full snapshot).
    pub fn set_intent(&mut self, intent: InputIntent) {
        self.intent = intent;
    }

    #[cfg(test)]
    pub fn release_all(&mut self) {
        self.intent = InputIntent::default();
    }

    pub fn intent(&self) -> InputIntent {
        self.intent
    }
}
