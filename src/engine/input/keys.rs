// Keyboard state manager

use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Tracks per-tick keyboard state built from winit key events
#[derive(Debug, Default)]
pub struct KeyManager {
    /// Keys currently held down
    pressed: HashSet<KeyCode>,

    /// Keys that went down this tick
    just_pressed: HashSet<KeyCode>,

    /// Keys that went up this tick
    just_released: HashSet<KeyCode>,

    /// Keys held down during the previous tick
    previous_pressed: HashSet<KeyCode>,
}

impl KeyManager {
    /// Create a new key manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a keyboard event from winit
    pub fn process_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(key_code) = event.physical_key {
            self.on_key(key_code, event.state, event.repeat);
        }
    }

    fn on_key(&mut self, key: KeyCode, state: ElementState, repeat: bool) {
        match state {
            ElementState::Pressed => {
                // OS key-repeat events are not fresh presses
                if !repeat {
                    self.press(key);
                }
            }
            ElementState::Released => {
                self.release(key);
            }
        }
    }

    /// Check if a key is currently held down
    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// Check if a key went down this tick
    pub fn just_pressed(&self, key: KeyCode) -> bool {
        self.just_pressed.contains(&key)
    }

    /// Check if a key went up this tick
    #[allow(dead_code)]
    pub fn just_released(&self, key: KeyCode) -> bool {
        self.just_released.contains(&key)
    }

    /// Check if a key has been held for more than one tick
    #[allow(dead_code)]
    pub fn is_held(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key) && self.previous_pressed.contains(&key)
    }

    /// All currently held keys
    #[allow(dead_code)]
    pub fn pressed_keys(&self) -> Vec<KeyCode> {
        self.pressed.iter().copied().collect()
    }

    /// Roll the state over to a new tick; call once after all events and
    /// queries for the tick are done
    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
        self.previous_pressed = self.pressed.clone();
    }

    /// Clear all key state, e.g. when the window loses focus
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.just_pressed.clear();
        self.just_released.clear();
        self.previous_pressed.clear();
    }

    pub(crate) fn press(&mut self, key: KeyCode) {
        if self.pressed.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub(crate) fn release(&mut self, key: KeyCode) {
        if self.pressed.remove(&key) {
            self.just_released.insert(key);
        }
    }
}
