// Mouse state manager

use glam::Vec2;
use std::collections::HashSet;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Tracks mouse buttons, cursor position, raw motion, and scroll
#[derive(Debug, Default)]
pub struct MouseManager {
    /// Buttons currently held down
    pressed: HashSet<MouseButton>,

    /// Buttons that went down this tick
    just_pressed: HashSet<MouseButton>,

    /// Buttons that went up this tick
    just_released: HashSet<MouseButton>,

    /// Cursor position in window coordinates
    cursor_position: Vec2,

    /// Raw motion accumulated since it was last taken
    motion: Vec2,

    /// Scroll lines accumulated since last taken
    scroll: f32,
}

impl MouseManager {
    /// Create a new mouse manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a mouse button event from winit
    pub fn process_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.pressed.insert(button) {
                    self.just_pressed.insert(button);
                }
            }
            ElementState::Released => {
                if self.pressed.remove(&button) {
                    self.just_released.insert(button);
                }
            }
        }
    }

    /// Process a cursor-moved event
    pub fn process_cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        self.cursor_position = Vec2::new(position.x as f32, position.y as f32);
    }

    /// Accumulate raw mouse motion from a device event
    pub fn process_motion(&mut self, delta: (f64, f64)) {
        self.motion += Vec2::new(delta.0 as f32, delta.1 as f32);
    }

    /// Process a scroll wheel event
    pub fn process_scroll(&mut self, delta: MouseScrollDelta) {
        self.scroll += match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 20.0,
        };
    }

    /// Check if a button is currently held down
    #[allow(dead_code)]
    pub fn is_pressed(&self, button: MouseButton) -> bool {
        self.pressed.contains(&button)
    }

    /// Check if a button went down this tick
    #[allow(dead_code)]
    pub fn just_pressed(&self, button: MouseButton) -> bool {
        self.just_pressed.contains(&button)
    }

    /// Check if a button went up this tick
    #[allow(dead_code)]
    pub fn just_released(&self, button: MouseButton) -> bool {
        self.just_released.contains(&button)
    }

    /// Cursor position in window coordinates
    #[allow(dead_code)]
    pub fn cursor_position(&self) -> Vec2 {
        self.cursor_position
    }

    /// Take the raw motion accumulated since the last call, resetting it
    pub fn take_motion(&mut self) -> Vec2 {
        std::mem::take(&mut self.motion)
    }

    /// Take the scroll accumulated since the last call, resetting it
    #[allow(dead_code)]
    pub fn take_scroll(&mut self) -> f32 {
        std::mem::take(&mut self.scroll)
    }

    /// Roll button edges over to a new tick
    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }

    /// Clear all mouse state, e.g. when the window loses focus
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.just_pressed.clear();
        self.just_released.clear();
        self.motion = Vec2::ZERO;
        self.scroll = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_press_and_release() {
        let mut mouse = MouseManager::new();
        mouse.process_button(MouseButton::Left, ElementState::Pressed);
        assert!(mouse.is_pressed(MouseButton::Left));
        assert!(mouse.just_pressed(MouseButton::Left));

        mouse.end_frame();
        mouse.process_button(MouseButton::Left, ElementState::Released);
        assert!(!mouse.is_pressed(MouseButton::Left));
        assert!(mouse.just_released(MouseButton::Left));
    }

    #[test]
    fn test_end_frame_clears_edges() {
        let mut mouse = MouseManager::new();
        mouse.process_button(MouseButton::Right, ElementState::Pressed);
        mouse.end_frame();

        assert!(mouse.is_pressed(MouseButton::Right));
        assert!(!mouse.just_pressed(MouseButton::Right));
    }

    #[test]
    fn test_motion_accumulates_until_taken() {
        let mut mouse = MouseManager::new();
        mouse.process_motion((3.0, -2.0));
        mouse.process_motion((1.0, 1.0));

        assert_eq!(mouse.take_motion(), Vec2::new(4.0, -1.0));
        assert_eq!(mouse.take_motion(), Vec2::ZERO);
    }

    #[test]
    fn test_cursor_position() {
        let mut mouse = MouseManager::new();
        mouse.process_cursor_moved(PhysicalPosition::new(640.0, 360.0));
        assert_eq!(mouse.cursor_position(), Vec2::new(640.0, 360.0));
    }

    #[test]
    fn test_scroll_lines() {
        let mut mouse = MouseManager::new();
        mouse.process_scroll(MouseScrollDelta::LineDelta(0.0, 2.0));
        mouse.process_scroll(MouseScrollDelta::LineDelta(0.0, -0.5));
        assert_eq!(mouse.take_scroll(), 1.5);
        assert_eq!(mouse.take_scroll(), 0.0);
    }

    #[test]
    fn test_reset() {
        let mut mouse = MouseManager::new();
        mouse.process_button(MouseButton::Middle, ElementState::Pressed);
        mouse.process_motion((5.0, 5.0));
        mouse.reset();

        assert!(!mouse.is_pressed(MouseButton::Middle));
        assert_eq!(mouse.take_motion(), Vec2::ZERO);
    }
}
