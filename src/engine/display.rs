// Windowing/display abstraction over winit

use crate::core::color::Color;
use log::warn;
use std::sync::Arc;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::window::{CursorGrabMode, Window};

/// Wraps the native window with title, size, cursor, and clear-color state
pub struct Display {
    window: Arc<Window>,
    background: Color,
    cursor_captured: bool,
}

impl Display {
    /// Wrap an existing window
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            background: Color::BLACK,
            cursor_captured: false,
        }
    }

    /// The underlying window
    #[allow(dead_code)]
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Window title
    #[allow(dead_code)]
    pub fn title(&self) -> String {
        self.window.title()
    }

    /// Set the window title
    #[allow(dead_code)]
    pub fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }

    /// Inner size in physical pixels
    #[allow(dead_code)]
    pub fn size(&self) -> PhysicalSize<u32> {
        self.window.inner_size()
    }

    /// Request a new inner size in logical pixels
    #[allow(dead_code)]
    pub fn set_size(&mut self, width: u32, height: u32) {
        let _ = self.window.request_inner_size(LogicalSize::new(width, height));
    }

    /// Show or hide the window
    #[allow(dead_code)]
    pub fn set_visible(&mut self, visible: bool) {
        self.window.set_visible(visible);
    }

    /// The clear color the renderer uses for the frame background
    pub fn background_color(&self) -> Color {
        self.background
    }

    /// Set the frame background color
    pub fn set_background_color(&mut self, color: Color) {
        self.background = color;
    }

    /// Show or hide the cursor without capturing it
    #[allow(dead_code)]
    pub fn set_cursor_visible(&mut self, visible: bool) {
        self.window.set_cursor_visible(visible);
    }

    /// Capture the cursor for mouse-look: grab it inside the window and hide
    /// it. Falls back from locked to confined grab on platforms without
    /// pointer lock.
    pub fn capture_cursor(&mut self, capture: bool) {
        if capture {
            let grabbed = self
                .window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(err) = grabbed {
                warn!("Failed to capture cursor: {}", err);
                return;
            }
            self.window.set_cursor_visible(false);
            self.cursor_captured = true;
        } else {
            if let Err(err) = self.window.set_cursor_grab(CursorGrabMode::None) {
                warn!("Failed to release cursor: {}", err);
            }
            self.window.set_cursor_visible(true);
            self.cursor_captured = false;
        }
    }

    /// Whether the cursor is currently captured
    #[allow(dead_code)]
    pub fn is_cursor_captured(&self) -> bool {
        self.cursor_captured
    }

    /// Ask for another frame
    #[allow(dead_code)]
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}
