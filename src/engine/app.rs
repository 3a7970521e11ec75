// Application callback contract
//
// The engine owns the loop; the game implements `Application` and receives a
// `Context` borrowing every manager during each callback.

use super::display::Display;
use super::input::{KeyManager, MouseManager};
use super::objects::ObjectManager;
use super::physics::PhysicsManager;
use super::renderer::{Camera, RenderSettings};

/// Engine state handed to application callbacks
pub struct Context<'a> {
    pub display: &'a mut Display,
    pub camera: &'a mut Camera,
    pub keys: &'a KeyManager,
    pub mouse: &'a MouseManager,
    pub physics: &'a mut PhysicsManager,
    pub objects: &'a mut ObjectManager,
    pub render_settings: &'a mut RenderSettings,
    pub(crate) exit: &'a mut bool,
}

impl Context<'_> {
    /// Stop the engine after the current frame
    pub fn request_exit(&mut self) {
        *self.exit = true;
    }
}

/// The game's hooks into the engine loop
pub trait Application {
    /// Called once after the window, GPU, and managers are ready
    fn init(&mut self, ctx: &mut Context);

    /// Called once per fixed update with the timestep in seconds; skipped
    /// while `is_paused` returns true (engine managers keep ticking)
    fn tick(&mut self, ctx: &mut Context, delta: f32);

    /// Called once per frame right before the frame is drawn
    fn render(&mut self, _ctx: &mut Context) {}

    /// Report whether game updates should be skipped
    fn is_paused(&self) -> bool {
        false
    }
}
