// Engine subsystems: lifecycle, display, loop timing, input, objects,
// physics, rendering

pub mod app;
pub mod core;
pub mod display;
pub mod error;
pub mod game_loop;
pub mod input;
pub mod objects;
pub mod physics;
pub mod renderer;
