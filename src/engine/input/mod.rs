// Input handling
//
// Two small managers translate winit events into per-tick state the game can
// query without touching the event loop:
//
// - `keys`: keyboard state with pressed / just-pressed / just-released edges
// - `mouse`: button state, cursor position, and raw motion deltas for
//   mouse-look

pub mod keys;
pub mod mouse;

pub use keys::KeyManager;
pub use mouse::MouseManager;
