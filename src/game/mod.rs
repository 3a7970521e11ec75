// Gameplay built on top of the engine

pub mod player;

pub use player::Player;
