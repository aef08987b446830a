//! Stations - Engine for the Hidden Stations deduction wargame

pub mod ai;
pub mod core;
pub mod utils;

// Re-export commonly used items
pub use core::game::Game;
