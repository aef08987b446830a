//! Core game representations and rules

pub mod action;
pub mod cellset;
pub mod display;
pub mod game;
pub mod loc;
pub mod mode;
pub mod side;
pub mod state;
pub mod token;

pub use action::{BatchAction, BatchReport, KillAction, KillReport, MonitorReport, Rejection};
pub use cellset::CellSet;
pub use game::Game;
pub use loc::Loc;
pub use mode::AttackMode;
pub use side::Player;
pub use state::{KillRecord, LockRecord, PublicState, ShotRecord};
pub use token::StrategyToken;

/// Side length of the square board.
pub const GRID_LEN: usize = 5;

/// Number of hidden turrets Red defends.
pub const NUM_TURRETS: usize = 3;

/// Number of strategy tokens Red starts with when token play is enabled.
pub const NUM_TOKENS: usize = 5;

/// Rounds before Red wins by default.
pub const MAX_ROUNDS: u32 = 5;

/// The permanent neutral cell at the board center.
pub const CENTER: Loc = Loc { x: 2, y: 2 };
