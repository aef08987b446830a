//! Game actions and their structured outcomes

use std::fmt::Display;

use thiserror::Error;

use super::{loc::Loc, mode::AttackMode, side::Player, state::ShotRecord};

/// A single shot: one turret firing one mode at one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KillAction {
    pub turret_index: usize,
    pub mode: AttackMode,
    pub target: Loc,
}

/// One entry of a batched kill-phase turn. A `None` mode draws the next
/// unused mode from the strategy token's pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchAction {
    pub turret_index: usize,
    pub mode: Option<AttackMode>,
    pub target: Loc,
}

/// Why the engine refused an operation. Every variant is recoverable: the
/// failed call mutates nothing and may be retried with corrected input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("game_over")]
    GameOver,
    #[error("coordinate_out_of_bounds")]
    CoordinateOutOfBounds,
    #[error("turret_index_out_of_range")]
    TurretIndexOutOfRange,
    #[error("turret_already_used_this_round")]
    TurretAlreadyUsed,
    #[error("kill_already_done_this_round")]
    KillPhaseClosed,
    #[error("strategy_token_not_available")]
    TokenNotAvailable,
    #[error("strategy_token_required")]
    TokenRequired,
    #[error("turret_locked")]
    TurretLocked,
    #[error("turret_repeated_in_batch")]
    TurretRepeatedInBatch,
    #[error("empty_actions")]
    EmptyBatch,
    #[error("mode_exceeds_token_quota")]
    ModeExceedsTokenQuota,
    #[error("no_mode_left_in_token")]
    NoModeLeftInToken,
    #[error("mode_required")]
    ModeRequired,
    #[error("must_kill_before_monitor")]
    MustKillBeforeMonitor,
    #[error("locks_must_be_3")]
    LocksMustBeThree,
}

/// Outcome of a successful `kill` call.
#[derive(Debug, Clone)]
pub struct KillReport {
    pub killed: bool,
    pub shot: ShotRecord,
}

/// Outcome of one action inside a successful `kill_batch` call.
#[derive(Debug, Clone)]
pub struct BatchActionReport {
    pub turret_index: usize,
    pub turret: Loc,
    pub mode: AttackMode,
    pub target: Loc,
    pub killed: bool,
    /// Cells the shot could have hit, in sorted order. Rendering aid only.
    pub covered: Vec<Loc>,
}

/// Outcome of a successful `kill_batch` call.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub actions: Vec<BatchActionReport>,
}

impl BatchReport {
    pub fn kills(&self) -> usize {
        self.actions.iter().filter(|a| a.killed).count()
    }
}

/// Outcome of a successful `monitor` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorReport {
    /// Winner if this lock attempt ended the game.
    pub winner: Option<Player>,
    /// Round in effect after the call returns.
    pub round: u32,
}

impl Display for KillAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "turret {} {} -> {}", self.turret_index, self.mode, self.target)
    }
}
