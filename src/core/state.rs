//! Public snapshots and history records

use chrono::{DateTime, Utc};

use super::{loc::Loc, mode::AttackMode, side::Player, token::StrategyToken, NUM_TURRETS};

/// One confirmed kill: the only attack evidence Blue ever sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KillRecord {
    pub round: u32,
    pub target: Loc,
    pub mode: AttackMode,
}

/// One submitted lock attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockRecord {
    pub round: u32,
    pub locks: [Loc; NUM_TURRETS],
}

impl LockRecord {
    /// Set equality against another 3-cell collection.
    pub fn matches(&self, other: &[Loc]) -> bool {
        other.len() == NUM_TURRETS
            && self.locks.iter().all(|l| other.contains(l))
            && other.iter().all(|l| self.locks.contains(l))
    }
}

/// Full record of one shot, hit or miss. Feeds the exported game log; never
/// part of the public snapshot.
#[derive(Debug, Clone)]
pub struct ShotRecord {
    pub round: u32,
    pub turret_index: usize,
    pub turret: Loc,
    pub mode: AttackMode,
    pub target: Loc,
    pub killed: bool,
    /// Human-readable hit-test rationale.
    pub rationale: String,
    pub timestamp: DateTime<Utc>,
}

/// Immutable view of everything both sides are allowed to observe. The only
/// channel between the engine and the decision agents; true turret positions
/// never appear here.
#[derive(Debug, Clone)]
pub struct PublicState {
    pub grid_len: usize,
    pub round: u32,
    pub last_locks: Vec<Loc>,
    pub dead_cells: Vec<Loc>,
    pub game_over: bool,
    pub winner: Option<Player>,
    /// `None` when token play is disabled.
    pub tokens_remaining: Option<Vec<StrategyToken>>,
    /// The unspent token nominally scheduled for this round, if any.
    pub current_round_token: Option<StrategyToken>,
    /// Per-turret: does the latest lock attempt sit on this turret? All false
    /// once the game is over.
    pub turrets_locked: [bool; NUM_TURRETS],
    pub turrets_used_this_round: [bool; NUM_TURRETS],
    pub dead_history: Vec<KillRecord>,
    pub locks_history: Vec<LockRecord>,
    pub last_used_token_len: Option<usize>,
}

impl PublicState {
    pub fn is_dead(&self, loc: &Loc) -> bool {
        self.dead_cells.contains(loc)
    }

    /// Confirmed kills recorded during the current round.
    pub fn kills_this_round(&self) -> usize {
        let round = self.round;
        self.dead_history.iter().filter(|k| k.round == round).count()
    }
}
