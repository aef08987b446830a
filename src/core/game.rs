//! Game state and rules

use anyhow::{ensure, Result};
use chrono::Utc;
use rand::prelude::*;

use super::{
    action::{
        BatchAction, BatchActionReport, BatchReport, KillAction, KillReport, MonitorReport,
        Rejection,
    },
    cellset::CellSet,
    loc::Loc,
    mode::AttackMode,
    side::Player,
    state::{KillRecord, LockRecord, PublicState, ShotRecord},
    token::StrategyToken,
    CENTER, MAX_ROUNDS, NUM_TOKENS, NUM_TURRETS,
};

/// The authoritative state machine for one game of Hidden Stations.
///
/// Each round runs a kill phase (Red fires, consuming at most one strategy
/// token) followed by a monitor phase (Blue submits one 3-cell lock attempt).
/// All rule legality lives here; agents observe only through
/// [`Game::public_state`]. Single logical caller, strictly sequential calls.
#[derive(Debug, Clone)]
pub struct Game {
    turrets: [Loc; NUM_TURRETS],
    round: u32,
    last_locks: CellSet,
    last_locks_order: Vec<Loc>,
    dead_cells: CellSet,
    game_over: bool,
    winner: Option<Player>,
    tokens_initial: Option<Vec<StrategyToken>>,
    tokens_remaining: Option<Vec<StrategyToken>>,
    kill_phase_closed: bool,
    turrets_used: [bool; NUM_TURRETS],
    dead_history: Vec<KillRecord>,
    locks_history: Vec<LockRecord>,
    shot_log: Vec<ShotRecord>,
    last_used_token_len: Option<usize>,
}

impl Game {
    /// Create a game with fixed turret positions. Turret and token lists are
    /// validated up front; a malformed setup is a construction error, not a
    /// playable state.
    pub fn new(turrets: [Loc; NUM_TURRETS], tokens: Option<Vec<StrategyToken>>) -> Result<Self> {
        for (i, turret) in turrets.iter().enumerate() {
            ensure!(turret.in_bounds(), "turret {} out of bounds: {}", i, turret);
            ensure!(*turret != CENTER, "turret {} on the neutral center cell", i);
        }
        ensure!(
            turrets[0] != turrets[1] && turrets[0] != turrets[2] && turrets[1] != turrets[2],
            "turret coordinates must be distinct"
        );
        if let Some(tokens) = &tokens {
            ensure!(
                tokens.len() == NUM_TOKENS,
                "expected {} strategy tokens, got {}", NUM_TOKENS, tokens.len()
            );
        }

        let mut dead_cells = CellSet::empty();
        dead_cells.insert(CENTER);

        Ok(Self {
            turrets,
            round: 1,
            last_locks: CellSet::empty(),
            last_locks_order: Vec::new(),
            dead_cells,
            game_over: false,
            winner: None,
            tokens_remaining: tokens.clone(),
            tokens_initial: tokens,
            kill_phase_closed: false,
            turrets_used: [false; NUM_TURRETS],
            dead_history: Vec::new(),
            locks_history: Vec::new(),
            shot_log: Vec::new(),
            last_used_token_len: None,
        })
    }

    /// Create a game with turrets drawn uniformly from the non-center cells.
    pub fn with_random_turrets<R: Rng>(
        tokens: Option<Vec<StrategyToken>>,
        rng: &mut R,
    ) -> Result<Self> {
        let mut cells: Vec<Loc> = Loc::all().filter(|l| *l != CENTER).collect();
        cells.shuffle(rng);
        Self::new([cells[0], cells[1], cells[2]], tokens)
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    /// True turret positions. Debug/rendering accessor and the Red planner's
    /// private knowledge; never reachable through [`Game::public_state`].
    pub fn reveal_turrets(&self) -> [Loc; NUM_TURRETS] {
        self.turrets
    }

    /// Every shot fired so far, hit or miss. Feeds the exported game log.
    pub fn shot_log(&self) -> &[ShotRecord] {
        &self.shot_log
    }

    pub(crate) fn tokens_initial(&self) -> Option<&[StrategyToken]> {
        self.tokens_initial.as_deref()
    }

    /// Snapshot of everything both sides may observe.
    pub fn public_state(&self) -> PublicState {
        let turrets_locked = if self.game_over {
            [false; NUM_TURRETS]
        } else {
            [
                self.last_locks.contains(&self.turrets[0]),
                self.last_locks.contains(&self.turrets[1]),
                self.last_locks.contains(&self.turrets[2]),
            ]
        };

        // The token nominally scheduled for this round, if Red has not spent
        // it yet.
        let current_round_token = self.tokens_initial.as_ref().and_then(|initial| {
            let token = initial.get(self.round as usize - 1)?;
            let remaining = self.tokens_remaining.as_ref()?;
            remaining.contains(token).then(|| token.clone())
        });

        PublicState {
            grid_len: super::GRID_LEN,
            round: self.round,
            last_locks: self.last_locks_order.clone(),
            dead_cells: self.dead_cells.iter().collect(),
            game_over: self.game_over,
            winner: self.winner,
            tokens_remaining: self.tokens_remaining.clone(),
            current_round_token,
            turrets_locked,
            turrets_used_this_round: self.turrets_used,
            dead_history: self.dead_history.clone(),
            locks_history: self.locks_history.clone(),
            last_used_token_len: self.last_used_token_len,
        }
    }

    /// Fire one turret at one target.
    ///
    /// With token play active, supplying a token closes the kill phase and
    /// consumes that token; omitting it fires one step of a progressive
    /// sequence and leaves the phase open. Without token play every call
    /// closes the phase. The firing turret is marked used either way.
    pub fn kill(
        &mut self,
        action: KillAction,
        token: Option<&StrategyToken>,
    ) -> Result<KillReport, Rejection> {
        self.ensure_running()?;

        if self.kill_phase_closed {
            // Progressive token consumption keeps the phase open for further
            // tokenless shots; everything else is done for the round.
            let stepwise = self.tokens_remaining.is_some() && token.is_none();
            if !stepwise {
                return Err(Rejection::KillPhaseClosed);
            }
        }

        let turret = *self
            .turrets
            .get(action.turret_index)
            .ok_or(Rejection::TurretIndexOutOfRange)?;
        if !action.target.in_bounds() {
            return Err(Rejection::CoordinateOutOfBounds);
        }
        if self.turrets_used[action.turret_index] {
            return Err(Rejection::TurretAlreadyUsed);
        }
        if let Some(token) = token {
            let remaining = self.tokens_remaining.as_ref().ok_or(Rejection::TokenNotAvailable)?;
            if !remaining.contains(token) {
                return Err(Rejection::TokenNotAvailable);
            }
        }

        let (killed, rationale) = self.resolve_shot(&turret, action.mode, &action.target);

        self.turrets_used[action.turret_index] = true;
        let shot = ShotRecord {
            round: self.round,
            turret_index: action.turret_index,
            turret,
            mode: action.mode,
            target: action.target,
            killed,
            rationale,
            timestamp: Utc::now(),
        };
        self.shot_log.push(shot.clone());

        if killed {
            self.dead_cells.insert(action.target);
            self.dead_history.push(KillRecord {
                round: self.round,
                target: action.target,
                mode: action.mode,
            });
        }

        let tokens_active = self.tokens_remaining.is_some();
        match token {
            Some(token) if tokens_active => {
                // Final shot of the round: spend the token.
                self.last_used_token_len = Some(token.len());
                self.remove_token(token);
                self.kill_phase_closed = true;
            }
            None if tokens_active => {
                // Step of a progressive sequence; phase stays open.
                self.last_used_token_len = Some(1);
            }
            _ => {
                self.last_used_token_len = Some(1);
                self.kill_phase_closed = true;
            }
        }

        Ok(KillReport { killed, shot })
    }

    /// Fire several turrets in one atomic turn.
    ///
    /// With token play active a token is mandatory and its characters form
    /// the round's mode pool: actions with an explicit mode consume a
    /// matching pool entry, actions without one draw FIFO. All validation
    /// happens before any state changes.
    pub fn kill_batch(
        &mut self,
        actions: &[BatchAction],
        token: Option<&StrategyToken>,
    ) -> Result<BatchReport, Rejection> {
        self.ensure_running()?;
        if self.kill_phase_closed {
            return Err(Rejection::KillPhaseClosed);
        }
        if actions.is_empty() {
            return Err(Rejection::EmptyBatch);
        }

        let mut mode_pool: Option<Vec<AttackMode>> = match (&self.tokens_remaining, token) {
            (Some(remaining), Some(token)) => {
                if !remaining.contains(token) {
                    return Err(Rejection::TokenNotAvailable);
                }
                Some(token.modes())
            }
            (Some(_), None) => return Err(Rejection::TokenRequired),
            (None, Some(_)) => return Err(Rejection::TokenNotAvailable),
            (None, None) => None,
        };

        // Validation pass: resolve every action's mode and turret before
        // touching any state.
        let mut filled: Vec<KillAction> = Vec::with_capacity(actions.len());
        for action in actions {
            let turret = *self
                .turrets
                .get(action.turret_index)
                .ok_or(Rejection::TurretIndexOutOfRange)?;
            if !action.target.in_bounds() {
                return Err(Rejection::CoordinateOutOfBounds);
            }
            if self.last_locks.contains(&turret) {
                return Err(Rejection::TurretLocked);
            }
            if filled.iter().any(|f| f.turret_index == action.turret_index) {
                return Err(Rejection::TurretRepeatedInBatch);
            }

            let mode = match &mut mode_pool {
                Some(pool) => match action.mode {
                    Some(mode) => {
                        let at = pool
                            .iter()
                            .position(|m| *m == mode)
                            .ok_or(Rejection::ModeExceedsTokenQuota)?;
                        pool.remove(at)
                    }
                    None => {
                        if pool.is_empty() {
                            return Err(Rejection::NoModeLeftInToken);
                        }
                        pool.remove(0)
                    }
                },
                None => action.mode.ok_or(Rejection::ModeRequired)?,
            };

            filled.push(KillAction {
                turret_index: action.turret_index,
                mode,
                target: action.target,
            });
        }

        // Execution pass: every action resolves against the same pre-batch
        // turret layout, dead cells accumulate as shots land.
        let mut reports = Vec::with_capacity(filled.len());
        for action in &filled {
            let turret = self.turrets[action.turret_index];
            let (killed, rationale) = self.resolve_shot(&turret, action.mode, &action.target);

            self.turrets_used[action.turret_index] = true;
            self.shot_log.push(ShotRecord {
                round: self.round,
                turret_index: action.turret_index,
                turret,
                mode: action.mode,
                target: action.target,
                killed,
                rationale,
                timestamp: Utc::now(),
            });

            if killed {
                self.dead_cells.insert(action.target);
                self.dead_history.push(KillRecord {
                    round: self.round,
                    target: action.target,
                    mode: action.mode,
                });
            }

            let mut covered = action.mode.coverage(&turret);
            covered.sort();
            reports.push(BatchActionReport {
                turret_index: action.turret_index,
                turret,
                mode: action.mode,
                target: action.target,
                killed,
                covered,
            });
        }

        self.kill_phase_closed = true;
        match token {
            Some(token) if self.tokens_remaining.is_some() => {
                self.last_used_token_len = Some(token.len());
                self.remove_token(token);
            }
            _ => self.last_used_token_len = Some(reports.len()),
        }

        Ok(BatchReport { actions: reports })
    }

    /// Spend a token without firing, closing the kill phase. Used when no
    /// turret has a shot worth taking.
    pub fn consume_token(&mut self, token: &StrategyToken) -> Result<(), Rejection> {
        self.ensure_running()?;
        let remaining = self.tokens_remaining.as_ref().ok_or(Rejection::TokenNotAvailable)?;
        if !remaining.contains(token) {
            return Err(Rejection::TokenNotAvailable);
        }
        self.last_used_token_len = Some(token.len());
        self.remove_token(token);
        self.kill_phase_closed = true;
        Ok(())
    }

    /// Blue's lock attempt for the round. A set-exact match of the true
    /// turret positions wins the game for Blue; a miss on the final round
    /// hands it to Red; otherwise the next round begins.
    pub fn monitor(&mut self, locks: [Loc; NUM_TURRETS]) -> Result<MonitorReport, Rejection> {
        self.ensure_running()?;
        if !self.kill_phase_closed {
            return Err(Rejection::MustKillBeforeMonitor);
        }
        for lock in &locks {
            if !lock.in_bounds() {
                return Err(Rejection::CoordinateOutOfBounds);
            }
        }
        let lock_set: CellSet = locks.iter().copied().collect();
        if lock_set.len() != NUM_TURRETS {
            return Err(Rejection::LocksMustBeThree);
        }

        self.last_locks = lock_set;
        self.last_locks_order = locks.to_vec();
        self.locks_history.push(LockRecord { round: self.round, locks });

        let turret_set: CellSet = self.turrets.iter().copied().collect();
        if lock_set == turret_set {
            self.game_over = true;
            self.winner = Some(Player::Blue);
            return Ok(MonitorReport { winner: self.winner, round: self.round });
        }
        if self.round >= MAX_ROUNDS {
            self.game_over = true;
            self.winner = Some(Player::Red);
            return Ok(MonitorReport { winner: self.winner, round: self.round });
        }

        self.round += 1;
        self.kill_phase_closed = false;
        self.turrets_used = [false; NUM_TURRETS];
        Ok(MonitorReport { winner: None, round: self.round })
    }

    fn ensure_running(&self) -> Result<(), Rejection> {
        if self.game_over {
            Err(Rejection::GameOver)
        } else {
            Ok(())
        }
    }

    /// Hit resolution: the geometric test, then the no-self-harm and
    /// no-friendly-fire overrides. Locked cells are fair targets.
    fn resolve_shot(&self, turret: &Loc, mode: AttackMode, target: &Loc) -> (bool, String) {
        let geometric = mode.covers(turret, target);
        let mut rationale = match mode {
            AttackMode::Cross => format!(
                "cross: turret {} target {} same_row={} same_col={}",
                turret, target, turret.x == target.x, turret.y == target.y,
            ),
            AttackMode::Round => format!(
                "round: turret {} target {} dx={} dy={} adjacent={}",
                turret, target,
                (turret.x - target.x).abs(),
                (turret.y - target.y).abs(),
                geometric,
            ),
        };

        let mut killed = geometric;
        if target == turret {
            killed = false;
            rationale.push_str(" -> firing turret's own cell, no kill");
        } else if killed && self.turrets.contains(target) {
            killed = false;
            rationale.push_str(" -> friendly turret cell, no kill");
        }
        (killed, rationale)
    }

    fn remove_token(&mut self, token: &StrategyToken) {
        if let Some(remaining) = &mut self.tokens_remaining {
            if let Some(at) = remaining.iter().position(|t| t == token) {
                remaining.remove(at);
            }
        }
    }
}
