//! Blue's deduction engine: hypothesis enumeration and elimination
//!
//! Blue never sees the turrets. Every confirmed kill constrains where they
//! can be: some hypothesized turret other than the destroyed cell itself must
//! have been able to make that shot. Enumerate every 3-cell hypothesis,
//! discard the ones any kill contradicts, discard lock sets that already
//! failed, then rank the survivors by how much of the kill history they
//! explain.

use lazy_static::lazy_static;

use crate::core::{
    cellset::CellSet,
    loc::Loc,
    state::{KillRecord, PublicState},
    CENTER, NUM_TURRETS,
};

lazy_static! {
    /// Every 3-combination of non-center cells, row-major enumeration order.
    /// Dead cells are filtered per call; the combinatorial skeleton never
    /// changes.
    static ref ALL_TRIPLES: Vec<[Loc; NUM_TURRETS]> = {
        let cells: Vec<Loc> = Loc::all().filter(|l| *l != CENTER).collect();
        let mut triples = Vec::new();
        for i in 0..cells.len() {
            for j in i + 1..cells.len() {
                for k in j + 1..cells.len() {
                    triples.push([cells[i], cells[j], cells[k]]);
                }
            }
        }
        triples
    };
}

/// Blue's lock-guessing agent. Deterministic: ties break by enumeration
/// order, so identical histories always produce identical guesses.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeductionAi;

impl DeductionAi {
    pub fn new() -> Self {
        Self
    }

    /// Produce the round's 3-cell lock guess. Never fails and never returns
    /// a malformed triple: each filter stage is dropped in turn if it would
    /// leave nothing to choose from.
    pub fn decide(&self, state: &PublicState) -> [Loc; NUM_TURRETS] {
        let dead: CellSet = state.dead_cells.iter().copied().collect();

        // Hypotheses must live on cells that are still standing; a destroyed
        // cell cannot hold a turret (turret cells never die).
        let live: Vec<&[Loc; NUM_TURRETS]> = ALL_TRIPLES
            .iter()
            .filter(|t| t.iter().all(|l| !dead.contains(l)))
            .collect();

        // Core deduction: every recorded kill needs an explanation.
        let by_dead: Vec<&[Loc; NUM_TURRETS]> = live
            .iter()
            .copied()
            .filter(|t| state.dead_history.iter().all(|k| explains_kill(t, k)))
            .collect();

        // A lock set that already failed to win cannot be the truth.
        let by_locks: Vec<&[Loc; NUM_TURRETS]> = by_dead
            .iter()
            .copied()
            .filter(|t| !state.locks_history.iter().any(|r| r.matches(*t)))
            .collect();

        // Anomaly heuristic: fewer confirmed kills than attacks this round
        // suggests Red wasted shots on cells Blue had locked, so favor
        // hypotheses overlapping the last lock set. Only applies when a
        // token length is actually on record.
        let anomalous = state
            .last_used_token_len
            .is_some_and(|len| state.kills_this_round() < len);
        let by_anomaly: Vec<&[Loc; NUM_TURRETS]> = if anomalous {
            let last_locks: CellSet = state.last_locks.iter().copied().collect();
            by_locks
                .iter()
                .copied()
                .filter(|t| t.iter().any(|l| last_locks.contains(l)))
                .collect()
        } else {
            by_locks.clone()
        };

        // Relaxation ladder: widen until something survives.
        for stage in [&by_anomaly, &by_locks, &by_dead, &live] {
            if let Some(best) = best_scoring(stage, &state.dead_history) {
                return *best;
            }
        }

        // Unreachable under the game rules (at most 3 kills per round keeps
        // at least 3 cells alive), but a guess beats a panic.
        ALL_TRIPLES[0]
    }
}

/// Could some hypothesized turret, other than one sitting on the destroyed
/// cell itself, have made this kill?
fn explains_kill(triple: &[Loc; NUM_TURRETS], kill: &KillRecord) -> bool {
    triple.iter().any(|t| kill.mode.covers(t, &kill.target))
}

/// Maximum-explanatory-power score: over the whole kill history, how many of
/// the hypothesis' cells could have fired each recorded shot.
fn score(triple: &[Loc; NUM_TURRETS], history: &[KillRecord]) -> usize {
    history
        .iter()
        .map(|k| triple.iter().filter(|t| k.mode.covers(t, &k.target)).count())
        .sum()
}

/// Highest-scoring triple, first in enumeration order among ties.
fn best_scoring<'a>(
    candidates: &[&'a [Loc; NUM_TURRETS]],
    history: &[KillRecord],
) -> Option<&'a [Loc; NUM_TURRETS]> {
    let mut best: Option<(&[Loc; NUM_TURRETS], usize)> = None;
    for &triple in candidates {
        let s = score(triple, history);
        if best.is_none_or(|(_, bs)| s > bs) {
            best = Some((triple, s));
        }
    }
    best.map(|(t, _)| t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        state::LockRecord,
        AttackMode,
    };

    fn empty_state() -> PublicState {
        PublicState {
            grid_len: crate::core::GRID_LEN,
            round: 1,
            last_locks: Vec::new(),
            dead_cells: vec![CENTER],
            game_over: false,
            winner: None,
            tokens_remaining: None,
            current_round_token: None,
            turrets_locked: [false; NUM_TURRETS],
            turrets_used_this_round: [false; NUM_TURRETS],
            dead_history: Vec::new(),
            locks_history: Vec::new(),
            last_used_token_len: None,
        }
    }

    #[test]
    fn test_triple_space_size() {
        // C(24, 3) combinations of non-center cells.
        assert_eq!(ALL_TRIPLES.len(), 2024);
    }

    #[test]
    fn test_zero_history_yields_valid_triple() {
        let guess = DeductionAi::new().decide(&empty_state());
        assert!(guess.iter().all(|l| l.in_bounds() && *l != CENTER));
        assert_ne!(guess[0], guess[1]);
        assert_ne!(guess[1], guess[2]);
        assert_ne!(guess[0], guess[2]);
    }

    #[test]
    fn test_kills_eliminate_inconsistent_hypotheses() {
        let mut state = empty_state();
        state.dead_cells.push(Loc::new(0, 2));
        state.dead_history.push(KillRecord {
            round: 1,
            target: Loc::new(0, 2),
            mode: AttackMode::Round,
        });
        state.last_used_token_len = Some(1);

        let guess = DeductionAi::new().decide(&state);
        // The guess must be able to explain the round-mode kill at (0,2).
        assert!(
            guess.iter().any(|t| AttackMode::Round.covers(t, &Loc::new(0, 2))),
            "guess {:?} cannot explain the kill", guess,
        );
        // And must not sit on the destroyed cell.
        assert!(!guess.contains(&Loc::new(0, 2)));
    }

    #[test]
    fn test_failed_lock_never_repeated() {
        // No kills at all: every live triple scores zero, so without the
        // lock filter the first enumerated triple would repeat forever.
        let mut state = empty_state();
        let first = DeductionAi::new().decide(&state);
        state.locks_history.push(LockRecord { round: 1, locks: first });
        state.round = 2;

        let second = DeductionAi::new().decide(&state);
        let record = LockRecord { round: 1, locks: first };
        assert!(!record.matches(&second));
    }

    #[test]
    fn test_anomaly_restricts_to_last_locks() {
        let mut state = empty_state();
        state.round = 2;
        state.last_locks = vec![Loc::new(3, 3), Loc::new(4, 0), Loc::new(0, 4)];
        state.locks_history.push(LockRecord {
            round: 1,
            locks: [Loc::new(3, 3), Loc::new(4, 0), Loc::new(0, 4)],
        });
        // Token paid for two shots, nothing died this round.
        state.last_used_token_len = Some(2);

        let guess = DeductionAi::new().decide(&state);
        assert!(
            guess.iter().any(|l| state.last_locks.contains(l)),
            "anomalous round should keep a foot in the last lock set",
        );
    }

    #[test]
    fn test_relaxation_recovers_from_contradictory_history() {
        // A kill nothing can explain: every cell within range of the target
        // is itself dead, so the dead-history filter wipes out everything
        // and the ladder must fall back rather than return nothing.
        let mut state = empty_state();
        let target = Loc::new(0, 0);
        state.dead_cells.push(target);
        for n in target.neighbors() {
            state.dead_cells.push(n);
        }
        state.dead_history.push(KillRecord {
            round: 1,
            target,
            mode: AttackMode::Round,
        });
        state.last_used_token_len = Some(3);

        let guess = DeductionAi::new().decide(&state);
        assert!(guess.iter().all(|l| l.in_bounds()));
        assert_ne!(guess[0], guess[1]);
    }

    #[test]
    fn test_determinism() {
        let mut state = empty_state();
        state.dead_cells.push(Loc::new(2, 0));
        state.dead_history.push(KillRecord {
            round: 1,
            target: Loc::new(2, 0),
            mode: AttackMode::Cross,
        });
        let ai = DeductionAi::new();
        assert_eq!(ai.decide(&state), ai.decide(&state));
    }
}
