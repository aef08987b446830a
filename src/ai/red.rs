//! Red's assignment planner: spend one token for maximum coverage
//!
//! Red knows where its turrets are. A strategy token fixes how many shots
//! the round buys and in which modes; the planner's job is to hand those
//! mode slots to turrets so that as many as possible have something legal
//! to shoot at, then pick targets. That is a maximum-cardinality bipartite
//! matching between token positions and unlocked turrets, solved by
//! randomized backtracking.

use rand::prelude::*;

use crate::core::{
    action::{BatchAction, KillAction},
    cellset::CellSet,
    loc::Loc,
    mode::AttackMode,
    state::PublicState,
    token::StrategyToken,
    NUM_TURRETS,
};

/// One round's worth of Red decisions.
#[derive(Debug, Clone)]
pub enum RedPlan {
    /// Fire a batch and spend this token.
    Batch {
        actions: Vec<BatchAction>,
        token: StrategyToken,
    },
    /// No turret can use the token; spend it without firing.
    Discard(StrategyToken),
    /// Tokenless single shot (token play disabled or inventory empty).
    Single(KillAction),
}

/// Red's attack-planning agent.
#[derive(Debug, Clone, Copy)]
pub struct AssignmentAi {
    /// Pick the spent token uniformly at random instead of first-in-order.
    pub randomize_tokens: bool,
}

impl Default for AssignmentAi {
    fn default() -> Self {
        Self { randomize_tokens: true }
    }
}

impl AssignmentAi {
    pub fn new(randomize_tokens: bool) -> Self {
        Self { randomize_tokens }
    }

    /// Plan one round. `turrets` is Red's private knowledge of the true
    /// positions; everything else comes from the public snapshot.
    pub fn decide<R: Rng>(
        &self,
        state: &PublicState,
        turrets: &[Loc; NUM_TURRETS],
        rng: &mut R,
    ) -> RedPlan {
        let dead: CellSet = state.dead_cells.iter().copied().collect();
        let turret_cells: CellSet = turrets.iter().copied().collect();

        let available: Vec<usize> = (0..NUM_TURRETS)
            .filter(|i| !state.turrets_locked[*i])
            .collect();

        // Dead cells and turret cells are never worth shooting; locked cells
        // stay legal (Red may fire into Blue's locks).
        let legal_targets = |turret_index: usize, mode: AttackMode| -> Vec<Loc> {
            mode.coverage(&turrets[turret_index])
                .into_iter()
                .filter(|c| !dead.contains(c) && !turret_cells.contains(c))
                .collect()
        };

        if let Some(token) = self.choose_token(state, rng) {
            // Attack order inside a round has no rule weight; shuffling the
            // mode sequence just avoids positional bias.
            let mut modes = token.modes();
            modes.shuffle(rng);

            // Feasibility edges: token position -> turrets with a legal shot
            // in that position's mode.
            let edges: Vec<Vec<(usize, Vec<Loc>)>> = modes
                .iter()
                .map(|mode| {
                    available
                        .iter()
                        .filter_map(|&i| {
                            let targets = legal_targets(i, *mode);
                            (!targets.is_empty()).then_some((i, targets))
                        })
                        .collect()
                })
                .collect();

            let matching = best_matching(&edges, 0, 0, rng);

            let mut actions = Vec::with_capacity(matching.len());
            for (pos, turret_index) in matching {
                let targets = edges[pos]
                    .iter()
                    .find(|(i, _)| *i == turret_index)
                    .map(|(_, t)| t.as_slice())
                    .unwrap_or(&[]);
                if let Some(target) = targets.choose(rng) {
                    actions.push(BatchAction {
                        turret_index,
                        mode: Some(modes[pos]),
                        target: *target,
                    });
                }
            }

            if actions.is_empty() {
                return RedPlan::Discard(token);
            }
            return RedPlan::Batch { actions, token };
        }

        // No token: any single (turret, mode) pair with a legal target.
        let mut viable: Vec<(usize, AttackMode, Vec<Loc>)> = Vec::new();
        for mode in AttackMode::all() {
            for &i in &available {
                let targets = legal_targets(i, mode);
                if !targets.is_empty() {
                    viable.push((i, mode, targets));
                }
            }
        }
        if let Some((turret_index, mode, targets)) = viable.choose(rng) {
            let target = *targets.choose(rng).unwrap();
            return RedPlan::Single(KillAction {
                turret_index: *turret_index,
                mode: *mode,
                target,
            });
        }

        // Degenerate board: everything in range is dead. Shoot a covered
        // non-turret cell anyway.
        for &i in &available {
            for mode in AttackMode::all() {
                let covered: Vec<Loc> = mode
                    .coverage(&turrets[i])
                    .into_iter()
                    .filter(|c| !turret_cells.contains(c))
                    .collect();
                if let Some(target) = covered.choose(rng) {
                    return RedPlan::Single(KillAction {
                        turret_index: i,
                        mode,
                        target: *target,
                    });
                }
            }
        }

        // All turrets locked or boxed in: any in-bounds non-turret cell.
        let target = Loc::all()
            .find(|l| !turret_cells.contains(l))
            .unwrap_or(Loc::new(0, 0));
        RedPlan::Single(KillAction {
            turret_index: 0,
            mode: AttackMode::Cross,
            target,
        })
    }

    fn choose_token<R: Rng>(&self, state: &PublicState, rng: &mut R) -> Option<StrategyToken> {
        let tokens = state.tokens_remaining.as_ref()?;
        if tokens.is_empty() {
            return None;
        }
        let token = if self.randomize_tokens {
            tokens.choose(rng).unwrap()
        } else {
            &tokens[0]
        };
        Some(token.clone())
    }
}

/// Maximum-cardinality matching of token positions to turrets, by
/// backtracking. The used-turret set travels down the recursion as a copied
/// bitmask, so no frame ever sees another frame's mutations. Candidate order
/// is shuffled per position; a position with no unused candidate is skipped.
fn best_matching<R: Rng>(
    edges: &[Vec<(usize, Vec<Loc>)>],
    pos: usize,
    used: u8,
    rng: &mut R,
) -> Vec<(usize, usize)> {
    if pos >= edges.len() {
        return Vec::new();
    }

    let mut candidates: Vec<usize> = edges[pos]
        .iter()
        .map(|(i, _)| *i)
        .filter(|i| used & (1 << i) == 0)
        .collect();
    if candidates.is_empty() {
        return best_matching(edges, pos + 1, used, rng);
    }
    candidates.shuffle(rng);

    let mut best: Vec<(usize, usize)> = Vec::new();
    for turret_index in candidates {
        let mut assignment = vec![(pos, turret_index)];
        assignment.extend(best_matching(edges, pos + 1, used | 1 << turret_index, rng));
        if assignment.len() > best.len() {
            best = assignment;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Game, CENTER};
    use crate::utils::rng::make_seeded_rng;

    fn tokens() -> Vec<StrategyToken> {
        ["110", "10", "1", "0", "11"]
            .into_iter()
            .map(|s| StrategyToken::new(s).unwrap())
            .collect()
    }

    fn fixed_game() -> Game {
        Game::new(
            [Loc::new(0, 0), Loc::new(4, 4), Loc::new(1, 3)],
            Some(tokens()),
        )
        .unwrap()
    }

    #[test]
    fn test_batch_is_legal_and_bounded() {
        let game = fixed_game();
        let ai = AssignmentAi::new(true);
        let mut rng = make_seeded_rng(11);

        for _ in 0..100 {
            let plan = ai.decide(&game.public_state(), &game.reveal_turrets(), &mut rng);
            let RedPlan::Batch { actions, token } = plan else {
                panic!("open board with tokens must produce a batch");
            };
            assert!(actions.len() <= token.len().min(NUM_TURRETS));
            // No turret fires twice.
            for (i, a) in actions.iter().enumerate() {
                for b in &actions[i + 1..] {
                    assert_ne!(a.turret_index, b.turret_index);
                }
            }
            // Targets avoid dead and turret cells.
            for a in &actions {
                assert!(a.target.in_bounds());
                assert_ne!(a.target, CENTER);
                assert!(!game.reveal_turrets().contains(&a.target));
            }
        }
    }

    #[test]
    fn test_batch_accepted_by_engine() {
        let ai = AssignmentAi::new(true);
        let mut rng = make_seeded_rng(5);

        for seed in 0..20 {
            let mut rng_game = make_seeded_rng(seed);
            let mut game = Game::with_random_turrets(Some(tokens()), &mut rng_game).unwrap();
            while !game.is_game_over() {
                match ai.decide(&game.public_state(), &game.reveal_turrets(), &mut rng) {
                    RedPlan::Batch { actions, token } => {
                        game.kill_batch(&actions, Some(&token)).unwrap();
                    }
                    RedPlan::Discard(token) => game.consume_token(&token).unwrap(),
                    RedPlan::Single(action) => {
                        game.kill(action, None).unwrap();
                    }
                }
                // A deliberately wrong lock to exercise all five rounds.
                game.monitor([Loc::new(2, 0), Loc::new(2, 1), Loc::new(2, 3)])
                    .unwrap();
            }
        }
    }

    #[test]
    fn test_single_shot_when_tokens_disabled() {
        let game = Game::new([Loc::new(0, 0), Loc::new(4, 4), Loc::new(1, 3)], None).unwrap();
        let ai = AssignmentAi::new(false);
        let mut rng = make_seeded_rng(3);

        let plan = ai.decide(&game.public_state(), &game.reveal_turrets(), &mut rng);
        let RedPlan::Single(action) = plan else {
            panic!("tokenless game must produce a single shot");
        };
        assert!(action.target.in_bounds());
        assert!(action.turret_index < NUM_TURRETS);
    }

    #[test]
    fn test_first_token_when_not_randomized() {
        let game = fixed_game();
        let ai = AssignmentAi::new(false);
        let mut rng = make_seeded_rng(3);
        let plan = ai.decide(&game.public_state(), &game.reveal_turrets(), &mut rng);
        let RedPlan::Batch { token, .. } = plan else {
            panic!("expected a batch");
        };
        assert_eq!(token, StrategyToken::new("110").unwrap());
    }

    #[test]
    fn test_matching_fills_all_three_on_open_board() {
        // Open board, 3-mode token, 3 turrets: a perfect matching exists and
        // backtracking must find one.
        let game = fixed_game();
        let ai = AssignmentAi::new(false);
        let mut rng = make_seeded_rng(17);
        for _ in 0..50 {
            let plan = ai.decide(&game.public_state(), &game.reveal_turrets(), &mut rng);
            let RedPlan::Batch { actions, .. } = plan else {
                panic!("expected a batch");
            };
            assert_eq!(actions.len(), NUM_TURRETS);
        }
    }

    #[test]
    fn test_degenerate_fallback_stays_in_bounds() {
        // Kill every legal cell first so nothing is left to shoot.
        let turrets = [Loc::new(0, 0), Loc::new(4, 4), Loc::new(1, 3)];
        let mut state = Game::new(turrets, None).unwrap().public_state();
        state.dead_cells = Loc::all()
            .filter(|l| !turrets.contains(l))
            .collect();

        let ai = AssignmentAi::new(false);
        let mut rng = make_seeded_rng(29);
        let plan = ai.decide(&state, &turrets, &mut rng);
        let RedPlan::Single(action) = plan else {
            panic!("degenerate board must fall back to a single shot");
        };
        assert!(action.target.in_bounds());
        assert!(!turrets.contains(&action.target));
    }
}
