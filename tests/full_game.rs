//! End-to-end games: engine contracts under real agent play

use stations::ai::{AssignmentAi, DeductionAi, RedPlan};
use stations::core::{
    AttackMode, Game, KillAction, Loc, Player, StrategyToken, MAX_ROUNDS, NUM_TURRETS,
};
use stations::utils::rng::make_seeded_rng;

fn tokens() -> Vec<StrategyToken> {
    ["110", "10", "1", "0", "11"]
        .into_iter()
        .map(|s| StrategyToken::new(s).unwrap())
        .collect()
}

#[test]
fn worked_example_from_the_rules() {
    let mut game = Game::new(
        [Loc::new(0, 0), Loc::new(4, 4), Loc::new(1, 3)],
        Some(tokens()),
    )
    .unwrap();

    // Cross shot from turret 0 at (0,2): shares the column, kills.
    let report = game
        .kill(
            KillAction {
                turret_index: 0,
                mode: AttackMode::Cross,
                target: Loc::new(0, 2),
            },
            None,
        )
        .unwrap();
    assert!(report.killed);

    // Round shot from turret 1 at (3,4): Chebyshev 1 from (4,4), kills.
    let report = game
        .kill(
            KillAction {
                turret_index: 1,
                mode: AttackMode::Round,
                target: Loc::new(3, 4),
            },
            Some(&StrategyToken::new("110").unwrap()),
        )
        .unwrap();
    assert!(report.killed);

    // An exact lock wins for Blue in any round and any order.
    let report = game
        .monitor([Loc::new(0, 0), Loc::new(4, 4), Loc::new(1, 3)])
        .unwrap();
    assert_eq!(report.winner, Some(Player::Blue));
}

#[test]
fn self_play_upholds_engine_invariants() {
    let red = AssignmentAi::default();
    let blue = DeductionAi::new();

    for seed in 0..30 {
        let mut rng = make_seeded_rng(seed);
        let mut game = Game::with_random_turrets(Some(tokens()), &mut rng).unwrap();
        let mut rounds_seen = 0;

        while !game.is_game_over() {
            let before = game.public_state();
            assert!(before.round >= 1 && before.round <= MAX_ROUNDS);
            rounds_seen += 1;
            assert!(rounds_seen <= MAX_ROUNDS, "round counter must terminate the game");

            match red.decide(&before, &game.reveal_turrets(), &mut rng) {
                RedPlan::Batch { actions, token } => {
                    game.kill_batch(&actions, Some(&token)).unwrap();
                }
                RedPlan::Discard(token) => game.consume_token(&token).unwrap(),
                RedPlan::Single(action) => {
                    game.kill(action, None).unwrap();
                }
            }

            let after_kill = game.public_state();
            // Exactly one token leaves the inventory per completed kill phase.
            assert_eq!(
                after_kill.tokens_remaining.as_ref().unwrap().len(),
                before.tokens_remaining.as_ref().unwrap().len() - 1
            );
            // Dead cells only grow.
            for cell in &before.dead_cells {
                assert!(after_kill.dead_cells.contains(cell));
            }

            let locks = blue.decide(&after_kill);
            assert_eq!(locks.len(), NUM_TURRETS);
            assert_ne!(locks[0], locks[1]);
            assert_ne!(locks[1], locks[2]);
            assert_ne!(locks[0], locks[2]);

            let report = game.monitor(locks).unwrap();
            if let Some(winner) = report.winner {
                assert!(game.is_game_over());
                assert_eq!(game.winner(), Some(winner));
            } else {
                assert_eq!(report.round, before.round + 1);
            }
        }

        // Terminal state: a winner exists and further mutation is refused.
        assert!(game.winner().is_some());
        assert!(game
            .monitor([Loc::new(0, 1), Loc::new(1, 1), Loc::new(2, 1)])
            .is_err());
    }
}

#[test]
fn blue_guesses_stay_on_live_cells() {
    let red = AssignmentAi::new(false);
    let blue = DeductionAi::new();

    for seed in 100..120 {
        let mut rng = make_seeded_rng(seed);
        let mut game = Game::with_random_turrets(Some(tokens()), &mut rng).unwrap();

        while !game.is_game_over() {
            match red.decide(&game.public_state(), &game.reveal_turrets(), &mut rng) {
                RedPlan::Batch { actions, token } => {
                    game.kill_batch(&actions, Some(&token)).unwrap();
                }
                RedPlan::Discard(token) => game.consume_token(&token).unwrap(),
                RedPlan::Single(action) => {
                    game.kill(action, None).unwrap();
                }
            }

            let state = game.public_state();
            let locks = blue.decide(&state);
            for lock in &locks {
                assert!(lock.in_bounds());
                assert!(
                    !state.dead_cells.contains(lock),
                    "seed {}: locked a destroyed cell {:?}", seed, lock,
                );
            }
            game.monitor(locks).unwrap();
        }
    }
}

#[test]
fn blue_deduces_the_truth_when_only_three_cells_survive() {
    let turrets = [Loc::new(0, 1), Loc::new(3, 2), Loc::new(4, 4)];
    let mut game = Game::new(turrets, None).unwrap();
    let blue = DeductionAi::new();

    // One real kill closes the phase and puts an explainable record in the
    // history.
    let report = game
        .kill(
            KillAction {
                turret_index: 0,
                mode: AttackMode::Cross,
                target: Loc::new(0, 3),
            },
            None,
        )
        .unwrap();
    assert!(report.killed);

    // Hand Blue a board where everything but the true layout is destroyed:
    // exactly one hypothesis survives, and it must be the truth.
    let mut state = game.public_state();
    state.dead_cells = Loc::all().filter(|l| !turrets.contains(l)).collect();
    let locks = blue.decide(&state);

    let report = game.monitor(locks).unwrap();
    assert_eq!(report.winner, Some(Player::Blue));
    assert!(game.is_game_over());
}
