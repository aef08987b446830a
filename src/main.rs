use anyhow::Result;
use stations::ai::{AssignmentAi, DeductionAi, RedPlan};
use stations::core::{Game, StrategyToken};
use stations::utils::rng::make_rng;

/// Self-play driver: the assignment planner against the deduction engine,
/// one full game, board printed after every round.
fn main() -> Result<()> {
    println!("Stations - Hidden Stations referee");

    let mut rng = make_rng();
    let tokens = ["110", "10", "1", "0", "11"]
        .into_iter()
        .map(StrategyToken::new)
        .collect::<Result<Vec<_>>>()?;

    let mut game = Game::with_random_turrets(Some(tokens), &mut rng)?;
    let red = AssignmentAi::default();
    let blue = DeductionAi::new();

    while !game.is_game_over() {
        match red.decide(&game.public_state(), &game.reveal_turrets(), &mut rng) {
            RedPlan::Batch { actions, token } => {
                let report = game.kill_batch(&actions, Some(&token))?;
                println!(
                    "red spends {} for {} shots, {} kills",
                    token,
                    report.actions.len(),
                    report.kills()
                );
            }
            RedPlan::Discard(token) => {
                game.consume_token(&token)?;
                println!("red discards {}", token);
            }
            RedPlan::Single(action) => {
                let report = game.kill(action, None)?;
                println!("red fires {} ({})", action, if report.killed { "kill" } else { "miss" });
            }
        }

        let locks = blue.decide(&game.public_state());
        println!("blue locks {}, {}, {}", locks[0], locks[1], locks[2]);
        game.monitor(locks)?;
        println!("{}", game);
    }

    print!("{}", game.export_game_log());
    Ok(())
}
