//! Board rendering and the exported game log

use std::fmt;

use colored::Colorize;

use super::{
    game::Game,
    loc::Loc,
    state::PublicState,
    CENTER, GRID_LEN,
};

impl fmt::Display for PublicState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Round {} / dead {} / locks {}",
            self.round,
            self.dead_cells.len(),
            self.last_locks.len())?;
        if let Some(tokens) = &self.tokens_remaining {
            let tokens: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
            writeln!(f, "Tokens remaining: {}", tokens.join(", "))?;
        }

        write!(f, "   ")?;
        for x in 0..GRID_LEN {
            write!(f, " {} ", x)?;
        }
        writeln!(f)?;

        for y in 0..GRID_LEN as i32 {
            write!(f, "{:2} ", y)?;
            for x in 0..GRID_LEN as i32 {
                let loc = Loc::new(x, y);
                let cell = if self.last_locks.contains(&loc) {
                    " L ".bright_blue()
                } else if loc == CENTER {
                    " # ".dimmed()
                } else if self.is_dead(&loc) {
                    " x ".bright_red()
                } else {
                    " · ".normal()
                };
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        if self.game_over {
            match self.winner {
                Some(winner) => writeln!(f, "Game over: {} wins", winner)?,
                None => writeln!(f, "Game over")?,
            }
        }
        Ok(())
    }
}

/// Referee's view: the public board plus the hidden turrets.
impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.public_state();
        let turrets = self.reveal_turrets();

        writeln!(f, "Round {}", state.round)?;
        write!(f, "   ")?;
        for x in 0..GRID_LEN {
            write!(f, " {} ", x)?;
        }
        writeln!(f)?;

        for y in 0..GRID_LEN as i32 {
            write!(f, "{:2} ", y)?;
            for x in 0..GRID_LEN as i32 {
                let loc = Loc::new(x, y);
                let cell = if turrets.contains(&loc) {
                    if state.last_locks.contains(&loc) {
                        " T ".bright_blue()
                    } else {
                        " T ".bright_red()
                    }
                } else if state.last_locks.contains(&loc) {
                    " L ".bright_blue()
                } else if loc == CENTER {
                    " # ".dimmed()
                } else if state.is_dead(&loc) {
                    " x ".red()
                } else {
                    " · ".normal()
                };
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Game {
    /// Plain-text dump of the whole game for offline inspection: turret
    /// layout, token list, every shot with its hit rationale, both history
    /// logs and the final verdict. Nothing parses this; layout is free.
    pub fn export_game_log(&self) -> String {
        let state = self.public_state();
        let mut out = String::new();

        out.push_str("=== Hidden Stations game log ===\n");
        let turrets = self.reveal_turrets();
        let turrets: Vec<String> = turrets
            .iter()
            .enumerate()
            .map(|(i, t)| format!("turret {}={}", i, t))
            .collect();
        out.push_str(&format!("Turrets: {}\n", turrets.join(", ")));
        match self.tokens_initial() {
            Some(tokens) => {
                let tokens: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
                out.push_str(&format!("Initial tokens: {}\n", tokens.join(", ")));
            }
            None => out.push_str("Initial tokens: none (token play disabled)\n"),
        }

        out.push_str("\n=== Shots ===\n");
        for shot in self.shot_log() {
            out.push_str(&format!("[round {}] {}\n", shot.round, shot.timestamp.to_rfc3339()));
            out.push_str(&format!(
                "  turret {} at {} fired {} at {}\n",
                shot.turret_index, shot.turret, shot.mode, shot.target,
            ));
            out.push_str(&format!("  kill: {}\n", shot.killed));
            out.push_str(&format!("  rationale: {}\n", shot.rationale));
        }

        out.push_str("\n=== Confirmed kills ===\n");
        for kill in &state.dead_history {
            out.push_str(&format!(
                "round {}: target {} mode {}\n",
                kill.round, kill.target, kill.mode,
            ));
        }

        out.push_str("\n=== Lock attempts ===\n");
        for record in &state.locks_history {
            let locks: Vec<String> = record.locks.iter().map(|l| l.to_string()).collect();
            out.push_str(&format!("round {}: {}\n", record.round, locks.join(", ")));
        }

        out.push_str("\n=== Verdict ===\n");
        match state.winner {
            Some(winner) => out.push_str(&format!("Winner: {}\n", winner)),
            None => out.push_str("Winner: undecided\n"),
        }
        out.push_str(&format!("Rounds played: {}\n", state.round));
        out
    }
}
