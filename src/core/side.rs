use std::{fmt::Display, ops::Not};

/// Side/player in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Player {
    Red,
    Blue,
}

impl Player {
    pub fn all() -> [Player; 2] {
        [Player::Red, Player::Blue]
    }

    pub fn opponent(self) -> Self {
        match self {
            Player::Red => Player::Blue,
            Player::Blue => Player::Red,
        }
    }
}

impl Not for Player {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.opponent()
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::Red => write!(f, "red"),
            Player::Blue => write!(f, "blue"),
        }
    }
}
