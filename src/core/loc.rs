use std::{fmt::Display, str::FromStr};

use anyhow::Context;

use super::GRID_LEN;

/// A location on the game board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Loc {
    pub x: i32,
    pub y: i32,
}

impl Loc {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn in_bounds(&self) -> bool {
        self.x >= 0 && self.x < GRID_LEN as i32 &&
        self.y >= 0 && self.y < GRID_LEN as i32
    }

    pub fn from_index(index: usize) -> Self {
        Self {
            x: (index % GRID_LEN) as i32,
            y: (index / GRID_LEN) as i32,
        }
    }

    /// Dense row-major index, usable as a set/array key.
    pub fn index(&self) -> usize {
        (self.y as usize) * GRID_LEN + (self.x as usize)
    }

    /// Chebyshev (king-move) distance to another location.
    pub fn chebyshev(&self, other: &Loc) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    pub fn same_row_or_col(&self, other: &Loc) -> bool {
        self.x == other.x || self.y == other.y
    }

    /// The up-to-8 in-bounds king-move neighbors.
    pub fn neighbors(&self) -> Vec<Loc> {
        let mut locs = Vec::with_capacity(8);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let loc = Loc::new(self.x + dx, self.y + dy);
                if loc.in_bounds() {
                    locs.push(loc);
                }
            }
        }
        locs
    }

    /// All in-bounds locations in row-major order.
    pub fn all() -> impl Iterator<Item = Loc> {
        (0..GRID_LEN * GRID_LEN).map(Loc::from_index)
    }
}

impl From<(i32, i32)> for Loc {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl FromStr for Loc {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s.split_once(',')
            .context("Invalid loc")?;

        Ok(Loc {
            x: x.trim().parse()?,
            y: y.trim().parse()?,
        })
    }
}

impl Display for Loc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}
