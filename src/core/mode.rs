//! Attack modes and their coverage geometry

use std::fmt::Display;

use anyhow::{anyhow, Result};

use super::{loc::Loc, GRID_LEN};

/// One of the two attack patterns a turret can fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttackMode {
    /// Full row and column of the firing turret.
    Cross,
    /// 8-connected (Chebyshev-1) neighborhood of the firing turret.
    Round,
}

impl AttackMode {
    pub fn all() -> [AttackMode; 2] {
        [AttackMode::Cross, AttackMode::Round]
    }

    pub fn from_char(c: char) -> Result<Self> {
        match c {
            '0' => Ok(AttackMode::Cross),
            '1' => Ok(AttackMode::Round),
            _ => Err(anyhow!("Invalid attack mode char: {}", c)),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            AttackMode::Cross => '0',
            AttackMode::Round => '1',
        }
    }

    /// Pure geometric hit test, ignoring turret occupancy.
    pub fn covers(self, turret: &Loc, target: &Loc) -> bool {
        if turret == target {
            return false;
        }
        match self {
            AttackMode::Cross => turret.same_row_or_col(target),
            AttackMode::Round => turret.chebyshev(target) == 1,
        }
    }

    /// Every cell this mode can reach from `turret`, excluding the turret's
    /// own cell. Cross-mode size is `2 * GRID_LEN - 2`; round-mode is the
    /// grid-bounded king neighborhood.
    pub fn coverage(self, turret: &Loc) -> Vec<Loc> {
        match self {
            AttackMode::Cross => {
                let mut locs = Vec::with_capacity(2 * GRID_LEN - 2);
                for y in 0..GRID_LEN as i32 {
                    if y != turret.y {
                        locs.push(Loc::new(turret.x, y));
                    }
                }
                for x in 0..GRID_LEN as i32 {
                    if x != turret.x {
                        locs.push(Loc::new(x, turret.y));
                    }
                }
                locs
            }
            AttackMode::Round => turret.neighbors(),
        }
    }
}

impl Display for AttackMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttackMode::Cross => write!(f, "cross"),
            AttackMode::Round => write!(f, "round"),
        }
    }
}
