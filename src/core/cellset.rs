//! Dense bitmask set over board cells

use super::{loc::Loc, GRID_LEN};

/// Set of board cells backed by a single bitmask. Cheap to copy and compare;
/// used for the dead-cell board and lock sets in hot filtering loops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellSet(u32);

impl CellSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, loc: Loc) {
        self.0 |= 1 << loc.index();
    }

    pub fn contains(&self, loc: &Loc) -> bool {
        self.0 & (1 << loc.index()) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn intersects(&self, other: &CellSet) -> bool {
        self.0 & other.0 != 0
    }

    /// Cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Loc> + '_ {
        (0..GRID_LEN * GRID_LEN)
            .filter(move |i| self.0 & (1 << i) != 0)
            .map(Loc::from_index)
    }
}

impl FromIterator<Loc> for CellSet {
    fn from_iter<I: IntoIterator<Item = Loc>>(iter: I) -> Self {
        let mut set = Self::empty();
        for loc in iter {
            set.insert(loc);
        }
        set
    }
}
