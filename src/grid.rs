use std::fmt;

use thiserror::Error;

/// Supported puzzle difficulties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GridSize {
    #[default]
    Three,
    Four,
    Five,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unsupported grid size {0}, expected 3, 4 or 5")]
pub struct UnsupportedGridSize(pub u64);

impl GridSize {
    pub const ALL: [GridSize; 3] = [GridSize::Three, GridSize::Four, GridSize::Five];

    pub fn side(self) -> usize {
        match self {
            GridSize::Three => 3,
            GridSize::Four => 4,
            GridSize::Five => 5,
        }
    }

    pub fn tile_count(self) -> usize {
        self.side() * self.side()
    }

    pub fn label(self) -> &'static str {
        match self {
            GridSize::Three => "Easy (3x3)",
            GridSize::Four => "Medium (4x4)",
            GridSize::Five => "Hard (5x5)",
        }
    }

    pub fn from_side(side: usize) -> Result<Self, UnsupportedGridSize> {
        Self::try_from(side as u64)
    }
}

impl TryFrom<u64> for GridSize {
    type Error = UnsupportedGridSize;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(GridSize::Three),
            4 => Ok(GridSize::Four),
            5 => Ok(GridSize::Five),
            other => Err(UnsupportedGridSize(other)),
        }
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.side(), self.side())
    }
}

/// Row-major `(row, col)` of a linear board index.
pub fn coords(index: usize, side: usize) -> (usize, usize) {
    (index / side, index % side)
}

pub fn manhattan(a: usize, b: usize, side: usize) -> usize {
    let (ar, ac) = coords(a, side);
    let (br, bc) = coords(b, side);
    ar.abs_diff(br) + ac.abs_diff(bc)
}
