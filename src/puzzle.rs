use std::fmt;

use rand::Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::grid::{coords, manhattan, GridSize};

/// Random walk length per tile when shuffling.
pub const SHUFFLE_STEPS_PER_TILE: usize = 10;

/// Where a tile travels when the player slides it into the blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    /// Offset from the blank to the tile that moves in this direction.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Direction::Up => (1, 0),
            Direction::Left => (0, 1),
            Direction::Down => (-1, 0),
            Direction::Right => (0, -1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Direction::Up => "Up",
            Direction::Left => "Left",
            Direction::Down => "Down",
            Direction::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// Supplies the shuffle's choice among the blank's legal neighbours.
pub trait MoveSource {
    /// Returns an index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

impl<R: Rng> MoveSource for R {
    fn pick(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("grid side must be at least 2, got {side}")]
    GridTooSmall { side: usize },
    #[error("expected {expected} tiles, got {found}")]
    WrongLength { expected: usize, found: usize },
    #[error("tiles are not a permutation of 0..{len}")]
    NotAPermutation { len: usize },
    #[error("tile arrangement cannot be reached from the solved board")]
    Unsolvable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Solved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    /// The move completed the picture.
    Solved,
    /// Not adjacent to the blank, out of range, or the board is already solved.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    side: usize,
    tiles: Vec<u32>,
    empty: usize,
    move_count: u32,
    phase: Phase,
}

impl Board {
    pub fn shuffled<S: MoveSource + ?Sized>(grid: GridSize, source: &mut S) -> Self {
        let side = grid.side();
        let tiles = walk_until_unsolved(side, source);
        Self::assemble(side, tiles)
    }

    pub fn from_tiles(side: usize, tiles: Vec<u32>) -> Result<Self, BoardError> {
        if side < 2 {
            return Err(BoardError::GridTooSmall { side });
        }
        let expected = side * side;
        if tiles.len() != expected {
            return Err(BoardError::WrongLength {
                expected,
                found: tiles.len(),
            });
        }
        let mut seen = vec![false; expected];
        for &value in &tiles {
            let slot = seen
                .get_mut(value as usize)
                .ok_or(BoardError::NotAPermutation { len: expected })?;
            if *slot {
                return Err(BoardError::NotAPermutation { len: expected });
            }
            *slot = true;
        }
        if !is_solvable(&tiles, side) {
            return Err(BoardError::Unsolvable);
        }
        Ok(Self::assemble(side, tiles))
    }

    fn assemble(side: usize, tiles: Vec<u32>) -> Self {
        let empty = tiles.iter().position(|&v| v == 0).unwrap_or(0);
        let phase = if is_solved(&tiles) {
            Phase::Solved
        } else {
            Phase::Playing
        };
        Self {
            side,
            tiles,
            empty,
            move_count: 0,
            phase,
        }
    }

    /// Slides the tile at `index` into the blank when the two are orthogonal
    /// neighbours. Anything else leaves the board untouched.
    pub fn attempt_move(&mut self, index: usize) -> MoveOutcome {
        if self.phase == Phase::Solved || index >= self.tiles.len() {
            return MoveOutcome::Ignored;
        }
        if manhattan(index, self.empty, self.side) != 1 {
            trace!(index, empty = self.empty, "ignored non-adjacent tile");
            return MoveOutcome::Ignored;
        }

        self.tiles.swap(index, self.empty);
        self.empty = index;
        self.move_count += 1;
        trace!(index, moves = self.move_count, "moved tile");

        if is_solved(&self.tiles) {
            self.phase = Phase::Solved;
            debug!(moves = self.move_count, "board solved");
            MoveOutcome::Solved
        } else {
            MoveOutcome::Moved
        }
    }

    pub fn slide(&mut self, direction: Direction) -> MoveOutcome {
        let (dr, dc) = direction.as_offset();
        let (row, col) = coords(self.empty, self.side);
        let new_row = row as isize + dr;
        let new_col = col as isize + dc;
        let side = self.side as isize;

        if new_row >= 0 && new_row < side && new_col >= 0 && new_col < side {
            trace!(%direction, "slide");
            self.attempt_move(new_row as usize * self.side + new_col as usize)
        } else {
            trace!(%direction, empty = self.empty, "no tile to slide");
            MoveOutcome::Ignored
        }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn tiles(&self) -> &[u32] {
        &self.tiles
    }

    pub fn empty_index(&self) -> usize {
        self.empty
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_solved(&self) -> bool {
        self.phase == Phase::Solved
    }

    /// Cell of the picture a tile shows. `None` for the blank.
    pub fn home_cell(&self, value: u32) -> Option<(usize, usize)> {
        let value = value as usize;
        if value == 0 || value >= self.tiles.len() {
            return None;
        }
        Some(coords(value - 1, self.side))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.chunks(self.side) {
            for &val in row {
                if val == 0 {
                    write!(f, "   ")?;
                } else {
                    write!(f, "{:2} ", val)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Random-walks the blank away from the solved board, retrying until the
/// result differs from the solved arrangement.
pub fn shuffle_tiles<S: MoveSource + ?Sized>(
    side: usize,
    source: &mut S,
) -> Result<Vec<u32>, BoardError> {
    if side < 2 {
        return Err(BoardError::GridTooSmall { side });
    }
    Ok(walk_until_unsolved(side, source))
}

fn walk_until_unsolved<S: MoveSource + ?Sized>(side: usize, source: &mut S) -> Vec<u32> {
    let mut attempts = 1u32;
    loop {
        let tiles = random_walk(side, source);
        if !is_solved(&tiles) {
            debug!(side, attempts, "shuffled tiles");
            return tiles;
        }
        debug!(side, attempts, "walk returned to the solved board, retrying");
        attempts += 1;
    }
}

fn random_walk<S: MoveSource + ?Sized>(side: usize, source: &mut S) -> Vec<u32> {
    let count = side * side;
    let mut tiles: Vec<u32> = (1..count as u32).collect();
    tiles.push(0);

    let mut empty = count - 1;
    let mut candidates = Vec::with_capacity(4);
    for _ in 0..count * SHUFFLE_STEPS_PER_TILE {
        candidates.clear();
        let (row, col) = coords(empty, side);
        if row > 0 {
            candidates.push(empty - side);
        }
        if row < side - 1 {
            candidates.push(empty + side);
        }
        if col > 0 {
            candidates.push(empty - 1);
        }
        if col < side - 1 {
            candidates.push(empty + 1);
        }

        let next = candidates[source.pick(candidates.len()) % candidates.len()];
        tiles.swap(empty, next);
        empty = next;
    }
    tiles
}

/// Every nonzero tile sits at its home index and the blank is last.
pub fn is_solved(tiles: &[u32]) -> bool {
    let Some((&last, rest)) = tiles.split_last() else {
        return false;
    };
    rest.iter()
        .enumerate()
        .all(|(i, &value)| value as usize == i + 1)
        && last == 0
}

/// Inversion-parity test for `side x side` sliding boards.
pub fn is_solvable(tiles: &[u32], side: usize) -> bool {
    let inversions = count_inversions(tiles);
    let empty_row = tiles.iter().position(|&v| v == 0).unwrap_or(0) / side.max(1);

    if side % 2 == 1 {
        inversions % 2 == 0
    } else {
        (inversions + empty_row) % 2 == 1
    }
}

fn count_inversions(tiles: &[u32]) -> usize {
    tiles
        .iter()
        .enumerate()
        .filter(|&(_, &val)| val != 0)
        .map(|(i, &val)| {
            tiles[i + 1..]
                .iter()
                .filter(|&&next| next != 0 && next < val)
                .count()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedMoves;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn board(tiles: &[u32]) -> Board {
        let side = (tiles.len() as f64).sqrt() as usize;
        Board::from_tiles(side, tiles.to_vec()).unwrap()
    }

    #[test]
    fn solved_predicate() {
        assert!(is_solved(&[1, 2, 3, 4, 5, 6, 7, 8, 0]));
        assert!(is_solved(&[1, 2, 3, 0]));
        assert!(!is_solved(&[2, 1, 3, 4, 5, 6, 7, 8, 0]));
        assert!(!is_solved(&[1, 2, 3, 4, 5, 6, 7, 0, 8]));
        assert!(!is_solved(&[]));
    }

    #[test]
    fn first_choice_walk_oscillates_down_the_right_column() {
        // candidates are Up, Down, Left, Right: always taking the first bounces
        // the blank between indices 5 and 2
        let mut moves = ScriptedMoves::new(Vec::new());
        let tiles = shuffle_tiles(3, &mut moves).unwrap();
        assert_eq!(tiles, vec![1, 2, 0, 4, 5, 3, 7, 8, 6]);
        assert_eq!(moves.consumed(), 90);
    }

    #[test]
    fn walk_that_lands_on_solved_is_retried() {
        // 40 first-choice steps on 2x2 return to solved; the retry goes left first
        let mut script = vec![0; 40];
        script.push(1);
        let mut moves = ScriptedMoves::new(script);
        let tiles = shuffle_tiles(2, &mut moves).unwrap();
        assert_eq!(tiles, vec![0, 2, 1, 3]);
        assert_eq!(moves.consumed(), 80);
    }

    #[test]
    fn rejects_tiny_grids() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            shuffle_tiles(1, &mut rng),
            Err(BoardError::GridTooSmall { side: 1 })
        );
    }

    #[test]
    fn seeded_shuffles_are_reproducible() {
        let a = Board::shuffled(GridSize::Four, &mut StdRng::seed_from_u64(7));
        let b = Board::shuffled(GridSize::Four, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert_eq!(a.phase(), Phase::Playing);
        assert_eq!(a.move_count(), 0);
    }

    #[test]
    fn adjacent_click_swaps_with_blank() {
        let mut board = board(&[1, 2, 3, 4, 5, 6, 7, 0, 8]);
        assert_eq!(board.attempt_move(6), MoveOutcome::Moved);
        assert_eq!(board.tiles(), &[1, 2, 3, 4, 5, 6, 0, 7, 8]);
        assert_eq!(board.move_count(), 1);
        assert_eq!(board.empty_index(), 6);

        assert_eq!(board.attempt_move(0), MoveOutcome::Ignored);
        assert_eq!(board.tiles(), &[1, 2, 3, 4, 5, 6, 0, 7, 8]);
        assert_eq!(board.move_count(), 1);
    }

    #[test]
    fn diagonal_same_cell_and_out_of_range_are_ignored() {
        let mut board = board(&[1, 2, 3, 4, 0, 5, 7, 8, 6]);
        let before = board.clone();
        assert_eq!(board.attempt_move(0), MoveOutcome::Ignored);
        assert_eq!(board.attempt_move(4), MoveOutcome::Ignored);
        assert_eq!(board.attempt_move(9), MoveOutcome::Ignored);
        assert_eq!(board, before);
    }

    #[test]
    fn row_wrap_is_not_adjacent() {
        // index 2 ends row 0 and index 3 starts row 1
        let mut board = board(&[1, 2, 3, 0, 4, 5, 7, 8, 6]);
        assert_eq!(board.attempt_move(2), MoveOutcome::Ignored);
    }

    #[test]
    fn solving_move_is_terminal() {
        let mut board = board(&[1, 2, 3, 4, 5, 6, 7, 0, 8]);
        assert_eq!(board.attempt_move(8), MoveOutcome::Solved);
        assert!(board.is_solved());
        assert_eq!(board.move_count(), 1);

        assert_eq!(board.attempt_move(7), MoveOutcome::Ignored);
        assert_eq!(board.slide(Direction::Down), MoveOutcome::Ignored);
        assert_eq!(board.tiles(), &[1, 2, 3, 4, 5, 6, 7, 8, 0]);
        assert_eq!(board.move_count(), 1);
    }

    #[test]
    fn slide_moves_the_tile_beside_the_blank() {
        let mut board = board(&[1, 2, 3, 4, 5, 6, 7, 0, 8]);
        assert_eq!(board.slide(Direction::Up), MoveOutcome::Ignored);
        assert_eq!(board.slide(Direction::Down), MoveOutcome::Moved);
        assert_eq!(board.tiles(), &[1, 2, 3, 4, 0, 6, 7, 5, 8]);
        assert_eq!(board.slide(Direction::Up), MoveOutcome::Moved);
        assert_eq!(board.slide(Direction::Left), MoveOutcome::Solved);
        assert_eq!(board.move_count(), 3);
        assert_eq!(Direction::Left.to_string(), "Left");
    }

    #[test]
    fn from_tiles_validates_the_arrangement() {
        assert_eq!(
            Board::from_tiles(3, vec![1, 2, 3, 0]),
            Err(BoardError::WrongLength {
                expected: 9,
                found: 4
            })
        );
        assert_eq!(
            Board::from_tiles(2, vec![1, 1, 3, 0]),
            Err(BoardError::NotAPermutation { len: 4 })
        );
        assert_eq!(
            Board::from_tiles(2, vec![1, 2, 4, 0]),
            Err(BoardError::NotAPermutation { len: 4 })
        );
        assert_eq!(
            Board::from_tiles(3, vec![2, 1, 3, 4, 5, 6, 7, 8, 0]),
            Err(BoardError::Unsolvable)
        );
    }

    #[test]
    fn parity_matches_known_boards() {
        assert!(is_solvable(&[1, 2, 3, 4, 5, 6, 7, 8, 0], 3));
        assert!(!is_solvable(&[1, 2, 3, 4, 5, 6, 8, 7, 0], 3));
        let solved_15: Vec<u32> = (1..16).chain(std::iter::once(0)).collect();
        assert!(is_solvable(&solved_15, 4));
        let mut swapped = solved_15.clone();
        swapped.swap(13, 14);
        assert!(!is_solvable(&swapped, 4));
        // blank moved up one row into the last column
        let mut lifted = solved_15;
        lifted.swap(11, 15);
        assert!(is_solvable(&lifted, 4));
    }

    #[test]
    fn home_cells_follow_row_major_order() {
        let board = board(&[1, 2, 3, 4, 5, 6, 7, 0, 8]);
        assert_eq!(board.home_cell(1), Some((0, 0)));
        assert_eq!(board.home_cell(8), Some((2, 1)));
        assert_eq!(board.home_cell(0), None);
        assert_eq!(board.home_cell(9), None);
    }

    #[test]
    fn display_leaves_the_blank_empty() {
        let board = board(&[1, 2, 3, 4, 5, 6, 7, 0, 8]);
        assert_eq!(board.to_string(), " 1  2  3 \n 4  5  6 \n 7     8 \n");
    }
}
