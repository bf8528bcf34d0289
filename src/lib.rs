pub mod codec;
pub mod config;
pub mod creator;
pub mod grid;
pub mod logging;
pub mod puzzle;
pub mod session;
pub mod terminal;

#[cfg(test)]
pub(crate) mod test_support;

pub use codec::{decode, encode, fragment_of, share_url, DecodeError};
pub use config::{Configuration, InvalidConfiguration};
pub use creator::{Draft, ImageCheck, ShareLink};
pub use grid::{GridSize, UnsupportedGridSize};
pub use puzzle::{
    is_solvable, is_solved, shuffle_tiles, Board, BoardError, Direction, MoveOutcome, MoveSource,
    Phase,
};
pub use session::{ImageLoadError, ImageLoader, Notice, Session};
