//! The player's view of one link.
//!
//! A [`Session`] is rebuilt from scratch each time the host reports a new
//! fragment. The host drives it through image loading and board play; the
//! secret only becomes readable once the board is solved.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::codec::{self, DecodeError};
use crate::config::Configuration;
use crate::puzzle::{Board, Direction, MoveOutcome, MoveSource};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not load image {url}: {reason}")]
pub struct ImageLoadError {
    pub url: String,
    pub reason: String,
}

impl ImageLoadError {
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// Fetches or probes a puzzle image on behalf of the core.
pub trait ImageLoader {
    fn load(&mut self, url: &str) -> Result<(), ImageLoadError>;
}

/// Warning shown above the creator after a bad link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    /// The host should reset its fragment so a reload does not repeat the warning.
    pub clear_fragment: bool,
}

impl From<&DecodeError> for Notice {
    fn from(err: &DecodeError) -> Self {
        Self {
            message: err.user_message().to_string(),
            clear_fragment: err.clears_fragment(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    /// No puzzle in the link; the host shows the creator.
    Creating { notice: Option<Notice> },
    LoadingImage { config: Configuration },
    ImageFailed {
        config: Configuration,
        error: ImageLoadError,
    },
    Playing { config: Configuration, board: Board },
}

impl Default for Session {
    fn default() -> Self {
        Session::Creating { notice: None }
    }
}

impl Session {
    pub fn on_fragment_change(fragment: &str) -> Self {
        match codec::decode(fragment) {
            Ok(Some(config)) => {
                debug!(grid = %config.grid(), "puzzle link decoded");
                Session::LoadingImage { config }
            }
            Ok(None) => Session::default(),
            Err(err) => {
                warn!(error = %err, "rejected puzzle link");
                Session::Creating {
                    notice: Some(Notice::from(&err)),
                }
            }
        }
    }

    pub fn image_loaded<S: MoveSource + ?Sized>(&mut self, source: &mut S) {
        if let Session::LoadingImage { config } = self {
            let board = Board::shuffled(config.grid(), source);
            debug!(grid = %config.grid(), "image ready, board shuffled");
            *self = Session::Playing {
                config: config.clone(),
                board,
            };
        }
    }

    pub fn image_failed(&mut self, error: ImageLoadError) {
        if let Session::LoadingImage { config } = self {
            warn!(error = %error, "puzzle image failed to load");
            *self = Session::ImageFailed {
                config: config.clone(),
                error,
            };
        }
    }

    pub fn retry_image(&mut self) {
        if let Session::ImageFailed { config, .. } = self {
            *self = Session::LoadingImage {
                config: config.clone(),
            };
        }
    }

    /// Runs the loader against the current image and applies the result.
    pub fn load_image<L, S>(&mut self, loader: &mut L, source: &mut S)
    where
        L: ImageLoader + ?Sized,
        S: MoveSource + ?Sized,
    {
        let Session::LoadingImage { config } = &*self else {
            return;
        };
        match loader.load(config.image_url()) {
            Ok(()) => self.image_loaded(source),
            Err(err) => self.image_failed(err),
        }
    }

    /// Throws away an unsolved board, including its move count. A solved
    /// board stays solved.
    pub fn restart<S: MoveSource + ?Sized>(&mut self, source: &mut S) {
        if let Session::Playing { config, board } = self {
            if board.is_solved() {
                return;
            }
            *board = Board::shuffled(config.grid(), source);
            debug!("board restarted");
        }
    }

    pub fn attempt_move(&mut self, index: usize) -> MoveOutcome {
        self.with_board(|board| board.attempt_move(index))
    }

    pub fn slide(&mut self, direction: Direction) -> MoveOutcome {
        self.with_board(|board| board.slide(direction))
    }

    fn with_board(&mut self, apply: impl FnOnce(&mut Board) -> MoveOutcome) -> MoveOutcome {
        match self {
            Session::Playing { board, .. } => {
                let outcome = apply(board);
                if outcome == MoveOutcome::Solved {
                    info!(moves = board.move_count(), "puzzle solved");
                }
                outcome
            }
            _ => MoveOutcome::Ignored,
        }
    }

    pub fn board(&self) -> Option<&Board> {
        match self {
            Session::Playing { board, .. } => Some(board),
            _ => None,
        }
    }

    pub fn config(&self) -> Option<&Configuration> {
        match self {
            Session::Creating { .. } => None,
            Session::LoadingImage { config }
            | Session::ImageFailed { config, .. }
            | Session::Playing { config, .. } => Some(config),
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        match self {
            Session::Creating { notice } => notice.as_ref(),
            _ => None,
        }
    }

    /// The hidden message, available only after the board is solved.
    pub fn secret_message(&self) -> Option<&str> {
        match self {
            Session::Playing { config, board } if board.is_solved() => {
                Some(config.secret_message())
            }
            _ => None,
        }
    }
}
