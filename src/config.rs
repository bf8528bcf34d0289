//! The authored puzzle: which picture, what it hides, and how hard it is.

use thiserror::Error;

use crate::grid::GridSize;

/// Reasons a puzzle cannot be published yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidConfiguration {
    #[error("an image URL is required")]
    EmptyImageUrl,
    #[error("a secret message is required")]
    EmptySecretMessage,
    #[error("the image has not loaded successfully yet")]
    ImageNotValidated,
}

/// An immutable puzzle description.
///
/// Both strings must contain a non-whitespace character. They are stored
/// unmodified so a decoded token reproduces exactly what was authored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    image_url: String,
    secret_message: String,
    grid: GridSize,
}

impl Configuration {
    pub fn new(
        image_url: impl Into<String>,
        secret_message: impl Into<String>,
        grid: GridSize,
    ) -> Result<Self, InvalidConfiguration> {
        let image_url = image_url.into();
        let secret_message = secret_message.into();
        if image_url.trim().is_empty() {
            return Err(InvalidConfiguration::EmptyImageUrl);
        }
        if secret_message.trim().is_empty() {
            return Err(InvalidConfiguration::EmptySecretMessage);
        }
        Ok(Self {
            image_url,
            secret_message,
            grid,
        })
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn secret_message(&self) -> &str {
        &self.secret_message
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }
}
