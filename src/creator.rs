use tracing::debug;
use url::Url;

use crate::codec::{encode, share_url};
use crate::config::{Configuration, InvalidConfiguration};
use crate::grid::GridSize;
use crate::session::{ImageLoadError, ImageLoader};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageCheck {
    #[default]
    Unchecked,
    Valid,
    Invalid(ImageLoadError),
}

/// A link ready to hand out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    pub token: String,
    pub url: Url,
}

/// In-progress puzzle authored by the creator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Draft {
    image_url: String,
    secret_message: String,
    grid: GridSize,
    image_check: ImageCheck,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Changing the URL invalidates any earlier image check.
    pub fn set_image_url(&mut self, url: impl Into<String>) {
        self.image_url = url.into();
        self.image_check = ImageCheck::Unchecked;
    }

    pub fn set_secret_message(&mut self, message: impl Into<String>) {
        self.secret_message = message.into();
    }

    pub fn set_grid(&mut self, grid: GridSize) {
        self.grid = grid;
    }

    pub fn record_image_check(&mut self, result: Result<(), ImageLoadError>) {
        self.image_check = match result {
            Ok(()) => ImageCheck::Valid,
            Err(err) => ImageCheck::Invalid(err),
        };
    }

    /// Probes the current URL. A blank URL stays unchecked.
    pub fn check_image<L: ImageLoader + ?Sized>(&mut self, loader: &mut L) {
        if self.image_url.trim().is_empty() {
            self.image_check = ImageCheck::Unchecked;
            return;
        }
        let result = loader.load(&self.image_url);
        self.record_image_check(result);
    }

    pub fn image_check(&self) -> &ImageCheck {
        &self.image_check
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn can_generate(&self) -> bool {
        self.validated().is_ok()
    }

    fn validated(&self) -> Result<Configuration, InvalidConfiguration> {
        let config = Configuration::new(
            self.image_url.clone(),
            self.secret_message.clone(),
            self.grid,
        )?;
        if self.image_check != ImageCheck::Valid {
            return Err(InvalidConfiguration::ImageNotValidated);
        }
        Ok(config)
    }

    pub fn generate(&self, base: &Url) -> Result<ShareLink, InvalidConfiguration> {
        let config = self.validated()?;
        let token = encode(&config);
        let url = share_url(base, &token);
        debug!(grid = %config.grid(), token_len = token.len(), "share link generated");
        Ok(ShareLink { token, url })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
