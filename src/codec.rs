//! Shareable puzzle tokens.
//!
//! A token is the standard base64 encoding of a compact JSON record
//! `{"imageUrl": .., "secretMessage": .., "size": ..}`. Links created by
//! earlier versions of the app use the same field names and order, so both
//! are fixed.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::config::{Configuration, InvalidConfiguration};
use crate::grid::{GridSize, UnsupportedGridSize};

/// Accepts tokens whose `=` padding was stripped along the way.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const BROKEN_LINK_MESSAGE: &str =
    "The puzzle link seems to be broken. You can create a new puzzle below.";
const INVALID_DATA_MESSAGE: &str = "Invalid puzzle data in URL. Creating a new puzzle.";

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("token is not valid base64: {0}")]
    Transform(#[from] base64::DecodeError),
    #[error("token payload is not JSON: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("puzzle field `{field}` is missing or has the wrong type")]
    Shape { field: &'static str },
    #[error("invalid puzzle field: {0}")]
    Field(#[from] InvalidConfiguration),
    #[error("{0}")]
    Size(#[from] UnsupportedGridSize),
    #[error("grid size {0} is not 3, 4 or 5")]
    UnsupportedSize(f64),
}

impl DecodeError {
    /// Banner text for the creator screen.
    pub fn user_message(&self) -> &'static str {
        match self {
            DecodeError::Transform(_) | DecodeError::Payload(_) => BROKEN_LINK_MESSAGE,
            DecodeError::Shape { .. }
            | DecodeError::Field(_)
            | DecodeError::Size(_)
            | DecodeError::UnsupportedSize(_) => INVALID_DATA_MESSAGE,
        }
    }

    /// Whether the host should wipe the fragment from its address bar.
    pub fn clears_fragment(&self) -> bool {
        matches!(self, DecodeError::Transform(_) | DecodeError::Payload(_))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenRecord<'a> {
    image_url: &'a str,
    secret_message: &'a str,
    size: usize,
}

fn string_field(record: &Value, field: &'static str) -> Result<String, DecodeError> {
    record
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(DecodeError::Shape { field })
}

pub fn encode(config: &Configuration) -> String {
    let record = TokenRecord {
        image_url: config.image_url(),
        secret_message: config.secret_message(),
        size: config.grid().side(),
    };
    // serializing borrowed strings and an integer cannot fail
    let json = serde_json::to_vec(&record).unwrap_or_default();
    STANDARD.encode(json)
}

/// Decodes a URL fragment. An empty fragment means there is no puzzle to
/// load and is not an error.
pub fn decode(fragment: &str) -> Result<Option<Configuration>, DecodeError> {
    let token = fragment.trim().trim_start_matches('#').trim();
    if token.is_empty() {
        return Ok(None);
    }

    let bytes = LENIENT.decode(token)?;
    // only a syntax error is a broken link; a well-formed record with bad
    // fields is invalid puzzle data
    let record: Value = serde_json::from_slice(&bytes)?;
    let image_url = string_field(&record, "imageUrl")?;
    let secret_message = string_field(&record, "secretMessage")?;
    let size = record
        .get("size")
        .and_then(Value::as_f64)
        .ok_or(DecodeError::Shape { field: "size" })?;

    if size.fract() != 0.0 || !(0.0..=f64::from(u32::MAX)).contains(&size) {
        return Err(DecodeError::UnsupportedSize(size));
    }
    let grid = GridSize::try_from(size as u64)?;
    let config = Configuration::new(image_url, secret_message, grid)?;
    Ok(Some(config))
}

/// The page URL with its fragment replaced by `token`.
pub fn share_url(base: &Url, token: &str) -> Url {
    let mut url = base.clone();
    url.set_fragment(Some(token));
    url
}

/// Extracts the fragment from a pasted link, or passes a bare token through.
pub fn fragment_of(input: &str) -> &str {
    let input = input.trim();
    if let Some((_, fragment)) = input.split_once('#') {
        return fragment;
    }
    match Url::parse(input) {
        Ok(_) => "",
        Err(_) => input,
    }
}
