use pitchdeck_api::ApiError;
use thiserror::Error;

/// Local validation failures. Reported immediately; no network call is made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("please fill in the {0} field")]
    MissingField(&'static str),

    #[error("please select at least one target buyer persona")]
    NoPersona,

    #[error("logo file is {0} bytes, over the 5MB limit")]
    LogoTooLarge(u64),

    #[error("logo must be an image file (PNG, JPG, etc.), not {0}")]
    LogoNotImage(String),
}

#[derive(Debug, Error)]
pub enum DeckError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("a deck is already being generated")]
    InFlight,

    #[error("no generated deck to download")]
    NoDeck,

    #[error("this download link has expired, generate a new deck")]
    Expired,
}

pub type Result<T> = std::result::Result<T, DeckError>;
