//! Client-side logic for deck generation: the request draft and its
//! validation, the submit state machine, and the connection indicator.

pub mod config;
pub mod connection;
pub mod error;
pub mod form;
pub mod logo;
pub mod state;

pub use config::Config;
pub use connection::ConnectionState;
pub use error::{DeckError, FormError, Result};
pub use form::{DeckForm, DEFAULT_PAIN_POINT};
pub use logo::{Logo, MAX_LOGO_BYTES};
pub use state::{DeckController, SubmitState};
