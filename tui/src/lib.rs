//! Interactive terminal form for building and submitting a deck request.

mod app;
mod interactive;

pub use app::{Action, Field, FormApp};
pub use interactive::run_interactive;
