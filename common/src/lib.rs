//! Types shared across the workspace: the wire contract of the deck
//! generation backend and the fixed vocabularies the form offers.

pub mod types;
pub mod vocab;

pub use types::{ApiErrorBody, GenerateDeckRequest, GenerateDeckResponse, HealthResponse};
pub use vocab::{ExportFormat, Industry, Persona, UseCase};
