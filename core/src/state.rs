use std::path::{Path, PathBuf};

use chrono::Utc;
use pitchdeck_api::{ApiClient, ApiError};
use pitchdeck_common::{GenerateDeckRequest, GenerateDeckResponse};

use crate::error::{DeckError, Result};
use crate::form::DeckForm;

/// Where the submit flow currently is. The tagged union makes the
/// impossible combinations (a result while still submitting, an error
/// alongside a handle) unrepresentable.
#[derive(Debug, Clone)]
pub enum SubmitState {
    /// Draft is being edited; submit is available.
    Editing,
    /// A generate call is in flight; further submits are refused.
    Submitting,
    /// The backend produced a deck; the handle gates the download.
    Ready(Box<GenerateDeckResponse>),
    /// The last submit failed. Holds the message shown to the user.
    Failed(String),
}

impl SubmitState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmitState::Submitting)
    }
}

/// Owns the draft and drives it through the submit state machine. One
/// controller per form instance; at most one generate call in flight.
#[derive(Debug)]
pub struct DeckController {
    pub form: DeckForm,
    state: SubmitState,
}

impl Default for DeckController {
    fn default() -> Self {
        Self::new()
    }
}

impl DeckController {
    pub fn new() -> Self {
        Self {
            form: DeckForm::new(),
            state: SubmitState::Editing,
        }
    }

    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    /// The handle of the generated deck, if the last submit succeeded.
    pub fn handle(&self) -> Option<&GenerateDeckResponse> {
        match &self.state {
            SubmitState::Ready(handle) => Some(handle),
            _ => None,
        }
    }

    /// Validate the draft and enter `Submitting`. Validation failures leave
    /// the state in `Editing` and never touch the network. Split from
    /// [`finish_submit`](Self::finish_submit) so a UI can render the
    /// in-flight state before the network call is awaited.
    pub fn begin_submit(&mut self) -> Result<GenerateDeckRequest> {
        if self.state.is_submitting() {
            return Err(DeckError::InFlight);
        }

        let request = match self.form.to_request() {
            Ok(request) => request,
            Err(err) => {
                self.state = SubmitState::Editing;
                return Err(err.into());
            }
        };

        self.state = SubmitState::Submitting;
        Ok(request)
    }

    /// Fold the backend's answer into the state machine: `Ready` on
    /// success, `Failed` with the normalized message otherwise.
    pub fn finish_submit(
        &mut self,
        result: std::result::Result<GenerateDeckResponse, ApiError>,
    ) -> Result<()> {
        match result {
            Ok(handle) => {
                self.state = SubmitState::Ready(Box::new(handle));
                Ok(())
            }
            Err(err) => {
                tracing::warn!("deck generation failed: {err}");
                self.state = SubmitState::Failed(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Validate, send, and fold the answer in one step. Callers that need
    /// to observe the `Submitting` state use the begin/finish pair instead.
    pub async fn submit(&mut self, api: &ApiClient) -> Result<()> {
        let request = self.begin_submit()?;
        let result = api.generate_deck(&request).await;
        self.finish_submit(result)
    }

    /// Clear a `Failed` state back to `Editing`, keeping the draft so the
    /// user can fix it and retry.
    pub fn acknowledge_error(&mut self) {
        if matches!(self.state, SubmitState::Failed(_)) {
            self.state = SubmitState::Editing;
        }
    }

    /// "Create another": discard the handle and start a fresh draft.
    pub fn reset(&mut self) {
        self.form = DeckForm::new();
        self.state = SubmitState::Editing;
    }

    /// Fetch the generated deck and write it under the handle's filename in
    /// `dir`. Refused once the handle has expired.
    pub async fn download(&self, api: &ApiClient, dir: &Path) -> Result<PathBuf> {
        let handle = self.handle().ok_or(DeckError::NoDeck)?;
        if handle.is_expired(Utc::now()) {
            return Err(DeckError::Expired);
        }

        let bytes = api.download_deck(&handle.file_id).await?;

        // The filename comes from the server; keep only its final component.
        let file_name = Path::new(&handle.filename)
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("deck.pptx"));
        let path = dir.join(file_name);
        tokio::fs::write(&path, &bytes).await?;
        tracing::info!(path = %path.display(), "deck saved");
        Ok(path)
    }
}
