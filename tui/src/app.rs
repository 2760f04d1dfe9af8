use crossterm::event::{KeyCode, KeyModifiers};
use std::path::PathBuf;

use pitchdeck_api::ApiClient;
use pitchdeck_common::{GenerateDeckRequest, Industry, Persona, UseCase};
use pitchdeck_core::{ConnectionState, DeckController, Logo, SubmitState};

/// Form rows, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Company,
    Industry,
    Personas,
    PainPoint,
    UseCase,
    Logo,
    Submit,
}

impl Field {
    pub const ORDER: [Field; 7] = [
        Field::Company,
        Field::Industry,
        Field::Personas,
        Field::PainPoint,
        Field::UseCase,
        Field::Logo,
        Field::Submit,
    ];

    fn next(self) -> Field {
        let pos = Field::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Field::ORDER[(pos + 1).min(Field::ORDER.len() - 1)]
    }

    fn prev(self) -> Field {
        let pos = Field::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Field::ORDER[pos.saturating_sub(1)]
    }
}

/// What the event loop should do after a key press. Pure state changes
/// happen inside `handle_key`; anything needing the network is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Submit,
    Download,
    CheckConnection,
}

/// The one form instance: draft + submit state + connection indicator.
pub struct FormApp {
    pub running: bool,
    pub controller: DeckController,
    pub connection: ConnectionState,
    pub field: Field,
    pub persona_cursor: usize,
    pub logo_path: String,
    pub status: Option<String>,
}

impl Default for FormApp {
    fn default() -> Self {
        Self::new()
    }
}

impl FormApp {
    pub fn new() -> Self {
        Self {
            running: true,
            controller: DeckController::new(),
            connection: ConnectionState::Unknown,
            field: Field::Company,
            persona_cursor: 0,
            logo_path: String::new(),
            status: None,
        }
    }

    /// Whether the result view is showing instead of the form.
    pub fn showing_result(&self) -> bool {
        self.controller.handle().is_some()
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Action {
        if modifiers.contains(KeyModifiers::CONTROL)
            && matches!(code, KeyCode::Char('q') | KeyCode::Char('c'))
        {
            return Action::Quit;
        }
        if self.showing_result() {
            return self.handle_result_key(code);
        }
        self.handle_form_key(code, modifiers)
    }

    fn handle_result_key(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Char('d') => Action::Download,
            KeyCode::Char('n') => {
                self.create_another();
                Action::None
            }
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            _ => Action::None,
        }
    }

    fn handle_form_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Action {
        if modifiers.contains(KeyModifiers::CONTROL) {
            return match code {
                KeyCode::Char('s') => Action::Submit,
                KeyCode::Char('r') => Action::CheckConnection,
                _ => Action::None,
            };
        }

        match code {
            KeyCode::Esc => {
                if matches!(self.controller.state(), SubmitState::Failed(_)) {
                    self.controller.acknowledge_error();
                    self.status = None;
                    Action::None
                } else {
                    Action::Quit
                }
            }
            KeyCode::Down | KeyCode::Tab => {
                self.field = self.field.next();
                Action::None
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.field = self.field.prev();
                Action::None
            }
            KeyCode::Enter => {
                if self.field == Field::Submit {
                    Action::Submit
                } else {
                    self.field = self.field.next();
                    Action::None
                }
            }
            KeyCode::Left => {
                self.cycle(-1);
                Action::None
            }
            KeyCode::Right => {
                self.cycle(1);
                Action::None
            }
            KeyCode::Char(' ') => {
                if self.field == Field::Personas {
                    let persona = Persona::ALL[self.persona_cursor];
                    self.controller.form.toggle_persona(persona);
                } else {
                    self.insert_char(' ');
                }
                Action::None
            }
            KeyCode::Char(c) => {
                self.insert_char(c);
                Action::None
            }
            KeyCode::Backspace => {
                if let Some(text) = self.active_text() {
                    text.pop();
                }
                Action::None
            }
            _ => Action::None,
        }
    }

    fn active_text(&mut self) -> Option<&mut String> {
        match self.field {
            Field::Company => Some(&mut self.controller.form.company_name),
            Field::PainPoint => Some(&mut self.controller.form.pain_point),
            Field::Logo => Some(&mut self.logo_path),
            _ => None,
        }
    }

    fn insert_char(&mut self, c: char) {
        if let Some(text) = self.active_text() {
            text.push(c);
        }
    }

    fn cycle(&mut self, step: isize) {
        match self.field {
            Field::Industry => {
                self.controller.form.industry =
                    cycle_option(Industry::ALL, self.controller.form.industry, step);
            }
            Field::UseCase => {
                self.controller.form.use_case =
                    cycle_option(UseCase::ALL, self.controller.form.use_case, step);
            }
            Field::Personas => {
                let len = Persona::ALL.len() as isize;
                let cursor = self.persona_cursor as isize;
                self.persona_cursor = (cursor + step).rem_euclid(len) as usize;
            }
            _ => {}
        }
    }

    /// "Create Another Deck": drop the handle, start a fresh draft.
    pub fn create_another(&mut self) {
        self.controller.reset();
        self.logo_path.clear();
        self.persona_cursor = 0;
        self.status = None;
        self.field = Field::Company;
    }

    pub async fn refresh_connection(&mut self, api: &ApiClient) {
        self.connection = ConnectionState::check(api).await;
    }

    /// Start the submit flow: load the logo if a path was entered, then
    /// validate the draft. Returns the request to send once the in-flight
    /// state has been rendered; failures end up in the status line.
    pub async fn begin_submit(&mut self) -> Option<GenerateDeckRequest> {
        let logo_path = self.logo_path.trim().to_string();
        if logo_path.is_empty() {
            self.controller.form.logo = None;
        } else {
            match Logo::from_path(&PathBuf::from(&logo_path)).await {
                Ok(logo) => self.controller.form.logo = Some(logo),
                Err(err) => {
                    self.status = Some(err.to_string());
                    return None;
                }
            }
        }

        match self.controller.begin_submit() {
            Ok(request) => {
                self.status = Some("Generating deck...".to_string());
                Some(request)
            }
            Err(err) => {
                self.status = Some(err.to_string());
                None
            }
        }
    }

    /// Send the request produced by [`begin_submit`](Self::begin_submit)
    /// and fold the outcome into the controller.
    pub async fn finish_submit(&mut self, api: &ApiClient, request: GenerateDeckRequest) {
        let result = api.generate_deck(&request).await;
        match self.controller.finish_submit(result) {
            Ok(()) => self.status = None,
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    /// Download into the current directory, expiry permitting.
    pub async fn download(&mut self, api: &ApiClient) {
        let dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        match self.controller.download(api, &dir).await {
            Ok(path) => self.status = Some(format!("Saved to: {}", path.display())),
            Err(err) => self.status = Some(err.to_string()),
        }
    }
}

fn cycle_option<T: Copy + PartialEq>(all: &[T], current: Option<T>, step: isize) -> Option<T> {
    let len = all.len() as isize;
    if len == 0 {
        return None;
    }
    let index = match current {
        None => {
            if step >= 0 {
                0
            } else {
                len - 1
            }
        }
        Some(value) => {
            let position = all.iter().position(|v| *v == value)? as isize;
            (position + step).rem_euclid(len)
        }
    };
    all.get(index as usize).copied()
}
