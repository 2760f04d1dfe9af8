use pitchdeck_common::{vocab, ExportFormat, GenerateDeckRequest, Industry, Persona, UseCase};

use crate::error::FormError;
use crate::logo::Logo;

/// Canned pain point sent when the user leaves the field blank.
pub const DEFAULT_PAIN_POINT: &str = "Inefficient processes and lack of automation";

/// The in-progress deck request. Lives in memory for the page session;
/// nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct DeckForm {
    pub company_name: String,
    pub industry: Option<Industry>,
    pub personas: Vec<Persona>,
    pub pain_point: String,
    pub use_case: Option<UseCase>,
    pub logo: Option<Logo>,
    pub export_format: ExportFormat,
}

impl DeckForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the persona if absent, remove it if present. Selection order is
    /// preserved for the joined request field.
    pub fn toggle_persona(&mut self, persona: Persona) {
        if let Some(pos) = self.personas.iter().position(|p| *p == persona) {
            self.personas.remove(pos);
        } else {
            self.personas.push(persona);
        }
    }

    pub fn has_persona(&self, persona: Persona) -> bool {
        self.personas.contains(&persona)
    }

    /// Local pre-submit validation. Missing required fields and the empty
    /// persona set report distinct reasons; nothing touches the network.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.company_name.trim().is_empty() {
            return Err(FormError::MissingField("company name"));
        }
        if self.industry.is_none() {
            return Err(FormError::MissingField("industry"));
        }
        if self.use_case.is_none() {
            return Err(FormError::MissingField("use case"));
        }
        if self.personas.is_empty() {
            return Err(FormError::NoPersona);
        }
        Ok(())
    }

    /// Assemble the wire request: personas joined with ", ", blank pain
    /// point replaced by the canned default, logo encoded as a data URI.
    pub fn to_request(&self) -> Result<GenerateDeckRequest, FormError> {
        self.validate()?;
        let industry = self.industry.ok_or(FormError::MissingField("industry"))?;
        let use_case = self.use_case.ok_or(FormError::MissingField("use case"))?;

        let main_pain_point = if self.pain_point.trim().is_empty() {
            DEFAULT_PAIN_POINT.to_string()
        } else {
            self.pain_point.trim().to_string()
        };

        Ok(GenerateDeckRequest {
            company_name: self.company_name.trim().to_string(),
            industry: industry.label().to_string(),
            buyer_persona: vocab::join_personas(&self.personas),
            main_pain_point,
            use_case: use_case.label().to_string(),
            logo_base64: self.logo.as_ref().map(Logo::data_uri),
        })
    }
}
