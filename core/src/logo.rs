use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{FormError, Result};

/// Upload cap, matching the backend's limit.
pub const MAX_LOGO_BYTES: u64 = 5 * 1024 * 1024;

/// A validated logo image. Construction enforces the size and MIME gates,
/// so a `Logo` held by a draft is always transmittable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logo {
    file_name: String,
    mime: String,
    bytes: Vec<u8>,
}

impl Logo {
    /// Read a logo from disk. The size and type checks run before the file
    /// contents are touched, so an oversized or non-image file is rejected
    /// without being read or encoded.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let metadata = tokio::fs::metadata(path).await?;
        if metadata.len() > MAX_LOGO_BYTES {
            return Err(FormError::LogoTooLarge(metadata.len()).into());
        }

        let mime = mime_guess::from_path(path).first_or_octet_stream();
        if mime.type_() != mime_guess::mime::IMAGE {
            return Err(FormError::LogoNotImage(mime.to_string()).into());
        }

        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "logo".to_string());
        Ok(Self::from_bytes(file_name, mime.to_string(), bytes)?)
    }

    pub fn from_bytes(
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> std::result::Result<Self, FormError> {
        let mime = mime.into();
        if bytes.len() as u64 > MAX_LOGO_BYTES {
            return Err(FormError::LogoTooLarge(bytes.len() as u64));
        }
        if !mime.starts_with("image/") {
            return Err(FormError::LogoNotImage(mime));
        }
        Ok(Self {
            file_name: file_name.into(),
            mime,
            bytes,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Encode for the `logo_base64` request field, data-URI form:
    /// `data:<mime>;base64,<payload>`.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}
