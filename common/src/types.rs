use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /generate-deck`. Field names are what the backend expects;
/// `buyer_persona` carries the selected personas joined with ", ".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateDeckRequest {
    pub company_name: String,
    pub industry: String,
    pub buyer_persona: String,
    pub main_pain_point: String,
    pub use_case: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_base64: Option<String>,
}

/// Successful response of `POST /generate-deck`: the handle to a generated
/// deck. The download link is only valid until `expires_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateDeckResponse {
    pub success: bool,
    pub file_id: String,
    pub download_url: String,
    pub filename: String,
    pub slides_generated: u32,
    pub expires_at: DateTime<Utc>,
}

impl GenerateDeckResponse {
    /// Whether the download link has lapsed. Evaluated against the caller's
    /// clock at each use, never cached.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Response of `GET /health`. Some backend revisions omit the timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.as_str(), "ok" | "healthy")
    }
}

/// Error body the backend sends with non-2xx responses. The field is
/// optional; a missing or unparseable body gets a synthesized message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use chrono::TimeZone;

    #[test]
    fn expiry_is_strictly_after() -> Result<()> {
        let handle = GenerateDeckResponse {
            success: true,
            file_id: "abc".to_string(),
            download_url: "/download/abc".to_string(),
            filename: "deck.pptx".to_string(),
            slides_generated: 12,
            expires_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single()
                .ok_or_else(|| anyhow::anyhow!("bad timestamp"))?,
        };
        let day_after = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).single()
            .ok_or_else(|| anyhow::anyhow!("bad timestamp"))?;
        assert!(handle.is_expired(day_after));
        assert!(!handle.is_expired(handle.expires_at));
        Ok(())
    }

    #[test]
    fn response_fields_survive_deserialization() -> Result<()> {
        let json = r#"{
            "success": true,
            "file_id": "abc",
            "download_url": "/download/abc",
            "filename": "deck.pptx",
            "slides_generated": 12,
            "expires_at": "2030-01-01T00:00:00Z"
        }"#;
        let handle: GenerateDeckResponse = serde_json::from_str(json)?;
        assert!(handle.success);
        assert_eq!(handle.file_id, "abc");
        assert_eq!(handle.download_url, "/download/abc");
        assert_eq!(handle.filename, "deck.pptx");
        assert_eq!(handle.slides_generated, 12);
        Ok(())
    }

    #[test]
    fn request_omits_absent_logo() -> Result<()> {
        let request = GenerateDeckRequest {
            company_name: "Acme".to_string(),
            industry: "Healthcare".to_string(),
            buyer_persona: "CEO/Founder, CFO".to_string(),
            main_pain_point: "Manual workflows".to_string(),
            use_case: "Product Demo".to_string(),
            logo_base64: None,
        };
        let json = serde_json::to_string(&request)?;
        assert!(!json.contains("logo_base64"));
        Ok(())
    }

    #[test]
    fn health_tolerates_missing_timestamp() -> Result<()> {
        let health: HealthResponse = serde_json::from_str(r#"{"status":"healthy"}"#)?;
        assert!(health.is_healthy());
        assert!(health.timestamp.is_none());
        let degraded: HealthResponse = serde_json::from_str(r#"{"status":"degraded"}"#)?;
        assert!(!degraded.is_healthy());
        Ok(())
    }

    #[test]
    fn error_body_field_is_optional() -> Result<()> {
        let body: ApiErrorBody = serde_json::from_str(r#"{"error":"boom"}"#)?;
        assert_eq!(body.error.as_deref(), Some("boom"));
        let empty: ApiErrorBody = serde_json::from_str("{}")?;
        assert!(empty.error.is_none());
        Ok(())
    }
}
