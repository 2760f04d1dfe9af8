use futures_util::StreamExt;
use pitchdeck_common::{ApiErrorBody, GenerateDeckRequest, GenerateDeckResponse, HealthResponse};

use crate::error::ApiError;

/// Client for one backend origin. Cheap to clone; all operations share a
/// single connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// `base_url` is the origin the three endpoints hang off, e.g.
    /// `https://pitchperfect-1.onrender.com`. Injected explicitly so tests
    /// and alternate deployments can point elsewhere.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `/health`. Feeds the connection indicator; failures here are
    /// never fatal to the rest of the app.
    pub async fn health_check(&self) -> Result<HealthResponse, ApiError> {
        let response = self.http.get(self.url("/health")).send().await?;
        let response = ok_or_api_error(response).await?;
        Ok(response.json::<HealthResponse>().await?)
    }

    /// POST `/generate-deck`. Returns the handle to the generated artifact.
    /// No retries: every failure is surfaced to the caller once.
    pub async fn generate_deck(
        &self,
        request: &GenerateDeckRequest,
    ) -> Result<GenerateDeckResponse, ApiError> {
        let url = self.url("/generate-deck");
        tracing::debug!(company = %request.company_name, "requesting deck generation");
        let response = self.http.post(url).json(request).send().await?;
        let response = ok_or_api_error(response).await?;
        let handle = response.json::<GenerateDeckResponse>().await?;
        tracing::debug!(
            file_id = %handle.file_id,
            slides = handle.slides_generated,
            "deck generated"
        );
        Ok(handle)
    }

    /// GET `/download/{file_id}`, streaming the body into memory. Non-2xx
    /// is a hard failure.
    pub async fn download_deck(&self, file_id: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.url(&format!("/download/{file_id}"));
        let response = self.http.get(url).send().await?;
        let response = ok_or_api_error(response).await?;

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            bytes.extend_from_slice(&chunk?);
        }
        tracing::debug!(file_id, size = bytes.len(), "deck downloaded");
        Ok(bytes)
    }
}

/// Normalize a non-2xx response into `ApiError::Status`: prefer the
/// backend's structured `{"error": ...}` message, otherwise synthesize
/// `HTTP <status>: <reason>`.
async fn ok_or_api_error(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .text()
        .await
        .ok()
        .and_then(|body| serde_json::from_str::<ApiErrorBody>(&body).ok())
        .and_then(|body| body.error)
        .unwrap_or_else(|| {
            format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status")
            )
        });
    Err(ApiError::Status(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use pitchdeck_testutil::{binary_response, json_response, response_with, StubServer};

    const HANDLE_JSON: &str = r#"{
        "success": true,
        "file_id": "abc",
        "download_url": "/download/abc",
        "filename": "deck.pptx",
        "slides_generated": 12,
        "expires_at": "2030-01-01T00:00:00Z"
    }"#;

    fn sample_request() -> GenerateDeckRequest {
        GenerateDeckRequest {
            company_name: "Acme".to_string(),
            industry: "Healthcare".to_string(),
            buyer_persona: "CEO/Founder, CFO".to_string(),
            main_pain_point: "Manual workflows".to_string(),
            use_case: "Product Demo".to_string(),
            logo_base64: None,
        }
    }

    #[tokio::test]
    async fn generate_deck_returns_handle_unmodified() -> Result<()> {
        let server = StubServer::start(vec![json_response("200 OK", HANDLE_JSON)]).await?;
        let client = ApiClient::new(server.base_url());

        let handle = client.generate_deck(&sample_request()).await?;
        assert_eq!(handle.file_id, "abc");
        assert_eq!(handle.download_url, "/download/abc");
        assert_eq!(handle.filename, "deck.pptx");
        assert_eq!(handle.slides_generated, 12);
        assert!(handle.success);

        assert_eq!(server.hits(), 1);
        let request = server
            .requests()
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("no request captured"))?;
        assert!(request.starts_with("POST /generate-deck HTTP/1.1"));
        assert!(request.contains("\"buyer_persona\":\"CEO/Founder, CFO\""));
        Ok(())
    }

    #[tokio::test]
    async fn unparseable_error_body_synthesizes_status_message() -> Result<()> {
        let server = StubServer::start(vec![response_with(
            "503 Service Unavailable",
            "text/html",
            b"<html>upstream down</html>",
        )])
        .await?;
        let client = ApiClient::new(server.base_url());

        let err = match client.generate_deck(&sample_request()).await {
            Err(err) => err,
            Ok(_) => anyhow::bail!("expected an error"),
        };
        assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");
        Ok(())
    }

    #[tokio::test]
    async fn structured_error_body_message_wins() -> Result<()> {
        let server = StubServer::start(vec![json_response(
            "400 Bad Request",
            r#"{"error":"company_name is required"}"#,
        )])
        .await?;
        let client = ApiClient::new(server.base_url());

        let err = match client.generate_deck(&sample_request()).await {
            Err(err) => err,
            Ok(_) => anyhow::bail!("expected an error"),
        };
        assert!(matches!(err, ApiError::Status(_)));
        assert_eq!(err.to_string(), "company_name is required");
        Ok(())
    }

    #[tokio::test]
    async fn json_error_body_without_message_synthesizes() -> Result<()> {
        let server =
            StubServer::start(vec![json_response("422 Unprocessable Entity", "{}")]).await?;
        let client = ApiClient::new(server.base_url());

        let err = match client.health_check().await {
            Err(err) => err,
            Ok(_) => anyhow::bail!("expected an error"),
        };
        assert_eq!(err.to_string(), "HTTP 422: Unprocessable Entity");
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_server_is_transport_error() -> Result<()> {
        // Bind then drop to get a port with nothing listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let base = format!("http://{}", listener.local_addr()?);
        drop(listener);
        let client = ApiClient::new(base);

        let err = match client.health_check().await {
            Err(err) => err,
            Ok(_) => anyhow::bail!("expected an error"),
        };
        assert!(matches!(err, ApiError::Transport(_)));
        Ok(())
    }

    #[tokio::test]
    async fn health_check_parses_status() -> Result<()> {
        let server = StubServer::start(vec![json_response(
            "200 OK",
            r#"{"status":"ok","timestamp":"2024-06-01T12:00:00Z"}"#,
        )])
        .await?;
        let client = ApiClient::new(server.base_url());

        let health = client.health_check().await?;
        assert_eq!(health.status, "ok");
        assert!(health.is_healthy());
        let request = server
            .requests()
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("no request captured"))?;
        assert!(request.starts_with("GET /health HTTP/1.1"));
        Ok(())
    }

    #[tokio::test]
    async fn download_returns_body_bytes() -> Result<()> {
        let body = b"PK\x03\x04not-really-a-pptx";
        let server = StubServer::start(vec![binary_response("200 OK", body)]).await?;
        let client = ApiClient::new(server.base_url());

        let bytes = client.download_deck("abc").await?;
        assert_eq!(bytes, body);
        let request = server
            .requests()
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("no request captured"))?;
        assert!(request.starts_with("GET /download/abc HTTP/1.1"));
        Ok(())
    }

    #[tokio::test]
    async fn download_non_2xx_is_hard_failure() -> Result<()> {
        let server = StubServer::start(vec![json_response(
            "404 Not Found",
            r#"{"error":"File not found or expired"}"#,
        )])
        .await?;
        let client = ApiClient::new(server.base_url());

        let err = match client.download_deck("gone").await {
            Err(err) => err,
            Ok(_) => anyhow::bail!("expected an error"),
        };
        assert_eq!(err.to_string(), "File not found or expired");
        Ok(())
    }

    #[test]
    fn trailing_slash_is_normalized() {
        let client = ApiClient::new("http://localhost:9999/");
        assert_eq!(client.base_url(), "http://localhost:9999");
        assert_eq!(client.url("/health"), "http://localhost:9999/health");
    }
}
