use chrono::{DateTime, Utc};
use pitchdeck_api::ApiClient;

/// Outcome of the most recent health check. `Disconnected` deliberately
/// carries no timestamp; a failed check does not update "last checked".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Unknown,
    Connected { last_checked: DateTime<Utc> },
    Disconnected,
}

impl ConnectionState {
    /// Run a health check and fold the outcome into a state. A backend
    /// that answers but reports an unclear status counts as disconnected,
    /// same as a transport failure. Never fatal to the caller.
    pub async fn check(api: &ApiClient) -> Self {
        match api.health_check().await {
            Ok(health) if health.is_healthy() => ConnectionState::Connected {
                last_checked: Utc::now(),
            },
            Ok(health) => {
                tracing::warn!(status = %health.status, "backend responded but status is unclear");
                ConnectionState::Disconnected
            }
            Err(err) => {
                tracing::warn!("health check failed: {err}");
                ConnectionState::Disconnected
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected { .. })
    }

    pub fn last_checked(&self) -> Option<DateTime<Utc>> {
        match self {
            ConnectionState::Connected { last_checked } => Some(*last_checked),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use pitchdeck_testutil::{json_response, StubServer};

    #[tokio::test]
    async fn ok_status_becomes_connected_with_fresh_timestamp() -> Result<()> {
        let server =
            StubServer::start(vec![json_response("200 OK", r#"{"status":"ok"}"#)]).await?;
        let api = ApiClient::new(server.base_url());

        let before = Utc::now();
        let state = ConnectionState::check(&api).await;
        let after = Utc::now();

        assert!(state.is_connected());
        let checked = state
            .last_checked()
            .ok_or_else(|| anyhow::anyhow!("no timestamp"))?;
        assert!(checked >= before && checked <= after);
        Ok(())
    }

    #[tokio::test]
    async fn healthy_status_also_counts() -> Result<()> {
        let server =
            StubServer::start(vec![json_response("200 OK", r#"{"status":"healthy"}"#)]).await?;
        let api = ApiClient::new(server.base_url());
        assert!(ConnectionState::check(&api).await.is_connected());
        Ok(())
    }

    #[tokio::test]
    async fn unclear_status_is_disconnected() -> Result<()> {
        let server =
            StubServer::start(vec![json_response("200 OK", r#"{"status":"starting"}"#)]).await?;
        let api = ApiClient::new(server.base_url());

        let state = ConnectionState::check(&api).await;
        assert_eq!(state, ConnectionState::Disconnected);
        assert!(state.last_checked().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn network_error_is_disconnected_without_timestamp() -> Result<()> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let base = format!("http://{}", listener.local_addr()?);
        drop(listener);
        let api = ApiClient::new(base);

        let state = ConnectionState::check(&api).await;
        assert_eq!(state, ConnectionState::Disconnected);
        assert!(state.last_checked().is_none());
        Ok(())
    }
}
