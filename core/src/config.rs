use serde::{Deserialize, Serialize};

/// Hosted backend this client talks to unless overridden.
pub const DEFAULT_API_URL: &str = "https://pitchperfect-1.onrender.com";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub api_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("PITCHDECK_API_URL") {
            if !url.is_empty() {
                config.api_url = url;
            }
        }

        config
    }
}
