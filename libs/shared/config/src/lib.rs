use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub recurrence_preview_cap: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or_else(|| {
                    warn!("PORT not set or invalid, defaulting to 3000");
                    3000
                }),
            recurrence_preview_cap: env::var("RECURRENCE_PREVIEW_CAP")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or_else(|| {
                    warn!("RECURRENCE_PREVIEW_CAP not set or invalid, defaulting to 52");
                    52
                }),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            recurrence_preview_cap: 52,
        }
    }
}
