use std::env;

use crate::domain::TimeComparison;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub profile: String,
    pub time_comparison: TimeComparison,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_env_with_profile(None)
    }

    /// Like `from_env`, with `profile` (from `--profile`) taking precedence over `PROFILE`
    pub fn from_env_with_profile(profile: Option<String>) -> Self {
        let profile = profile
            .or_else(|| env::var("PROFILE").ok())
            .unwrap_or_else(|| "default".to_string());

        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            if profile == "default" {
                "sqlite://railway.db?mode=rwc".to_string()
            } else {
                format!("sqlite://railway_{}.db?mode=rwc", profile)
            }
        });

        let time_comparison = match env::var("SCHEDULE_TIME_COMPARISON") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("{}, falling back to {}", e, TimeComparison::default());
                TimeComparison::default()
            }),
            Err(_) => TimeComparison::default(),
        };

        Self {
            database_url,
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            profile,
            time_comparison,
        }
    }
}
