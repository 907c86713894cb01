use std::time::Duration;

use facematch_core::session::DEFAULT_RECOGNITION_INTERVAL;

/// CLI configuration, loaded from environment variables.
pub struct Config {
    /// Minimum time between auto-recognition passes during frame replay.
    pub recognition_interval: Duration,
}

impl Config {
    /// Load configuration from `FACEMATCH_*` environment variables with defaults.
    pub fn from_env() -> Self {
        Self {
            recognition_interval: env_u64("FACEMATCH_RECOGNITION_INTERVAL_MS")
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_RECOGNITION_INTERVAL),
        }
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognition_interval_from_env() {
        std::env::set_var("FACEMATCH_RECOGNITION_INTERVAL_MS", "250");
        assert_eq!(Config::from_env().recognition_interval, Duration::from_millis(250));

        std::env::set_var("FACEMATCH_RECOGNITION_INTERVAL_MS", "soon");
        assert_eq!(Config::from_env().recognition_interval, DEFAULT_RECOGNITION_INTERVAL);

        std::env::remove_var("FACEMATCH_RECOGNITION_INTERVAL_MS");
        assert_eq!(Config::from_env().recognition_interval, DEFAULT_RECOGNITION_INTERVAL);
    }
}
