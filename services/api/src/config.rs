use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;
use tutor_core::session::SessionConfig;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub problem_path: PathBuf,
    pub handoff_delay: Duration,
    pub event_poll: Duration,
    pub cors_origins: Vec<String>,
}

fn parse_millis(var: &str, default_ms: u64) -> Result<Duration, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| {
                ConfigError::InvalidValue(
                    var.to_string(),
                    format!("'{}' is not a valid millisecond count", raw),
                )
            }),
        Err(_) => Ok(Duration::from_millis(default_ms)),
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let problem_path = std::env::var("PROBLEM_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./problems/hard4.json"));

        let handoff_delay = parse_millis("HANDOFF_DELAY_MS", 2000)?;
        let event_poll = parse_millis("EVENT_POLL_MS", 1000)?;

        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            bind_address,
            log_level,
            problem_path,
            handoff_delay,
            event_poll,
            cors_origins,
        })
    }

    /// The per-session timing knobs derived from this configuration.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            handoff_delay: self.handoff_delay,
            event_poll: self.event_poll,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tracing::Level;

    fn clear_env_vars() {
        unsafe {
            env::remove_var("BIND_ADDRESS");
            env::remove_var("RUST_LOG");
            env::remove_var("PROBLEM_PATH");
            env::remove_var("HANDOFF_DELAY_MS");
            env::remove_var("EVENT_POLL_MS");
            env::remove_var("CORS_ORIGINS");
        }
    }

    #[test]
    fn test_config_error_display() {
        let missing_var = ConfigError::MissingVar("TEST_VAR".to_string());
        assert_eq!(
            format!("{}", missing_var),
            "Missing environment variable: TEST_VAR"
        );

        let invalid_value =
            ConfigError::InvalidValue("TEST_VAR".to_string(), "bad_value".to_string());
        assert_eq!(
            format!("{}", invalid_value),
            "Invalid value for environment variable TEST_VAR: bad_value"
        );
    }

    #[test]
    #[serial]
    fn test_config_from_env_defaults() {
        clear_env_vars();

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.bind_address.to_string(), "0.0.0.0:8000");
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.problem_path, PathBuf::from("./problems/hard4.json"));
        assert_eq!(config.handoff_delay, Duration::from_millis(2000));
        assert_eq!(config.event_poll, Duration::from_millis(1000));
        assert_eq!(config.cors_origins, vec!["http://localhost:5173"]);
    }

    #[test]
    #[serial]
    fn test_config_from_env_custom_values() {
        clear_env_vars();
        unsafe {
            env::set_var("BIND_ADDRESS", "127.0.0.1:8080");
            env::set_var("RUST_LOG", "debug");
            env::set_var("PROBLEM_PATH", "/data/problems/easy1.json");
            env::set_var("HANDOFF_DELAY_MS", "500");
            env::set_var("EVENT_POLL_MS", "250");
            env::set_var(
                "CORS_ORIGINS",
                "http://localhost:5173, https://tutor.example.com",
            );
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.bind_address.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.problem_path, PathBuf::from("/data/problems/easy1.json"));
        assert_eq!(config.handoff_delay, Duration::from_millis(500));
        assert_eq!(config.event_poll, Duration::from_millis(250));
        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:5173", "https://tutor.example.com"]
        );
    }

    #[test]
    #[serial]
    fn test_config_invalid_bind_address() {
        clear_env_vars();
        unsafe {
            env::set_var("BIND_ADDRESS", "not-a-valid-address");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "BIND_ADDRESS"),
            _ => panic!("Expected InvalidValue for BIND_ADDRESS"),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_log_level() {
        clear_env_vars();
        unsafe {
            env::set_var("RUST_LOG", "not-a-level");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "RUST_LOG"),
            _ => panic!("Expected InvalidValue for RUST_LOG"),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_handoff_delay() {
        clear_env_vars();
        unsafe {
            env::set_var("HANDOFF_DELAY_MS", "soon");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "HANDOFF_DELAY_MS"),
            _ => panic!("Expected InvalidValue for HANDOFF_DELAY_MS"),
        }
    }

    #[test]
    #[serial]
    fn test_session_config_mirrors_timings() {
        clear_env_vars();
        unsafe {
            env::set_var("HANDOFF_DELAY_MS", "750");
            env::set_var("EVENT_POLL_MS", "100");
        }

        let config = Config::from_env().expect("Config should load successfully");
        let session_config = config.session_config();
        assert_eq!(session_config.handoff_delay, Duration::from_millis(750));
        assert_eq!(session_config.event_poll, Duration::from_millis(100));
    }
}
