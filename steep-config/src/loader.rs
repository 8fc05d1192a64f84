//! Configuration loading and environment variable handling

use crate::domains::SteepConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::Path;
use std::str::FromStr;

/// Configuration loader with environment variable support.
///
/// Prefixed variables (`STEEP_*`) override individual fields. The target
/// location additionally honours the bare `HOST`, `PORT` and `BASE_PATH`
/// variables used by container setups.
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "STEEP".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<SteepConfig> {
        let content = std::fs::read_to_string(path)?;
        let mut config: SteepConfig = serde_yaml::from_str(&content)?;

        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<SteepConfig> {
        let mut config = SteepConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<SteepConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    fn apply_env_overrides(&self, config: &mut SteepConfig) -> ConfigResult<()> {
        self.apply_target_overrides(&mut config.target)?;
        self.apply_http_overrides(&mut config.http)?;
        self.apply_logging_overrides(&mut config.logging)?;
        self.apply_session_overrides(&mut config.session)?;
        self.apply_load_overrides(&mut config.load)?;
        Ok(())
    }

    fn apply_target_overrides(
        &self,
        config: &mut crate::domains::target::TargetConfig,
    ) -> ConfigResult<()> {
        if let Some(host) = self.get_target_var("HOST") {
            config.host = host;
        }

        if let Some(port) = self.get_target_var("PORT") {
            config.port = port
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid PORT: {}", e)))?;
        }

        if let Some(base_path) = self.get_target_var("BASE_PATH") {
            config.base_path = base_path;
        }

        Ok(())
    }

    fn apply_http_overrides(
        &self,
        config: &mut crate::domains::http::HttpConfig,
    ) -> ConfigResult<()> {
        if let Ok(timeout) = self.get_env_var("HTTP_TIMEOUT") {
            let seconds: u64 = timeout
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid HTTP_TIMEOUT: {}", e)))?;
            config.timeout = std::time::Duration::from_secs(seconds);
        }

        if let Ok(user_agent) = self.get_env_var("HTTP_USER_AGENT") {
            config.user_agent = user_agent;
        }

        if let Ok(verify_ssl) = self.get_env_var("HTTP_VERIFY_SSL") {
            config.verify_ssl = verify_ssl
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid HTTP_VERIFY_SSL: {}", e)))?;
        }

        Ok(())
    }

    fn apply_logging_overrides(
        &self,
        config: &mut crate::domains::logging::LoggingConfig,
    ) -> ConfigResult<()> {
        if let Ok(log_level) = self.get_env_var("LOG_LEVEL") {
            config.level = crate::domains::logging::LogLevel::from_str(&log_level)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", log_level)))?;
        }

        if let Ok(format) = self.get_env_var("LOG_FORMAT") {
            config.format = crate::domains::logging::LogFormat::from_str(&format)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_FORMAT: {}", format)))?;
        }

        Ok(())
    }

    fn apply_session_overrides(
        &self,
        config: &mut crate::domains::session::SessionConfig,
    ) -> ConfigResult<()> {
        if let Ok(username) = self.get_env_var("USERNAME") {
            config.username = username;
        }

        if let Ok(password) = self.get_env_var("PASSWORD") {
            config.password = password;
        }

        if let Ok(reset) = self.get_env_var("RESET_DATABASE") {
            config.reset_database = reset
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid RESET_DATABASE: {}", e)))?;
        }

        Ok(())
    }

    fn apply_load_overrides(
        &self,
        config: &mut crate::domains::load::LoadConfig,
    ) -> ConfigResult<()> {
        if let Ok(users) = self.get_env_var("USERS") {
            config.users = users
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid USERS: {}", e)))?;
        }

        if let Ok(run_time) = self.get_env_var("RUN_TIME") {
            let seconds: u64 = run_time
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid RUN_TIME: {}", e)))?;
            config.run_time = std::time::Duration::from_secs(seconds);
        }

        if let Ok(flow) = self.get_env_var("FLOW") {
            config.flow = crate::domains::load::Flow::from_str(&flow)
                .map_err(ConfigError::EnvError)?;
        }

        Ok(())
    }

    /// Get environment variable with prefix
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }

    /// Prefixed variable first, then the bare name
    fn get_target_var(&self, name: &str) -> Option<String> {
        self.get_env_var(name)
            .or_else(|_| std::env::var(name))
            .ok()
            .filter(|value| !value.trim().is_empty())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
