/*!
 * Runtime Configuration
 *
 * Settings are resolved from defaults, then an optional JSON file, then
 * environment variables:
 * - DESKTOP_DEFAULT_APP: id of the always-running application (default: finder)
 * - DESKTOP_PID_BASE: first process identity handed out (default: 1000)
 * - DESKTOP_SUPERVISION: enable process table bookkeeping (default: true)
 * - DESKTOP_SLOW_OP_MS: slow lifecycle operation threshold (default: 10)
 */

use crate::core::errors::ConfigError;
use crate::core::limits::{
    DEFAULT_APP_ID, DEFAULT_PID_BASE, ENV_DEFAULT_APP, ENV_PID_BASE, ENV_SLOW_OP_MS,
    ENV_SUPERVISION, SLOW_OPERATION_THRESHOLD,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct RuntimeConfig {
    /// Application that is launched at boot and can never be terminated
    pub default_app_id: String,
    /// First process identity issued by the process table
    pub pid_base: u32,
    /// When false the supervisor runs without a process table
    pub supervision: bool,
    pub slow_operation_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            default_app_id: DEFAULT_APP_ID.to_string(),
            pid_base: DEFAULT_PID_BASE,
            supervision: true,
            slow_operation_ms: SLOW_OPERATION_THRESHOLD.as_millis() as u64,
        }
    }
}

impl RuntimeConfig {
    /// Defaults overridden by environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// Load a JSON config file; missing keys keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides on top of this config
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(app) = lookup(ENV_DEFAULT_APP) {
            self.default_app_id = app;
        }
        if let Some(raw) = lookup(ENV_PID_BASE) {
            self.pid_base = raw.parse().map_err(|_| invalid(ENV_PID_BASE, &raw))?;
        }
        if let Some(raw) = lookup(ENV_SUPERVISION) {
            self.supervision = match raw.as_str() {
                "1" | "true" => true,
                "0" | "false" => false,
                _ => return Err(invalid(ENV_SUPERVISION, &raw)),
            };
        }
        if let Some(raw) = lookup(ENV_SLOW_OP_MS) {
            self.slow_operation_ms = raw.parse().map_err(|_| invalid(ENV_SLOW_OP_MS, &raw))?;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_app_id.trim().is_empty() {
            return Err(invalid("default_app_id", &self.default_app_id));
        }
        if self.pid_base == 0 {
            return Err(invalid("pid_base", "0"));
        }
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn with_default_app(mut self, app_id: impl Into<String>) -> Self {
        self.default_app_id = app_id.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_pid_base(mut self, pid_base: u32) -> Self {
        self.pid_base = pid_base;
        self
    }

    #[inline]
    #[must_use]
    pub fn without_supervision(mut self) -> Self {
        self.supervision = false;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_slow_operation_ms(mut self, millis: u64) -> Self {
        self.slow_operation_ms = millis;
        self
    }

    pub fn slow_operation_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_operation_ms)
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
