//! Harness configuration: target endpoints, accounts, fixtures, wait timing.
//!
//! Defaults point at the deployed CarSphere instance so a checkout runs
//! without any config file; a JSON file can override any subset of fields.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::result::{HarnessError, HarnessResult};

/// Deployed application root
pub const DEFAULT_BASE_URL: &str = "https://carsphere.onrender.com";

/// One account supplied by the test-data collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Login name
    pub username: String,
    /// Password
    pub password: String,
}

impl Credentials {
    /// Create credentials
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Wait timing, in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitSettings {
    /// Element wait timeout
    #[serde(default = "WaitSettings::default_element_ms")]
    pub element_ms: u64,
    /// Polling interval
    #[serde(default = "WaitSettings::default_poll_ms")]
    pub poll_ms: u64,
    /// Timeout for externally-generated content
    #[serde(default = "WaitSettings::default_generation_ms")]
    pub generation_ms: u64,
}

impl WaitSettings {
    const fn default_element_ms() -> u64 {
        crate::wait::DEFAULT_TIMEOUT_MS
    }

    const fn default_poll_ms() -> u64 {
        crate::wait::DEFAULT_POLL_INTERVAL_MS
    }

    const fn default_generation_ms() -> u64 {
        crate::wait::DEFAULT_GENERATION_TIMEOUT_MS
    }

    /// Element timeout as a duration
    #[must_use]
    pub const fn element_timeout(&self) -> Duration {
        Duration::from_millis(self.element_ms)
    }

    /// Poll interval as a duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }

    /// Generation timeout as a duration
    #[must_use]
    pub const fn generation_timeout(&self) -> Duration {
        Duration::from_millis(self.generation_ms)
    }
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            element_ms: Self::default_element_ms(),
            poll_ms: Self::default_poll_ms(),
            generation_ms: Self::default_generation_ms(),
        }
    }
}

/// Full harness configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Application root URL
    pub base_url: String,
    /// Administrative account
    pub admin: Credentials,
    /// Standard (non-admin) account
    pub user: Credentials,
    /// Local image used as the add-car upload fixture
    pub upload_fixture: PathBuf,
    /// Wait timing
    pub wait: WaitSettings,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            admin: Credentials::new("admin", "admin"),
            user: Credentials::new("user3", "user3"),
            upload_fixture: PathBuf::from("test_images/AutoTestCar.jpg"),
            wait: WaitSettings::default(),
        }
    }
}

impl HarnessConfig {
    /// Load configuration from a JSON file; absent fields fall back to the
    /// defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> HarnessResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|err| HarnessError::Config {
            message: format!("cannot read {}: {err}", path.display()),
        })?;
        serde_json::from_str(&raw).map_err(|err| HarnessError::Config {
            message: format!("cannot parse {}: {err}", path.display()),
        })
    }

    /// Join a path onto the base URL
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// The application home URL
    #[must_use]
    pub fn home_url(&self) -> String {
        format!("{}/", self.base_url.trim_end_matches('/'))
    }
}
