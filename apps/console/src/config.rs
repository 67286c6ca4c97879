use std::time::Duration;

use pms_core::{LoadOptions, StatusVocabulary};
use serde::{Deserialize, Serialize};

const DEFAULT_SCRIPT_URL: &str = "https://script.google.com/macros/s/AKfycbxs9tUMiRRz3MmDBWR2627KSD69GKmcPUbsD39uVlrnfaCU3fMGZL3TkZQSgFIS5zkK/exec";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_BATCH_SIZE: usize = 3;
const DEFAULT_BATCH_DELAY_MS: u64 = 100;
const DEFAULT_LOGIN_USER: &str = "admin";
const DEFAULT_LOGIN_PASSWORD: &str = "admin123";

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppProfile {
    Dev,
    Prod,
}

impl AppProfile {
    pub fn from_env(value: Option<String>) -> Self {
        match value.as_deref().map(str::trim) {
            Some("prod") | Some("production") => Self::Prod,
            _ => Self::Dev,
        }
    }

    pub fn log_level(self) -> tracing::Level {
        match self {
            Self::Dev => tracing::Level::DEBUG,
            Self::Prod => tracing::Level::INFO,
        }
    }
}

/// The single shared login of the dashboard.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.username == username.trim() && self.password == password
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: DEFAULT_LOGIN_USER.to_string(),
            password: DEFAULT_LOGIN_PASSWORD.to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    pub script_url: String,
    pub profile: AppProfile,
    pub request_timeout: Duration,
    pub batch_size: usize,
    pub batch_delay: Duration,
    pub lenient_status: bool,
    pub credentials: Credentials,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            script_url: DEFAULT_SCRIPT_URL.to_string(),
            profile: AppProfile::Dev,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: Duration::from_millis(DEFAULT_BATCH_DELAY_MS),
            lenient_status: false,
            credentials: Credentials::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        crate::config::load_dotenv();

        let mut config = Self::default();

        if let Some(url) = read_env("PMS_SCRIPT_URL").filter(|url| !url.trim().is_empty()) {
            config.script_url = url.trim().to_string();
        }

        config.profile = AppProfile::from_env(read_env("PMS_PROFILE"));

        if let Some(secs) =
            read_env("PMS_REQUEST_TIMEOUT_SECS").and_then(|value| value.parse::<u64>().ok())
        {
            config.request_timeout = Duration::from_secs(secs.max(1));
        }

        if let Some(size) =
            read_env("PMS_FETCH_BATCH_SIZE").and_then(|value| value.parse::<usize>().ok())
        {
            config.batch_size = size.max(1);
        }

        if let Some(ms) =
            read_env("PMS_FETCH_BATCH_DELAY_MS").and_then(|value| value.parse::<u64>().ok())
        {
            config.batch_delay = Duration::from_millis(ms);
        }

        if let Some(flag) = read_env("PMS_LENIENT_STATUS") {
            config.lenient_status = parse_flag(&flag);
        }

        if let Some(user) = read_env("PMS_LOGIN_USER") {
            config.credentials.username = user.trim().to_string();
        }

        if let Some(password) = read_env("PMS_LOGIN_PASSWORD") {
            config.credentials.password = password;
        }

        config
    }

    pub fn vocabulary(&self) -> StatusVocabulary {
        if self.lenient_status {
            StatusVocabulary::Lenient
        } else {
            StatusVocabulary::Strict
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            batch_size: self.batch_size,
            batch_delay: self.batch_delay,
            vocabulary: self.vocabulary(),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .or_else(|| option_env_from_build(key).map(|s| s.to_string()))
}

fn option_env_from_build(key: &str) -> Option<&'static str> {
    match key {
        "PMS_SCRIPT_URL" => option_env!("PMS_SCRIPT_URL"),
        "PMS_PROFILE" => option_env!("PMS_PROFILE"),
        "PMS_REQUEST_TIMEOUT_SECS" => option_env!("PMS_REQUEST_TIMEOUT_SECS"),
        "PMS_FETCH_BATCH_SIZE" => option_env!("PMS_FETCH_BATCH_SIZE"),
        "PMS_FETCH_BATCH_DELAY_MS" => option_env!("PMS_FETCH_BATCH_DELAY_MS"),
        "PMS_LENIENT_STATUS" => option_env!("PMS_LENIENT_STATUS"),
        "PMS_LOGIN_USER" => option_env!("PMS_LOGIN_USER"),
        "PMS_LOGIN_PASSWORD" => option_env!("PMS_LOGIN_PASSWORD"),
        _ => None,
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_dotenv() {
    if let Err(err) = dotenvy::dotenv() {
        if !matches!(err, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            tracing::warn!("failed to load .env: {err}");
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[inline]
pub fn load_dotenv() {}
