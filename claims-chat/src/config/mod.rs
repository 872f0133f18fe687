use serde::Deserialize;
use service_core::config::{self as core_config, TelemetrySettings};
use service_core::error::AppError;

#[derive(Deserialize, Clone, Debug, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub ui: UiSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Browser sessions and their transcripts are dropped after this much inactivity.
    #[serde(default = "default_session_idle_minutes")]
    pub session_idle_minutes: i64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            session_idle_minutes: default_session_idle_minutes(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_session_idle_minutes() -> i64 {
    60
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// Call the RAG backend over HTTP.
    Http,
    /// Answer from an in-process canned backend.
    Mock,
}

#[derive(Deserialize, Clone, Debug)]
pub struct BackendSettings {
    /// Origin of the RAG backend (e.g. http://localhost:8000).
    #[serde(default = "default_backend_url")]
    pub url: String,
    /// Path prefix in front of `/query`, `/ingest` and `/health`. Empty when
    /// `url` points at the backend itself rather than a proxy.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    #[serde(default = "default_backend_mode")]
    pub mode: BackendMode,
}

impl BackendSettings {
    /// Full URL of a backend API path such as `/query`.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}{}{}",
            self.url.trim_end_matches('/'),
            self.api_prefix.trim_end_matches('/'),
            path
        )
    }
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            api_prefix: default_api_prefix(),
            mode: default_backend_mode(),
        }
    }
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_api_prefix() -> String {
    String::new()
}

fn default_backend_mode() -> BackendMode {
    BackendMode::Http
}

#[derive(Deserialize, Clone, Debug)]
pub struct UiSettings {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_subtitle")]
    pub subtitle: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            subtitle: default_subtitle(),
        }
    }
}

fn default_title() -> String {
    "RAG Claims Assistant".to_string()
}

fn default_subtitle() -> String {
    "Connected to Local/Mock LLM".to_string()
}

pub fn get_configuration() -> Result<Settings, AppError> {
    let configuration_directory = core_config::configuration_directory("claims-chat")?;
    core_config::load(&configuration_directory)
}
