//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_MEDIA_BASE_PATH, DEFAULT_PUBLIC_BASE_URL, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub media_base_path: String,
    pub public_base_url: String,
    pub fcm_project_id: Option<String>,
    fcm_access_token: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("media_base_path", &self.media_base_path)
            .field("public_base_url", &self.public_base_url)
            .field("fcm_project_id", &self.fcm_project_id)
            .field("fcm_access_token", &"[REDACTED]")
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            media_base_path: DEFAULT_MEDIA_BASE_PATH.to_string(),
            public_base_url: DEFAULT_PUBLIC_BASE_URL.to_string(),
            fcm_project_id: None,
            fcm_access_token: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let fcm_project_id = non_empty_var("FCM_PROJECT_ID");
        let fcm_access_token = non_empty_var("FCM_ACCESS_TOKEN");
        if fcm_project_id.is_none() || fcm_access_token.is_none() {
            tracing::warn!("FCM_PROJECT_ID/FCM_ACCESS_TOKEN not set, push notifications disabled");
        }

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            media_base_path: env::var("MEDIA_BASE_PATH")
                .unwrap_or_else(|_| DEFAULT_MEDIA_BASE_PATH.to_string()),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_PUBLIC_BASE_URL.to_string()),
            fcm_project_id,
            fcm_access_token,
        }
    }

    /// FCM credentials, present only when both project id and token are set.
    pub fn fcm_credentials(&self) -> Option<(&str, &str)> {
        match (&self.fcm_project_id, &self.fcm_access_token) {
            (Some(project), Some(token)) => Some((project.as_str(), token.as_str())),
            _ => None,
        }
    }

    /// Set FCM credentials (used by tests and embedding callers).
    pub fn with_fcm(mut self, project_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        self.fcm_project_id = Some(project_id.into());
        self.fcm_access_token = Some(access_token.into());
        self
    }

    /// Turn a relative media path into an absolute URL.
    pub fn public_url(&self, relative: &str) -> String {
        format!("{}{}", self.public_base_url, relative)
    }

    /// Strip this server's public origin from an image URL, leaving the
    /// `/media/...` path. Foreign URLs are returned unchanged.
    pub fn media_path<'a>(&self, url: &'a str) -> &'a str {
        url.strip_prefix(self.public_base_url.as_str())
            .unwrap_or(url)
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
