//! Front end configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::helpers::DisplayZone;

/// Environment variable overriding `api.scheme`
pub const ENV_API_SCHEME: &str = "BLOG_API_SCHEME";
/// Environment variable overriding `api.host`
pub const ENV_API_HOST: &str = "BLOG_API_HOST";
/// Environment variable overriding `api.port`
pub const ENV_API_PORT: &str = "BLOG_API_PORT";

/// Main front end configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub timezone: String,

    // URL
    pub url: String,
    pub root: String,

    // Presentation
    pub image: Option<String>,
    pub stylesheet: String,
    #[serde(default)]
    pub links: Vec<LinkConfig>,
    pub static_dir: String,

    // Posts API
    #[serde(default)]
    pub api: ApiConfig,
}

impl Default for FrontConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            subtitle: String::new(),
            description: String::new(),
            author: "John Doe".to_string(),
            language: "en".to_string(),
            timezone: String::new(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            image: None,
            stylesheet: "style/index.css".to_string(),
            links: Vec::new(),
            static_dir: "public".to_string(),

            api: ApiConfig::default(),
        }
    }
}

impl FrontConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: FrontConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    /// Apply `BLOG_API_*` overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(scheme) = lookup(ENV_API_SCHEME) {
            self.api.scheme = scheme;
        }
        if let Some(host) = lookup(ENV_API_HOST) {
            self.api.host = host;
        }
        if let Some(port) = lookup(ENV_API_PORT) {
            self.api.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {:?}", ENV_API_PORT, port))?;
            tracing::debug!("API port overridden to {}", self.api.port);
        }
        Ok(())
    }

    /// Resolve the configured display time zone
    pub fn display_zone(&self) -> Result<DisplayZone> {
        Ok(self.timezone.parse::<DisplayZone>()?)
    }
}

/// Profile link shown in the page header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkConfig {
    pub name: String,
    pub url: String,
}

/// Remote posts API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub posts_path: String,
    pub posts_by_date_path: String,
    /// Per-request timeout; `None` waits indefinitely
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: "localhost".to_string(),
            port: 8003,
            posts_path: "posts".to_string(),
            posts_by_date_path: "posts-by-date".to_string(),
            timeout_secs: Some(10),
        }
    }
}

impl ApiConfig {
    /// `{scheme}://{host}:{port}`
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }

    /// Endpoint serving single posts
    pub fn posts_url(&self) -> String {
        format!("{}/{}", self.base_url(), self.posts_path.trim_matches('/'))
    }

    /// Endpoint serving post summaries filtered by date
    pub fn posts_by_date_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url(),
            self.posts_by_date_path.trim_matches('/')
        )
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
