//! Shared HTTP client for the posts API

use anyhow::Result;
use std::time::Duration;

use crate::config::{ApiConfig, FrontConfig};
use crate::helpers::DisplayZone;

/// Explicit connection settings handed to every fetch
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    posts_url: String,
    posts_by_date_url: String,
    timeout: Option<Duration>,
    zone: DisplayZone,
}

impl ApiClient {
    /// Build a client for the given API endpoints
    pub fn new(api: &ApiConfig, zone: DisplayZone) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("blog-front/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            posts_url: api.posts_url(),
            posts_by_date_url: api.posts_by_date_url(),
            timeout: api.timeout(),
            zone,
        })
    }

    /// Build a client from the full front end configuration
    pub fn from_config(config: &FrontConfig) -> Result<Self> {
        Self::new(&config.api, config.display_zone()?)
    }

    /// Replace the per-request timeout
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn posts_url(&self) -> &str {
        &self.posts_url
    }

    pub fn posts_by_date_url(&self) -> &str {
        &self.posts_by_date_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn zone(&self) -> DisplayZone {
        self.zone
    }
}
