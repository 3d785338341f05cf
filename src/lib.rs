//! blog-front: front end for a personal blog backed by a remote posts API
//!
//! Pages fetch post data through single-shot [`fetch::Fetch`] state machines
//! and render it as HTML once the data is available.

pub mod commands;
pub mod config;
pub mod content;
pub mod fetch;
pub mod helpers;
pub mod pages;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// The main front end application
#[derive(Debug, Clone)]
pub struct BlogFront {
    /// Resolved configuration, environment overrides applied
    pub config: config::FrontConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Client shared by every fetch this front end creates
    pub client: fetch::ApiClient,
}

impl BlogFront {
    /// Create a new front end from a directory holding `_config.yml`
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            config::FrontConfig::load(&config_path)?
        } else {
            tracing::debug!("No config at {:?}, using defaults", config_path);
            config::FrontConfig::default()
        };
        config.apply_env()?;

        Self::from_config(config, base_dir)
    }

    /// Create a front end from an already resolved configuration
    pub fn from_config<P: AsRef<Path>>(config: config::FrontConfig, base_dir: P) -> Result<Self> {
        let client = fetch::ApiClient::from_config(&config)?;
        Ok(Self {
            config,
            base_dir: base_dir.as_ref().to_path_buf(),
            client,
        })
    }

    /// A fresh, not yet started fetch of the post listing
    pub fn posts(&self, query: fetch::ListQuery) -> fetch::Fetch<fetch::PostList> {
        fetch::Fetch::new(self.client.clone(), fetch::PostList::new(query))
    }

    /// A fresh, not yet started fetch of one post
    pub fn post(&self, id: &str) -> fetch::Fetch<fetch::PostDetail> {
        fetch::Fetch::new(self.client.clone(), fetch::PostDetail::new(id))
    }

    /// Serve the pages over HTTP
    pub async fn serve(self, ip: &str, port: u16) -> Result<()> {
        server::start(self, ip, port).await
    }
}
