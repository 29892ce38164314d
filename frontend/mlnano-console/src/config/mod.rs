mod context;
mod env;
mod file;

pub use context::*;
pub use env::*;
pub use file::*;

use anyhow::Result;
use mlnano_client::BackendConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main CLI configuration structure
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CliConfig {
    pub contexts: HashMap<String, ContextConfig>,
    pub current_context: String,
}

/// Configuration for a specific backend deployment
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ContextConfig {
    pub api_url: Option<String>,
    /// Subscription endpoint; falls back to `api_url` when unset
    #[serde(default)]
    pub realtime_url: Option<String>,
    pub storage_url: Option<String>,
    pub bucket: Option<String>,
    pub region: Option<String>,
    #[serde(default)]
    pub identity_id: Option<String>,
    #[serde(default)]
    pub auth_token: Option<String>,
}

impl ContextConfig {
    /// Endpoints needed to build the backend clients.
    pub fn backend_config(&self) -> Result<BackendConfig> {
        let api_url = required(&self.api_url, "API URL")?;
        Ok(BackendConfig {
            realtime_url: self
                .realtime_url
                .clone()
                .unwrap_or_else(|| api_url.clone()),
            api_url,
            storage_url: required(&self.storage_url, "Storage URL")?,
            bucket: required(&self.bucket, "Storage bucket")?,
            region: required(&self.region, "Storage region")?,
        })
    }
}

fn required(value: &Option<String>, what: &str) -> Result<String> {
    value
        .clone()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| anyhow::anyhow!("{} not configured", what))
}

impl Default for CliConfig {
    fn default() -> Self {
        let mut contexts = HashMap::new();
        contexts.insert(
            "default".to_string(),
            ContextConfig {
                api_url: Some("http://localhost:20002/graphql".to_string()),
                realtime_url: Some(
                    "http://localhost:20002/graphql/stream".to_string(),
                ),
                storage_url: Some("http://localhost:20005/objects".to_string()),
                bucket: Some("mlnano-datasets".to_string()),
                region: Some("us-east-1".to_string()),
                identity_id: None,
                auth_token: None,
            },
        );

        Self {
            contexts,
            current_context: "default".to_string(),
        }
    }
}

impl CliConfig {
    /// Get the current context configuration
    pub fn current_context(&self) -> Option<&ContextConfig> {
        self.contexts.get(&self.current_context)
    }

    /// Get a specific context configuration
    pub fn get_context(&self, name: &str) -> Option<&ContextConfig> {
        self.contexts.get(name)
    }

    /// Set the current context
    pub fn set_current_context(&mut self, name: String) -> Result<()> {
        if !self.contexts.contains_key(&name) {
            return Err(anyhow::anyhow!("Context '{}' does not exist", name));
        }
        self.current_context = name;
        Ok(())
    }

    /// Update or create a context
    pub fn set_context(&mut self, name: String, config: ContextConfig) {
        self.contexts.insert(name, config);
    }

    /// List all context names
    pub fn list_contexts(&self) -> Vec<&String> {
        let mut names: Vec<_> = self.contexts.keys().collect();
        names.sort();
        names
    }
}

/// Load or create default configuration
pub async fn load_or_create_config() -> Result<CliConfig> {
    match load_config().await {
        Ok(config) => Ok(config),
        Err(_) => {
            let config = CliConfig::default();
            save_config(&config).await?;
            Ok(config)
        }
    }
}

/// Load or create configuration from a specific path
pub async fn load_or_create_config_from_path(
    config_path: &std::path::Path,
) -> Result<CliConfig> {
    match file::load_config_from_path(config_path).await {
        Ok(config) => Ok(config),
        Err(_) => {
            let config = CliConfig::default();
            file::save_config_to_path(&config, config_path).await?;
            Ok(config)
        }
    }
}
