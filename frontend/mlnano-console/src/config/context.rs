use super::{CliConfig, ContextConfig, file};
use anyhow::Result;
use std::path::Path;

/// Fields accepted by `context set`; `None` leaves the stored value alone.
#[derive(Debug, Clone, Default)]
pub struct ContextUpdate {
    pub api_url: Option<String>,
    pub realtime_url: Option<String>,
    pub storage_url: Option<String>,
    pub bucket: Option<String>,
    pub region: Option<String>,
    pub identity_id: Option<String>,
    pub auth_token: Option<String>,
}

/// Context management operations
pub struct ContextManager {
    config: CliConfig,
    config_path: Option<std::path::PathBuf>,
}

impl ContextManager {
    /// Create a new context manager with loaded configuration
    pub async fn new() -> Result<Self> {
        let config = super::load_or_create_config().await?;
        Ok(Self {
            config,
            config_path: None,
        })
    }

    /// Create a new context manager with a specific config path
    pub async fn with_config_path<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config =
            super::load_or_create_config_from_path(config_path.as_ref()).await?;
        Ok(Self {
            config,
            config_path: Some(config_path.as_ref().to_path_buf()),
        })
    }

    /// Get the current configuration
    pub fn config(&self) -> &CliConfig {
        &self.config
    }

    /// Save configuration changes
    pub async fn save(&self) -> Result<()> {
        if let Some(config_path) = &self.config_path {
            file::save_config_to_path(&self.config, config_path).await
        } else {
            file::save_config(&self.config).await
        }
    }

    /// Set context values
    pub async fn set_context(
        &mut self,
        name: Option<String>,
        update: ContextUpdate,
    ) -> Result<()> {
        let context_name =
            name.unwrap_or_else(|| self.config.current_context.clone());

        // Get existing context or create new one
        let mut context = self
            .config
            .get_context(&context_name)
            .cloned()
            .unwrap_or_default();

        // Update provided fields
        if let Some(url) = update.api_url {
            context.api_url = Some(url);
        }
        if let Some(url) = update.realtime_url {
            context.realtime_url = Some(url);
        }
        if let Some(url) = update.storage_url {
            context.storage_url = Some(url);
        }
        if let Some(bucket) = update.bucket {
            context.bucket = Some(bucket);
        }
        if let Some(region) = update.region {
            context.region = Some(region);
        }
        if let Some(identity) = update.identity_id {
            context.identity_id = Some(identity);
        }
        if let Some(token) = update.auth_token {
            context.auth_token = Some(token);
        }

        self.config.set_context(context_name.clone(), context);

        // A fresh config without a usable current context adopts this one
        if !self
            .config
            .contexts
            .contains_key(&self.config.current_context)
        {
            self.config.current_context = context_name;
        }

        self.save().await
    }

    /// Switch to a different context
    pub async fn select_context(&mut self, name: String) -> Result<()> {
        self.config.set_current_context(name)?;
        self.save().await
    }

    /// Get current context configuration
    pub fn get_current_context(&self) -> Option<&ContextConfig> {
        self.config.current_context()
    }

    /// Named context, or the current one when no name is given
    pub fn resolve_context(&self, name: Option<&str>) -> Result<&ContextConfig> {
        match name {
            Some(name) => self
                .config
                .get_context(name)
                .ok_or_else(|| anyhow::anyhow!("Context '{}' does not exist", name)),
            None => self
                .get_current_context()
                .ok_or_else(|| anyhow::anyhow!("No context selected")),
        }
    }
}
