use crate::config::{CliConfig, ContextConfig, ContextManager, ContextUpdate};
use crate::types::ContextOperation;
use anyhow::Result;

/// Handle context management commands
pub async fn handle_context_command(operation: &ContextOperation) -> Result<()> {
    let mut manager = ContextManager::new().await?;
    handle_context_command_with_manager(operation, &mut manager).await
}

/// Handle context management commands with a specific ContextManager
pub async fn handle_context_command_with_manager(
    operation: &ContextOperation,
    manager: &mut ContextManager,
) -> Result<()> {
    match operation {
        ContextOperation::Set {
            name,
            api,
            realtime,
            storage,
            bucket,
            region,
            identity,
            token,
        } => {
            let update = ContextUpdate {
                api_url: api.clone(),
                realtime_url: realtime.clone(),
                storage_url: storage.clone(),
                bucket: bucket.clone(),
                region: region.clone(),
                identity_id: identity.clone(),
                auth_token: token.clone(),
            };
            handle_context_set(name.clone(), update, manager).await
        }
        ContextOperation::Get => handle_context_get(manager),
        ContextOperation::Select { name } => {
            handle_context_select(name.clone(), manager).await
        }
    }
}

async fn handle_context_set(
    name: Option<String>,
    update: ContextUpdate,
    manager: &mut ContextManager,
) -> Result<()> {
    manager.set_context(name.clone(), update).await?;

    let context_name =
        name.unwrap_or_else(|| manager.config().current_context.clone());
    println!("ctx:'{}' updated successfully", context_name);

    if let Some(context) = manager.config().get_context(&context_name) {
        println!("Configuration:");
        print_field("apiUrl", &context.api_url);
        print_field("realtimeUrl", &context.realtime_url);
        print_field("storageUrl", &context.storage_url);
        print_field("bucket", &context.bucket);
        print_field("region", &context.region);
        print_field("identityId", &context.identity_id);
        if context.auth_token.is_some() {
            println!("  authToken: <set>");
        }
    }

    Ok(())
}

fn print_field(label: &str, value: &Option<String>) {
    if let Some(value) = value {
        println!("  {}: '{}'", label, value);
    }
}

fn handle_context_get(manager: &ContextManager) -> Result<()> {
    let config_json = serde_json::to_string_pretty(&redacted(manager.config()))?;
    println!("{}", config_json);
    Ok(())
}

async fn handle_context_select(
    name: String,
    manager: &mut ContextManager,
) -> Result<()> {
    if manager.config().get_context(&name).is_none() {
        return Err(anyhow::anyhow!("Context '{}' does not exist", name));
    }

    manager.select_context(name.clone()).await?;
    println!("Switched to context '{}'", name);

    Ok(())
}

/// Copy of the configuration safe to print: tokens are masked.
pub(crate) fn redacted(config: &CliConfig) -> CliConfig {
    let mut config = config.clone();
    for context in config.contexts.values_mut() {
        mask_token(context);
    }
    config
}

fn mask_token(context: &mut ContextConfig) {
    if context.auth_token.is_some() {
        context.auth_token = Some("***".to_string());
    }
}
