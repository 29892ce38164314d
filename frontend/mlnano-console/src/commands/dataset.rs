use anyhow::{Context, Result};
use envconfig::Envconfig;
use mlnano_client::{
    ClientFactory, DataApi, GraphqlClient, ObjectStorage, StorageClient,
    Subscription,
};
use mlnano_models::DataSetRecord;
use std::future::Future;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

use crate::auth::AuthGate;
use crate::config::{ContextConfig, ContextManager, EnvOverrides};
use crate::controller::{CreateOutcome, DataSetController, FileLocation, PendingFile};
use crate::output::{OutputFormat, format_data_sets};
use crate::types::ConnectionArgs;
use crate::view;

pub type Controller = DataSetController<GraphqlClient, StorageClient>;

/// Backend clients for one resolved context.
pub struct Backend {
    pub api: GraphqlClient,
    pub storage: StorageClient,
    pub location: FileLocation,
}

impl Backend {
    pub fn into_controller(self) -> Controller {
        DataSetController::new(self.api, self.storage, self.location)
    }
}

/// Resolve the selected context with environment overrides applied.
pub async fn resolve_context(conn: &ConnectionArgs) -> Result<ContextConfig> {
    let manager = match &conn.config {
        Some(path) => ContextManager::with_config_path(path).await?,
        None => ContextManager::new().await?,
    };
    let mut context = manager.resolve_context(conn.context.as_deref())?.clone();
    EnvOverrides::init_from_env()
        .context("Failed to read MLNANO_* environment")?
        .apply(&mut context);
    Ok(context)
}

/// The auth gate runs here, before any client or view exists.
pub fn connect(context: &ContextConfig) -> Result<Backend> {
    let session = AuthGate::require_session(context)?;
    let backend = context.backend_config()?;
    let (api, storage) = ClientFactory::create_clients(&backend, session)?;
    Ok(Backend {
        api,
        storage,
        location: FileLocation {
            bucket: backend.bucket,
            region: backend.region,
        },
    })
}

async fn open_backend(conn: &ConnectionArgs) -> Result<Backend> {
    let context = resolve_context(conn).await?;
    connect(&context)
}

pub async fn handle_console_command(conn: &ConnectionArgs) -> Result<()> {
    let mut controller = open_backend(conn).await?.into_controller();
    view::run_console(&mut controller).await
}

pub async fn handle_upload_command(
    file: &Path,
    name: &str,
    conn: &ConnectionArgs,
) -> Result<()> {
    let mut controller = open_backend(conn).await?.into_controller();
    let key = upload_with(&mut controller, file, name).await?;
    println!("Uploaded data set '{}' as {}", name, key);
    Ok(())
}

/// Run the create flow once for a file on disk.
pub async fn upload_with<A, S>(
    controller: &mut DataSetController<A, S>,
    file: &Path,
    name: &str,
) -> Result<String>
where
    A: DataApi,
    S: ObjectStorage,
{
    controller.set_name(name);
    // an empty name alerts before the file is read
    if !name.is_empty() {
        controller.select_file(PendingFile::from_path(file).await?);
    }
    match controller.create().await {
        CreateOutcome::Stored { key } => Ok(key),
        CreateOutcome::Alert(message) => Err(anyhow::anyhow!(message)),
        CreateOutcome::Skipped => Err(anyhow::anyhow!("nothing to upload")),
        CreateOutcome::Failed { stage, key } => {
            Err(anyhow::anyhow!("{} failed for '{}'", stage, key))
        }
    }
}

pub async fn handle_list_command(
    format: &OutputFormat,
    conn: &ConnectionArgs,
) -> Result<()> {
    let backend = open_backend(conn).await?;
    println!("{}", list_with(&backend.api, format).await?);
    Ok(())
}

pub async fn list_with<A: DataApi>(api: &A, format: &OutputFormat) -> Result<String> {
    let data_sets = api
        .list_data_sets()
        .await
        .context("error fetching dataSets")?;
    format_data_sets(&data_sets, format)
}

pub async fn handle_open_command(key: &str, conn: &ConnectionArgs) -> Result<()> {
    let backend = open_backend(conn).await?;
    println!("{}", open_with(&backend.storage, key).await?);
    Ok(())
}

pub async fn open_with<S: ObjectStorage>(storage: &S, key: &str) -> Result<String> {
    storage
        .get(key)
        .await
        .with_context(|| format!("error resolving '{}'", key))
}

pub async fn handle_watch_command(conn: &ConnectionArgs) -> Result<()> {
    let backend = open_backend(conn).await?;
    let subscription = backend.api.subscribe_on_create().await?;
    info!("watching for new data sets, press ctrl-c to stop");
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("cannot listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };
    let mut stdout = std::io::stdout();
    watch_with(subscription, &mut stdout, shutdown).await?;
    Ok(())
}

/// Print each new record as one JSON line until `shutdown` resolves or the
/// feed ends. Returns how many records were printed.
pub async fn watch_with<W, F>(
    mut subscription: Subscription<DataSetRecord>,
    out: &mut W,
    shutdown: F,
) -> Result<usize>
where
    W: Write,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut printed = 0;
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            event = subscription.next() => match event {
                Some(Ok(record)) => {
                    writeln!(out, "{}", serde_json::to_string(&record)?)?;
                    out.flush()?;
                    printed += 1;
                }
                Some(Err(e)) => warn!("error receiving dataSet event: {e}"),
                None => {
                    info!("creation feed closed");
                    break;
                }
            },
        }
    }
    subscription.unsubscribe();
    Ok(printed)
}
