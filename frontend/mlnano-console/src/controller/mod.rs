//! Page controller: pending form inputs, the create flow, the live feed and
//! on-demand key resolution.
//!
//! New records reach the list only through the creation feed. The record
//! returned by the create mutation is dropped, so a record is never inserted
//! twice (once from the mutation response and once from its own echo).

mod pending;

pub use pending::PendingFile;

use mlnano_client::{ClientError, DataApi, ObjectStorage, PutOptions, Subscription};
use mlnano_models::{CreateDataSetInput, DataSetRecord, S3Object};
use std::fmt;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::store::{ListState, ResolvedImage, StoreAction, reduce};

pub const EMPTY_NAME_ALERT: &str = "please enter a dataSetname";

/// Bucket coordinates written into every new record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLocation {
    pub bucket: String,
    pub region: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateStage {
    Upload,
    Mutation,
}

impl fmt::Display for CreateStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreateStage::Upload => f.write_str("upload"),
            CreateStage::Mutation => f.write_str("create mutation"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// Blocking message for the user; nothing was sent.
    Alert(&'static str),
    /// Name or file missing; nothing was sent.
    Skipped,
    /// Uploaded and recorded. The list changes when the feed echoes it.
    Stored { key: String },
    /// A step failed after logging. An upload without its record is left
    /// in place when the mutation fails.
    Failed { stage: CreateStage, key: String },
}

pub struct DataSetController<A, S> {
    api: A,
    storage: S,
    location: FileLocation,
    pending_file: Option<PendingFile>,
    pending_name: String,
    list: ListState,
    image: Option<ResolvedImage>,
    subscription: Option<Subscription<DataSetRecord>>,
}

impl<A, S> DataSetController<A, S>
where
    A: DataApi,
    S: ObjectStorage,
{
    pub fn new(api: A, storage: S, location: FileLocation) -> Self {
        Self {
            api,
            storage,
            location,
            pending_file: None,
            pending_name: String::new(),
            list: ListState::default(),
            image: None,
            subscription: None,
        }
    }

    /// Replace the pending file. A blank text value clears it.
    pub fn select_file(&mut self, file: PendingFile) {
        self.pending_file = Some(file).filter(|file| !file.is_blank_text());
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.pending_name = name.into();
    }

    pub fn pending_file(&self) -> Option<&PendingFile> {
        self.pending_file.as_ref()
    }

    pub fn pending_name(&self) -> &str {
        &self.pending_name
    }

    pub fn data_sets(&self) -> &[DataSetRecord] {
        &self.list.data_sets
    }

    pub fn image(&self) -> Option<&ResolvedImage> {
        self.image.as_ref()
    }

    /// Whether the creation feed is open.
    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    fn dispatch(&mut self, action: StoreAction) {
        if let StoreAction::ImageResolved(image) = &action {
            self.image = Some(image.clone());
        }
        self.list = reduce(std::mem::take(&mut self.list), action);
    }

    /// Initial load followed by opening the creation feed.
    pub async fn activate(&mut self) {
        self.load_data_sets().await;
        if self.subscription.is_some() {
            return;
        }
        match self.api.subscribe_on_create().await {
            Ok(subscription) => {
                debug!("creation feed open");
                self.subscription = Some(subscription);
            }
            Err(e) => error!("error subscribing to new dataSets: {e}"),
        }
    }

    /// Replace the list with the backend's first page.
    pub async fn load_data_sets(&mut self) {
        match self.api.list_data_sets().await {
            Ok(data_sets) => {
                debug!(count = data_sets.len(), "dataSets fetched");
                self.dispatch(StoreAction::SetDataSets(data_sets));
            }
            Err(e) => error!("error fetching dataSets: {e}"),
        }
    }

    /// Release the creation feed. Later events are never applied.
    pub fn deactivate(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }

    /// Wait for the next feed event. `None` means the feed is closed or was
    /// never opened.
    pub async fn next_live_event(
        &mut self,
    ) -> Option<Result<DataSetRecord, ClientError>> {
        match self.subscription.as_mut() {
            Some(subscription) => subscription.next().await,
            None => None,
        }
    }

    pub fn apply_live_event(
        &mut self,
        event: Option<Result<DataSetRecord, ClientError>>,
    ) {
        if self.subscription.is_none() {
            debug!("dropping feed event after teardown");
            return;
        }
        match event {
            Some(Ok(record)) => {
                debug!(id = %record.id, "dataSet created");
                self.dispatch(StoreAction::AddDataSet(record));
            }
            Some(Err(e)) => warn!("error receiving dataSet event: {e}"),
            None => {
                info!("creation feed closed by the backend");
                self.deactivate();
            }
        }
    }

    /// Wait for and apply one feed event. Returns false once the feed is gone.
    pub async fn pump_live_event(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        let event = self.next_live_event().await;
        self.apply_live_event(event);
        self.is_active()
    }

    /// Upload the pending file, then record it under the pending name.
    pub async fn create(&mut self) -> CreateOutcome {
        if self.pending_name.is_empty() {
            return CreateOutcome::Alert(EMPTY_NAME_ALERT);
        }
        let Some(file) = self
            .pending_file
            .as_ref()
            .filter(|file| !file.is_blank_text())
        else {
            return CreateOutcome::Skipped;
        };

        let key = format!("{}{}", Uuid::new_v4(), file.name);
        let input = CreateDataSetInput::new(
            self.pending_name.clone(),
            S3Object {
                bucket: self.location.bucket.clone(),
                region: self.location.region.clone(),
                key: key.clone(),
            },
        );

        let options = PutOptions::private(file.mime_type.clone());
        if let Err(e) = self.storage.put(&key, file.bytes.clone(), options).await {
            error!(%key, "error uploading dataSet file: {e}");
            return CreateOutcome::Failed {
                stage: CreateStage::Upload,
                key,
            };
        }
        debug!(?input, "file uploaded");

        if let Err(e) = self.api.create_data_set(&input).await {
            error!(%key, "error storing dataSet data: {e}");
            return CreateOutcome::Failed {
                stage: CreateStage::Mutation,
                key,
            };
        }

        self.pending_name.clear();
        info!(%key, "successfully stored dataSet data");
        CreateOutcome::Stored { key }
    }

    /// Resolve a stored key to a displayable URL. Failures are logged and
    /// leave the current image as it was.
    pub async fn fetch_image(&mut self, key: &str) {
        match self.storage.get(key).await {
            Ok(url) => self.dispatch(StoreAction::ImageResolved(ResolvedImage {
                key: key.to_string(),
                url,
            })),
            Err(e) => error!(%key, "error resolving file: {e}"),
        }
    }
}
