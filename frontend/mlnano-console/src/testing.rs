//! In-memory backends shared by the console tests.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{TimeZone, Utc};
use mlnano_client::{ClientError, DataApi, ObjectStorage, PutOptions, Subscription};
use mlnano_models::{CreateDataSetInput, DataSetRecord, S3Object};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use crate::controller::{DataSetController, FileLocation, PendingFile};

pub(crate) type LiveSender = mpsc::Sender<Result<DataSetRecord, ClientError>>;

/// Ordered log shared by both fakes so tests can check call sequencing.
#[derive(Clone, Default)]
pub(crate) struct CallLog(pub(crate) Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub(crate) fn push(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }

    pub(crate) fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

#[derive(Default)]
pub(crate) struct ApiState {
    pub(crate) initial: Vec<DataSetRecord>,
    pub(crate) fail_list: bool,
    pub(crate) fail_create: bool,
    pub(crate) created: Vec<CreateDataSetInput>,
    pub(crate) live: Option<LiveSender>,
}

#[derive(Clone, Default)]
pub(crate) struct FakeApi {
    pub(crate) state: Arc<Mutex<ApiState>>,
    pub(crate) unsubscribed: Arc<AtomicUsize>,
    pub(crate) log: CallLog,
}

impl FakeApi {
    pub(crate) fn live_sender(&self) -> LiveSender {
        self.state.lock().unwrap().live.clone().expect("feed not opened")
    }

    pub(crate) fn created(&self) -> Vec<CreateDataSetInput> {
        self.state.lock().unwrap().created.clone()
    }

    pub(crate) fn unsubscribe_count(&self) -> usize {
        self.unsubscribed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataApi for FakeApi {
    async fn create_data_set(
        &self,
        input: &CreateDataSetInput,
    ) -> Result<DataSetRecord, ClientError> {
        self.log.push(format!("create:{}", input.file.key));
        let mut state = self.state.lock().unwrap();
        state.created.push(input.clone());
        if state.fail_create {
            return Err(ClientError::api_error(500, "mutation failed"));
        }
        Ok(record_with_key("created", &input.name, &input.file.key))
    }

    async fn list_data_sets(&self) -> Result<Vec<DataSetRecord>, ClientError> {
        self.log.push("list".to_string());
        let state = self.state.lock().unwrap();
        if state.fail_list {
            return Err(ClientError::api_error(502, "bad gateway"));
        }
        Ok(state.initial.clone())
    }

    async fn subscribe_on_create(
        &self,
    ) -> Result<Subscription<DataSetRecord>, ClientError> {
        self.log.push("subscribe".to_string());
        let (tx, rx) = mpsc::channel(16);
        self.state.lock().unwrap().live = Some(tx);
        let counter = self.unsubscribed.clone();
        Ok(Subscription::new(rx, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }))
    }
}

#[derive(Default)]
pub(crate) struct StorageState {
    pub(crate) puts: Vec<(String, Bytes, PutOptions)>,
    pub(crate) gets: Vec<String>,
    pub(crate) fail_put: bool,
    pub(crate) fail_get: bool,
}

#[derive(Clone, Default)]
pub(crate) struct FakeStorage {
    pub(crate) state: Arc<Mutex<StorageState>>,
    pub(crate) log: CallLog,
}

impl FakeStorage {
    pub(crate) fn puts(&self) -> Vec<(String, Bytes, PutOptions)> {
        self.state.lock().unwrap().puts.clone()
    }

    pub(crate) fn gets(&self) -> Vec<String> {
        self.state.lock().unwrap().gets.clone()
    }
}

#[async_trait]
impl ObjectStorage for FakeStorage {
    async fn put(
        &self,
        key: &str,
        body: Bytes,
        options: PutOptions,
    ) -> Result<(), ClientError> {
        self.log.push(format!("put:{key}"));
        let mut state = self.state.lock().unwrap();
        state.puts.push((key.to_string(), body, options));
        if state.fail_put {
            return Err(ClientError::api_error(403, "access denied"));
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<String, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.gets.push(key.to_string());
        if state.fail_get {
            return Err(ClientError::api_error(404, "no such key"));
        }
        Ok(format!("https://files.example.com/{key}?sig=1"))
    }
}

pub(crate) fn record_with_key(id: &str, name: &str, key: &str) -> DataSetRecord {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
    DataSetRecord {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        file: S3Object {
            bucket: "datasets".to_string(),
            region: "us-east-1".to_string(),
            key: key.to_string(),
        },
        created_at: at,
        updated_at: at,
    }
}

pub(crate) fn record(id: &str) -> DataSetRecord {
    record_with_key(id, &format!("set-{id}"), &format!("key-{id}"))
}

pub(crate) fn ids<A, S>(controller: &DataSetController<A, S>) -> Vec<String>
where
    A: DataApi,
    S: ObjectStorage,
{
    controller.data_sets().iter().map(|r| r.id.clone()).collect()
}

pub(crate) fn setup() -> (
    DataSetController<FakeApi, FakeStorage>,
    FakeApi,
    FakeStorage,
    CallLog,
) {
    let log = CallLog::default();
    let api = FakeApi {
        log: log.clone(),
        ..Default::default()
    };
    let storage = FakeStorage {
        log: log.clone(),
        ..Default::default()
    };
    let controller = DataSetController::new(
        api.clone(),
        storage.clone(),
        FileLocation {
            bucket: "datasets".to_string(),
            region: "us-east-1".to_string(),
        },
    );
    (controller, api, storage, log)
}

pub(crate) fn csv_file() -> PendingFile {
    PendingFile::new("train.csv", "text/csv", Bytes::from_static(b"a,b\n1,2\n"))
}

