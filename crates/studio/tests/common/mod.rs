#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use p2f_library::kv::{KvStore, MemoryKvStore};
use p2f_library::ProjectStore;
use p2f_pipeline::{GenerationWorkflow, PollConfig};
use p2f_studio::{GenerationState, Phase, Studio, StudioOptions};
use p2f_veo::api::VeoApiError;
use p2f_veo::credentials::{CredentialGate, CredentialHost};
use p2f_veo::messages::Operation;
use p2f_veo::synthesis::{SynthesisApi, SynthesisJob};
use tokio::sync::watch;

pub const MEDIA_URI: &str = "https://media.example/files/clip:download?alt=media";
pub const TEST_KEY: &str = "test-key";

/// Remote service double: replays a submit result, then poll results.
pub struct MockApi {
    submit: Mutex<VecDeque<Result<Operation, VeoApiError>>>,
    polls: Mutex<VecDeque<Result<Operation, VeoApiError>>>,
    pub submit_calls: AtomicUsize,
    observer: Mutex<Option<watch::Receiver<GenerationState>>>,
    /// Studio phase seen at each remote call.
    pub seen_phases: Mutex<Vec<Phase>>,
}

impl MockApi {
    pub fn new(
        submits: Vec<Result<Operation, VeoApiError>>,
        polls: Vec<Result<Operation, VeoApiError>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            submit: Mutex::new(submits.into()),
            polls: Mutex::new(polls.into()),
            submit_calls: AtomicUsize::new(0),
            observer: Mutex::new(None),
            seen_phases: Mutex::new(Vec::new()),
        })
    }

    /// Record the studio's phase on every remote call.
    pub fn observe(&self, rx: watch::Receiver<GenerationState>) {
        *self.observer.lock().unwrap() = Some(rx);
    }

    fn record_phase(&self) {
        if let Some(rx) = self.observer.lock().unwrap().as_ref() {
            let phase = rx.borrow().phase();
            self.seen_phases.lock().unwrap().push(phase);
        }
    }

    /// Completes on submission with [`MEDIA_URI`].
    pub fn immediate() -> Arc<Self> {
        Self::new(vec![Ok(Operation::completed("op/1", MEDIA_URI))], vec![])
    }

    pub fn submits(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SynthesisApi for MockApi {
    async fn submit(
        &self,
        _job: &SynthesisJob,
        _credential: &str,
    ) -> Result<Operation, VeoApiError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.record_phase();
        self.submit
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Operation::completed("op/n", MEDIA_URI)))
    }

    async fn poll(
        &self,
        operation: &Operation,
        _credential: &str,
    ) -> Result<Operation, VeoApiError> {
        self.record_phase();
        self.polls
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Operation::completed(operation.name.clone(), MEDIA_URI)))
    }
}

/// Provisioning host whose selection outcome the test controls.
pub struct MockHost {
    selected: AtomicBool,
    /// What a dialog interaction selects.
    pub select_succeeds: AtomicBool,
    pub opened: AtomicUsize,
}

impl MockHost {
    pub fn new(selected: bool, select_succeeds: bool) -> Arc<Self> {
        Arc::new(Self {
            selected: AtomicBool::new(selected),
            select_succeeds: AtomicBool::new(select_succeeds),
            opened: AtomicUsize::new(0),
        })
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialHost for MockHost {
    async fn has_selected_credential(&self) -> bool {
        self.selected.load(Ordering::SeqCst)
    }

    async fn open_select_credential(&self) {
        self.opened.fetch_add(1, Ordering::SeqCst);
        self.selected
            .store(self.select_succeeds.load(Ordering::SeqCst), Ordering::SeqCst);
    }

    async fn selected_credential(&self) -> Option<String> {
        self.selected
            .load(Ordering::SeqCst)
            .then(|| TEST_KEY.to_string())
    }
}

pub fn not_found() -> VeoApiError {
    VeoApiError::ApiError {
        status: 404,
        body: r#"{"error":{"code":404,"message":"Requested entity was not found.","status":"NOT_FOUND"}}"#
            .to_string(),
    }
}

pub fn fast_poll() -> PollConfig {
    PollConfig {
        interval: Duration::from_millis(1),
    }
}

/// Build a studio over `api`, `gate` and `kv` with default options.
pub async fn studio_with(
    api: Arc<MockApi>,
    gate: CredentialGate,
    kv: Arc<dyn KvStore>,
    options: StudioOptions,
) -> Studio {
    let workflow = GenerationWorkflow::new(api, gate, fast_poll());
    Studio::open(workflow, ProjectStore::load(kv), options).await
}

/// Studio with a static credential and an in-memory library.
pub async fn test_studio(api: Arc<MockApi>) -> (Studio, Arc<MemoryKvStore>) {
    let kv = Arc::new(MemoryKvStore::new());
    let gate = CredentialGate::with_static(Some(TEST_KEY.to_string()));
    let studio = studio_with(api, gate, kv.clone(), StudioOptions::default()).await;
    (studio, kv)
}
