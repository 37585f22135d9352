//! Test helpers for dalil-ap session tests
//!
//! - ScriptedLoader: loader whose completions the test releases by hand
//! - FakeHandle: records what the session asked of the output side
//! - wait_for: await a matching session event with a deadline

#![allow(dead_code)]

use async_trait::async_trait;
use dalil_ap::{AudioHandle, AudioLoader, Error, Result};
use dalil_common::events::{PhaseKind, SessionEvent};
use dalil_common::{AudioTrack, RecordId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, oneshot};

/// Fake track length reported by every handle
pub const TRACK_LENGTH: Duration = Duration::from_secs(200);

/// How a gated load resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Loaded,
    LoadFails,
    /// Load succeeds but `start()` errors
    StartFails,
}

/// Observable state of one fake resource
#[derive(Debug, Default)]
pub struct HandleState {
    pub uri: String,
    pub started: AtomicBool,
    pub paused: AtomicBool,
    pub stopped: AtomicBool,
    pub fail_start: bool,
    pub fail_resume: AtomicBool,
    pub position_ms: AtomicU64,
    pub seeks: Mutex<Vec<Duration>>,
}

pub struct FakeHandle {
    state: Arc<HandleState>,
}

impl AudioHandle for FakeHandle {
    fn start(&self) -> Result<()> {
        if self.state.fail_start {
            return Err(Error::Output("device busy".to_string()));
        }
        self.state.started.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn pause(&self) {
        self.state.paused.store(true, Ordering::SeqCst);
    }

    fn resume(&self) -> Result<()> {
        if self.state.fail_resume.load(Ordering::SeqCst) {
            return Err(Error::Output("device lost".to_string()));
        }
        self.state.paused.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) {
        self.state.stopped.store(true, Ordering::SeqCst);
        self.state.position_ms.store(0, Ordering::SeqCst);
    }

    fn seek(&self, position: Duration) -> Result<()> {
        self.state
            .position_ms
            .store(position.as_millis() as u64, Ordering::SeqCst);
        self.state.seeks.lock().unwrap().push(position);
        Ok(())
    }

    fn position(&self) -> Duration {
        Duration::from_millis(self.state.position_ms.load(Ordering::SeqCst))
    }

    fn duration(&self) -> Option<Duration> {
        Some(TRACK_LENGTH)
    }
}

/// Loader resolving immediately unless a gate was registered for the URI
#[derive(Clone, Default)]
pub struct ScriptedLoader {
    gates: Arc<Mutex<HashMap<String, oneshot::Receiver<Outcome>>>>,
    requested: Arc<Mutex<Vec<String>>>,
    handles: Arc<Mutex<Vec<Arc<HandleState>>>>,
}

impl ScriptedLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold the next load of `uri` until the returned sender fires
    pub fn gate(&self, uri: &str) -> oneshot::Sender<Outcome> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(uri.to_string(), rx);
        tx
    }

    /// URIs passed to `load`, in call order
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    /// Every handle created so far, for `uri`
    pub fn handles_for(&self, uri: &str) -> Vec<Arc<HandleState>> {
        self.handles
            .lock()
            .unwrap()
            .iter()
            .filter(|state| state.uri == uri)
            .cloned()
            .collect()
    }

    pub fn latest_handle(&self, uri: &str) -> Arc<HandleState> {
        self.handles_for(uri)
            .pop()
            .unwrap_or_else(|| panic!("no handle for {}", uri))
    }
}

#[async_trait]
impl AudioLoader for ScriptedLoader {
    type Handle = FakeHandle;

    async fn load(&self, uri: &str) -> Result<FakeHandle> {
        self.requested.lock().unwrap().push(uri.to_string());
        let gate = self.gates.lock().unwrap().remove(uri);

        let outcome = match gate {
            Some(rx) => rx.await.unwrap_or(Outcome::LoadFails),
            None => Outcome::Loaded,
        };
        if outcome == Outcome::LoadFails {
            return Err(Error::Load(format!("404 for {}", uri)));
        }

        let state = Arc::new(HandleState {
            uri: uri.to_string(),
            fail_start: outcome == Outcome::StartFails,
            ..HandleState::default()
        });
        self.handles.lock().unwrap().push(Arc::clone(&state));
        Ok(FakeHandle { state })
    }
}

pub fn track(id: RecordId, uri: &str) -> AudioTrack {
    AudioTrack::new(id, format!("مسجد {}", id), "الشيخ", uri)
}

/// Wait (up to two seconds) for the first event matching `pred`
pub async fn wait_for<F>(rx: &mut broadcast::Receiver<SessionEvent>, mut pred: F) -> SessionEvent
where
    F: FnMut(&SessionEvent) -> bool,
{
    let wait = async {
        loop {
            match rx.recv().await {
                Ok(event) if pred(&event) => return event,
                Ok(_) => continue,
                Err(e) => panic!("event stream failed: {}", e),
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(2), wait)
        .await
        .expect("timed out waiting for session event")
}

/// Predicate: phase changed to `phase` with `source_id` active
pub fn entered(source_id: RecordId, phase: PhaseKind) -> impl FnMut(&SessionEvent) -> bool {
    move |event| {
        matches!(
            event,
            SessionEvent::PhaseChanged { source_id: Some(id), new_phase, .. }
                if *id == source_id && *new_phase == phase
        )
    }
}

/// Predicate: a load for `source_id` was discarded
pub fn discarded(source_id: RecordId) -> impl FnMut(&SessionEvent) -> bool {
    move |event| {
        matches!(event, SessionEvent::LoadDiscarded { source_id: id, .. } if *id == source_id)
    }
}
