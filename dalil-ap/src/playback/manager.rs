//! Audio session manager
//!
//! Owns the one playback slot shared by every trigger point. State lives in
//! an `Arc<RwLock<..>>`; each operation is a single write-locked section so
//! the epoch check and the phase change cannot interleave with another call.
//!
//! Loads run on spawned tasks. A completion re-acquires the lock, compares
//! its epoch and is dropped if a newer request or a stop came in meanwhile.

use super::loader::{AudioHandle, AudioLoader};
use super::state::{
    Epoch, PlayDecision, PlaybackSession, SessionSnapshot, LOAD_ERROR_MESSAGE,
    PLAY_ERROR_MESSAGE,
};
use super::track::AudioUriResolver;
use crate::error::{Error, Result};
use chrono::Utc;
use dalil_common::config::AudioConfig;
use dalil_common::events::{EventBus, PhaseKind, SessionEvent};
use dalil_common::AudioTrack;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

/// Position report for the loaded resource
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Progress {
    pub position: Duration,
    pub duration: Option<Duration>,
    /// 0..=100, zero while the duration is unknown
    pub percent: f64,
}

struct SessionInner<H> {
    session: PlaybackSession,
    /// Resource for the active track once its load has completed
    handle: Option<H>,
}

/// Single-active-track audio session
///
/// Cheap to clone; clones share the same session.
pub struct AudioSessionManager<L: AudioLoader> {
    inner: Arc<RwLock<SessionInner<L::Handle>>>,
    loader: Arc<L>,
    events: Arc<EventBus>,
    resolver: AudioUriResolver,
}

impl<L: AudioLoader> Clone for AudioSessionManager<L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            loader: Arc::clone(&self.loader),
            events: Arc::clone(&self.events),
            resolver: self.resolver.clone(),
        }
    }
}

impl<L: AudioLoader> AudioSessionManager<L> {
    pub fn new(loader: L, config: &AudioConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionInner {
                session: PlaybackSession::new(),
                handle: None,
            })),
            loader: Arc::new(loader),
            events: Arc::new(EventBus::new(config.event_capacity)),
            resolver: AudioUriResolver::new(config),
        }
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.read().await.session.snapshot()
    }

    /// Play request from a trigger point
    ///
    /// Returns without waiting for a load; the outcome arrives as a
    /// `PhaseChanged` event.
    pub async fn play(&self, track: AudioTrack) -> PlayDecision {
        let mut inner = self.inner.write().await;
        let old_phase = inner.session.phase().kind();
        let decision = inner.session.request_play(track);

        match &decision {
            PlayDecision::Pause => {
                if let Some(handle) = &inner.handle {
                    handle.pause();
                }
            }
            PlayDecision::Resume => {
                let resumed = match &inner.handle {
                    Some(handle) => handle.resume(),
                    None => Err(Error::InvalidState("no loaded resource".to_string())),
                };
                if let Err(e) = resumed {
                    warn!("Resume failed: {}", e);
                    self.output_failed(&mut inner);
                }
            }
            PlayDecision::Load { epoch, track } => {
                if let Some(previous) = inner.handle.take() {
                    previous.stop();
                }
                let uri = self.resolver.resolve(&track.audio_uri);
                info!(source_id = track.source_id, epoch, uri = %uri, "Loading audio");

                let manager = self.clone();
                let (epoch, track) = (*epoch, track.clone());
                tokio::spawn(async move {
                    manager.complete_load(epoch, track, uri).await;
                });
            }
        }

        self.emit_phase_change(&inner.session, old_phase);
        decision
    }

    async fn complete_load(&self, epoch: Epoch, track: AudioTrack, uri: String) {
        let result = self.loader.load(&uri).await;

        let mut inner = self.inner.write().await;
        if !inner.session.is_current_load(epoch) {
            let current_epoch = inner.session.epoch();
            debug!(
                source_id = track.source_id,
                epoch, current_epoch, "Discarding superseded load"
            );
            if let Ok(handle) = result {
                handle.stop();
            }
            self.events.emit_lossy(SessionEvent::LoadDiscarded {
                source_id: track.source_id,
                epoch,
                current_epoch,
                timestamp: Utc::now(),
            });
            return;
        }

        let old_phase = inner.session.phase().kind();
        match result {
            Ok(handle) => match handle.start() {
                Ok(()) => {
                    inner.session.load_succeeded(epoch);
                    inner.handle = Some(handle);
                    debug!(source_id = track.source_id, epoch, "Playback started");
                }
                Err(e) => {
                    warn!(source_id = track.source_id, "Failed to start audio: {}", e);
                    handle.stop();
                    inner.session.load_failed(epoch, PLAY_ERROR_MESSAGE);
                    self.emit_error(&track, PLAY_ERROR_MESSAGE);
                }
            },
            Err(e) => {
                warn!(source_id = track.source_id, "Failed to load audio: {}", e);
                inner.session.load_failed(epoch, LOAD_ERROR_MESSAGE);
                self.emit_error(&track, LOAD_ERROR_MESSAGE);
            }
        }

        self.emit_phase_change(&inner.session, old_phase);
    }

    /// Release the resource and return to idle
    pub async fn stop(&self) {
        let mut inner = self.inner.write().await;
        let old_phase = inner.session.phase().kind();
        inner.session.stop();
        if let Some(handle) = inner.handle.take() {
            handle.stop();
        }
        self.emit_phase_change(&inner.session, old_phase);
    }

    /// `Playing → Paused`; no-op otherwise
    pub async fn pause(&self) -> bool {
        let mut inner = self.inner.write().await;
        if !inner.session.pause() {
            return false;
        }
        if let Some(handle) = &inner.handle {
            handle.pause();
        }
        self.emit_phase_change(&inner.session, PhaseKind::Playing);
        true
    }

    /// `Paused → Playing`; no-op otherwise
    pub async fn resume(&self) -> bool {
        let mut inner = self.inner.write().await;
        if !inner.session.resume() {
            return false;
        }
        let resumed = match &inner.handle {
            Some(handle) => handle.resume(),
            None => Err(Error::InvalidState("no loaded resource".to_string())),
        };
        if let Err(e) = resumed {
            warn!("Resume failed: {}", e);
            self.output_failed(&mut inner);
        }
        self.emit_phase_change(&inner.session, PhaseKind::Paused);
        true
    }

    /// Move to `percent` (0..=100) of the loaded resource
    pub async fn seek(&self, percent: f64) -> Result<()> {
        let inner = self.inner.read().await;
        let handle = inner
            .handle
            .as_ref()
            .ok_or_else(|| Error::InvalidState("no loaded resource".to_string()))?;
        let duration = handle
            .duration()
            .ok_or_else(|| Error::InvalidState("duration unknown".to_string()))?;

        let fraction = if percent.is_finite() {
            percent.clamp(0.0, 100.0) / 100.0
        } else {
            0.0
        };
        handle.seek(duration.mul_f64(fraction))
    }

    pub async fn progress(&self) -> Progress {
        let inner = self.inner.read().await;
        let Some(handle) = inner.handle.as_ref() else {
            return Progress::default();
        };

        let position = handle.position();
        let duration = handle.duration();
        let percent = match duration {
            Some(total) if !total.is_zero() => {
                (position.as_secs_f64() / total.as_secs_f64() * 100.0).clamp(0.0, 100.0)
            }
            _ => 0.0,
        };
        Progress {
            position,
            duration,
            percent,
        }
    }

    /// End of media reported by the output side for the load tagged `epoch`
    pub async fn track_ended(&self, epoch: Epoch) -> bool {
        let mut inner = self.inner.write().await;
        if !inner.session.track_ended(epoch) {
            debug!(epoch, "Ignoring end of media for inactive load");
            return false;
        }
        self.emit_phase_change(&inner.session, PhaseKind::Playing);
        true
    }

    fn output_failed(&self, inner: &mut SessionInner<L::Handle>) {
        let Some(track) = inner.session.active_track().cloned() else {
            return;
        };
        if let Some(handle) = inner.handle.take() {
            handle.stop();
        }
        inner.session.fail(PLAY_ERROR_MESSAGE);
        self.emit_error(&track, PLAY_ERROR_MESSAGE);
    }

    fn emit_error(&self, track: &AudioTrack, message: &str) {
        self.events.emit_lossy(SessionEvent::PlaybackError {
            source_id: track.source_id,
            message: message.to_string(),
            timestamp: Utc::now(),
        });
    }

    fn emit_phase_change(&self, session: &PlaybackSession, old_phase: PhaseKind) {
        let new_phase = session.phase().kind();
        let source_id = session.active_track().map(|track| track.source_id);
        if new_phase.has_track() != source_id.is_some() {
            warn!(
                "Session phase {} disagrees with active track {:?}",
                new_phase, source_id
            );
        }
        debug!(
            "Session phase {} -> {} (epoch {})",
            old_phase,
            new_phase,
            session.epoch()
        );
        self.events.emit_lossy(SessionEvent::PhaseChanged {
            source_id,
            old_phase,
            new_phase,
            epoch: session.epoch(),
            timestamp: Utc::now(),
        });
    }
}
