//! Playback session state machine
//!
//! Pure and synchronous: no I/O, no clock. The manager applies these
//! transitions and performs the matching side effects on the loaded resource.
//!
//! Phases: `Idle → Loading(track) → Playing(track) ⇄ Paused(track)`, with
//! `Error(track, message)` reachable from `Loading` and from output failures.
//! `active_track` is `None` exactly when the phase is `Idle`.
//!
//! Every request that starts a load bumps the epoch; a completion only
//! applies if it carries the current epoch.

use dalil_common::events::PhaseKind;
use dalil_common::{AudioTrack, RecordId};
use serde::Serialize;
use tracing::debug;

/// Generation counter tagging asynchronous loads
pub type Epoch = u64;

/// Shown when the audio resource cannot be fetched
pub const LOAD_ERROR_MESSAGE: &str = "خطأ في تحميل الملف الصوتي";

/// Shown when a loaded resource cannot start or resume
pub const PLAY_ERROR_MESSAGE: &str = "خطأ في تشغيل الملف الصوتي";

/// Session phase with its track
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PlaybackPhase {
    #[default]
    Idle,
    Loading(AudioTrack),
    Playing(AudioTrack),
    Paused(AudioTrack),
    Error { track: AudioTrack, message: String },
}

impl PlaybackPhase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            PlaybackPhase::Idle => PhaseKind::Idle,
            PlaybackPhase::Loading(_) => PhaseKind::Loading,
            PlaybackPhase::Playing(_) => PhaseKind::Playing,
            PlaybackPhase::Paused(_) => PhaseKind::Paused,
            PlaybackPhase::Error { .. } => PhaseKind::Error,
        }
    }

    /// Track attached to this phase
    pub fn track(&self) -> Option<&AudioTrack> {
        match self {
            PlaybackPhase::Idle => None,
            PlaybackPhase::Loading(track)
            | PlaybackPhase::Playing(track)
            | PlaybackPhase::Paused(track)
            | PlaybackPhase::Error { track, .. } => Some(track),
        }
    }

    fn into_track(self) -> Option<AudioTrack> {
        match self {
            PlaybackPhase::Idle => None,
            PlaybackPhase::Loading(track)
            | PlaybackPhase::Playing(track)
            | PlaybackPhase::Paused(track)
            | PlaybackPhase::Error { track, .. } => Some(track),
        }
    }
}

/// What the caller of [`PlaybackSession::request_play`] must do next
#[derive(Debug, Clone, PartialEq)]
pub enum PlayDecision {
    /// Active track toggled to paused; silence the loaded resource
    Pause,
    /// Active track toggled back to playing; resume the loaded resource
    Resume,
    /// New request; acquire `track` and report back with `epoch`
    Load { epoch: Epoch, track: AudioTrack },
}

/// Read-only view for observers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub active_track: Option<AudioTrack>,
    pub phase: PhaseKind,
    pub last_error: Option<String>,
    pub epoch: Epoch,
}

impl SessionSnapshot {
    /// Whether `source_id` is the active track and audible
    pub fn is_playing(&self, source_id: RecordId) -> bool {
        self.phase == PhaseKind::Playing && self.is_active(source_id)
    }

    /// Whether `source_id` is the active track and still loading
    pub fn is_loading(&self, source_id: RecordId) -> bool {
        self.phase == PhaseKind::Loading && self.is_active(source_id)
    }

    pub fn is_active(&self, source_id: RecordId) -> bool {
        self.active_track
            .as_ref()
            .is_some_and(|track| track.source_id == source_id)
    }
}

/// The single logical playback slot
#[derive(Debug, Default)]
pub struct PlaybackSession {
    phase: PlaybackPhase,
    epoch: Epoch,
    last_error: Option<String>,
}

impl PlaybackSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &PlaybackPhase {
        &self.phase
    }

    pub fn active_track(&self) -> Option<&AudioTrack> {
        self.phase.track()
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_playing(&self, source_id: RecordId) -> bool {
        matches!(&self.phase, PlaybackPhase::Playing(track) if track.source_id == source_id)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            active_track: self.phase.track().cloned(),
            phase: self.phase.kind(),
            last_error: self.last_error.clone(),
            epoch: self.epoch,
        }
    }

    /// Apply a play request from a trigger point
    ///
    /// Same track while `Playing` pauses and while `Paused` resumes, both
    /// without touching the epoch. Anything else (another track, nothing
    /// active, or the same track still loading or errored) is a new request.
    pub fn request_play(&mut self, track: AudioTrack) -> PlayDecision {
        match std::mem::take(&mut self.phase) {
            PlaybackPhase::Playing(active) if active == track => {
                self.phase = PlaybackPhase::Paused(active);
                PlayDecision::Pause
            }
            PlaybackPhase::Paused(active) if active == track => {
                self.phase = PlaybackPhase::Playing(active);
                PlayDecision::Resume
            }
            _ => self.begin_load(track),
        }
    }

    fn begin_load(&mut self, track: AudioTrack) -> PlayDecision {
        self.epoch += 1;
        self.last_error = None;
        self.phase = PlaybackPhase::Loading(track.clone());
        debug!(source_id = track.source_id, epoch = self.epoch, "Load requested");
        PlayDecision::Load {
            epoch: self.epoch,
            track,
        }
    }

    /// Whether a completion tagged `epoch` would still be applied
    pub fn is_current_load(&self, epoch: Epoch) -> bool {
        epoch == self.epoch && matches!(self.phase, PlaybackPhase::Loading(_))
    }

    /// `Loading → Playing` if `epoch` is current. Returns whether it applied.
    pub fn load_succeeded(&mut self, epoch: Epoch) -> bool {
        if !self.is_current_load(epoch) {
            return false;
        }
        if let Some(track) = std::mem::take(&mut self.phase).into_track() {
            self.phase = PlaybackPhase::Playing(track);
        }
        true
    }

    /// `Loading → Error` if `epoch` is current. Returns whether it applied.
    pub fn load_failed(&mut self, epoch: Epoch, message: impl Into<String>) -> bool {
        if !self.is_current_load(epoch) {
            return false;
        }
        self.enter_error(message.into());
        true
    }

    /// Output failure on the active resource; any phase with a track → `Error`
    pub fn fail(&mut self, message: impl Into<String>) -> bool {
        if self.phase.track().is_none() {
            return false;
        }
        self.enter_error(message.into());
        true
    }

    fn enter_error(&mut self, message: String) {
        if let Some(track) = std::mem::take(&mut self.phase).into_track() {
            self.last_error = Some(message.clone());
            self.phase = PlaybackPhase::Error { track, message };
        }
    }

    /// `Playing → Paused`. Returns whether it applied.
    pub fn pause(&mut self) -> bool {
        match std::mem::take(&mut self.phase) {
            PlaybackPhase::Playing(track) => {
                self.phase = PlaybackPhase::Paused(track);
                true
            }
            other => {
                self.phase = other;
                false
            }
        }
    }

    /// `Paused → Playing`. Returns whether it applied.
    pub fn resume(&mut self) -> bool {
        match std::mem::take(&mut self.phase) {
            PlaybackPhase::Paused(track) => {
                self.phase = PlaybackPhase::Playing(track);
                true
            }
            other => {
                self.phase = other;
                false
            }
        }
    }

    /// End of media for the load tagged `epoch`; `Playing → Paused`
    pub fn track_ended(&mut self, epoch: Epoch) -> bool {
        epoch == self.epoch && self.pause()
    }

    /// Back to `Idle`, invalidating any in-flight load
    pub fn stop(&mut self) {
        self.epoch += 1;
        self.phase = PlaybackPhase::Idle;
        self.last_error = None;
    }
}
