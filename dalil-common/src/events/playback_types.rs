//! Playback-related type definitions
//!
//! Data-free view of the audio session phase, used in events and snapshots.

use serde::{Deserialize, Serialize};

/// Audio session phase without its payload
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PhaseKind {
    /// Nothing selected
    Idle,
    /// Resource for the active track is being acquired
    Loading,
    /// Active track is audible
    Playing,
    /// Active track is loaded but silent
    Paused,
    /// Last attempt for the active track failed
    Error,
}

impl PhaseKind {
    /// Whether a track is attached in this phase
    pub fn has_track(self) -> bool {
        !matches!(self, PhaseKind::Idle)
    }
}

impl std::fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhaseKind::Idle => write!(f, "idle"),
            PhaseKind::Loading => write!(f, "loading"),
            PhaseKind::Playing => write!(f, "playing"),
            PhaseKind::Paused => write!(f, "paused"),
            PhaseKind::Error => write!(f, "error"),
        }
    }
}
