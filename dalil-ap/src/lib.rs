//! # Dalil Audio Player Library (dalil-ap)
//!
//! Single-active-track audio session shared by every "play sample" trigger.
//!
//! **Purpose:** Arbitrate play requests from any number of UI trigger points
//! over one physical playback slot, with toggle-to-pause on the active track
//! and last-caller-wins handling of asynchronous loads.
//!
//! **Architecture:** a pure state machine ([`playback::PlaybackSession`])
//! driven by an async manager ([`playback::AudioSessionManager`]) that owns
//! the loaded resource and broadcasts phase changes on an EventBus.

pub mod error;
pub mod playback;

pub use error::{Error, Result};
pub use playback::{
    AudioHandle, AudioLoader, AudioSessionManager, Epoch, PlayDecision, PlaybackPhase, Progress,
    SessionSnapshot, LOAD_ERROR_MESSAGE, PLAY_ERROR_MESSAGE,
};
