//! Audio playback session
//!
//! - `state`: phase machine and epoch bookkeeping
//! - `loader`: collaborator traits for acquiring and driving audio
//! - `track`: stored URI resolution
//! - `manager`: async coordinator tying the three together

pub mod loader;
pub mod manager;
pub mod state;
pub mod track;

pub use loader::{AudioHandle, AudioLoader};
pub use manager::{AudioSessionManager, Progress};
pub use state::{
    Epoch, PlayDecision, PlaybackPhase, PlaybackSession, SessionSnapshot, LOAD_ERROR_MESSAGE,
    PLAY_ERROR_MESSAGE,
};
pub use track::AudioUriResolver;
