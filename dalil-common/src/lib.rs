//! # Dalil Common Library
//!
//! Shared code for the Dalil crates including:
//! - Venue record model (Record, Area, AreaFilter, Coordinate)
//! - Audio track descriptor shared by the audio session and its observers
//! - Event types (SessionEvent enum) and EventBus
//! - Configuration loading
//! - Common error type

pub mod config;
pub mod error;
pub mod events;
pub mod model;

pub use error::{Error, Result};
pub use model::{Area, AreaFilter, AudioTrack, Coordinate, Record, RecordId};
