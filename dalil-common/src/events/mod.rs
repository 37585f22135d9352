//! Event types for the Dalil event system
//!
//! Provides session event definitions and the EventBus observers subscribe to.

mod playback_types;

pub use playback_types::PhaseKind;

use crate::model::RecordId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Audio session events
///
/// Broadcast via EventBus so any number of trigger points can re-render
/// their "is this mine and playing" indicator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    /// Session phase changed (including Loading → Loading for a new track)
    PhaseChanged {
        /// Active track after the change (None when idle)
        source_id: Option<RecordId>,
        /// Phase before change
        old_phase: PhaseKind,
        /// Phase after change
        new_phase: PhaseKind,
        /// Request epoch after the change
        epoch: u64,
        /// When phase changed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A load finished after a newer request superseded it and was dropped
    LoadDiscarded {
        /// Track the stale load was for
        source_id: RecordId,
        /// Epoch the load was tagged with
        epoch: u64,
        /// Epoch at completion time
        current_epoch: u64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Loading or playing the active track failed
    PlaybackError {
        source_id: RecordId,
        /// Short human-readable message shown to the visitor
        message: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

/// Broadcast channel for session events
///
/// Cloning the receiver side is done through [`EventBus::subscribe`].
pub struct EventBus {
    tx: broadcast::Sender<SessionEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of events to buffer before dropping old events
    ///
    /// # Examples
    ///
    /// ```
    /// use dalil_common::events::EventBus;
    ///
    /// let event_bus = EventBus::new(100);
    /// assert_eq!(event_bus.capacity(), 100);
    /// ```
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: SessionEvent,
    ) -> Result<usize, broadcast::error::SendError<SessionEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: SessionEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
