//! Audio output collaborator
//!
//! The session never decodes or renders audio itself. A loader acquires a
//! resource for a URI and hands back a handle the session drives.

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// A loaded, controllable audio resource
///
/// Dropping a handle must release its output.
pub trait AudioHandle: Send + Sync + 'static {
    /// Begin audible output from the current position
    fn start(&self) -> Result<()>;

    fn pause(&self);

    /// Continue from the paused position
    fn resume(&self) -> Result<()>;

    /// Silence output and rewind
    fn stop(&self);

    fn seek(&self, position: Duration) -> Result<()>;

    fn position(&self) -> Duration;

    /// Total length, when the resource reports one
    fn duration(&self) -> Option<Duration>;
}

/// Acquires audio resources
#[async_trait]
pub trait AudioLoader: Send + Sync + 'static {
    type Handle: AudioHandle;

    /// Fetch and prepare the resource at `uri`
    ///
    /// May take arbitrarily long; the session tolerates completions arriving
    /// in any order.
    async fn load(&self, uri: &str) -> Result<Self::Handle>;
}
