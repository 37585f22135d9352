//! Audio URI resolution
//!
//! Records carry either a servable URI or a bare file path left over from
//! ingestion. Bare paths are reduced to their file name and served from the
//! configured audio directory.

use dalil_common::config::AudioConfig;

/// Maps stored audio URIs to URIs the loader can fetch
#[derive(Debug, Clone)]
pub struct AudioUriResolver {
    static_prefix: String,
    audio_base: String,
}

impl AudioUriResolver {
    pub fn new(config: &AudioConfig) -> Self {
        let mut audio_base = config.audio_base.clone();
        if !audio_base.ends_with('/') {
            audio_base.push('/');
        }
        Self {
            static_prefix: config.static_prefix.clone(),
            audio_base,
        }
    }

    /// Resolve a stored URI
    ///
    /// URIs under the static prefix or starting with `http` pass through
    /// unchanged. Anything else keeps only its last path segment.
    pub fn resolve(&self, uri: &str) -> String {
        let uri = uri.trim();
        if uri.starts_with(&self.static_prefix) || uri.starts_with("http") {
            return uri.to_string();
        }
        let file_name = uri.rsplit(['/', '\\']).next().unwrap_or(uri);
        format!("{}{}", self.audio_base, file_name)
    }
}

impl Default for AudioUriResolver {
    fn default() -> Self {
        Self::new(&AudioConfig::default())
    }
}
