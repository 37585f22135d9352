//! Device location collaborator contract
//!
//! The provider does the platform work; [`locate`] bounds the wait and
//! enforces the staleness limit so every provider behaves the same way.
//! One request at a time per caller; concurrent calls are not deduplicated.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dalil_common::config::LocationConfig;
use dalil_common::Coordinate;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

const GUIDANCE_PREFIX: &str = "تعذر تحديد موقعك. ";

/// Request options passed through to the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationOptions {
    /// Bounded wait for a fix
    pub timeout: Duration,
    /// Oldest cached fix still accepted
    pub maximum_age: Duration,
    pub high_accuracy: bool,
}

impl Default for LocationOptions {
    fn default() -> Self {
        Self::from(&LocationConfig::default())
    }
}

impl From<&LocationConfig> for LocationOptions {
    fn from(config: &LocationConfig) -> Self {
        Self {
            timeout: config.timeout(),
            maximum_age: config.maximum_age(),
            high_accuracy: config.high_accuracy,
        }
    }
}

/// A position reported by the provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionFix {
    pub coordinate: Coordinate,
    /// When the platform obtained the fix (may be earlier than the request)
    pub acquired_at: DateTime<Utc>,
}

impl PositionFix {
    /// Fix acquired now
    pub fn fresh(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            acquired_at: Utc::now(),
        }
    }
}

/// Why no position could be obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationError {
    /// Host has no location capability
    #[error("Location services are not supported on this host")]
    Unsupported,

    /// User declined location access
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Position unavailable")]
    PositionUnavailable,

    #[error("Location request timed out")]
    Timeout,
}

impl LocationError {
    /// Guidance text shown to the visitor
    pub fn user_message(&self) -> String {
        match self {
            LocationError::Unsupported => "خدمة تحديد الموقع غير متوفرة على هذا الجهاز".to_string(),
            LocationError::PermissionDenied => {
                format!("{}يرجى السماح للموقع باستخدام موقعك.", GUIDANCE_PREFIX)
            }
            LocationError::PositionUnavailable => {
                format!("{}معلومات الموقع غير متوفرة.", GUIDANCE_PREFIX)
            }
            LocationError::Timeout => format!("{}انتهت مهلة طلب الموقع.", GUIDANCE_PREFIX),
        }
    }

    /// Whether simply asking again may succeed
    ///
    /// Permission needs a fresh explicit user action and an unsupported host
    /// stays unsupported.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LocationError::PositionUnavailable | LocationError::Timeout
        )
    }
}

/// Single-shot asynchronous position source
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Whether the host offers location at all
    fn is_supported(&self) -> bool {
        true
    }

    /// Obtain a position, honoring `options` as far as the platform allows
    async fn current_position(&self, options: &LocationOptions)
        -> Result<PositionFix, LocationError>;
}

/// Request the device position with a bounded wait and staleness check
pub async fn locate<P>(provider: &P, options: &LocationOptions) -> Result<Coordinate, LocationError>
where
    P: LocationProvider + ?Sized,
{
    if !provider.is_supported() {
        warn!("Location requested on a host without location support");
        return Err(LocationError::Unsupported);
    }

    let fix = tokio::time::timeout(options.timeout, provider.current_position(options))
        .await
        .map_err(|_| {
            debug!(timeout_ms = options.timeout.as_millis() as u64, "Location request timed out");
            LocationError::Timeout
        })??;

    // A fix stamped in the future has no age
    let age = (Utc::now() - fix.acquired_at).to_std().unwrap_or_default();
    if age > options.maximum_age {
        warn!(
            age_ms = age.as_millis() as u64,
            maximum_age_ms = options.maximum_age.as_millis() as u64,
            "Discarding stale position fix"
        );
        return Err(LocationError::PositionUnavailable);
    }

    Ok(fix.coordinate)
}
