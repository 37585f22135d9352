//! Venue directory data model
//!
//! Records are owned by the data collaborator and only ever read by the
//! discovery engine. Field names follow the directory API; the legacy keys
//! (`imam`, `audio_sample`, `location`) are accepted as aliases.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Unique record identifier
pub type RecordId = i64;

/// Label used by the UI for "no area / neighborhood restriction"
pub const ALL_LABEL: &str = "الكل";

/// Area of the city a venue belongs to
///
/// Closed set; serialized as the Arabic label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Area {
    #[serde(rename = "شمال")]
    North,
    #[serde(rename = "جنوب")]
    South,
    #[serde(rename = "شرق")]
    East,
    #[serde(rename = "غرب")]
    West,
}

impl Area {
    /// Every area, in display order
    pub const ALL: [Area; 4] = [Area::North, Area::South, Area::East, Area::West];

    /// Arabic display label
    pub fn label(self) -> &'static str {
        match self {
            Area::North => "شمال",
            Area::South => "جنوب",
            Area::East => "شرق",
            Area::West => "غرب",
        }
    }

    /// Inverse of [`Area::label`]. Surrounding whitespace is ignored.
    pub fn from_label(label: &str) -> Option<Area> {
        let label = label.trim();
        Area::ALL.into_iter().find(|area| area.label() == label)
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Area {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Area::from_label(s).ok_or_else(|| Error::InvalidInput(format!("Unknown area: {}", s)))
    }
}

/// Area restriction of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AreaFilter {
    /// No restriction
    #[default]
    All,
    /// Only records in this area
    Only(Area),
}

impl AreaFilter {
    /// Whether a record in `area` passes this filter
    pub fn admits(self, area: Area) -> bool {
        match self {
            AreaFilter::All => true,
            AreaFilter::Only(wanted) => wanted == area,
        }
    }
}

impl From<Area> for AreaFilter {
    fn from(area: Area) -> Self {
        AreaFilter::Only(area)
    }
}

impl fmt::Display for AreaFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AreaFilter::All => f.write_str(ALL_LABEL),
            AreaFilter::Only(area) => area.fmt(f),
        }
    }
}

impl FromStr for AreaFilter {
    type Err = Error;

    /// Accepts `الكل` (or an empty string) for [`AreaFilter::All`], otherwise an area label
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s == ALL_LABEL {
            return Ok(AreaFilter::All);
        }
        s.parse().map(AreaFilter::Only)
    }
}

/// WGS84 position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Both components are finite numbers
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// One venue in the directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    pub area: Area,
    /// Neighborhood within the area
    #[serde(default, alias = "location")]
    pub neighborhood: Option<String>,
    #[serde(default, alias = "imam")]
    pub officiant_name: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default, alias = "audio_sample")]
    pub audio_uri: Option<String>,
    #[serde(default)]
    pub map_link: Option<String>,
}

impl Record {
    /// Position of the venue
    ///
    /// `None` unless both latitude and longitude are present and finite.
    pub fn coordinates(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => {
                Some(Coordinate::new(lat, lng)).filter(Coordinate::is_finite)
            }
            _ => None,
        }
    }
}

/// Load a materialized record list (JSON array) from disk
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let content = std::fs::read_to_string(path)?;
    let records: Vec<Record> = serde_json::from_str(&content)?;
    tracing::debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// What an audio trigger asks the session to play
///
/// Equality is by `source_id` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioTrack {
    /// Record the sample belongs to
    pub source_id: RecordId,
    /// Venue name
    pub display_name: String,
    /// Officiant name (may be empty)
    pub secondary_label: String,
    pub audio_uri: String,
}

impl AudioTrack {
    pub fn new(
        source_id: RecordId,
        display_name: impl Into<String>,
        secondary_label: impl Into<String>,
        audio_uri: impl Into<String>,
    ) -> Self {
        Self {
            source_id,
            display_name: display_name.into(),
            secondary_label: secondary_label.into(),
            audio_uri: audio_uri.into(),
        }
    }

    /// Track for a record's audio sample, if it has one
    pub fn from_record(record: &Record) -> Option<Self> {
        let uri = record.audio_uri.as_deref().filter(|uri| !uri.trim().is_empty())?;
        Some(Self::new(
            record.id,
            record.name.clone(),
            record.officiant_name.clone().unwrap_or_default(),
            uri,
        ))
    }
}

impl PartialEq for AudioTrack {
    fn eq(&self, other: &Self) -> bool {
        self.source_id == other.source_id
    }
}

impl Eq for AudioTrack {}
