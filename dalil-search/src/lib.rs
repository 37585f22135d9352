//! # Dalil Discovery Engine (dalil-search)
//!
//! Turns the in-memory venue list into a ranked, filtered result set for a
//! free-text query, an area filter and an optional device location.
//!
//! **Architecture:** `search = rank(matches(records, query), origin)`.
//! Filtering always happens before distance ranking. Nothing here fails:
//! empty or degenerate inputs give empty or unchanged results.

pub mod engine;
pub mod geo;
pub mod location;
pub mod matcher;
pub mod normalize;
pub mod ranker;

pub use engine::{search, Query};
pub use geo::{category_of, distance_km, format_distance, DistanceCategory};
pub use location::{locate, LocationError, LocationOptions, LocationProvider, PositionFix};
pub use matcher::matches;
pub use normalize::normalize;
pub use ranker::{rank, RankedRecord, RankedResult};
