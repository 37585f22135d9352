//! Proximity ranking
//!
//! Distances are carried next to each record in [`RankedRecord`]; records
//! themselves are never touched.

use crate::geo::distance_between;
use dalil_common::{Coordinate, Record};
use serde::Serialize;

/// A record in a result set, with its distance from the origin when known
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedRecord<'a> {
    #[serde(flatten)]
    pub record: &'a Record,
    /// Present iff an origin was given and the record has coordinates
    #[serde(rename = "distance", skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl<'a> RankedRecord<'a> {
    pub fn unranked(record: &'a Record) -> Self {
        Self {
            record,
            distance_km: None,
        }
    }
}

/// Ordered result of a search
pub type RankedResult<'a> = Vec<RankedRecord<'a>>;

/// Order records by distance from `origin`
///
/// Without an origin (or with a non-finite one) the input order is kept and
/// nothing is annotated.
/// With one, records with coordinates come first in ascending distance, ties
/// keeping input order; records without coordinates follow in input order.
pub fn rank<'a, I>(records: I, origin: Option<Coordinate>) -> RankedResult<'a>
where
    I: IntoIterator<Item = &'a Record>,
{
    let records = records.into_iter();
    let Some(origin) = origin.filter(Coordinate::is_finite) else {
        return records.map(RankedRecord::unranked).collect();
    };

    let (mut located, unlocated): (Vec<_>, Vec<_>) = records
        .map(|record| RankedRecord {
            record,
            distance_km: record
                .coordinates()
                .map(|target| distance_between(origin, target)),
        })
        .partition(|ranked| ranked.distance_km.is_some());

    // sort_by is stable, so equal distances keep input order
    located.sort_by(|a, b| {
        let a = a.distance_km.unwrap_or(f64::INFINITY);
        let b = b.distance_km.unwrap_or(f64::INFINITY);
        a.total_cmp(&b)
    });

    located.extend(unlocated);
    located
}
