//! Discovery engine: filter, then rank
//!
//! Filtering runs first so no distance is computed for a record that gets
//! discarded, and a `limit` means "nearest N of the filtered set".

use crate::matcher::matches;
use crate::ranker::{rank, RankedResult};
use dalil_common::{AreaFilter, Coordinate, Record};
use tracing::debug;

/// One search invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Free text, matched after normalization
    pub text: String,
    pub area: AreaFilter,
    /// Exact neighborhood; `None` or `الكل` for any
    pub neighborhood: Option<String>,
    /// Device location, enables proximity ranking
    pub origin: Option<Coordinate>,
    /// Keep only the first N ranked results
    pub limit: Option<usize>,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_area(mut self, area: AreaFilter) -> Self {
        self.area = area;
        self
    }

    pub fn with_neighborhood(mut self, neighborhood: impl Into<String>) -> Self {
        self.neighborhood = Some(neighborhood.into());
        self
    }

    pub fn with_origin(mut self, origin: Coordinate) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Ranked, filtered view of `all_records` for `query`. Never fails.
pub fn search<'a>(all_records: &'a [Record], query: &Query) -> RankedResult<'a> {
    let matched = matches(all_records, query);
    let matched_count = matched.len();

    let mut ranked = rank(matched, query.origin);
    if let Some(limit) = query.limit {
        ranked.truncate(limit);
    }

    debug!(
        total = all_records.len(),
        matched = matched_count,
        returned = ranked.len(),
        by_distance = query.origin.is_some(),
        "Search complete"
    );
    ranked
}
