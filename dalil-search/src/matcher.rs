//! Record filtering against a query
//!
//! A record passes when every gate admits it:
//! - area gate: `AreaFilter::All` or exact area match
//! - neighborhood gate: no neighborhood filter or exact match, both sides trimmed
//! - text gate: empty normalized query, or normalized name / officiant name
//!   contains it
//!
//! Input order is preserved.

use crate::engine::Query;
use crate::normalize::normalize;
use dalil_common::model::ALL_LABEL;
use dalil_common::{Area, AreaFilter, Record};
use std::collections::BTreeSet;

/// Stable filter of `records` by `query`
pub fn matches<'a>(records: &'a [Record], query: &Query) -> Vec<&'a Record> {
    let needle = normalize(&query.text);
    let neighborhood = neighborhood_filter(query);

    records
        .iter()
        .filter(|record| {
            area_gate(record, query.area)
                && neighborhood_gate(record, neighborhood)
                && text_gate(record, &needle)
        })
        .collect()
}

/// Exact area comparison; areas are a closed set so nothing is normalized
pub fn area_gate(record: &Record, area: AreaFilter) -> bool {
    area.admits(record.area)
}

/// `needle` must already be normalized
pub fn text_gate(record: &Record, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    if normalize(&record.name).contains(needle) {
        return true;
    }
    record
        .officiant_name
        .as_deref()
        .is_some_and(|officiant| normalize(officiant).contains(needle))
}

fn neighborhood_gate(record: &Record, neighborhood: Option<&str>) -> bool {
    match neighborhood {
        None => true,
        Some(wanted) => record.neighborhood.as_deref().map(str::trim) == Some(wanted),
    }
}

/// Neighborhood filter in effect; blank and `الكل` mean none
fn neighborhood_filter(query: &Query) -> Option<&str> {
    query
        .neighborhood
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty() && *n != ALL_LABEL)
}

/// Areas that have at least one record, in area order
pub fn areas(records: &[Record]) -> Vec<Area> {
    records
        .iter()
        .map(|record| record.area)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct, sorted neighborhoods of the records admitted by `area`
pub fn neighborhoods(records: &[Record], area: AreaFilter) -> Vec<String> {
    records
        .iter()
        .filter(|record| area.admits(record.area))
        .filter_map(|record| record.neighborhood.as_deref().map(str::trim))
        .filter(|n| !n.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, name: &str, area: Area, officiant: Option<&str>) -> Record {
        Record {
            id,
            name: name.to_string(),
            area,
            neighborhood: None,
            officiant_name: officiant.map(str::to_string),
            latitude: None,
            longitude: None,
            audio_uri: None,
            map_link: None,
        }
    }

    fn ids(records: &[&Record]) -> Vec<i64> {
        records.iter().map(|r| r.id).collect()
    }

    fn sample() -> Vec<Record> {
        vec![
            record(1, "مسجد النور", Area::North, Some("الشيخ أحمد")),
            record(2, "مسجد الرحمة", Area::South, None),
            record(3, "جامع الإمام", Area::North, Some("محمد")),
            record(4, "مسجد الهدى", Area::East, Some("عبدالرحمن")),
        ]
    }

    #[test]
    fn test_empty_query_all_areas_returns_everything() {
        let records = sample();
        let result = matches(&records, &Query::default());
        assert_eq!(ids(&result), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_whitespace_query_is_empty() {
        let records = sample();
        let result = matches(&records, &Query::new("   \t "));
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn test_area_gate() {
        let records = sample();
        let query = Query::default().with_area(AreaFilter::Only(Area::North));
        assert_eq!(ids(&matches(&records, &query)), vec![1, 3]);
    }

    #[test]
    fn test_text_matches_normalized_name() {
        let records = sample();
        // Taa marbuta in the record, haa in the query
        assert_eq!(ids(&matches(&records, &Query::new("الرحمه"))), vec![2]);
        // Hamza-below in the record, bare alif in the query
        assert_eq!(ids(&matches(&records, &Query::new("الامام"))), vec![3]);
    }

    #[test]
    fn test_text_matches_officiant() {
        let records = sample();
        assert_eq!(ids(&matches(&records, &Query::new("احمد"))), vec![1]);
        // Name of record 2 and officiant of record 4 both contain it
        assert_eq!(ids(&matches(&records, &Query::new("رحمن"))), vec![4]);
        assert_eq!(ids(&matches(&records, &Query::new("الرحم"))), vec![2, 4]);
    }

    #[test]
    fn test_both_gates_required() {
        let records = sample();
        let query = Query::new("مسجد").with_area(AreaFilter::Only(Area::South));
        assert_eq!(ids(&matches(&records, &query)), vec![2]);
    }

    #[test]
    fn test_neighborhood_gate() {
        let mut records = sample();
        records[0].neighborhood = Some("الملقا".to_string());
        records[2].neighborhood = Some("النرجس".to_string());

        let query = Query::default().with_neighborhood("الملقا");
        assert_eq!(ids(&matches(&records, &query)), vec![1]);

        let query = Query::default().with_neighborhood(ALL_LABEL);
        assert_eq!(matches(&records, &query).len(), 4);
    }

    #[test]
    fn test_neighborhood_gate_ignores_surrounding_whitespace() {
        let mut records = sample();
        records[0].neighborhood = Some(" الملقا ".to_string());
        records[1].neighborhood = Some("الملقا الشمالي".to_string());

        let listed = neighborhoods(&records, AreaFilter::All);
        assert_eq!(listed[0], "الملقا");

        let query = Query::default().with_neighborhood(listed[0].clone());
        assert_eq!(ids(&matches(&records, &query)), vec![1]);

        // Exact after trimming: no substring or normalization
        let query = Query::default().with_neighborhood("ملقا");
        assert!(matches(&records, &query).is_empty());
    }

    #[test]
    fn test_listing_helpers() {
        let mut records = sample();
        records[0].neighborhood = Some("الملقا".to_string());
        records[1].neighborhood = Some("العزيزية".to_string());
        records[2].neighborhood = Some("الملقا".to_string());

        assert_eq!(areas(&records), vec![Area::North, Area::South, Area::East]);
        assert_eq!(
            neighborhoods(&records, AreaFilter::Only(Area::North)),
            vec!["الملقا".to_string()]
        );
        assert_eq!(neighborhoods(&records, AreaFilter::All).len(), 2);
    }
}
