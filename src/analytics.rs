//! Pure transforms over a fetched set of countries.
//!
//! None of these functions fail. Constraint checks on their inputs (such as
//! the accepted range of `n` for rankings) belong to the HTTP layer.

use std::collections::BTreeMap;

use crate::model::{CountryRecord, RankField, RegionAggregate};

/// Countries whose region equals `region`, ignoring case.
///
/// An empty result is not an error here; the caller decides what it means.
pub fn filter_by_region(records: &[CountryRecord], region: &str) -> Vec<CountryRecord> {
    let wanted = region.to_lowercase();
    records
        .iter()
        .filter(|r| r.region.to_lowercase() == wanted)
        .cloned()
        .collect()
}

/// The `n` records with the largest `field`, largest first.
///
/// The sort is stable: records with equal values keep their upstream order.
pub fn top_n(records: &[CountryRecord], field: RankField, n: usize) -> Vec<CountryRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| field.value(b).total_cmp(&field.value(a)));
    sorted.truncate(n);
    sorted
}

/// Mean population, density and area per region, rounded to two decimals
/// with ties going to the even digit.
///
/// One row per distinct region, ordered by region name.
pub fn region_means(records: &[CountryRecord]) -> Vec<RegionAggregate> {
    #[derive(Default)]
    struct Totals {
        count: usize,
        population: f64,
        density: f64,
        area_km2: f64,
    }

    let mut groups: BTreeMap<&str, Totals> = BTreeMap::new();
    for r in records {
        let totals = groups.entry(r.region.as_str()).or_default();
        totals.count += 1;
        totals.population += r.population as f64;
        totals.density += r.density;
        totals.area_km2 += r.area_km2;
    }

    groups
        .into_iter()
        .map(|(region, t)| {
            let n = t.count as f64;
            RegionAggregate {
                region: region.to_string(),
                population: round2(t.population / n),
                density: round2(t.density / n),
                area_km2: round2(t.area_km2 / n),
            }
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
