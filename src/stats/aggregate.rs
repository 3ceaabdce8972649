// Multi-season aggregation with a per-category reduction policy.
//
// Most categories are summed across seasons; a designated set (per-match
// ratings) is averaged instead. The average divisor is the number of
// seasons passed in, not the number of seasons that contained the
// category: a season silently missing a category contributes zero to the
// sum but still counts toward the divisor. That is why accumulation runs
// to completion before any averaging happens.

use std::collections::BTreeMap;

use crate::stats::extract::{find_stat_value, NamedFields, SeasonStats};

/// Aggregated category id -> fields spanning multiple seasons.
pub type AggregatedStats = BTreeMap<u32, NamedFields>;

/// Round to exactly two decimal places using standard rounding.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Fold `seasons` into per-category totals, then replace the totals of
/// every category in `averaged_ids` with the two-decimal arithmetic mean
/// over the season count.
///
/// Zero seasons is a defined no-op returning an empty result.
pub fn aggregate_seasons(seasons: &[SeasonStats], averaged_ids: &[u32]) -> AggregatedStats {
    if seasons.is_empty() {
        return AggregatedStats::new();
    }

    // Pass 1: accumulate every field of every record into running sums.
    let mut aggregated = AggregatedStats::new();
    for season in seasons {
        for record in &season.records {
            let values = find_stat_value(std::slice::from_ref(record), record.category_id);
            let entry = aggregated.entry(record.category_id).or_default();
            for (field, value) in values {
                *entry.entry(field).or_insert(0.0) += value;
            }
        }
    }

    // Pass 2: finalize the averaged categories over the full season count.
    let season_count = seasons.len() as f64;
    for id in averaged_ids {
        if let Some(fields) = aggregated.get_mut(id) {
            for value in fields.values_mut() {
                *value = round2(*value / season_count);
            }
        }
    }

    aggregated
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
