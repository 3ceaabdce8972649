// Chart-ready comparison datasets across multiple players.
//
// Each requested category becomes one row: a label plus one scalar per
// player, keyed by display name. Rows come out in the order the categories
// were requested, which is also the render order for bar and radar charts.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::stats::categories::StatCategory;
use crate::stats::extract::{find_stat_value, StatRecord};

/// One player's current-season records, labeled for the chart.
#[derive(Debug, Clone)]
pub struct ComparisonInput<'a> {
    pub display_name: &'a str,
    pub records: &'a [StatRecord],
}

/// One chart row: a category label plus each player's scalar value.
/// Serializes flat, `{"label": "goals", "L. Messi": 12.0, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub label: String,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

/// Build one row per requested category, in request order.
///
/// A player's value is the `total` field of the extracted category,
/// defaulting to 0 when the category (or its `total`) is missing. Callers
/// must not pass players whose season records are entirely absent; the
/// dispatcher excludes those and fails the operation before reaching here.
pub fn build_comparison(players: &[ComparisonInput<'_>], category_ids: &[u32]) -> Vec<ComparisonRow> {
    category_ids
        .iter()
        .map(|&category_id| {
            let values = players
                .iter()
                .map(|player| {
                    let fields = find_stat_value(player.records, category_id);
                    let total = fields.get("total").copied().unwrap_or(0.0);
                    (player.display_name.to_string(), total)
                })
                .collect();
            ComparisonRow {
                label: StatCategory::label_for_id(category_id),
                values,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn messi_records() -> Vec<StatRecord> {
        vec![
            StatRecord::new(52, json!({"total": 12})),
            StatRecord::new(79, json!({"total": 9})),
        ]
    }

    fn ronaldo_records() -> Vec<StatRecord> {
        vec![
            StatRecord::new(52, json!({"total": 10})),
            StatRecord::new(79, json!({"total": 4})),
        ]
    }

    // -- row and key counts --

    #[test]
    fn one_row_per_category_with_player_keys() {
        let messi = messi_records();
        let ronaldo = ronaldo_records();
        let players = vec![
            ComparisonInput { display_name: "L. Messi", records: &messi },
            ComparisonInput { display_name: "C. Ronaldo", records: &ronaldo },
        ];

        let rows = build_comparison(&players, &[52, 79]);
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row.values.len(), 2);
        }

        assert_eq!(rows[0].label, "goals");
        assert_eq!(rows[0].values["L. Messi"], 12.0);
        assert_eq!(rows[0].values["C. Ronaldo"], 10.0);
        assert_eq!(rows[1].label, "assists");
        assert_eq!(rows[1].values["L. Messi"], 9.0);
        assert_eq!(rows[1].values["C. Ronaldo"], 4.0);
    }

    // -- category order is preserved --

    #[test]
    fn row_order_matches_requested_category_order() {
        let messi = messi_records();
        let players = vec![ComparisonInput { display_name: "L. Messi", records: &messi }];

        let rows = build_comparison(&players, &[79, 52]);
        assert_eq!(rows[0].label, "assists");
        assert_eq!(rows[1].label, "goals");
    }

    // -- missing values default to zero --

    #[test]
    fn missing_category_defaults_to_zero() {
        let messi = messi_records();
        let players = vec![ComparisonInput { display_name: "L. Messi", records: &messi }];

        // Tackles (78) not in the fixture records.
        let rows = build_comparison(&players, &[78]);
        assert_eq!(rows[0].values["L. Messi"], 0.0);
    }

    #[test]
    fn category_without_total_field_defaults_to_zero() {
        let records = vec![StatRecord::new(59, json!({"in": 3, "out": 2}))];
        let players = vec![ComparisonInput { display_name: "L. Messi", records: &records }];

        let rows = build_comparison(&players, &[59]);
        assert_eq!(rows[0].values["L. Messi"], 0.0);
    }

    // -- unknown category label falls back to the numeric id --

    #[test]
    fn unknown_category_labeled_by_id() {
        let messi = messi_records();
        let players = vec![ComparisonInput { display_name: "L. Messi", records: &messi }];

        let rows = build_comparison(&players, &[777]);
        assert_eq!(rows[0].label, "777");
    }

    // -- empty category list --

    #[test]
    fn no_categories_no_rows() {
        let messi = messi_records();
        let players = vec![ComparisonInput { display_name: "L. Messi", records: &messi }];
        assert!(build_comparison(&players, &[]).is_empty());
    }

    // -- serialization shape --

    #[test]
    fn row_serializes_flat() {
        let messi = messi_records();
        let players = vec![ComparisonInput { display_name: "L. Messi", records: &messi }];

        let rows = build_comparison(&players, &[52]);
        let value = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(value["label"], "goals");
        assert_eq!(value["L. Messi"], 12.0);
        assert_eq!(value.as_object().unwrap().len(), 2);
    }
}
