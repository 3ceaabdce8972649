// In-memory fixture provider.
//
// A bounded, static set of player identities and synthetic per-category
// records, used to exercise the dispatcher and the normalization pipeline
// without network access. Selected at startup when `enable_mocks` is set;
// the dispatcher runs exactly the same normalization against it as against
// the live provider.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;

use crate::provider::{PlayerIdentity, PlayerSummary, ProviderError, StatsProvider};
use crate::stats::categories::StatCategory;
use crate::stats::extract::{SeasonStats, StatRecord};

pub struct MockProvider {
    players: Vec<PlayerIdentity>,
    statistics: HashMap<u64, Vec<SeasonStats>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            players: fixture_players(),
            statistics: fixture_statistics(),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatsProvider for MockProvider {
    async fn search_players(&self, name: &str) -> Result<Vec<PlayerSummary>, ProviderError> {
        let needle = name.to_lowercase();
        Ok(self
            .players
            .iter()
            .filter(|p| {
                p.display_name.to_lowercase().contains(&needle)
                    || p.common_name.to_lowercase().contains(&needle)
            })
            .map(|p| PlayerSummary {
                id: p.id,
                name: p.display_name.clone(),
                team: "Mock Team FC".to_string(),
                position: p.position_id,
            })
            .collect())
    }

    async fn player_details(&self, player_id: u64) -> Result<PlayerIdentity, ProviderError> {
        self.players
            .iter()
            .find(|p| p.id == player_id)
            .cloned()
            .ok_or(ProviderError::UnknownPlayer(player_id))
    }

    async fn season_statistics(&self, player_id: u64) -> Result<Vec<SeasonStats>, ProviderError> {
        // A player with identity but no statistics yields an empty list,
        // mirroring a live provider with no season rows for the id.
        Ok(self.statistics.get(&player_id).cloned().unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn fixture_players() -> Vec<PlayerIdentity> {
    vec![
        PlayerIdentity {
            id: 1,
            display_name: "L. Messi".to_string(),
            common_name: "Messi".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1987, 6, 24),
            nationality_id: 1,
            position_id: 1,
            detailed_position_id: 1,
            height: 170,
            weight: 72,
            image_path: "https://cdn.example.com/players/1.png".to_string(),
        },
        PlayerIdentity {
            id: 2,
            display_name: "C. Ronaldo".to_string(),
            common_name: "Ronaldo".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1985, 2, 5),
            nationality_id: 2,
            position_id: 2,
            detailed_position_id: 2,
            height: 187,
            weight: 83,
            image_path: "https://cdn.example.com/players/2.png".to_string(),
        },
        // Identity only: no statistics fixture exists for this player, so
        // single-player analysis reports "no statistics" and comparisons
        // including this player fail outright.
        PlayerIdentity {
            id: 3,
            display_name: "J. Bellingham".to_string(),
            common_name: "Bellingham".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2003, 6, 29),
            nationality_id: 3,
            position_id: 3,
            detailed_position_id: 3,
            height: 186,
            weight: 75,
            image_path: "https://cdn.example.com/players/3.png".to_string(),
        },
    ]
}

fn record(category: StatCategory, value: serde_json::Value) -> StatRecord {
    StatRecord::new(category.id(), value)
}

fn fixture_statistics() -> HashMap<u64, Vec<SeasonStats>> {
    let mut statistics = HashMap::new();

    // Four seasons, newest first. Goals sum to 40; ratings average to 8.00
    // over the full season count.
    statistics.insert(
        1,
        vec![
            SeasonStats {
                season_id: 2024,
                records: vec![
                    record(StatCategory::Goals, json!({ "total": 12 })),
                    record(StatCategory::Assists, json!({ "total": 9 })),
                    record(StatCategory::Appearances, json!({ "total": 30 })),
                    record(StatCategory::MinutesPlayed, json!({ "total": 2700 })),
                    record(StatCategory::Substitutions, json!({ "in": 3, "out": 5 })),
                    record(StatCategory::Rating, json!(7.0)),
                ],
            },
            SeasonStats {
                season_id: 2023,
                records: vec![
                    record(StatCategory::Goals, json!({ "total": 10 })),
                    record(StatCategory::Assists, json!({ "total": 7 })),
                    record(StatCategory::Rating, json!(8.0)),
                ],
            },
            SeasonStats {
                season_id: 2022,
                records: vec![
                    record(StatCategory::Goals, json!({ "total": 9 })),
                    record(StatCategory::Assists, json!({ "total": 8 })),
                    record(StatCategory::Rating, json!(9.0)),
                ],
            },
            SeasonStats {
                season_id: 2021,
                records: vec![
                    record(StatCategory::Goals, json!({ "total": 9 })),
                    record(StatCategory::Assists, json!({ "total": 6 })),
                    record(StatCategory::Rating, json!(8.0)),
                ],
            },
        ],
    );

    statistics.insert(
        2,
        vec![SeasonStats {
            season_id: 2024,
            records: vec![
                record(StatCategory::Goals, json!({ "total": 10 })),
                record(StatCategory::Assists, json!({ "total": 4 })),
                record(StatCategory::Appearances, json!({ "total": 28 })),
                record(StatCategory::Rating, json!(7.4)),
            ],
        }],
    );

    statistics
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- search --

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let provider = MockProvider::new();

        let hits = provider.search_players("messi").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
        assert_eq!(hits[0].name, "L. Messi");

        let hits = provider.search_players("RONALDO").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 2);
    }

    #[tokio::test]
    async fn search_miss_returns_empty_not_error() {
        let provider = MockProvider::new();
        let hits = provider.search_players("zzzznotaplayer").await.unwrap();
        assert!(hits.is_empty());
    }

    // -- details --

    #[tokio::test]
    async fn unknown_player_details_is_an_error() {
        let provider = MockProvider::new();
        let err = provider.player_details(999).await.unwrap_err();
        assert!(matches!(err, ProviderError::UnknownPlayer(999)));
    }

    // -- statistics fixtures --

    #[tokio::test]
    async fn messi_has_four_seasons_newest_first() {
        let provider = MockProvider::new();
        let seasons = provider.season_statistics(1).await.unwrap();
        assert_eq!(seasons.len(), 4);
        assert_eq!(seasons[0].season_id, 2024);
        assert_eq!(seasons[3].season_id, 2021);
    }

    #[tokio::test]
    async fn identity_only_player_has_no_seasons() {
        let provider = MockProvider::new();
        assert!(provider.player_details(3).await.is_ok());
        assert!(provider.season_statistics(3).await.unwrap().is_empty());
    }
}
