// Tool dispatcher / provider gateway.
//
// Resolves each named operation to one or more concurrent provider
// fetches, feeds the fetched records through the normalization core, and
// assembles the structured result the assistant narrates. Every failure is
// caught here and converted to a short user-facing string; no raw error
// crosses into the conversation.

use std::sync::Arc;

use futures_util::future::try_join_all;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::provider::http::HttpProvider;
use crate::provider::mock::MockProvider;
use crate::provider::{PlayerIdentity, ProviderError, StatsProvider};
use crate::stats::aggregate::aggregate_seasons;
use crate::stats::categories::StatCategory;
use crate::stats::compare::{build_comparison, ComparisonInput};
use crate::stats::extract::{map_season, SeasonStats};
use crate::tools::{ChartType, ToolCall};

const NO_MATCHES_MESSAGE: &str =
    "No players found with that name. Please try with a different name or spelling.";
const NO_CURRENT_SEASON_MESSAGE: &str =
    "No current season statistics available for this player.";

#[derive(Debug, Error)]
enum DispatchError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("no statistics found for player {0}")]
    NoStatistics(String),
}

/// Gateway between the conversational agent and the statistics provider.
///
/// The provider implementation (mock or live) is injected at construction,
/// so both paths run identical normalization and tests can exercise either
/// in the same process.
pub struct ToolDispatcher {
    provider: Arc<dyn StatsProvider>,
}

impl ToolDispatcher {
    pub fn new(provider: Arc<dyn StatsProvider>) -> Self {
        Self { provider }
    }

    /// Select the provider from config: fixtures when mocks are enabled,
    /// the live HTTP client otherwise.
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        if config.provider.enable_mocks {
            info!("tool dispatcher using mock provider");
            return Ok(Self::new(Arc::new(MockProvider::new())));
        }
        let token = config
            .credentials
            .provider_api_key
            .clone()
            .unwrap_or_default();
        let provider = HttpProvider::new(&config.provider, token)?;
        info!(base_url = %config.provider.base_url, "tool dispatcher using live provider");
        Ok(Self::new(Arc::new(provider)))
    }

    /// Execute one named tool invocation. Always returns a value the agent
    /// can relay: a structured object on success, a short human-readable
    /// string on any failure.
    pub async fn execute(&self, tool_name: &str, args: &Value) -> Value {
        let call = match ToolCall::parse(tool_name, args) {
            Ok(call) => call,
            Err(message) => {
                warn!(tool_name, %message, "rejected tool invocation");
                return Value::String(message);
            }
        };

        info!(tool_name, "dispatching tool call");
        let result = match call {
            ToolCall::Search { name } => self
                .search(&name)
                .await
                .map_err(|e| user_message("searching for player", &e)),
            ToolCall::Analyze { player_id } => self
                .analyze(player_id)
                .await
                .map_err(|e| user_message("analyzing player", &e)),
            ToolCall::AnalyzeHistorical { player_id } => self
                .analyze_historical(player_id)
                .await
                .map_err(|e| user_message("analyzing player", &e)),
            ToolCall::Compare {
                player_ids,
                chart_type,
                categories,
            } => self
                .compare(&player_ids, chart_type, &categories)
                .await
                .map_err(|e| user_message("comparing players", &e)),
        };

        match result {
            Ok(value) => value,
            Err(message) => {
                warn!(tool_name, %message, "tool call failed");
                Value::String(message)
            }
        }
    }

    // -- operations --

    async fn search(&self, name: &str) -> Result<Value, DispatchError> {
        let hits = self.provider.search_players(name).await?;
        if hits.is_empty() {
            return Ok(Value::String(NO_MATCHES_MESSAGE.to_string()));
        }
        // Top hit only; the assistant asks the user to disambiguate by
        // refining the name rather than scrolling a list.
        let top: Vec<_> = hits.into_iter().take(1).collect();
        Ok(serde_json::to_value(top).unwrap_or_default())
    }

    async fn analyze(&self, player_id: u64) -> Result<Value, DispatchError> {
        let (player, seasons) = tokio::try_join!(
            self.provider.player_details(player_id),
            self.provider.season_statistics(player_id),
        )?;

        // Provider order is authoritative: entry 0 is the current season,
        // entry 1 the previous one.
        let mut seasons = seasons.into_iter();
        let current = match seasons.next() {
            Some(season) => season,
            None => {
                // Identity without statistics: still narratable, so this is
                // a structured result rather than a failure.
                return Ok(json!({
                    "playerInfo": player_info_json(&player),
                    "error": NO_CURRENT_SEASON_MESSAGE,
                }));
            }
        };
        let previous = seasons.next();

        Ok(json!({
            "playerInfo": player_info_json(&player),
            "currentSeason": season_json(&current),
            "previousSeason": previous.as_ref().map(season_json),
            "typeIds": StatCategory::table(),
        }))
    }

    async fn analyze_historical(&self, player_id: u64) -> Result<Value, DispatchError> {
        let (player, seasons) = tokio::try_join!(
            self.provider.player_details(player_id),
            self.provider.season_statistics(player_id),
        )?;

        let statistics = aggregate_seasons(&seasons, &StatCategory::averaged_ids());
        let season_ids: Vec<u64> = seasons.iter().map(|s| s.season_id).collect();

        Ok(json!({
            "playerInfo": player_info_json(&player),
            "totalSeasons": seasons.len(),
            "seasonIds": season_ids,
            "statistics": statistics,
            "typeIds": StatCategory::table(),
        }))
    }

    async fn compare(
        &self,
        player_ids: &[u64],
        chart_type: ChartType,
        categories: &[u32],
    ) -> Result<Value, DispatchError> {
        // One detail+statistics pair per player, all fetched concurrently.
        // A single missing participant fails the whole comparison: a chart
        // with a fabricated zero column would be misleading.
        let fetches = player_ids.iter().map(|&id| {
            let provider = Arc::clone(&self.provider);
            async move {
                let (player, seasons) = tokio::try_join!(
                    provider.player_details(id),
                    provider.season_statistics(id),
                )?;
                let current = seasons
                    .into_iter()
                    .next()
                    .ok_or_else(|| DispatchError::NoStatistics(player.display_name.clone()))?;
                Ok::<(PlayerIdentity, SeasonStats), DispatchError>((player, current))
            }
        });
        let players = try_join_all(fetches).await?;

        let inputs: Vec<ComparisonInput<'_>> = players
            .iter()
            .map(|(player, current)| ComparisonInput {
                display_name: &player.display_name,
                records: &current.records,
            })
            .collect();
        let rows = build_comparison(&inputs, categories);
        let names: Vec<&str> = players
            .iter()
            .map(|(player, _)| player.display_name.as_str())
            .collect();

        Ok(json!({
            "chartData": {
                "title": "Player Statistics Comparison",
                "description": "Comparing current season statistics",
                "data": rows,
                "players": names,
                "chartType": chart_type,
            }
        }))
    }
}

// ---------------------------------------------------------------------------
// Response assembly helpers
// ---------------------------------------------------------------------------

fn user_message(action: &str, error: &DispatchError) -> String {
    format!("Error {action}: {error}. Please try again later.")
}

fn player_info_json(player: &PlayerIdentity) -> Value {
    json!({
        "name": player.display_name,
        "commonName": player.common_name,
        "dateOfBirth": player.date_of_birth,
        "nationality_id": player.nationality_id,
        "position_id": player.position_id,
        "detailed_position_id": player.detailed_position_id,
        "height": player.height,
        "weight": player.weight,
        "imagePath": player.image_path,
    })
}

fn season_json(season: &SeasonStats) -> Value {
    json!({
        "season_id": season.season_id,
        "statistics": map_season(&season.records),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
