// Statistics provider boundary.
//
// The dispatcher talks to a `StatsProvider` trait object: one function per
// upstream resource, each returning records already normalized into the
// common `StatRecord` shape. Provider-specific payload quirks stay inside
// the adapter implementations (`http`, `mock`) and never leak downstream.

pub mod http;
pub mod mock;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stats::extract::SeasonStats;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("no player with id {0}")]
    UnknownPlayer(u64),

    #[error("failed to decode provider response: {0}")]
    Decode(String),
}

// ---------------------------------------------------------------------------
// Provider-facing records
// ---------------------------------------------------------------------------

/// Immutable descriptive attributes of a player. Passed through to tool
/// responses unchanged, never derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerIdentity {
    pub id: u64,
    pub display_name: String,
    pub common_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub nationality_id: u32,
    pub position_id: u32,
    pub detailed_position_id: u32,
    /// Height in centimeters.
    pub height: u32,
    /// Weight in kilograms.
    pub weight: u32,
    pub image_path: String,
}

/// One search hit, trimmed to what the assistant needs to pick a player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSummary {
    pub id: u64,
    pub name: String,
    pub team: String,
    pub position: u32,
}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Function-per-resource contract against the upstream statistics source.
///
/// Implementations raise `ProviderError` on transport or HTTP failure;
/// the dispatcher converts those into user-facing strings at the tool-call
/// boundary. Timeouts and cancellation are the implementation's concern.
#[async_trait]
pub trait StatsProvider: Send + Sync {
    /// Search players by a name fragment. An empty result is not an error.
    async fn search_players(&self, name: &str) -> Result<Vec<PlayerSummary>, ProviderError>;

    /// Fetch a player's identity by id.
    async fn player_details(&self, player_id: u64) -> Result<PlayerIdentity, ProviderError>;

    /// Fetch a player's per-season statistics, in provider order
    /// (index 0 is the current season).
    async fn season_statistics(&self, player_id: u64) -> Result<Vec<SeasonStats>, ProviderError>;
}
