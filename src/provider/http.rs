// Live HTTP provider adapter (BeSoccer-shaped API).
//
// Endpoints take the API token as a query parameter and wrap every payload
// in a `{"data": ...}` envelope. Raw payload structs are private; the
// adapter converts them into the common record shapes at the boundary.

use std::time::Duration;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::provider::{PlayerIdentity, PlayerSummary, ProviderError, StatsProvider};
use crate::stats::extract::{SeasonStats, StatRecord};

// ---------------------------------------------------------------------------
// Raw payload structs (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct RawSearchHit {
    id: u64,
    display_name: String,
    #[serde(default)]
    team: Option<RawTeam>,
    position_id: u32,
}

#[derive(Debug, Deserialize)]
struct RawTeam {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawPlayer {
    id: u64,
    display_name: String,
    common_name: String,
    #[serde(default)]
    date_of_birth: Option<String>,
    nationality_id: u32,
    position_id: u32,
    detailed_position_id: u32,
    height: u32,
    weight: u32,
    #[serde(default)]
    image_path: String,
}

#[derive(Debug, Deserialize)]
struct RawSeason {
    season_id: u64,
    details: Vec<RawStatDetail>,
}

/// One provider stat row. The value is schemaless JSON; discrimination
/// into scalar/fields/malformed happens in the extractor, not here.
#[derive(Debug, Deserialize)]
struct RawStatDetail {
    type_id: u32,
    value: Value,
}

// ---------------------------------------------------------------------------
// Conversions into the common shapes
// ---------------------------------------------------------------------------

impl From<RawSearchHit> for PlayerSummary {
    fn from(raw: RawSearchHit) -> Self {
        PlayerSummary {
            id: raw.id,
            name: raw.display_name,
            team: raw
                .team
                .map(|t| t.name)
                .unwrap_or_else(|| "Unknown Team".to_string()),
            position: raw.position_id,
        }
    }
}

impl From<RawPlayer> for PlayerIdentity {
    fn from(raw: RawPlayer) -> Self {
        let date_of_birth = raw.date_of_birth.as_deref().and_then(|s| {
            match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    warn!(player_id = raw.id, "unparseable date_of_birth '{s}'");
                    None
                }
            }
        });
        PlayerIdentity {
            id: raw.id,
            display_name: raw.display_name,
            common_name: raw.common_name,
            date_of_birth,
            nationality_id: raw.nationality_id,
            position_id: raw.position_id,
            detailed_position_id: raw.detailed_position_id,
            height: raw.height,
            weight: raw.weight,
            image_path: raw.image_path,
        }
    }
}

impl From<RawSeason> for SeasonStats {
    fn from(raw: RawSeason) -> Self {
        SeasonStats {
            season_id: raw.season_id,
            records: raw
                .details
                .into_iter()
                .map(|d| StatRecord::new(d.type_id, d.value))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// HttpProvider
// ---------------------------------------------------------------------------

/// Live provider client. One instance per process; each call issues a
/// fresh request, there is no caching layer here.
pub struct HttpProvider {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpProvider {
    pub fn new(config: &ProviderConfig, token: String) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// GET `{base_url}{path}` with the given query pairs plus the API
    /// token, unwrap the `data` envelope, and decode into `T`.
    async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(path, "provider request");

        let response = self
            .http
            .get(&url)
            .query(query)
            .query(&[("token", &self.token)])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
                .unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        Ok(envelope.data)
    }
}

#[async_trait::async_trait]
impl StatsProvider for HttpProvider {
    async fn search_players(&self, name: &str) -> Result<Vec<PlayerSummary>, ProviderError> {
        let hits: Vec<RawSearchHit> = self
            .get_data("/search/players", &[("name", name.to_string())])
            .await?;
        Ok(hits.into_iter().map(PlayerSummary::from).collect())
    }

    async fn player_details(&self, player_id: u64) -> Result<PlayerIdentity, ProviderError> {
        let raw: RawPlayer = self
            .get_data("/player", &[("id", player_id.to_string())])
            .await?;
        Ok(raw.into())
    }

    async fn season_statistics(&self, player_id: u64) -> Result<Vec<SeasonStats>, ProviderError> {
        let raw: Vec<RawSeason> = self
            .get_data(&format!("/statistics/seasons/players/{player_id}"), &[])
            .await?;
        Ok(raw.into_iter().map(SeasonStats::from).collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
