// Tool declarations and typed argument parsing.
//
// Each tool the assistant may call is declared with a name, a natural-
// language description, and a strictly-typed JSON schema. Incoming tool
// invocations are parsed into the `ToolCall` enum before dispatch; the
// dispatcher never touches raw argument JSON.

pub mod dispatch;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const TOOL_SEARCH: &str = "search";
pub const TOOL_ANALYZE: &str = "analyze";
pub const TOOL_ANALYZE_HISTORICAL: &str = "analyze-historical";
pub const TOOL_COMPARE: &str = "compare";

/// Chart style requested for a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Radar,
    Bar,
}

/// A validated, typed tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    Search {
        name: String,
    },
    Analyze {
        player_id: u64,
    },
    AnalyzeHistorical {
        player_id: u64,
    },
    Compare {
        player_ids: Vec<u64>,
        chart_type: ChartType,
        categories: Vec<u32>,
    },
}

// -- raw argument structs, matching the declared schemas --

#[derive(Deserialize)]
struct SearchArgs {
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeArgs {
    player_id: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompareArgs {
    player_ids: Vec<u64>,
    chart_type: ChartType,
    categories: Vec<u32>,
}

impl ToolCall {
    /// Parse a named invocation with JSON arguments into a typed call.
    pub fn parse(tool_name: &str, args: &Value) -> Result<ToolCall, String> {
        match tool_name {
            TOOL_SEARCH => {
                let args: SearchArgs = decode(tool_name, args)?;
                Ok(ToolCall::Search { name: args.name })
            }
            TOOL_ANALYZE => {
                let args: AnalyzeArgs = decode(tool_name, args)?;
                Ok(ToolCall::Analyze {
                    player_id: args.player_id,
                })
            }
            TOOL_ANALYZE_HISTORICAL => {
                let args: AnalyzeArgs = decode(tool_name, args)?;
                Ok(ToolCall::AnalyzeHistorical {
                    player_id: args.player_id,
                })
            }
            TOOL_COMPARE => {
                let args: CompareArgs = decode(tool_name, args)?;
                Ok(ToolCall::Compare {
                    player_ids: args.player_ids,
                    chart_type: args.chart_type,
                    categories: args.categories,
                })
            }
            other => Err(format!("unknown tool: {other}")),
        }
    }
}

fn decode<'de, T: Deserialize<'de>>(tool_name: &str, args: &'de Value) -> Result<T, String> {
    T::deserialize(args).map_err(|e| format!("invalid arguments for {tool_name}: {e}"))
}

/// Tool declarations in Anthropic Messages API shape, passed with every
/// tool-enabled request.
pub fn tool_definitions() -> Vec<Value> {
    vec![
        json!({
            "name": TOOL_SEARCH,
            "description": "Search for a football player by name to get their ID.",
            "input_schema": {
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "The name of the player to search for"
                    }
                },
                "required": ["name"]
            }
        }),
        json!({
            "name": TOOL_ANALYZE,
            "description": "Get a detailed analysis of a player's current season with previous season comparison.",
            "input_schema": {
                "type": "object",
                "properties": {
                    "playerId": {
                        "type": "integer",
                        "description": "The ID of the player to analyze"
                    }
                },
                "required": ["playerId"]
            }
        }),
        json!({
            "name": TOOL_ANALYZE_HISTORICAL,
            "description": "Get aggregated historical statistics for a player across all seasons.",
            "input_schema": {
                "type": "object",
                "properties": {
                    "playerId": {
                        "type": "integer",
                        "description": "The ID of the player to analyze"
                    }
                },
                "required": ["playerId"]
            }
        }),
        json!({
            "name": TOOL_COMPARE,
            "description": "Compare current-season statistics between two or more players using charts.",
            "input_schema": {
                "type": "object",
                "properties": {
                    "playerIds": {
                        "type": "array",
                        "items": { "type": "integer" },
                        "description": "IDs of the players to compare"
                    },
                    "chartType": {
                        "type": "string",
                        "enum": ["radar", "bar"],
                        "description": "Type of chart to generate"
                    },
                    "categories": {
                        "type": "array",
                        "items": { "type": "integer" },
                        "description": "Category ids to compare, in render order"
                    }
                },
                "required": ["playerIds", "chartType", "categories"]
            }
        }),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- parsing --

    #[test]
    fn parse_search() {
        let call = ToolCall::parse(TOOL_SEARCH, &json!({"name": "Messi"})).unwrap();
        assert_eq!(call, ToolCall::Search { name: "Messi".into() });
    }

    #[test]
    fn parse_analyze_variants() {
        let call = ToolCall::parse(TOOL_ANALYZE, &json!({"playerId": 1})).unwrap();
        assert_eq!(call, ToolCall::Analyze { player_id: 1 });

        let call = ToolCall::parse(TOOL_ANALYZE_HISTORICAL, &json!({"playerId": 2})).unwrap();
        assert_eq!(call, ToolCall::AnalyzeHistorical { player_id: 2 });
    }

    #[test]
    fn parse_compare() {
        let call = ToolCall::parse(
            TOOL_COMPARE,
            &json!({
                "playerIds": [1, 2],
                "chartType": "bar",
                "categories": [52, 79]
            }),
        )
        .unwrap();
        assert_eq!(
            call,
            ToolCall::Compare {
                player_ids: vec![1, 2],
                chart_type: ChartType::Bar,
                categories: vec![52, 79],
            }
        );
    }

    #[test]
    fn parse_rejects_missing_required_field() {
        let err = ToolCall::parse(TOOL_ANALYZE, &json!({})).unwrap_err();
        assert!(err.contains("invalid arguments"));
    }

    #[test]
    fn parse_rejects_bad_chart_type() {
        let err = ToolCall::parse(
            TOOL_COMPARE,
            &json!({"playerIds": [1], "chartType": "pie", "categories": [52]}),
        )
        .unwrap_err();
        assert!(err.contains("invalid arguments"));
    }

    #[test]
    fn parse_rejects_unknown_tool() {
        let err = ToolCall::parse("forecast", &json!({})).unwrap_err();
        assert!(err.contains("unknown tool"));
    }

    // -- declarations --

    #[test]
    fn four_tools_declared_with_schemas() {
        let defs = tool_definitions();
        assert_eq!(defs.len(), 4);
        let names: Vec<&str> = defs
            .iter()
            .map(|d| d["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec![TOOL_SEARCH, TOOL_ANALYZE, TOOL_ANALYZE_HISTORICAL, TOOL_COMPARE]
        );
        for def in &defs {
            assert!(def["description"].is_string());
            assert_eq!(def["input_schema"]["type"], "object");
        }
    }

    #[test]
    fn chart_type_serializes_lowercase() {
        assert_eq!(serde_json::to_value(ChartType::Radar).unwrap(), "radar");
        assert_eq!(serde_json::to_value(ChartType::Bar).unwrap(), "bar");
    }
}
