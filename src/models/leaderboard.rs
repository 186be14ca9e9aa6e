// src/models/leaderboard.rs

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A community member's aggregated quiz standing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub score: f64,
    pub accuracy: f64,
    pub count: u32,
    /// Whether this row belongs to the caller.
    /// The API sends either a boolean or a string flag here.
    #[serde(default, deserialize_with = "flag")]
    pub is_me: bool,
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(flag)) => flag,
        Some(Value::String(text)) => !text.is_empty() && text != "false",
        _ => false,
    })
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardResponse {
    #[serde(default)]
    pub leaderboard: Vec<LeaderboardEntry>,
}
