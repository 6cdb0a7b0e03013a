use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Body of `POST /weather`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WeatherRequest {
    pub date: String,
    pub location: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitResponse {
    pub id: String,
}

/// Snapshot of what the user submitted, taken at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserData {
    pub date: String,
    pub location: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeatherRecord {
    pub id: String,
    pub user_data: UserData,
    /// Provider payload, stored exactly as received.
    #[schema(value_type = Object)]
    pub weather_data: Value,
}

// WeatherStack reports domain errors inside a 200 body:
// {"success": false, "error": {"code": 615, "type": "request_failed", "info": "..."}}
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherstackErrorBody {
    pub code: Option<i64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub info: String,
}
