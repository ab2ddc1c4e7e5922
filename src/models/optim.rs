use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Session id the optimizer expects on every request.
pub const OPTIM_SESSION_ID: &str = "json";

/// Kind of request sent to the optimization service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RequestType {
    /// Ask for the next recommended item.
    #[serde(rename = "RECO")]
    Recommend,
    /// Report a learner's score on an item.
    #[serde(rename = "SCOR")]
    Score,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recommend => "RECO",
            Self::Score => "SCOR",
        }
    }
}

/// Body posted to the optimization service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimRequest {
    pub session_id: String,
    pub request_type: RequestType,
    pub context: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<Value>,
}

impl OptimRequest {
    pub fn recommend(context: Value) -> Self {
        Self {
            session_id: OPTIM_SESSION_ID.to_string(),
            request_type: RequestType::Recommend,
            context,
            item: None,
            score: None,
        }
    }

    pub fn report(context: Value, item: Value, score: Value) -> Self {
        Self {
            session_id: OPTIM_SESSION_ID.to_string(),
            request_type: RequestType::Score,
            context,
            item: Some(item),
            score: Some(score),
        }
    }
}

/// Raw optimizer response, passed through to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimResponse {
    pub status_code: u16,
    /// Response body as text.
    pub content: String,
    /// Response body parsed as JSON, when it is JSON.
    #[serde(default)]
    pub data: Option<Value>,
}

/// Input for `POST /optim/recommend`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendInput {
    pub context: Value,
}

/// Input for `POST /optim/report`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportInput {
    pub context: Value,
    pub item: Value,
    pub score: Value,
}
