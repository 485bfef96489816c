use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::language::Language;

/// Supporting-text record returned with an answer. Shape is up to the backend.
pub type EvidenceItem = Value;

/// Record found through graph retrieval. Shape is up to the backend.
pub type GraphHit = Value;

/// Body of `POST /qa/rag`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaRequest {
    pub question: String,
    pub lang: Language,
}

impl QaRequest {
    pub fn new(question: impl Into<String>, lang: Language) -> Self {
        Self {
            question: question.into(),
            lang,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QaResponse {
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub evidence: Vec<EvidenceItem>,
    #[serde(default)]
    pub graph_hits: Vec<GraphHit>,
}

impl QaResponse {
    /// Take the three consumed fields from a response body without validating it.
    ///
    /// Missing or `null` fields become empty. A non-string answer is kept as
    /// its JSON text; a non-array evidence or graph_hits value becomes a
    /// single opaque record.
    pub fn from_value(body: &Value) -> Self {
        Self {
            answer: match body.get("answer") {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
            },
            evidence: records(body.get("evidence")),
            graph_hits: records(body.get("graph_hits")),
        }
    }
}

fn records(field: Option<&Value>) -> Vec<Value> {
    match field {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(other) => vec![other.clone()],
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Health {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub service: String,
}

impl Health {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Body of `GET /qa/graph/neighbor`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Neighbors {
    #[serde(default)]
    pub entity_id: String,
    #[serde(default)]
    pub neighbors: Vec<GraphHit>,
}
