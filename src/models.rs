use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A raw row from the exempt-organizations extract, column name -> cell text.
pub type RawRow = BTreeMap<String, String>;

/// A normalized organization document as stored in the index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganizationRecord {
    pub ein: String,
    pub name: String,
    pub city: String,
    pub state: String,
    pub ntee: String,
    pub subsection: String,
    pub deductibility: String,
    /// Total assets in dollars, 0 when the extract value was missing or malformed
    pub asset_amt: i64,
    /// Ruling date as YYYYMM; absent (not zero) when unknown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ruling: Option<i32>,
    pub raw: RawRow,
    /// Human-readable code labels, present only on enriched documents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
}

/// One `{question, answer}` pair from the discovery survey.
///
/// Both fields are kept as loose JSON so that any client payload deserializes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyAnswer {
    #[serde(default)]
    pub question: Value,
    #[serde(default)]
    pub answer: Value,
}

impl SurveyAnswer {
    pub fn new(question: &str, answer: &str) -> Self {
        Self {
            question: Value::String(question.to_string()),
            answer: Value::String(answer.to_string()),
        }
    }

    /// Parse a single survey element; anything that isn't a `{question, answer}`
    /// object becomes an empty answer.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// Answer as text. Numbers and booleans are stringified; null, arrays and
    /// objects count as no answer.
    pub fn answer_text(&self) -> Option<String> {
        match &self.answer {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// Raw search request: an engine query body plus pagination.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    /// Engine request body, e.g. `{"query": {"match": {"city": "Columbus"}}}`
    #[serde(default)]
    pub query: Map<String, Value>,
    #[serde(default)]
    pub from: usize,
    #[serde(default = "default_size")]
    pub size: usize,
}

fn default_size() -> usize {
    10
}

impl SearchRequest {
    /// Full engine body with `from`/`size` applied.
    pub fn into_body(self) -> Value {
        let mut body = self.query;
        body.insert("from".to_string(), Value::from(self.from));
        body.insert("size".to_string(), Value::from(self.size));
        Value::Object(body)
    }
}

/// Survey response: the generated engine query and its hits
#[derive(Debug, Clone, Serialize)]
pub struct SurveyResponse {
    pub query: Value,
    pub results: Vec<Value>,
}

/// Bulk append request
#[derive(Debug, Clone, Deserialize)]
pub struct BulkRequest {
    pub organizations: Vec<Map<String, Value>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkResponse {
    pub added: usize,
    pub ids: Vec<String>,
}

/// Result of a single document write
#[derive(Debug, Clone, Serialize)]
pub struct DocumentResponse {
    pub id: String,
    pub result: String,
}

/// Body of `POST /indices/{name}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateIndexRequest {
    #[serde(default)]
    pub mappings: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexResponse {
    pub index: String,
    pub acknowledged: bool,
    pub existed: bool,
}

/// NTEE code lookup response
#[derive(Debug, Clone, Serialize)]
pub struct NteeCodeResponse {
    pub code: String,
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
}
