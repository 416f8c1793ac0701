//! Structured search query and its rendering to the Elasticsearch query DSL.

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

/// A single query clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Exact keyword match
    Term { field: String, value: String },
    /// Keyword starts with `value`
    Prefix { field: String, value: String },
    /// Numeric range, `gte <= field < lt`; either bound may be open
    Range {
        field: String,
        gte: Option<i64>,
        lt: Option<i64>,
    },
    /// Analyzed full-text match, optionally boosted
    Match {
        field: String,
        query: String,
        boost: Option<f32>,
    },
    /// At least `minimum_should_match` of the inner clauses must match
    AnyOf {
        clauses: Vec<Clause>,
        minimum_should_match: u32,
    },
}

fn keyed(key: &str, inner: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), inner);
    Value::Object(map)
}

impl Clause {
    pub fn term(field: &str, value: impl Into<String>) -> Self {
        Clause::Term {
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub fn prefix(field: &str, value: impl Into<String>) -> Self {
        Clause::Prefix {
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub fn range(field: &str, gte: Option<i64>, lt: Option<i64>) -> Self {
        Clause::Range {
            field: field.to_string(),
            gte,
            lt,
        }
    }

    pub fn boosted_match(field: &str, query: impl Into<String>, boost: f32) -> Self {
        Clause::Match {
            field: field.to_string(),
            query: query.into(),
            boost: Some(boost),
        }
    }

    pub fn any_of(clauses: Vec<Clause>) -> Self {
        Clause::AnyOf {
            clauses,
            minimum_should_match: 1,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Clause::Term { field, value } => keyed("term", keyed(field, json!(value))),
            Clause::Prefix { field, value } => keyed("prefix", keyed(field, json!(value))),
            Clause::Range { field, gte, lt } => {
                let mut bounds = Map::new();
                if let Some(gte) = gte {
                    bounds.insert("gte".to_string(), json!(gte));
                }
                if let Some(lt) = lt {
                    bounds.insert("lt".to_string(), json!(lt));
                }
                keyed("range", keyed(field, Value::Object(bounds)))
            }
            Clause::Match {
                field,
                query,
                boost: None,
            } => keyed("match", keyed(field, json!(query))),
            Clause::Match {
                field,
                query,
                boost: Some(boost),
            } => keyed(
                "match",
                keyed(field, json!({ "query": query, "boost": boost })),
            ),
            Clause::AnyOf {
                clauses,
                minimum_should_match,
            } => json!({
                "bool": {
                    "should": clauses.iter().map(Clause::to_json).collect::<Vec<_>>(),
                    "minimum_should_match": minimum_should_match,
                }
            }),
        }
    }
}

/// A search request: non-scoring filters, optional scoring clauses, pagination.
///
/// With no filters and no optional clauses the query matches every document.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// All must match; they restrict membership without affecting score
    pub filter: Vec<Clause>,
    /// Optional; each match raises the score, non-matches are still returned
    pub should: Vec<Clause>,
    pub from: usize,
    pub size: usize,
}

impl SearchQuery {
    pub fn new(size: usize) -> Self {
        Self {
            filter: Vec::new(),
            should: Vec::new(),
            from: 0,
            size,
        }
    }

    pub fn is_match_all(&self) -> bool {
        self.filter.is_empty() && self.should.is_empty()
    }

    /// Render the full request body (`query`, `size`, and `from` when non-zero).
    pub fn to_json(&self) -> Value {
        let query = if self.is_match_all() {
            json!({ "match_all": {} })
        } else {
            let mut bool_query = Map::new();
            if !self.filter.is_empty() {
                bool_query.insert(
                    "filter".to_string(),
                    Value::Array(self.filter.iter().map(Clause::to_json).collect()),
                );
            }
            if !self.should.is_empty() {
                bool_query.insert(
                    "should".to_string(),
                    Value::Array(self.should.iter().map(Clause::to_json).collect()),
                );
                // A bool query with only should clauses would otherwise require one to match.
                bool_query.insert("minimum_should_match".to_string(), json!(0));
            }
            keyed("bool", Value::Object(bool_query))
        };

        let mut body = Map::new();
        body.insert("query".to_string(), query);
        if self.from > 0 {
            body.insert("from".to_string(), json!(self.from));
        }
        body.insert("size".to_string(), json!(self.size));
        Value::Object(body)
    }
}

impl Serialize for SearchQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
