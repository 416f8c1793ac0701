//! Query construction and the Elasticsearch gateway.

pub mod gateway;
pub mod query;
pub mod survey;
