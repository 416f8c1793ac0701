//! # nonprofit-search
//!
//! Indexes IRS exempt-organization records into Elasticsearch and exposes HTTP
//! endpoints to manage and search them, including a discovery survey that is
//! translated into a structured query.
//!
//! ## Flow
//!
//! ```text
//!   CSV / JSON extract                       HTTP request
//!          │                                      │
//!          ▼                                      ▼
//!   ┌──────────────┐   code labels   ┌──────────────────────┐
//!   │  normalize   │◄────────────────│  codes (IRS + NTEE)  │
//!   └──────┬───────┘                 └──────────────────────┘
//!          │                                      │
//!          │                         ┌────────────┴─────────┐
//!          │                         │  survey translator   │
//!          │                         │  filters + boosts    │
//!          │                         └────────────┬─────────┘
//!          ▼                                      ▼
//!   ┌──────────────────────────────────────────────────────┐
//!   │           SearchGateway (Elasticsearch REST)         │
//!   └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for the server and cluster
//! - [`models`] - Organization record, survey answer, request/response types
//! - [`codes`] - Fixed IRS code tables and the NTEE codebook
//! - [`ingest`] - Row normalization, CSV/JSON readers and the ingestion loop
//! - [`search::query`] - Structured filter/should query rendered to the engine DSL
//! - [`search::survey`] - Survey answers to search query translation
//! - [`search::gateway`] - Elasticsearch index/document/search operations
//! - [`api`] - Axum HTTP handlers
//! - [`state`] - Shared application state

pub mod api;
pub mod codes;
pub mod config;
pub mod ingest;
pub mod models;
pub mod search;
pub mod state;
