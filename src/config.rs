use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,
    /// Elasticsearch connection settings
    pub elastic: ElasticConfig,
    /// Path to the NTEE codebook JSON file
    pub ntee_codebook: PathBuf,
}

/// Connection settings for the Elasticsearch cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElasticConfig {
    /// Base URL of the cluster (e.g. "http://localhost:9200")
    pub host: String,
    /// Basic-auth username
    pub username: String,
    /// Basic-auth password
    #[serde(skip_serializing)]
    pub password: String,
    /// Index holding organization documents
    pub index: String,
}

impl Default for ElasticConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost:9200".to_string(),
            username: "elastic".to_string(),
            password: "password".to_string(),
            index: "nonprofits".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".to_string(),
            elastic: ElasticConfig::default(),
            ntee_codebook: PathBuf::from("data/ntee_codes.json"),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("NONPROFIT_SEARCH_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(path) = std::env::var("NTEE_CODEBOOK_PATH") {
            config.ntee_codebook = PathBuf::from(path);
        }

        // Elasticsearch
        if let Ok(host) = std::env::var("ELASTIC_HOST") {
            config.elastic.host = host;
        }
        if let Ok(user) = std::env::var("ELASTIC_USERNAME") {
            config.elastic.username = user;
        }
        if let Ok(password) = std::env::var("ELASTIC_PASSWORD") {
            config.elastic.password = password;
        }
        if let Ok(index) = std::env::var("ELASTIC_INDEX") {
            config.elastic.index = index;
        }

        config
    }
}
