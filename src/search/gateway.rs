//! Thin façade over the Elasticsearch REST API.
//!
//! Every method is a single request (or, for [`SearchGateway::bulk_append`], a
//! sequence of single requests). There is no retry, caching or partial-failure
//! reporting: the first failing request is returned as the error and anything
//! after it in the same call is not attempted.

use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::ElasticConfig;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Elasticsearch is not running at {host}")]
    Unreachable { host: String },
    #[error("invalid Elasticsearch host '{0}'")]
    InvalidHost(String),
    #[error("Elasticsearch returned {status}: {body}")]
    Engine { status: StatusCode, body: String },
    #[error("request to Elasticsearch failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected Elasticsearch response: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Outcome of [`SearchGateway::create_index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexCreation {
    Created,
    AlreadyExists,
}

/// Engine acknowledgement for a single document write.
#[derive(Debug, Clone, Deserialize)]
pub struct WriteResult {
    #[serde(rename = "_id")]
    pub id: String,
    /// "created", "updated", ...
    pub result: String,
}

/// Long-lived handle to one cluster. Cheap to share; holds no mutable state.
#[derive(Debug, Clone)]
pub struct SearchGateway {
    client: reqwest::Client,
    base_url: Url,
    username: String,
    password: String,
}

impl SearchGateway {
    /// Build a gateway and verify the cluster answers. Fails fast otherwise.
    pub async fn connect(config: &ElasticConfig) -> Result<Self> {
        let base_url =
            Url::parse(&config.host).map_err(|_| GatewayError::InvalidHost(config.host.clone()))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::InvalidHost(config.host.clone()));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()?;

        let gateway = Self {
            client,
            base_url,
            username: config.username.clone(),
            password: config.password.clone(),
        };

        if !gateway.ping().await {
            return Err(GatewayError::Unreachable {
                host: config.host.clone(),
            });
        }
        tracing::info!("Connected to Elasticsearch at {}", config.host);
        Ok(gateway)
    }

    /// True when the cluster root answers with a success status.
    pub async fn ping(&self) -> bool {
        match self.request(Method::HEAD, &[]).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::debug!("Elasticsearch ping failed: {e}");
                false
            }
        }
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.client
            .request(method, self.url(segments))
            .basic_auth(&self.username, Some(&self.password))
    }

    /// Send and decode a JSON response, turning non-success statuses into
    /// [`GatewayError::Engine`] with the engine's body untouched.
    async fn send_json<T: serde::de::DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GatewayError::Engine { status, body });
        }
        resp.json::<T>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }

    /// Send a request where some non-success statuses mean "nothing to do".
    /// Returns `false` when one of `ignore` came back.
    async fn send_ignoring(&self, req: RequestBuilder, ignore: &[StatusCode]) -> Result<bool> {
        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(true);
        }
        if ignore.contains(&status) {
            return Ok(false);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(GatewayError::Engine { status, body })
    }

    /// Cluster name, version and tagline.
    pub async fn info(&self) -> Result<Value> {
        self.send_json(self.request(Method::GET, &[])).await
    }

    pub async fn index_exists(&self, index: &str) -> Result<bool> {
        let resp = self.request(Method::HEAD, &[index]).send().await?;
        match resp.status() {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(GatewayError::Engine {
                status,
                body: String::new(),
            }),
        }
    }

    /// Create `index` unless it already exists. Never fails on a duplicate.
    pub async fn create_index(&self, index: &str, mappings: Option<&Value>) -> Result<IndexCreation> {
        if self.index_exists(index).await? {
            tracing::info!("Index '{index}' already exists.");
            return Ok(IndexCreation::AlreadyExists);
        }

        let body = match mappings {
            Some(m) => json!({ "mappings": m }),
            None => json!({}),
        };
        let _: Value = self
            .send_json(self.request(Method::PUT, &[index]).json(&body))
            .await?;
        tracing::info!("Index '{index}' created.");
        Ok(IndexCreation::Created)
    }

    /// Delete `index`. A missing index counts as success.
    pub async fn delete_index(&self, index: &str) -> Result<bool> {
        let deleted = self
            .send_ignoring(
                self.request(Method::DELETE, &[index]),
                &[StatusCode::BAD_REQUEST, StatusCode::NOT_FOUND],
            )
            .await?;
        tracing::info!("Index '{index}' deleted (if existed).");
        Ok(deleted)
    }

    /// Insert or replace the document stored under `id`.
    pub async fn upsert_document<T: Serialize + ?Sized>(
        &self,
        index: &str,
        id: &str,
        document: &T,
    ) -> Result<WriteResult> {
        let result: WriteResult = self
            .send_json(
                self.request(Method::PUT, &[index, "_doc", id])
                    .json(document),
            )
            .await?;
        tracing::debug!("Document {id} added/updated.");
        Ok(result)
    }

    /// Insert a document under an engine-assigned identifier.
    pub async fn append_document<T: Serialize + ?Sized>(
        &self,
        index: &str,
        document: &T,
    ) -> Result<WriteResult> {
        let result: WriteResult = self
            .send_json(self.request(Method::POST, &[index, "_doc"]).json(document))
            .await?;
        tracing::debug!("Document appended as {}.", result.id);
        Ok(result)
    }

    /// Append each document with its own request. Stops at the first failure;
    /// documents already written stay written.
    pub async fn bulk_append<T: Serialize>(&self, index: &str, documents: &[T]) -> Result<Vec<String>> {
        let mut ids = Vec::with_capacity(documents.len());
        for document in documents {
            ids.push(self.append_document(index, document).await?.id);
        }
        tracing::info!("{} documents added.", ids.len());
        Ok(ids)
    }

    /// Delete the document stored under `id`. A missing document counts as
    /// success; returns whether anything was actually removed.
    pub async fn delete_document(&self, index: &str, id: &str) -> Result<bool> {
        let deleted = self
            .send_ignoring(
                self.request(Method::DELETE, &[index, "_doc", id]),
                &[StatusCode::NOT_FOUND],
            )
            .await?;
        tracing::debug!("Document {id} deleted (if existed).");
        Ok(deleted)
    }

    /// Run a search and return the raw hits in engine relevance order.
    pub async fn search(&self, index: &str, body: &Value) -> Result<Vec<Value>> {
        let mut resp: Value = self
            .send_json(self.request(Method::POST, &[index, "_search"]).json(body))
            .await?;

        match resp.pointer_mut("/hits/hits").map(Value::take) {
            Some(Value::Array(hits)) => Ok(hits),
            _ => Err(GatewayError::Decode(
                "search response has no hits.hits array".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(host: &str) -> SearchGateway {
        SearchGateway {
            client: reqwest::Client::new(),
            base_url: Url::parse(host).unwrap(),
            username: "elastic".to_string(),
            password: "password".to_string(),
        }
    }

    #[test]
    fn test_url_joins_segments() {
        let gw = gateway("http://localhost:9200");
        assert_eq!(
            gw.url(&["nonprofits", "_doc", "010590897"]).as_str(),
            "http://localhost:9200/nonprofits/_doc/010590897"
        );
    }

    #[test]
    fn test_url_keeps_base_path_and_escapes_ids() {
        let gw = gateway("http://proxy.local/es/");
        assert_eq!(
            gw.url(&["nonprofits", "_doc", "a/b c"]).as_str(),
            "http://proxy.local/es/nonprofits/_doc/a%2Fb%20c"
        );
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_host() {
        let config = ElasticConfig {
            host: "not a url".to_string(),
            ..Default::default()
        };
        let err = SearchGateway::connect(&config).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidHost(_)));
    }

    #[test]
    fn test_engine_error_display_passes_body() {
        let err = GatewayError::Engine {
            status: StatusCode::BAD_REQUEST,
            body: r#"{"error":"parsing_exception"}"#.to_string(),
        };
        assert!(err.to_string().contains("parsing_exception"));
    }
}
