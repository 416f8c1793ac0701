use std::sync::Arc;

use crate::codes::NteeCodebook;
use crate::config::Config;
use crate::search::gateway::SearchGateway;

/// Shared application state. Everything here is read-only after start-up.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub gateway: SearchGateway,
    pub ntee: Arc<NteeCodebook>,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        // Unreachable cluster is fatal
        let gateway = SearchGateway::connect(&config.elastic).await?;

        let ntee = match NteeCodebook::load(&config.ntee_codebook) {
            Ok(book) => {
                tracing::info!("Loaded {} NTEE codes", book.len());
                book
            }
            Err(e) => {
                tracing::warn!("NTEE codebook unavailable, code titles disabled: {e:#}");
                NteeCodebook::default()
            }
        };

        Ok(Self::with_parts(config, gateway, ntee))
    }

    pub fn with_parts(config: Config, gateway: SearchGateway, ntee: NteeCodebook) -> Self {
        Self {
            config,
            gateway,
            ntee: Arc::new(ntee),
        }
    }

    /// Index holding organization documents.
    pub fn index(&self) -> &str {
        &self.config.elastic.index
    }
}
