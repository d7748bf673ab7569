use std::sync::Arc;

use tracing::info;

use crate::ai::{HintProvider, HintService, OpenAiHintProvider};
use crate::config::{Config, WsSettings};
use crate::domain::WordCorpus;
use crate::error::AppError;
use crate::services::room_flow::RoomFlow;
use crate::services::rooms::RoomRegistry;
use crate::ws::hub::WsHub;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Live rooms and memberships
    pub registry: Arc<RoomRegistry>,
    /// Websocket sessions and room groups
    pub hub: Arc<WsHub>,
    /// Intent handling over `registry` and `hub`
    pub flow: Arc<RoomFlow>,
    pub hints: HintService,
    pub ws: WsSettings,
}

impl AppState {
    /// Wire a state around an existing registry and hint service.
    pub fn new(registry: Arc<RoomRegistry>, hints: HintService, ws: WsSettings) -> Self {
        let hub = Arc::new(WsHub::new());
        let flow = Arc::new(RoomFlow::new(registry.clone(), hub.clone()));
        Self {
            registry,
            hub,
            flow,
            hints,
            ws,
        }
    }

    /// Build the production state: load the corpus and set up the hint
    /// provider when a key is configured.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let corpus = match &config.words_path {
            Some(path) => WordCorpus::from_path(path).map_err(|err| {
                AppError::config(format!("Failed to load WORDS_PATH {}: {err}", path.display()))
            })?,
            None => WordCorpus::embedded()
                .map_err(|err| AppError::config(format!("Embedded word corpus invalid: {err}")))?,
        };
        info!(
            domains = corpus.domains().len(),
            entries = corpus.entry_count(),
            "word corpus loaded"
        );

        let provider: Option<Arc<dyn HintProvider>> = match &config.hints.api_key {
            Some(key) => {
                let client = reqwest::Client::builder()
                    .timeout(config.hints.timeout)
                    .build()
                    .map_err(|err| AppError::config(format!("Failed to build HTTP client: {err}")))?;
                let provider: Arc<dyn HintProvider> = Arc::new(OpenAiHintProvider::new(
                    client,
                    config.hints.api_url.clone(),
                    key.clone(),
                    config.hints.model.clone(),
                ));
                Some(provider)
            }
            None => {
                info!("no hint API key configured; hints use the fallback text");
                None
            }
        };

        let registry = Arc::new(RoomRegistry::new(Arc::new(corpus)));
        let hints = HintService::new(provider, config.hints.timeout);
        Ok(Self::new(registry, hints, config.ws))
    }

    /// Embedded corpus, hints disabled, default websocket timings.
    pub fn for_tests() -> Result<Self, AppError> {
        let corpus = WordCorpus::embedded()
            .map_err(|err| AppError::config(format!("Embedded word corpus invalid: {err}")))?;
        Ok(Self::new(
            Arc::new(RoomRegistry::new(Arc::new(corpus))),
            HintService::disabled(),
            WsSettings::default(),
        ))
    }
}
