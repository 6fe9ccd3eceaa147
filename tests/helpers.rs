#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use async_trait::async_trait;
use titlecraft::{
    app_state::AppState,
    config::{FetchSettings, PipelineSettings},
    fetcher::Fetcher,
    generator::{CompletionClient, CompletionError, CompletionRequest, TitleGenerator},
    routes,
    service::TitleService,
};

pub const ARTICLE_HTML: &str = include_str!("../src/extractor/tests/fixtures/article.html");

/// Completion client that replays a fixed answer and records every prompt.
pub struct ScriptedClient {
    reply: Result<String, fn() -> CompletionError>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(make_error: fn() -> CompletionError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(make_error),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt.clone());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(make_error) => Err(make_error()),
        }
    }
}

/// Fetch settings tuned for tests: short timeouts and near-zero backoff.
pub fn fast_fetch_settings(max_attempts: u32) -> FetchSettings {
    FetchSettings {
        timeout: Duration::from_millis(300),
        connect_timeout: Duration::from_millis(300),
        max_attempts,
        base_backoff: Duration::from_millis(1),
    }
}

pub fn test_service(client: Arc<ScriptedClient>, fetch: FetchSettings) -> TitleService {
    let fetcher = Fetcher::from_settings(&fetch).expect("Failed to build fetcher");
    let generator = TitleGenerator::new(client, 256, 0.7);
    TitleService::new(fetcher, generator, PipelineSettings::default())
}

pub fn test_app(client: Arc<ScriptedClient>, fetch: FetchSettings) -> axum::Router {
    routes::router(AppState::new(test_service(client, fetch)), None)
}
