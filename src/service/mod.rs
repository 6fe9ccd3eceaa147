pub mod errors;

pub use errors::TitleError;

use std::num::NonZeroUsize;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::{
    config::{Config, PipelineSettings},
    extractor,
    fetcher::Fetcher,
    generator::{OpenAiCompatibleClient, TitleGenerator, TitleList, TitleRequest},
    truncate::truncate,
};

/// Upper bound on titles per request; keeps completion length bounded.
pub const MAX_TITLES: usize = 20;
pub const DEFAULT_TITLES: usize = 5;

/// Runs fetch → extract → truncate → generate for one URL. Holds no
/// per-request state, so one instance serves concurrent requests.
pub struct TitleService {
    fetcher: Fetcher,
    generator: TitleGenerator,
    pipeline: PipelineSettings,
    model_configured: bool,
}

impl TitleService {
    pub fn new(fetcher: Fetcher, generator: TitleGenerator, pipeline: PipelineSettings) -> Self {
        Self {
            fetcher,
            generator,
            pipeline,
            model_configured: true,
        }
    }

    /// Wire up the real HTTP fetcher and completion client.
    ///
    /// A missing API key is not an error here; it is reported as
    /// `ModelUnavailable` by the first request that needs the model.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let fetcher = Fetcher::from_settings(config.fetch())?;

        let llm = config.llm();
        let client = OpenAiCompatibleClient::from_settings(llm)?;
        let model_configured = client.has_api_key();
        if model_configured {
            info!(model = client.model(), base_url = %llm.base_url, "completion client ready");
        } else {
            warn!("no LLM API key configured; title generation will report ModelUnavailable");
        }

        let generator = TitleGenerator::new(Arc::new(client), llm.max_tokens, llm.temperature);

        Ok(Self {
            fetcher,
            generator,
            pipeline: config.pipeline(),
            model_configured,
        })
    }

    pub fn model_configured(&self) -> bool {
        self.model_configured
    }

    #[instrument(skip(self), fields(url = %url))]
    pub async fn generate_titles_from_url(
        &self,
        url: &str,
        num_titles: usize,
    ) -> Result<TitleList, TitleError> {
        let count = validate_title_count(num_titles)?;

        let page = self.fetcher.fetch(url).await?;
        info!(
            final_url = %page.url_final,
            status = page.status.as_u16(),
            attempts = page.attempts,
            bytes = page.body_raw.len(),
            "fetched page"
        );

        let content = extractor::extract(&page.body_utf8, self.pipeline.min_content_chars)?;

        let source_text = truncate(&content.text, self.pipeline.max_input_chars);
        debug!(
            extracted_chars = content.character_count,
            submitted_chars = source_text.chars().count(),
            "prepared model input"
        );

        let request = TitleRequest::new(source_text, count).with_language(content.language);
        let titles = self.generator.generate(&request).await?;

        info!(returned = titles.len(), requested = num_titles, "generated titles");
        Ok(titles)
    }
}

fn validate_title_count(num_titles: usize) -> Result<NonZeroUsize, TitleError> {
    NonZeroUsize::new(num_titles)
        .filter(|n| n.get() <= MAX_TITLES)
        .ok_or_else(|| {
            TitleError::InvalidRequest(format!(
                "numTitles must be between 1 and {MAX_TITLES}, got {num_titles}"
            ))
        })
}
