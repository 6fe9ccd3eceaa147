use crate::config::FetchSettings;
use crate::fetcher::{
    backoff::calculate_backoff_delay,
    errors::{FetchError, is_retriable_status},
    pipeline::{RawResponse, process_response},
    types::PageResponse,
};
use bytes::{Bytes, BytesMut};
use reqwest::{
    Client, ClientBuilder, Response,
    header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use tracing::{debug, instrument, warn};
use url::Url;

const MAX_BODY_SIZE: u64 = 5 * 1024 * 1024; // 5MB
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36 titlecraft/0.1";

/// Build the HTTP client used for page fetches.
pub fn build_client(settings: &FetchSettings) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

    ClientBuilder::new()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.timeout)
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(10))
        .default_headers(headers)
        .build()
}

/// Validate that `url` is an absolute http(s) URL with a host.
pub fn parse_page_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url.trim())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(FetchError::InvalidUrl(format!(
            "unsupported scheme '{}'",
            parsed.scheme()
        )));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(FetchError::InvalidUrl("missing host".to_string()));
    }
    Ok(parsed)
}

/// Retrieves raw HTML with bounded retries. Holds no state between calls
/// beyond the connection pool inside the client.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    max_attempts: u32,
    base_backoff: std::time::Duration,
}

impl Fetcher {
    pub fn new(client: Client, settings: &FetchSettings) -> Self {
        Self {
            client,
            max_attempts: settings.max_attempts.max(1),
            base_backoff: settings.base_backoff,
        }
    }

    pub fn from_settings(settings: &FetchSettings) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_client(settings)?, settings))
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[instrument(skip_all, fields(url = %url))]
    pub async fn fetch(&self, url: &str) -> Result<PageResponse, FetchError> {
        let parsed_url = parse_page_url(url)?;

        let mut attempt = 1;
        loop {
            debug!(attempt, max_attempts = self.max_attempts, "fetching page");
            match self.fetch_once(&parsed_url).await {
                Ok(raw) => return Ok(process_response(raw, attempt)),
                Err(err) if !err.should_retry() => return Err(err),
                Err(err) if attempt >= self.max_attempts => {
                    warn!(attempts = attempt, error = %err, "giving up on page fetch");
                    return Err(FetchError::RetriesExhausted {
                        attempts: attempt,
                        last: Box::new(err),
                    });
                }
                Err(err) => {
                    let delay = calculate_backoff_delay(attempt - 1, self.base_backoff);
                    warn!(
                        attempt,
                        error = %err,
                        delay_ms = delay.as_millis() as u64,
                        "transient fetch failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn fetch_once(&self, url: &Url) -> Result<RawResponse, FetchError> {
        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(FetchError::from_reqwest_error)?;

        // Check content length before downloading
        if let Some(content_length) = response.content_length()
            && content_length > MAX_BODY_SIZE
        {
            return Err(FetchError::BodyTooLarge(content_length));
        }

        let final_url = response.url().clone();
        let status = response.status();
        let headers = response.headers().clone();

        if !status.is_success() {
            return Err(FetchError::Http {
                status,
                retriable: is_retriable_status(status),
            });
        }

        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        if !is_html_content_type(&content_type) {
            return Err(FetchError::UnsupportedContentType(content_type));
        }

        let body = read_body_limited(&mut response).await?;

        Ok(RawResponse {
            url_requested: url.clone(),
            url_final: final_url,
            status,
            headers,
            body,
            content_type,
        })
    }
}

/// MIME types are case-insensitive; parameters such as charset are ignored.
fn is_html_content_type(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.contains("text/html") || content_type.contains("application/xhtml")
}

/// Stream the body, stopping as soon as it passes `MAX_BODY_SIZE`.
/// Content-Length is absent for chunked and transparently decompressed bodies.
async fn read_body_limited(response: &mut Response) -> Result<Bytes, FetchError> {
    let mut body = BytesMut::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(FetchError::from_reqwest_error)?
    {
        let size = (body.len() + chunk.len()) as u64;
        if size > MAX_BODY_SIZE {
            return Err(FetchError::BodyTooLarge(size));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body.freeze())
}
