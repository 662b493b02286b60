//! Resilient HTTP client shared by every provider adapter
//!
//! Each upstream gets its own client with a proactive rate limiter, a
//! per-attempt timeout and a bounded retry on HTTP 429. The client never
//! returns an error: transport, timeout and parse failures become `None`,
//! non-2xx statuses become a failed [`FetchResponse`].

use super::retry_policy::RetryPolicy;
use crate::shared::{config::FetchSettings, utils::LogContext};
use governor::{DefaultDirectRateLimiter, Jitter, Quota, RateLimiter};
use reqwest::{Client, Method};
use serde_json::Value;
use std::num::NonZeroU32;
use std::time::{Duration, Instant};
use tokio::time::{sleep, timeout};

const USER_AGENT: &str = "miru-catalog/0.1 (+https://github.com/miru-catalog)";

/// Outcome of one logical upstream lookup
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    pub ok: bool,
    pub status: u16,
    pub json: Option<Value>,
}

impl FetchResponse {
    /// The JSON body of a successful response, if any
    pub fn into_ok_json(self) -> Option<Value> {
        if self.ok {
            self.json
        } else {
            None
        }
    }
}

/// HTTP client that handles rate limiting, timeouts and retries
pub struct RateLimitClient {
    client: Client,
    rate_limiter: DefaultDirectRateLimiter,
    retry_policy: RetryPolicy,
    user_agent: String,
    provider_name: String,
}

impl RateLimitClient {
    /// Client for the AniList GraphQL API (90 req/min, degraded to ~30)
    pub fn for_anilist(settings: &FetchSettings) -> Self {
        Self::for_provider("AniList", settings, 0.5, 3)
    }

    /// Client for the Jikan API (~60 req/min with a small burst)
    pub fn for_jikan(settings: &FetchSettings) -> Self {
        Self::for_provider("Jikan", settings, 1.0, 3)
    }

    /// Client for an arbitrary upstream with the given request budget
    pub fn for_provider(
        provider_name: &str,
        settings: &FetchSettings,
        requests_per_second: f64,
        burst_size: u32,
    ) -> Self {
        Self::new(
            provider_name,
            RetryPolicy::from_settings(settings),
            Self::create_rate_limiter(requests_per_second, burst_size),
            USER_AGENT.to_string(),
        )
    }

    /// Create a rate limiter with specified requests per second and burst capacity
    fn create_rate_limiter(requests_per_second: f64, burst_size: u32) -> DefaultDirectRateLimiter {
        let burst = NonZeroU32::new(burst_size.max(1)).unwrap_or(NonZeroU32::MIN);
        let period = Duration::from_secs_f64(1.0 / requests_per_second.max(0.001));
        let quota = Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst);

        RateLimiter::direct(quota)
    }

    /// Create a custom client
    pub fn new(
        provider_name: &str,
        retry_policy: RetryPolicy,
        rate_limiter: DefaultDirectRateLimiter,
        user_agent: String,
    ) -> Self {
        Self {
            client: Client::new(),
            rate_limiter,
            retry_policy,
            user_agent,
            provider_name: provider_name.to_string(),
        }
    }

    /// GET a JSON document
    pub async fn get_json(&self, url: &str) -> Option<FetchResponse> {
        self.fetch_json(Method::GET, url, None).await
    }

    /// POST a JSON body and read a JSON document back
    pub async fn post_json(&self, url: &str, body: &Value) -> Option<FetchResponse> {
        self.fetch_json(Method::POST, url, Some(body)).await
    }

    /// Perform one logical lookup: rate limit, timeout, retry on 429
    async fn fetch_json(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Option<FetchResponse> {
        let attempts = self.retry_policy.attempts();

        for attempt in 0..attempts {
            self.rate_limiter
                .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(25)))
                .await;

            LogContext::api_call(&self.provider_name, url, None, None);
            let started = Instant::now();

            let (status, text) =
                match timeout(self.retry_policy.timeout, self.send_once(&method, url, body)).await
                {
                    Ok(Ok(response)) => response,
                    Ok(Err(e)) => {
                        log::warn!("{} API request to {} failed: {}", self.provider_name, url, e);
                        return None;
                    }
                    Err(_) => {
                        log::warn!(
                            "{} API request to {} timed out after {:?}",
                            self.provider_name,
                            url,
                            self.retry_policy.timeout
                        );
                        return None;
                    }
                };

            LogContext::api_call(
                &self.provider_name,
                url,
                Some(status),
                Some(started.elapsed().as_millis() as u64),
            );

            if self.retry_policy.is_retryable_status(status) {
                if attempt + 1 < attempts {
                    log::warn!(
                        "{} API rate limited (attempt {}/{}). Waiting {:?} before retry.",
                        self.provider_name,
                        attempt + 1,
                        attempts,
                        self.retry_policy.backoff
                    );
                    sleep(self.retry_policy.backoff).await;
                    continue;
                }

                log::warn!(
                    "{} API rate limit exceeded after {} attempts",
                    self.provider_name,
                    attempts
                );
                return Some(FetchResponse {
                    ok: false,
                    status,
                    json: None,
                });
            }

            return self.parse_response(status, &text);
        }

        None
    }

    /// Build and send the actual HTTP request, reading the whole body
    async fn send_once(
        &self,
        method: &Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<(u16, String), reqwest::Error> {
        let mut request_builder = self
            .client
            .request(method.clone(), url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json");

        if let Some(json_body) = body {
            request_builder = request_builder.json(json_body);
        }

        let response = request_builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        Ok((status, text))
    }

    /// Turn a status and raw body into a fetch result
    fn parse_response(&self, status: u16, text: &str) -> Option<FetchResponse> {
        let ok = (200..300).contains(&status);

        if text.trim().is_empty() {
            return Some(FetchResponse {
                ok,
                status,
                json: None,
            });
        }

        match serde_json::from_str::<Value>(text) {
            Ok(json) => Some(FetchResponse {
                ok,
                status,
                json: Some(json),
            }),
            Err(e) if ok => {
                log::warn!(
                    "Failed to parse {} response: {}. Response: {}",
                    self.provider_name,
                    e,
                    text.chars().take(200).collect::<String>()
                );
                None
            }
            // Error pages are often HTML; the status is what matters
            Err(_) => Some(FetchResponse {
                ok,
                status,
                json: None,
            }),
        }
    }

    /// Check if a request can be made now (for testing/debugging)
    pub fn can_make_request_now(&self) -> bool {
        self.rate_limiter.check().is_ok()
    }

    /// Get provider name
    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }
}
