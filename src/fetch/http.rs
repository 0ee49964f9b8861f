//! Thin async HTTP layer over reqwest.
//!
//! Handles timeouts, retry on 5xx and transport errors, and backoff on
//! 429. Status interpretation beyond the retry decision is left to the
//! caller.

use crate::error::FetchError;
use std::time::Duration;
use tracing::warn;

const MAX_RETRIES: u32 = 2;

/// Response from a GET request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

/// HTTP client for the fetcher.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(timeout_ms: u64) -> Self {
        let timeout = Duration::from_millis(timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("permitscope/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self { client, timeout }
    }

    /// GET `url` with query parameters, retrying on 5xx and transport
    /// errors with exponential backoff and honoring Retry-After on 429.
    ///
    /// Returns the final response whatever its status; only the retry
    /// decision looks at the code here.
    pub async fn get(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<HttpResponse, FetchError> {
        let mut retries = 0u32;

        loop {
            let resp = self
                .client
                .get(url)
                .query(params)
                .timeout(self.timeout)
                .send()
                .await;

            match resp {
                Ok(r) => {
                    let status = r.status().as_u16();

                    if status >= 500 && retries < MAX_RETRIES {
                        retries += 1;
                        warn!(status, retries, "server error, retrying");
                        tokio::time::sleep(backoff(retries)).await;
                        continue;
                    }

                    if status == 429 && retries < MAX_RETRIES {
                        retries += 1;
                        let retry_after = r
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|s| s.parse::<u64>().ok())
                            .unwrap_or(2);
                        warn!(retries, retry_after, "rate limited, backing off");
                        tokio::time::sleep(Duration::from_secs(retry_after.min(10))).await;
                        continue;
                    }

                    let body = r.text().await?;
                    return Ok(HttpResponse { status, body });
                }
                Err(e) => {
                    if retries < MAX_RETRIES {
                        retries += 1;
                        warn!(error = %e, retries, "transport error, retrying");
                        tokio::time::sleep(backoff(retries)).await;
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }
    }
}

fn backoff(retries: u32) -> Duration {
    Duration::from_millis(500 * 2u64.pow(retries - 1))
}
