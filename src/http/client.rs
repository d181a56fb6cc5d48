//! HTTP client with per-attempt deadlines, retries and exponential backoff.

use std::sync::Arc;

use log::debug;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::time;

use super::observer::{LogObserver, NoopObserver, RequestEvent, RequestObserver};
use super::request::{HttpMethod, HttpRequest, PreparedRequest, RawResponse};
use super::retry::{AttemptOutcome, RetryPolicy, Step};
use super::transport::{ReqwestTransport, Transport};
use crate::config::{ClientConfig, ClientOptions, RequestOptions, mask_api_key};
use crate::error::ClientError;

const USER_AGENT: &str = concat!("reasked-rust/", env!("CARGO_PKG_VERSION"));

/// Client for the Reasked API. Every call goes through [`HttpClient::request`].
///
/// Cloning is cheap and clones share the transport and observer. Calls made
/// concurrently on one client are independent of each other.
#[derive(Clone)]
pub struct HttpClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    observer: Arc<dyn RequestObserver>,
}

impl HttpClient {
    /// Creates a client talking to the real API over reqwest.
    pub fn new(api_key: impl Into<String>, options: ClientOptions) -> Result<Self, ClientError> {
        let config = ClientConfig::new(api_key, options)?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                ClientError::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        debug!(
            "Using API key {} for {}",
            mask_api_key(config.api_key()),
            config.base_url()
        );

        Ok(Self::with_transport(config, Arc::new(ReqwestTransport::new(client))))
    }

    /// Creates a client on top of an arbitrary transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let observer: Arc<dyn RequestObserver> = if config.debug() {
            Arc::new(LogObserver)
        } else {
            Arc::new(NoopObserver)
        };
        Self {
            config,
            transport,
            observer,
        }
    }

    /// Replaces the observer chosen from the `debug` flag.
    pub fn with_observer(mut self, observer: Arc<dyn RequestObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Performs one logical request against `base_url + endpoint` and decodes
    /// the JSON body as `T`.
    ///
    /// Each attempt runs under the effective timeout. A timeout fails the call
    /// immediately; other failures are retried with 1s, 2s, 4s, ... between
    /// attempts until the retry budget is spent.
    #[tracing::instrument(skip(self, request, options), fields(method = %request.method))]
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: HttpRequest,
        options: Option<&RequestOptions>,
    ) -> Result<T, ClientError> {
        let timeout = match options.and_then(|o| o.timeout) {
            Some(0) => {
                return Err(ClientError::Configuration(
                    "Timeout must be greater than zero".to_string(),
                ));
            }
            Some(ms) => time::Duration::from_millis(ms),
            None => self.config.timeout(),
        };
        let timeout_ms = timeout.as_millis() as u64;
        let policy = RetryPolicy::new(
            options
                .and_then(|o| o.retries)
                .unwrap_or(self.config.max_retries()),
        );

        let prepared = self.prepare(endpoint, request, options)?;

        self.emit(RequestEvent::RequestStarted {
            method: prepared.method,
            url: prepared.url.clone(),
            timeout_ms,
            retries: policy.max_retries(),
        });

        let mut attempt: u32 = 0;
        loop {
            self.emit(RequestEvent::AttemptStarted {
                attempt: attempt + 1,
                total: policy.total_attempts(),
            });

            // Dropping the attempt future on expiry aborts the in-flight call.
            let result = match time::timeout(timeout, self.attempt::<T>(&prepared)).await {
                Ok(result) => result,
                Err(_) => Err(ClientError::Timeout { timeout_ms }),
            };

            match policy.next_step(attempt, AttemptOutcome::from(result)) {
                Step::Done(Ok(value)) => {
                    self.emit(RequestEvent::Succeeded {
                        attempts: attempt + 1,
                    });
                    return Ok(value);
                }
                Step::Done(Err(err)) => {
                    match &err {
                        ClientError::Timeout { timeout_ms } => {
                            self.emit(RequestEvent::TimedOut {
                                timeout_ms: *timeout_ms,
                            });
                        }
                        err if err.is_retryable() => {
                            self.emit(RequestEvent::AttemptFailed {
                                attempt: attempt + 1,
                                error: err.to_string(),
                            });
                            self.emit(RequestEvent::RetriesExhausted {
                                attempts: attempt + 1,
                            });
                        }
                        err => {
                            self.emit(RequestEvent::AttemptFailed {
                                attempt: attempt + 1,
                                error: err.to_string(),
                            });
                        }
                    }
                    return Err(err);
                }
                Step::Retry { error, delay } => {
                    self.emit(RequestEvent::AttemptFailed {
                        attempt: attempt + 1,
                        error: error.to_string(),
                    });
                    self.emit(RequestEvent::BackingOff {
                        delay_ms: delay.as_millis() as u64,
                    });
                    time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: Option<&RequestOptions>,
    ) -> Result<T, ClientError> {
        self.request(endpoint, HttpRequest::new(HttpMethod::Get), options)
            .await
    }

    pub async fn post<T, B>(
        &self,
        endpoint: &str,
        data: Option<&B>,
        options: Option<&RequestOptions>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = with_json_body(HttpMethod::Post, data)?;
        self.request(endpoint, request, options).await
    }

    pub async fn put<T, B>(
        &self,
        endpoint: &str,
        data: Option<&B>,
        options: Option<&RequestOptions>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = with_json_body(HttpMethod::Put, data)?;
        self.request(endpoint, request, options).await
    }

    pub async fn patch<T, B>(
        &self,
        endpoint: &str,
        data: Option<&B>,
        options: Option<&RequestOptions>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = with_json_body(HttpMethod::Patch, data)?;
        self.request(endpoint, request, options).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: Option<&RequestOptions>,
    ) -> Result<T, ClientError> {
        self.request(endpoint, HttpRequest::new(HttpMethod::Delete), options)
            .await
    }

    /// Single attempt without deadline or retry.
    async fn attempt<T: DeserializeOwned>(
        &self,
        request: &PreparedRequest,
    ) -> Result<T, ClientError> {
        let response = self
            .transport
            .send(request)
            .await
            .map_err(ClientError::Transport)?;

        self.emit(RequestEvent::ResponseReceived {
            status: response.status,
            reason: response.reason.clone(),
        });

        if !response.is_success() {
            return Err(error_from_response(&response));
        }

        serde_json::from_str(&response.body).map_err(ClientError::Decode)
    }

    fn prepare(
        &self,
        endpoint: &str,
        request: HttpRequest,
        options: Option<&RequestOptions>,
    ) -> Result<PreparedRequest, ClientError> {
        let mut headers = HeaderMap::new();

        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", self.config.api_key()))
            .map_err(|_| {
                ClientError::Configuration("API key contains invalid header characters".to_string())
            })?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let overrides = request
            .headers
            .iter()
            .chain(options.into_iter().flat_map(|o| o.headers.iter()));
        for (name, value) in overrides {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                ClientError::Configuration(format!("Invalid header name: {}", name))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|_| {
                ClientError::Configuration(format!("Invalid value for header {}", name))
            })?;
            headers.insert(header_name, header_value);
        }

        Ok(PreparedRequest {
            method: request.method,
            url: format!("{}{}", self.config.base_url(), endpoint),
            headers,
            body: request.body,
        })
    }

    fn emit(&self, event: RequestEvent) {
        self.observer.on_event(&event);
    }
}

fn with_json_body<B: Serialize + ?Sized>(
    method: HttpMethod,
    data: Option<&B>,
) -> Result<HttpRequest, ClientError> {
    let request = HttpRequest::new(method);
    match data {
        Some(data) => {
            let body = serde_json::to_string(data).map_err(ClientError::Serialize)?;
            Ok(request.with_body(body))
        }
        None => Ok(request),
    }
}

/// Builds the error for a non-2xx response, preferring the body's `message`.
fn error_from_response(response: &RawResponse) -> ClientError {
    let message = serde_json::from_str::<serde_json::Value>(&response.body)
        .ok()
        .and_then(|body| {
            body.get("message")
                .and_then(serde_json::Value::as_str)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            format!(
                "API request failed: {} {}",
                response.status, response.reason
            )
        });

    ClientError::Http {
        status: response.status,
        message,
    }
}
