//! HTTP transport with per-attempt timeouts, retries and exponential backoff.

mod client;
mod observer;
mod request;
mod retry;
mod transport;

pub use client::HttpClient;
pub use observer::{LogObserver, NoopObserver, RequestEvent, RequestObserver};
pub use request::{HttpMethod, HttpRequest, PreparedRequest, RawResponse};
pub use retry::{AttemptOutcome, BACKOFF_BASE_MS, RetryPolicy, Step, backoff_delay};
pub use transport::{ReqwestTransport, Transport};

