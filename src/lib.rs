//! Client SDK for the Reasked FAQ API.
//!
//! [`Reasked`] is the entry point. It wraps an [`HttpClient`], which runs
//! every call with a per-attempt timeout and exponential-backoff retries, and
//! a [`FaqService`] that turns FAQ group lookups into [`ReaskedResponse`]
//! envelopes.

pub mod config;
pub mod error;
pub mod faq;
pub mod http;
mod reasked;
pub mod types;

pub use config::{ClientConfig, ClientOptions, RequestOptions};
pub use error::ClientError;
pub use faq::FaqService;
pub use http::{
    HttpClient, HttpMethod, HttpRequest, LogObserver, NoopObserver, RequestEvent,
    RequestObserver, Transport,
};
pub use reasked::Reasked;
pub use types::{
    Faq, FaqGroup, FaqGroupQuery, FaqGroupTranslation, FaqTranslation, PublicationStatus,
    ReaskedResponse, ResponseStatus, StatusFilter,
};
