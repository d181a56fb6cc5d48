//! Instrumentation hooks for the request loop.
//!
//! The client reports what it is doing through a [`RequestObserver`]. With
//! `debug` enabled the default sink is [`LogObserver`], which writes
//! `[Reasked Debug]` lines through `log`. Observers never influence the
//! request outcome.

use log::{debug, warn};

use super::request::HttpMethod;

/// A decision point in the life of one logical request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestEvent {
    RequestStarted {
        method: HttpMethod,
        url: String,
        timeout_ms: u64,
        retries: u32,
    },
    AttemptStarted {
        attempt: u32,
        total: u32,
    },
    ResponseReceived {
        status: u16,
        reason: String,
    },
    AttemptFailed {
        attempt: u32,
        error: String,
    },
    BackingOff {
        delay_ms: u64,
    },
    TimedOut {
        timeout_ms: u64,
    },
    RetriesExhausted {
        attempts: u32,
    },
    Succeeded {
        attempts: u32,
    },
}

impl std::fmt::Display for RequestEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestEvent::RequestStarted {
                method,
                url,
                timeout_ms,
                retries,
            } => write!(
                f,
                "Making {} request to: {} (timeout: {}ms, retries: {})",
                method, url, timeout_ms, retries
            ),
            RequestEvent::AttemptStarted { attempt, total } => {
                write!(f, "Attempt {}/{}", attempt, total)
            }
            RequestEvent::ResponseReceived { status, reason } => {
                write!(f, "Response status: {} {}", status, reason)
            }
            RequestEvent::AttemptFailed { attempt, error } => {
                write!(f, "Attempt {} failed: {}", attempt, error)
            }
            RequestEvent::BackingOff { delay_ms } => {
                write!(f, "Waiting {}ms before retry", delay_ms)
            }
            RequestEvent::TimedOut { timeout_ms } => {
                write!(f, "Request timeout after {}ms", timeout_ms)
            }
            RequestEvent::RetriesExhausted { attempts } => {
                write!(f, "All {} attempts failed", attempts)
            }
            RequestEvent::Succeeded { attempts } => {
                write!(f, "Request successful after {} attempt(s)", attempts)
            }
        }
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait RequestObserver: Send + Sync {
    fn on_event(&self, event: &RequestEvent);
}

/// Writes every event as a `[Reasked Debug]` log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl RequestObserver for LogObserver {
    fn on_event(&self, event: &RequestEvent) {
        match event {
            RequestEvent::AttemptFailed { .. } | RequestEvent::TimedOut { .. } => {
                warn!("[Reasked Debug] {}", event)
            }
            _ => debug!("[Reasked Debug] {}", event),
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RequestObserver for NoopObserver {
    fn on_event(&self, _event: &RequestEvent) {}
}
