//! FAQ group lookups.
//!
//! Both lookups fold every failure (error envelopes, empty payloads and
//! transport errors) into a [`ReaskedResponse`] with `status: error`, so
//! callers never see an `Err`.

use log::debug;
use serde_json::Value;

use crate::http::HttpClient;
use crate::types::{FaqGroup, FaqGroupQuery, ReaskedResponse, ResponseStatus};

pub const NO_DATA_MESSAGE: &str = "No data returned from the API";
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

#[derive(Clone)]
pub struct FaqService {
    client: HttpClient,
}

impl FaqService {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Fetches a FAQ group by its slug.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_faq_group_by_slug(
        &self,
        slug: &str,
        query: Option<&FaqGroupQuery>,
    ) -> ReaskedResponse<FaqGroup> {
        let endpoint = with_query(format!("/faq-groups/slug/{}", slug), query);
        debug!("[slug={}] Constructed endpoint: {}", slug, endpoint);
        self.fetch_group(&endpoint).await
    }

    /// Fetches a FAQ group by its id.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_faq_group_by_id(
        &self,
        id: &str,
        query: Option<&FaqGroupQuery>,
    ) -> ReaskedResponse<FaqGroup> {
        let endpoint = with_query(format!("/faq-groups/{}", id), query);
        debug!("[id={}] Constructed endpoint: {}", id, endpoint);
        self.fetch_group(&endpoint).await
    }

    async fn fetch_group(&self, endpoint: &str) -> ReaskedResponse<FaqGroup> {
        match self
            .client
            .get::<ReaskedResponse<Value>>(endpoint, None)
            .await
        {
            Ok(response) => normalize(response),
            Err(err) => {
                debug!("Request to {} failed: {}", endpoint, err);
                let message = err.to_string();
                if message.is_empty() {
                    ReaskedResponse::error(UNKNOWN_ERROR_MESSAGE)
                } else {
                    ReaskedResponse::error(message)
                }
            }
        }
    }
}

fn with_query(path: String, query: Option<&FaqGroupQuery>) -> String {
    match query.and_then(FaqGroupQuery::to_query_string) {
        Some(qs) => format!("{}?{}", path, qs),
        None => path,
    }
}

fn normalize(response: ReaskedResponse<Value>) -> ReaskedResponse<FaqGroup> {
    if response.status == ResponseStatus::Error {
        debug!("API returned error: {:?}", response.message);
        return ReaskedResponse {
            status: ResponseStatus::Error,
            data: None,
            message: response.message,
        };
    }

    let data = match response.data {
        Some(data) if !is_empty_payload(&data) => data,
        _ => {
            debug!("No data returned from API");
            return ReaskedResponse::error(NO_DATA_MESSAGE);
        }
    };

    match serde_json::from_value::<FaqGroup>(data) {
        Ok(group) => {
            debug!(
                "Retrieved FAQ group {} with {} FAQs",
                group.id,
                group.faqs.len()
            );
            ReaskedResponse {
                status: ResponseStatus::Success,
                data: Some(group),
                message: response.message,
            }
        }
        Err(err) => ReaskedResponse::error(format!("Failed to parse FAQ group: {}", err)),
    }
}

fn is_empty_payload(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
