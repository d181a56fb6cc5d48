use crate::config::{ClientOptions, api_key_from_env};
use crate::error::ClientError;
use crate::faq::FaqService;
use crate::http::HttpClient;
use crate::types::{FaqGroup, FaqGroupQuery, ReaskedResponse};

/// Entry point of the SDK.
///
/// ```no_run
/// # async fn run() -> Result<(), reasked::ClientError> {
/// use reasked::{ClientOptions, FaqGroupQuery, Reasked, StatusFilter};
///
/// let reasked = Reasked::new("rk_live_key", ClientOptions::default())?;
/// let query = FaqGroupQuery::default()
///     .with_status(StatusFilter::Published)
///     .with_langs(["en"]);
/// let response = reasked.get_faq_group_by_slug("billing", Some(&query)).await;
/// if let Some(group) = response.data {
///     println!("{} FAQs", group.faqs.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Reasked {
    client: HttpClient,
    faqs: FaqService,
}

impl Reasked {
    pub fn new(api_key: impl Into<String>, options: ClientOptions) -> Result<Self, ClientError> {
        Ok(Self::from_client(HttpClient::new(api_key, options)?))
    }

    /// Builds a client from `REASKED_API_KEY` and the other `REASKED_*` variables.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(api_key_from_env()?, ClientOptions::from_env()?)
    }

    pub fn from_client(client: HttpClient) -> Self {
        let faqs = FaqService::new(client.clone());
        Self { client, faqs }
    }

    /// The underlying transport client, for endpoints without a typed wrapper.
    pub fn http(&self) -> &HttpClient {
        &self.client
    }

    pub fn faqs(&self) -> &FaqService {
        &self.faqs
    }

    pub async fn get_faq_group_by_slug(
        &self,
        slug: &str,
        query: Option<&FaqGroupQuery>,
    ) -> ReaskedResponse<FaqGroup> {
        self.faqs.get_faq_group_by_slug(slug, query).await
    }

    pub async fn get_faq_group_by_id(
        &self,
        id: &str,
        query: Option<&FaqGroupQuery>,
    ) -> ReaskedResponse<FaqGroup> {
        self.faqs.get_faq_group_by_id(id, query).await
    }
}
