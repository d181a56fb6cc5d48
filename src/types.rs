use serde::{Deserialize, Serialize};

/// Outcome tag of a [`ReaskedResponse`].
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// The `{status, data?, message?}` envelope every API response arrives in,
/// and the shape the FAQ calls return.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ReaskedResponse<T> {
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ReaskedResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            data: Some(data),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

/// Publication state of a group or FAQ.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    Draft,
    Published,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FaqTranslation {
    pub question: String,
    pub answer: String,
    pub lang: String,
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    pub id: String,
    pub status: PublicationStatus,
    /// Display order within the group
    pub position: i64,
    pub created_at: String,
    pub updated_at: String,
    pub translations: Vec<FaqTranslation>,
}

impl Faq {
    pub fn translation(&self, lang: &str) -> Option<&FaqTranslation> {
        self.translations.iter().find(|t| t.lang == lang)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FaqGroupTranslation {
    pub name: String,
    pub description: String,
    pub lang: String,
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A FAQ group with its translations and FAQs, as returned by the API.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FaqGroup {
    pub id: String,
    pub status: PublicationStatus,
    pub created_at: String,
    pub updated_at: String,
    pub translations: Vec<FaqGroupTranslation>,
    pub faqs: Vec<Faq>,
}

impl FaqGroup {
    pub fn translation(&self, lang: &str) -> Option<&FaqGroupTranslation> {
        self.translations.iter().find(|t| t.lang == lang)
    }

    /// FAQs sorted by `position`; ties keep the order the API sent.
    pub fn faqs_in_order(&self) -> Vec<&Faq> {
        let mut faqs: Vec<&Faq> = self.faqs.iter().collect();
        faqs.sort_by_key(|faq| faq.position);
        faqs
    }
}

/// Status filter accepted by the FAQ group endpoints.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    All,
    Draft,
    Published,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Draft => "draft",
            StatusFilter::Published => "published",
        }
    }
}

/// Optional filters for the FAQ group endpoints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaqGroupQuery {
    pub status: Option<StatusFilter>,
    pub langs: Option<Vec<String>>,
}

impl FaqGroupQuery {
    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_langs<I, S>(mut self, langs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.langs = Some(langs.into_iter().map(Into::into).collect());
        self
    }

    /// Form-encoded query string without the leading `?`, or `None` when no
    /// filter is set.
    pub fn to_query_string(&self) -> Option<String> {
        if self.status.is_none() && self.langs.is_none() {
            return None;
        }

        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        if let Some(status) = self.status {
            serializer.append_pair("status", status.as_str());
        }
        if let Some(langs) = &self.langs {
            serializer.append_pair("langs", &langs.join(","));
        }
        Some(serializer.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUP_JSON: &str = r#"{
        "id": "g1",
        "status": "published",
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-02T00:00:00Z",
        "translations": [
            {"name": "Billing", "description": "Payments", "lang": "en", "id": "gt1",
             "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"},
            {"name": "Facturation", "description": "Paiements", "lang": "fr", "id": "gt2",
             "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"}
        ],
        "faqs": [
            {"id": "f2", "status": "published", "position": 2,
             "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z",
             "translations": []},
            {"id": "f1", "status": "draft", "position": 1,
             "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z",
             "translations": [
                {"question": "How do I pay?", "answer": "By card.", "lang": "en", "id": "ft1",
                 "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"}
             ]}
        ]
    }"#;

    #[test]
    fn test_parse_faq_group() {
        let group: FaqGroup = serde_json::from_str(GROUP_JSON).unwrap();
        assert_eq!(group.id, "g1");
        assert_eq!(group.status, PublicationStatus::Published);
        assert_eq!(group.updated_at, "2024-01-02T00:00:00Z");
        assert_eq!(group.faqs.len(), 2);
        assert_eq!(group.faqs[1].status, PublicationStatus::Draft);
        assert_eq!(
            group.faqs[1].translation("en").map(|t| t.answer.as_str()),
            Some("By card.")
        );
        assert!(group.faqs[1].translation("de").is_none());
    }

    #[test]
    fn test_group_translation_lookup() {
        let group: FaqGroup = serde_json::from_str(GROUP_JSON).unwrap();
        assert_eq!(
            group.translation("fr").map(|t| t.name.as_str()),
            Some("Facturation")
        );
    }

    #[test]
    fn test_faqs_in_order() {
        let group: FaqGroup = serde_json::from_str(GROUP_JSON).unwrap();
        let ids: Vec<&str> = group.faqs_in_order().iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["f1", "f2"]);
    }

    #[test]
    fn test_response_envelope_parsing() {
        let response: ReaskedResponse<serde_json::Value> =
            serde_json::from_str(r#"{"status": "error", "message": "group not found"}"#).unwrap();
        assert_eq!(response.status, ResponseStatus::Error);
        assert!(response.data.is_none());
        assert_eq!(response.message.as_deref(), Some("group not found"));
        assert!(!response.is_success());
    }

    #[test]
    fn test_response_envelope_serialization_omits_absent_fields() {
        let response: ReaskedResponse<()> = ReaskedResponse::error("boom");
        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"status":"error","message":"boom"}"#
        );
        let response = ReaskedResponse::success(1);
        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"status":"success","data":1}"#
        );
    }

    #[test]
    fn test_query_string_empty() {
        assert_eq!(FaqGroupQuery::default().to_query_string(), None);
    }

    #[test]
    fn test_query_string_status_and_langs() {
        let query = FaqGroupQuery::default()
            .with_status(StatusFilter::Published)
            .with_langs(["en", "fr"]);
        assert_eq!(
            query.to_query_string().as_deref(),
            Some("status=published&langs=en%2Cfr")
        );
    }

    #[test]
    fn test_query_string_langs_only() {
        let query = FaqGroupQuery::default().with_langs(["pt-BR"]);
        assert_eq!(query.to_query_string().as_deref(), Some("langs=pt-BR"));
    }

    #[test]
    fn test_query_string_status_only() {
        let query = FaqGroupQuery::default().with_status(StatusFilter::All);
        assert_eq!(query.to_query_string().as_deref(), Some("status=all"));
    }
}
