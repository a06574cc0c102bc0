use scribe_types::ContentType;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitMessageRequest {
    pub message: String,
    /// Event summary to pin as context for this message.
    #[serde(default)]
    pub summary_file_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeRequest {
    pub content_type: ContentType,
}
