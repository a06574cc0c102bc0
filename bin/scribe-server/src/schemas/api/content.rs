use scribe_types::ContentType;
use serde::Serialize;
use utoipa::ToSchema;

/// Entry of the content-type picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ContentTypeOption {
    pub value: ContentType,
    pub label: String,
}

impl From<ContentType> for ContentTypeOption {
    fn from(value: ContentType) -> Self {
        Self { value, label: value.label().to_owned() }
    }
}
