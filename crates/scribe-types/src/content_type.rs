//! Content-type tags.
//!
//! The UI and the session store speak kebab-case tags (`blog-post`), the
//! backend chat service speaks snake_case (`blog_post`). Tags that are not
//! recognised pass through both mappings untouched.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use utoipa::ToSchema;

/// Writing style / output template requested by the user.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    ToSchema,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ContentType {
    Newsletter,
    BlogPost,
    DonorEmail,
    SocialMedia,
    #[default]
    General,
}

impl ContentType {
    /// Human readable label shown in the content-type picker.
    pub fn label(self) -> &'static str {
        match self {
            ContentType::Newsletter => "Newsletter",
            ContentType::BlogPost => "Blog Post",
            ContentType::DonorEmail => "Donor Email",
            ContentType::SocialMedia => "Social Media",
            ContentType::General => "General",
        }
    }

    /// Tag understood by the backend chat service.
    pub fn backend_tag(self) -> &'static str {
        match self {
            ContentType::Newsletter => "newsletter",
            ContentType::BlogPost => "blog_post",
            ContentType::DonorEmail => "donor_email",
            ContentType::SocialMedia => "social_media",
            ContentType::General => "general",
        }
    }

    pub fn from_backend_tag(tag: &str) -> Option<Self> {
        ContentType::iter().find(|ct| ct.backend_tag() == tag)
    }

    /// Parse a frontend tag, falling back to [`ContentType::General`].
    pub fn parse_lenient(tag: &str) -> Self {
        tag.parse().unwrap_or_default()
    }
}

/// Map a frontend (kebab-case) tag to the backend tag.
pub fn to_backend_content_type(tag: &str) -> String {
    match tag.parse::<ContentType>() {
        Ok(ct) => ct.backend_tag().to_owned(),
        Err(_) => tag.to_owned(),
    }
}

/// Map a backend (snake_case) tag to the frontend tag.
pub fn to_frontend_content_type(tag: &str) -> String {
    match ContentType::from_backend_tag(tag) {
        Some(ct) => ct.to_string(),
        None => tag.to_owned(),
    }
}
