//! Read-only views over the organization's social platforms.
//!
//! Each client issues a short fixed sequence of dependent requests with no
//! fan-out; the first failing step aborts the whole aggregation.

mod meta;
mod youtube;

pub use meta::{
    FacebookOverview, InstagramOverview, MediaSummary, MetaGraphClient, MetaOverview,
    MetaSettings, PageSummary, PostSummary,
};
pub use youtube::{ChannelOverview, ChannelSummary, VideoSummary, YouTubeClient, YouTubeSettings};

use url::Url;

use crate::error::SocialError;

/// `{base}{path}?k=v&...`, with every value percent-encoded.
fn build_url(base: &str, path: &str, params: &[(&str, &str)]) -> Result<Url, SocialError> {
    let mut url = Url::parse(&format!("{}{path}", base.trim_end_matches('/')))?;
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }
    Ok(url)
}

/// Non-empty value of an optional setting.
fn setting(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
