//! YouTube Data API: channel statistics plus the most recent videos.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use utoipa::ToSchema;

use super::{build_url, setting};
use crate::error::SocialError;

const RECENT_VIDEOS: &str = "5";

#[derive(Debug, Clone)]
pub struct YouTubeSettings {
    pub api_key: Option<String>,
    pub channel_id: String,
    pub api_url: String,
}

impl YouTubeSettings {
    pub const DEFAULT_API_URL: &'static str = "https://www.googleapis.com/youtube/v3";
    pub const DEFAULT_CHANNEL_ID: &'static str = "UCIP4Ue0786TuKD2WZwzt9OQ";
}

impl Default for YouTubeSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            channel_id: Self::DEFAULT_CHANNEL_ID.to_owned(),
            api_url: Self::DEFAULT_API_URL.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChannelOverview {
    pub channel: ChannelSummary,
    pub videos: Vec<VideoSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSummary {
    pub name: String,
    pub thumbnail: String,
    pub subscriber_count: String,
    pub view_count: String,
    pub video_count: String,
    pub channel_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoSummary {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    pub view_count: String,
    pub like_count: String,
    pub comment_count: String,
    pub published_at: String,
    pub video_url: String,
}

#[derive(Deserialize)]
struct ItemList<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Deserialize, Default)]
struct Thumbnail {
    #[serde(default)]
    url: String,
}

#[derive(Deserialize, Default)]
struct Thumbnails {
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
    #[serde(default)]
    published_at: String,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    subscriber_count: Option<String>,
    view_count: Option<String>,
    video_count: Option<String>,
    like_count: Option<String>,
    comment_count: Option<String>,
}

#[derive(Deserialize)]
struct ChannelItem {
    snippet: Snippet,
    #[serde(default)]
    statistics: Statistics,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchId {
    video_id: Option<String>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: SearchId,
}

#[derive(Deserialize)]
struct VideoItem {
    id: String,
    snippet: Snippet,
    #[serde(default)]
    statistics: Statistics,
}

fn count(value: Option<String>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or_else(|| "0".to_owned())
}

fn thumbnail_url(thumbnails: Thumbnails, prefer_medium: bool) -> String {
    let medium = thumbnails.medium.filter(|_| prefer_medium);
    medium
        .into_iter()
        .chain(thumbnails.default)
        .map(|t| t.url)
        .find(|u| !u.is_empty())
        .unwrap_or_default()
}

#[derive(Debug, Clone)]
pub struct YouTubeClient {
    settings: YouTubeSettings,
    http: reqwest::Client,
}

impl YouTubeClient {
    pub fn new(settings: YouTubeSettings, http: reqwest::Client) -> Self {
        Self { settings, http }
    }

    pub async fn channel_overview(&self) -> Result<ChannelOverview, SocialError> {
        let key = setting(&self.settings.api_key)
            .ok_or(SocialError::NotConfigured("YouTube API key not configured"))?;
        let channel_id = self.settings.channel_id.as_str();

        let channels: ItemList<ChannelItem> = self
            .get(
                "/channels",
                &[("part", "snippet,statistics"), ("id", channel_id), ("key", key)],
                "Failed to fetch channel data",
            )
            .await?;
        let item = channels
            .items
            .into_iter()
            .next()
            .ok_or(SocialError::NotFound("Channel not found"))?;
        let channel = ChannelSummary {
            name: item.snippet.title,
            thumbnail: thumbnail_url(item.snippet.thumbnails, false),
            subscriber_count: count(item.statistics.subscriber_count),
            view_count: count(item.statistics.view_count),
            video_count: count(item.statistics.video_count),
            channel_url: format!("https://www.youtube.com/channel/{channel_id}"),
        };

        let search: ItemList<SearchItem> = self
            .get(
                "/search",
                &[
                    ("part", "snippet"),
                    ("channelId", channel_id),
                    ("order", "date"),
                    ("type", "video"),
                    ("maxResults", RECENT_VIDEOS),
                    ("key", key),
                ],
                "Failed to fetch videos",
            )
            .await?;
        let ids: Vec<String> = search
            .items
            .into_iter()
            .filter_map(|i| i.id.video_id)
            .filter(|id| !id.is_empty())
            .collect();
        if ids.is_empty() {
            debug!(channel_id, "channel has no videos");
            return Ok(ChannelOverview { channel, videos: Vec::new() });
        }

        let joined = ids.join(",");
        let videos: ItemList<VideoItem> = self
            .get(
                "/videos",
                &[("part", "statistics,snippet"), ("id", joined.as_str()), ("key", key)],
                "Failed to fetch video details",
            )
            .await?;

        let videos = videos
            .items
            .into_iter()
            .map(|v| VideoSummary {
                video_url: format!("https://www.youtube.com/watch?v={}", v.id),
                title: v.snippet.title,
                thumbnail: thumbnail_url(v.snippet.thumbnails, true),
                view_count: count(v.statistics.view_count),
                like_count: count(v.statistics.like_count),
                comment_count: count(v.statistics.comment_count),
                published_at: v.snippet.published_at,
                id: v.id,
            })
            .collect();

        Ok(ChannelOverview { channel, videos })
    }

    /// GET and decode; a non-2xx answer keeps its status and the API's own
    /// error message when it sent one.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        context: &str,
    ) -> Result<T, SocialError> {
        let url = build_url(&self.settings.api_url, path, params)?;
        debug!(path, "youtube request");
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            let message = serde_json::from_slice::<Value>(&bytes)
                .ok()
                .and_then(|b| b.pointer("/error/message").and_then(Value::as_str).map(str::to_owned))
                .unwrap_or_else(|| context.to_owned());
            return Err(SocialError::Upstream { status: status.as_u16(), message });
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}
