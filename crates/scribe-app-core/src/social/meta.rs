//! Meta graph API: OAuth code exchange and the page / Instagram overview.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use utoipa::ToSchema;

use super::{build_url, setting};
use crate::error::SocialError;

const OAUTH_SCOPES: &str = "pages_show_list,pages_read_engagement,instagram_basic";
const RECENT_LIMIT: &str = "5";

#[derive(Debug, Clone)]
pub struct MetaSettings {
    pub app_id: Option<String>,
    pub app_secret: Option<String>,
    pub redirect_uri: Option<String>,
    pub page_access_token: Option<String>,
    pub page_id: String,
    pub ig_username: String,
    pub graph_url: String,
    pub dialog_url: String,
}

impl MetaSettings {
    pub const DEFAULT_GRAPH_URL: &'static str = "https://graph.facebook.com/v19.0";
    pub const DEFAULT_DIALOG_URL: &'static str = "https://www.facebook.com/v19.0/dialog/oauth";
    pub const DEFAULT_PAGE_ID: &'static str = "100075897078349";
    pub const DEFAULT_IG_USERNAME: &'static str = "blackcreekyouthinitiative";
}

impl Default for MetaSettings {
    fn default() -> Self {
        Self {
            app_id: None,
            app_secret: None,
            redirect_uri: None,
            page_access_token: None,
            page_id: Self::DEFAULT_PAGE_ID.to_owned(),
            ig_username: Self::DEFAULT_IG_USERNAME.to_owned(),
            graph_url: Self::DEFAULT_GRAPH_URL.to_owned(),
            dialog_url: Self::DEFAULT_DIALOG_URL.to_owned(),
        }
    }
}

// ── response shapes ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MetaOverview {
    pub facebook: FacebookOverview,
    pub instagram: Option<InstagramOverview>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FacebookOverview {
    pub pages: Vec<PageSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PageSummary {
    pub id: String,
    pub name: String,
    pub followers_count: String,
    pub fan_count: String,
    #[serde(rename = "pageUrl")]
    pub page_url: String,
    pub posts: Vec<PostSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PostSummary {
    pub message: String,
    pub created_time: String,
    pub likes: u64,
    pub comments: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct InstagramOverview {
    pub username: String,
    pub followers_count: String,
    pub media_count: String,
    pub profile_picture_url: String,
    #[serde(rename = "profileUrl")]
    pub profile_url: String,
    pub media: Vec<MediaSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MediaSummary {
    pub id: String,
    pub caption: String,
    pub timestamp: String,
    pub media_type: String,
    pub media_url: String,
    pub thumbnail_url: String,
    /// Public post link.
    #[serde(rename = "mediaUrl")]
    pub permalink: String,
}

// ── graph payloads ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct GraphList<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Deserialize)]
struct GraphPage {
    name: Option<String>,
    fan_count: Option<u64>,
    followers_count: Option<u64>,
}

#[derive(Deserialize, Default)]
struct TotalCount {
    total_count: Option<u64>,
}

#[derive(Deserialize, Default)]
struct Summarised {
    #[serde(default)]
    summary: TotalCount,
}

#[derive(Deserialize)]
struct GraphPost {
    message: Option<String>,
    #[serde(default)]
    created_time: String,
    #[serde(default)]
    likes: Summarised,
    #[serde(default)]
    comments: Summarised,
}

#[derive(Deserialize)]
struct GraphId {
    id: String,
}

#[derive(Deserialize)]
struct GraphIgLink {
    instagram_business_account: Option<GraphId>,
}

#[derive(Deserialize)]
struct GraphIgProfile {
    username: Option<String>,
    followers_count: Option<u64>,
    media_count: Option<u64>,
    profile_picture_url: Option<String>,
}

#[derive(Deserialize)]
struct GraphMedia {
    id: String,
    caption: Option<String>,
    #[serde(default)]
    timestamp: String,
    #[serde(default)]
    media_type: String,
    media_url: Option<String>,
    thumbnail_url: Option<String>,
}

#[derive(Deserialize)]
struct GraphToken {
    access_token: Option<String>,
}

/// Message of a graph `{"error": {...}}` object, if the body carries one.
fn graph_error(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    Some(
        error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Meta graph request failed")
            .to_owned(),
    )
}

#[derive(Debug, Clone)]
pub struct MetaGraphClient {
    settings: MetaSettings,
    http: reqwest::Client,
}

impl MetaGraphClient {
    pub fn new(settings: MetaSettings, http: reqwest::Client) -> Self {
        Self { settings, http }
    }

    pub fn settings(&self) -> &MetaSettings {
        &self.settings
    }

    /// Login dialog URL carrying `state`.
    pub fn authorize_url(&self, state: &str) -> Result<String, SocialError> {
        let (Some(app_id), Some(redirect_uri)) =
            (setting(&self.settings.app_id), setting(&self.settings.redirect_uri))
        else {
            return Err(SocialError::NotConfigured(
                "META_APP_ID and META_REDIRECT_URI must be set",
            ));
        };
        let url = build_url(
            &self.settings.dialog_url,
            "",
            &[
                ("client_id", app_id),
                ("redirect_uri", redirect_uri),
                ("scope", OAUTH_SCOPES),
                ("state", state),
                ("response_type", "code"),
            ],
        )?;
        Ok(url.into())
    }

    /// Trade an authorization code for an access token, upgraded to a
    /// long-lived token when the graph allows it.
    pub async fn exchange_code(&self, code: &str) -> Result<String, SocialError> {
        let (Some(app_id), Some(app_secret), Some(redirect_uri)) = (
            setting(&self.settings.app_id),
            setting(&self.settings.app_secret),
            setting(&self.settings.redirect_uri),
        ) else {
            return Err(SocialError::NotConfigured(
                "META_APP_ID, META_APP_SECRET and META_REDIRECT_URI must be set",
            ));
        };

        let url = build_url(
            &self.settings.graph_url,
            "/oauth/access_token",
            &[
                ("client_id", app_id),
                ("client_secret", app_secret),
                ("redirect_uri", redirect_uri),
                ("code", code),
            ],
        )?;
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let body: Value = serde_json::from_slice(&resp.bytes().await?).unwrap_or(Value::Null);
        let short_lived = match serde_json::from_value::<GraphToken>(body.clone()) {
            Ok(GraphToken { access_token: Some(token) }) if status.is_success() => token,
            _ => {
                let message = graph_error(&body).unwrap_or_else(|| "token_exchange_failed".into());
                return Err(SocialError::Graph(message));
            }
        };

        match self.long_lived_token(app_id, app_secret, &short_lived).await {
            Ok(Some(token)) => Ok(token),
            Ok(None) => {
                warn!("long-lived token exchange returned no token; keeping short-lived token");
                Ok(short_lived)
            }
            Err(e) => {
                warn!(error = %e, "long-lived token exchange failed; keeping short-lived token");
                Ok(short_lived)
            }
        }
    }

    async fn long_lived_token(
        &self,
        app_id: &str,
        app_secret: &str,
        short_lived: &str,
    ) -> Result<Option<String>, SocialError> {
        let url = build_url(
            &self.settings.graph_url,
            "/oauth/access_token",
            &[
                ("grant_type", "fb_exchange_token"),
                ("client_id", app_id),
                ("client_secret", app_secret),
                ("fb_exchange_token", short_lived),
            ],
        )?;
        let token: GraphToken = self.http.get(url).send().await?.json().await?;
        Ok(token.access_token.filter(|t| !t.is_empty()))
    }

    /// Page statistics, the five most recent posts and, when the page has a
    /// linked business account, the Instagram profile with its recent media.
    pub async fn page_overview(&self) -> Result<MetaOverview, SocialError> {
        let token = setting(&self.settings.page_access_token).ok_or(SocialError::NotConfigured(
            "META_PAGE_ACCESS_TOKEN is not set in environment variables",
        ))?;
        let page_id = self.settings.page_id.as_str();
        let page_path = format!("/{page_id}");

        let page: GraphPage = self
            .graph_get(&page_path, token, &[("fields", "id,name,fan_count,followers_count")])
            .await?;

        let posts: GraphList<GraphPost> = self
            .graph_get(
                &format!("{page_path}/posts"),
                token,
                &[
                    ("fields", "message,created_time,likes.summary(true),comments.summary(true)"),
                    ("limit", RECENT_LIMIT),
                ],
            )
            .await?;

        let page = PageSummary {
            id: page_id.to_owned(),
            name: page.name.unwrap_or_else(|| "Black Creek Youth Initiative".into()),
            followers_count: page.followers_count.unwrap_or(0).to_string(),
            fan_count: page.fan_count.unwrap_or(0).to_string(),
            page_url: format!("https://www.facebook.com/profile.php?id={page_id}"),
            posts: posts
                .data
                .into_iter()
                .map(|p| PostSummary {
                    message: p.message.unwrap_or_default(),
                    created_time: p.created_time,
                    likes: p.likes.summary.total_count.unwrap_or(0),
                    comments: p.comments.summary.total_count.unwrap_or(0),
                })
                .collect(),
        };

        let link: GraphIgLink = self
            .graph_get(&page_path, token, &[("fields", "instagram_business_account")])
            .await?;
        let instagram = match link.instagram_business_account {
            Some(GraphId { id }) => Some(self.instagram_overview(&id, token).await?),
            None => {
                debug!(page_id, "page has no linked instagram account");
                None
            }
        };

        Ok(MetaOverview { facebook: FacebookOverview { pages: vec![page] }, instagram })
    }

    async fn instagram_overview(&self, ig_id: &str, token: &str) -> Result<InstagramOverview, SocialError> {
        let profile: GraphIgProfile = self
            .graph_get(
                &format!("/{ig_id}"),
                token,
                &[("fields", "username,followers_count,media_count,profile_picture_url")],
            )
            .await?;
        let media: GraphList<GraphMedia> = self
            .graph_get(
                &format!("/{ig_id}/media"),
                token,
                &[
                    ("fields", "id,caption,timestamp,media_type,media_url,thumbnail_url"),
                    ("limit", RECENT_LIMIT),
                ],
            )
            .await?;

        let ig_username = &self.settings.ig_username;
        Ok(InstagramOverview {
            username: profile.username.unwrap_or_else(|| ig_username.clone()),
            followers_count: profile.followers_count.unwrap_or(0).to_string(),
            media_count: profile.media_count.unwrap_or(0).to_string(),
            profile_picture_url: profile.profile_picture_url.unwrap_or_default(),
            profile_url: format!("https://www.instagram.com/{ig_username}/"),
            media: media
                .data
                .into_iter()
                .map(|m| {
                    let media_url = m.media_url.unwrap_or_default();
                    MediaSummary {
                        permalink: format!("https://www.instagram.com/p/{}/", m.id),
                        caption: m.caption.unwrap_or_default(),
                        timestamp: m.timestamp,
                        media_type: m.media_type,
                        thumbnail_url: m
                            .thumbnail_url
                            .filter(|u| !u.is_empty())
                            .unwrap_or_else(|| media_url.clone()),
                        media_url,
                        id: m.id,
                    }
                })
                .collect(),
        })
    }

    async fn graph_get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
        params: &[(&str, &str)],
    ) -> Result<T, SocialError> {
        let mut query = vec![("access_token", token)];
        query.extend_from_slice(params);
        let url = build_url(&self.settings.graph_url, path, &query)?;
        debug!(path, "graph request");

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let body: Value = serde_json::from_slice(&resp.bytes().await?)?;
        if let Some(message) = graph_error(&body) {
            return Err(SocialError::Graph(message));
        }
        if !status.is_success() {
            return Err(SocialError::Upstream {
                status: status.as_u16(),
                message: format!("Meta graph request failed with status {status}"),
            });
        }
        Ok(serde_json::from_value(body)?)
    }
}
