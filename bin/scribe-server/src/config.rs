//! Server configuration, loaded from environment variables at startup.

use std::path::PathBuf;

use scribe_app_core::social::{MetaSettings, YouTubeSettings};

/// Runtime configuration for scribe-server.
///
/// Operational settings have defaults. Third-party credentials do not: a
/// missing credential disables the feature that needs it, and that feature
/// answers with an explicit error naming what is missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:3000"`).
    pub bind_address: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Directory for daily-rolling log files; stdout only when unset.
    pub log_dir: Option<String>,

    /// Directory holding one chat-session file per client.
    pub sessions_dir: PathBuf,

    /// Comma-separated CORS origin allow-list; wildcard when unset.
    pub cors_allowed_origins: Option<String>,

    /// Serve the OpenAPI document at `/api-docs/openapi.json`.
    pub enable_docs: bool,

    /// `SCRIBE_ENV=production` marks cookies `Secure`.
    pub production: bool,

    /// Secret used to sign cookies (at least 64 bytes).
    pub cookie_secret: Option<String>,

    /// Base URL of the backend chat / Drive service.
    pub backend_url: Option<String>,

    pub meta: MetaSettings,
    pub youtube: YouTubeSettings,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build [`Config`] from an arbitrary variable source.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let meta_defaults = MetaSettings::default();
        let youtube_defaults = YouTubeSettings::default();
        Self {
            bind_address: env_or(&get, "SCRIBE_BIND", "0.0.0.0:3000"),
            log_level: env_or(&get, "SCRIBE_LOG", "info"),
            log_json: flag(&get, "SCRIBE_LOG_JSON", false),
            log_dir: optional(&get, "SCRIBE_LOG_DIR"),
            sessions_dir: env_or(&get, "SCRIBE_SESSIONS_DIR", "scribe-sessions").into(),
            cors_allowed_origins: optional(&get, "SCRIBE_CORS_ORIGINS"),
            enable_docs: flag(&get, "SCRIBE_ENABLE_DOCS", true),
            production: env_or(&get, "SCRIBE_ENV", "development").eq_ignore_ascii_case("production"),
            cookie_secret: optional(&get, "SCRIBE_COOKIE_SECRET"),
            backend_url: optional(&get, "BACKEND_URL"),
            meta: MetaSettings {
                app_id: optional(&get, "META_APP_ID"),
                app_secret: optional(&get, "META_APP_SECRET"),
                redirect_uri: optional(&get, "META_REDIRECT_URI"),
                page_access_token: optional(&get, "META_PAGE_ACCESS_TOKEN"),
                page_id: optional(&get, "META_PAGE_ID").unwrap_or(meta_defaults.page_id),
                ig_username: optional(&get, "META_IG_USERNAME").unwrap_or(meta_defaults.ig_username),
                graph_url: optional(&get, "META_GRAPH_URL").unwrap_or(meta_defaults.graph_url),
                dialog_url: optional(&get, "META_DIALOG_URL").unwrap_or(meta_defaults.dialog_url),
            },
            youtube: YouTubeSettings {
                api_key: optional(&get, "YOUTUBE_API_KEY"),
                channel_id: optional(&get, "YOUTUBE_CHANNEL_ID").unwrap_or(youtube_defaults.channel_id),
                api_url: optional(&get, "YOUTUBE_API_URL").unwrap_or(youtube_defaults.api_url),
            },
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(get: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get(key).unwrap_or_else(|| default.to_owned())
}

/// Set and non-blank.
fn optional(get: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    get(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

fn flag(get: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    get(key)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let cfg = config(&[]);
        assert_eq!(cfg.bind_address, "0.0.0.0:3000");
        assert_eq!(cfg.sessions_dir, PathBuf::from("scribe-sessions"));
        assert!(cfg.enable_docs);
        assert!(!cfg.production);
        assert!(cfg.backend_url.is_none());
        assert!(cfg.youtube.api_key.is_none());
        assert_eq!(cfg.meta.page_id, MetaSettings::DEFAULT_PAGE_ID);
    }

    #[test]
    fn blank_credentials_count_as_missing() {
        let cfg = config(&[("YOUTUBE_API_KEY", "  "), ("BACKEND_URL", "")]);
        assert!(cfg.youtube.api_key.is_none());
        assert!(cfg.backend_url.is_none());
    }

    #[test]
    fn overrides_are_read() {
        let cfg = config(&[
            ("SCRIBE_ENV", "Production"),
            ("SCRIBE_ENABLE_DOCS", "false"),
            ("SCRIBE_LOG_JSON", "1"),
            ("BACKEND_URL", "http://backend:8000"),
            ("META_PAGE_ID", "42"),
        ]);
        assert!(cfg.production);
        assert!(!cfg.enable_docs);
        assert!(cfg.log_json);
        assert_eq!(cfg.backend_url.as_deref(), Some("http://backend:8000"));
        assert_eq!(cfg.meta.page_id, "42");
    }
}
