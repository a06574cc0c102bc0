//! Meta OAuth flow and the page / Instagram overview.
//!
//! The OAuth `state` and the resulting access token live in HTTP-only signed
//! cookies: `meta_state` for ten minutes while the user is on the login
//! dialog, `meta_access_token` for sixty days afterwards.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Redirect;
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use scribe_app_core::SocialError;
use scribe_app_core::social::{
    FacebookOverview, InstagramOverview, MediaSummary, MetaOverview, PageSummary, PostSummary,
};
use tracing::{info, warn};
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::ServerError;
use crate::schemas::api::meta::{AuthUrlResponse, CallbackQuery, ConnectionStatus};
use crate::state::AppState;

const STATE_COOKIE: &str = "meta_state";
const TOKEN_COOKIE: &str = "meta_access_token";

#[derive(OpenApi)]
#[openapi(
    paths(auth_url, auth_callback, auth_status, data),
    components(schemas(
        AuthUrlResponse,
        ConnectionStatus,
        MetaOverview,
        FacebookOverview,
        PageSummary,
        PostSummary,
        InstagramOverview,
        MediaSummary
    ))
)]
pub struct MetaApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/meta/auth/url", get(auth_url))
        .route("/meta/auth/callback", get(auth_callback))
        .route("/meta/auth/status", get(auth_status))
        .route("/meta/data", get(data))
}

fn jar(state: &AppState, headers: &HeaderMap) -> SignedCookieJar {
    SignedCookieJar::from_headers(headers, state.cookie_key.clone())
}

fn cookie(state: &AppState, name: &'static str, value: String, max_age: time::Duration) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(state.secure_cookies())
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(max_age)
        .build()
}

fn error_redirect(reason: &str) -> Redirect {
    let encoded: String = url::form_urlencoded::byte_serialize(reason.as_bytes()).collect();
    Redirect::temporary(&format!("/?meta_error={encoded}"))
}

/// Start the OAuth flow: issue a fresh `state` and return the login URL.
#[utoipa::path(
    get,
    path = "/api/meta/auth/url",
    tag = "meta",
    responses(
        (status = 200, description = "Login dialog URL", body = AuthUrlResponse),
        (status = 500, description = "App id or redirect URI missing"),
    )
)]
pub async fn auth_url(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<(SignedCookieJar, Json<AuthUrlResponse>), ServerError> {
    let oauth_state = Uuid::new_v4().simple().to_string();
    let url = state
        .meta
        .authorize_url(&oauth_state)
        .map_err(ServerError::social("Failed to start Meta login"))?;

    let jar = jar(&state, &headers).add(cookie(
        &state,
        STATE_COOKIE,
        oauth_state,
        time::Duration::minutes(10),
    ));
    Ok((jar, Json(AuthUrlResponse { url })))
}

/// OAuth redirect target. Always answers with a redirect to the chat page,
/// carrying either `meta_connected=1` or `meta_error=<reason>`.
#[utoipa::path(
    get,
    path = "/api/meta/auth/callback",
    tag = "meta",
    params(CallbackQuery),
    responses((status = 307, description = "Redirect back to the chat page"))
)]
pub async fn auth_callback(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<CallbackQuery>,
) -> (SignedCookieJar, Redirect) {
    let jar = jar(&state, &headers);

    if let Some(error) = query.error.as_deref() {
        let reason = query.error_description.as_deref().unwrap_or(error);
        warn!(error, "Meta login was declined or failed");
        return (jar, error_redirect(reason));
    }

    let saved = jar.get(STATE_COOKIE).map(|c| c.value().to_owned());
    match (query.state.as_deref(), saved.as_deref()) {
        (Some(got), Some(expected)) if got == expected => {}
        _ => {
            warn!("Meta callback state mismatch");
            return (jar, error_redirect("invalid_state"));
        }
    }

    let Some(code) = query.code.as_deref().filter(|c| !c.is_empty()) else {
        return (jar, error_redirect("missing_code"));
    };

    let token = match state.meta.exchange_code(code).await {
        Ok(token) => token,
        Err(SocialError::NotConfigured(m)) => {
            warn!(reason = m, "Meta OAuth is not configured");
            return (jar, error_redirect("server_misconfigured"));
        }
        Err(SocialError::Graph(message)) => return (jar, error_redirect(&message)),
        Err(e) => {
            warn!(error = %e, "Meta token exchange failed");
            return (jar, error_redirect(&e.to_string()));
        }
    };

    let removal = Cookie::build((STATE_COOKIE, "")).path("/").build();
    let jar = jar.remove(removal).add(cookie(
        &state,
        TOKEN_COOKIE,
        token,
        time::Duration::days(60),
    ));
    info!("Meta account connected");
    (jar, Redirect::temporary("/?meta_connected=1"))
}

#[utoipa::path(
    get,
    path = "/api/meta/auth/status",
    tag = "meta",
    responses((status = 200, description = "Whether a Meta token cookie is present", body = ConnectionStatus))
)]
pub async fn auth_status(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Json<ConnectionStatus> {
    let connected = jar(&state, &headers)
        .get(TOKEN_COOKIE)
        .is_some_and(|c| !c.value().is_empty());
    Json(ConnectionStatus { connected })
}

/// Facebook page statistics and the linked Instagram account, read with the
/// configured page access token.
#[utoipa::path(
    get,
    path = "/api/meta/data",
    tag = "meta",
    responses(
        (status = 200, description = "Page and Instagram overview", body = MetaOverview),
        (status = 400, description = "Graph API error"),
        (status = 500, description = "Token missing or request failed"),
    )
)]
pub async fn data(State(state): State<Arc<AppState>>) -> Result<Json<MetaOverview>, ServerError> {
    let overview = state
        .meta
        .page_overview()
        .await
        .map_err(ServerError::social("Failed to fetch Meta data"))?;
    Ok(Json(overview))
}

#[cfg(test)]
mod test {
    use axum::body::Body;
    use axum::http::{HeaderMap, Request, StatusCode, header};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::routes::test_util::*;

    const OAUTH_VARS: [(&str, &str); 3] = [
        ("META_APP_ID", "app-1"),
        ("META_APP_SECRET", "secret"),
        ("META_REDIRECT_URI", "http://localhost:3000/api/meta/auth/callback"),
    ];

    /// `name=value` pairs of every `Set-Cookie` header.
    fn set_cookies(headers: &HeaderMap) -> Vec<String> {
        headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or("").to_owned())
            .collect()
    }

    fn with_cookies(uri: &str, cookies: &[String]) -> Request<Body> {
        Request::get(uri)
            .header(header::COOKIE, cookies.join("; "))
            .body(Body::empty())
            .unwrap()
    }

    fn location(headers: &HeaderMap) -> &str {
        headers.get(header::LOCATION).and_then(|v| v.to_str().ok()).unwrap_or("")
    }

    #[tokio::test]
    async fn auth_url_requires_configuration() {
        let (router, _, _dir) = app(&[]);
        let (status, _, body) = send(&router, get("/api/meta/auth/url")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "META_APP_ID and META_REDIRECT_URI must be set");
    }

    #[tokio::test]
    async fn auth_url_sets_signed_state_cookie() {
        let (router, _, _dir) = app(&OAUTH_VARS);
        let (status, headers, body) = send(&router, get("/api/meta/auth/url")).await;
        assert_eq!(status, StatusCode::OK);

        let raw = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(raw.starts_with("meta_state="));
        assert!(raw.contains("HttpOnly"));
        assert!(raw.contains("Max-Age=600"));

        let url = url::Url::parse(body["url"].as_str().unwrap()).unwrap();
        let state_param = url.query_pairs().find(|(k, _)| k == "state").unwrap().1.into_owned();
        // The signed cookie value carries the state after its signature.
        assert!(raw.contains(&state_param));
    }

    #[tokio::test]
    async fn callback_with_wrong_state_is_rejected() {
        let (router, _, _dir) = app(&OAUTH_VARS);
        let (_, headers, _) = send(&router, get("/api/meta/auth/url")).await;
        let cookies = set_cookies(&headers);

        let (status, headers, _) = send(
            &router,
            with_cookies("/api/meta/auth/callback?code=c&state=forged", &cookies),
        )
        .await;
        assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&headers), "/?meta_error=invalid_state");
    }

    #[tokio::test]
    async fn callback_without_cookie_is_rejected() {
        let (router, _, _dir) = app(&OAUTH_VARS);
        let (_, headers, _) = send(&router, get("/api/meta/auth/callback?code=c&state=s")).await;
        assert_eq!(location(&headers), "/?meta_error=invalid_state");
    }

    #[tokio::test]
    async fn provider_error_is_forwarded() {
        let (router, _, _dir) = app(&OAUTH_VARS);
        let (_, headers, _) = send(
            &router,
            get("/api/meta/auth/callback?error=access_denied&error_description=Permissions+error"),
        )
        .await;
        assert_eq!(location(&headers), "/?meta_error=Permissions+error");
    }

    #[tokio::test]
    async fn full_login_stores_token_cookie() {
        let graph = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth/access_token"))
            .and(query_param("code", "good-code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "short" })))
            .mount(&graph)
            .await;
        Mock::given(method("GET"))
            .and(path("/oauth/access_token"))
            .and(query_param("grant_type", "fb_exchange_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "long" })))
            .mount(&graph)
            .await;
        let graph_url = graph.uri();
        let mut vars = OAUTH_VARS.to_vec();
        vars.push(("META_GRAPH_URL", graph_url.as_str()));
        let (router, _, _dir) = app(&vars);

        let (_, headers, body) = send(&router, get("/api/meta/auth/url")).await;
        let state_cookie = set_cookies(&headers);
        let url = url::Url::parse(body["url"].as_str().unwrap()).unwrap();
        let oauth_state = url.query_pairs().find(|(k, _)| k == "state").unwrap().1.into_owned();

        let (status, headers, _) = send(
            &router,
            with_cookies(
                &format!("/api/meta/auth/callback?code=good-code&state={oauth_state}"),
                &state_cookie,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&headers), "/?meta_connected=1");

        let cookies = set_cookies(&headers);
        let token_cookie: Vec<String> =
            cookies.into_iter().filter(|c| c.starts_with("meta_access_token=")).collect();
        assert_eq!(token_cookie.len(), 1);

        let (_, _, body) = send(&router, with_cookies("/api/meta/auth/status", &token_cookie)).await;
        assert_eq!(body, json!({ "connected": true }));
    }

    #[tokio::test]
    async fn tampered_token_cookie_is_not_connected() {
        let (router, _, _dir) = app(&[]);
        let (_, _, body) = send(
            &router,
            with_cookies("/api/meta/auth/status", &["meta_access_token=forged".to_owned()]),
        )
        .await;
        assert_eq!(body, json!({ "connected": false }));
    }

    #[tokio::test]
    async fn data_without_page_token_is_500() {
        let (router, _, _dir) = app(&[]);
        let (status, _, body) = send(&router, get("/api/meta/data")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "META_PAGE_ACCESS_TOKEN is not set in environment variables");
    }

    #[tokio::test]
    async fn data_graph_error_is_400() {
        let graph = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "message": "Invalid OAuth access token." }
            })))
            .mount(&graph)
            .await;
        let graph_url = graph.uri();
        let (router, _, _dir) = app(&[
            ("META_PAGE_ACCESS_TOKEN", "page-token"),
            ("META_GRAPH_URL", graph_url.as_str()),
        ]);

        let (status, _, body) = send(&router, get("/api/meta/data")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid OAuth access token.");
    }
}
