//! Google Drive operations, forwarded to the backend as-is.

use scribe_types::SummaryItem;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;
use utoipa::{IntoParams, ToSchema};

use super::{BackendClient, read_json};
use crate::error::BackendError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DriveStatus {
    pub connected: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SummaryList {
    #[serde(default)]
    pub summaries: Vec<SummaryItem>,
}

/// Query of `GET /api/drive/files`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DriveFilesQuery {
    pub folder_id: Option<String>,
    pub limit: Option<u32>,
    /// File name whose content preview should be returned alongside the list.
    pub read_sample: Option<String>,
}

impl BackendClient {
    pub async fn drive_auth_url(&self) -> Result<Value, BackendError> {
        let resp = self
            .http
            .get(self.endpoint("/api/drive/auth/url")?)
            .send()
            .await?;
        read_json(resp, "Failed to get auth URL").await
    }

    pub async fn drive_auth_status(&self) -> Result<DriveStatus, BackendError> {
        let resp = self
            .http
            .get(self.endpoint("/api/drive/auth/status")?)
            .send()
            .await?;
        read_json(resp, "Failed to get Drive status").await
    }

    pub async fn disconnect_drive(&self) -> Result<(), BackendError> {
        let resp = self
            .http
            .post(self.endpoint("/api/drive/auth/disconnect")?)
            .send()
            .await?;
        // The body of a successful disconnect carries nothing we use.
        if resp.status().is_success() {
            return Ok(());
        }
        read_json::<Value>(resp, "Disconnect failed").await.map(|_| ())
    }

    pub async fn list_drive_files(&self, query: &DriveFilesQuery) -> Result<Value, BackendError> {
        let mut url = Url::parse(&self.endpoint("/api/drive/files")?)
            .map_err(|e| BackendError::Decode(format!("invalid backend URL: {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(folder_id) = &query.folder_id {
                pairs.append_pair("folder_id", folder_id);
            }
            if let Some(limit) = query.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
            if let Some(sample) = &query.read_sample {
                pairs.append_pair("read_sample", sample);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        let resp = self.http.get(url).send().await?;
        read_json(resp, "List files failed").await
    }

    pub async fn sort_drive(&self) -> Result<Value, BackendError> {
        let resp = self
            .http
            .post(self.endpoint("/api/drive/sort")?)
            .send()
            .await?;
        read_json(resp, "Sort failed").await
    }

    pub async fn summaries(&self) -> Result<SummaryList, BackendError> {
        let resp = self
            .http
            .get(self.endpoint("/api/drive/summaries")?)
            .send()
            .await?;
        read_json(resp, "List summaries failed").await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base: &str) -> BackendClient {
        BackendClient::new(Some(base.to_owned()), reqwest::Client::new())
    }

    #[tokio::test]
    async fn list_files_forwards_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/drive/files"))
            .and(query_param("read_sample", "test_event_summary"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "files": [], "count": 0, "file_names": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let query = DriveFilesQuery {
            limit: Some(10),
            read_sample: Some("test_event_summary".into()),
            ..Default::default()
        };
        let body = client(&server.uri()).list_drive_files(&query).await.unwrap();
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn summaries_are_typed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/drive/summaries"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "summaries": [{ "id": "f1", "name": "Spring Gala" }]
            })))
            .mount(&server)
            .await;

        let list = client(&server.uri()).summaries().await.unwrap();
        assert_eq!(
            list.summaries,
            vec![SummaryItem { id: "f1".into(), name: "Spring Gala".into() }]
        );
    }

    #[tokio::test]
    async fn sort_failure_surfaces_backend_error_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/drive/sort"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "error": "Drive not connected" })),
            )
            .mount(&server)
            .await;

        let err = client(&server.uri()).sort_drive().await.unwrap_err();
        assert_eq!(err.to_string(), "Drive not connected");
    }
}
