use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use common::{JobId, JobType, ListPage, ListParams};
use reqwest::{Method, RequestBuilder};
use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::RequestFailure;

/// Delete and cancel against one backend collection.
#[async_trait]
pub trait CollectionClient: Send + Sync {
    async fn destroy(&self, id: JobId) -> Result<(), RequestFailure>;
    async fn cancel(&self, id: JobId) -> Result<(), RequestFailure>;
}

#[async_trait]
pub trait ListQuery: Send + Sync {
    async fn read(&self, params: &ListParams) -> Result<ListPage, RequestFailure>;
}

#[derive(Debug, Clone)]
enum Auth {
    Anonymous,
    Token(String),
    Basic { username: String, password: Option<String> },
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    auth: Auth,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.insecure)
            .build()
            .context("Failed to build HTTP client")?;

        let auth = match (&config.token, &config.username) {
            (Some(token), _) => Auth::Token(token.clone()),
            (None, Some(username)) => Auth::Basic {
                username: username.clone(),
                password: config.password.clone(),
            },
            (None, None) => Auth::Anonymous,
        };

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// `/api/v2/<collection>/<id>/<action>/`, without the host.
    pub fn path(collection: &str, id: Option<JobId>, action: Option<&str>) -> String {
        let mut path = format!("{}/{}/", common::API_PREFIX, collection);
        if let Some(id) = id {
            path.push_str(&format!("{}/", id));
        }
        if let Some(action) = action {
            path.push_str(&format!("{}/", action));
        }
        path
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        match &self.auth {
            Auth::Anonymous => builder,
            Auth::Token(token) => builder.bearer_auth(token),
            Auth::Basic { username, password } => builder.basic_auth(username, password.as_ref()),
        }
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        params: Option<&ListParams>,
    ) -> Result<Value, RequestFailure> {
        let mut builder = self.request(method.clone(), path);
        if let Some(params) = params {
            builder = builder.query(params.pairs());
        }

        log::debug!("{} {}", method, path);
        let response = builder
            .send()
            .await
            .map_err(|e| RequestFailure::transport(method.clone(), path, e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| RequestFailure::transport(method.clone(), path, e))?;
        let payload = decode_body(&body);

        if status.is_success() {
            Ok(payload)
        } else {
            Err(RequestFailure::from_response(method, path, status.as_u16(), payload))
        }
    }
}

/// JSON when the body is JSON, the raw text otherwise, null when empty.
fn decode_body(body: &[u8]) -> Value {
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

pub struct HttpCollection {
    api: ApiClient,
    job_type: JobType,
}

impl HttpCollection {
    pub fn new(api: ApiClient, job_type: JobType) -> Self {
        Self { api, job_type }
    }
}

#[async_trait]
impl CollectionClient for HttpCollection {
    async fn destroy(&self, id: JobId) -> Result<(), RequestFailure> {
        let path = ApiClient::path(self.job_type.collection(), Some(id), None);
        self.api.send(Method::DELETE, &path, None).await.map(|_| ())
    }

    async fn cancel(&self, id: JobId) -> Result<(), RequestFailure> {
        let path = ApiClient::path(self.job_type.collection(), Some(id), Some("cancel"));
        self.api.send(Method::POST, &path, None).await.map(|_| ())
    }
}

pub struct UnifiedJobs {
    api: ApiClient,
}

impl UnifiedJobs {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ListQuery for UnifiedJobs {
    async fn read(&self, params: &ListParams) -> Result<ListPage, RequestFailure> {
        let path = ApiClient::path(common::UNIFIED_JOBS_COLLECTION, None, None);
        let payload = self.api.send(Method::GET, &path, Some(params)).await?;
        serde_json::from_value(payload)
            .map_err(|e| RequestFailure::transport(Method::GET, &path, format!("invalid list page: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_paths() {
        assert_eq!(
            ApiClient::path(JobType::ProjectUpdate.collection(), Some(JobId(1)), None),
            "/api/v2/project_updates/1/"
        );
        assert_eq!(
            ApiClient::path(JobType::Job.collection(), Some(JobId(2)), Some("cancel")),
            "/api/v2/jobs/2/cancel/"
        );
        assert_eq!(
            ApiClient::path(common::UNIFIED_JOBS_COLLECTION, None, None),
            "/api/v2/unified_jobs/"
        );
    }

    #[test]
    fn decodes_json_text_and_empty_bodies() {
        assert_eq!(decode_body(b""), Value::Null);
        assert_eq!(decode_body(br#"{"detail":"nope"}"#), serde_json::json!({ "detail": "nope" }));
        assert_eq!(decode_body(b"<html>502</html>"), Value::String("<html>502</html>".into()));
    }

    #[test]
    fn token_wins_over_basic_credentials() {
        let config = ApiConfig {
            token: Some("abc".into()),
            username: Some("admin".into()),
            ..ApiConfig::default()
        };
        let api = ApiClient::new(&config).unwrap();
        assert!(matches!(api.auth, Auth::Token(ref t) if t == "abc"));
        assert_eq!(api.base_url, "http://localhost:8013");
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_failure() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:9/".into(),
            timeout_secs: 2,
            ..ApiConfig::default()
        };
        let collection = HttpCollection::new(ApiClient::new(&config).unwrap(), JobType::Job);

        let failure = collection.destroy(JobId(2)).await.unwrap_err();
        assert_eq!(failure.method, Method::DELETE);
        assert_eq!(failure.path, "/api/v2/jobs/2/");
        assert_eq!(failure.status, None);
    }
}
