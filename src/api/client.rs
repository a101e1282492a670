use async_trait::async_trait;
use reqwest::StatusCode;
use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::api::{ApiReference, ResourceList, RulesResource};
use crate::utils::url::construct_api_url;

const CONNECT_TIMEOUT_SECONDS: u64 = 5;

#[derive(Debug)]
pub enum ApiError {
    /// Transport failure, timeout, or an undecodable body.
    Http(reqwest::Error),
    /// The server answered with a non-success status other than 404.
    Status { status: StatusCode, url: String },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Http(err) => write!(f, "Rules API request failed: {err}"),
            ApiError::Status { status, url } => {
                write!(f, "Rules API returned {status} for {url}")
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Http(err) => Some(err),
            ApiError::Status { .. } => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Http(err)
    }
}

/// Where rules data comes from. The HTTP client is the real implementation;
/// lookups only depend on this trait.
#[async_trait]
pub trait RulesSource: Send + Sync {
    /// Fetch one resource. A missing resource is `Ok(None)`, not an error.
    async fn resource(
        &self,
        category: &str,
        index: &str,
    ) -> Result<Option<RulesResource>, ApiError>;

    /// Fetch the full name index for a category.
    async fn index(&self, category: &str) -> Result<Vec<ApiReference>, ApiError>;

    /// Fetch the resource an index entry points at.
    async fn referenced(
        &self,
        category: &str,
        reference: &ApiReference,
    ) -> Result<Option<RulesResource>, ApiError> {
        self.resource(category, &reference.index).await
    }
}

#[derive(Clone)]
pub struct RulesClient {
    http: reqwest::Client,
    base_url: String,
}

impl RulesClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECONDS).min(timeout))
            .timeout(timeout)
            .user_agent(concat!("sheetkeep/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch a resource by the relative `url` the API hands out in indices
    /// (e.g. `/api/equipment/club`).
    pub async fn fetch_by_url(&self, url: &str) -> Result<Option<RulesResource>, ApiError> {
        let full = if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            construct_api_url(&origin(&self.base_url), url)
        };
        self.get_json(&full).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<Option<T>, ApiError> {
        debug!(url, "rules request");
        let response = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status,
                url: url.to_string(),
            });
        }
        Ok(Some(response.json::<T>().await?))
    }
}

#[async_trait]
impl RulesSource for RulesClient {
    async fn resource(
        &self,
        category: &str,
        index: &str,
    ) -> Result<Option<RulesResource>, ApiError> {
        let url = construct_api_url(&self.base_url, &format!("{category}/{index}"));
        self.get_json(&url).await
    }

    async fn index(&self, category: &str) -> Result<Vec<ApiReference>, ApiError> {
        let url = construct_api_url(&self.base_url, category);
        let list: Option<ResourceList> = self.get_json(&url).await?;
        Ok(list.map(|list| list.results).unwrap_or_default())
    }

    async fn referenced(
        &self,
        category: &str,
        reference: &ApiReference,
    ) -> Result<Option<RulesResource>, ApiError> {
        if reference.url.is_empty() {
            return self.resource(category, &reference.index).await;
        }
        self.fetch_by_url(&reference.url).await
    }
}

/// Scheme and host of a base URL, without any path.
fn origin(base_url: &str) -> String {
    let after_scheme = base_url.find("://").map(|pos| pos + 3).unwrap_or(0);
    match base_url[after_scheme..].find('/') {
        Some(pos) => base_url[..after_scheme + pos].to_string(),
        None => base_url.trim_end_matches('/').to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{LookupKind, RulesService};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve `responses` in order, one connection each, and return the
    /// request lines that were received.
    async fn serve(
        responses: Vec<(u16, &'static str)>,
    ) -> (String, tokio::task::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let addr = listener.local_addr().expect("local addr should resolve");

        let task = tokio::spawn(async move {
            let mut request_lines = Vec::new();
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().await.expect("accept failed");
                let mut buffer = vec![0u8; 4096];
                let read = stream.read(&mut buffer).await.expect("read failed");
                let request = String::from_utf8_lossy(&buffer[..read]).to_string();
                request_lines.push(request.lines().next().unwrap_or_default().to_string());

                let reason = if status == 200 { "OK" } else { "Error" };
                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream
                    .write_all(response.as_bytes())
                    .await
                    .expect("write failed");
                let _ = stream.shutdown().await;
            }
            request_lines
        });

        (format!("http://{addr}/api"), task)
    }

    #[tokio::test]
    async fn resource_fetch_decodes_and_maps_404_to_none() {
        let (base_url, server) = serve(vec![
            (
                200,
                r#"{"index":"club","name":"Club","desc":[],"equipment_category":{"name":"Weapon"}}"#,
            ),
            (404, r#"{"error":"Not found"}"#),
        ])
        .await;

        let client = RulesClient::new(&base_url, Duration::from_secs(5)).unwrap();
        let club = client.resource("equipment", "club").await.unwrap();
        assert_eq!(club.map(|r| r.name), Some("Club".to_string()));

        let missing = client.resource("equipment", "spork").await.unwrap();
        assert!(missing.is_none());

        let requests = server.await.unwrap();
        assert_eq!(requests[0], "GET /api/equipment/club HTTP/1.1");
        assert_eq!(requests[1], "GET /api/equipment/spork HTTP/1.1");
    }

    #[tokio::test]
    async fn server_errors_surface_as_status() {
        let (base_url, server) = serve(vec![(500, "{}")]).await;
        let client = RulesClient::new(&base_url, Duration::from_secs(5)).unwrap();

        let err = client.index("spells").await.unwrap_err();
        assert!(matches!(err, ApiError::Status { .. }));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn index_returns_results() {
        let (base_url, server) = serve(vec![(
            200,
            r#"{"count":2,"results":[{"index":"acid-arrow","name":"Acid Arrow","url":"/api/spells/acid-arrow"},{"index":"aid","name":"Aid","url":"/api/spells/aid"}]}"#,
        )])
        .await;
        let client = RulesClient::new(&base_url, Duration::from_secs(5)).unwrap();

        let index = client.index("spells").await.unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index[1].name, "Aid");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn fetch_by_url_resolves_against_origin() {
        let (base_url, server) = serve(vec![(200, r#"{"index":"aid","name":"Aid"}"#)]).await;
        let client = RulesClient::new(&base_url, Duration::from_secs(5)).unwrap();

        let aid = client.fetch_by_url("/api/spells/aid").await.unwrap();
        assert_eq!(aid.map(|r| r.index), Some("aid".to_string()));
        let requests = server.await.unwrap();
        assert_eq!(requests[0], "GET /api/spells/aid HTTP/1.1");
    }

    #[tokio::test]
    async fn index_matches_follow_the_reference_url() {
        let (base_url, server) = serve(vec![
            (404, r#"{"error":"Not found"}"#),
            (
                200,
                r#"{"count":1,"results":[{"index":"cure-wounds","name":"Cure Wounds","url":"/srd/spells/cure-wounds"}]}"#,
            ),
            (200, r#"{"index":"cure-wounds","name":"Cure Wounds","desc":["Heals."]}"#),
        ])
        .await;
        let client = RulesClient::new(&base_url, Duration::from_secs(5)).unwrap();
        let service = RulesService::new(std::sync::Arc::new(client));

        let entry = service.resolve("cure wound", LookupKind::Spell).await;
        assert_eq!(entry.map(|e| e.name), Some("Cure Wounds".to_string()));

        let requests = server.await.unwrap();
        assert_eq!(
            requests,
            vec![
                "GET /api/spells/cure-wound HTTP/1.1",
                "GET /api/spells HTTP/1.1",
                "GET /srd/spells/cure-wounds HTTP/1.1",
            ]
        );
    }

    #[test]
    fn origin_strips_path() {
        assert_eq!(origin("https://www.dnd5eapi.co/api"), "https://www.dnd5eapi.co");
        assert_eq!(origin("http://127.0.0.1:8080"), "http://127.0.0.1:8080");
        assert_eq!(origin("http://host/"), "http://host");
    }
}
