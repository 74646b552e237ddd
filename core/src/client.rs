//! Stateless HTTP request builder and response parser for the wallet API.
//!
//! # Design
//! `WalletClient` holds only the base URL, the authorization header value and
//! the API revision, and carries no mutable state between calls. Each
//! operation is split into a `build_*` method that validates its arguments and
//! produces an `HttpRequest`, and a `parse_*` method that consumes an
//! `HttpResponse`. The resource-specific methods live in the `pass`,
//! `project` and `template` submodules.

mod pass;
mod project;
mod template;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::{ClientConfig, DEFAULT_API_REVISION};
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::ResourceId;

/// Synchronous, stateless client for the wallet API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. Use `BlockingClient` to have the round-trip
/// performed for you.
#[derive(Clone)]
pub struct WalletClient {
    base_url: String,
    authorization: Option<String>,
    api_revision: String,
}

impl WalletClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            authorization: None,
            api_revision: DEFAULT_API_REVISION.to_string(),
        }
    }

    /// Authenticate every request with HTTP Basic credentials.
    pub fn with_credentials(mut self, username: &str, api_key: &str) -> Self {
        let token = STANDARD.encode(format!("{username}:{api_key}"));
        self.authorization = Some(format!("Basic {token}"));
        self
    }

    pub fn with_api_revision(mut self, revision: &str) -> Self {
        self.api_revision = revision.to_string();
        self
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let client = Self::new(&config.base_url).with_api_revision(&config.api_revision);
        match config.credentials() {
            Some((username, api_key)) => client.with_credentials(username, api_key),
            None => client,
        }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::from_config(&ClientConfig::from_env()?))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `<base>/<resource>/<id segment><suffix>`
    fn resource_url(&self, resource: &str, id: &ResourceId, suffix: &str) -> Result<String> {
        Ok(format!(
            "{}/{resource}/{}{suffix}",
            self.base_url,
            id.path_segment()?
        ))
    }

    fn collection_url(&self, resource: &str, suffix: &str) -> String {
        format!("{}/{resource}{suffix}", self.base_url)
    }

    fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![
            ("accept".to_string(), "application/json".to_string()),
            ("api-revision".to_string(), self.api_revision.clone()),
        ];
        if let Some(authorization) = &self.authorization {
            headers.push(("authorization".to_string(), authorization.clone()));
        }
        headers
    }

    fn request(&self, method: HttpMethod, path: String) -> HttpRequest {
        HttpRequest {
            method,
            path,
            headers: self.headers(),
            body: None,
        }
    }

    fn json_request<T>(&self, method: HttpMethod, path: String, body: &T) -> Result<HttpRequest>
    where
        T: Serialize + ?Sized,
    {
        let body =
            serde_json::to_string(body).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        let mut request = self.request(method, path);
        request
            .headers
            .push(("content-type".to_string(), "application/json".to_string()));
        request.body = Some(body);
        Ok(request)
    }
}

impl std::fmt::Debug for WalletClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.authorization.is_some())
            .field("api_revision", &self.api_revision)
            .finish()
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }
    log::warn!("wallet API answered HTTP {}", response.status);
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.text(),
    })
}

fn parse_json<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
    check_status(response)?;
    serde_json::from_slice(&response.body)
        .map_err(|e| ApiError::DeserializationError(e.to_string()))
}

fn parse_empty(response: &HttpResponse) -> Result<()> {
    check_status(response)
}

/// Deserialize the objects in the array under `key` of a JSON object body.
/// A missing or null key is an empty list; non-object entries are skipped.
fn parse_list<T: DeserializeOwned>(response: &HttpResponse, key: &str) -> Result<Vec<T>> {
    let body: Value = parse_json(response)?;
    let entries = match body.get(key) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            return Err(ApiError::DeserializationError(format!(
                "`{key}` is not an array"
            )))
        }
    };
    entries
        .iter()
        .filter(|entry| entry.is_object())
        .map(|entry| {
            T::deserialize(entry).map_err(|e| ApiError::DeserializationError(e.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> WalletClient {
        WalletClient::new("http://localhost:3000")
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = WalletClient::new("http://localhost:3000/");
        assert_eq!(client.base_url(), "http://localhost:3000");
    }

    #[test]
    fn default_headers_without_credentials() {
        let req = client().request(HttpMethod::Get, "http://localhost:3000/pass".to_string());
        assert_eq!(
            req.headers,
            vec![
                ("accept".to_string(), "application/json".to_string()),
                ("api-revision".to_string(), "1.2".to_string()),
            ]
        );
        assert!(req.header("authorization").is_none());
    }

    #[test]
    fn credentials_become_basic_auth() {
        let client = client().with_credentials("acme", "secret");
        let req = client.request(HttpMethod::Get, "x".to_string());
        // base64("acme:secret")
        assert_eq!(req.header("authorization"), Some("Basic YWNtZTpzZWNyZXQ="));
    }

    #[test]
    fn config_applies_revision_and_credentials() {
        let config = ClientConfig {
            base_url: "http://wallet.test/v1/".to_string(),
            username: Some("acme".to_string()),
            api_key: Some("secret".to_string()),
            api_revision: "1.1".to_string(),
        };
        let client = WalletClient::from_config(&config);
        assert_eq!(client.base_url(), "http://wallet.test/v1");
        let req = client.request(HttpMethod::Get, "x".to_string());
        assert_eq!(req.header("api-revision"), Some("1.1"));
        assert!(req.header("authorization").is_some());
    }

    #[test]
    fn debug_hides_authorization() {
        let client = client().with_credentials("acme", "secret");
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("YWNtZTpzZWNyZXQ="));
        assert!(rendered.contains("authenticated: true"));
    }

    #[test]
    fn json_request_sets_content_type() {
        let req = client()
            .json_request(HttpMethod::Post, "x".to_string(), &serde_json::json!({"a": 1}))
            .unwrap();
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.body.as_deref(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn status_mapping() {
        assert!(check_status(&HttpResponse::new(201, "")).is_ok());
        assert!(matches!(
            check_status(&HttpResponse::new(404, "")),
            Err(ApiError::NotFound)
        ));
        assert!(matches!(
            check_status(&HttpResponse::new(401, "denied")),
            Err(ApiError::HttpError { status: 401, ref body }) if body == "denied"
        ));
    }

    #[test]
    fn list_skips_non_objects_and_tolerates_missing_key() {
        #[derive(serde::Deserialize)]
        struct Item {
            id: i64,
        }
        let response = HttpResponse::new(200, r#"{"items":[{"id":1},"junk",{"id":2}]}"#);
        let items: Vec<Item> = parse_list(&response, "items").unwrap();
        assert_eq!(items.iter().map(|i| i.id).collect::<Vec<_>>(), vec![1, 2]);

        let response = HttpResponse::new(200, r#"{"count":0}"#);
        let items: Vec<Item> = parse_list(&response, "items").unwrap();
        assert!(items.is_empty());

        let response = HttpResponse::new(200, r#"{"items":5}"#);
        assert!(matches!(
            parse_list::<Item>(&response, "items"),
            Err(ApiError::DeserializationError(_))
        ));
    }
}
