use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use common::TokenStore;

use crate::error::{extract_message, ApiError};
use crate::state::AuthState;

/// The one configured HTTP client a portal talks through. Attaches the
/// bearer credential to every request, tags each request with an
/// `X-Request-Id`, and turns a 401 on any non-public endpoint into a full
/// session wipe. Every other outcome passes through untouched; there is
/// deliberately no caching or retry logic here.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    auth: Arc<AuthState>,
    store: Arc<dyn TokenStore>,
    public_paths: Arc<Vec<String>>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        auth: Arc<AuthState>,
        store: Arc<dyn TokenStore>,
        public_paths: Vec<String>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
            store,
            public_paths: Arc::new(public_paths),
        })
    }

    pub fn auth(&self) -> Arc<AuthState> {
        self.auth.clone()
    }

    pub fn store(&self) -> Arc<dyn TokenStore> {
        self.store.clone()
    }

    // Substring match, same as the portals have always done it. Note this
    // means `/doctors/` also covers nested sub-resources such as
    // `/doctors/{id}/available_slots/`.
    fn is_public(&self, path: &str) -> bool {
        self.public_paths.iter().any(|p| path.contains(p.as_str()))
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let request_id = Uuid::new_v4();

        let mut req = self
            .http
            .request(method.clone(), &url)
            .header("X-Request-Id", request_id.to_string());
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(token) = self.auth.access_token() {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }

        debug!(%method, path, %request_id, "dispatching request");
        let resp = req.send().await?;
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED && !self.is_public(path) {
            warn!(path, %request_id, "401 on protected endpoint, dropping session");
            self.auth.clear();
            if let Err(err) = self.store.clear() {
                warn!(%err, "failed to clear stored tokens");
            }
            self.auth.mark_expired();
            return Err(ApiError::SessionExpired);
        }

        if !status.is_success() {
            let body: Option<Value> = resp.json().await.ok();
            let message = body.as_ref().and_then(extract_message);
            warn!(
                path,
                status = status.as_u16(),
                %request_id,
                message = message.as_deref().unwrap_or(""),
                "request failed"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
                body,
            });
        }

        debug!(path, status = status.as_u16(), %request_id, "request ok");
        Ok(resp)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        Ok(self.send(Method::GET, path, &[], None).await?.json().await?)
    }

    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        Ok(self.send(Method::GET, path, query, None).await?.json().await?)
    }

    /// List fetch with the collection shape normalized once, here: the
    /// backend answers some listings as a bare array and others as
    /// `{"results": [...]}`.
    pub async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, ApiError> {
        let value: Value = self.send(Method::GET, path, query, None).await?.json().await?;
        Ok(normalize_collection(value)?)
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)?;
        Ok(self
            .send(Method::POST, path, &[], Some(body))
            .await?
            .json()
            .await?)
    }

    /// POST with an empty object body (the action endpoints).
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        Ok(self
            .send(Method::POST, path, &[], Some(Value::Object(Default::default())))
            .await?
            .json()
            .await?)
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)?;
        Ok(self
            .send(Method::PUT, path, &[], Some(body))
            .await?
            .json()
            .await?)
    }

    pub async fn patch<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)?;
        Ok(self
            .send(Method::PATCH, path, &[], Some(body))
            .await?
            .json()
            .await?)
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(Method::DELETE, path, &[], None).await?;
        Ok(())
    }
}

fn normalize_collection<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, serde_json::Error> {
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum ListPayload<T> {
        Paginated { results: Vec<T> },
        Plain(Vec<T>),
    }

    Ok(match serde_json::from_value::<ListPayload<T>>(value)? {
        ListPayload::Paginated { results } => results,
        ListPayload::Plain(items) => items,
    })
}
