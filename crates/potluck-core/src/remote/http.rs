//! HTTP remote store adapter
//!
//! Speaks the PostgREST dialect the hosted deployment exposes: the
//! `guest_list` table lives under `/rest/v1/`, filters are query params
//! (`id=eq.<uuid>`), and the `Prefer` header controls whether mutated rows
//! come back in the response.
//!
//! Updates and deletes request `return=representation` so an `eq` filter
//! that matched nothing (2xx with zero rows) can be reported as a failure
//! instead of a silent success.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::json;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{RemoteError, RemoteResult, RemoteStore};
use crate::models::{Item, NewItem};

/// Name of the persisted collection
const TABLE: &str = "guest_list";

/// PostgREST-dialect implementation of [`RemoteStore`]
pub struct HttpRemoteStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpRemoteStore {
    /// Build an adapter for the service at `service_url`
    ///
    /// `service_url` is the service root (e.g. `https://abc.example.co`);
    /// the REST prefix and table name are appended here.
    pub fn new(service_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: service_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, TABLE)
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(key) = HeaderValue::from_str(&self.api_key) {
            headers.insert("apikey", key);
        }
        if let Ok(bearer) = HeaderValue::from_str(&format!("Bearer {}", self.api_key)) {
            headers.insert(AUTHORIZATION, bearer);
        }
        headers
    }

    /// Send a PATCH for one row and fail if no row matched the id
    async fn patch_row(
        &self,
        id: Uuid,
        body: serde_json::Value,
    ) -> Result<(), String> {
        let response = self
            .client
            .patch(self.table_url())
            .headers(self.auth_headers())
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await
            .map_err(|e| e.to_string())?
            .error_for_status()
            .map_err(|e| e.to_string())?;

        let rows: Vec<Item> = response.json().await.map_err(|e| e.to_string())?;
        if rows.is_empty() {
            return Err(format!("no row matched id {}", id));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn list_all(&self) -> RemoteResult<Vec<Item>> {
        debug!("GET {} (ordered by created_at)", self.table_url());

        let items = self
            .client
            .get(self.table_url())
            .headers(self.auth_headers())
            .query(&[("select", "*"), ("order", "created_at.asc")])
            .send()
            .await
            .map_err(|e| RemoteError::Fetch(e.to_string()))?
            .error_for_status()
            .map_err(|e| RemoteError::Fetch(e.to_string()))?
            .json::<Vec<Item>>()
            .await
            .map_err(|e| RemoteError::Fetch(e.to_string()))?;

        debug!("fetched {} item(s)", items.len());
        Ok(items)
    }

    async fn create(&self, item: NewItem) -> RemoteResult<()> {
        debug!("POST {} task={:?}", self.table_url(), item.task_name);

        // return=minimal: the contract deliberately does not hand the new
        // row back; the controller re-derives it via reload.
        self.client
            .post(self.table_url())
            .headers(self.auth_headers())
            .header("Prefer", "return=minimal")
            .json(&item)
            .send()
            .await
            .map_err(|e| RemoteError::Insert(e.to_string()))?
            .error_for_status()
            .map_err(|e| {
                warn!("insert rejected: {}", e);
                RemoteError::Insert(e.to_string())
            })?;

        Ok(())
    }

    async fn set_completed(&self, id: Uuid, completed: bool) -> RemoteResult<()> {
        debug!("PATCH {} id={} is_completed={}", self.table_url(), id, completed);

        self.patch_row(id, json!({ "is_completed": completed }))
            .await
            .map_err(RemoteError::Update)
    }

    async fn rename(&self, id: Uuid, task_name: &str) -> RemoteResult<()> {
        debug!("PATCH {} id={} task_name={:?}", self.table_url(), id, task_name);

        self.patch_row(id, json!({ "task_name": task_name }))
            .await
            .map_err(RemoteError::Update)
    }

    async fn remove(&self, id: Uuid) -> RemoteResult<()> {
        debug!("DELETE {} id={}", self.table_url(), id);

        let response = self
            .client
            .delete(self.table_url())
            .headers(self.auth_headers())
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .send()
            .await
            .map_err(|e| RemoteError::Delete(e.to_string()))?
            .error_for_status()
            .map_err(|e| RemoteError::Delete(e.to_string()))?;

        let rows: Vec<Item> = response
            .json()
            .await
            .map_err(|e| RemoteError::Delete(e.to_string()))?;
        if rows.is_empty() {
            return Err(RemoteError::Delete(format!("no row matched id {}", id)));
        }
        Ok(())
    }
}
