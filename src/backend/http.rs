//! HTTP record store adapter.
//!
//! Speaks JSON to the hosted record service. Every table exposes the same
//! five endpoints under `{base_url}/tables/{table}/records`.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;

use super::{BulkResponse, Query, Record, RecordStore, StoreError, StoreResponse};

/// Connection settings for [`HttpStore`].
#[derive(Clone, Debug)]
pub struct HttpStoreOptions {
    pub base_url: String,
    pub project_id: String,
    pub public_key: String,
    pub timeout: Duration,
}

/// Record store reached over HTTP.
pub struct HttpStore {
    client: Client,
    options: HttpStoreOptions,
}

impl HttpStore {
    pub fn new(options: HttpStoreOptions) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|e| StoreError::Other(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, options })
    }

    fn url(&self, table: &str, suffix: &str) -> String {
        format!(
            "{}/tables/{}/records{}",
            self.options.base_url.trim_end_matches('/'),
            table,
            suffix
        )
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("ApperProjectId", &self.options.project_id)
            .header("ApperPublicKey", &self.options.public_key)
    }

    /// Send the request and decode the envelope. Error statuses that still
    /// carry an envelope are returned as-is so the caller sees the store's
    /// rejection message.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StoreError> {
        let response = request.send().await.map_err(|e| StoreError::Network(e.to_string()))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| StoreError::Network(e.to_string()))?;
        debug!("Record store responded {} ({} bytes)", status, body.len());

        match serde_json::from_str::<T>(&body) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => Err(StoreError::Http {
                status: status.as_u16(),
                body,
            }),
            Err(e) => Err(StoreError::InvalidData(format!("Unexpected response body: {}", e))),
        }
    }
}

#[async_trait]
impl RecordStore for HttpStore {
    fn store_type(&self) -> &str {
        "http"
    }

    async fn fetch_records(&self, table: &str, query: &Query) -> Result<StoreResponse<Vec<Record>>, StoreError> {
        let request = self.request(Method::POST, self.url(table, "/fetch")).json(query);
        self.send(request).await
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: i64,
        query: &Query,
    ) -> Result<StoreResponse<Record>, StoreError> {
        let request = self
            .request(Method::POST, self.url(table, &format!("/{}/fetch", id)))
            .json(query);
        self.send(request).await
    }

    async fn create_records(&self, table: &str, records: Vec<Record>) -> Result<BulkResponse, StoreError> {
        let request = self
            .request(Method::POST, self.url(table, ""))
            .json(&json!({ "records": records }));
        self.send(request).await
    }

    async fn update_records(&self, table: &str, records: Vec<Record>) -> Result<BulkResponse, StoreError> {
        let request = self
            .request(Method::PUT, self.url(table, ""))
            .json(&json!({ "records": records }));
        self.send(request).await
    }

    async fn delete_records(&self, table: &str, ids: Vec<i64>) -> Result<BulkResponse, StoreError> {
        let request = self
            .request(Method::DELETE, self.url(table, ""))
            .json(&json!({ "RecordIds": ids }));
        self.send(request).await
    }
}
