use gloo::net::http::Request;
use serde::de::DeserializeOwned;
use shared::{ApiEnvelope, ApiError, PageMeta};

use crate::hooks::use_paginated_fetch::{PageFuture, PageSource};
use crate::hooks::use_table_query::TableQueryState;
use crate::services::session;

/// API client for communicating with the marketplace backend.
#[derive(Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    /// Create a new API client with the default base URL
    pub fn new() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
        }
    }

    /// Create a new API client with a custom base URL
    pub fn with_base_url(base_url: String) -> Self {
        Self { base_url }
    }

    /// Fetch one page of a paginated list resource.
    ///
    /// The query string always carries `page` and `limit`; search, sort
    /// and filters only while active. A 2xx envelope without `meta` is
    /// returned as-is and the caller synthesizes the metadata.
    pub async fn fetch_page<T>(
        &self,
        resource: &str,
        query: &TableQueryState,
    ) -> Result<(Vec<T>, Option<PageMeta>), ApiError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}?{}", self.base_url, resource, query.to_query_string());

        let mut request = Request::get(&url);
        if let Some(token) = session::get_token() {
            request = request.header("Authorization", &format!("Bearer {}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.ok() {
            // A rejected credential is stale; drop it so the next request
            // goes out unauthenticated.
            if response.status() == 401 {
                session::clear_token();
            }
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::Http {
                status: response.status(),
                body,
            });
        }

        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        if !envelope.success {
            return Err(ApiError::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| "Request rejected".to_string()),
            ));
        }

        Ok((envelope.data, envelope.meta))
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PageSource<T> for ApiClient
where
    T: DeserializeOwned + 'static,
{
    fn fetch(&self, resource: &str, query: &TableQueryState) -> PageFuture<T> {
        let client = self.clone();
        let resource = resource.to_string();
        let query = query.clone();
        Box::pin(async move { client.fetch_page(&resource, &query).await })
    }
}
