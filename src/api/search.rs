use serde_json::Value as JsonValue;

use crate::api::error::ApiResult;
use crate::api::request::ApiRequest;
use crate::api::transport::ApiClient;

/// Keyword search over the catalog.
#[derive(Clone, Debug)]
pub struct Search {
    client: ApiClient,
}

impl Search {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `GET search?q=<query>&type=<kinds>`, where `kinds` is a comma-separated
    /// list of `album`, `artist`, `playlist` and `track`.
    pub async fn search(
        &self,
        query: &str,
        kinds: &str,
        params: &[(&str, &str)],
    ) -> ApiResult<JsonValue> {
        self.client
            .send(
                ApiRequest::get("search")
                    .with_query("q", query)
                    .with_query("type", kinds)
                    .with_params(params),
            )
            .await
    }

    pub async fn album(&self, query: &str) -> ApiResult<JsonValue> {
        self.search(query, "album", &[]).await
    }

    pub async fn artist(&self, query: &str) -> ApiResult<JsonValue> {
        self.search(query, "artist", &[]).await
    }

    pub async fn playlist(&self, query: &str) -> ApiResult<JsonValue> {
        self.search(query, "playlist", &[]).await
    }

    pub async fn track(&self, query: &str) -> ApiResult<JsonValue> {
        self.search(query, "track", &[]).await
    }
}
