use serde_json::Value as JsonValue;

use crate::api::error::ApiResult;
use crate::api::request::ApiRequest;
use crate::api::transport::ApiClient;

/// Playlists and releases featured on the Browse tab.
#[derive(Clone, Debug)]
pub struct Browse {
    client: ApiClient,
}

impl Browse {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn featured_playlists(&self, params: &[(&str, &str)]) -> ApiResult<JsonValue> {
        self.client
            .send(ApiRequest::get("browse/featured-playlists").with_params(params))
            .await
    }

    pub async fn new_releases(&self, params: &[(&str, &str)]) -> ApiResult<JsonValue> {
        self.client
            .send(ApiRequest::get("browse/new-releases").with_params(params))
            .await
    }
}
