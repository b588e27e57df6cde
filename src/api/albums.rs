use serde_json::Value as JsonValue;

use crate::api::error::ApiResult;
use crate::api::request::ApiRequest;
use crate::api::transport::ApiClient;
use crate::api::url::encode_segment;

/// Catalog information about albums.
#[derive(Clone, Debug)]
pub struct Albums {
    client: ApiClient,
}

impl Albums {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `GET albums/{id}`
    pub async fn get(&self, id: &str) -> ApiResult<JsonValue> {
        self.client
            .send(ApiRequest::get(format!("albums/{}", encode_segment(id))))
            .await
    }

    /// `GET albums?ids=..`
    pub async fn several<I, S>(&self, ids: I) -> ApiResult<JsonValue>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.client
            .send(ApiRequest::get("albums").with_list("ids", ids))
            .await
    }

    /// `GET albums/{id}/tracks`; `params` carries paging such as `limit`.
    pub async fn tracks(&self, id: &str, params: &[(&str, &str)]) -> ApiResult<JsonValue> {
        self.client
            .send(ApiRequest::get(format!("albums/{}/tracks", encode_segment(id))).with_params(params))
            .await
    }
}
