use serde_json::Value as JsonValue;

use crate::api::error::ApiResult;
use crate::api::request::ApiRequest;
use crate::api::transport::ApiClient;
use crate::api::url::encode_segment;

#[derive(Clone, Debug)]
pub struct Tracks {
    client: ApiClient,
}

impl Tracks {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: &str) -> ApiResult<JsonValue> {
        self.client
            .send(ApiRequest::get(format!("tracks/{}", encode_segment(id))))
            .await
    }

    pub async fn several<I, S>(&self, ids: I) -> ApiResult<JsonValue>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.client
            .send(ApiRequest::get("tracks").with_list("ids", ids))
            .await
    }
}
