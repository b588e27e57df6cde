use serde_json::Value as JsonValue;

use crate::api::error::ApiResult;
use crate::api::request::ApiRequest;
use crate::api::transport::ApiClient;
use crate::api::url::encode_segment;

pub const DEFAULT_TOP_TRACKS_COUNTRY: &str = "US";

#[derive(Clone, Debug)]
pub struct Artists {
    client: ApiClient,
}

impl Artists {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn path(id: &str, suffix: &str) -> String {
        format!("artists/{}{suffix}", encode_segment(id))
    }

    pub async fn get(&self, id: &str) -> ApiResult<JsonValue> {
        self.client.send(ApiRequest::get(Self::path(id, ""))).await
    }

    pub async fn several<I, S>(&self, ids: I) -> ApiResult<JsonValue>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.client
            .send(ApiRequest::get("artists").with_list("ids", ids))
            .await
    }

    pub async fn albums(&self, id: &str, params: &[(&str, &str)]) -> ApiResult<JsonValue> {
        self.client
            .send(ApiRequest::get(Self::path(id, "/albums")).with_params(params))
            .await
    }

    /// Top tracks in `country`, or in the US when `None`.
    pub async fn top_tracks(&self, id: &str, country: Option<&str>) -> ApiResult<JsonValue> {
        let country = country.unwrap_or(DEFAULT_TOP_TRACKS_COUNTRY);
        self.client
            .send(ApiRequest::get(Self::path(id, "/top-tracks")).with_query("country", country))
            .await
    }

    pub async fn related_artists(&self, id: &str) -> ApiResult<JsonValue> {
        self.client
            .send(ApiRequest::get(Self::path(id, "/related-artists")))
            .await
    }
}
