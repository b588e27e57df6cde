use std::fmt;

use serde_json::Value as JsonValue;

use crate::api::error::ApiResult;
use crate::api::request::ApiRequest;
use crate::api::transport::ApiClient;

/// What a follow request targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FollowType {
    Artist,
    User,
}

impl FollowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FollowType::Artist => "artist",
            FollowType::User => "user",
        }
    }
}

impl fmt::Display for FollowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile, follows and saved tracks of the signed-in user.
#[derive(Clone, Debug)]
pub struct Me {
    client: ApiClient,
}

impl Me {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn profile(&self) -> ApiResult<JsonValue> {
        self.client.send(ApiRequest::get("me")).await
    }

    pub async fn follow<I, S>(&self, kind: FollowType, ids: I) -> ApiResult<JsonValue>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.client
            .send(following(ApiRequest::put("me/following"), kind, ids))
            .await
    }

    pub async fn unfollow<I, S>(&self, kind: FollowType, ids: I) -> ApiResult<JsonValue>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.client
            .send(following(ApiRequest::delete("me/following"), kind, ids))
            .await
    }

    /// One boolean per id, in request order.
    pub async fn following<I, S>(&self, kind: FollowType, ids: I) -> ApiResult<JsonValue>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.client
            .send(following(ApiRequest::get("me/following/contains"), kind, ids))
            .await
    }

    pub async fn save_tracks<I, S>(&self, ids: I) -> ApiResult<JsonValue>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.client
            .send(ApiRequest::put("me/tracks").with_list("ids", ids))
            .await
    }

    pub async fn tracks(&self, params: &[(&str, &str)]) -> ApiResult<JsonValue> {
        self.client
            .send(ApiRequest::get("me/tracks").with_params(params))
            .await
    }

    pub async fn delete_tracks<I, S>(&self, ids: I) -> ApiResult<JsonValue>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.client
            .send(ApiRequest::delete("me/tracks").with_list("ids", ids))
            .await
    }

    pub async fn has_tracks<I, S>(&self, ids: I) -> ApiResult<JsonValue>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.client
            .send(ApiRequest::get("me/tracks/contains").with_list("ids", ids))
            .await
    }
}

fn following<I, S>(request: ApiRequest, kind: FollowType, ids: I) -> ApiRequest
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    request.with_query("type", kind.as_str()).with_list("ids", ids)
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::test_support::{api_client_for, try_start_mock_server};
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test(flavor = "current_thread")]
    async fn profile_uses_bearer_token() {
        let Some(server) = try_start_mock_server() else {
            eprintln!("Skipping profile_uses_bearer_token: unable to start mock server");
            return;
        };
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/me")
                .header("authorization", "Bearer test-token");
            then.status(200).json_body(json!({"id": "wizzler"}));
        });

        let value = Me::new(api_client_for(&server)).profile().await.unwrap();

        mock.assert();
        assert_eq!(value["id"], "wizzler");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn follow_and_unfollow_send_type_and_ids() {
        let Some(server) = try_start_mock_server() else {
            eprintln!("Skipping follow_and_unfollow_send_type_and_ids: unable to start mock server");
            return;
        };
        let follow = server.mock(|when, then| {
            when.method(PUT)
                .path("/v1/me/following")
                .query_param("type", "artist")
                .query_param("ids", "a1,a2");
            then.status(204);
        });
        let unfollow = server.mock(|when, then| {
            when.method(DELETE)
                .path("/v1/me/following")
                .query_param("type", "user")
                .query_param("ids", "u1");
            then.status(204);
        });
        let contains = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/me/following/contains")
                .query_param("type", "artist")
                .query_param("ids", "a1");
            then.status(200).json_body(json!([true]));
        });

        let me = Me::new(api_client_for(&server));
        assert_eq!(me.follow(FollowType::Artist, ["a1", "a2"]).await.unwrap(), JsonValue::Null);
        me.unfollow(FollowType::User, ["u1"]).await.unwrap();
        let flags = me.following(FollowType::Artist, ["a1"]).await.unwrap();

        follow.assert();
        unfollow.assert();
        contains.assert();
        assert_eq!(flags, json!([true]));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn saved_tracks_round_trip() {
        let Some(server) = try_start_mock_server() else {
            eprintln!("Skipping saved_tracks_round_trip: unable to start mock server");
            return;
        };
        let save = server.mock(|when, then| {
            when.method(PUT).path("/v1/me/tracks").query_param("ids", "t1");
            then.status(200);
        });
        let list = server.mock(|when, then| {
            when.method(GET).path("/v1/me/tracks").query_param("offset", "20");
            then.status(200).json_body(json!({"items": []}));
        });
        let has = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/me/tracks/contains")
                .query_param("ids", "t1");
            then.status(200).json_body(json!([true]));
        });
        let delete = server.mock(|when, then| {
            when.method(DELETE).path("/v1/me/tracks").query_param("ids", "t1");
            then.status(200);
        });

        let me = Me::new(api_client_for(&server));
        me.save_tracks(["t1"]).await.unwrap();
        me.tracks(&[("offset", "20")]).await.unwrap();
        assert_eq!(me.has_tracks(["t1"]).await.unwrap(), json!([true]));
        me.delete_tracks(["t1"]).await.unwrap();

        save.assert();
        list.assert();
        has.assert();
        delete.assert();
    }
}
