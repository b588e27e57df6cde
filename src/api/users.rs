use serde_json::Value as JsonValue;

use crate::api::error::ApiResult;
use crate::api::request::ApiRequest;
use crate::api::transport::ApiClient;
use crate::api::url::encode_segment;

/// Public user profiles and the playlists they own or follow.
#[derive(Clone, Debug)]
pub struct Users {
    client: ApiClient,
    playlists: Playlists,
}

impl Users {
    pub fn new(client: ApiClient) -> Self {
        Self {
            playlists: Playlists::new(client.clone()),
            client,
        }
    }

    /// `GET users/{user_id}`
    pub async fn info(&self, user_id: &str) -> ApiResult<JsonValue> {
        self.client
            .send(ApiRequest::get(format!("users/{}", encode_segment(user_id))))
            .await
    }

    pub fn playlists(&self) -> &Playlists {
        &self.playlists
    }
}

/// Playlist management under `users/{user_id}/playlists`.
#[derive(Clone, Debug)]
pub struct Playlists {
    client: ApiClient,
}

impl Playlists {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn collection(user_id: &str) -> String {
        format!("users/{}/playlists", encode_segment(user_id))
    }

    fn playlist(user_id: &str, playlist_id: &str, suffix: &str) -> String {
        format!(
            "{}/{}{suffix}",
            Self::collection(user_id),
            encode_segment(playlist_id)
        )
    }

    /// Playlists owned or followed by `user_id`.
    pub async fn list(&self, user_id: &str, params: &[(&str, &str)]) -> ApiResult<JsonValue> {
        self.client
            .send(ApiRequest::get(Self::collection(user_id)).with_params(params))
            .await
    }

    pub async fn get(&self, user_id: &str, playlist_id: &str) -> ApiResult<JsonValue> {
        self.client
            .send(ApiRequest::get(Self::playlist(user_id, playlist_id, "")))
            .await
    }

    pub async fn tracks(
        &self,
        user_id: &str,
        playlist_id: &str,
        params: &[(&str, &str)],
    ) -> ApiResult<JsonValue> {
        self.client
            .send(ApiRequest::get(Self::playlist(user_id, playlist_id, "/tracks")).with_params(params))
            .await
    }

    /// Creates an empty playlist; `body` carries `name` and optionally
    /// `public`.
    pub async fn create(&self, user_id: &str, body: JsonValue) -> ApiResult<JsonValue> {
        self.client
            .send(ApiRequest::post(Self::collection(user_id)).with_body(body))
            .await
    }

    /// Changes name or visibility of a playlist the user owns.
    pub async fn edit(
        &self,
        user_id: &str,
        playlist_id: &str,
        body: JsonValue,
    ) -> ApiResult<JsonValue> {
        self.client
            .send(ApiRequest::put(Self::playlist(user_id, playlist_id, "")).with_body(body))
            .await
    }

    /// Adds track URIs, appending unless a zero-based `position` is given.
    pub async fn add_tracks<I, S>(
        &self,
        user_id: &str,
        playlist_id: &str,
        uris: I,
        position: Option<u32>,
    ) -> ApiResult<JsonValue>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut request =
            ApiRequest::post(Self::playlist(user_id, playlist_id, "/tracks")).with_list("uris", uris);
        if let Some(position) = position {
            request = request.with_query("position", position.to_string());
        }
        self.client.send(request).await
    }

    /// `body` is `{"tracks":[{"uri":..,"positions":[..]}]}`.
    pub async fn remove_tracks(
        &self,
        user_id: &str,
        playlist_id: &str,
        body: JsonValue,
    ) -> ApiResult<JsonValue> {
        self.client
            .send(ApiRequest::delete(Self::playlist(user_id, playlist_id, "/tracks")).with_body(body))
            .await
    }

    /// Overwrites all tracks; an empty list clears the playlist.
    pub async fn replace_tracks<I, S>(
        &self,
        user_id: &str,
        playlist_id: &str,
        uris: I,
    ) -> ApiResult<JsonValue>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let uris: Vec<String> = uris.into_iter().map(|uri| uri.as_ref().to_string()).collect();
        self.client
            .send(
                ApiRequest::put(Self::playlist(user_id, playlist_id, "/tracks"))
                    .with_query("uris", uris.join(",")),
            )
            .await
    }

    pub async fn follow(&self, owner_id: &str, playlist_id: &str) -> ApiResult<JsonValue> {
        self.client
            .send(ApiRequest::put(Self::playlist(owner_id, playlist_id, "/followers")))
            .await
    }

    pub async fn unfollow(&self, owner_id: &str, playlist_id: &str) -> ApiResult<JsonValue> {
        self.client
            .send(ApiRequest::delete(Self::playlist(owner_id, playlist_id, "/followers")))
            .await
    }
}
