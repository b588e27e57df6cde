use reqwest::{Client, Response};
use serde_json::Value as JsonValue;
use url::Url;

use crate::api::error::{
    error_for_status, internal_error, invalid_argument, network_error, ApiError, ApiResult,
};
use crate::api::request::ApiRequest;
use crate::api::url::ResourceUrlResolver;
use crate::api::LOGGER;
use crate::http::DefaultHeaders;

/// Issues Web API requests with the shared default headers.
///
/// Clones share the underlying connection pool and header set, so every
/// resource client sees the bearer token as soon as the session installs it.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    headers: DefaultHeaders,
    resolver: ResourceUrlResolver,
}

impl ApiClient {
    pub fn new(headers: DefaultHeaders) -> ApiResult<Self> {
        let http = Client::builder()
            .build()
            .map_err(|err| internal_error(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            http,
            headers,
            resolver: ResourceUrlResolver::default(),
        })
    }

    pub fn with_resolver(mut self, resolver: ResourceUrlResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.resolver = self.resolver.with_base(base);
        self
    }

    pub fn headers(&self) -> &DefaultHeaders {
        &self.headers
    }

    pub fn resolver(&self) -> &ResourceUrlResolver {
        &self.resolver
    }

    /// Sends `request` and returns the decoded JSON body.
    ///
    /// An empty success body (e.g. `204 No Content` from `PUT me/tracks`)
    /// yields `JsonValue::Null`. Requests are not retried.
    pub async fn send(&self, request: ApiRequest) -> ApiResult<JsonValue> {
        let ApiRequest {
            method,
            endpoint,
            query,
            body,
        } = request;

        let raw_url = self.resolver.resolve(&endpoint);
        let mut url = Url::parse(&raw_url)
            .map_err(|err| invalid_argument(format!("invalid request URL '{raw_url}': {err}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }

        LOGGER.debug(format!("{method} {}", url.path()));

        let mut builder = self.http.request(method.clone(), url);
        for (name, value) in self.headers.snapshot() {
            builder = builder.header(name, value);
        }
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let result = handle_response(response).await;
        if let Err(err) = &result {
            LOGGER.warn(format!("{method} {endpoint} failed: {err}"));
        }
        result
    }
}

async fn handle_response(response: Response) -> ApiResult<JsonValue> {
    let status = response.status().as_u16();
    let bytes = response
        .bytes()
        .await
        .map_err(|err| network_error(format!("failed to read response body: {err}")))?;

    if let Some(error) = error_for_status(status, &bytes) {
        return Err(error);
    }
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(JsonValue::Null);
    }
    serde_json::from_slice(&bytes)
        .map_err(|err| internal_error(format!("response is not valid JSON: {err}")))
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_builder() {
        return invalid_argument(format!("malformed request: {err}"));
    }
    if err.is_timeout() {
        return network_error(format!("request timed out: {err}"));
    }
    if is_connect(&err) {
        return network_error(format!("failed to connect: {err}"));
    }
    if err.is_decode() {
        return internal_error(format!("unable to decode response: {err}"));
    }
    network_error(format!("request failed: {err}"))
}

#[cfg(not(target_arch = "wasm32"))]
fn is_connect(err: &reqwest::Error) -> bool {
    err.is_connect()
}

#[cfg(target_arch = "wasm32")]
fn is_connect(_err: &reqwest::Error) -> bool {
    false
}
