use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::auth::config::AuthConfig;
use crate::auth::error::AuthResult;

pub const DEFAULT_AUTHORIZATION_ENDPOINT: &str = "https://accounts.spotify.com/authorize";

/// Characters `encodeURIComponent` leaves untouched besides alphanumerics.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub(crate) fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Composes authorization request URLs for the implicit-grant flow.
///
/// The builder is side-effect free: the state value, when used, is created
/// and cached by the session and only passed in here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationUrlBuilder {
    endpoint: String,
}

impl Default for AuthorizationUrlBuilder {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_AUTHORIZATION_ENDPOINT.to_string(),
        }
    }
}

impl AuthorizationUrlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Targets a different authorization endpoint, e.g. a local test server.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Builds
    /// `<endpoint>?client_id=..&response_type=..&redirect_uri=..&scope=..&show_dialog=..[&state=..]`.
    ///
    /// `state` is appended only when `config.use_state` is set and the value
    /// is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`crate::auth::AuthError::InvalidConfig`] when the client id or
    /// redirect URI is empty.
    pub fn build(&self, config: &AuthConfig, state: Option<&str>) -> AuthResult<String> {
        config.validate()?;

        let mut url = format!(
            "{}?client_id={}&response_type={}&redirect_uri={}&scope={}&show_dialog={}",
            self.endpoint,
            encode_component(&config.client_id),
            encode_component(&config.response_type),
            encode_component(&config.redirect_uri),
            encode_component(&config.scope),
            config.show_dialog,
        );

        if config.use_state {
            if let Some(state) = state.filter(|state| !state.is_empty()) {
                url.push_str("&state=");
                url.push_str(&encode_component(state));
            }
        }

        Ok(url)
    }
}
