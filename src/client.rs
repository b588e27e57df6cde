//! One-stop entry point combining the authorization session with the
//! resource clients.

use std::fmt;
use std::sync::Arc;

use crate::api::{
    Albums, ApiClient, ApiError, Artists, Browse, Me, ResourceUrlResolver, Search, Tracks, Users,
};
use crate::auth::{AuthConfig, AuthError, AuthorizationSession, SessionBuilder};
use crate::cache::StateCache;
use crate::http::DefaultHeaders;
use crate::platform::{FragmentSource, Navigator};

#[derive(Debug, Clone)]
pub enum SpotifyError {
    Auth(AuthError),
    Api(ApiError),
}

impl fmt::Display for SpotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpotifyError::Auth(err) => write!(f, "{err}"),
            SpotifyError::Api(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SpotifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpotifyError::Auth(err) => Some(err),
            SpotifyError::Api(err) => Some(err),
        }
    }
}

impl From<AuthError> for SpotifyError {
    fn from(error: AuthError) -> Self {
        SpotifyError::Auth(error)
    }
}

impl From<ApiError> for SpotifyError {
    fn from(error: ApiError) -> Self {
        SpotifyError::Api(error)
    }
}

pub type SpotifyResult<T> = Result<T, SpotifyError>;

/// Authorization session plus resource clients sharing one header set.
#[derive(Debug)]
pub struct Spotify {
    session: AuthorizationSession,
    albums: Albums,
    artists: Artists,
    browse: Browse,
    me: Me,
    search: Search,
    tracks: Tracks,
    users: Users,
}

impl Spotify {
    pub fn builder(config: AuthConfig) -> SpotifyBuilder {
        SpotifyBuilder::new(config)
    }

    /// Builds with the configuration advertised by the environment and the
    /// platform's default cache and location.
    pub fn from_environment() -> SpotifyResult<Self> {
        SpotifyBuilder::new(AuthConfig::from_environment()?).build()
    }

    pub fn auth(&self) -> &AuthorizationSession {
        &self.session
    }

    pub fn headers(&self) -> &DefaultHeaders {
        self.session.headers()
    }

    pub fn albums(&self) -> &Albums {
        &self.albums
    }

    pub fn artists(&self) -> &Artists {
        &self.artists
    }

    pub fn browse(&self) -> &Browse {
        &self.browse
    }

    pub fn me(&self) -> &Me {
        &self.me
    }

    pub fn search(&self) -> &Search {
        &self.search
    }

    pub fn tracks(&self) -> &Tracks {
        &self.tracks
    }

    pub fn users(&self) -> &Users {
        &self.users
    }
}

pub struct SpotifyBuilder {
    session: SessionBuilder,
    resolver: ResourceUrlResolver,
}

impl SpotifyBuilder {
    fn new(config: AuthConfig) -> Self {
        Self {
            session: AuthorizationSession::builder(config),
            resolver: ResourceUrlResolver::default(),
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn StateCache>) -> Self {
        self.session = self.session.with_cache(cache);
        self
    }

    pub fn with_location<L>(mut self, location: Arc<L>) -> Self
    where
        L: FragmentSource + Navigator + 'static,
    {
        self.session = self.session.with_location(location);
        self
    }

    pub fn with_fragment_source(mut self, source: Arc<dyn FragmentSource>) -> Self {
        self.session = self.session.with_fragment_source(source);
        self
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.session = self.session.with_navigator(navigator);
        self
    }

    pub fn with_authorization_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.session = self.session.with_authorization_endpoint(endpoint);
        self
    }

    /// Sends resource requests to another host, e.g. a mock server.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.resolver = self.resolver.with_base(base);
        self
    }

    /// Evaluates the current page load and wires the resource clients to the
    /// session's headers.
    pub fn build(self) -> SpotifyResult<Spotify> {
        let headers = DefaultHeaders::new();
        let api = ApiClient::new(headers.clone())?.with_resolver(self.resolver);
        let session = self.session.with_headers(headers).initialize()?;

        Ok(Spotify {
            session,
            albums: Albums::new(api.clone()),
            artists: Artists::new(api.clone()),
            browse: Browse::new(api.clone()),
            me: Me::new(api.clone()),
            search: Search::new(api.clone()),
            tracks: Tracks::new(api.clone()),
            users: Users::new(api),
        })
    }
}
