use std::fmt;
use std::sync::Arc;

use crate::auth::callback::CallbackParams;
use crate::auth::config::AuthConfig;
use crate::auth::error::{AuthError, AuthResult};
use crate::auth::state::RandomTokenGenerator;
use crate::auth::url::AuthorizationUrlBuilder;
use crate::auth::LOGGER;
use crate::cache::{create_cache, CacheOptions, StateCache};
use crate::http::DefaultHeaders;
use crate::platform::{FragmentSource, Navigator};

/// Cache key holding the CSRF state between `login()` and the callback.
pub const STATE_KEY: &str = "SPOTIFY_AUTH_STATE";
pub const AUTH_ERROR_MESSAGE: &str = "SPOTIFY_AUTH_ERROR";
pub const AUTH_REQUIRED_MESSAGE: &str = "SPOTIFY_AUTH_REQUIRED";

/// Outcome of evaluating the current page load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    /// A token arrived and passed the state check; it is now installed as the
    /// default `Authorization` header.
    Authorized,
    /// No token in the URL: the user has not been through `login()` yet.
    Required,
    /// A token arrived but its state was missing or did not match the cached
    /// one. The token is discarded.
    Error,
}

impl SessionStatus {
    /// Message code exposed to applications: `""`, `SPOTIFY_AUTH_REQUIRED`
    /// or `SPOTIFY_AUTH_ERROR`.
    pub fn message(self) -> &'static str {
        match self {
            SessionStatus::Authorized => "",
            SessionStatus::Required => AUTH_REQUIRED_MESSAGE,
            SessionStatus::Error => AUTH_ERROR_MESSAGE,
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Authorized => f.write_str("authorized"),
            SessionStatus::Required => f.write_str("authorization required"),
            SessionStatus::Error => f.write_str("authorization error"),
        }
    }
}

/// Decides the session status from the callback parameters and the cached
/// state. Pure; the caller applies the side effects.
pub fn evaluate_callback(
    config: &AuthConfig,
    params: &CallbackParams,
    stored_state: Option<&str>,
) -> SessionStatus {
    match params.access_token() {
        Some(_) if config.use_state && (params.state().is_none() || params.state() != stored_state) => {
            SessionStatus::Error
        }
        Some(_) => SessionStatus::Authorized,
        None => SessionStatus::Required,
    }
}

/// Authorization state of one page load.
///
/// The outcome is computed once, synchronously, by
/// [`SessionBuilder::initialize`] from the URL fragment and the state cache.
/// A session never changes status afterwards; [`AuthorizationSession::login`]
/// starts a new round trip whose result is seen by the session built on the
/// next page load.
pub struct AuthorizationSession {
    config: AuthConfig,
    status: SessionStatus,
    access_token: Option<String>,
    callback_error: Option<String>,
    cache: Arc<dyn StateCache>,
    navigator: Arc<dyn Navigator>,
    headers: DefaultHeaders,
    url_builder: AuthorizationUrlBuilder,
    tokens: RandomTokenGenerator,
}

impl fmt::Debug for AuthorizationSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationSession")
            .field("client_id", &self.config.client_id)
            .field("status", &self.status)
            .field("callback_error", &self.callback_error)
            .finish()
    }
}

impl AuthorizationSession {
    pub fn builder(config: AuthConfig) -> SessionBuilder {
        SessionBuilder::new(config)
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn authorized(&self) -> bool {
        self.status == SessionStatus::Authorized
    }

    pub fn message(&self) -> &'static str {
        self.status.message()
    }

    /// The token accepted on this page load.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// The provider's `error` parameter (e.g. `access_denied`) when the user
    /// declined or the request was rejected.
    pub fn callback_error(&self) -> Option<&str> {
        self.callback_error.as_deref()
    }

    pub fn headers(&self) -> &DefaultHeaders {
        &self.headers
    }

    /// Creates and caches a fresh state value (when enabled) and returns the
    /// authorization URL to send the user to.
    ///
    /// Hosts that cannot navigate in place, such as desktop programs opening
    /// a system browser, use this instead of [`AuthorizationSession::login`].
    pub fn prepare_login(&self) -> AuthResult<String> {
        self.config.validate()?;

        let state = if self.config.use_state {
            let state = self.tokens.state_token();
            self.cache.put(STATE_KEY, &state)?;
            Some(state)
        } else {
            None
        };

        self.url_builder.build(&self.config, state.as_deref())
    }

    /// Sends the current page to the authorization server.
    ///
    /// If the navigation cannot be started the freshly cached state is
    /// removed again before the error is returned.
    pub fn login(&self) -> AuthResult<()> {
        let url = self.prepare_login()?;
        LOGGER.debug(format!(
            "redirecting to authorization endpoint {}",
            self.url_builder.endpoint()
        ));

        if let Err(err) = self.navigator.navigate(&url) {
            if self.config.use_state {
                self.cache.remove(STATE_KEY)?;
            }
            return Err(err);
        }
        Ok(())
    }
}

pub struct SessionBuilder {
    config: AuthConfig,
    cache: Option<Arc<dyn StateCache>>,
    fragment_source: Option<Arc<dyn FragmentSource>>,
    navigator: Option<Arc<dyn Navigator>>,
    headers: Option<DefaultHeaders>,
    url_builder: AuthorizationUrlBuilder,
}

impl SessionBuilder {
    fn new(config: AuthConfig) -> Self {
        Self {
            config,
            cache: None,
            fragment_source: None,
            navigator: None,
            headers: None,
            url_builder: AuthorizationUrlBuilder::default(),
        }
    }

    /// Overrides the state cache. Defaults to the persistent cache for the
    /// platform (see [`crate::cache::create_cache`]).
    pub fn with_cache(mut self, cache: Arc<dyn StateCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Uses one collaborator both as fragment source and navigator.
    pub fn with_location<L>(mut self, location: Arc<L>) -> Self
    where
        L: FragmentSource + Navigator + 'static,
    {
        self.fragment_source = Some(location.clone());
        self.navigator = Some(location);
        self
    }

    pub fn with_fragment_source(mut self, source: Arc<dyn FragmentSource>) -> Self {
        self.fragment_source = Some(source);
        self
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Shares an existing default-header set, typically the one used by the
    /// resource clients.
    pub fn with_headers(mut self, headers: DefaultHeaders) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn with_authorization_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.url_builder = self.url_builder.with_endpoint(endpoint);
        self
    }

    /// Evaluates the current page load and returns the resulting session.
    ///
    /// 1. The URL fragment is parsed for `access_token` and `state`.
    /// 2. The cached state is read.
    /// 3. A token with a missing or mismatching state (when state is in use)
    ///    yields [`SessionStatus::Error`]; the cached state is left in place
    ///    and expires with its TTL.
    /// 4. Otherwise the cached state is removed, and a token is installed as
    ///    the bearer header ([`SessionStatus::Authorized`]); with no token the
    ///    status is [`SessionStatus::Required`].
    ///
    /// # Errors
    ///
    /// Only collaborator failures are errors: an unusable cache, or a missing
    /// or failing location.
    pub fn initialize(self) -> AuthResult<AuthorizationSession> {
        let (fragment_source, navigator) = resolve_location(self.fragment_source, self.navigator)?;
        let cache = match self.cache {
            Some(cache) => cache,
            None => create_cache(CacheOptions::default())?,
        };
        let headers = self.headers.unwrap_or_default();

        let params = CallbackParams::parse(&fragment_source.fragment()?);
        let stored_state = cache.get(STATE_KEY)?;
        let status = evaluate_callback(&self.config, &params, stored_state.as_deref());

        let mut access_token = None;
        match status {
            SessionStatus::Error => {
                LOGGER.warn("discarding access token: callback state does not match the cached state");
            }
            SessionStatus::Authorized => {
                cache.remove(STATE_KEY)?;
                if let Some(token) = params.access_token() {
                    headers.set_bearer_token(token);
                    access_token = Some(token.to_string());
                }
                LOGGER.info("authorization succeeded; bearer token installed");
            }
            SessionStatus::Required => {
                cache.remove(STATE_KEY)?;
                match params.error() {
                    Some(error) => LOGGER.warn(format!("authorization server returned error '{error}'")),
                    None => LOGGER.debug("no access token in URL; authorization required"),
                }
            }
        }

        Ok(AuthorizationSession {
            config: self.config,
            status,
            access_token,
            callback_error: params.error().map(str::to_string),
            cache,
            navigator,
            headers,
            url_builder: self.url_builder,
            tokens: RandomTokenGenerator::new(),
        })
    }
}

type Location = (Arc<dyn FragmentSource>, Arc<dyn Navigator>);

#[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
fn resolve_location(
    fragment_source: Option<Arc<dyn FragmentSource>>,
    navigator: Option<Arc<dyn Navigator>>,
) -> AuthResult<Location> {
    use crate::platform::BrowserLocation;

    let default_source: Arc<dyn FragmentSource> = Arc::new(BrowserLocation);
    let default_navigator: Arc<dyn Navigator> = Arc::new(BrowserLocation);
    Ok((
        fragment_source.unwrap_or(default_source),
        navigator.unwrap_or(default_navigator),
    ))
}

#[cfg(not(all(target_arch = "wasm32", feature = "wasm-web")))]
fn resolve_location(
    fragment_source: Option<Arc<dyn FragmentSource>>,
    navigator: Option<Arc<dyn Navigator>>,
) -> AuthResult<Location> {
    match (fragment_source, navigator) {
        (Some(source), Some(navigator)) => Ok((source, navigator)),
        _ => Err(AuthError::Environment(
            "no browser location available; provide one with `with_location`".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{
        CacheError, CacheErrorCode, CacheOptions, CacheResult, InMemoryCache, StorageMode, DEFAULT_MAX_AGE,
    };
    use crate::platform::MemoryLocation;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    fn config() -> AuthConfig {
        AuthConfig::new("client-123", "http://localhost:8080/callback")
    }

    fn memory_cache() -> Arc<InMemoryCache> {
        Arc::new(InMemoryCache::new(
            CacheOptions::default().with_storage_mode(StorageMode::Memory),
        ))
    }

    fn session(
        config: AuthConfig,
        fragment: &str,
        cache: Arc<InMemoryCache>,
        headers: DefaultHeaders,
    ) -> AuthorizationSession {
        AuthorizationSession::builder(config)
            .with_cache(cache)
            .with_location(Arc::new(MemoryLocation::with_fragment(fragment)))
            .with_headers(headers)
            .initialize()
            .unwrap()
    }

    #[test]
    fn matching_state_authorizes_and_installs_token() {
        let cache = memory_cache();
        cache.put(STATE_KEY, "XYZ").unwrap();
        let headers = DefaultHeaders::new();

        let session = session(config(), "access_token=TOK&state=XYZ", cache.clone(), headers.clone());

        assert!(session.authorized());
        assert_eq!(session.message(), "");
        assert_eq!(session.status(), SessionStatus::Authorized);
        assert_eq!(session.access_token(), Some("TOK"));
        assert_eq!(headers.authorization().as_deref(), Some("Bearer TOK"));
        assert_eq!(cache.get(STATE_KEY).unwrap(), None);
    }

    #[test]
    fn mismatching_state_is_an_error_and_keeps_cached_state() {
        let cache = memory_cache();
        cache.put(STATE_KEY, "XYZ").unwrap();
        let headers = DefaultHeaders::new();

        let session = session(config(), "access_token=TOK&state=WRONG", cache.clone(), headers.clone());

        assert!(!session.authorized());
        assert_eq!(session.message(), "SPOTIFY_AUTH_ERROR");
        assert_eq!(session.access_token(), None);
        assert!(headers.is_empty());
        assert_eq!(cache.get(STATE_KEY).unwrap(), Some("XYZ".into()));
    }

    #[test]
    fn missing_state_is_an_error_when_state_is_required() {
        let cache = memory_cache();
        cache.put(STATE_KEY, "XYZ").unwrap();

        let session = session(config(), "access_token=TOK", cache, DefaultHeaders::new());
        assert_eq!(session.status(), SessionStatus::Error);
    }

    #[test]
    fn expired_state_is_an_error() {
        let now = Arc::new(AtomicU64::new(1_000));
        let handle = Arc::clone(&now);
        let cache = Arc::new(
            InMemoryCache::new(CacheOptions::default().with_storage_mode(StorageMode::Memory))
                .with_clock(Arc::new(move || handle.load(Ordering::SeqCst))),
        );
        cache.put(STATE_KEY, "XYZ").unwrap();
        now.fetch_add(DEFAULT_MAX_AGE.as_millis() as u64, Ordering::SeqCst);
        let headers = DefaultHeaders::new();

        let session = session(config(), "access_token=TOK&state=XYZ", cache, headers.clone());

        assert_eq!(session.status(), SessionStatus::Error);
        assert_eq!(session.message(), AUTH_ERROR_MESSAGE);
        assert!(headers.authorization().is_none());
    }

    #[test]
    fn state_never_stored_is_an_error() {
        let session = session(
            config(),
            "access_token=TOK&state=XYZ",
            memory_cache(),
            DefaultHeaders::new(),
        );
        assert_eq!(session.message(), AUTH_ERROR_MESSAGE);
    }

    fn unavailable(message: &str) -> CacheError {
        CacheError::new(CacheErrorCode::Unavailable, message)
    }

    /// Reads fail unless `readable`; writes always fail.
    struct BrokenCache {
        readable: bool,
    }

    impl StateCache for BrokenCache {
        fn get(&self, _key: &str) -> CacheResult<Option<String>> {
            if self.readable {
                Ok(None)
            } else {
                Err(unavailable("storage is down"))
            }
        }

        fn put(&self, _key: &str, _value: &str) -> CacheResult<()> {
            Err(unavailable("storage is full"))
        }

        fn put_with_ttl(&self, key: &str, value: &str, _ttl: Duration) -> CacheResult<()> {
            self.put(key, value)
        }

        fn remove(&self, _key: &str) -> CacheResult<()> {
            Ok(())
        }

        fn keys(&self) -> CacheResult<Vec<String>> {
            Ok(Vec::new())
        }

        fn clear(&self) -> CacheResult<()> {
            Ok(())
        }
    }

    #[test]
    fn unreadable_cache_fails_initialize() {
        let result = AuthorizationSession::builder(config())
            .with_cache(Arc::new(BrokenCache { readable: false }))
            .with_location(Arc::new(MemoryLocation::with_fragment("access_token=TOK&state=XYZ")))
            .initialize();

        match result {
            Err(AuthError::Cache(err)) => assert_eq!(err.code, CacheErrorCode::Unavailable),
            other => panic!("expected cache error, got {other:?}"),
        }
    }

    #[test]
    fn unwritable_cache_fails_login_without_navigating() {
        let location = Arc::new(MemoryLocation::default());
        let session = AuthorizationSession::builder(config())
            .with_cache(Arc::new(BrokenCache { readable: true }))
            .with_location(location.clone())
            .initialize()
            .unwrap();

        assert!(matches!(session.login(), Err(AuthError::Cache(_))));
        assert!(matches!(session.prepare_login(), Err(AuthError::Cache(_))));
        assert!(location.navigations().is_empty());
    }

    #[test]
    fn no_token_requires_authorization_and_clears_state() {
        let cache = memory_cache();
        cache.put(STATE_KEY, "XYZ").unwrap();

        let session = session(config(), "", cache.clone(), DefaultHeaders::new());

        assert!(!session.authorized());
        assert_eq!(session.message(), "SPOTIFY_AUTH_REQUIRED");
        assert_eq!(cache.get(STATE_KEY).unwrap(), None);
    }

    #[test]
    fn provider_error_is_reported_alongside_required() {
        let session = session(
            config(),
            "error=access_denied&state=XYZ",
            memory_cache(),
            DefaultHeaders::new(),
        );
        assert_eq!(session.status(), SessionStatus::Required);
        assert_eq!(session.callback_error(), Some("access_denied"));
    }

    #[test]
    fn disabled_state_accepts_token_regardless_of_cache() {
        let cache = memory_cache();
        cache.put(STATE_KEY, "XYZ").unwrap();
        let headers = DefaultHeaders::new();

        let session = session(
            config().with_state(false),
            "access_token=TOK",
            cache,
            headers.clone(),
        );

        assert!(session.authorized());
        assert_eq!(headers.authorization().as_deref(), Some("Bearer TOK"));
    }

    #[test]
    fn construction_is_repeatable_for_identical_inputs() {
        for fragment in ["access_token=TOK&state=XYZ", "access_token=TOK&state=WRONG", ""] {
            let outcomes: Vec<_> = (0..2)
                .map(|_| {
                    let cache = memory_cache();
                    cache.put(STATE_KEY, "XYZ").unwrap();
                    let session = session(config(), fragment, cache, DefaultHeaders::new());
                    (session.authorized(), session.message())
                })
                .collect();
            assert_eq!(outcomes[0], outcomes[1], "fragment {fragment:?}");
        }
    }

    #[test]
    fn repeated_mismatch_yields_same_outcome_on_shared_cache() {
        let cache = memory_cache();
        cache.put(STATE_KEY, "XYZ").unwrap();

        let first = session(config(), "access_token=TOK&state=WRONG", cache.clone(), DefaultHeaders::new());
        let second = session(config(), "access_token=TOK&state=WRONG", cache, DefaultHeaders::new());
        assert_eq!(first.status(), second.status());
    }

    #[test]
    fn login_caches_state_and_navigates() {
        let cache = memory_cache();
        let location = Arc::new(MemoryLocation::default());
        let session = AuthorizationSession::builder(config())
            .with_cache(cache.clone())
            .with_location(location.clone())
            .initialize()
            .unwrap();

        session.login().unwrap();

        let state = cache.get(STATE_KEY).unwrap().expect("state cached");
        assert_eq!(state.len(), 16);
        let url = location.last_navigation().expect("navigated");
        assert!(url.starts_with("https://accounts.spotify.com/authorize?client_id=client-123"));
        assert!(url.ends_with(&format!("&state={state}")));
    }

    #[test]
    fn login_without_state_leaves_cache_untouched() {
        let cache = memory_cache();
        let location = Arc::new(MemoryLocation::default());
        let session = AuthorizationSession::builder(config().with_state(false))
            .with_cache(cache.clone())
            .with_location(location.clone())
            .initialize()
            .unwrap();

        session.login().unwrap();

        assert!(cache.keys().unwrap().is_empty());
        assert!(!location.last_navigation().unwrap().contains("state="));
    }

    struct FailingNavigator;

    impl Navigator for FailingNavigator {
        fn navigate(&self, _url: &str) -> AuthResult<()> {
            Err(AuthError::Navigation("blocked".into()))
        }
    }

    #[test]
    fn failed_navigation_removes_new_state() {
        let cache = memory_cache();
        let session = AuthorizationSession::builder(config())
            .with_cache(cache.clone())
            .with_fragment_source(Arc::new(MemoryLocation::default()))
            .with_navigator(Arc::new(FailingNavigator))
            .initialize()
            .unwrap();

        assert!(matches!(session.login(), Err(AuthError::Navigation(_))));
        assert_eq!(cache.get(STATE_KEY).unwrap(), None);
    }

    #[test]
    fn login_with_empty_client_id_fails_without_side_effects() {
        let cache = memory_cache();
        let location = Arc::new(MemoryLocation::default());
        let session = AuthorizationSession::builder(AuthConfig::new("", "http://localhost/cb"))
            .with_cache(cache.clone())
            .with_location(location.clone())
            .initialize()
            .unwrap();

        assert_eq!(session.status(), SessionStatus::Required);
        assert!(matches!(session.login(), Err(AuthError::InvalidConfig(_))));
        assert!(cache.keys().unwrap().is_empty());
        assert!(location.navigations().is_empty());
    }

    #[test]
    fn missing_location_is_reported() {
        let result = AuthorizationSession::builder(config())
            .with_cache(memory_cache())
            .initialize();
        assert!(matches!(result, Err(AuthError::Environment(_))));
    }

    #[test]
    fn evaluate_callback_is_pure() {
        let params = CallbackParams::parse("access_token=T&state=S");
        assert_eq!(
            evaluate_callback(&config(), &params, Some("S")),
            SessionStatus::Authorized
        );
        assert_eq!(
            evaluate_callback(&config(), &params, None),
            SessionStatus::Error
        );
        assert_eq!(
            evaluate_callback(&config().with_state(false), &params, None),
            SessionStatus::Authorized
        );
        assert_eq!(
            evaluate_callback(&config(), &CallbackParams::default(), Some("S")),
            SessionStatus::Required
        );
    }
}
