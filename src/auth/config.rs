use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auth::error::{AuthError, AuthResult};
use crate::platform::environment;

pub const DEFAULT_RESPONSE_TYPE: &str = "token";

/// Older spelling of `useState`, still read by the JSON and environment
/// loaders.
const LEGACY_STATE_KEY: &str = "state";

/// Client settings for the implicit-grant authorization flow.
///
/// The configuration is fixed for the lifetime of a session. Field names
/// follow the camelCase keys used in JSON sources (`clientId`,
/// `redirectUri`, `useState`, `showDialog`). The loaders also accept the
/// legacy `state` key; when both are present `useState` wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthConfig {
    /// Client id issued when the application was registered.
    pub client_id: String,
    pub response_type: String,
    /// Must match one of the redirect URIs registered for the client.
    pub redirect_uri: String,
    /// Round-trip a random state value to detect forged callbacks.
    pub use_state: bool,
    /// Space-separated scope names.
    pub scope: String,
    /// Force the consent dialog even when the user already approved the app.
    pub show_dialog: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            response_type: DEFAULT_RESPONSE_TYPE.to_string(),
            redirect_uri: String::new(),
            use_state: true,
            scope: String::new(),
            show_dialog: false,
        }
    }
}

impl AuthConfig {
    pub fn new(client_id: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
            ..Default::default()
        }
    }

    pub fn with_response_type(mut self, response_type: impl Into<String>) -> Self {
        self.response_type = response_type.into();
        self
    }

    pub fn with_state(mut self, use_state: bool) -> Self {
        self.use_state = use_state;
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Joins the given scope names with single spaces.
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.scope = scopes
            .into_iter()
            .map(|scope| scope.as_ref().trim().to_string())
            .filter(|scope| !scope.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        self
    }

    pub fn with_show_dialog(mut self, show_dialog: bool) -> Self {
        self.show_dialog = show_dialog;
        self
    }

    /// Checks the fields needed to build a usable authorization URL.
    pub fn validate(&self) -> AuthResult<()> {
        if self.client_id.trim().is_empty() {
            return Err(AuthError::InvalidConfig("client_id must not be empty".into()));
        }
        if self.redirect_uri.trim().is_empty() {
            return Err(AuthError::InvalidConfig(
                "redirect_uri must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn from_json(raw: &str) -> AuthResult<Self> {
        match serde_json::from_str::<Value>(raw).map_err(malformed)? {
            Value::Object(map) => Self::from_map(map),
            _ => Err(AuthError::InvalidConfig(
                "auth config must be a JSON object".into(),
            )),
        }
    }

    /// Loads the configuration advertised by the runtime environment.
    ///
    /// See [`crate::platform::environment`] for the recognised sources.
    pub fn from_environment() -> AuthResult<Self> {
        let map = environment::auth_config_json().ok_or_else(|| {
            AuthError::Environment(format!(
                "no auth configuration found in `{}` or `{}`",
                environment::CONFIG_ENV_VAR,
                environment::CONFIG_PATH_ENV_VAR
            ))
        })?;
        Self::from_map(map)
    }

    fn from_map(mut map: Map<String, Value>) -> AuthResult<Self> {
        if let Some(legacy) = map.remove(LEGACY_STATE_KEY) {
            map.entry("useState").or_insert(legacy);
        }
        serde_json::from_value(Value::Object(map)).map_err(malformed)
    }
}

fn malformed(err: serde_json::Error) -> AuthError {
    AuthError::InvalidConfig(format!("malformed auth config: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_implicit_grant() {
        let config = AuthConfig::default();
        assert_eq!(config.response_type, "token");
        assert!(config.use_state);
        assert!(!config.show_dialog);
        assert!(config.scope.is_empty());
    }

    #[test]
    fn with_scopes_joins_with_spaces() {
        let config = AuthConfig::new("id", "http://localhost/cb")
            .with_scopes(["user-read-private", " ", "playlist-modify-public"]);
        assert_eq!(config.scope, "user-read-private playlist-modify-public");
    }

    #[test]
    fn validate_rejects_missing_client_id_and_redirect() {
        assert!(matches!(
            AuthConfig::new("", "http://localhost/cb").validate(),
            Err(AuthError::InvalidConfig(_))
        ));
        assert!(matches!(
            AuthConfig::new("id", "  ").validate(),
            Err(AuthError::InvalidConfig(_))
        ));
        assert!(AuthConfig::new("id", "http://localhost/cb").validate().is_ok());
    }

    #[test]
    fn from_json_fills_defaults_and_accepts_legacy_state_key() {
        let config = AuthConfig::from_json(
            r#"{"clientId":"abc","redirectUri":"http://localhost/cb","state":false,"showDialog":true}"#,
        )
        .unwrap();
        assert_eq!(config.client_id, "abc");
        assert_eq!(config.response_type, "token");
        assert!(!config.use_state);
        assert!(config.show_dialog);
    }

    #[test]
    fn use_state_wins_over_legacy_state_key() {
        let config = AuthConfig::from_json(
            r#"{"clientId":"abc","redirectUri":"http://localhost/cb","state":false,"useState":true}"#,
        )
        .unwrap();
        assert!(config.use_state);
    }

    #[test]
    fn from_json_reports_type_errors() {
        let err = AuthConfig::from_json(r#"{"showDialog":"sometimes"}"#).unwrap_err();
        assert!(matches!(err, AuthError::InvalidConfig(_)));
        assert!(matches!(
            AuthConfig::from_json("[1, 2]"),
            Err(AuthError::InvalidConfig(_))
        ));
    }

    #[cfg(not(target_arch = "wasm32"))]
    mod from_env {
        use super::*;
        use std::sync::{LazyLock, Mutex};

        use crate::platform::environment::{CONFIG_ENV_VAR, CONFIG_PATH_ENV_VAR};

        static ENV_GUARD: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

        /// Sets the config variables for the duration of `body`, then
        /// removes them again.
        fn with_env<T>(config: Option<&str>, path: Option<&str>, body: impl FnOnce() -> T) -> T {
            let _guard = ENV_GUARD.lock().unwrap();
            for (key, value) in [(CONFIG_ENV_VAR, config), (CONFIG_PATH_ENV_VAR, path)] {
                match value {
                    Some(value) => std::env::set_var(key, value),
                    None => std::env::remove_var(key),
                }
            }
            let result = body();
            std::env::remove_var(CONFIG_ENV_VAR);
            std::env::remove_var(CONFIG_PATH_ENV_VAR);
            result
        }

        #[test]
        fn loads_key_value_pairs_from_config_variable() {
            let config = with_env(
                Some("clientId=abc,redirectUri=http://localhost/cb,useState=false,state=true"),
                None,
                AuthConfig::from_environment,
            )
            .unwrap();

            assert_eq!(config.client_id, "abc");
            assert_eq!(config.redirect_uri, "http://localhost/cb");
            assert!(!config.use_state);
            assert_eq!(config.response_type, DEFAULT_RESPONSE_TYPE);
        }

        #[test]
        fn loads_inline_json_from_config_variable() {
            let config = with_env(
                Some(r#"{"clientId":"inline","redirectUri":"http://localhost/cb","showDialog":true}"#),
                None,
                AuthConfig::from_environment,
            )
            .unwrap();

            assert_eq!(config.client_id, "inline");
            assert!(config.show_dialog);
        }

        #[test]
        fn falls_back_to_config_path_variable() {
            let mut path = std::env::temp_dir();
            path.push(format!("spotify-auth-config-{}.json", std::process::id()));
            std::fs::write(
                &path,
                r#"{"clientId":"from-file","redirectUri":"http://localhost/cb","scope":"user-read-private"}"#,
            )
            .unwrap();

            let config = with_env(None, path.to_str(), AuthConfig::from_environment).unwrap();
            let _ = std::fs::remove_file(&path);

            assert_eq!(config.client_id, "from-file");
            assert_eq!(config.scope, "user-read-private");
            assert!(config.use_state);
        }

        #[test]
        fn missing_configuration_is_an_environment_error() {
            let result = with_env(None, None, AuthConfig::from_environment);
            assert!(matches!(result, Err(AuthError::Environment(_))));
        }
    }
}
