#![doc = include_str!("README.md")]
mod callback;
mod config;
mod error;
mod session;
mod state;
mod url;

use std::sync::LazyLock;

use crate::logger::Logger;

#[doc(inline)]
pub use callback::{
    CallbackParams, ACCESS_TOKEN_PARAM, ERROR_PARAM, EXPIRES_IN_PARAM, STATE_PARAM,
    TOKEN_TYPE_PARAM,
};

#[doc(inline)]
pub use config::{AuthConfig, DEFAULT_RESPONSE_TYPE};

#[doc(inline)]
pub use error::{AuthError, AuthResult};

#[doc(inline)]
pub use session::{
    evaluate_callback, AuthorizationSession, SessionBuilder, SessionStatus, AUTH_ERROR_MESSAGE,
    AUTH_REQUIRED_MESSAGE, STATE_KEY,
};

#[doc(inline)]
pub use state::{RandomTokenGenerator, STATE_TOKEN_LENGTH};

#[doc(inline)]
pub use url::{AuthorizationUrlBuilder, DEFAULT_AUTHORIZATION_ENDPOINT};

pub(crate) static LOGGER: LazyLock<Logger> = LazyLock::new(|| Logger::new("@spotify/auth"));
