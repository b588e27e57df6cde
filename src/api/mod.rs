//! Thin clients for the Spotify Web API.
//!
//! Every resource client wraps a clone of one [`ApiClient`], which reads the
//! shared [`crate::http::DefaultHeaders`] on each request. Responses are
//! returned as untyped `serde_json::Value`s.

mod albums;
mod artists;
mod browse;
mod error;
mod me;
mod request;
mod search;
mod tracks;
mod transport;
mod url;
mod users;

use std::sync::LazyLock;

use crate::logger::Logger;

pub use albums::Albums;
pub use artists::{Artists, DEFAULT_TOP_TRACKS_COUNTRY};
pub use browse::Browse;
pub use error::{internal_error, invalid_argument, network_error, ApiError, ApiErrorCode, ApiResult};
pub use me::{FollowType, Me};
pub use request::ApiRequest;
pub use search::Search;
pub use tracks::Tracks;
pub use transport::ApiClient;
pub use url::{ResourceUrlResolver, DEFAULT_API_BASE, DEFAULT_API_VERSION};
pub use users::{Playlists, Users};

pub(crate) static LOGGER: LazyLock<Logger> = LazyLock::new(|| Logger::new("@spotify/api"));
