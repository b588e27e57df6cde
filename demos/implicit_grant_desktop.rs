//! Implicit-grant sign-in from a desktop program.
//!
//! First run: opens the Spotify consent page in the system browser. After
//! approving, copy the full URL the browser was redirected to and run again:
//!
//! ```text
//! SPOTIFY_AUTH_CONFIG='clientId=<id>,redirectUri=http://localhost:8080/callback' \
//!     cargo run --example implicit_grant_desktop
//! SPOTIFY_AUTH_CONFIG=... SPOTIFY_CALLBACK_URL='http://localhost:8080/callback#access_token=...' \
//!     cargo run --example implicit_grant_desktop
//! ```
//!
//! The state value survives between the two runs in the file-backed cache.

use std::error::Error;
use std::sync::Arc;

use log::LevelFilter;
use spotify_rs_sdk::auth::{AuthConfig, AuthorizationSession, SessionStatus};
use spotify_rs_sdk::platform::MemoryLocation;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Debug)
        .init();
    spotify_rs_sdk::logger::set_log_level("debug")?;

    let config = AuthConfig::from_environment()?.with_scope("user-read-private");
    let href = std::env::var("SPOTIFY_CALLBACK_URL").unwrap_or_else(|_| config.redirect_uri.clone());
    let location = Arc::new(MemoryLocation::new(href));

    let session = AuthorizationSession::builder(config)
        .with_location(location.clone())
        .initialize()?;

    match session.status() {
        SessionStatus::Authorized => {
            println!("Authorized. Default headers: {:?}", session.headers().snapshot());
        }
        SessionStatus::Error => {
            println!("The callback did not match the pending login; start over.");
        }
        SessionStatus::Required => {
            if let Some(error) = session.callback_error() {
                println!("Spotify reported '{error}'.");
            }
            session.login()?;
            if let Some(url) = location.last_navigation() {
                println!("Opening {url}");
                if webbrowser::open(&url).is_err() {
                    println!("Open the URL above in a browser to continue.");
                }
            }
        }
    }

    Ok(())
}
