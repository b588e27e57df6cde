//! Lists new releases with a token obtained elsewhere.
//!
//! ```text
//! SPOTIFY_ACCESS_TOKEN=<token> cargo run --example browse_catalog
//! ```

use std::error::Error;
use std::sync::Arc;

use spotify_rs_sdk::auth::{AuthConfig, AuthorizationSession};
use spotify_rs_sdk::cache::{CacheOptions, InMemoryCache, StorageMode};
use spotify_rs_sdk::platform::MemoryLocation;
use spotify_rs_sdk::Spotify;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let token = std::env::var("SPOTIFY_ACCESS_TOKEN")
        .map_err(|_| "set SPOTIFY_ACCESS_TOKEN to a valid access token")?;

    // Without state checking a fragment carrying only the token is accepted.
    let config = AuthConfig::new("browse-demo", "http://localhost/").with_state(false);
    let cache = Arc::new(InMemoryCache::new(
        CacheOptions::default().with_storage_mode(StorageMode::Memory),
    ));
    let spotify = Spotify::builder(config)
        .with_cache(cache)
        .with_location(Arc::new(MemoryLocation::with_fragment(format!(
            "access_token={token}"
        ))))
        .build()?;

    let session: &AuthorizationSession = spotify.auth();
    println!("authorized: {}", session.authorized());

    let releases = spotify.browse().new_releases(&[("limit", "10")]).await?;
    if let Some(items) = releases["albums"]["items"].as_array() {
        for album in items {
            println!("{} - {}", album["artists"][0]["name"], album["name"]);
        }
    }

    let results = spotify.search().artist("Tania Bowra").await?;
    println!("artists found: {}", results["artists"]["total"]);

    Ok(())
}
