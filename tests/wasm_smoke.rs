#![cfg(all(target_arch = "wasm32", feature = "wasm-web"))]

use std::sync::Arc;

use spotify_rs_sdk::auth::{AuthConfig, AuthorizationSession, SessionStatus, STATE_KEY};
use spotify_rs_sdk::cache::{
    CacheOptions, StateCache, StorageMode, WebStorageCache, WebStorageDriver,
};
use spotify_rs_sdk::platform::{BrowserLocation, FragmentSource, MemoryLocation};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn session_cache(name: &str) -> WebStorageCache {
    WebStorageCache::new(
        WebStorageDriver::Session,
        CacheOptions::default()
            .with_name(name)
            .with_storage_mode(StorageMode::SessionStorage),
    )
}

#[wasm_bindgen_test]
fn web_storage_cache_round_trips_values() {
    let cache = session_cache("wasm-smoke-round-trip");
    cache.put(STATE_KEY, "XYZ").expect("put");
    assert_eq!(cache.get(STATE_KEY).expect("get"), Some("XYZ".into()));

    let reopened = session_cache("wasm-smoke-round-trip");
    assert_eq!(reopened.get(STATE_KEY).expect("get"), Some("XYZ".into()));

    reopened.clear().expect("clear");
    assert!(cache.keys().expect("keys").is_empty());
}

#[wasm_bindgen_test]
fn browser_location_reads_fragment() {
    let fragment = BrowserLocation.fragment().expect("fragment");
    assert!(!fragment.starts_with('#'));
}

#[wasm_bindgen_test]
fn session_authorizes_with_web_storage_state() {
    let cache = Arc::new(session_cache("wasm-smoke-session"));
    cache.put(STATE_KEY, "XYZ").expect("put");

    let session = AuthorizationSession::builder(AuthConfig::new("client", "http://localhost/cb"))
        .with_cache(cache.clone())
        .with_location(Arc::new(MemoryLocation::with_fragment(
            "access_token=TOK&state=XYZ",
        )))
        .initialize()
        .expect("session");

    assert_eq!(session.status(), SessionStatus::Authorized);
    assert_eq!(cache.get(STATE_KEY).expect("get"), None);
}
