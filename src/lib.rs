#![doc = include_str!("RUSTDOC.md")]

pub mod api;
pub mod auth;
pub mod cache;
pub mod client;
pub mod http;
pub mod logger;
pub mod platform;

#[doc(inline)]
pub use client::{Spotify, SpotifyBuilder, SpotifyError, SpotifyResult};

#[cfg(all(test, not(target_arch = "wasm32")))]
pub mod test_support;
