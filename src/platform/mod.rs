pub mod environment;
pub mod location;

#[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
pub use location::BrowserLocation;
pub use location::{fragment_of, FragmentSource, MemoryLocation, Navigator};
