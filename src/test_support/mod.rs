//! Test utilities shared across crate-level unit tests.

pub mod http;

pub use http::{api_client_for, try_start_mock_server};
