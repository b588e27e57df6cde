//! Request defaults shared between the authorization session and the
//! resource clients.
//!
//! The session writes the bearer token once per successful authorization;
//! every request issued afterwards through [`crate::api::ApiClient`] inherits
//! the headers present at send time.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

pub const AUTHORIZATION_HEADER: &str = "authorization";

/// Shared, clonable handle to one set of default request headers.
///
/// Header names are case-insensitive and stored lower-cased. Clones observe
/// each other's writes.
#[derive(Clone, Debug, Default)]
pub struct DefaultHeaders {
    inner: Arc<RwLock<BTreeMap<String, String>>>,
}

impl DefaultHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, name: &str, value: impl Into<String>) {
        self.inner
            .write()
            .unwrap()
            .insert(name.to_ascii_lowercase(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.inner
            .read()
            .unwrap()
            .get(&name.to_ascii_lowercase())
            .cloned()
    }

    pub fn remove(&self, name: &str) -> Option<String> {
        self.inner
            .write()
            .unwrap()
            .remove(&name.to_ascii_lowercase())
    }

    /// Installs `Authorization: Bearer <token>`.
    pub fn set_bearer_token(&self, token: &str) {
        self.set(AUTHORIZATION_HEADER, format!("Bearer {token}"));
    }

    pub fn authorization(&self) -> Option<String> {
        self.get(AUTHORIZATION_HEADER)
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.inner.read().unwrap().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().unwrap().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let headers = DefaultHeaders::new();
        let clone = headers.clone();

        clone.set_bearer_token("TOK");
        assert_eq!(headers.authorization().as_deref(), Some("Bearer TOK"));
        assert_eq!(headers.get("Authorization").as_deref(), Some("Bearer TOK"));
    }

    #[test]
    fn names_are_case_insensitive() {
        let headers = DefaultHeaders::new();
        headers.set("X-Custom", "1");
        assert_eq!(headers.get("x-custom").as_deref(), Some("1"));
        assert_eq!(headers.remove("X-CUSTOM").as_deref(), Some("1"));
        assert!(headers.is_empty());
    }
}
