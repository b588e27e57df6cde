use std::sync::Mutex;

use crate::auth::{AuthError, AuthResult};

/// Supplies the fragment (the part after `#`, without the `#`) of the URL
/// the current page was loaded from.
pub trait FragmentSource: Send + Sync {
    fn fragment(&self) -> AuthResult<String>;
}

/// Performs a full navigation of the current page.
///
/// In a browser the current execution context ends once navigation starts;
/// the result of the flow is only observed by the next page load.
pub trait Navigator: Send + Sync {
    fn navigate(&self, url: &str) -> AuthResult<()>;
}

/// Returns the fragment of `url`, or an empty string when it has none.
pub fn fragment_of(url: &str) -> &str {
    url.split_once('#').map(|(_, fragment)| fragment).unwrap_or("")
}

/// In-process location used by desktop hosts and tests.
///
/// Navigations are recorded rather than performed; a host that drives a
/// system browser reads them back with [`MemoryLocation::last_navigation`].
#[derive(Debug, Default)]
pub struct MemoryLocation {
    href: Mutex<String>,
    navigations: Mutex<Vec<String>>,
}

impl MemoryLocation {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: Mutex::new(href.into()),
            navigations: Mutex::new(Vec::new()),
        }
    }

    /// Location whose URL carries only the given fragment.
    pub fn with_fragment(fragment: impl AsRef<str>) -> Self {
        Self::new(format!("#{}", fragment.as_ref()))
    }

    pub fn href(&self) -> String {
        self.href.lock().unwrap().clone()
    }

    /// Simulates the page being loaded from `href`, e.g. the provider's
    /// redirect back to the application.
    pub fn set_href(&self, href: impl Into<String>) {
        *self.href.lock().unwrap() = href.into();
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }

    pub fn last_navigation(&self) -> Option<String> {
        self.navigations.lock().unwrap().last().cloned()
    }
}

impl FragmentSource for MemoryLocation {
    fn fragment(&self) -> AuthResult<String> {
        Ok(fragment_of(&self.href.lock().unwrap()).to_string())
    }
}

impl Navigator for MemoryLocation {
    fn navigate(&self, url: &str) -> AuthResult<()> {
        if url.is_empty() {
            return Err(AuthError::Navigation("cannot navigate to an empty URL".into()));
        }
        self.navigations.lock().unwrap().push(url.to_string());
        *self.href.lock().unwrap() = url.to_string();
        Ok(())
    }
}

/// `window.location` of the hosting browser page.
#[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserLocation;

#[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
impl BrowserLocation {
    fn location() -> AuthResult<web_sys::Location> {
        web_sys::window()
            .map(|window| window.location())
            .ok_or_else(|| AuthError::Navigation("window object is not available".into()))
    }
}

#[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
impl FragmentSource for BrowserLocation {
    fn fragment(&self) -> AuthResult<String> {
        let hash = Self::location()?
            .hash()
            .map_err(|err| AuthError::Navigation(format!("failed to read location hash: {err:?}")))?;
        Ok(hash.strip_prefix('#').unwrap_or(&hash).to_string())
    }
}

#[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
impl Navigator for BrowserLocation {
    fn navigate(&self, url: &str) -> AuthResult<()> {
        Self::location()?
            .set_href(url)
            .map_err(|err| AuthError::Navigation(format!("failed to navigate: {err:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_of_splits_on_first_hash() {
        assert_eq!(
            fragment_of("https://app.example/cb#access_token=a&state=b"),
            "access_token=a&state=b"
        );
        assert_eq!(fragment_of("https://app.example/cb"), "");
        assert_eq!(fragment_of("https://app.example/#a=#b"), "a=#b");
    }

    #[test]
    fn memory_location_records_navigations() {
        let location = MemoryLocation::with_fragment("access_token=abc");
        assert_eq!(location.fragment().unwrap(), "access_token=abc");

        location.navigate("https://accounts.example/authorize").unwrap();
        assert_eq!(
            location.last_navigation().as_deref(),
            Some("https://accounts.example/authorize")
        );
        assert_eq!(location.fragment().unwrap(), "");
    }

    #[test]
    fn empty_navigation_is_rejected() {
        let location = MemoryLocation::default();
        assert!(matches!(
            location.navigate(""),
            Err(AuthError::Navigation(_))
        ));
        assert!(location.navigations().is_empty());
    }
}
