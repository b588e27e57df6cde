use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

pub const DEFAULT_API_BASE: &str = "https://api.spotify.com";
pub const DEFAULT_API_VERSION: &str = "v1";

const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encodes an id for use as a single path segment.
pub(crate) fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// Joins the API base, the version and an endpoint path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceUrlResolver {
    base: String,
    version: String,
}

impl Default for ResourceUrlResolver {
    fn default() -> Self {
        Self {
            base: DEFAULT_API_BASE.to_string(),
            version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

impl ResourceUrlResolver {
    pub fn new(base: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            version: version.into(),
        }
    }

    /// Points the resolver at another host, e.g. a mock server.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// `base/version/endpoint`, or `base/version` for an empty endpoint.
    pub fn resolve(&self, endpoint: &str) -> String {
        let base = self.base.trim_end_matches('/');
        let endpoint = endpoint.trim_start_matches('/');
        if endpoint.is_empty() {
            format!("{base}/{}", self.version)
        } else {
            format!("{base}/{}/{endpoint}", self.version)
        }
    }
}
