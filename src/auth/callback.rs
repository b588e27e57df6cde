//! Parsing of the parameters the authorization server appends to the
//! redirect URI fragment (`#access_token=...&token_type=Bearer&state=...`).

use std::collections::HashMap;

use percent_encoding::percent_decode_str;

pub const ACCESS_TOKEN_PARAM: &str = "access_token";
pub const STATE_PARAM: &str = "state";
pub const ERROR_PARAM: &str = "error";
pub const TOKEN_TYPE_PARAM: &str = "token_type";
pub const EXPIRES_IN_PARAM: &str = "expires_in";

/// Key/value pairs read from a callback fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    params: HashMap<String, String>,
}

impl CallbackParams {
    /// Parses `key=value` pairs separated by `&` or `;`.
    ///
    /// A leading `#` is ignored. Keys without `=` map to an empty value, the
    /// last occurrence of a repeated key wins, and a value whose
    /// percent-encoding is malformed is kept verbatim. Keys are not decoded.
    pub fn parse(fragment: &str) -> Self {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        let mut params = HashMap::new();

        for entry in fragment.split(|c: char| c == '&' || c == ';') {
            let (key, raw_value) = entry.split_once('=').unwrap_or((entry, ""));
            if key.is_empty() {
                continue;
            }
            params.insert(key.to_string(), decode_component(raw_value));
        }

        Self { params }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// The access token, if present and non-empty.
    pub fn access_token(&self) -> Option<&str> {
        self.get(ACCESS_TOKEN_PARAM).filter(|token| !token.is_empty())
    }

    pub fn state(&self) -> Option<&str> {
        self.get(STATE_PARAM)
    }

    /// Error code reported by the provider, e.g. `access_denied`.
    pub fn error(&self) -> Option<&str> {
        self.get(ERROR_PARAM).filter(|error| !error.is_empty())
    }

    pub fn token_type(&self) -> Option<&str> {
        self.get(TOKEN_TYPE_PARAM)
    }

    /// Token lifetime in seconds, when the provider sent a numeric value.
    pub fn expires_in(&self) -> Option<u64> {
        self.get(EXPIRES_IN_PARAM)?.parse().ok()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn into_map(self) -> HashMap<String, String> {
        self.params
    }
}

/// Decodes `%XX` escapes the way `decodeURIComponent` does, returning the
/// input unchanged instead of failing on bad escapes or invalid UTF-8.
fn decode_component(raw: &str) -> String {
    if !has_well_formed_escapes(raw) {
        return raw.to_string();
    }
    match percent_decode_str(raw).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}

fn has_well_formed_escapes(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] == b'%' {
            let valid = bytes.len() > index + 2
                && bytes[index + 1].is_ascii_hexdigit()
                && bytes[index + 2].is_ascii_hexdigit();
            if !valid {
                return false;
            }
            index += 3;
        } else {
            index += 1;
        }
    }
    true
}
