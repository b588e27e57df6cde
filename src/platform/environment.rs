//! Discovery of authorization settings from the runtime environment.
//!
//! Settings may come from the `SPOTIFY_AUTH_CONFIG` variable (inline JSON, a
//! path to a JSON file, or `key=value,key=value` pairs), from the file named
//! by `SPOTIFY_AUTH_CONFIG_PATH`, or in the browser from a global
//! `__SPOTIFY_AUTH_CONFIG__` object.

use std::env;
use std::fs;
#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

use serde_json::{Map, Value};

pub const CONFIG_ENV_VAR: &str = "SPOTIFY_AUTH_CONFIG";
pub const CONFIG_PATH_ENV_VAR: &str = "SPOTIFY_AUTH_CONFIG_PATH";

/// Returns the first authorization settings object found in the environment.
pub fn auth_config_json() -> Option<Map<String, Value>> {
    config_from_env()
        .or_else(config_from_path)
        .or_else(config_from_global)
        .and_then(|value| value.as_object().cloned())
}

fn config_from_env() -> Option<Value> {
    let raw = env::var(CONFIG_ENV_VAR).ok()?;
    parse_config_source(&raw)
}

fn config_from_path() -> Option<Value> {
    let path = env::var(CONFIG_PATH_ENV_VAR).ok()?;
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str::<Value>(&content)
        .ok()
        .filter(Value::is_object)
}

#[cfg(all(target_arch = "wasm32", feature = "wasm-web"))]
fn config_from_global() -> Option<Value> {
    use wasm_bindgen::JsValue;

    let global = js_sys::global();
    let value =
        js_sys::Reflect::get(&global, &JsValue::from_str("__SPOTIFY_AUTH_CONFIG__")).ok()?;
    if value.is_null() || value.is_undefined() {
        return None;
    }
    let serialized = js_sys::JSON::stringify(&value).ok()?.as_string()?;
    serde_json::from_str(&serialized).ok()
}

#[cfg(not(all(target_arch = "wasm32", feature = "wasm-web")))]
fn config_from_global() -> Option<Value> {
    None
}

pub(crate) fn parse_config_source(raw: &str) -> Option<Value> {
    if let Ok(json) = serde_json::from_str::<Value>(raw) {
        if json.is_object() {
            return Some(json);
        }
    }

    if let Some(path) = treat_as_path(raw) {
        if let Ok(contents) = fs::read_to_string(&path) {
            if let Ok(json) = serde_json::from_str::<Value>(&contents) {
                if json.is_object() {
                    return Some(json);
                }
            }
        }
    }

    parse_key_value_config(raw)
}

#[cfg(not(target_arch = "wasm32"))]
fn treat_as_path(raw: &str) -> Option<String> {
    if raw.contains('=') {
        return None;
    }
    let trimmed = raw.trim();
    if Path::new(trimmed).exists() {
        Some(trimmed.to_string())
    } else {
        None
    }
}

#[cfg(target_arch = "wasm32")]
fn treat_as_path(_raw: &str) -> Option<String> {
    None
}

fn parse_key_value_config(raw: &str) -> Option<Value> {
    let mut map = Map::new();
    for entry in raw.split(',') {
        let Some((key, value)) = entry.split_once('=') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() {
            continue;
        }
        let value = match value {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            other => Value::String(other.to_string()),
        };
        map.insert(key.to_string(), value);
    }
    if map.is_empty() {
        None
    } else {
        Some(Value::Object(map))
    }
}
