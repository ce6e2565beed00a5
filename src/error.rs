//! Error type for the browser-facing entry points.
//!
//! The effect core itself never fails: a missing node turns the owning group into
//! a no-op. Errors only exist where the host environment is unusable (no window,
//! no document) or where a caller hands us a malformed configuration.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum EffectsError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("invalid effects config: {0}")]
    Config(String),
    #[error("host call failed: {0}")]
    Host(String),
}

#[cfg(feature = "serde_json")]
impl From<serde_json::Error> for EffectsError {
    fn from(err: serde_json::Error) -> Self {
        EffectsError::Config(err.to_string())
    }
}

impl From<JsValue> for EffectsError {
    fn from(value: JsValue) -> Self {
        EffectsError::Host(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<EffectsError> for JsValue {
    fn from(err: EffectsError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_missing_piece() {
        assert_eq!(EffectsError::NoWindow.to_string(), "no global window");
        assert_eq!(
            EffectsError::Config("bad".into()).to_string(),
            "invalid effects config: bad"
        );
    }
}
