use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors raised while wiring the page or running a simulated request.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("no global window")]
    NoWindow,

    #[error("window has no document")]
    NoDocument,

    #[error("document has no body")]
    NoBody,

    #[error("invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("javascript error: {0}")]
    Js(String),

    #[error("could not serialize payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl SiteError {
    pub fn selector(selector: &str, err: JsValue) -> Self {
        SiteError::InvalidSelector {
            selector: selector.to_string(),
            reason: js_reason(&err),
        }
    }
}

impl From<JsValue> for SiteError {
    fn from(err: JsValue) -> Self {
        SiteError::Js(js_reason(&err))
    }
}

fn js_reason(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_errors_name_the_selector() {
        let err = SiteError::InvalidSelector {
            selector: "#1bad".to_string(),
            reason: "SyntaxError".to_string(),
        };
        assert_eq!(err.to_string(), "invalid selector \"#1bad\": SyntaxError");
    }

    #[test]
    fn payload_errors_wrap_serde() {
        let serde_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: SiteError = serde_err.into();
        assert!(err.to_string().starts_with("could not serialize payload"));
    }
}
