//! W3C WebDriver wire types
//!
//! Only the slice of the protocol the suite drives: sessions, navigation,
//! element lookup by CSS, element interaction, and cookies.
//! See: https://www.w3.org/TR/webdriver/

use serde::Deserialize;

/// Key under which the W3C protocol nests element ids
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Error string the protocol uses for a failed element lookup
pub const NO_SUCH_ELEMENT: &str = "no such element";

/// Every WebDriver response body is `{"value": ...}`
#[derive(Debug, Deserialize)]
pub struct WdValue<T> {
    pub value: T,
}

/// Body of a successful `POST /session`
#[derive(Debug, Deserialize)]
pub struct NewSessionValue {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(default)]
    pub capabilities: serde_json::Value,
}

/// Body of a `GET /status`
#[derive(Debug, Deserialize)]
pub struct StatusValue {
    #[serde(default)]
    pub ready: bool,
}

/// Error value carried by non-2xx WebDriver responses
#[derive(Debug, Deserialize)]
pub struct WdError {
    pub error: String,
    #[serde(default)]
    pub message: String,
}

/// Wire form of an element reference
#[derive(Debug, Clone, Deserialize)]
pub struct ElementRef {
    #[serde(rename = "element-6066-11e4-a52e-4f735466cecf")]
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_ref_uses_w3c_key() {
        let raw = format!(r#"{{"{ELEMENT_KEY}": "el-42"}}"#);
        let element: ElementRef = serde_json::from_str(&raw).unwrap();
        assert_eq!(element.id, "el-42");
    }

    #[test]
    fn test_new_session_value() {
        let value: WdValue<NewSessionValue> = serde_json::from_str(
            r#"{"value": {"sessionId": "abc", "capabilities": {"browserName": "chrome"}}}"#,
        )
        .unwrap();
        assert_eq!(value.value.session_id, "abc");
    }

    #[test]
    fn test_error_value() {
        let value: WdValue<WdError> = serde_json::from_str(
            r##"{"value": {"error": "no such element", "message": "#missing not found"}}"##,
        )
        .unwrap();
        assert_eq!(value.value.error, NO_SUCH_ELEMENT);
        assert_eq!(value.value.message, "#missing not found");
    }

    #[test]
    fn test_status_value_defaults_to_not_ready() {
        let value: WdValue<StatusValue> = serde_json::from_str(r#"{"value": {}}"#).unwrap();
        assert!(!value.value.ready);
    }
}
