//! W3C WebDriver wire types used to talk to an Appium server.
//!
//! Every response is a JSON object with a single `value` member. Errors carry
//! an `error` code string and a `message` inside `value`; the codes the engine
//! cares about are mapped to dedicated [`DriverError`] variants by
//! [`decode_response`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::driver::DriverError;
use crate::element::{ElementHandle, ScreenSize, LEGACY_ELEMENT_KEY, W3C_ELEMENT_KEY};
use crate::input::InputSequence;

/// W3C error code for a detached element.
pub const ERROR_STALE_ELEMENT: &str = "stale element reference";
/// W3C error code for a locator matching nothing.
pub const ERROR_NO_SUCH_ELEMENT: &str = "no such element";
pub const ERROR_TIMEOUT: &str = "timeout";
pub const ERROR_SESSION_NOT_CREATED: &str = "session not created";
pub const ERROR_INVALID_SESSION: &str = "invalid session id";

/// The `{"value": ...}` envelope around every response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub value: T,
}

/// The error object inside an error response's `value`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireError {
    pub error: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stacktrace: Option<String>,
}

impl WireError {
    pub fn into_driver_error(self) -> DriverError {
        match self.error.as_str() {
            ERROR_STALE_ELEMENT => DriverError::StaleElement(self.message),
            ERROR_NO_SUCH_ELEMENT => DriverError::NoSuchElement(self.message),
            ERROR_TIMEOUT | "script timeout" => DriverError::Timeout(self.message),
            ERROR_SESSION_NOT_CREATED => DriverError::SessionNotCreated(self.message),
            ERROR_INVALID_SESSION => DriverError::NotConnected,
            _ => DriverError::CommandFailed {
                code: self.error,
                message: self.message,
            },
        }
    }
}

/// `POST /session` body.
#[derive(Debug, Clone, Serialize)]
pub struct NewSessionRequest {
    pub capabilities: CapabilitiesRequest,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilitiesRequest {
    pub always_match: Value,
    pub first_match: Vec<Value>,
}

impl NewSessionRequest {
    pub fn new(always_match: Value) -> Self {
        Self {
            capabilities: CapabilitiesRequest {
                always_match,
                first_match: vec![Value::Object(Default::default())],
            },
        }
    }
}

/// `POST /session` response value.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSessionResponse {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(default)]
    pub capabilities: Value,
}

/// An element reference in a `find element` response.
///
/// UiAutomator2 sends the same id under both the W3C key and the legacy
/// `ELEMENT` key; either one alone is also accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireElement {
    #[serde(rename = "element-6066-11e4-a52e-4f735466cecf", default)]
    pub w3c: Option<String>,
    #[serde(rename = "ELEMENT", default)]
    pub legacy: Option<String>,
}

impl TryFrom<WireElement> for ElementHandle {
    type Error = DriverError;

    fn try_from(element: WireElement) -> Result<Self, Self::Error> {
        element
            .w3c
            .or(element.legacy)
            .map(ElementHandle::new)
            .ok_or_else(|| {
                DriverError::JsonParse("element reference without an element id".to_string())
            })
    }
}

/// `GET /session/{id}/window/rect` response value.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WindowRect {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl From<WindowRect> for ScreenSize {
    fn from(rect: WindowRect) -> Self {
        ScreenSize::new(rect.width as i32, rect.height as i32)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SendKeysRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionsRequest<'a> {
    pub actions: &'a [InputSequence],
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeoutsRequest {
    pub implicit: u64,
}

/// Builds an element reference object as sent by W3C servers.
pub fn element_json(id: &str) -> Value {
    serde_json::json!({ W3C_ELEMENT_KEY: id, LEGACY_ELEMENT_KEY: id })
}

/// Decodes a response body, mapping W3C error objects to [`DriverError`].
pub fn decode_response<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<T, DriverError> {
    let envelope: Envelope<Value> = serde_json::from_slice(body)
        .map_err(|e| DriverError::JsonParse(format!("{} (HTTP {})", e, status)))?;

    if let Some(error) = wire_error(&envelope.value) {
        return Err(error.into_driver_error());
    }
    if !(200..300).contains(&status) {
        return Err(DriverError::CommandFailed {
            code: format!("http {}", status),
            message: envelope.value.to_string(),
        });
    }

    serde_json::from_value(envelope.value).map_err(|e| DriverError::JsonParse(e.to_string()))
}

fn wire_error(value: &Value) -> Option<WireError> {
    let object = value.as_object()?;
    if !object.get("error").is_some_and(Value::is_string) {
        return None;
    }
    serde_json::from_value(value.clone()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Vec<u8> {
        serde_json::to_vec(&json!({ "value": value })).unwrap()
    }

    #[test]
    fn decodes_element_reference() {
        let element: WireElement = decode_response(200, &body(element_json("el-7"))).unwrap();
        assert_eq!(ElementHandle::try_from(element).unwrap(), ElementHandle::new("el-7"));
    }

    #[test]
    fn decodes_legacy_element_key() {
        let element: WireElement = decode_response(200, &body(json!({ "ELEMENT": "old-1" }))).unwrap();
        assert_eq!(ElementHandle::try_from(element).unwrap(), ElementHandle::new("old-1"));
    }

    #[test]
    fn decodes_w3c_element_key_alone() {
        let element: WireElement =
            decode_response(200, &body(json!({ W3C_ELEMENT_KEY: "w3c-1" }))).unwrap();
        assert_eq!(element.legacy, None);
        assert_eq!(ElementHandle::try_from(element).unwrap(), ElementHandle::new("w3c-1"));
    }

    #[test]
    fn w3c_key_wins_over_legacy_key() {
        let raw = json!({ LEGACY_ELEMENT_KEY: "legacy-2", W3C_ELEMENT_KEY: "w3c-2" });
        let element: WireElement = decode_response(200, &body(raw)).unwrap();
        assert_eq!(ElementHandle::try_from(element).unwrap(), ElementHandle::new("w3c-2"));
    }

    #[test]
    fn element_reference_without_id_is_parse_error() {
        let element: WireElement = decode_response(200, &body(json!({}))).unwrap();
        let err = ElementHandle::try_from(element).unwrap_err();
        assert!(matches!(err, DriverError::JsonParse(_)), "got {err:?}");
    }

    #[test]
    fn null_value_decodes_to_unit() {
        let unit: Result<(), _> = decode_response(200, &body(Value::Null));
        assert!(unit.is_ok());
    }

    #[test]
    fn stale_error_maps_to_stale_variant() {
        let err = decode_response::<bool>(
            404,
            &body(json!({ "error": "stale element reference", "message": "gone" })),
        )
        .unwrap_err();
        assert!(err.is_stale());
    }

    #[test]
    fn no_such_element_maps_to_not_found() {
        let err = decode_response::<WireElement>(
            404,
            &body(json!({ "error": "no such element", "message": "test-LOGIN" })),
        )
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn invalid_session_maps_to_not_connected() {
        let err = decode_response::<()>(404, &body(json!({ "error": "invalid session id", "message": "" })))
            .unwrap_err();
        assert!(matches!(err, DriverError::NotConnected));
    }

    #[test]
    fn unknown_error_keeps_code_and_message() {
        let err = decode_response::<()>(
            400,
            &body(json!({ "error": "element not interactable", "message": "hidden" })),
        )
        .unwrap_err();
        match err {
            DriverError::CommandFailed { code, message } => {
                assert_eq!(code, "element not interactable");
                assert_eq!(message, "hidden");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn non_json_body_is_parse_error() {
        let err = decode_response::<()>(502, b"Bad Gateway").unwrap_err();
        assert!(matches!(err, DriverError::JsonParse(msg) if msg.contains("502")));
    }

    #[test]
    fn http_failure_without_error_object() {
        let err = decode_response::<()>(500, &body(json!("boom"))).unwrap_err();
        assert!(matches!(err, DriverError::CommandFailed { code, .. } if code == "http 500"));
    }

    #[test]
    fn window_rect_truncates_to_screen_size() {
        let rect: WindowRect =
            decode_response(200, &body(json!({ "x": 0, "y": 0, "width": 1080, "height": 2280 }))).unwrap();
        assert_eq!(ScreenSize::from(rect), ScreenSize::new(1080, 2280));
    }

    #[test]
    fn new_session_request_shape() {
        let req = NewSessionRequest::new(json!({ "platformName": "Android" }));
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["capabilities"]["alwaysMatch"]["platformName"], "Android");
        assert_eq!(value["capabilities"]["firstMatch"], json!([{}]));
    }
}
