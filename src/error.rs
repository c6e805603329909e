use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TraceError {
    #[error("no browser window available")]
    NoWindow,
    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),
    #[error("camera permission denied: {0}")]
    CameraDenied(String),
    #[error("could not load image: {0}")]
    ImageDecode(String),
    #[error("image has unusable size {width}x{height}")]
    InvalidImageSize { width: f64, height: f64 },
    #[error("frame has unusable size {width}x{height}")]
    InvalidFrameSize { width: f64, height: f64 },
}

pub type Result<T> = std::result::Result<T, TraceError>;

/// Best-effort text for a thrown JS value (DOMException, Error or string).
pub fn js_message(v: &JsValue) -> String {
    if let Some(s) = v.as_string() {
        return s;
    }
    js_sys::Reflect::get(v, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{v:?}"))
}

/// Name of a thrown DOMException, e.g. `NotAllowedError`.
pub fn js_error_name(v: &JsValue) -> Option<String> {
    js_sys::Reflect::get(v, &JsValue::from_str("name"))
        .ok()
        .and_then(|n| n.as_string())
}

impl TraceError {
    /// Classifies a rejected `getUserMedia` promise.
    pub fn from_camera(v: &JsValue) -> Self {
        let msg = js_message(v);
        match js_error_name(v).as_deref() {
            Some("NotAllowedError") | Some("SecurityError") => TraceError::CameraDenied(msg),
            _ => TraceError::CameraUnavailable(msg),
        }
    }
}
