//! App-level state for the tracing overlay.
//! Gesture math lives in `state`; this reducer only mirrors what the UI shows.

use std::rc::Rc;
use yew::Reducible;

use crate::config::{FacingMode, LogLevel, Settings};
use crate::error::TraceError;
use crate::state::TransformState;

#[derive(Clone, Debug, PartialEq)]
pub enum CameraStatus {
    Off,
    Starting,
    Live {
        width: u32,
        height: u32,
        facing: Option<String>,
    },
    Failed(String),
}

impl CameraStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, CameraStatus::Starting | CameraStatus::Live { .. })
    }

    pub fn label(&self) -> String {
        match self {
            CameraStatus::Off => "Camera off".to_string(),
            CameraStatus::Starting => "Starting camera…".to_string(),
            CameraStatus::Live { width, height, facing } => match facing {
                Some(f) => format!("Camera {}x{} ({})", width, height, f),
                None => format!("Camera {}x{}", width, height),
            },
            CameraStatus::Failed(msg) => format!("Camera error: {}", msg),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OverlayImage {
    /// Object URL owned by the app; revoked when replaced.
    pub url: String,
    pub name: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TraceState {
    pub opacity: f64,
    pub panel_visible: bool,
    pub facing_mode: FacingMode,
    pub log_level: LogLevel,
    pub camera: CameraStatus,
    pub image: Option<OverlayImage>,
    pub transform: TransformState,
    pub error: Option<String>,
}

impl TraceState {
    pub fn from_settings(s: &Settings) -> Self {
        Self {
            opacity: s.opacity,
            panel_visible: s.panel_visible,
            facing_mode: s.facing_mode,
            log_level: s.log_level,
            camera: CameraStatus::Off,
            image: None,
            transform: TransformState::IDENTITY,
            error: None,
        }
    }

    pub fn settings(&self) -> Settings {
        Settings {
            opacity: self.opacity,
            panel_visible: self.panel_visible,
            facing_mode: self.facing_mode,
            log_level: self.log_level,
        }
    }
}

#[derive(Clone, Debug)]
pub enum TraceAction {
    SetOpacity(f64),
    TogglePanel,
    SetImage(OverlayImage),
    ImageLoaded { width: u32, height: u32 },
    /// The browser could not decode the picked file.
    ImageFailed,
    ClearImage,
    SetCameraStatus(CameraStatus),
    SetFacing(FacingMode),
    SetTransform(TransformState),
    SetError(Option<String>),
}

impl Reducible for TraceState {
    type Action = TraceAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use TraceAction::*;
        let mut new = (*self).clone();
        match action {
            SetOpacity(o) => {
                if !o.is_finite() {
                    return self;
                }
                new.opacity = o.clamp(0.0, 1.0);
            }
            TogglePanel => new.panel_visible = !new.panel_visible,
            SetImage(img) => {
                new.image = Some(img);
                new.error = None;
            }
            ImageLoaded { width, height } => match new.image.as_mut() {
                Some(img) => {
                    img.width = width;
                    img.height = height;
                }
                None => return self,
            },
            ImageFailed => match new.image.take() {
                Some(img) => {
                    new.error = Some(TraceError::ImageDecode(img.name).to_string());
                }
                None => return self,
            },
            ClearImage => new.image = None,
            SetCameraStatus(status) => {
                if let CameraStatus::Failed(msg) = &status {
                    new.error = Some(msg.clone());
                }
                new.camera = status;
            }
            SetFacing(f) => new.facing_mode = f,
            SetTransform(t) => {
                if t == self.transform {
                    return self;
                }
                new.transform = t;
            }
            SetError(e) => new.error = e,
        }
        Rc::new(new)
    }
}
