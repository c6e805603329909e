//! Camera acquisition and reference-image loading.

use std::cell::Cell;

use js_sys::{Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, HtmlVideoElement, MediaStream, MediaStreamConstraints, MediaStreamTrack, Url};

use crate::config::FacingMode;
use crate::error::{Result, TraceError, js_message};

/// Invalidates in-flight camera requests. Every start, stop and unmount
/// bumps the generation; a request whose ticket is stale must release its
/// stream instead of attaching it.
#[derive(Debug, Default)]
pub struct CameraGuard {
    generation: Cell<u32>,
}

impl CameraGuard {
    pub fn begin(&self) -> u32 {
        self.cancel();
        self.generation.get()
    }

    pub fn cancel(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
    }

    pub fn is_current(&self, ticket: u32) -> bool {
        self.generation.get() == ticket
    }
}

/// Settings the browser actually granted for the video track.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackInfo {
    pub width: u32,
    pub height: u32,
    pub frame_rate: Option<f64>,
    pub facing: Option<String>,
}

fn video_constraints(facing: FacingMode) -> Result<MediaStreamConstraints> {
    let video = Object::new();
    Reflect::set(
        &video,
        &JsValue::from_str("facingMode"),
        &JsValue::from_str(facing.as_constraint()),
    )
    .map_err(|e| TraceError::CameraUnavailable(js_message(&e)))?;
    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&video);
    constraints.set_audio(&JsValue::FALSE);
    Ok(constraints)
}

pub async fn open_camera(facing: FacingMode) -> Result<MediaStream> {
    let window = web_sys::window().ok_or(TraceError::NoWindow)?;
    let devices = window
        .navigator()
        .media_devices()
        .map_err(|e| TraceError::CameraUnavailable(js_message(&e)))?;
    let constraints = video_constraints(facing)?;
    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(|e| TraceError::from_camera(&e))?;
    let stream = JsFuture::from(promise)
        .await
        .map_err(|e| TraceError::from_camera(&e))?;
    stream
        .dyn_into::<MediaStream>()
        .map_err(|_| TraceError::CameraUnavailable("getUserMedia returned no stream".into()))
}

pub fn attach_stream(video: &HtmlVideoElement, stream: &MediaStream) -> Result<()> {
    video.set_muted(true);
    // iOS Safari goes fullscreen without this
    let _ = video.set_attribute("playsinline", "");
    video.set_src_object(Some(stream));
    video
        .play()
        .map(|_| ())
        .map_err(|e| TraceError::CameraUnavailable(js_message(&e)))
}

fn video_tracks(stream: &MediaStream) -> Vec<MediaStreamTrack> {
    stream
        .get_video_tracks()
        .iter()
        .filter_map(|t| t.dyn_into::<MediaStreamTrack>().ok())
        .collect()
}

pub fn track_info(stream: &MediaStream) -> Option<TrackInfo> {
    let track = video_tracks(stream).into_iter().next()?;
    let settings: JsValue = track.get_settings().into();
    let num = |key: &str| {
        Reflect::get(&settings, &JsValue::from_str(key))
            .ok()
            .and_then(|v| v.as_f64())
    };
    let facing = Reflect::get(&settings, &JsValue::from_str("facingMode"))
        .ok()
        .and_then(|v| v.as_string());
    Some(TrackInfo {
        width: num("width").unwrap_or(0.0) as u32,
        height: num("height").unwrap_or(0.0) as u32,
        frame_rate: num("frameRate"),
        facing,
    })
}

pub fn stop_stream(stream: &MediaStream) {
    for track in video_tracks(stream) {
        track.stop();
    }
    log::info!("camera stream stopped");
}

pub fn object_url_for(file: &File) -> Result<String> {
    Url::create_object_url_with_blob(file).map_err(|e| TraceError::ImageDecode(js_message(&e)))
}

pub fn revoke_object_url(url: &str) {
    let _ = Url::revoke_object_url(url);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmount_cancel_makes_pending_request_stale() {
        let guard = CameraGuard::default();
        let ticket = guard.begin();
        assert!(guard.is_current(ticket));
        guard.cancel();
        assert!(!guard.is_current(ticket));
    }

    #[test]
    fn newer_start_supersedes_older() {
        let guard = CameraGuard::default();
        let first = guard.begin();
        let second = guard.begin();
        assert!(!guard.is_current(first));
        assert!(guard.is_current(second));
    }
}
