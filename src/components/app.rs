use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::{File, HtmlElement, HtmlVideoElement, MediaStream};
use yew::prelude::*;

use super::controls_panel::{ControlsPanel, ShowControlsButton};
use super::overlay_view::{OverlaySink, OverlayView, SurfaceHandle};
use crate::config::{FacingMode, Settings};
use crate::media;
use crate::model::{CameraStatus, OverlayImage, TraceAction, TraceState};
use crate::state::GestureSurface;

#[function_component(App)]
pub fn app() -> Html {
    let state = use_reducer(|| TraceState::from_settings(&Settings::load()));
    let frame_ref = use_node_ref();
    let video_ref = use_node_ref();
    let img_ref = use_node_ref();
    let surface = {
        let img = img_ref.clone();
        let dispatch = state.dispatcher();
        SurfaceHandle(use_mut_ref(move || {
            GestureSurface::new(OverlaySink { img, dispatch })
        }))
    };
    let stream = use_mut_ref(|| None::<MediaStream>);
    // bumps on every start/stop so a slow getUserMedia can't revive a stopped camera
    let camera_seq = use_memo((), |_| media::CameraGuard::default());

    // Persist settings (never the transform)
    {
        let settings = state.settings();
        use_effect_with(settings, move |s| {
            s.save();
            log::set_max_level(s.log_level.into());
            || ()
        });
    }

    let stop_camera = {
        let dispatch = state.dispatcher();
        let stream = stream.clone();
        let video_ref = video_ref.clone();
        let seq = camera_seq.clone();
        Callback::from(move |_: ()| {
            seq.cancel();
            if let Some(s) = stream.borrow_mut().take() {
                media::stop_stream(&s);
            }
            if let Some(video) = video_ref.cast::<HtmlVideoElement>() {
                video.set_src_object(None);
            }
            dispatch.dispatch(TraceAction::SetCameraStatus(CameraStatus::Off));
        })
    };

    let start_camera = {
        let dispatch = state.dispatcher();
        let stream = stream.clone();
        let video_ref = video_ref.clone();
        let seq = camera_seq.clone();
        Callback::from(move |facing: FacingMode| {
            let my_seq = seq.begin();
            if let Some(old) = stream.borrow_mut().take() {
                media::stop_stream(&old);
            }
            dispatch.dispatch(TraceAction::SetCameraStatus(CameraStatus::Starting));
            log::info!("requesting camera, facing {}", facing.as_constraint());
            let dispatch = dispatch.clone();
            let stream = stream.clone();
            let video_ref = video_ref.clone();
            let seq = seq.clone();
            spawn_local(async move {
                let opened = media::open_camera(facing).await;
                if !seq.is_current(my_seq) {
                    if let Ok(s) = opened {
                        media::stop_stream(&s);
                    }
                    return;
                }
                let s = match opened {
                    Ok(s) => s,
                    Err(e) => {
                        log::error!("{e}");
                        dispatch.dispatch(TraceAction::SetCameraStatus(CameraStatus::Failed(
                            e.to_string(),
                        )));
                        return;
                    }
                };
                if let Some(video) = video_ref.cast::<HtmlVideoElement>() {
                    if let Err(e) = media::attach_stream(&video, &s) {
                        log::warn!("{e}");
                    }
                }
                let info = media::track_info(&s).unwrap_or_default();
                log::info!(
                    "camera track {}x{} @ {:?} fps, facing {:?}",
                    info.width,
                    info.height,
                    info.frame_rate,
                    info.facing
                );
                dispatch.dispatch(TraceAction::SetCameraStatus(CameraStatus::Live {
                    width: info.width,
                    height: info.height,
                    facing: info.facing,
                }));
                *stream.borrow_mut() = Some(s);
            });
        })
    };

    // Start the camera on mount, release it on unmount
    {
        let start_camera = start_camera.clone();
        let stream = stream.clone();
        let facing = state.facing_mode;
        let seq = camera_seq.clone();
        use_effect_with((), move |_| {
            start_camera.emit(facing);
            move || {
                seq.cancel();
                if let Some(s) = stream.borrow_mut().take() {
                    media::stop_stream(&s);
                }
            }
        });
    }

    let fit_image = {
        let frame_ref = frame_ref.clone();
        let surface = surface.clone();
        let dispatch = state.dispatcher();
        Rc::new(move |w: u32, h: u32| {
            let Some(frame) = frame_ref.cast::<HtmlElement>() else { return };
            let (fw, fh) = (frame.client_width() as f64, frame.client_height() as f64);
            let fitted = surface.0.borrow_mut().fit(w as f64, h as f64, fw, fh);
            match fitted {
                Ok(t) => {
                    log::debug!("fit {}x{} into {}x{} -> scale {:.3}", w, h, fw, fh, t.scale);
                }
                Err(e) => {
                    log::warn!("{e}");
                    dispatch.dispatch(TraceAction::SetError(Some(e.to_string())));
                }
            }
        })
    };

    let on_image_loaded = {
        let dispatch = state.dispatcher();
        let fit_image = fit_image.clone();
        Callback::from(move |(w, h): (u32, u32)| {
            log::info!("reference image loaded: {}x{}", w, h);
            dispatch.dispatch(TraceAction::ImageLoaded { width: w, height: h });
            fit_image(w, h);
        })
    };

    let on_pick_image = {
        let dispatch = state.dispatcher();
        let previous = state.image.as_ref().map(|img| img.url.clone());
        Callback::from(move |file: File| match media::object_url_for(&file) {
            Ok(url) => {
                if let Some(old) = &previous {
                    media::revoke_object_url(old);
                }
                dispatch.dispatch(TraceAction::SetImage(OverlayImage {
                    url,
                    name: file.name(),
                    width: 0,
                    height: 0,
                }));
            }
            Err(e) => {
                log::error!("{e}");
                dispatch.dispatch(TraceAction::SetError(Some(e.to_string())));
            }
        })
    };

    let on_image_error = {
        let dispatch = state.dispatcher();
        let broken = state.image.as_ref().map(|img| (img.url.clone(), img.name.clone()));
        Callback::from(move |_| {
            if let Some((url, name)) = &broken {
                log::error!("could not decode reference image {name}");
                media::revoke_object_url(url);
            }
            dispatch.dispatch(TraceAction::ImageFailed);
        })
    };

    let on_clear_image = {
        let dispatch = state.dispatcher();
        let previous = state.image.as_ref().map(|img| img.url.clone());
        Callback::from(move |_| {
            if let Some(old) = &previous {
                media::revoke_object_url(old);
            }
            dispatch.dispatch(TraceAction::ClearImage);
        })
    };

    let on_fit = {
        let image = state.image.clone();
        Callback::from(move |_| {
            if let Some(img) = &image {
                if img.width > 0 && img.height > 0 {
                    fit_image(img.width, img.height);
                }
            }
        })
    };
    let on_reset = {
        let surface = surface.clone();
        Callback::from(move |_| surface.0.borrow_mut().reset())
    };
    let on_opacity = {
        let dispatch = state.dispatcher();
        Callback::from(move |o: f64| dispatch.dispatch(TraceAction::SetOpacity(o)))
    };
    let toggle_panel = {
        let dispatch = state.dispatcher();
        Callback::from(move |_| dispatch.dispatch(TraceAction::TogglePanel))
    };
    let on_toggle_camera = {
        let active = state.camera.is_active();
        let facing = state.facing_mode;
        let start_camera = start_camera.clone();
        let stop_camera = stop_camera.clone();
        Callback::from(move |_| {
            if active {
                stop_camera.emit(());
            } else {
                start_camera.emit(facing);
            }
        })
    };
    let on_flip_camera = {
        let dispatch = state.dispatcher();
        let active = state.camera.is_active();
        let facing = state.facing_mode.flipped();
        Callback::from(move |_| {
            dispatch.dispatch(TraceAction::SetFacing(facing));
            if active {
                start_camera.emit(facing);
            }
        })
    };

    html! {
        <div style="position:fixed; inset:0; font-family:system-ui, sans-serif;">
            <OverlayView
                surface={surface.clone()}
                frame_ref={frame_ref.clone()}
                video_ref={video_ref.clone()}
                img_ref={img_ref.clone()}
                image_url={state.image.as_ref().map(|img| img.url.clone())}
                opacity={state.opacity}
                on_image_loaded={on_image_loaded}
                on_image_error={on_image_error}
            />
            {
                if state.panel_visible {
                    html! { <ControlsPanel
                        opacity={state.opacity}
                        transform_summary={state.transform.summary()}
                        camera_label={state.camera.label()}
                        camera_active={state.camera.is_active()}
                        has_image={state.image.as_ref().map(|img| img.width > 0).unwrap_or(false)}
                        image_name={state.image.as_ref().map(|img| img.name.clone())}
                        error={state.error.clone()}
                        on_pick_image={on_pick_image}
                        on_clear_image={on_clear_image}
                        on_opacity={on_opacity}
                        on_reset={on_reset}
                        on_fit={on_fit}
                        on_toggle_camera={on_toggle_camera}
                        on_flip_camera={on_flip_camera}
                        on_hide={toggle_panel.clone()}
                    /> }
                } else {
                    html! { <ShowControlsButton on_show={toggle_panel} /> }
                }
            }
        </div>
    }
}
