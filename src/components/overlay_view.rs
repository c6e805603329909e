use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlElement, HtmlImageElement, PointerEvent, TouchEvent};
use yew::prelude::*;

use crate::model::{TraceAction, TraceState};
use crate::state::{ContactId, GestureSurface, TransformSink, TransformState};

/// Applies each transform straight to the overlay `<img>`. App state only
/// hears about it once the gesture settles, so moves never re-render.
pub struct OverlaySink {
    pub img: NodeRef,
    pub dispatch: UseReducerDispatcher<TraceState>,
}

pub fn apply_transform(img: &NodeRef, state: &TransformState) {
    if let Some(img) = img.cast::<HtmlElement>() {
        let _ = img.style().set_property("transform", &state.css_transform());
    }
}

impl TransformSink for OverlaySink {
    fn on_transform_changed(&mut self, state: &TransformState) {
        apply_transform(&self.img, state);
    }

    fn on_transform_settled(&mut self, state: &TransformState) {
        self.dispatch.dispatch(TraceAction::SetTransform(*state));
    }
}

#[derive(Clone)]
pub struct SurfaceHandle(pub Rc<RefCell<GestureSurface<OverlaySink>>>);

impl PartialEq for SurfaceHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Which native event stream feeds the gesture surface. Only one is ever
/// attached so a finger is never reported twice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    Pointer,
    Touch,
}

impl InputMode {
    pub fn detect() -> Self {
        let has_pointer = web_sys::window()
            .map(|w| js_sys::Reflect::has(&w, &JsValue::from_str("PointerEvent")).unwrap_or(false))
            .unwrap_or(false);
        if has_pointer {
            InputMode::Pointer
        } else {
            InputMode::Touch
        }
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct OverlayViewProps {
    pub surface: SurfaceHandle,
    pub frame_ref: NodeRef,
    pub video_ref: NodeRef,
    pub img_ref: NodeRef,
    pub image_url: Option<String>,
    pub opacity: f64,
    pub on_image_loaded: Callback<(u32, u32)>,
    pub on_image_error: Callback<()>,
}

#[function_component(OverlayView)]
pub fn overlay_view(props: &OverlayViewProps) -> Html {
    {
        let frame_ref = props.frame_ref.clone();
        let surface = props.surface.0.clone();
        use_effect_with((), move |_| -> Box<dyn FnOnce()> {
            let (Some(frame), Some(window)) = (frame_ref.cast::<HtmlElement>(), web_sys::window())
            else {
                log::error!("overlay frame not mounted, gestures disabled");
                return Box::new(|| ());
            };
            let mode = InputMode::detect();
            log::info!("gesture input mode: {:?}", mode);

            let local = {
                let frame = frame.clone();
                move |client_x: f64, client_y: f64| {
                    let rect = frame.get_bounding_client_rect();
                    (client_x - rect.left(), client_y - rect.top())
                }
            };

            let mut closures: Vec<Closure<dyn FnMut(web_sys::Event)>> = Vec::new();
            let mut bindings: Vec<(&'static str, js_sys::Function)> = Vec::new();
            let mut bind = |events: &[&'static str], cb: Closure<dyn FnMut(web_sys::Event)>| {
                let f: &js_sys::Function = cb.as_ref().unchecked_ref();
                for ev in events {
                    bindings.push((*ev, f.clone()));
                }
                closures.push(cb);
            };
            match mode {
                InputMode::Pointer => {
                    let down_cb = {
                        let surface = surface.clone();
                        let frame = frame.clone();
                        let local = local.clone();
                        Closure::wrap(Box::new(move |e: web_sys::Event| {
                            let Some(e) = e.dyn_ref::<PointerEvent>() else { return };
                            e.prevent_default();
                            let _ = frame.set_pointer_capture(e.pointer_id());
                            let (x, y) = local(e.client_x() as f64, e.client_y() as f64);
                            surface.borrow_mut().down(ContactId(e.pointer_id()), x, y);
                        }) as Box<dyn FnMut(_)>)
                    };
                    let move_cb = {
                        let surface = surface.clone();
                        let local = local.clone();
                        Closure::wrap(Box::new(move |e: web_sys::Event| {
                            let Some(e) = e.dyn_ref::<PointerEvent>() else { return };
                            let (x, y) = local(e.client_x() as f64, e.client_y() as f64);
                            surface.borrow_mut().move_to(ContactId(e.pointer_id()), x, y);
                        }) as Box<dyn FnMut(_)>)
                    };
                    let up_cb = {
                        let surface = surface.clone();
                        Closure::wrap(Box::new(move |e: web_sys::Event| {
                            let Some(e) = e.dyn_ref::<PointerEvent>() else { return };
                            surface.borrow_mut().up(ContactId(e.pointer_id()));
                        }) as Box<dyn FnMut(_)>)
                    };
                    bind(&["pointerdown"], down_cb);
                    bind(&["pointermove"], move_cb);
                    bind(&["pointerup", "pointercancel", "pointerleave"], up_cb);
                }
                InputMode::Touch => {
                    let touch_cb = |kind: &'static str| {
                        let surface = surface.clone();
                        let local = local.clone();
                        Closure::wrap(Box::new(move |e: web_sys::Event| {
                            let Some(e) = e.dyn_ref::<TouchEvent>() else { return };
                            e.prevent_default();
                            let changed = e.changed_touches();
                            let mut s = surface.borrow_mut();
                            for i in 0..changed.length() {
                                let Some(t) = changed.item(i) else { continue };
                                let id = ContactId(t.identifier());
                                let (x, y) = local(t.client_x() as f64, t.client_y() as f64);
                                match kind {
                                    "touchstart" => s.down(id, x, y),
                                    "touchmove" => s.move_to(id, x, y),
                                    _ => s.up(id),
                                }
                            }
                        }) as Box<dyn FnMut(_)>)
                    };
                    bind(&["touchstart"], touch_cb("touchstart"));
                    bind(&["touchmove"], touch_cb("touchmove"));
                    bind(&["touchend", "touchcancel"], touch_cb("touchend"));
                }
            }
            for (ev, f) in &bindings {
                frame.add_event_listener_with_callback(ev, f).ok();
            }
            // contacts held while the tab loses focus never report an up
            let blur_cb = {
                let surface = surface.clone();
                Closure::wrap(Box::new(move |_e: web_sys::Event| {
                    surface.borrow_mut().cancel_all();
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("blur", blur_cb.as_ref().unchecked_ref())
                .ok();

            // Cleanup
            Box::new(move || {
                for (ev, f) in &bindings {
                    let _ = frame.remove_event_listener_with_callback(ev, f);
                }
                let _ = window
                    .remove_event_listener_with_callback("blur", blur_cb.as_ref().unchecked_ref());
                let _keep_alive = (&closures, &blur_cb);
            })
        });
    }

    // a freshly mounted <img> has no inline transform yet
    {
        let img_ref = props.img_ref.clone();
        let surface = props.surface.0.clone();
        use_effect_with(props.image_url.clone(), move |_| {
            apply_transform(&img_ref, &surface.borrow().current_transform());
            || ()
        });
    }

    let onerror = {
        let cb = props.on_image_error.clone();
        Callback::from(move |_: Event| cb.emit(()))
    };
    let onload = {
        let cb = props.on_image_loaded.clone();
        Callback::from(move |e: Event| {
            if let Some(img) = e.target_dyn_into::<HtmlImageElement>() {
                cb.emit((img.natural_width(), img.natural_height()));
            }
        })
    };

    // transform is written by the sink only; keep it out of the vdom
    let img_style = "position:absolute; left:50%; top:50%; max-width:none; pointer-events:none; user-select:none; transform-origin:center;";
    let layer_style = format!(
        "position:absolute; inset:0; pointer-events:none; opacity:{:.2};",
        props.opacity
    );

    html! {
        <div ref={props.frame_ref.clone()} style="position:absolute; inset:0; overflow:hidden; background:#000; touch-action:none;">
            <video ref={props.video_ref.clone()} autoplay=true style="position:absolute; inset:0; width:100%; height:100%; object-fit:cover;"></video>
            {
                if let Some(url) = &props.image_url {
                    html! {
                        <div style={layer_style}>
                            <img ref={props.img_ref.clone()} src={url.clone()} alt="reference" draggable="false" style={img_style} onload={onload} onerror={onerror} />
                        </div>
                    }
                } else {
                    html! {}
                }
            }
        </div>
    }
}
