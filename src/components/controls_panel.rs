use web_sys::{File, HtmlInputElement};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ControlsPanelProps {
    pub opacity: f64,
    pub transform_summary: String,
    pub camera_label: String,
    pub camera_active: bool,
    pub has_image: bool,
    pub image_name: Option<String>,
    pub error: Option<String>,
    pub on_pick_image: Callback<File>,
    pub on_clear_image: Callback<()>,
    pub on_opacity: Callback<f64>,
    pub on_reset: Callback<()>,
    pub on_fit: Callback<()>,
    pub on_toggle_camera: Callback<()>,
    pub on_flip_camera: Callback<()>,
    pub on_hide: Callback<()>,
}

#[function_component]
pub fn ControlsPanel(props: &ControlsPanelProps) -> Html {
    let file_cb = {
        let cb = props.on_pick_image.clone();
        Callback::from(move |e: Event| {
            let Some(input) = e.target_dyn_into::<HtmlInputElement>() else { return };
            if let Some(file) = input.files().and_then(|list| list.get(0)) {
                cb.emit(file);
            }
            // same file may be picked again
            input.set_value("");
        })
    };
    let opacity_cb = {
        let cb = props.on_opacity.clone();
        Callback::from(move |e: InputEvent| {
            let Some(input) = e.target_dyn_into::<HtmlInputElement>() else { return };
            if let Ok(pct) = input.value().parse::<f64>() {
                cb.emit(pct / 100.0);
            }
        })
    };
    let clear_cb = {
        let cb = props.on_clear_image.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let reset_cb = {
        let cb = props.on_reset.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let fit_cb = {
        let cb = props.on_fit.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let camera_cb = {
        let cb = props.on_toggle_camera.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let flip_cb = {
        let cb = props.on_flip_camera.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let hide_cb = {
        let cb = props.on_hide.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let pct = (props.opacity * 100.0).round() as i32;

    html! {<div style="position:absolute; top:12px; right:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; min-width:220px; display:flex; flex-direction:column; gap:6px; color:#c9d1d9; font-size:13px;">
        <label style="display:flex; flex-direction:column; gap:4px;">
            <span>{"Reference image"}</span>
            <input type="file" accept="image/*" onchange={file_cb} />
            { if let Some(name) = &props.image_name { html!{ <span style="font-size:11px; opacity:0.7;">{ name.clone() }</span> } } else { html!{} } }
        </label>
        <label style="display:flex; align-items:center; gap:8px;">
            <span>{"Opacity"}</span>
            <input type="range" min="0" max="100" step="1" value={pct.to_string()} oninput={opacity_cb} style="flex:1;" />
            <span style="width:36px; text-align:right;">{ format!("{}%", pct) }</span>
        </label>
        <div style="display:flex; gap:6px;">
            <button onclick={reset_cb}>{"Reset"}</button>
            <button onclick={fit_cb} disabled={!props.has_image}>{"Fit"}</button>
            <button onclick={clear_cb} disabled={props.image_name.is_none()}>{"Clear"}</button>
        </div>
        <div style="display:flex; gap:6px;">
            <button onclick={camera_cb}>{ if props.camera_active { "Stop camera" } else { "Start camera" } }</button>
            <button onclick={flip_cb}>{"Flip"}</button>
        </div>
        <button onclick={hide_cb}>{"Hide controls"}</button>
        <div style="font-size:11px; opacity:0.7;">{ props.transform_summary.clone() }</div>
        <div style="font-size:11px; opacity:0.7;">{ props.camera_label.clone() }</div>
        { if let Some(txt) = &props.error { html!{ <div style="font-size:11px; line-height:1.2; background:#1c2128; border:1px solid #f85149; padding:4px 6px; border-radius:6px;">{ txt.clone() }</div> } } else { html!{} } }
    </div>}
}

#[derive(Properties, PartialEq, Clone)]
pub struct ShowControlsProps {
    pub on_show: Callback<()>,
}

#[function_component]
pub fn ShowControlsButton(props: &ShowControlsProps) -> Html {
    let cb = {
        let cb = props.on_show.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {<button onclick={cb} style="position:absolute; top:12px; right:12px; opacity:0.6;">{"☰"}</button>}
}
