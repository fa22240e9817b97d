use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::{Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlButtonElement, HtmlCanvasElement, KeyboardEvent, PointerEvent};

use smartnote_shared::{
    AnalysisError, AnalyzeRequest, DrawingSurface, SurfaceEvent, Tool, GENERIC_ANALYSIS_ERROR,
};

use crate::actions::{dispatch, parse_line_width, shortcut_for, Shortcut};
use crate::config;
use crate::dom::{context_2d, event_to_point, get_element, resize_canvas};
use crate::export::{download_png, snapshot_data_url};
use crate::net::post_analysis;
use crate::overlay::Overlays;
use crate::palette::swatch_index_from_event;
use crate::render::prepare_context;
use crate::state::State;
use crate::toolbar::Toolbar;

fn document_ready_state(document: &web_sys::Document) -> Option<String> {
    Reflect::get(document.as_ref(), &JsValue::from_str("readyState"))
        .ok()?
        .as_string()
}

fn coalesced_pointer_events(event: &PointerEvent) -> Vec<PointerEvent> {
    let get_coalesced_events =
        Reflect::get(event.as_ref(), &JsValue::from_str("getCoalescedEvents"))
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok());

    let mut out = Vec::new();
    if let Some(get_coalesced_events) = get_coalesced_events {
        if let Ok(events) = get_coalesced_events
            .call0(event.as_ref())
            .and_then(|value| value.dyn_into::<js_sys::Array>())
        {
            out.reserve(events.length() as usize);
            for index in 0..events.length() {
                if let Ok(event) = events.get(index).dyn_into::<PointerEvent>() {
                    out.push(event);
                }
            }
        }
    }
    if out.is_empty() {
        out.push(event.clone());
    }
    out.sort_by(|a, b| {
        a.time_stamp()
            .partial_cmp(&b.time_stamp())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    out
}

struct Ui {
    toolbar: Toolbar,
    overlays: Overlays,
}

impl Ui {
    fn sync(&self, surface: &DrawingSurface) {
        self.toolbar.sync(surface);
        self.overlays.render_analysis(surface.analysis());
    }
}

fn on_click(
    button: &HtmlButtonElement,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let onclick = Closure::<dyn FnMut(Event)>::new(handler);
    button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
    onclick.forget();
    Ok(())
}

fn surface_button(
    button: &HtmlButtonElement,
    state: &Rc<RefCell<State>>,
    ui: &Rc<Ui>,
    event: SurfaceEvent,
) -> Result<(), JsValue> {
    let state = state.clone();
    let ui = ui.clone();
    on_click(button, move |_| {
        let mut state = state.borrow_mut();
        dispatch(&mut state, event.clone());
        ui.sync(&state.surface);
    })
}

/// Entry point. Waits for the page to finish loading before wiring the UI.
#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;
    let started = Rc::new(Cell::new(false));

    if document_ready_state(&document).as_deref() == Some("complete") {
        started.set(true);
        return start_app();
    }

    let onload_started = started.clone();
    let onload = Closure::<dyn FnMut(Event)>::new(move |_| {
        if onload_started.replace(true) {
            return;
        }
        if let Err(err) = start_app() {
            web_sys::console::error_1(&err);
        }
    });
    window.add_event_listener_with_callback("load", onload.as_ref().unchecked_ref())?;
    onload.forget();

    Ok(())
}

fn start_app() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    // A second init (hot reload) keeps the first logger.
    let _ = console_log::init_with_level(config::log_level(&window));
    log::info!(
        "Smart Note starting, analysis endpoint configured: {}",
        config::analysis_endpoint().is_some()
    );

    let canvas: HtmlCanvasElement = get_element(&document, "board")?;
    let ctx = context_2d(&canvas)?;
    prepare_context(&ctx);

    let toolbar = Toolbar::from_document(&document)?;
    let overlays = Overlays::from_document(&window, &document)?;
    let result_close: HtmlButtonElement = get_element(&document, "resultClose")?;
    let info_open: HtmlButtonElement = get_element(&document, "infoOpen")?;
    let info_close: HtmlButtonElement = get_element(&document, "infoClose")?;

    let state = Rc::new(RefCell::new(State {
        canvas: canvas.clone(),
        ctx,
        surface: DrawingSurface::new(),
        board_width: 0.0,
        board_height: 0.0,
    }));
    let ui = Rc::new(Ui { toolbar, overlays });

    {
        let mut state = state.borrow_mut();
        resize_canvas(&document, &mut state)?;
        ui.sync(&state.surface);
    }

    {
        let resize_state = state.clone();
        let document_cb = document.clone();
        let onresize = Closure::<dyn FnMut()>::new(move || {
            let mut state = resize_state.borrow_mut();
            if let Err(err) = resize_canvas(&document_cb, &mut state) {
                log::warn!("Canvas resize failed: {err:?}");
            }
        });
        window.add_event_listener_with_callback("resize", onresize.as_ref().unchecked_ref())?;
        onresize.forget();
    }

    {
        let down_state = state.clone();
        let down_ui = ui.clone();
        let down_canvas = canvas.clone();
        let ondown = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            if event.button() != 0 {
                return;
            }
            let Some(point) = event_to_point(&down_canvas, &event) else {
                return;
            };
            event.prevent_default();
            let mut state = down_state.borrow_mut();
            dispatch(&mut state, SurfaceEvent::PointerDown(point));
            down_ui.sync(&state.surface);
        });
        canvas.add_event_listener_with_callback("pointerdown", ondown.as_ref().unchecked_ref())?;
        ondown.forget();
    }

    {
        let move_state = state.clone();
        let move_canvas = canvas.clone();
        let onmove = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let mut state = move_state.borrow_mut();
            if !state.surface.is_drawing() {
                return;
            }
            event.prevent_default();
            for sample in coalesced_pointer_events(&event) {
                if let Some(point) = event_to_point(&move_canvas, &sample) {
                    dispatch(&mut state, SurfaceEvent::PointerMove(point));
                }
            }
        });
        canvas.add_event_listener_with_callback("pointermove", onmove.as_ref().unchecked_ref())?;
        onmove.forget();
    }

    {
        let stop_state = state.clone();
        let stop_ui = ui.clone();
        let onstop = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let mut state = stop_state.borrow_mut();
            if !state.surface.is_drawing() {
                return;
            }
            let surface_event = match event.type_().as_str() {
                "pointerup" => SurfaceEvent::PointerUp,
                _ => SurfaceEvent::PointerLeave,
            };
            dispatch(&mut state, surface_event);
            stop_ui.sync(&state.surface);
        });
        canvas.add_event_listener_with_callback("pointerup", onstop.as_ref().unchecked_ref())?;
        canvas
            .add_event_listener_with_callback("pointercancel", onstop.as_ref().unchecked_ref())?;
        canvas.add_event_listener_with_callback("pointerleave", onstop.as_ref().unchecked_ref())?;
        onstop.forget();
    }

    {
        let key_state = state.clone();
        let key_ui = ui.clone();
        let onkeydown = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
            let modifier = event.meta_key() || event.ctrl_key();
            let Some(shortcut) = shortcut_for(&event.key(), modifier, event.shift_key()) else {
                return;
            };
            event.prevent_default();
            match shortcut {
                Shortcut::Surface(surface_event) => {
                    let mut state = key_state.borrow_mut();
                    dispatch(&mut state, surface_event);
                    key_ui.sync(&state.surface);
                }
                Shortcut::CloseInfo => key_ui.overlays.set_info_open(false),
            }
        });
        window.add_event_listener_with_callback("keydown", onkeydown.as_ref().unchecked_ref())?;
        onkeydown.forget();
    }

    surface_button(&ui.toolbar.pen, &state, &ui, SurfaceEvent::SelectTool(Tool::Pen))?;
    surface_button(
        &ui.toolbar.eraser,
        &state,
        &ui,
        SurfaceEvent::SelectTool(Tool::Eraser),
    )?;
    surface_button(&ui.toolbar.undo, &state, &ui, SurfaceEvent::Undo)?;
    surface_button(&ui.toolbar.redo, &state, &ui, SurfaceEvent::Redo)?;
    surface_button(&ui.toolbar.clear, &state, &ui, SurfaceEvent::Clear)?;

    {
        let palette_state = state.clone();
        let palette_ui = ui.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(index) = swatch_index_from_event(&event) else {
                return;
            };
            let mut state = palette_state.borrow_mut();
            dispatch(&mut state, SurfaceEvent::SelectColor(index));
            palette_ui.sync(&state.surface);
        });
        ui.toolbar
            .palette
            .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let size_state = state.clone();
        let size_ui = ui.clone();
        let oninput = Closure::<dyn FnMut(Event)>::new(move |_| {
            let Some(width) = parse_line_width(&size_ui.toolbar.size.value()) else {
                return;
            };
            let mut state = size_state.borrow_mut();
            dispatch(&mut state, SurfaceEvent::SetLineWidth(width));
            size_ui.sync(&state.surface);
        });
        ui.toolbar
            .size
            .add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())?;
        oninput.forget();
    }

    {
        let download_state = state.clone();
        let document_cb = document.clone();
        let download_ui = ui.clone();
        on_click(&ui.toolbar.download, move |_| {
            let state = download_state.borrow();
            if let Err(err) = download_png(&document_cb, &state.canvas) {
                log::error!("Export failed: {err:?}");
                download_ui.overlays.show_toast("Could not export the drawing.");
            }
        })?;
    }

    {
        let analyze_state = state.clone();
        let analyze_ui = ui.clone();
        let window_cb = window.clone();
        on_click(&ui.toolbar.analyze, move |_| {
            start_analysis(&window_cb, &analyze_state, &analyze_ui);
        })?;
    }

    {
        let close_state = state.clone();
        let close_ui = ui.clone();
        on_click(&result_close, move |_| {
            let mut state = close_state.borrow_mut();
            state.surface.analysis_mut().dismiss();
            close_ui.sync(&state.surface);
        })?;
    }

    {
        let info_ui = ui.clone();
        on_click(&info_open, move |_| info_ui.overlays.set_info_open(true))?;
        let info_ui = ui.clone();
        on_click(&info_close, move |_| info_ui.overlays.set_info_open(false))?;
    }

    log::debug!("Smart Note ready");
    Ok(())
}

fn start_analysis(window: &web_sys::Window, state: &Rc<RefCell<State>>, ui: &Rc<Ui>) {
    let (url, image_data) = {
        let mut state = state.borrow_mut();
        let url = match state
            .surface
            .analysis_mut()
            .begin(config::analysis_endpoint())
        {
            Ok(url) => url,
            Err(AnalysisError::InFlight) => return,
            Err(error) => {
                log::warn!("Analysis not started: {error}");
                ui.overlays.show_toast(&error.to_string());
                ui.sync(&state.surface);
                return;
            }
        };
        match snapshot_data_url(&state.canvas) {
            Ok(image_data) => (url, image_data),
            Err(err) => {
                log::error!("Canvas snapshot failed: {err:?}");
                state
                    .surface
                    .analysis_mut()
                    .finish(Err(AnalysisError::Transport(format!("{err:?}"))));
                ui.overlays.show_toast(GENERIC_ANALYSIS_ERROR);
                ui.sync(&state.surface);
                return;
            }
        }
    };
    ui.sync(&state.borrow().surface);
    log::info!("Analyzing drawing ({} bytes)", image_data.len());

    let window = window.clone();
    let state = state.clone();
    let ui = ui.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let request = AnalyzeRequest { image_data };
        let outcome = post_analysis(&window, &url, &request).await;
        if let Err(error) = &outcome {
            match error {
                AnalysisError::Transport(detail) => log::warn!("Analysis transport error: {detail}"),
                other => log::warn!("Analysis failed: {other:?}"),
            }
            ui.overlays.show_toast(&error.to_string());
        }
        let mut state = state.borrow_mut();
        state.surface.analysis_mut().finish(outcome);
        ui.sync(&state.surface);
    });
}
