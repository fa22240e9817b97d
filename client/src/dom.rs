use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlButtonElement, HtmlCanvasElement,
    HtmlInputElement, HtmlSpanElement, PointerEvent,
};

use smartnote_shared::Point;

use crate::render::{prepare_context, redraw};
use crate::state::State;

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("Missing canvas context"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| JsValue::from_str("Invalid canvas context"))
}

pub fn update_size_label(input: &HtmlInputElement, value: &HtmlSpanElement) {
    value.set_text_content(Some(&input.value()));
}

pub fn set_tool_button(button: &HtmlButtonElement, active: bool) {
    let pressed = if active { "true" } else { "false" };
    let _ = button.set_attribute("aria-pressed", pressed);
}

pub fn set_hidden(element: &Element, hidden: bool) {
    if hidden {
        let _ = element.set_attribute("hidden", "");
    } else {
        let _ = element.remove_attribute("hidden");
    }
}

pub fn event_to_point(canvas: &HtmlCanvasElement, event: &PointerEvent) -> Option<Point> {
    let rect = canvas.get_bounding_client_rect();
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return None;
    }
    Some(Point {
        x: event.client_x() as f64 - rect.left(),
        y: event.client_y() as f64 - rect.top(),
    })
}

/// Resizes the backing store to the canvas' CSS box.
///
/// Existing pixels are copied through a scratch canvas and blitted back at
/// the origin. Stroke coordinates are left as they were, so a later undo
/// replays strokes at their pre-resize positions.
pub fn resize_canvas(document: &Document, state: &mut State) -> Result<(), JsValue> {
    let rect = state.canvas.get_bounding_client_rect();
    let width = rect.width().floor().max(1.0);
    let height = rect.height().floor().max(1.0);
    if width == state.board_width && height == state.board_height {
        return Ok(());
    }
    log::debug!(
        "Resizing canvas from {}x{} to {}x{}",
        state.board_width,
        state.board_height,
        width,
        height
    );

    let initial = state.board_width == 0.0 || state.board_height == 0.0;
    let snapshot = if initial {
        None
    } else {
        let buffer = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()?;
        buffer.set_width(state.canvas.width());
        buffer.set_height(state.canvas.height());
        context_2d(&buffer)?.draw_image_with_html_canvas_element(&state.canvas, 0.0, 0.0)?;
        Some(buffer)
    };

    state.canvas.set_width(width as u32);
    state.canvas.set_height(height as u32);
    state.board_width = width;
    state.board_height = height;
    // Resizing resets the context state.
    prepare_context(&state.ctx);

    match snapshot {
        Some(buffer) => {
            state
                .ctx
                .draw_image_with_html_canvas_element(&buffer, 0.0, 0.0)?;
        }
        None => redraw(state),
    }
    Ok(())
}
