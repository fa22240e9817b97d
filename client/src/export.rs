use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlAnchorElement, HtmlCanvasElement};

use smartnote_shared::{EXPORT_BACKGROUND_COLOR, EXPORT_FILE_NAME};

use crate::dom::context_2d;

const PNG_MIME: &str = "image/png";

pub fn snapshot_data_url(canvas: &HtmlCanvasElement) -> Result<String, JsValue> {
    canvas.to_data_url_with_type(PNG_MIME)
}

/// Saves the raster as a PNG composited over an opaque white background.
pub fn download_png(document: &Document, source: &HtmlCanvasElement) -> Result<(), JsValue> {
    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()?;
    canvas.set_width(source.width());
    canvas.set_height(source.height());
    let ctx = context_2d(&canvas)?;
    ctx.set_fill_style_str(EXPORT_BACKGROUND_COLOR);
    ctx.fill_rect(0.0, 0.0, source.width() as f64, source.height() as f64);
    ctx.draw_image_with_html_canvas_element(source, 0.0, 0.0)?;

    let href = snapshot_data_url(&canvas)?;
    let anchor = document
        .create_element("a")?
        .dyn_into::<HtmlAnchorElement>()?;
    anchor.set_href(&href);
    anchor.set_download(EXPORT_FILE_NAME);
    anchor.click();
    log::info!("Exported {EXPORT_FILE_NAME} ({}x{})", canvas.width(), canvas.height());
    Ok(())
}
