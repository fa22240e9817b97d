use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use smartnote_shared::DrawingSurface;

pub struct State {
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    pub surface: DrawingSurface,
    pub board_width: f64,
    pub board_height: f64,
}
