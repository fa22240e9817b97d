use serde::{Deserialize, Serialize};

mod analysis;
mod history;
mod paint;
mod selection;
mod surface;

pub use analysis::{
    analyze_url, interpret_response, AnalysisError, AnalysisState, AnalyzeRequest,
    AnalyzeResponse, GENERIC_ANALYSIS_ERROR,
};
pub use history::History;
pub use paint::{draw_stroke, replay, Paint, Raster};
pub use selection::{
    sanitize_line_width, Selection, StrokeStyle, Tool, BACKGROUND_COLOR, DEFAULT_LINE_WIDTH,
    EXPORT_BACKGROUND_COLOR, EXPORT_FILE_NAME, MAX_LINE_WIDTH, MIN_LINE_WIDTH, PALETTE,
};
pub use surface::{Capture, DrawingSurface, SurfaceEvent};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A finished pointer-down to pointer-up gesture.
///
/// `color` and `width` are the effective style: eraser strokes carry the
/// background color and the doubled width.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Stroke {
    pub points: Vec<Point>,
    pub color: String,
    pub width: f64,
}

impl Stroke {
    pub fn style(&self) -> StrokeStyle {
        StrokeStyle {
            color: self.color.clone(),
            width: self.width,
        }
    }
}
