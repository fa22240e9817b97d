use web_sys::CanvasRenderingContext2d;

use smartnote_shared::{Paint, Point, Raster};

use crate::state::State;

/// [`Raster`] over a 2D canvas context.
pub struct CanvasRaster<'a> {
    ctx: &'a CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl<'a> CanvasRaster<'a> {
    pub fn new(ctx: &'a CanvasRenderingContext2d, width: f64, height: f64) -> Self {
        Self { ctx, width, height }
    }
}

impl Raster for CanvasRaster<'_> {
    fn fill(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
    }

    fn stroke_path(&mut self, points: &[Point], color: &str, width: f64) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width);
        self.ctx.begin_path();
        self.ctx.move_to(first.x, first.y);
        for point in rest {
            self.ctx.line_to(point.x, point.y);
        }
        self.ctx.stroke();
        self.ctx.close_path();
    }
}

pub fn prepare_context(ctx: &CanvasRenderingContext2d) {
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
}

pub fn paint(state: &State, paint: &Paint) {
    let mut raster = CanvasRaster::new(&state.ctx, state.board_width, state.board_height);
    state.surface.render(paint, &mut raster);
}

pub fn redraw(state: &State) {
    paint(state, &Paint::Repaint);
}
