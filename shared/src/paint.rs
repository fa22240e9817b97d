use crate::{Point, Stroke, StrokeStyle, BACKGROUND_COLOR};

/// Pixel surface the drawing core paints into.
pub trait Raster {
    fn fill(&mut self, color: &str);
    /// Strokes one independent path: move to the first point, line through the rest.
    fn stroke_path(&mut self, points: &[Point], color: &str, width: f64);
}

/// Painting effect produced by a surface transition.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    None,
    Segment {
        from: Point,
        to: Point,
        style: StrokeStyle,
    },
    /// Paint only the newest committed stroke on top of the current raster.
    Latest,
    /// Fill the background and replay every committed stroke in order.
    Repaint,
}

pub fn draw_stroke<R: Raster + ?Sized>(raster: &mut R, stroke: &Stroke) {
    if stroke.points.is_empty() {
        return;
    }
    raster.stroke_path(&stroke.points, &stroke.color, stroke.width);
}

pub fn replay<R: Raster + ?Sized>(raster: &mut R, strokes: &[Stroke]) {
    raster.fill(BACKGROUND_COLOR);
    for stroke in strokes {
        draw_stroke(raster, stroke);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Raster;
    use crate::Point;

    #[derive(Clone, Debug, PartialEq)]
    pub enum RasterOp {
        Fill(String),
        Path {
            points: Vec<Point>,
            color: String,
            width: f64,
        },
    }

    #[derive(Default)]
    pub struct RecordingRaster {
        pub ops: Vec<RasterOp>,
    }

    impl Raster for RecordingRaster {
        fn fill(&mut self, color: &str) {
            self.ops.push(RasterOp::Fill(color.to_string()));
        }

        fn stroke_path(&mut self, points: &[Point], color: &str, width: f64) {
            self.ops.push(RasterOp::Path {
                points: points.to_vec(),
                color: color.to_string(),
                width,
            });
        }
    }
}
