use serde::{Deserialize, Serialize};

use crate::paint::{draw_stroke, replay, Paint, Raster};
use crate::{AnalysisState, History, Point, Selection, Stroke, Tool};

/// Pointer tracking for the stroke being drawn.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub enum Capture {
    #[default]
    Idle,
    Drawing {
        points: Vec<Point>,
    },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum SurfaceEvent {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    PointerLeave,
    Undo,
    Redo,
    Clear,
    SelectTool(Tool),
    SelectColor(usize),
    SetLineWidth(u32),
}

/// Application state of the drawing surface.
///
/// Every transition is a plain method returning the [`Paint`] effect the
/// raster needs; nothing here touches a rendering surface directly, so the
/// whole state machine runs without a browser.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct DrawingSurface {
    selection: Selection,
    history: History,
    capture: Capture,
    analysis: AnalysisState,
}

impl DrawingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: SurfaceEvent) -> Paint {
        match event {
            SurfaceEvent::PointerDown(point) => self.pointer_down(point),
            SurfaceEvent::PointerMove(point) => self.pointer_move(point),
            SurfaceEvent::PointerUp | SurfaceEvent::PointerLeave => self.pointer_up(),
            SurfaceEvent::Undo => self.undo(),
            SurfaceEvent::Redo => self.redo(),
            SurfaceEvent::Clear => self.clear(),
            SurfaceEvent::SelectTool(tool) => {
                self.selection.select_tool(tool);
                Paint::None
            }
            SurfaceEvent::SelectColor(index) => {
                self.selection.select_color(index);
                Paint::None
            }
            SurfaceEvent::SetLineWidth(width) => {
                self.selection.set_line_width(width);
                Paint::None
            }
        }
    }

    pub fn pointer_down(&mut self, point: Point) -> Paint {
        // A missed pointer-up must not leave painted pixels outside history.
        self.finish_stroke();
        self.capture = Capture::Drawing {
            points: vec![point],
        };
        Paint::None
    }

    pub fn pointer_move(&mut self, point: Point) -> Paint {
        let Capture::Drawing { points } = &mut self.capture else {
            return Paint::None;
        };
        let from = points.last().copied().unwrap_or(point);
        points.push(point);
        Paint::Segment {
            from,
            to: point,
            style: self.selection.stroke_style(),
        }
    }

    pub fn pointer_up(&mut self) -> Paint {
        self.finish_stroke();
        Paint::None
    }

    fn finish_stroke(&mut self) -> bool {
        let Capture::Drawing { points } = std::mem::take(&mut self.capture) else {
            return false;
        };
        let style = self.selection.stroke_style();
        log::debug!(
            "stroke committed points={} color={} width={}",
            points.len(),
            style.color,
            style.width
        );
        self.history.commit(Stroke {
            points,
            color: style.color,
            width: style.width,
        });
        true
    }

    /// Ignored while a stroke is being captured.
    pub fn undo(&mut self) -> Paint {
        if self.is_drawing() || self.history.undo().is_none() {
            return Paint::None;
        }
        Paint::Repaint
    }

    /// Ignored while a stroke is being captured.
    pub fn redo(&mut self) -> Paint {
        if self.is_drawing() || self.history.redo().is_none() {
            return Paint::None;
        }
        Paint::Latest
    }

    pub fn clear(&mut self) -> Paint {
        self.capture = Capture::Idle;
        self.history.clear();
        self.analysis.dismiss();
        Paint::Repaint
    }

    pub fn render<R: Raster + ?Sized>(&self, paint: &Paint, raster: &mut R) {
        match paint {
            Paint::None => {}
            Paint::Segment { from, to, style } => {
                raster.stroke_path(&[*from, *to], &style.color, style.width);
            }
            Paint::Latest => {
                if let Some(stroke) = self.history.undo_stack().last() {
                    draw_stroke(raster, stroke);
                }
            }
            Paint::Repaint => replay(raster, self.history.undo_stack()),
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn capture(&self) -> &Capture {
        &self.capture
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.capture, Capture::Drawing { .. })
    }

    pub fn analysis(&self) -> &AnalysisState {
        &self.analysis
    }

    pub fn analysis_mut(&mut self) -> &mut AnalysisState {
        &mut self.analysis
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::testing::{RasterOp, RecordingRaster};
    use crate::{StrokeStyle, BACKGROUND_COLOR, PALETTE};

    fn draw(surface: &mut DrawingSurface, points: &[(f64, f64)]) {
        let (first, rest) = points.split_first().unwrap();
        surface.apply(SurfaceEvent::PointerDown(Point::new(first.0, first.1)));
        for (x, y) in rest {
            surface.apply(SurfaceEvent::PointerMove(Point::new(*x, *y)));
        }
        surface.apply(SurfaceEvent::PointerUp);
    }

    #[test]
    fn completed_strokes_land_on_undo_stack() {
        let mut surface = DrawingSurface::new();
        for n in 0..5 {
            draw(&mut surface, &[(n as f64, 0.0), (n as f64, 10.0)]);
        }
        assert_eq!(surface.history().undo_stack().len(), 5);
        assert!(surface.history().redo_stack().is_empty());
        assert!(!surface.is_drawing());
    }

    #[test]
    fn move_while_idle_is_noop() {
        let mut surface = DrawingSurface::new();
        assert_eq!(
            surface.apply(SurfaceEvent::PointerMove(Point::new(1.0, 1.0))),
            Paint::None
        );
        assert_eq!(surface.apply(SurfaceEvent::PointerLeave), Paint::None);
        assert!(!surface.history().can_undo());
    }

    #[test]
    fn move_paints_segment_from_previous_point() {
        let mut surface = DrawingSurface::new();
        surface.apply(SurfaceEvent::SetLineWidth(4));
        surface.apply(SurfaceEvent::PointerDown(Point::new(0.0, 0.0)));
        surface.apply(SurfaceEvent::PointerMove(Point::new(3.0, 4.0)));
        let paint = surface.apply(SurfaceEvent::PointerMove(Point::new(6.0, 8.0)));
        assert_eq!(
            paint,
            Paint::Segment {
                from: Point::new(3.0, 4.0),
                to: Point::new(6.0, 8.0),
                style: StrokeStyle {
                    color: PALETTE[0].into(),
                    width: 4.0,
                },
            }
        );
    }

    #[test]
    fn click_without_moves_records_single_point() {
        let mut surface = DrawingSurface::new();
        draw(&mut surface, &[(7.0, 7.0)]);
        let stroke = &surface.history().undo_stack()[0];
        assert_eq!(stroke.points, vec![Point::new(7.0, 7.0)]);

        let mut raster = RecordingRaster::default();
        surface.render(&Paint::Repaint, &mut raster);
        assert_eq!(raster.ops.len(), 2);
    }

    #[test]
    fn pointer_leave_finishes_stroke() {
        let mut surface = DrawingSurface::new();
        surface.apply(SurfaceEvent::PointerDown(Point::new(0.0, 0.0)));
        surface.apply(SurfaceEvent::PointerMove(Point::new(1.0, 0.0)));
        surface.apply(SurfaceEvent::PointerLeave);
        assert_eq!(surface.history().undo_stack().len(), 1);
    }

    #[test]
    fn repeated_pointer_down_commits_previous_stroke() {
        let mut surface = DrawingSurface::new();
        surface.apply(SurfaceEvent::PointerDown(Point::new(0.0, 0.0)));
        surface.apply(SurfaceEvent::PointerMove(Point::new(1.0, 0.0)));
        surface.apply(SurfaceEvent::PointerDown(Point::new(5.0, 5.0)));
        surface.apply(SurfaceEvent::PointerUp);
        let strokes = surface.history().undo_stack();
        assert_eq!(strokes.len(), 2);
        assert_eq!(strokes[1].points, vec![Point::new(5.0, 5.0)]);
    }

    #[test]
    fn undo_then_redo_restores_history() {
        let mut surface = DrawingSurface::new();
        draw(&mut surface, &[(0.0, 0.0), (1.0, 1.0)]);
        draw(&mut surface, &[(2.0, 2.0), (3.0, 3.0), (4.0, 4.0)]);
        let before = surface.history().undo_stack().to_vec();

        assert_eq!(surface.apply(SurfaceEvent::Undo), Paint::Repaint);
        assert_eq!(surface.apply(SurfaceEvent::Redo), Paint::Latest);
        assert_eq!(surface.history().undo_stack(), before.as_slice());
        assert!(surface.history().redo_stack().is_empty());
    }

    #[test]
    fn new_stroke_after_undo_drops_redo() {
        let mut surface = DrawingSurface::new();
        draw(&mut surface, &[(0.0, 0.0), (1.0, 1.0)]);
        draw(&mut surface, &[(2.0, 2.0), (3.0, 3.0)]);
        surface.apply(SurfaceEvent::Undo);
        surface.apply(SurfaceEvent::Undo);
        assert_eq!(surface.history().redo_stack().len(), 2);

        draw(&mut surface, &[(9.0, 9.0)]);
        assert!(surface.history().redo_stack().is_empty());
        assert_eq!(surface.apply(SurfaceEvent::Redo), Paint::None);
    }

    #[test]
    fn empty_undo_and_redo_are_noops() {
        let mut surface = DrawingSurface::new();
        let before = surface.clone();
        let mut raster = RecordingRaster::default();
        let paint = surface.apply(SurfaceEvent::Undo);
        surface.render(&paint, &mut raster);
        let paint = surface.apply(SurfaceEvent::Redo);
        surface.render(&paint, &mut raster);
        assert_eq!(surface, before);
        assert!(raster.ops.is_empty());
    }

    #[test]
    fn undo_and_redo_are_ignored_mid_stroke() {
        let mut surface = DrawingSurface::new();
        draw(&mut surface, &[(0.0, 0.0), (1.0, 1.0)]);
        surface.apply(SurfaceEvent::PointerDown(Point::new(4.0, 4.0)));
        assert_eq!(surface.apply(SurfaceEvent::Undo), Paint::None);
        assert_eq!(surface.history().undo_stack().len(), 1);
        surface.apply(SurfaceEvent::PointerUp);
        assert_eq!(surface.history().undo_stack().len(), 2);
    }

    #[test]
    fn clear_always_empties_history() {
        let mut surface = DrawingSurface::new();
        draw(&mut surface, &[(0.0, 0.0), (1.0, 1.0)]);
        draw(&mut surface, &[(2.0, 2.0), (3.0, 3.0)]);
        surface.apply(SurfaceEvent::Undo);
        surface.apply(SurfaceEvent::PointerDown(Point::new(8.0, 8.0)));
        surface
            .analysis_mut()
            .finish(Ok("previous answer".to_string()));

        let paint = surface.apply(SurfaceEvent::Clear);
        assert_eq!(paint, Paint::Repaint);
        assert!(surface.history().undo_stack().is_empty());
        assert!(surface.history().redo_stack().is_empty());
        assert!(!surface.is_drawing());
        assert_eq!(surface.analysis(), &AnalysisState::Idle);

        let mut raster = RecordingRaster::default();
        surface.render(&paint, &mut raster);
        assert_eq!(raster.ops, vec![RasterOp::Fill(BACKGROUND_COLOR.into())]);
    }

    #[test]
    fn clear_keeps_request_in_flight() {
        let mut surface = DrawingSurface::new();
        surface
            .analysis_mut()
            .begin(Some("http://localhost:8080"))
            .unwrap();
        surface.apply(SurfaceEvent::Clear);
        assert!(surface.analysis().is_in_flight());
    }

    #[test]
    fn pen_then_eraser_undo_redo_scenario() {
        let mut surface = DrawingSurface::new();
        surface.apply(SurfaceEvent::SelectColor(1));
        surface.apply(SurfaceEvent::SetLineWidth(3));
        draw(&mut surface, &[(10.0, 10.0), (20.0, 20.0), (30.0, 10.0)]);
        let stroke_a = Stroke {
            points: vec![
                Point::new(10.0, 10.0),
                Point::new(20.0, 20.0),
                Point::new(30.0, 10.0),
            ],
            color: PALETTE[1].into(),
            width: 3.0,
        };

        surface.apply(SurfaceEvent::SelectTool(Tool::Eraser));
        draw(&mut surface, &[(15.0, 15.0), (25.0, 15.0)]);
        let stroke_b = Stroke {
            points: vec![Point::new(15.0, 15.0), Point::new(25.0, 15.0)],
            color: BACKGROUND_COLOR.into(),
            width: 6.0,
        };
        assert_eq!(
            surface.history().undo_stack(),
            &[stroke_a.clone(), stroke_b.clone()]
        );

        let paint = surface.apply(SurfaceEvent::Undo);
        assert_eq!(surface.history().undo_stack(), &[stroke_a.clone()]);
        assert_eq!(surface.history().redo_stack(), &[stroke_b.clone()]);
        let mut raster = RecordingRaster::default();
        surface.render(&paint, &mut raster);
        assert_eq!(
            raster.ops,
            vec![
                RasterOp::Fill(BACKGROUND_COLOR.into()),
                RasterOp::Path {
                    points: stroke_a.points.clone(),
                    color: stroke_a.color.clone(),
                    width: 3.0,
                },
            ]
        );

        let paint = surface.apply(SurfaceEvent::Redo);
        assert_eq!(
            surface.history().undo_stack(),
            &[stroke_a, stroke_b.clone()]
        );
        assert!(surface.history().redo_stack().is_empty());
        let mut raster = RecordingRaster::default();
        surface.render(&paint, &mut raster);
        assert_eq!(
            raster.ops,
            vec![RasterOp::Path {
                points: stroke_b.points,
                color: BACKGROUND_COLOR.into(),
                width: 6.0,
            }]
        );
    }

    #[test]
    fn state_round_trips_through_json() {
        let mut surface = DrawingSurface::new();
        surface.apply(SurfaceEvent::SelectColor(3));
        draw(&mut surface, &[(0.0, 0.0), (1.0, 2.0)]);
        let json = serde_json::to_string(&surface).unwrap();
        let restored: DrawingSurface = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, surface);
    }
}
