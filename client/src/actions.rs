use smartnote_shared::{Paint, SurfaceEvent};

use crate::render::paint;
use crate::state::State;

#[derive(Clone, Debug, PartialEq)]
pub enum Shortcut {
    Surface(SurfaceEvent),
    CloseInfo,
}

/// Applies an event to the surface and paints whatever it produced.
pub fn dispatch(state: &mut State, event: SurfaceEvent) -> Paint {
    let effect = state.surface.apply(event);
    paint(state, &effect);
    effect
}

pub fn shortcut_for(key: &str, modifier: bool, shift: bool) -> Option<Shortcut> {
    if key == "Escape" {
        return Some(Shortcut::CloseInfo);
    }
    if !modifier {
        return None;
    }
    if key.eq_ignore_ascii_case("z") {
        let event = if shift {
            SurfaceEvent::Redo
        } else {
            SurfaceEvent::Undo
        };
        return Some(Shortcut::Surface(event));
    }
    if key.eq_ignore_ascii_case("y") {
        return Some(Shortcut::Surface(SurfaceEvent::Redo));
    }
    None
}

pub fn parse_line_width(value: &str) -> Option<u32> {
    value.trim().parse::<f64>().ok().filter(|width| width.is_finite()).map(|width| {
        width.round().max(0.0) as u32
    })
}
