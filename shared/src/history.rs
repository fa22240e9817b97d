use serde::{Deserialize, Serialize};

use crate::Stroke;

/// Linear undo/redo over committed strokes, oldest first.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct History {
    undo_stack: Vec<Stroke>,
    redo_stack: Vec<Stroke>,
}

impl History {
    pub fn commit(&mut self, stroke: Stroke) {
        self.undo_stack.push(stroke);
        self.redo_stack.clear();
    }

    /// Moves the newest committed stroke onto the redo stack.
    pub fn undo(&mut self) -> Option<&Stroke> {
        let stroke = self.undo_stack.pop()?;
        self.redo_stack.push(stroke);
        self.redo_stack.last()
    }

    /// Moves the most recently undone stroke back onto the undo stack.
    pub fn redo(&mut self) -> Option<&Stroke> {
        let stroke = self.redo_stack.pop()?;
        self.undo_stack.push(stroke);
        self.undo_stack.last()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_stack(&self) -> &[Stroke] {
        &self.undo_stack
    }

    pub fn redo_stack(&self) -> &[Stroke] {
        &self.redo_stack
    }
}
