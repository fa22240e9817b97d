use std::cell::Cell;

use web_sys::{Document, HtmlButtonElement, HtmlElement, HtmlInputElement, HtmlSpanElement};

use smartnote_shared::{DrawingSurface, Tool};

use crate::dom::{get_element, set_tool_button, update_size_label};
use crate::palette::{palette_stale, render_palette};

/// Floating toolbar controls mirrored from the surface state.
#[derive(Clone)]
pub struct Toolbar {
    pub document: Document,
    pub pen: HtmlButtonElement,
    pub eraser: HtmlButtonElement,
    pub palette: HtmlElement,
    pub size: HtmlInputElement,
    pub size_value: HtmlSpanElement,
    pub undo: HtmlButtonElement,
    pub redo: HtmlButtonElement,
    pub clear: HtmlButtonElement,
    pub download: HtmlButtonElement,
    pub analyze: HtmlButtonElement,
    pub analyze_label: HtmlSpanElement,
    rendered_swatch: Cell<Option<Option<usize>>>,
}

impl Toolbar {
    pub fn from_document(document: &Document) -> Result<Self, wasm_bindgen::JsValue> {
        Ok(Self {
            document: document.clone(),
            pen: get_element(document, "pen")?,
            eraser: get_element(document, "eraser")?,
            palette: get_element(document, "palette")?,
            size: get_element(document, "size")?,
            size_value: get_element(document, "sizeValue")?,
            undo: get_element(document, "undo")?,
            redo: get_element(document, "redo")?,
            clear: get_element(document, "clear")?,
            download: get_element(document, "download")?,
            analyze: get_element(document, "analyze")?,
            analyze_label: get_element(document, "analyzeLabel")?,
            rendered_swatch: Cell::new(None),
        })
    }

    pub fn sync(&self, surface: &DrawingSurface) {
        let selection = surface.selection();
        set_tool_button(&self.pen, selection.tool() == Tool::Pen);
        set_tool_button(&self.eraser, selection.tool() == Tool::Eraser);
        let active = selection.active_swatch();
        if palette_stale(self.rendered_swatch.get(), active) {
            render_palette(&self.document, &self.palette, active);
            self.rendered_swatch.set(Some(active));
        }

        let width = selection.line_width().to_string();
        if self.size.value() != width {
            self.size.set_value(&width);
        }
        update_size_label(&self.size, &self.size_value);

        self.undo.set_disabled(!surface.history().can_undo());
        self.redo.set_disabled(!surface.history().can_redo());

        let busy = surface.analysis().is_in_flight();
        self.analyze.set_disabled(busy);
        let _ = self
            .analyze
            .set_attribute("aria-busy", if busy { "true" } else { "false" });
        self.analyze_label
            .set_text_content(Some(if busy { "Analyzing..." } else { "Analyze" }));
    }
}
