use std::cell::Cell;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, Window};

use smartnote_shared::AnalysisState;

use crate::dom::{get_element, set_hidden};

const TOAST_MS: i32 = 4000;

/// Result/error panel plus the transient toast.
pub struct Overlays {
    window: Window,
    result_panel: HtmlElement,
    result_text: HtmlElement,
    toast: HtmlElement,
    toast_timer: Cell<Option<i32>>,
    info_modal: HtmlElement,
}

impl Overlays {
    pub fn from_document(window: &Window, document: &Document) -> Result<Self, JsValue> {
        Ok(Self {
            window: window.clone(),
            result_panel: get_element(document, "result")?,
            result_text: get_element(document, "resultText")?,
            toast: get_element(document, "toast")?,
            toast_timer: Cell::new(None),
            info_modal: get_element(document, "infoModal")?,
        })
    }

    pub fn render_analysis(&self, analysis: &AnalysisState) {
        let (state, text) = match analysis {
            AnalysisState::Idle | AnalysisState::InFlight => {
                set_hidden(&self.result_panel, true);
                return;
            }
            AnalysisState::Result(text) => ("result", text),
            AnalysisState::Error(message) => ("error", message),
        };
        let _ = self.result_panel.set_attribute("data-state", state);
        self.result_text.set_text_content(Some(text.as_str()));
        set_hidden(&self.result_panel, false);
    }

    pub fn show_toast(&self, message: &str) {
        if let Some(timer) = self.toast_timer.take() {
            self.window.clear_timeout_with_handle(timer);
        }
        self.toast.set_text_content(Some(message));
        set_hidden(&self.toast, false);

        let toast = self.toast.clone();
        let hide = Closure::once_into_js(move || set_hidden(&toast, true));
        let timer = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(hide.unchecked_ref(), TOAST_MS)
            .ok();
        self.toast_timer.set(timer);
    }

    pub fn set_info_open(&self, open: bool) {
        set_hidden(&self.info_modal, !open);
    }
}
