//! Page text outside the canvas: score, clock, message, restart.

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

pub const SCORE_ID: &str = "score";
pub const TIMER_ID: &str = "timer";
pub const MESSAGE_ID: &str = "message";
pub const RESTART_ID: &str = "restart";

fn element(doc: &Document, id: &str) -> Option<HtmlElement> {
    doc.get_element_by_id(id)?.dyn_into::<HtmlElement>().ok()
}

pub fn set_text(doc: &Document, id: &str, text: &str) {
    if let Some(el) = element(doc, id) {
        el.set_inner_text(text);
    }
}

pub fn set_visible(doc: &Document, id: &str, visible: bool) {
    if let Some(el) = element(doc, id) {
        el.set_hidden(!visible);
    }
}
