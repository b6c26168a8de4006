use super::{intent_for_key, KeyIntent};
use crate::frame::FrameContext;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Keys typed into form fields belong to the field, not the page.
fn targets_form_field(ev: &web::KeyboardEvent) -> bool {
    ev.target()
        .and_then(|t| t.dyn_into::<web::Element>().ok())
        .map(|el| matches!(el.tag_name().as_str(), "INPUT" | "TEXTAREA" | "SELECT"))
        .unwrap_or(false)
}

pub fn wire_global_keydown(frame_ctx: Rc<RefCell<FrameContext>>) {
    let Some(window) = web::window() else {
        return;
    };
    let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        if ev.ctrl_key()
            || ev.meta_key()
            || ev.alt_key()
            || ev.repeat()
            || targets_form_field(&ev)
        {
            return;
        }
        let Some(intent) = intent_for_key(&ev.key()) else {
            return;
        };
        // Navigation keys replace the browser's own scrolling.
        if !matches!(intent, KeyIntent::ToggleHud | KeyIntent::ToggleReduceMotion) {
            ev.prevent_default();
        }
        match frame_ctx.try_borrow_mut() {
            Ok(mut ctx) => ctx.apply_intent(intent),
            Err(_) => log::warn!("[nav] key {:?} dropped: frame in progress", ev.key()),
        }
    }) as Box<dyn FnMut(_)>);
    _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    closure.forget();
}
