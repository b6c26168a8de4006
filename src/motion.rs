use crate::constants::REDUCED_MOTION_QUERY;
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Mirrors `prefers-reduced-motion` into a shared flag until dropped.
pub struct ReducedMotionWatch {
    query: web::MediaQueryList,
    on_change: Closure<dyn FnMut()>,
}

impl ReducedMotionWatch {
    pub fn new(flag: Rc<Cell<bool>>) -> Option<Self> {
        let query = web::window()?.match_media(REDUCED_MOTION_QUERY).ok()??;
        flag.set(query.matches());
        let watched = query.clone();
        let on_change = Closure::wrap(Box::new(move || {
            let reduce = watched.matches();
            log::info!("[director] system reduce motion {}", if reduce { "on" } else { "off" });
            flag.set(reduce);
        }) as Box<dyn FnMut()>);
        _ = query.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref());
        Some(Self { query, on_change })
    }
}

impl Drop for ReducedMotionWatch {
    fn drop(&mut self) {
        _ = self
            .query
            .remove_event_listener_with_callback("change", self.on_change.as_ref().unchecked_ref());
    }
}
