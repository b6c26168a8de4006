//! Heap usage polling via the non-standard `performance.memory`.
//!
//! Browsers without it get fps-only governance. Some expose the object only
//! after the page has settled, so a missing probe is retried once.

use crate::constants::*;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

#[inline]
pub fn usage_pct(used: f64, limit: f64) -> Option<f32> {
    (used.is_finite() && limit.is_finite() && limit > 0.0)
        .then(|| (used / limit * 100.0).clamp(0.0, 100.0) as f32)
}

fn read_number(target: &JsValue, key: &str) -> Option<f64> {
    js_sys::Reflect::get(target, &JsValue::from_str(key))
        .ok()?
        .as_f64()
}

/// Current heap usage as a percentage of the limit, if the browser reports it.
pub fn read_memory_pct() -> Option<f32> {
    let window = web::window()?;
    let performance = js_sys::Reflect::get(&window, &JsValue::from_str("performance")).ok()?;
    let memory = js_sys::Reflect::get(&performance, &JsValue::from_str("memory")).ok()?;
    if memory.is_undefined() || memory.is_null() {
        return None;
    }
    usage_pct(
        read_number(&memory, "usedJSHeapSize")?,
        read_number(&memory, "jsHeapSizeLimit")?,
    )
}

struct TickerState {
    sink: Rc<Cell<Option<f32>>>,
    mounted: Cell<bool>,
    interval_id: Cell<Option<i32>>,
    timeout_id: Cell<Option<i32>>,
    poll: RefCell<Option<Closure<dyn FnMut()>>>,
    reprobe: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl TickerState {
    fn start_polling(&self) {
        let Some(window) = web::window() else {
            return;
        };
        let poll = self.poll.borrow();
        let Some(poll) = poll.as_ref() else {
            return;
        };
        match window.set_interval_with_callback_and_timeout_and_arguments_0(
            poll.as_ref().unchecked_ref(),
            MEMORY_POLL_MS,
        ) {
            Ok(id) => self.interval_id.set(Some(id)),
            Err(e) => log::warn!("[governor] memory polling unavailable: {:?}", e),
        }
    }

    fn schedule_reprobe(&self) {
        let Some(window) = web::window() else {
            return;
        };
        let reprobe = self.reprobe.borrow();
        let Some(reprobe) = reprobe.as_ref() else {
            return;
        };
        if let Ok(id) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            reprobe.as_ref().unchecked_ref(),
            MEMORY_REPROBE_MS,
        ) {
            self.timeout_id.set(Some(id));
        }
    }
}

/// Owns the polling timers. Dropping it cancels them; callbacks that were
/// already queued see the ticker unmounted and do nothing.
pub struct MemoryTicker {
    state: Rc<TickerState>,
}

impl MemoryTicker {
    pub fn start(sink: Rc<Cell<Option<f32>>>) -> Self {
        let state = Rc::new(TickerState {
            sink,
            mounted: Cell::new(true),
            interval_id: Cell::new(None),
            timeout_id: Cell::new(None),
            poll: RefCell::new(None),
            reprobe: RefCell::new(None),
        });

        let weak: Weak<TickerState> = Rc::downgrade(&state);
        *state.poll.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            let Some(state) = weak.upgrade() else {
                return;
            };
            if state.mounted.get() {
                state.sink.set(read_memory_pct());
            }
        }) as Box<dyn FnMut()>));

        let weak: Weak<TickerState> = Rc::downgrade(&state);
        *state.reprobe.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            let Some(state) = weak.upgrade() else {
                return;
            };
            state.timeout_id.set(None);
            if !state.mounted.get() {
                return;
            }
            match read_memory_pct() {
                Some(pct) => {
                    log::info!("[governor] memory statistics appeared ({pct:.0}%)");
                    state.sink.set(Some(pct));
                    state.start_polling();
                }
                None => log::info!("[governor] memory statistics unavailable; fps only"),
            }
        }) as Box<dyn FnMut()>));

        match read_memory_pct() {
            Some(pct) => {
                state.sink.set(Some(pct));
                state.start_polling();
            }
            None => state.schedule_reprobe(),
        }
        Self { state }
    }
}

impl Drop for MemoryTicker {
    fn drop(&mut self) {
        self.state.mounted.set(false);
        let Some(window) = web::window() else {
            return;
        };
        if let Some(id) = self.state.interval_id.take() {
            window.clear_interval_with_handle(id);
        }
        if let Some(id) = self.state.timeout_id.take() {
            window.clear_timeout_with_handle(id);
        }
        self.state.sink.set(None);
    }
}
