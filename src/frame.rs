use crate::constants::*;
use crate::dom;
use crate::events::{target_section, KeyIntent};
use crate::memory::MemoryTicker;
use crate::motion::ReducedMotionWatch;
use crate::overlay::{self, HudFeed};
use instant::Instant;
use stage_core::{AnimationDirector, FrameCoalescer, FrameInput, ScrollSignal};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub director: AnimationDirector,
    pub scroll_root: web::HtmlElement,
    pub coalescer: Rc<RefCell<FrameCoalescer>>,
    pub signal: ScrollSignal,

    pub memory_pct: Rc<Cell<Option<f32>>>,
    pub system_reduce_motion: Rc<Cell<bool>>,
    pub manual_reduce_motion: bool,
    pub hud_feed: Rc<Cell<HudFeed>>,

    pub memory: Option<MemoryTicker>,
    pub motion: Option<ReducedMotionWatch>,
}

impl FrameContext {
    pub fn frame(&mut self, timestamp_ms: f64) {
        if let Some(pending) = self.coalescer.borrow_mut().take() {
            self.signal = pending.signal;
        }
        self.director
            .set_reduce_motion(self.system_reduce_motion.get() || self.manual_reduce_motion);

        let governor = self.director.governor_stats();
        self.hud_feed.set(HudFeed {
            fps: governor.rolling.mean_fps,
            memory_pct: self.memory_pct.get(),
            failures: self.director.diagnostics().total(),
            overridden: self.director.governor().is_overridden(),
            last_change: self.director.last_tier_change(),
        });

        let began = Instant::now();
        self.director.step(FrameInput {
            signal: self.signal,
            timestamp_ms,
            memory_usage_pct: self.memory_pct.get(),
        });
        let spent = began.elapsed();
        if spent.as_secs_f32() * 1000.0 > SLOW_STEP_MS {
            log::debug!("[director] slow step: {:.2?}", spent);
        }
    }

    /// Scroll the container to the start of section `index`.
    pub fn navigate_to(&mut self, index: usize) {
        let signal = dom::read_scroll_signal(&self.scroll_root);
        match self.director.request_section(index, &signal) {
            Ok(command) => dom::scroll_container_to(&self.scroll_root, &command),
            Err(e) => log::warn!("[nav] {e}"),
        }
    }

    pub fn apply_intent(&mut self, intent: KeyIntent) {
        match intent {
            KeyIntent::ToggleHud => {
                if let Some(document) = dom::window_document() {
                    overlay::toggle(&document);
                }
            }
            KeyIntent::ToggleReduceMotion => {
                self.manual_reduce_motion = !self.manual_reduce_motion;
                log::info!(
                    "[director] manual reduce motion {}",
                    if self.manual_reduce_motion { "on" } else { "off" }
                );
            }
            _ => {
                let current = self
                    .director
                    .navigation_target()
                    .unwrap_or(self.director.snapshot().section_index);
                if let Some(index) = target_section(intent, current, self.director.sections().len())
                {
                    self.navigate_to(index);
                }
            }
        }
    }

    /// Cancel timers and listeners and stop the director. Idempotent.
    pub fn teardown(&mut self) {
        self.memory = None;
        self.motion = None;
        self.director.dispose();
    }
}

type RafClosure = Closure<dyn FnMut(f64)>;

struct RafInner {
    closure: RefCell<Option<RafClosure>>,
    callback: RefCell<Box<dyn FnMut(f64)>>,
    running: Cell<bool>,
    raf_id: Cell<Option<i32>>,
}

impl RafInner {
    fn request(&self) {
        let Some(window) = web::window() else {
            return;
        };
        let closure = self.closure.borrow();
        let Some(closure) = closure.as_ref() else {
            return;
        };
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => self.raf_id.set(Some(id)),
            Err(e) => {
                log::error!("requestAnimationFrame failed: {:?}", e);
                self.running.set(false);
            }
        }
    }
}

/// `requestAnimationFrame` loop that re-registers itself each frame until
/// [`stop`](Self::stop) is called or it is dropped.
pub struct RafLoop {
    inner: Rc<RafInner>,
}

impl RafLoop {
    pub fn new(callback: impl FnMut(f64) + 'static) -> Self {
        Self {
            inner: Rc::new(RafInner {
                closure: RefCell::new(None),
                callback: RefCell::new(Box::new(callback)),
                running: Cell::new(false),
                raf_id: Cell::new(None),
            }),
        }
    }

    pub fn start(&self) {
        if self.inner.running.get() {
            return;
        }
        self.inner.running.set(true);
        let weak: Weak<RafInner> = Rc::downgrade(&self.inner);
        let closure = Closure::wrap(Box::new(move |timestamp_ms: f64| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if !inner.running.get() {
                return;
            }
            inner.raf_id.set(None);
            (inner.callback.borrow_mut())(timestamp_ms);
            if inner.running.get() {
                inner.request();
            }
        }) as Box<dyn FnMut(f64)>);
        *self.inner.closure.borrow_mut() = Some(closure);
        self.inner.request();
    }

    pub fn stop(&self) {
        self.inner.running.set(false);
        if let (Some(id), Some(window)) = (self.inner.raf_id.take(), web::window()) {
            _ = window.cancel_animation_frame(id);
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }
}

impl Drop for RafLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) -> Rc<RafLoop> {
    let raf = Rc::new(RafLoop::new(move |timestamp_ms| {
        match frame_ctx.try_borrow_mut() {
            Ok(mut ctx) => ctx.frame(timestamp_ms),
            Err(_) => log::warn!("frame skipped: context busy"),
        }
    }));
    raf.start();
    raf
}
