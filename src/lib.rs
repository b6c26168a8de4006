#![cfg(target_arch = "wasm32")]
use crate::constants::*;
use crate::frame::FrameContext;
use stage_core::{default_director, AnimationDirector, DirectorConfig, FrameCoalescer};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

mod constants;
mod consumers;
mod dom;
mod events;
mod field;
mod frame;
mod lifecycle;
mod memory;
mod motion;
mod overlay;
mod particles;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("stage-web starting");

    if let Err(e) = init() {
        log::error!("init error: {:?}", e);
    }
    Ok(())
}

/// Attach every consumer the page has elements for. Missing optional
/// elements just mean fewer effects.
fn subscribe_consumers(
    director: &mut AnimationDirector,
    document: &web::Document,
    hud_feed: &Rc<Cell<overlay::HudFeed>>,
) -> anyhow::Result<Vec<web::Element>> {
    let sections = dom::section_elements(document);
    for (id, el) in &sections {
        let probe = Box::new(dom::ElementRegion(el.clone().into()));
        if let Err(e) = director.register_region(id, probe) {
            log::warn!("[director] {e}");
        }
    }
    let markers = consumers::SectionMarkers::new(director.sections(), sections);
    director.subscribe(Box::new(markers));
    director.subscribe(Box::new(consumers::BackgroundLayer::new(document)?));

    let mut dots = Vec::new();
    if let Some(container) = document.get_element_by_id(NAV_DOTS_ID) {
        let nav = consumers::NavDots::build(document, &container, director.sections())?;
        dots = nav.dots().to_vec();
        director.subscribe(Box::new(nav));
    }

    match dom::element_by_id::<web::HtmlCanvasElement>(document, PARTICLE_CANVAS_ID)
        .and_then(particles::ParticleCanvas::new)
    {
        Ok(layer) => director.subscribe(Box::new(layer)),
        Err(e) => log::warn!("particle layer disabled: {e:#}"),
    }

    if let Some(el) = document.get_element_by_id(DEBUG_HUD_ID) {
        overlay::hide(document);
        director.subscribe(Box::new(overlay::DebugHud::new(el, hud_feed.clone())));
    }
    Ok(dots)
}

fn wire_nav_dots(dots: Vec<web::Element>, frame_ctx: &Rc<RefCell<FrameContext>>) {
    for (index, dot) in dots.into_iter().enumerate() {
        let ctx = frame_ctx.clone();
        dom::add_click_listener(&dot, move || match ctx.try_borrow_mut() {
            Ok(mut ctx) => ctx.navigate_to(index),
            Err(_) => log::warn!("[nav] click dropped: frame in progress"),
        });
    }
}

/// A page entering the back-forward cache only pauses the loop; it resumes on
/// `pageshow`. Any other unload tears the director down.
fn wire_page_lifecycle(raf: Rc<frame::RafLoop>, frame_ctx: Rc<RefCell<FrameContext>>) {
    let Some(window) = web::window() else {
        return;
    };
    let hide_raf = raf.clone();
    let on_hide = Closure::wrap(Box::new(move |ev: web::PageTransitionEvent| {
        if hide_raf.is_running() {
            hide_raf.stop();
            log::info!("page hidden; animation loop stopped");
        }
        if lifecycle::hide_action(ev.persisted()) == lifecycle::HideAction::Teardown {
            if let Ok(mut ctx) = frame_ctx.try_borrow_mut() {
                ctx.teardown();
            }
        }
    }) as Box<dyn FnMut(web::PageTransitionEvent)>);
    _ = window.add_event_listener_with_callback("pagehide", on_hide.as_ref().unchecked_ref());
    on_hide.forget();

    let on_show = Closure::wrap(Box::new(move |ev: web::PageTransitionEvent| {
        if lifecycle::should_resume(ev.persisted(), raf.is_running()) {
            raf.start();
            log::info!("page restored from cache; animation loop resumed");
        }
    }) as Box<dyn FnMut(web::PageTransitionEvent)>);
    _ = window.add_event_listener_with_callback("pageshow", on_show.as_ref().unchecked_ref());
    on_show.forget();
}

fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let scroll_root: web::HtmlElement = dom::element_by_id(&document, SCROLL_ROOT_ID)?;

    let mut director = match default_director(DirectorConfig::default()) {
        Ok(d) => d,
        Err(e) => {
            log::error!("[director] page tables rejected: {e}");
            dom::static_presentation(&document);
            return Ok(());
        }
    };

    let hud_feed = Rc::new(Cell::new(overlay::HudFeed::default()));
    let dots = subscribe_consumers(&mut director, &document, &hud_feed)?;

    let coalescer = Rc::new(RefCell::new(FrameCoalescer::new()));
    let memory_pct = Rc::new(Cell::new(None));
    let system_reduce_motion = Rc::new(Cell::new(false));
    let motion = motion::ReducedMotionWatch::new(system_reduce_motion.clone());
    let memory = memory::MemoryTicker::start(memory_pct.clone());

    let frame_ctx = Rc::new(RefCell::new(FrameContext {
        director,
        signal: dom::read_scroll_signal(&scroll_root),
        scroll_root: scroll_root.clone(),
        coalescer: coalescer.clone(),
        memory_pct,
        system_reduce_motion,
        manual_reduce_motion: false,
        hud_feed,
        memory: Some(memory),
        motion,
    }));

    events::wire_scroll(&scroll_root, coalescer.clone());
    let canvas = dom::element_by_id::<web::HtmlCanvasElement>(&document, PARTICLE_CANVAS_ID).ok();
    events::wire_resize(&scroll_root, canvas, coalescer);
    events::wire_global_keydown(frame_ctx.clone());
    wire_nav_dots(dots, &frame_ctx);

    let raf = frame::start_loop(frame_ctx.clone());
    wire_page_lifecycle(raf, frame_ctx);
    Ok(())
}
