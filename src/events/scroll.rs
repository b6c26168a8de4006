use crate::dom;
use stage_core::FrameCoalescer;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Scroll events only record geometry; the frame loop consumes it once per frame.
pub fn wire_scroll(container: &web::Element, coalescer: Rc<RefCell<FrameCoalescer>>) {
    let target = container.clone();
    let closure = Closure::wrap(Box::new(move || {
        coalescer
            .borrow_mut()
            .push(dom::read_scroll_signal(&target));
    }) as Box<dyn FnMut()>);
    _ = container.add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Viewport changes alter the scrollable range even without scrolling.
pub fn wire_resize(
    container: &web::Element,
    canvas: Option<web::HtmlCanvasElement>,
    coalescer: Rc<RefCell<FrameCoalescer>>,
) {
    let Some(window) = web::window() else {
        return;
    };
    if let Some(canvas) = &canvas {
        dom::sync_canvas_backing_size(canvas);
    }
    let target = container.clone();
    let closure = Closure::wrap(Box::new(move || {
        if let Some(canvas) = &canvas {
            dom::sync_canvas_backing_size(canvas);
        }
        coalescer
            .borrow_mut()
            .push(dom::read_scroll_signal(&target));
    }) as Box<dyn FnMut()>);
    _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    closure.forget();
}
