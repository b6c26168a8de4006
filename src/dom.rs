use crate::constants::*;
use stage_core::{RegionProbe, ScrollCommand, ScrollSignal, SectionRect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn js_err(e: JsValue) -> anyhow::Error {
    anyhow::anyhow!("{:?}", e)
}

pub fn element_by_id<T: JsCast>(document: &web::Document, id: &str) -> anyhow::Result<T> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| anyhow::anyhow!("missing #{id}"))?
        .dyn_into::<T>()
        .map_err(|e| anyhow::anyhow!("#{id} has the wrong element type: {:?}", e))
}

#[inline]
pub fn add_click_listener(element: &web::Element, mut handler: impl FnMut() + 'static) {
    let closure =
        wasm_bindgen::closure::Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
    let _ = element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

/// Current scroll geometry of the container.
#[inline]
pub fn read_scroll_signal(container: &web::Element) -> ScrollSignal {
    ScrollSignal::new(
        container.scroll_top() as f32,
        container.scroll_height() as f32,
        container.client_height() as f32,
    )
}

pub fn scroll_container_to(container: &web::Element, command: &ScrollCommand) {
    let options = web::ScrollToOptions::new();
    options.set_top(command.target_offset as f64);
    options.set_behavior(if command.smooth {
        web::ScrollBehavior::Smooth
    } else {
        web::ScrollBehavior::Instant
    });
    container.scroll_to_with_scroll_to_options(&options);
}

/// `(section id, element)` for every `[data-section]` element, in document order.
pub fn section_elements(document: &web::Document) -> Vec<(String, web::HtmlElement)> {
    let Ok(nodes) = document.query_selector_all(&format!("[{SECTION_ATTR}]")) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<web::HtmlElement>().ok())
        .filter_map(|el| el.get_attribute(SECTION_ATTR).map(|id| (id, el)))
        .collect()
}

/// Page region backed by a live element.
pub struct ElementRegion(pub web::Element);

impl RegionProbe for ElementRegion {
    fn rect(&self) -> Option<SectionRect> {
        if !self.0.is_connected() {
            return None;
        }
        let r = self.0.get_bounding_client_rect();
        Some(SectionRect {
            top: r.top() as f32,
            height: r.height() as f32,
        })
    }
}

/// Fallback when the page tables are unusable: sections render statically
/// with the first one marked active, and nothing animates.
pub fn static_presentation(document: &web::Document) {
    if let Some(root) = document.document_element() {
        _ = root.class_list().add_1(STATIC_CLASS);
    }
    if let Some((_, first)) = section_elements(document).into_iter().next() {
        _ = first.class_list().add_1(ACTIVE_CLASS);
    }
}
