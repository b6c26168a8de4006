//! DOM-facing snapshot consumers: navigation dots, section markers, and the
//! background layer. Each one skips work when handed a snapshot it has
//! already applied.

use crate::constants::*;
use crate::dom::js_err;
use stage_core::{css_hex, FrameSnapshot, PhaseState, SectionTable, SnapshotConsumer};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct NavDots {
    dots: Vec<web::Element>,
    active: Option<usize>,
}

impl NavDots {
    /// Replace the container's children with one dot per section.
    pub fn build(
        document: &web::Document,
        container: &web::Element,
        sections: &SectionTable,
    ) -> anyhow::Result<Self> {
        container.set_inner_html("");
        let mut dots = Vec::with_capacity(sections.len());
        for section in sections.sections() {
            let dot = document.create_element("button").map_err(js_err)?;
            dot.set_class_name(NAV_DOT_CLASS);
            dot.set_attribute("type", "button").map_err(js_err)?;
            dot.set_attribute(NAV_INDEX_ATTR, &section.index.to_string())
                .map_err(js_err)?;
            dot.set_attribute("aria-label", &section.id).map_err(js_err)?;
            container.append_child(&dot).map_err(js_err)?;
            dots.push(dot);
        }
        Ok(Self { dots, active: None })
    }

    pub fn dots(&self) -> &[web::Element] {
        &self.dots
    }
}

impl SnapshotConsumer for NavDots {
    fn name(&self) -> &str {
        "nav-dots"
    }

    fn on_snapshot(&mut self, snapshot: &FrameSnapshot) -> anyhow::Result<()> {
        if self.active == Some(snapshot.section_index) {
            return Ok(());
        }
        if let Some(old) = self.active.and_then(|i| self.dots.get(i)) {
            old.class_list().remove_1(ACTIVE_CLASS).map_err(js_err)?;
            old.remove_attribute("aria-current").map_err(js_err)?;
        }
        let dot = self
            .dots
            .get(snapshot.section_index)
            .ok_or_else(|| anyhow::anyhow!("no dot for section {}", snapshot.section_index))?;
        dot.class_list().add_1(ACTIVE_CLASS).map_err(js_err)?;
        dot.set_attribute("aria-current", "true").map_err(js_err)?;
        self.active = Some(snapshot.section_index);
        Ok(())
    }
}

/// Marks the active section and exposes phase values to CSS as custom
/// properties (`--phase-<id>`, `--phase-<id>-<group>`).
pub struct SectionMarkers {
    /// Indexed by section; sections without an element are `None`.
    elements: Vec<Option<web::HtmlElement>>,
    active: Option<usize>,
    last_frame: Option<u64>,
}

impl SectionMarkers {
    pub fn new(sections: &SectionTable, found: Vec<(String, web::HtmlElement)>) -> Self {
        let mut elements = vec![None; sections.len()];
        for (id, el) in found {
            match sections.index_of(&id) {
                Some(i) => elements[i] = Some(el),
                None => log::warn!("[scroll] element for unknown section '{id}' ignored"),
            }
        }
        Self {
            elements,
            active: None,
            last_frame: None,
        }
    }

    fn write_phases(
        el: &web::HtmlElement,
        local: f32,
        phases: &[PhaseState],
    ) -> anyhow::Result<()> {
        let style = el.style();
        style
            .set_property("--section-progress", &format!("{local:.4}"))
            .map_err(js_err)?;
        for phase in phases {
            let name = format!("--phase-{}", phase.phase_id);
            style
                .set_property(&name, &format!("{:.4}", phase.eased))
                .map_err(js_err)?;
            if phase.groups.len() > 1 {
                for (k, value) in phase.groups.iter().enumerate() {
                    style
                        .set_property(&format!("{name}-{k}"), &format!("{value:.4}"))
                        .map_err(js_err)?;
                }
            }
        }
        Ok(())
    }
}

impl SnapshotConsumer for SectionMarkers {
    fn name(&self) -> &str {
        "section-markers"
    }

    fn on_snapshot(&mut self, snapshot: &FrameSnapshot) -> anyhow::Result<()> {
        if self.last_frame == Some(snapshot.frame) {
            return Ok(());
        }
        self.last_frame = Some(snapshot.frame);

        if self.active != Some(snapshot.section_index) {
            if let Some(Some(old)) = self.active.map(|i| self.elements.get(i).cloned().flatten()) {
                old.class_list().remove_1(ACTIVE_CLASS).map_err(js_err)?;
            }
            if let Some(Some(el)) = self.elements.get(snapshot.section_index) {
                el.class_list().add_1(ACTIVE_CLASS).map_err(js_err)?;
            }
            self.active = Some(snapshot.section_index);
        }

        if let Some(Some(el)) = self.elements.get(snapshot.section_index) {
            Self::write_phases(el, snapshot.local_progress, &snapshot.phases)?;
        }
        if let Some(partner) = snapshot.blend_partner {
            if let Some(Some(el)) = self.elements.get(partner) {
                let local = if partner < snapshot.section_index { 1.0 } else { 0.0 };
                Self::write_phases(el, local, &snapshot.neighbor_phases)?;
            }
        }
        Ok(())
    }
}

/// Page-wide colours and blur as CSS custom properties on `<html>`.
pub struct BackgroundLayer {
    root: web::HtmlElement,
    palette: Option<Rc<str>>,
    last_frame: Option<u64>,
}

impl BackgroundLayer {
    pub fn new(document: &web::Document) -> anyhow::Result<Self> {
        let root = document
            .document_element()
            .ok_or_else(|| anyhow::anyhow!("no document element"))?
            .dyn_into::<web::HtmlElement>()
            .map_err(|e| anyhow::anyhow!("document element is not HTML: {:?}", e))?;
        Ok(Self {
            root,
            palette: None,
            last_frame: None,
        })
    }
}

impl SnapshotConsumer for BackgroundLayer {
    fn name(&self) -> &str {
        "background"
    }

    fn on_snapshot(&mut self, snapshot: &FrameSnapshot) -> anyhow::Result<()> {
        if self.last_frame == Some(snapshot.frame) {
            return Ok(());
        }
        self.last_frame = Some(snapshot.frame);

        let theme = &snapshot.theme;
        let style = self.root.style();
        style
            .set_property("--stage-bg", &css_hex(theme.background))
            .map_err(js_err)?;
        style
            .set_property("--stage-accent", &css_hex(theme.accent))
            .map_err(js_err)?;
        style
            .set_property("--stage-particle", &css_hex(theme.particle_color))
            .map_err(js_err)?;
        style
            .set_property("--stage-blur", &format!("{:.1}px", snapshot.effects.blur_px))
            .map_err(js_err)?;
        style
            .set_property("--stage-complexity", &format!("{:.2}", snapshot.effects.complexity))
            .map_err(js_err)?;

        if self.palette.as_deref() != Some(&*theme.palette_id) {
            self.root
                .set_attribute(PALETTE_ATTR, &theme.palette_id)
                .map_err(js_err)?;
            log::debug!("[scroll] palette {}", theme.palette_id);
            self.palette = Some(Rc::clone(&theme.palette_id));
        }
        Ok(())
    }
}
