use crate::constants::*;
use stage_core::{FrameSnapshot, SnapshotConsumer, TierChange};
use std::cell::Cell;
use std::rc::Rc;
use web_sys as web;

#[inline]
pub fn show(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(DEBUG_HUD_ID) {
        _ = el.class_list().remove_1(HIDDEN_CLASS);
        // fallback for environments without CSS class
        _ = el.set_attribute("style", "");
    }
}

#[inline]
pub fn hide(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(DEBUG_HUD_ID) {
        _ = el.class_list().add_1(HIDDEN_CLASS);
        // fallback
        _ = el.set_attribute("style", "display:none");
    }
}

#[inline]
pub fn is_hidden(document: &web::Document) -> bool {
    if let Some(el) = document.get_element_by_id(DEBUG_HUD_ID) {
        return is_element_hidden(&el);
    }
    true
}

fn is_element_hidden(el: &web::Element) -> bool {
    if el.class_list().contains(HIDDEN_CLASS) {
        return true;
    }
    el.get_attribute("style")
        .map(|s| s.contains("display:none"))
        .unwrap_or(false)
}

#[inline]
pub fn toggle(document: &web::Document) {
    if is_hidden(document) {
        show(document);
    } else {
        hide(document);
    }
}

/// Figures the HUD shows that are not part of the snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HudFeed {
    pub fps: f32,
    pub memory_pct: Option<f32>,
    pub failures: u64,
    pub overridden: bool,
    pub last_change: Option<TierChange>,
}

pub fn hud_text(snapshot: &FrameSnapshot, feed: &HudFeed) -> String {
    let memory = feed
        .memory_pct
        .map(|m| format!("{m:.0}%"))
        .unwrap_or_else(|| "n/a".to_string());
    let tier = if feed.overridden {
        format!("{} (forced)", snapshot.quality_tier.label())
    } else {
        snapshot.quality_tier.label().to_string()
    };
    let mut text = format!(
        "{} [{}] {:.0}% • {} • {:.0} fps • mem {} • {} particles",
        snapshot.section_id,
        snapshot.section_index + 1,
        snapshot.local_progress * 100.0,
        tier,
        feed.fps,
        memory,
        snapshot.effects.particle_count,
    );
    if snapshot.is_transitioning {
        text.push_str(&format!(" • blend {:.2}", snapshot.transition_progress));
    }
    if snapshot.reduce_motion {
        text.push_str(" • reduced motion");
    }
    if let Some(change) = feed.last_change {
        text.push_str(&format!(
            " • {} → {} ({})",
            change.from.label(),
            change.to.label(),
            change.reason.label()
        ));
    }
    if feed.failures > 0 {
        text.push_str(&format!(" • {} effect errors", feed.failures));
    }
    text
}

/// Debug readout, refreshed every few frames while visible.
pub struct DebugHud {
    el: web::Element,
    feed: Rc<Cell<HudFeed>>,
    published: u64,
    last_text: String,
}

impl DebugHud {
    pub fn new(el: web::Element, feed: Rc<Cell<HudFeed>>) -> Self {
        Self {
            el,
            feed,
            published: 0,
            last_text: String::new(),
        }
    }
}

impl SnapshotConsumer for DebugHud {
    fn name(&self) -> &str {
        "debug-hud"
    }

    fn on_snapshot(&mut self, snapshot: &FrameSnapshot) -> anyhow::Result<()> {
        self.published += 1;
        if is_element_hidden(&self.el) || self.published % HUD_REFRESH_FRAMES != 1 {
            return Ok(());
        }
        let text = hud_text(snapshot, &self.feed.get());
        if text != self.last_text {
            self.el.set_text_content(Some(&text));
            self.last_text = text;
        }
        Ok(())
    }
}
