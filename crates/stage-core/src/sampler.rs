//! Scroll position → normalized progress.
//!
//! The sampler is the leaf of the per-frame pipeline. It owns no state:
//! [`sample`] is a pure function of the current [`ScrollSignal`]. Raw scroll
//! events are folded through a [`FrameCoalescer`] so that at most one signal
//! reaches the pipeline per rendered frame.

/// Geometry of the scroll container as read on one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollSignal {
    pub raw_offset: f32,
    pub container_height: f32,
    pub viewport_height: f32,
}

impl ScrollSignal {
    pub fn new(raw_offset: f32, container_height: f32, viewport_height: f32) -> Self {
        Self {
            raw_offset,
            container_height,
            viewport_height,
        }
    }

    /// Distance the container can actually scroll. Zero for degenerate layouts
    /// (content shorter than the viewport, or non-finite measurements).
    pub fn scrollable_range(&self) -> f32 {
        let range = self.container_height - self.viewport_height;
        if range.is_finite() && range > 0.0 {
            range
        } else {
            0.0
        }
    }
}

/// Normalize a scroll signal to `progress ∈ [0, 1]`.
///
/// A degenerate scroll range yields `0.0` instead of NaN or infinity; this is
/// an ordinary transient state while layout settles, not an error.
#[inline]
pub fn sample(signal: &ScrollSignal) -> f32 {
    let range = signal.scrollable_range();
    if range <= 0.0 || !signal.raw_offset.is_finite() {
        return 0.0;
    }
    (signal.raw_offset.abs() / range).clamp(0.0, 1.0)
}

/// Latest signal pending for the next frame, plus how many raw events it absorbed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coalesced {
    pub signal: ScrollSignal,
    pub events: u32,
}

/// Folds any number of scroll events into a single signal per frame.
#[derive(Debug, Default)]
pub struct FrameCoalescer {
    pending: Option<ScrollSignal>,
    events: u32,
}

impl FrameCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a raw scroll event. Later events replace earlier ones.
    pub fn push(&mut self, signal: ScrollSignal) {
        self.pending = Some(signal);
        self.events = self.events.saturating_add(1);
    }

    /// Take the pending signal for this frame, if any event arrived since the last take.
    pub fn take(&mut self) -> Option<Coalesced> {
        let signal = self.pending.take()?;
        let events = std::mem::take(&mut self.events);
        Some(Coalesced { signal, events })
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}
