//! Partition of scroll progress into named sections.
//!
//! A [`SectionTable`] is validated once at construction: bands are contiguous,
//! non-overlapping, and together span exactly \[0, 1\]. [`map`] then resolves
//! any progress value to one section. A progress value sitting exactly on a
//! shared boundary belongs to the section that *starts* there.

use std::rc::Rc;

use crate::constants::{BOUNDARY_WIDTH, TABLE_EPSILON};
use crate::error::{ConfigError, NavigationError};
use crate::sampler::ScrollSignal;

#[derive(Clone, Debug, PartialEq)]
pub struct SectionDescriptor {
    pub id: Rc<str>,
    pub index: usize,
    pub start: f32,
    pub end: f32,
}

impl SectionDescriptor {
    /// Describe a band; `index` is assigned by the table.
    pub fn new(id: impl Into<Rc<str>>, start: f32, end: f32) -> Self {
        Self {
            id: id.into(),
            index: 0,
            start,
            end,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.end - self.start
    }

    /// Position of `progress` within this band, clamped to \[0, 1\].
    #[inline]
    pub fn local_progress(&self, progress: f32) -> f32 {
        let width = self.width();
        if width <= 0.0 {
            return 0.0;
        }
        ((progress - self.start) / width).clamp(0.0, 1.0)
    }
}

/// Per-frame result of mapping progress onto the section table.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SectionState {
    pub current_index: usize,
    /// Section that was current before the most recent section change.
    /// [`map`] leaves this empty; the director fills it in from frame history.
    pub previous_index: Option<usize>,
    pub local_progress: f32,
    pub is_transitioning: bool,
    /// 0 = fully the lower section of the boundary pair, 1 = fully the upper.
    pub transition_progress: f32,
    /// Adjacent section sharing the active transition band.
    pub blend_partner: Option<usize>,
}

impl SectionState {
    /// `(lower, upper)` indices of the active transition band.
    pub fn transition_pair(&self) -> Option<(usize, usize)> {
        let partner = self.blend_partner?;
        Some((
            self.current_index.min(partner),
            self.current_index.max(partner),
        ))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SectionTable {
    sections: Vec<SectionDescriptor>,
    boundary_width: f32,
}

impl SectionTable {
    /// Validate an explicit list of bands, in order.
    pub fn new(descriptors: Vec<SectionDescriptor>) -> Result<Self, ConfigError> {
        let (first, last) = match (descriptors.first(), descriptors.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(ConfigError::EmptyTable),
        };
        if (first.start - 0.0).abs() > TABLE_EPSILON || (last.end - 1.0).abs() > TABLE_EPSILON {
            return Err(ConfigError::NotSpanning {
                start: first.start,
                end: last.end,
            });
        }

        for (i, d) in descriptors.iter().enumerate() {
            for value in [d.start, d.end] {
                if !(0.0..=1.0).contains(&value) {
                    return Err(ConfigError::OutOfRange {
                        id: d.id.to_string(),
                        value,
                    });
                }
            }
            if d.width() <= 0.0 {
                return Err(ConfigError::EmptyBand {
                    id: d.id.to_string(),
                    start: d.start,
                    end: d.end,
                });
            }
            if descriptors[..i].iter().any(|other| other.id == d.id) {
                return Err(ConfigError::DuplicateSection(d.id.to_string()));
            }
        }

        for pair in descriptors.windows(2) {
            let (before, after) = (&pair[0], &pair[1]);
            let delta = after.start - before.end;
            if delta > TABLE_EPSILON {
                return Err(ConfigError::Gap {
                    before: before.id.to_string(),
                    after: after.id.to_string(),
                    end: before.end,
                    start: after.start,
                });
            }
            if delta < -TABLE_EPSILON {
                return Err(ConfigError::Overlap {
                    before: before.id.to_string(),
                    after: after.id.to_string(),
                    end: before.end,
                    start: after.start,
                });
            }
        }

        // Snap shared boundaries so ties compare exactly.
        let mut sections = descriptors;
        let count = sections.len();
        for i in 0..count {
            sections[i].index = i;
            if i > 0 {
                sections[i].start = sections[i - 1].end;
            }
        }
        sections[0].start = 0.0;
        sections[count - 1].end = 1.0;

        let table = Self {
            sections,
            boundary_width: 0.0,
        };
        let width = BOUNDARY_WIDTH.min(table.min_band_width());
        table.with_boundary_width(width)
    }

    /// Equal-width bands, one per id.
    pub fn even<S: AsRef<str>>(ids: &[S]) -> Result<Self, ConfigError> {
        let count = ids.len();
        let descriptors = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let start = i as f32 / count as f32;
                let end = if i + 1 == count {
                    1.0
                } else {
                    (i + 1) as f32 / count as f32
                };
                SectionDescriptor::new(id.as_ref(), start, end)
            })
            .collect();
        Self::new(descriptors)
    }

    /// Set the total width of the cross-fade band around each interior
    /// boundary. Must not exceed the narrowest band, or neighbouring
    /// transition bands would overlap.
    pub fn with_boundary_width(mut self, width: f32) -> Result<Self, ConfigError> {
        let max = self.min_band_width();
        if !(0.0..=max).contains(&width) {
            return Err(ConfigError::BoundaryWidth { width, max });
        }
        self.boundary_width = width;
        Ok(self)
    }

    fn min_band_width(&self) -> f32 {
        self.sections
            .iter()
            .map(SectionDescriptor::width)
            .fold(f32::INFINITY, f32::min)
    }

    pub fn boundary_width(&self) -> f32 {
        self.boundary_width
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SectionDescriptor> {
        self.sections.get(index)
    }

    pub fn sections(&self) -> &[SectionDescriptor] {
        &self.sections
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| &*s.id == id)
    }

    /// Index of the band containing `progress`. Exact boundaries resolve to the
    /// band that starts there; 0 and 1 resolve to the first and last bands.
    pub fn locate(&self, progress: f32) -> usize {
        let progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        // Number of bands whose start is at or before `progress`; at least one,
        // since the first band starts at 0.
        let starts_at_or_before = self.sections.partition_point(|s| s.start <= progress);
        starts_at_or_before.saturating_sub(1)
    }

    /// Scroll offset at which section `index` begins, rounded up to a whole
    /// pixel so an integer scroll position read back lands inside the section.
    pub fn offset_for(&self, index: usize, signal: &ScrollSignal) -> Result<f32, NavigationError> {
        let section = self.sections.get(index).ok_or(NavigationError::OutOfRange {
            index,
            count: self.sections.len(),
        })?;
        let range = signal.scrollable_range();
        Ok((section.start * range).ceil().min(range))
    }
}

/// Resolve `progress` to a [`SectionState`].
pub fn map(progress: f32, table: &SectionTable) -> SectionState {
    let progress = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    let index = table.locate(progress);
    let section = &table.sections[index];
    let half = table.boundary_width * 0.5;

    let mut state = SectionState {
        current_index: index,
        previous_index: None,
        local_progress: section.local_progress(progress),
        is_transitioning: false,
        transition_progress: 0.0,
        blend_partner: None,
    };
    if half <= 0.0 {
        return state;
    }

    // Band entry: [start, start + w/2) shares a boundary with the section below.
    // Band exit: [end - w/2, end) shares a boundary with the section above.
    let band = if index + 1 < table.len() && progress >= section.end - half {
        Some((index + 1, section.end))
    } else if index > 0 && progress < section.start + half {
        Some((index - 1, section.start))
    } else {
        None
    };
    if let Some((partner, boundary)) = band {
        state.is_transitioning = true;
        state.blend_partner = Some(partner);
        state.transition_progress =
            ((progress - (boundary - half)) / table.boundary_width).clamp(0.0, 1.0);
    }
    state
}
