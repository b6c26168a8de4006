//! Per-section phase choreography.
//!
//! A section's lifetime (its local progress, 0..1) is split into named phases,
//! each with its own `[start, end)` sub-range and easing curve. Phases may
//! overlap to stagger reveals. Everything section-specific lives in the
//! [`PhaseConfig`] lists held by a [`Choreography`]; the evaluation itself is
//! identical for every section.

use std::rc::Rc;

use fnv::FnvHashMap;
use smallvec::SmallVec;

use crate::constants::TABLE_EPSILON;
use crate::easing::Easing;
use crate::error::ConfigError;

/// Phase states for one section. Four inline covers the usual
/// entrance/stagger/steady/exit split without allocating.
pub type PhaseList = SmallVec<[PhaseState; 4]>;

/// Eased values per element group of one phase.
pub type GroupValues = SmallVec<[f32; 4]>;

#[derive(Clone, Debug, PartialEq)]
pub struct PhaseConfig {
    pub id: Rc<str>,
    pub start: f32,
    pub end: f32,
    pub easing: Easing,
    /// Critical phases keep animating at every quality tier; the rest may be
    /// frozen at their completed state.
    pub critical: bool,
    /// Element groups revealed by this phase (at least one).
    pub groups: u8,
    /// Fraction of the phase span spent offsetting successive group starts.
    pub stagger: f32,
}

impl PhaseConfig {
    pub fn new(id: impl Into<Rc<str>>, start: f32, end: f32) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            easing: Easing::Linear,
            critical: true,
            groups: 1,
            stagger: 0.0,
        }
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn non_critical(mut self) -> Self {
        self.critical = false;
        self
    }

    pub fn staggered(mut self, groups: u8, stagger: f32) -> Self {
        self.groups = groups;
        self.stagger = stagger;
        self
    }

    /// Sub-range of element group `k`. The last group always ends at `end`;
    /// a single group spans the whole phase and ignores `stagger`.
    pub fn group_range(&self, k: u8) -> (f32, f32) {
        if self.groups <= 1 {
            return (self.start, self.end);
        }
        let span = self.end - self.start;
        let start = self.start + f32::from(k) / f32::from(self.groups - 1) * self.stagger * span;
        let end = if k + 1 == self.groups {
            self.end
        } else {
            start + (1.0 - self.stagger) * span
        };
        (start, end)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PhaseState {
    pub phase_id: Rc<str>,
    pub start: f32,
    pub end: f32,
    pub critical: bool,
    /// Linear position within `[start, end)`: 0 before, 1 at or after `end`.
    pub local_value: f32,
    pub eased: f32,
    pub groups: GroupValues,
    /// Set when the quality policy pinned this phase to its completed state.
    pub frozen: bool,
}

impl PhaseState {
    /// Pin to the completed state so content stays visible without motion.
    pub fn freeze(&mut self) {
        self.local_value = 1.0;
        self.eased = 1.0;
        self.groups.iter_mut().for_each(|g| *g = 1.0);
        self.frozen = true;
    }
}

/// Position of `local` within `[start, end)`, clamped: 0 before the range and
/// 1 at or beyond its end.
#[inline]
pub fn phase_value(start: f32, end: f32, local: f32) -> f32 {
    if local.is_nan() || local < start {
        0.0
    } else if local >= end {
        1.0
    } else {
        ((local - start) / (end - start)).clamp(0.0, 1.0)
    }
}

/// Evaluate every phase of a section at `local_progress`.
pub fn choreograph(local_progress: f32, phases: &[PhaseConfig]) -> PhaseList {
    phases
        .iter()
        .map(|phase| {
            let local_value = phase_value(phase.start, phase.end, local_progress);
            let groups = (0..phase.groups.max(1))
                .map(|k| {
                    let (start, end) = phase.group_range(k);
                    phase.easing.apply(phase_value(start, end, local_progress))
                })
                .collect();
            PhaseState {
                phase_id: Rc::clone(&phase.id),
                start: phase.start,
                end: phase.end,
                critical: phase.critical,
                local_value,
                eased: phase.easing.apply(local_value),
                groups,
                frozen: false,
            }
        })
        .collect()
}

/// Check one section's phase list: ranges inside \[0, 1\] and non-empty,
/// starts non-decreasing with no uncovered span between phases, ids unique,
/// stagger parameters in range.
pub fn validate_phases(section: &str, phases: &[PhaseConfig]) -> Result<(), ConfigError> {
    let mut previous_start = 0.0_f32;
    let mut covered_to: Option<f32> = None;
    for (i, phase) in phases.iter().enumerate() {
        let in_unit = |v: f32| (0.0..=1.0).contains(&v);
        if !in_unit(phase.start) || !in_unit(phase.end) || phase.start >= phase.end {
            return Err(ConfigError::InvalidPhaseRange {
                section: section.to_string(),
                phase: phase.id.to_string(),
                start: phase.start,
                end: phase.end,
            });
        }
        if phase.start < previous_start {
            return Err(ConfigError::PhaseOrder {
                section: section.to_string(),
                phase: phase.id.to_string(),
            });
        }
        if let Some(covered_to) = covered_to.filter(|&c| phase.start > c + TABLE_EPSILON) {
            return Err(ConfigError::PhaseGap {
                section: section.to_string(),
                phase: phase.id.to_string(),
                start: phase.start,
                covered_to,
            });
        }
        if phases[..i].iter().any(|other| other.id == phase.id) {
            return Err(ConfigError::DuplicatePhase {
                section: section.to_string(),
                phase: phase.id.to_string(),
            });
        }
        if phase.groups == 0 || !(0.0..1.0).contains(&phase.stagger) {
            return Err(ConfigError::InvalidStagger {
                section: section.to_string(),
                phase: phase.id.to_string(),
                groups: phase.groups,
                stagger: phase.stagger,
            });
        }
        previous_start = phase.start;
        covered_to = Some(covered_to.map_or(phase.end, |c| c.max(phase.end)));
    }
    Ok(())
}

/// Phase lists keyed by section id.
#[derive(Clone, Debug, Default)]
pub struct Choreography {
    by_section: FnvHashMap<Rc<str>, Vec<PhaseConfig>>,
}

impl Choreography {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the phase list for one section after validating it.
    pub fn with_section(
        mut self,
        section: impl Into<Rc<str>>,
        phases: Vec<PhaseConfig>,
    ) -> Result<Self, ConfigError> {
        let section = section.into();
        validate_phases(&section, &phases)?;
        self.by_section.insert(section, phases);
        Ok(self)
    }

    /// Phase list for `section`; empty for sections without choreography.
    pub fn phases_for(&self, section: &str) -> &[PhaseConfig] {
        self.by_section
            .get(section)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn section_ids(&self) -> impl Iterator<Item = &Rc<str>> {
        self.by_section.keys()
    }

    pub fn choreograph(&self, section: &str, local_progress: f32) -> PhaseList {
        choreograph(local_progress, self.phases_for(section))
    }
}
