//! Per-frame orchestration.
//!
//! An [`AnimationDirector`] is built once per animated view from validated
//! tables, stepped once per display frame, and disposed explicitly. Each
//! [`step`](AnimationDirector::step) runs the pipeline in a fixed order:
//!
//! 1. sample scroll progress,
//! 2. map it onto the section table,
//! 3. choreograph the current section's phases (and the blend partner's
//!    while transitioning),
//! 4. read the effective quality tier,
//! 5. apply that tier's effect policy,
//! 6. publish one immutable [`FrameSnapshot`] to every registered consumer.
//!
//! When the scroll signal, tier, reduce-motion flag, and navigation target
//! are unchanged since the last computed frame, steps 2 to 5 are skipped and
//! the previous snapshot is republished as-is.
//!
//! Consumer failures never stop the loop: they are recorded in
//! [`Diagnostics`] and the remaining consumers still run.

use std::collections::VecDeque;
use std::rc::Rc;

use fnv::FnvHashMap;

use crate::constants::*;
use crate::error::{ConfigError, NavigationError};
use crate::governor::{
    GovernorConfig, GovernorStats, PerformanceGovernor, QualityTier, TierChange,
};
use crate::phase::{Choreography, PhaseList};
use crate::policy::{EffectBudget, QualityPolicy};
use crate::sampler::{sample, ScrollSignal};
use crate::section::{self, SectionTable};
use crate::theme::{self, ThemeDescriptor};

#[derive(Clone, Debug, PartialEq)]
pub struct DirectorConfig {
    pub base_particle_count: u32,
    pub base_blur_px: f32,
    pub diagnostics_capacity: usize,
    pub governor: GovernorConfig,
    pub policy: QualityPolicy,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            base_particle_count: BASE_PARTICLE_COUNT,
            base_blur_px: BASE_BLUR_PX,
            diagnostics_capacity: DIAGNOSTICS_CAPACITY,
            governor: GovernorConfig::default(),
            policy: QualityPolicy::default(),
        }
    }
}

/// Everything the director needs from the host for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInput {
    pub signal: ScrollSignal,
    /// Frame callback timestamp (milliseconds, monotonic).
    pub timestamp_ms: f64,
    pub memory_usage_pct: Option<f32>,
}

impl FrameInput {
    pub fn new(signal: ScrollSignal, timestamp_ms: f64) -> Self {
        Self {
            signal,
            timestamp_ms,
            memory_usage_pct: None,
        }
    }
}

/// State published to consumers for one frame. Never mutated after publication.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSnapshot {
    /// Frame on which this snapshot was computed.
    pub frame: u64,
    pub progress: f32,
    pub section_index: usize,
    pub section_id: Rc<str>,
    pub previous_index: Option<usize>,
    pub local_progress: f32,
    pub is_transitioning: bool,
    pub transition_progress: f32,
    pub blend_partner: Option<usize>,
    pub phases: PhaseList,
    /// Phases of the blend partner while transitioning; empty otherwise.
    pub neighbor_phases: PhaseList,
    pub quality_tier: QualityTier,
    pub effects: EffectBudget,
    pub theme: ThemeDescriptor,
    pub reduce_motion: bool,
    pub navigation_target: Option<usize>,
}

/// Receives every published snapshot.
pub trait SnapshotConsumer {
    fn name(&self) -> &str;
    fn on_snapshot(&mut self, snapshot: &FrameSnapshot) -> anyhow::Result<()>;
}

/// Screen rectangle of a section's region, in viewport pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SectionRect {
    pub top: f32,
    pub height: f32,
}

/// Reports where a registered region currently sits on screen.
pub trait RegionProbe {
    fn rect(&self) -> Option<SectionRect>;
}

/// Scroll instruction produced by [`AnimationDirector::request_section`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollCommand {
    pub section_index: usize,
    pub target_offset: f32,
    pub smooth: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConsumerFailure {
    pub consumer: String,
    pub frame: u64,
    pub message: String,
}

/// Bounded log of consumer failures.
#[derive(Debug)]
pub struct Diagnostics {
    recent: VecDeque<ConsumerFailure>,
    capacity: usize,
    counts: FnvHashMap<String, u64>,
}

impl Diagnostics {
    pub fn new(capacity: usize) -> Self {
        Self {
            recent: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
            counts: FnvHashMap::default(),
        }
    }

    pub fn record(&mut self, consumer: &str, frame: u64, err: &anyhow::Error) {
        let count = self.counts.entry(consumer.to_string()).or_insert(0);
        *count += 1;
        if *count == 1 {
            log::warn!("[director] consumer '{consumer}' failed on frame {frame}: {err:#}");
        } else {
            log::debug!("[director] consumer '{consumer}' failed again ({count} total): {err:#}");
        }
        if self.recent.len() == self.capacity {
            self.recent.pop_front();
        }
        self.recent.push_back(ConsumerFailure {
            consumer: consumer.to_string(),
            frame,
            message: format!("{err:#}"),
        });
    }

    pub fn recent(&self) -> impl Iterator<Item = &ConsumerFailure> {
        self.recent.iter()
    }

    pub fn failures_for(&self, consumer: &str) -> u64 {
        self.counts.get(consumer).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frames: u64,
    pub computed_frames: u64,
    pub idle_frames: u64,
    pub mapper_calls: u64,
    pub choreographer_calls: u64,
    pub consumer_failures: u64,
    pub tier_changes: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct PipelineInputs {
    signal: ScrollSignal,
    tier: QualityTier,
    reduce_motion: bool,
    navigation_target: Option<usize>,
}

#[derive(Clone, Copy, Debug)]
struct PendingNavigation {
    target: usize,
    target_progress: f32,
    closest: f32,
}

pub struct AnimationDirector {
    config: DirectorConfig,
    sections: SectionTable,
    choreography: Choreography,
    themes: Vec<ThemeDescriptor>,
    governor: PerformanceGovernor,
    consumers: Vec<Box<dyn SnapshotConsumer>>,
    regions: FnvHashMap<Rc<str>, Box<dyn RegionProbe>>,
    diagnostics: Diagnostics,
    stats: FrameStats,
    snapshot: Rc<FrameSnapshot>,
    last_inputs: Option<PipelineInputs>,
    current_section: usize,
    previous_section: Option<usize>,
    reduce_motion: bool,
    navigation: Option<PendingNavigation>,
    last_tier_change: Option<TierChange>,
    frame: u64,
    disposed: bool,
}

impl AnimationDirector {
    /// Validate the tables against each other and build a director whose
    /// initial snapshot shows the first section at rest.
    pub fn new(
        sections: SectionTable,
        choreography: Choreography,
        themes: Vec<ThemeDescriptor>,
        config: DirectorConfig,
    ) -> Result<Self, ConfigError> {
        if themes.len() != sections.len() {
            return Err(ConfigError::ThemeCount {
                themes: themes.len(),
                sections: sections.len(),
            });
        }
        if let Some(unknown) = choreography
            .section_ids()
            .find(|id| sections.index_of(id).is_none())
        {
            return Err(ConfigError::UnknownSection(unknown.to_string()));
        }

        let mut governor = PerformanceGovernor::new(config.governor.clone());
        governor.start();
        let diagnostics = Diagnostics::new(config.diagnostics_capacity);
        let initial = Rc::new(compose(
            &Tables {
                sections: &sections,
                choreography: &choreography,
                themes: &themes,
                config: &config,
            },
            0,
            0.0,
            None,
            QualityTier::High,
            false,
            None,
        ));
        log::info!(
            "[director] ready: {} sections, boundary width {:.3}",
            sections.len(),
            sections.boundary_width()
        );
        Ok(Self {
            config,
            sections,
            choreography,
            themes,
            governor,
            consumers: Vec::new(),
            regions: FnvHashMap::default(),
            diagnostics,
            stats: FrameStats::default(),
            snapshot: initial,
            last_inputs: None,
            current_section: 0,
            previous_section: None,
            reduce_motion: false,
            navigation: None,
            last_tier_change: None,
            frame: 0,
            disposed: false,
        })
    }

    pub fn subscribe(&mut self, consumer: Box<dyn SnapshotConsumer>) {
        log::debug!("[director] consumer '{}' subscribed", consumer.name());
        self.consumers.push(consumer);
    }

    pub fn consumer_count(&self) -> usize {
        self.consumers.len()
    }

    /// Run one frame and publish the result.
    pub fn step(&mut self, input: FrameInput) -> Rc<FrameSnapshot> {
        self.stats.frames += 1;
        if self.disposed {
            return Rc::clone(&self.snapshot);
        }
        self.frame += 1;

        if let Some(change) = self
            .governor
            .record_frame(input.timestamp_ms, input.memory_usage_pct)
        {
            self.stats.tier_changes += 1;
            self.last_tier_change = Some(change);
        }

        let progress = sample(&input.signal);
        self.track_navigation(progress);

        let inputs = PipelineInputs {
            signal: input.signal,
            tier: self.effective_tier(),
            reduce_motion: self.reduce_motion,
            navigation_target: self.navigation.map(|n| n.target),
        };
        if self.last_inputs == Some(inputs) {
            self.stats.idle_frames += 1;
        } else {
            self.recompute(progress, inputs);
        }

        self.publish();
        Rc::clone(&self.snapshot)
    }

    fn recompute(&mut self, progress: f32, inputs: PipelineInputs) {
        let index = self.sections.locate(progress);
        if index != self.current_section {
            log::debug!(
                "[director] section {} -> {}",
                self.current_section,
                index
            );
            self.previous_section = Some(self.current_section);
            self.current_section = index;
        }

        let snapshot = compose(
            &Tables {
                sections: &self.sections,
                choreography: &self.choreography,
                themes: &self.themes,
                config: &self.config,
            },
            self.frame,
            progress,
            self.previous_section,
            inputs.tier,
            inputs.reduce_motion,
            inputs.navigation_target,
        );
        self.stats.mapper_calls += 1;
        self.stats.choreographer_calls += if snapshot.blend_partner.is_some() { 2 } else { 1 };
        self.stats.computed_frames += 1;
        self.snapshot = Rc::new(snapshot);
        self.last_inputs = Some(inputs);
    }

    fn publish(&mut self) {
        let snapshot = Rc::clone(&self.snapshot);
        for consumer in &mut self.consumers {
            if let Err(err) = consumer.on_snapshot(&snapshot) {
                self.stats.consumer_failures += 1;
                self.diagnostics.record(consumer.name(), self.frame, &err);
            }
        }
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Rc<FrameSnapshot> {
        Rc::clone(&self.snapshot)
    }

    pub fn sections(&self) -> &SectionTable {
        &self.sections
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Most recent governed tier change, with its reason.
    pub fn last_tier_change(&self) -> Option<TierChange> {
        self.last_tier_change
    }

    pub fn governor_stats(&self) -> GovernorStats {
        self.governor.stats()
    }

    pub fn governor(&self) -> &PerformanceGovernor {
        &self.governor
    }

    /// Tier in effect: reduce-motion wins over any override or measurement.
    pub fn effective_tier(&self) -> QualityTier {
        if self.reduce_motion {
            QualityTier::Low
        } else {
            self.governor.tier()
        }
    }

    pub fn force_tier(&mut self, tier: QualityTier) {
        self.governor.force_tier(tier);
    }

    pub fn release_override(&mut self) {
        self.governor.release_override();
    }

    pub fn set_reduce_motion(&mut self, enabled: bool) {
        if self.reduce_motion != enabled {
            log::info!("[director] reduce motion {}", if enabled { "on" } else { "off" });
        }
        self.reduce_motion = enabled;
    }

    pub fn reduce_motion(&self) -> bool {
        self.reduce_motion
    }

    /// Translate a section request into a scroll command for the container.
    ///
    /// The command is advisory: the host may be scrolled elsewhere before it
    /// completes, in which case the pending target is dropped on a later frame.
    pub fn request_section(
        &mut self,
        index: usize,
        signal: &ScrollSignal,
    ) -> Result<ScrollCommand, NavigationError> {
        let target_offset = self.sections.offset_for(index, signal)?;
        let target_progress = self.sections.get(index).map_or(0.0, |s| s.start);
        let distance = (target_progress - sample(signal)).abs();
        self.navigation = Some(PendingNavigation {
            target: index,
            target_progress,
            closest: distance,
        });
        log::info!("[nav] -> section {index} (offset {target_offset:.0})");
        Ok(ScrollCommand {
            section_index: index,
            target_offset,
            smooth: !self.reduce_motion,
        })
    }

    pub fn navigation_target(&self) -> Option<usize> {
        self.navigation.map(|n| n.target)
    }

    pub fn cancel_navigation(&mut self) {
        self.navigation = None;
    }

    fn track_navigation(&mut self, progress: f32) {
        let Some(mut nav) = self.navigation else {
            return;
        };
        let distance = (nav.target_progress - progress).abs();
        if distance <= NAV_ARRIVAL_TOLERANCE {
            log::debug!("[nav] arrived at section {}", nav.target);
            self.navigation = None;
        } else if distance > nav.closest + NAV_INTERRUPT_TOLERANCE {
            log::debug!("[nav] request for section {} interrupted", nav.target);
            self.navigation = None;
        } else {
            nav.closest = nav.closest.min(distance);
            self.navigation = Some(nav);
        }
    }

    /// Attach a screen-region probe to a section for telemetry.
    pub fn register_region(
        &mut self,
        section_id: &str,
        probe: Box<dyn RegionProbe>,
    ) -> Result<(), ConfigError> {
        let index = self
            .sections
            .index_of(section_id)
            .ok_or_else(|| ConfigError::UnknownSection(section_id.to_string()))?;
        let id = Rc::clone(&self.sections.sections()[index].id);
        self.regions.insert(id, probe);
        Ok(())
    }

    pub fn unregister_region(&mut self, section_id: &str) -> bool {
        self.regions.remove(section_id).is_some()
    }

    /// Current rectangles of every registered region, in section order.
    pub fn section_rects(&self) -> Vec<(Rc<str>, SectionRect)> {
        self.sections
            .sections()
            .iter()
            .filter_map(|s| {
                let rect = self.regions.get(&s.id)?.rect()?;
                Some((Rc::clone(&s.id), rect))
            })
            .collect()
    }

    /// Detach consumers and probes and stop sampling. Later steps republish the
    /// last snapshot without notifying anyone.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.consumers.clear();
        self.regions.clear();
        self.navigation = None;
        self.governor.stop();
        log::info!("[director] disposed after {} frames", self.frame);
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

struct Tables<'a> {
    sections: &'a SectionTable,
    choreography: &'a Choreography,
    themes: &'a [ThemeDescriptor],
    config: &'a DirectorConfig,
}

fn compose(
    tables: &Tables<'_>,
    frame: u64,
    progress: f32,
    previous_index: Option<usize>,
    tier: QualityTier,
    reduce_motion: bool,
    navigation_target: Option<usize>,
) -> FrameSnapshot {
    let mut state = section::map(progress, tables.sections);
    state.previous_index = previous_index;

    let descriptors = tables.sections.sections();
    let current = &descriptors[state.current_index];
    let mut phases = tables
        .choreography
        .choreograph(&current.id, state.local_progress);
    let mut neighbor_phases = match state.blend_partner.and_then(|i| descriptors.get(i)) {
        Some(partner) => tables
            .choreography
            .choreograph(&partner.id, partner.local_progress(progress)),
        None => PhaseList::new(),
    };

    let policy = tables.config.policy.for_tier(tier);
    let mut effects = policy.budget(tables.config.base_particle_count, tables.config.base_blur_px);
    effects.animate_non_critical &= !reduce_motion;
    if !effects.animate_non_critical {
        phases
            .iter_mut()
            .chain(neighbor_phases.iter_mut())
            .filter(|p| !p.critical)
            .for_each(|p| p.freeze());
    }

    FrameSnapshot {
        frame,
        progress,
        section_index: state.current_index,
        section_id: Rc::clone(&current.id),
        previous_index: state.previous_index,
        local_progress: state.local_progress,
        is_transitioning: state.is_transitioning,
        transition_progress: state.transition_progress,
        blend_partner: state.blend_partner,
        phases,
        neighbor_phases,
        quality_tier: tier,
        effects,
        theme: theme::theme(&state, tables.themes),
        reduce_motion,
        navigation_target,
    }
}
