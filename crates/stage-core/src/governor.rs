//! Closed-loop quality governor.
//!
//! Frame timestamps are folded into one [`PerformanceSample`] per sampling
//! interval by a [`FrameMeter`]. Each sample is classified against the fps
//! and memory thresholds, and the governed [`QualityTier`] only moves once
//! the classification has held for a dwell period:
//!
//! - degrading needs `degrade_dwell` consecutive worse samples and jumps to
//!   the least-degraded tier seen during that streak;
//! - recovering needs the longer `recover_dwell` streak, is measured against
//!   thresholds raised by `recovery_margin_fps`, and moves one tier at a time.
//!
//! A forced tier (manual override) suspends governed transitions until it is
//! released; samples are still recorded meanwhile.

use std::collections::VecDeque;

use crate::constants::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum QualityTier {
    #[default]
    High,
    Medium,
    Low,
}

impl QualityTier {
    /// 0 = full fidelity, 2 = most degraded.
    #[inline]
    pub fn rank(self) -> u8 {
        match self {
            QualityTier::High => 0,
            QualityTier::Medium => 1,
            QualityTier::Low => 2,
        }
    }

    pub fn is_worse_than(self, other: QualityTier) -> bool {
        self.rank() > other.rank()
    }

    /// One step towards `High`.
    pub fn recovered(self) -> QualityTier {
        match self {
            QualityTier::Low => QualityTier::Medium,
            QualityTier::Medium | QualityTier::High => QualityTier::High,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QualityTier::High => "high",
            QualityTier::Medium => "medium",
            QualityTier::Low => "low",
        }
    }

    /// Health wording used by status displays.
    pub fn status(self) -> &'static str {
        match self {
            QualityTier::High => "good",
            QualityTier::Medium => "warning",
            QualityTier::Low => "critical",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerformanceSample {
    pub frame_time_ms: f32,
    pub fps: f32,
    /// `None` when the runtime does not expose memory statistics.
    pub memory_usage_pct: Option<f32>,
    pub timestamp_ms: f64,
}

impl PerformanceSample {
    /// Sample derived from a frame rate alone.
    pub fn from_fps(fps: f32, timestamp_ms: f64) -> Self {
        Self {
            frame_time_ms: if fps > 0.0 { 1000.0 / fps } else { f32::INFINITY },
            fps,
            memory_usage_pct: None,
            timestamp_ms,
        }
    }

    pub fn with_memory(mut self, pct: f32) -> Self {
        self.memory_usage_pct = Some(pct);
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RollingStats {
    pub mean_fps: f32,
    pub min_fps: f32,
    pub max_fps: f32,
    pub mean_frame_time_ms: f32,
    pub samples: usize,
}

/// Fixed-capacity history of samples, oldest first.
#[derive(Clone, Debug)]
pub struct SampleRing {
    samples: VecDeque<PerformanceSample>,
    capacity: usize,
}

impl SampleRing {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: PerformanceSample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&PerformanceSample> {
        self.samples.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PerformanceSample> {
        self.samples.iter()
    }

    /// Statistics over the most recent `window` samples (all of them if fewer).
    pub fn rolling(&self, window: usize) -> Option<RollingStats> {
        let take = window.max(1).min(self.samples.len());
        if take == 0 {
            return None;
        }
        let recent = self.samples.iter().skip(self.samples.len() - take);
        let mut stats = RollingStats {
            min_fps: f32::INFINITY,
            max_fps: f32::NEG_INFINITY,
            samples: take,
            ..RollingStats::default()
        };
        let mut fps_sum = 0.0_f32;
        let mut frame_sum = 0.0_f32;
        for s in recent {
            fps_sum += s.fps;
            frame_sum += s.frame_time_ms;
            stats.min_fps = stats.min_fps.min(s.fps);
            stats.max_fps = stats.max_fps.max(s.fps);
        }
        stats.mean_fps = fps_sum / take as f32;
        stats.mean_frame_time_ms = frame_sum / take as f32;
        Some(stats)
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Turns per-frame timestamps into one sample per interval.
#[derive(Clone, Debug)]
pub struct FrameMeter {
    interval_ms: f64,
    max_gap_ms: f64,
    window_start: Option<f64>,
    last_frame: Option<f64>,
    frames: u32,
}

impl FrameMeter {
    pub fn new(interval_ms: f64, max_gap_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(1.0),
            max_gap_ms,
            window_start: None,
            last_frame: None,
            frames: 0,
        }
    }

    /// Record one rendered frame. Returns a sample when a full interval has elapsed.
    pub fn tick(
        &mut self,
        timestamp_ms: f64,
        memory_usage_pct: Option<f32>,
    ) -> Option<PerformanceSample> {
        let (Some(start), Some(last)) = (self.window_start, self.last_frame) else {
            self.restart(timestamp_ms);
            return None;
        };
        let gap = timestamp_ms - last;
        if !gap.is_finite() || gap < 0.0 || gap > self.max_gap_ms {
            // Suspended tab or clock jump: measuring across it would read as a stall.
            log::debug!("[governor] frame gap {gap:.1}ms, restarting measurement window");
            self.restart(timestamp_ms);
            return None;
        }
        self.last_frame = Some(timestamp_ms);
        self.frames += 1;

        let elapsed = timestamp_ms - start;
        if elapsed < self.interval_ms {
            return None;
        }
        let frames = self.frames.max(1);
        let sample = PerformanceSample {
            frame_time_ms: (elapsed / f64::from(frames)) as f32,
            fps: (f64::from(frames) * 1000.0 / elapsed) as f32,
            memory_usage_pct,
            timestamp_ms,
        };
        self.window_start = Some(timestamp_ms);
        self.frames = 0;
        Some(sample)
    }

    pub fn restart(&mut self, timestamp_ms: f64) {
        self.window_start = Some(timestamp_ms);
        self.last_frame = Some(timestamp_ms);
        self.frames = 0;
    }

    pub fn reset(&mut self) {
        self.window_start = None;
        self.last_frame = None;
        self.frames = 0;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GovernorConfig {
    pub warning_fps: f32,
    pub critical_fps: f32,
    pub memory_ceiling_pct: f32,
    pub recovery_margin_fps: f32,
    pub degrade_dwell: u32,
    pub recover_dwell: u32,
    pub rolling_window: usize,
    pub ring_capacity: usize,
    pub sample_interval_ms: f64,
    pub max_frame_gap_ms: f64,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            warning_fps: WARNING_FPS,
            critical_fps: CRITICAL_FPS,
            memory_ceiling_pct: MEMORY_CEILING_PCT,
            recovery_margin_fps: RECOVERY_MARGIN_FPS,
            degrade_dwell: DEGRADE_DWELL_SAMPLES,
            recover_dwell: RECOVER_DWELL_SAMPLES,
            rolling_window: ROLLING_WINDOW,
            ring_capacity: SAMPLE_RING_CAPACITY,
            sample_interval_ms: SAMPLE_INTERVAL_MS,
            max_frame_gap_ms: MAX_FRAME_GAP_MS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TierChangeReason {
    LowFrameRate,
    MemoryPressure,
    Recovered,
}

impl TierChangeReason {
    pub fn label(self) -> &'static str {
        match self {
            TierChangeReason::LowFrameRate => "low frame rate",
            TierChangeReason::MemoryPressure => "memory pressure",
            TierChangeReason::Recovered => "recovered",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TierChange {
    pub from: QualityTier,
    pub to: QualityTier,
    pub reason: TierChangeReason,
    pub rolling_fps: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GovernorStats {
    pub rolling: RollingStats,
    pub last_memory_pct: Option<f32>,
    pub samples_seen: u64,
    pub transitions: u64,
}

#[derive(Debug)]
pub struct PerformanceGovernor {
    config: GovernorConfig,
    ring: SampleRing,
    meter: FrameMeter,
    running: bool,
    governed: QualityTier,
    forced: Option<QualityTier>,
    degrade_streak: u32,
    /// Least-degraded classification seen during the current degrade streak.
    degrade_floor: QualityTier,
    recover_streak: u32,
    samples_seen: u64,
    transitions: u64,
}

impl PerformanceGovernor {
    pub fn new(config: GovernorConfig) -> Self {
        let ring = SampleRing::new(config.ring_capacity);
        let meter = FrameMeter::new(config.sample_interval_ms, config.max_frame_gap_ms);
        Self {
            config,
            ring,
            meter,
            running: false,
            governed: QualityTier::High,
            forced: None,
            degrade_streak: 0,
            degrade_floor: QualityTier::High,
            recover_streak: 0,
            samples_seen: 0,
            transitions: 0,
        }
    }

    pub fn config(&self) -> &GovernorConfig {
        &self.config
    }

    /// Begin accepting frame timings.
    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.meter.reset();
        }
    }

    /// Stop accepting frame timings. The current tier is kept.
    pub fn stop(&mut self) {
        self.running = false;
        self.meter.reset();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Feed one rendered frame; runs [`observe`](Self::observe) whenever the
    /// meter completes a sampling interval.
    pub fn record_frame(
        &mut self,
        timestamp_ms: f64,
        memory_usage_pct: Option<f32>,
    ) -> Option<TierChange> {
        if !self.running {
            return None;
        }
        let sample = self.meter.tick(timestamp_ms, memory_usage_pct)?;
        self.observe(sample)
    }

    /// Current tier: the override when one is active, else the governed tier.
    pub fn tier(&self) -> QualityTier {
        self.forced.unwrap_or(self.governed)
    }

    pub fn governed_tier(&self) -> QualityTier {
        self.governed
    }

    pub fn is_overridden(&self) -> bool {
        self.forced.is_some()
    }

    /// Pin the tier until [`release_override`](Self::release_override).
    pub fn force_tier(&mut self, tier: QualityTier) {
        if self.forced != Some(tier) {
            log::info!("[governor] override -> {}", tier.label());
        }
        self.forced = Some(tier);
    }

    pub fn release_override(&mut self) {
        if self.forced.take().is_some() {
            log::info!(
                "[governor] override released, resuming at {}",
                self.governed.label()
            );
            self.clear_streaks();
        }
    }

    pub fn history(&self) -> &SampleRing {
        &self.ring
    }

    pub fn stats(&self) -> GovernorStats {
        GovernorStats {
            rolling: self
                .ring
                .rolling(self.config.rolling_window)
                .unwrap_or_default(),
            last_memory_pct: self.ring.latest().and_then(|s| s.memory_usage_pct),
            samples_seen: self.samples_seen,
            transitions: self.transitions,
        }
    }

    /// Record one sample and apply the hysteresis rules.
    pub fn observe(&mut self, sample: PerformanceSample) -> Option<TierChange> {
        self.ring.push(sample);
        self.samples_seen += 1;
        let rolling = self.ring.rolling(self.config.rolling_window)?;
        if self.forced.is_some() {
            return None;
        }

        let current = self.governed;
        let memory = sample.memory_usage_pct;
        let (worse, reason) = self.classify(rolling.mean_fps, memory, 0.0);
        if worse.is_worse_than(current) {
            self.recover_streak = 0;
            self.degrade_streak += 1;
            if self.degrade_streak == 1 || self.degrade_floor.is_worse_than(worse) {
                self.degrade_floor = worse;
            }
            if self.degrade_streak >= self.config.degrade_dwell.max(1) {
                let to = self.degrade_floor;
                return Some(self.commit(current, to, reason, rolling.mean_fps));
            }
            return None;
        }
        self.degrade_streak = 0;

        let (better, _) = self.classify(rolling.mean_fps, memory, self.config.recovery_margin_fps);
        if current.is_worse_than(better) {
            self.recover_streak += 1;
            if self.recover_streak >= self.config.recover_dwell.max(1) {
                let to = current.recovered();
                return Some(self.commit(
                    current,
                    to,
                    TierChangeReason::Recovered,
                    rolling.mean_fps,
                ));
            }
        } else {
            self.recover_streak = 0;
        }
        None
    }

    fn classify(
        &self,
        fps: f32,
        memory_pct: Option<f32>,
        margin: f32,
    ) -> (QualityTier, TierChangeReason) {
        // Without memory statistics the classification is fps-only.
        if memory_pct.is_some_and(|m| m > self.config.memory_ceiling_pct) {
            return (QualityTier::Low, TierChangeReason::MemoryPressure);
        }
        if fps < self.config.critical_fps + margin {
            (QualityTier::Low, TierChangeReason::LowFrameRate)
        } else if fps < self.config.warning_fps + margin {
            (QualityTier::Medium, TierChangeReason::LowFrameRate)
        } else {
            (QualityTier::High, TierChangeReason::Recovered)
        }
    }

    fn commit(
        &mut self,
        from: QualityTier,
        to: QualityTier,
        reason: TierChangeReason,
        rolling_fps: f32,
    ) -> TierChange {
        self.governed = to;
        self.transitions += 1;
        self.clear_streaks();
        log::info!(
            "[governor] {} -> {} ({:?}, rolling {:.1} fps)",
            from.label(),
            to.label(),
            reason,
            rolling_fps
        );
        TierChange {
            from,
            to,
            reason,
            rolling_fps,
        }
    }

    fn clear_streaks(&mut self) {
        self.degrade_streak = 0;
        self.recover_streak = 0;
        self.degrade_floor = self.governed;
    }
}
