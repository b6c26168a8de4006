//! Headless run of the stock page: a scripted scroll trace with synthetic
//! frame timing, driven through the same director the browser uses.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Context;
use instant::Instant;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use stage_core::{
    default_director, DirectorConfig, FrameInput, FrameSnapshot, QualityTier, ScrollSignal,
    SnapshotConsumer,
};

const VIEWPORT_PX: f32 = 900.0;
const CONTAINER_PX: f32 = 900.0 * 9.0;
const SEED: u64 = 42;
const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;
const SLOW_FRAME_MS: f64 = 1000.0 / 14.0;
/// Frames during which the simulated device struggles.
const SLOWDOWN: std::ops::Range<u64> = 1500..2400;
const NAV_TARGET: usize = 5;

/// Logs section changes as they are published.
struct SectionLog {
    last: Option<usize>,
}

impl SnapshotConsumer for SectionLog {
    fn name(&self) -> &str {
        "section-log"
    }

    fn on_snapshot(&mut self, snapshot: &FrameSnapshot) -> anyhow::Result<()> {
        if self.last != Some(snapshot.section_index) {
            log::info!(
                "[scroll] frame {} section {} ({}) palette {}",
                snapshot.frame,
                snapshot.section_index,
                snapshot.section_id,
                snapshot.theme.palette_id
            );
            self.last = Some(snapshot.section_index);
        }
        Ok(())
    }
}

/// Records every tier the page was rendered at, for the summary.
struct TierTrace {
    tiers: Rc<RefCell<Vec<(u64, QualityTier)>>>,
}

impl SnapshotConsumer for TierTrace {
    fn name(&self) -> &str {
        "tier-trace"
    }

    fn on_snapshot(&mut self, snapshot: &FrameSnapshot) -> anyhow::Result<()> {
        let mut tiers = self.tiers.borrow_mut();
        if tiers.last().map(|(_, t)| *t) != Some(snapshot.quality_tier) {
            tiers.push((snapshot.frame, snapshot.quality_tier));
        }
        Ok(())
    }
}

/// Scroll offset for each scripted frame: down the page, a pause, back up.
fn scripted_offsets() -> Vec<f32> {
    let range = CONTAINER_PX - VIEWPORT_PX;
    let mut offsets = Vec::new();
    let down = 1800;
    for i in 0..=down {
        offsets.push(range * i as f32 / down as f32);
    }
    offsets.extend(std::iter::repeat(range).take(600));
    let up = 900;
    for i in (0..=up).rev() {
        offsets.push(range * i as f32 / up as f32);
    }
    offsets.extend(std::iter::repeat(0.0).take(300));
    offsets
}

fn frame_duration(rng: &mut StdRng, frame: u64) -> f64 {
    let base = if SLOWDOWN.contains(&frame) {
        SLOW_FRAME_MS
    } else {
        NOMINAL_FRAME_MS
    };
    base * rng.gen_range(0.9..1.1)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let started = Instant::now();

    let mut director =
        default_director(DirectorConfig::default()).context("stock page tables")?;
    let tiers = Rc::new(RefCell::new(Vec::new()));
    director.subscribe(Box::new(SectionLog { last: None }));
    director.subscribe(Box::new(TierTrace {
        tiers: tiers.clone(),
    }));

    let mut rng = StdRng::seed_from_u64(SEED);
    let mut clock_ms = 0.0;
    let mut frame = 0u64;
    let mut offset = 0.0;
    for scripted in scripted_offsets() {
        offset = scripted;
        clock_ms += frame_duration(&mut rng, frame);
        frame += 1;
        let memory = Some(rng.gen_range(30.0..45.0));
        director.step(FrameInput {
            signal: ScrollSignal::new(offset, CONTAINER_PX, VIEWPORT_PX),
            timestamp_ms: clock_ms,
            memory_usage_pct: memory,
        });
    }

    // Navigation request, eased towards the target the way a smooth scroll would.
    let signal = ScrollSignal::new(offset, CONTAINER_PX, VIEWPORT_PX);
    let command = director
        .request_section(NAV_TARGET, &signal)
        .context("navigation request")?;
    let from = offset;
    let travel = 45;
    for i in 1..=travel + 10 {
        let t = (i as f32 / travel as f32).min(1.0);
        let eased = 1.0 - (1.0 - t).powi(3);
        offset = from + (command.target_offset - from) * eased;
        clock_ms += frame_duration(&mut rng, frame);
        frame += 1;
        director.step(FrameInput::new(
            ScrollSignal::new(offset, CONTAINER_PX, VIEWPORT_PX),
            clock_ms,
        ));
    }
    let landed = director.snapshot();
    if landed.section_index != NAV_TARGET || director.navigation_target().is_some() {
        log::warn!(
            "[nav] expected to settle on section {NAV_TARGET}, at {} (pending {:?})",
            landed.section_index,
            director.navigation_target()
        );
    }

    let stats = director.stats();
    let governor = director.governor_stats();
    let last_change = director.last_tier_change();
    director.dispose();

    println!("simulated {frame} frames ({:.1}s of page time)", clock_ms / 1000.0);
    println!(
        "computed {} / idle {} / mapper calls {} / choreographer calls {} / consumer failures {}",
        stats.computed_frames,
        stats.idle_frames,
        stats.mapper_calls,
        stats.choreographer_calls,
        stats.consumer_failures
    );
    println!(
        "governor: {} samples, {} tier changes, rolling fps {:.1}",
        governor.samples_seen, governor.transitions, governor.rolling.mean_fps
    );
    if let Some(change) = last_change {
        println!(
            "last tier change: {} -> {} ({}, {:.1} fps)",
            change.from.label(),
            change.to.label(),
            change.reason.label(),
            change.rolling_fps
        );
    }
    for (at, tier) in tiers.borrow().iter() {
        println!("  frame {at:>5}: {} ({})", tier.label(), tier.status());
    }
    println!(
        "settled on section {} ({}); wall time {:.2?}",
        landed.section_index,
        landed.section_id,
        started.elapsed()
    );
    Ok(())
}
