//! Effect density per quality tier.

use crate::governor::QualityTier;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TierPolicy {
    /// Multiplier on the base particle count.
    pub particle_density: f32,
    pub blur: bool,
    pub max_blur_px: f32,
    /// Multiplier consumers apply to per-effect detail (layers, segments, trails).
    pub complexity: f32,
    /// When false, non-critical phases are frozen at their completed state.
    pub animate_non_critical: bool,
}

impl TierPolicy {
    pub fn budget(&self, base_particles: u32, base_blur_px: f32) -> EffectBudget {
        EffectBudget {
            particle_count: (base_particles as f32 * self.particle_density.clamp(0.0, 1.0)).round()
                as u32,
            blur_px: if self.blur {
                base_blur_px.min(self.max_blur_px).max(0.0)
            } else {
                0.0
            },
            complexity: self.complexity.clamp(0.0, 1.0),
            animate_non_critical: self.animate_non_critical,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QualityPolicy {
    pub high: TierPolicy,
    pub medium: TierPolicy,
    pub low: TierPolicy,
}

impl QualityPolicy {
    pub fn for_tier(&self, tier: QualityTier) -> &TierPolicy {
        match tier {
            QualityTier::High => &self.high,
            QualityTier::Medium => &self.medium,
            QualityTier::Low => &self.low,
        }
    }
}

impl Default for QualityPolicy {
    fn default() -> Self {
        Self {
            high: TierPolicy {
                particle_density: 1.0,
                blur: true,
                max_blur_px: 12.0,
                complexity: 1.0,
                animate_non_critical: true,
            },
            medium: TierPolicy {
                particle_density: 0.5,
                blur: false,
                max_blur_px: 0.0,
                complexity: 0.7,
                animate_non_critical: true,
            },
            low: TierPolicy {
                particle_density: 0.2,
                blur: false,
                max_blur_px: 0.0,
                complexity: 0.4,
                animate_non_critical: false,
            },
        }
    }
}

/// Concrete effect limits published with each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EffectBudget {
    pub particle_count: u32,
    pub blur_px: f32,
    pub complexity: f32,
    pub animate_non_critical: bool,
}
