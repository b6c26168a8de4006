//! The stock eight-section page: bands, phase lists, and palettes.

use crate::constants::DEFAULT_SECTION_IDS;
use crate::easing::Easing;
use crate::error::ConfigError;
use crate::phase::{Choreography, PhaseConfig};
use crate::section::SectionTable;
use crate::theme::{ParticlePattern, ThemeDescriptor};

pub fn default_sections() -> Result<SectionTable, ConfigError> {
    SectionTable::even(&DEFAULT_SECTION_IDS)
}

/// Entrance fade, staggered reveal of `groups` cards, steady state, exit.
fn standard_phases(groups: u8) -> Vec<PhaseConfig> {
    vec![
        PhaseConfig::new("entrance-fade", 0.0, 0.25).easing(Easing::EaseOutCubic),
        PhaseConfig::new("stagger-reveal", 0.15, 0.55)
            .easing(Easing::EaseOut)
            .staggered(groups, 0.5)
            .non_critical(),
        PhaseConfig::new("steady-state", 0.55, 0.85),
        PhaseConfig::new("exit", 0.85, 1.0)
            .easing(Easing::EaseInCubic)
            .non_critical(),
    ]
}

pub fn default_choreography() -> Result<Choreography, ConfigError> {
    Choreography::new()
        .with_section(
            "hero",
            vec![
                PhaseConfig::new("title-rise", 0.0, 0.2).easing(Easing::EaseOutCubic),
                PhaseConfig::new("tagline", 0.1, 0.35).easing(Easing::EaseOut),
                PhaseConfig::new("scroll-cue", 0.3, 0.6)
                    .easing(Easing::Smoothstep)
                    .non_critical(),
                PhaseConfig::new("exit", 0.6, 1.0)
                    .easing(Easing::EaseInCubic)
                    .non_critical(),
            ],
        )?
        .with_section("problem", standard_phases(3))?
        .with_section("solution", standard_phases(3))?
        .with_section("features", standard_phases(6))?
        .with_section(
            "process",
            vec![
                PhaseConfig::new("entrance-fade", 0.0, 0.2).easing(Easing::EaseOutCubic),
                PhaseConfig::new("timeline-draw", 0.1, 0.8)
                    .easing(Easing::EaseInOut)
                    .staggered(5, 0.6),
                PhaseConfig::new("exit", 0.8, 1.0)
                    .easing(Easing::EaseInCubic)
                    .non_critical(),
            ],
        )?
        .with_section("showcase", standard_phases(4))?
        .with_section("testimonials", standard_phases(3))?
        .with_section(
            "contact",
            vec![
                PhaseConfig::new("entrance-fade", 0.0, 0.3).easing(Easing::EaseOutCubic),
                PhaseConfig::new("form-reveal", 0.2, 0.6)
                    .easing(Easing::EaseOut)
                    .staggered(4, 0.4),
                PhaseConfig::new("glow", 0.5, 1.0)
                    .easing(Easing::EaseInOutCubic)
                    .non_critical(),
            ],
        )
}

pub fn default_themes() -> Vec<ThemeDescriptor> {
    use ParticlePattern::*;
    vec![
        ThemeDescriptor::new(
            "midnight",
            [0.02, 0.03, 0.08],
            [0.40, 0.55, 1.00],
            [0.75, 0.85, 1.00],
            Drift,
        ),
        ThemeDescriptor::new(
            "ember",
            [0.10, 0.03, 0.03],
            [0.95, 0.40, 0.25],
            [1.00, 0.60, 0.35],
            Rain,
        ),
        ThemeDescriptor::new(
            "aurora",
            [0.02, 0.08, 0.07],
            [0.25, 0.90, 0.65],
            [0.55, 1.00, 0.80],
            Orbit,
        ),
        ThemeDescriptor::new(
            "violet",
            [0.06, 0.03, 0.10],
            [0.65, 0.40, 0.95],
            [0.80, 0.65, 1.00],
            Constellation,
        ),
        ThemeDescriptor::new(
            "slate",
            [0.05, 0.06, 0.08],
            [0.55, 0.65, 0.75],
            [0.80, 0.85, 0.90],
            Grid,
        ),
        ThemeDescriptor::new(
            "sunrise",
            [0.10, 0.06, 0.02],
            [1.00, 0.75, 0.30],
            [1.00, 0.85, 0.55],
            Sparkle,
        ),
        ThemeDescriptor::new(
            "lagoon",
            [0.01, 0.06, 0.10],
            [0.20, 0.75, 0.95],
            [0.55, 0.90, 1.00],
            Pulse,
        ),
        ThemeDescriptor::new(
            "nebula",
            [0.07, 0.02, 0.07],
            [0.95, 0.35, 0.75],
            [1.00, 0.70, 0.90],
            Spiral,
        ),
    ]
}
