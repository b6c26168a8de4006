//! Section → background theme, blended across transition bands.
//!
//! [`theme`] is a pure function of its inputs so consumers can memoize on
//! the section state without worrying about hidden state.

use std::rc::Rc;

use glam::Vec3;

use crate::section::SectionState;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ParticlePattern {
    #[default]
    Drift,
    Orbit,
    Constellation,
    Rain,
    Pulse,
    Spiral,
    Grid,
    Sparkle,
}

impl ParticlePattern {
    pub fn name(self) -> &'static str {
        match self {
            ParticlePattern::Drift => "drift",
            ParticlePattern::Orbit => "orbit",
            ParticlePattern::Constellation => "constellation",
            ParticlePattern::Rain => "rain",
            ParticlePattern::Pulse => "pulse",
            ParticlePattern::Spiral => "spiral",
            ParticlePattern::Grid => "grid",
            ParticlePattern::Sparkle => "sparkle",
        }
    }
}

/// Background palette for one section. Colours are linear RGB in \[0, 1\].
#[derive(Clone, Debug, PartialEq)]
pub struct ThemeDescriptor {
    pub palette_id: Rc<str>,
    pub background: Vec3,
    pub accent: Vec3,
    pub particle_color: Vec3,
    pub particle_pattern: ParticlePattern,
    /// Weight of the upper section while blending; 0 outside transitions.
    pub blend_weight: f32,
}

impl ThemeDescriptor {
    pub fn new(
        palette_id: impl Into<Rc<str>>,
        background: [f32; 3],
        accent: [f32; 3],
        particle_color: [f32; 3],
        particle_pattern: ParticlePattern,
    ) -> Self {
        Self {
            palette_id: palette_id.into(),
            background: Vec3::from_array(background),
            accent: Vec3::from_array(accent),
            particle_color: Vec3::from_array(particle_color),
            particle_pattern,
            blend_weight: 0.0,
        }
    }

    /// Component-wise blend towards `other`. Discrete fields follow whichever
    /// side dominates (`weight >= 0.5` picks `other`).
    pub fn blend(&self, other: &ThemeDescriptor, weight: f32) -> ThemeDescriptor {
        let w = weight.clamp(0.0, 1.0);
        let dominant = if w >= 0.5 { other } else { self };
        ThemeDescriptor {
            palette_id: Rc::clone(&dominant.palette_id),
            background: self.background.lerp(other.background, w),
            accent: self.accent.lerp(other.accent, w),
            particle_color: self.particle_color.lerp(other.particle_color, w),
            particle_pattern: dominant.particle_pattern,
            blend_weight: w,
        }
    }
}

impl Default for ThemeDescriptor {
    fn default() -> Self {
        Self::new(
            "default",
            [0.02, 0.03, 0.06],
            [0.45, 0.62, 1.0],
            [0.8, 0.85, 1.0],
            ParticlePattern::Drift,
        )
    }
}

/// Theme for the current frame. Outside a transition band this is the
/// current section's entry verbatim.
pub fn theme(state: &SectionState, table: &[ThemeDescriptor]) -> ThemeDescriptor {
    let lookup = |i: usize| table.get(i).or(table.last());
    match state.transition_pair() {
        Some((lower, upper)) if state.is_transitioning => match (lookup(lower), lookup(upper)) {
            (Some(a), Some(b)) => a.blend(b, state.transition_progress),
            _ => ThemeDescriptor::default(),
        },
        _ => lookup(state.current_index)
            .map(|t| ThemeDescriptor {
                blend_weight: 0.0,
                ..t.clone()
            })
            .unwrap_or_default(),
    }
}

/// `#rrggbb` for a linear RGB triple.
pub fn css_hex(color: Vec3) -> String {
    let c = color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0;
    format!(
        "#{:02x}{:02x}{:02x}",
        c.x.round() as u8,
        c.y.round() as u8,
        c.z.round() as u8
    )
}
