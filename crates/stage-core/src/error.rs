use thiserror::Error;

/// Rejected configuration. Raised at construction time only; a director never
/// starts from a table that failed validation.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("section table is empty")]
    EmptyTable,
    #[error("section id `{0}` appears more than once")]
    DuplicateSection(String),
    #[error("section `{id}` has a non-positive width ({start}..{end})")]
    EmptyBand { id: String, start: f32, end: f32 },
    #[error("section `{id}` bound {value} lies outside [0, 1]")]
    OutOfRange { id: String, value: f32 },
    #[error("section table must span [0, 1] but covers {start}..{end}")]
    NotSpanning { start: f32, end: f32 },
    #[error("gap between `{before}` (ends at {end}) and `{after}` (starts at {start})")]
    Gap {
        before: String,
        after: String,
        end: f32,
        start: f32,
    },
    #[error("`{before}` (ends at {end}) overlaps `{after}` (starts at {start})")]
    Overlap {
        before: String,
        after: String,
        end: f32,
        start: f32,
    },
    #[error("boundary width {width} must lie in [0, {max}]")]
    BoundaryWidth { width: f32, max: f32 },
    #[error("section `{section}` phase `{phase}` has invalid range {start}..{end}")]
    InvalidPhaseRange {
        section: String,
        phase: String,
        start: f32,
        end: f32,
    },
    #[error("section `{section}` phase `{phase}` starts before the phase declared ahead of it")]
    PhaseOrder { section: String, phase: String },
    #[error("section `{section}` phase `{phase}` starts at {start}, leaving a gap after {covered_to}")]
    PhaseGap {
        section: String,
        phase: String,
        start: f32,
        covered_to: f32,
    },
    #[error("section `{section}` declares phase `{phase}` more than once")]
    DuplicatePhase { section: String, phase: String },
    #[error("section `{section}` phase `{phase}` has invalid stagger (groups {groups}, stagger {stagger})")]
    InvalidStagger {
        section: String,
        phase: String,
        groups: u8,
        stagger: f32,
    },
    #[error("theme table has {themes} entries for {sections} sections")]
    ThemeCount { themes: usize, sections: usize },
    #[error("unknown section id `{0}`")]
    UnknownSection(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("section index {index} is out of range (table has {count} sections)")]
    OutOfRange { index: usize, count: usize },
}
