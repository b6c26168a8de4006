// Shared tuning constants for the section pipeline and the quality governor.

// Section layout
pub const SECTION_COUNT: usize = 8;
pub const DEFAULT_SECTION_IDS: [&str; SECTION_COUNT] = [
    "hero",
    "problem",
    "solution",
    "features",
    "process",
    "showcase",
    "testimonials",
    "contact",
];
// Total width of the cross-fade band straddling each interior boundary.
pub const BOUNDARY_WIDTH: f32 = 0.02;
pub const TABLE_EPSILON: f32 = 1e-6; // tolerance when checking that bands meet exactly

// Navigation
pub const NAV_ARRIVAL_TOLERANCE: f32 = 0.002; // progress distance counted as "arrived"
pub const NAV_INTERRUPT_TOLERANCE: f32 = 0.01; // backwards drift that cancels a pending request

// Governor thresholds
pub const WARNING_FPS: f32 = 35.0;
pub const CRITICAL_FPS: f32 = 20.0;
pub const MEMORY_CEILING_PCT: f32 = 80.0;
pub const RECOVERY_MARGIN_FPS: f32 = 5.0; // added to thresholds when recovering

// Governor hysteresis (in samples)
pub const DEGRADE_DWELL_SAMPLES: u32 = 3;
pub const RECOVER_DWELL_SAMPLES: u32 = 9; // degrade fast, recover slow

// Governor sampling
pub const ROLLING_WINDOW: usize = 5; // samples averaged for classification
pub const SAMPLE_RING_CAPACITY: usize = 60;
pub const SAMPLE_INTERVAL_MS: f64 = 1000.0; // one performance sample per second of frames
pub const MAX_FRAME_GAP_MS: f64 = 250.0; // longer gaps (hidden tab) restart the measuring window

// Effect budget at full quality
pub const BASE_PARTICLE_COUNT: u32 = 160;
pub const BASE_BLUR_PX: f32 = 12.0;

// Diagnostics
pub const DIAGNOSTICS_CAPACITY: usize = 32; // most recent consumer failures kept
