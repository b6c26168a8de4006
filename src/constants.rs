// Page wiring and front-end tuning constants.
//
// Element ids and attribute names form the contract with the host page;
// the remaining values tune timers and the particle layer.

// Element ids
pub const SCROLL_ROOT_ID: &str = "scroll-root";
pub const NAV_DOTS_ID: &str = "nav-dots";
pub const PARTICLE_CANVAS_ID: &str = "particle-canvas";
pub const DEBUG_HUD_ID: &str = "debug-hud";

// Attributes and classes
pub const SECTION_ATTR: &str = "data-section";
pub const NAV_INDEX_ATTR: &str = "data-nav-index";
pub const PALETTE_ATTR: &str = "data-palette";
pub const NAV_DOT_CLASS: &str = "nav-dot";
pub const ACTIVE_CLASS: &str = "is-active";
pub const HIDDEN_CLASS: &str = "hidden";
pub const STATIC_CLASS: &str = "static-presentation";

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

// Memory ticker (milliseconds)
pub const MEMORY_POLL_MS: i32 = 2000;
pub const MEMORY_REPROBE_MS: i32 = 5000;

// A director step longer than this is logged at debug level (milliseconds).
pub const SLOW_STEP_MS: f32 = 4.0;

// HUD text is rebuilt every N published frames while visible
pub const HUD_REFRESH_FRAMES: u64 = 15;

// Particle field, in normalized viewport units unless noted
pub const PARTICLE_MAX_DT_SEC: f32 = 0.1;
pub const PARTICLE_BASE_SPEED: f32 = 0.03;
pub const PARTICLE_RAIN_SPEED: f32 = 0.12;
pub const PARTICLE_ORBIT_RATE: f32 = 0.25; // radians per second
pub const PARTICLE_SPIRAL_PULL: f32 = 0.04;
pub const PARTICLE_MIN_RADIUS_PX: f32 = 0.8;
pub const PARTICLE_MAX_RADIUS_PX: f32 = 2.6;
pub const PARTICLE_BLUR_SCALE: f32 = 0.25; // fraction of the budget's blur applied to the canvas
pub const CONSTELLATION_LINK_DIST: f32 = 0.08;
pub const CONSTELLATION_MIN_COMPLEXITY: f32 = 0.5;
