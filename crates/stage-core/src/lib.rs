//! Scroll-driven section choreography.
//!
//! Everything here is platform-free and runs synchronously inside one frame
//! callback: [`sampler`] → [`section`] → [`phase`] → [`director`] (reading the
//! [`governor`]) → [`theme`]. Front-ends own the frame loop and the DOM and
//! feed the director one [`FrameInput`] per frame.

pub mod constants;
pub mod defaults;
pub mod director;
pub mod easing;
pub mod error;
pub mod governor;
pub mod phase;
pub mod policy;
pub mod sampler;
pub mod section;
pub mod theme;

pub use constants::*;
pub use defaults::*;
pub use director::*;
pub use easing::*;
pub use error::*;
pub use governor::*;
pub use phase::*;
pub use policy::*;
pub use sampler::*;
pub use section::{map, SectionDescriptor, SectionState, SectionTable};
pub use theme::*;

/// Director built from the stock eight-section tables.
pub fn default_director(config: DirectorConfig) -> Result<AnimationDirector, ConfigError> {
    AnimationDirector::new(
        default_sections()?,
        default_choreography()?,
        default_themes(),
        config,
    )
}
