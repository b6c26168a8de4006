pub mod intent;
pub mod keyboard;
pub mod scroll;

pub use intent::{intent_for_key, target_section, KeyIntent};
pub use keyboard::wire_global_keydown;
pub use scroll::{wire_resize, wire_scroll};
