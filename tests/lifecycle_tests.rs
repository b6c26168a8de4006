// Host-side tests for page lifecycle decisions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod lifecycle {
    include!("../src/lifecycle.rs");
}

use lifecycle::*;

#[test]
fn cached_page_is_paused_not_torn_down() {
    assert_eq!(hide_action(true), HideAction::Pause);
    assert_eq!(hide_action(false), HideAction::Teardown);
}

#[test]
fn restored_page_resumes_a_stopped_loop_once() {
    assert!(should_resume(true, false));
    assert!(!should_resume(true, true), "loop already running");
    assert!(!should_resume(false, false), "fresh load starts its own loop");
}
