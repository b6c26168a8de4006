// Page lifecycle decisions, kept free of web-sys so they run on the host.

/// What `pagehide` does to the running page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HideAction {
    /// Entering the back-forward cache: stop the loop, keep everything else.
    Pause,
    /// Real unload: stop the loop and tear the director down.
    Teardown,
}

#[inline]
pub fn hide_action(persisted: bool) -> HideAction {
    if persisted {
        HideAction::Pause
    } else {
        HideAction::Teardown
    }
}

/// Whether `pageshow` should restart the frame loop.
#[inline]
pub fn should_resume(persisted: bool, loop_running: bool) -> bool {
    persisted && !loop_running
}
