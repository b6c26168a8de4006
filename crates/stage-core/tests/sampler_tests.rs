// Scroll sampling and per-frame coalescing.

use stage_core::*;

#[test]
fn progress_is_offset_over_scrollable_range() {
    let s = ScrollSignal::new(450.0, 1000.0, 100.0);
    assert!((sample(&s) - 0.5).abs() < 1e-6);
}

#[test]
fn progress_clamps_to_unit_interval() {
    assert_eq!(sample(&ScrollSignal::new(5000.0, 1000.0, 100.0)), 1.0);
    // Negative offsets (rubber-band overscroll) use the magnitude.
    assert!((sample(&ScrollSignal::new(-90.0, 1000.0, 100.0)) - 0.1).abs() < 1e-6);
}

#[test]
fn degenerate_range_yields_zero_not_nan() {
    for s in [
        ScrollSignal::new(10.0, 100.0, 100.0),
        ScrollSignal::new(10.0, 50.0, 100.0),
        ScrollSignal::new(0.0, 0.0, 0.0),
        ScrollSignal::new(f32::NAN, 1000.0, 100.0),
        ScrollSignal::new(10.0, f32::INFINITY, 100.0),
    ] {
        let p = sample(&s);
        assert_eq!(p, 0.0, "signal {s:?} should sample to 0, got {p}");
    }
}

#[test]
fn sampling_is_idempotent() {
    let s = ScrollSignal::new(333.0, 2400.0, 800.0);
    let a = sample(&s);
    let b = sample(&s);
    assert_eq!(a.to_bits(), b.to_bits());
}

#[test]
fn coalescer_keeps_latest_signal_once_per_frame() {
    let mut c = FrameCoalescer::new();
    assert!(c.take().is_none(), "nothing pending before any event");
    for offset in [10.0, 20.0, 30.0] {
        c.push(ScrollSignal::new(offset, 1000.0, 100.0));
    }
    assert!(c.has_pending());
    let frame = c.take().expect("pending signal");
    assert_eq!(frame.events, 3);
    assert_eq!(frame.signal.raw_offset, 30.0);
    assert!(c.take().is_none(), "second take in the same frame yields nothing");
}
