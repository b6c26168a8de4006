// Phase choreography: clamping, easing, staggered groups, validation.

use proptest::prelude::*;
use stage_core::*;

fn reveal() -> Vec<PhaseConfig> {
    vec![
        PhaseConfig::new("fade", 0.0, 0.3).easing(Easing::EaseOutCubic),
        PhaseConfig::new("cards", 0.2, 0.6).staggered(3, 0.5).non_critical(),
        PhaseConfig::new("exit", 0.6, 1.0).easing(Easing::EaseInCubic),
    ]
}

#[test]
fn phases_clamp_before_and_after_their_range() {
    let phases = reveal();
    validate_phases("s", &phases).unwrap();
    for phase in &phases {
        for i in 0..=200 {
            let local = i as f32 / 200.0;
            let state = &choreograph(local, std::slice::from_ref(phase))[0];
            if local < phase.start {
                assert_eq!(state.local_value, 0.0, "{} at {local}", phase.id);
            } else if local >= phase.end {
                assert_eq!(state.local_value, 1.0, "{} at {local}", phase.id);
            } else {
                assert!((0.0..=1.0).contains(&state.local_value));
            }
        }
    }
}

#[test]
fn eased_value_follows_declared_curve() {
    let phases = reveal();
    let states = choreograph(0.15, &phases);
    let expected = Easing::EaseOutCubic.apply(0.5);
    assert!((states[0].local_value - 0.5).abs() < 1e-5);
    assert!((states[0].eased - expected).abs() < 1e-5);
    assert!(states[0].eased > states[0].local_value, "ease-out runs ahead of linear");
}

#[test]
fn staggered_groups_start_in_order_and_finish_together() {
    let phase = PhaseConfig::new("cards", 0.2, 0.6).staggered(3, 0.5);
    let (s0, e0) = phase.group_range(0);
    assert!((s0 - 0.2).abs() < 1e-6 && (e0 - 0.4).abs() < 1e-6);
    let (s1, e1) = phase.group_range(1);
    assert!((s1 - 0.3).abs() < 1e-6 && (e1 - 0.5).abs() < 1e-6);
    assert_eq!(phase.group_range(2).1, 0.6);

    let mid = &choreograph(0.35, std::slice::from_ref(&phase))[0];
    assert_eq!(mid.groups.len(), 3);
    assert!(mid.groups[0] > mid.groups[1], "{:?}", mid.groups);
    assert_eq!(mid.groups[2], 0.0, "last group has not started yet");

    let done = &choreograph(0.6, std::slice::from_ref(&phase))[0];
    assert!(done.groups.iter().all(|&g| g == 1.0));
}

#[test]
fn empty_phase_list_and_unknown_section_choreograph_to_nothing() {
    assert!(choreograph(0.5, &[]).is_empty());
    let c = Choreography::new().with_section("a", reveal()).unwrap();
    assert!(c.choreograph("missing", 0.5).is_empty());
    assert_eq!(c.choreograph("a", 0.5).len(), 3);
}

#[test]
fn adding_a_section_needs_only_configuration() {
    let c = default_choreography()
        .unwrap()
        .with_section("ninth", reveal())
        .unwrap();
    let states = c.choreograph("ninth", 1.0);
    assert!(states.iter().all(|s| s.local_value == 1.0));
}

#[test]
fn freeze_pins_completed_state() {
    let mut state = choreograph(0.1, &reveal())[1].clone();
    assert_eq!(state.local_value, 0.0);
    state.freeze();
    assert!(state.frozen);
    assert_eq!((state.local_value, state.eased), (1.0, 1.0));
    assert!(state.groups.iter().all(|&g| g == 1.0));
}

#[test]
fn validation_rejects_malformed_lists() {
    let bad_range = vec![PhaseConfig::new("x", 0.5, 0.4)];
    assert!(matches!(
        validate_phases("s", &bad_range),
        Err(ConfigError::InvalidPhaseRange { .. })
    ));
    let outside = vec![PhaseConfig::new("x", 0.5, 1.2)];
    assert!(matches!(
        validate_phases("s", &outside),
        Err(ConfigError::InvalidPhaseRange { .. })
    ));
    let unordered = vec![PhaseConfig::new("a", 0.5, 0.7), PhaseConfig::new("b", 0.2, 0.4)];
    assert!(matches!(
        validate_phases("s", &unordered),
        Err(ConfigError::PhaseOrder { .. })
    ));
    let dup = vec![PhaseConfig::new("a", 0.0, 0.5), PhaseConfig::new("a", 0.5, 1.0)];
    assert!(matches!(
        validate_phases("s", &dup),
        Err(ConfigError::DuplicatePhase { .. })
    ));
    let stagger = vec![PhaseConfig::new("a", 0.0, 0.5).staggered(0, 0.2)];
    assert!(matches!(
        validate_phases("s", &stagger),
        Err(ConfigError::InvalidStagger { .. })
    ));
    let stagger = vec![PhaseConfig::new("a", 0.0, 0.5).staggered(3, 1.0)];
    assert!(matches!(
        validate_phases("s", &stagger),
        Err(ConfigError::InvalidStagger { .. })
    ));
    assert!(Choreography::new().with_section("s", bad_range).is_err());
}

#[test]
fn validation_rejects_uncovered_spans_between_phases() {
    let gap = vec![PhaseConfig::new("intro", 0.0, 0.2), PhaseConfig::new("outro", 0.5, 1.0)];
    match validate_phases("s", &gap) {
        Err(ConfigError::PhaseGap { phase, covered_to, .. }) => {
            assert_eq!(phase, "outro");
            assert_eq!(covered_to, 0.2);
        }
        other => panic!("expected a gap error, got {other:?}"),
    }
    // An earlier long phase still covers a later short one's leading edge.
    let nested = vec![
        PhaseConfig::new("backdrop", 0.0, 0.9),
        PhaseConfig::new("title", 0.1, 0.3),
        PhaseConfig::new("exit", 0.9, 1.0),
    ];
    validate_phases("s", &nested).unwrap();
    assert!(Choreography::new().with_section("s", gap).is_err());
}

#[test]
fn single_group_ignores_stagger() {
    let phase = PhaseConfig::new("fade", 0.2, 0.6).staggered(1, 0.5);
    validate_phases("s", std::slice::from_ref(&phase)).unwrap();
    assert_eq!(phase.group_range(0), (0.2, 0.6));
    let state = &choreograph(0.5, std::slice::from_ref(&phase))[0];
    assert!((state.groups[0] - state.local_value).abs() < 1e-6);
    assert!(state.groups[0] < 1.0, "group finishes with the phase, not before");
}

#[test]
fn every_easing_fixes_endpoints_and_stays_in_range() {
    for e in Easing::ALL {
        assert!(e.apply(0.0).abs() < 1e-6, "{} at 0", e.name());
        assert!((e.apply(1.0) - 1.0).abs() < 1e-6, "{} at 1", e.name());
        assert_eq!(e.apply(f32::NAN), 0.0);
        for i in 0..=100 {
            let v = e.apply(i as f32 / 100.0);
            assert!((0.0..=1.0).contains(&v), "{} escaped: {v}", e.name());
        }
    }
}

#[test]
fn stock_choreography_is_valid_for_stock_sections() {
    let sections = default_sections().unwrap();
    let c = default_choreography().unwrap();
    for id in c.section_ids() {
        assert!(sections.index_of(id).is_some(), "unknown section {id}");
    }
}

proptest! {
    #[test]
    fn phase_values_never_leave_unit_interval(local in -1.0f32..2.0) {
        for state in choreograph(local, &reveal()) {
            prop_assert!((0.0..=1.0).contains(&state.local_value));
            prop_assert!((0.0..=1.0).contains(&state.eased));
            for g in &state.groups {
                prop_assert!((0.0..=1.0).contains(g));
            }
        }
    }

    #[test]
    fn phase_value_is_monotonic(a in 0.0f32..=1.0, b in 0.0f32..=1.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(phase_value(0.2, 0.7, lo) <= phase_value(0.2, 0.7, hi));
    }
}
