// Section table validation and progress → section mapping.

use proptest::prelude::*;
use stage_core::*;

fn table() -> SectionTable {
    default_sections().expect("stock table is valid")
}

#[test]
fn scenario_a_start_of_page_is_first_section_at_rest() {
    let s = map(0.0, &table());
    assert_eq!(s.current_index, 0);
    assert_eq!(s.local_progress, 0.0);
    assert!(!s.is_transitioning);
    assert_eq!(s.blend_partner, None);
}

#[test]
fn scenario_b_midpoint_resolves_to_band_starting_there() {
    // Bands are [i/8, (i+1)/8); 0.5 is the start of index 4 ("process").
    let t = table();
    let s = map(0.5, &t);
    assert_eq!(s.current_index, 4);
    assert_eq!(&*t.get(4).unwrap().id, "process");
    assert!(s.local_progress.abs() < 1e-6);
    // 0.5 sits in the middle of the 2% band shared with section 3.
    assert!(s.is_transitioning);
    assert_eq!(s.blend_partner, Some(3));
    assert!((s.transition_progress - 0.5).abs() < 1e-4);

    let inside = map(0.5625, &t);
    assert_eq!(inside.current_index, 4);
    assert!((inside.local_progress - 0.5).abs() < 1e-4);
    assert!(!inside.is_transitioning);
}

#[test]
fn exact_boundary_resolves_to_next_section_every_time() {
    let t = table();
    for _ in 0..1000 {
        assert_eq!(map(0.125, &t).current_index, 1);
    }
    for i in 1..8 {
        let b = i as f32 / 8.0;
        assert_eq!(map(b, &t).current_index, i, "boundary {b}");
    }
}

#[test]
fn end_of_page_is_last_section_fully_progressed() {
    let s = map(1.0, &table());
    assert_eq!(s.current_index, 7);
    assert_eq!(s.local_progress, 1.0);
    assert!(!s.is_transitioning, "the outer edge never blends");
}

#[test]
fn total_coverage_at_fine_resolution() {
    let t = table();
    let mut seen = [0usize; 8];
    for i in 0..=10_000 {
        let p = i as f32 / 10_000.0;
        let s = map(p, &t);
        let band = t.get(s.current_index).expect("index in table");
        assert!(
            band.start <= p && (p < band.end || (s.current_index == 7 && p <= 1.0)),
            "progress {p} mapped to band {}..{}",
            band.start,
            band.end
        );
        seen[s.current_index] += 1;
    }
    assert!(seen.iter().all(|&n| n > 0), "every section reachable: {seen:?}");
}

#[test]
fn bands_tile_unit_interval_without_gap_or_overlap() {
    let t = table();
    let sections = t.sections();
    assert_eq!(sections.first().unwrap().start, 0.0);
    assert_eq!(sections.last().unwrap().end, 1.0);
    for pair in sections.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
    }
}

#[test]
fn transition_progress_is_continuous_across_boundary() {
    let t = table();
    let b = 0.25_f32;
    let before = map(b - 1e-4, &t);
    let after = map(b, &t);
    assert_eq!(before.current_index, 1);
    assert_eq!(after.current_index, 2);
    assert!(before.is_transitioning && after.is_transitioning);
    assert!((after.transition_progress - before.transition_progress).abs() < 0.02);
}

#[test]
fn transition_band_has_configured_width() {
    let t = table().with_boundary_width(0.04).unwrap();
    assert!(!map(0.125 - 0.021, &t).is_transitioning);
    assert!(map(0.125 - 0.019, &t).is_transitioning);
    assert!(map(0.125 + 0.019, &t).is_transitioning);
    assert!(!map(0.125 + 0.021, &t).is_transitioning);

    let none = table().with_boundary_width(0.0).unwrap();
    assert!(!map(0.125, &none).is_transitioning);
}

#[test]
fn rejects_gaps_overlaps_and_bad_ranges() {
    let gap = SectionTable::new(vec![
        SectionDescriptor::new("a", 0.0, 0.4),
        SectionDescriptor::new("b", 0.5, 1.0),
    ]);
    assert!(matches!(gap, Err(ConfigError::Gap { .. })), "{gap:?}");

    let overlap = SectionTable::new(vec![
        SectionDescriptor::new("a", 0.0, 0.6),
        SectionDescriptor::new("b", 0.5, 1.0),
    ]);
    assert!(matches!(overlap, Err(ConfigError::Overlap { .. })), "{overlap:?}");

    let short = SectionTable::new(vec![SectionDescriptor::new("a", 0.0, 0.9)]);
    assert!(matches!(short, Err(ConfigError::NotSpanning { .. })));

    let empty = SectionTable::new(Vec::new());
    assert_eq!(empty, Err(ConfigError::EmptyTable));

    let inverted = SectionTable::new(vec![
        SectionDescriptor::new("a", 0.0, 0.5),
        SectionDescriptor::new("b", 0.5, 0.5),
        SectionDescriptor::new("c", 0.5, 1.0),
    ]);
    assert!(matches!(inverted, Err(ConfigError::EmptyBand { .. })));

    let dup = SectionTable::even(&["a", "b", "a"]);
    assert_eq!(dup, Err(ConfigError::DuplicateSection("a".into())));

    let wide = table().with_boundary_width(0.2);
    assert!(matches!(wide, Err(ConfigError::BoundaryWidth { .. })));
}

#[test]
fn uneven_tables_are_accepted() {
    let t = SectionTable::new(vec![
        SectionDescriptor::new("intro", 0.0, 0.1),
        SectionDescriptor::new("body", 0.1, 0.9),
        SectionDescriptor::new("outro", 0.9, 1.0),
    ])
    .unwrap();
    assert_eq!(map(0.5, &t).current_index, 1);
    assert_eq!(map(0.9, &t).current_index, 2);
    assert_eq!(t.index_of("outro"), Some(2));
}

#[test]
fn offset_for_lands_on_requested_section() {
    let t = table();
    let signal = ScrollSignal::new(0.0, 8800.0, 800.0);
    for i in 0..t.len() {
        let offset = t.offset_for(i, &signal).unwrap();
        let landed = map(sample(&ScrollSignal::new(offset, 8800.0, 800.0)), &t);
        assert_eq!(landed.current_index, i);
    }
    assert_eq!(
        t.offset_for(8, &signal),
        Err(NavigationError::OutOfRange { index: 8, count: 8 })
    );
}

#[test]
fn offset_for_survives_integer_scroll_positions() {
    // Browsers report scrollTop as whole pixels; ranges that are not a
    // multiple of the section count must still land on the requested band.
    let t = table();
    for range in (500..6000).step_by(37) {
        let container = 800.0 + range as f32;
        let signal = ScrollSignal::new(0.0, container, 800.0);
        for i in 0..t.len() {
            let offset = t.offset_for(i, &signal).unwrap();
            assert_eq!(offset, offset.floor(), "range {range} section {i}");
            let read_back = ScrollSignal::new(offset.floor(), container, 800.0);
            assert_eq!(
                map(sample(&read_back), &t).current_index,
                i,
                "range {range} section {i} offset {offset}"
            );
        }
    }
    let signal = ScrollSignal::new(0.0, 3577.0, 800.0);
    assert_eq!(t.offset_for(1, &signal).unwrap(), 348.0);
}

proptest! {
    #[test]
    fn every_progress_maps_inside_its_band(p in 0.0f32..=1.0) {
        let t = table();
        let s = map(p, &t);
        let band = t.get(s.current_index).unwrap();
        prop_assert!(band.start <= p);
        prop_assert!(p < band.end || s.current_index == t.len() - 1);
        prop_assert!((0.0..=1.0).contains(&s.local_progress));
        prop_assert!((0.0..=1.0).contains(&s.transition_progress));
    }

    #[test]
    fn mapping_is_deterministic(p in 0.0f32..=1.0) {
        let t = table();
        prop_assert_eq!(map(p, &t), map(p, &t));
    }
}
