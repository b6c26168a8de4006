use glam::Vec3;
use stage_core::*;

fn table() -> SectionTable {
    default_sections().unwrap()
}

#[test]
fn outside_transition_returns_section_theme_verbatim() {
    let themes = default_themes();
    let table = table();
    for (i, expected) in themes.iter().enumerate() {
        let mid = (i as f32 + 0.5) / 8.0;
        let state = map(mid, &table);
        assert!(!state.is_transitioning);
        assert_eq!(&theme(&state, &themes), expected);
    }
}

#[test]
fn blend_is_continuous_across_a_boundary() {
    let themes = default_themes();
    let table = table();
    let width = table.boundary_width();
    let boundary = 0.5;
    let mut prev: Option<ThemeDescriptor> = None;
    let steps = 200;
    for i in 0..=steps {
        let p = boundary - width + 2.0 * width * i as f32 / steps as f32;
        let t = theme(&map(p, &table), &themes);
        if let Some(prev) = prev {
            let jump = (t.background - prev.background).abs().max_element();
            assert!(jump < 0.01, "jump of {jump} at progress {p}");
        }
        prev = Some(t);
    }
}

#[test]
fn dominant_palette_switches_at_midpoint() {
    let themes = default_themes();
    let a = &themes[2];
    let b = &themes[3];
    assert_eq!(&*a.blend(b, 0.49).palette_id, "aurora");
    assert_eq!(&*a.blend(b, 0.5).palette_id, "violet");
    assert_eq!(a.blend(b, 0.5).particle_pattern, ParticlePattern::Constellation);
    assert_eq!(a.blend(b, 0.0).background, a.background);
    assert_eq!(a.blend(b, 7.0).blend_weight, 1.0);
}

#[test]
fn theme_is_deterministic() {
    let themes = default_themes();
    let table = table();
    for p in [0.0, 0.124, 0.25, 0.377, 0.99, 1.0] {
        let state = map(p, &table);
        assert_eq!(theme(&state, &themes), theme(&state, &themes));
    }
}

#[test]
fn short_theme_table_falls_back_to_last_entry() {
    let themes = default_themes()[..2].to_vec();
    let state = map(0.9, &table());
    assert_eq!(&*theme(&state, &themes).palette_id, "ember");
    assert_eq!(theme(&state, &[]), ThemeDescriptor::default());
}

#[test]
fn css_hex_formats_and_clamps() {
    assert_eq!(css_hex(Vec3::new(1.0, 0.0, 0.5)), "#ff0080");
    assert_eq!(css_hex(Vec3::new(2.0, -1.0, 0.0)), "#ff0000");
}

#[test]
fn every_pattern_has_a_name() {
    let themes = default_themes();
    let mut names: Vec<_> = themes.iter().map(|t| t.particle_pattern.name()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), 8);
}
