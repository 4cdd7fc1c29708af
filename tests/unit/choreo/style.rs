use super::*;

type StyleFn = fn(ScenePhase, f64) -> StyleRecord;

const ELEMENTS: [(StyleFn, ScenePhase); 3] = [
    (hero_style, ScenePhase::HeroIntro),
    (planet_style, ScenePhase::PlanetReveal),
    (headline_style, ScenePhase::TextReveal),
];

#[test]
fn hidden_before_entering_and_at_rest_afterwards() {
    for (f, enters) in ELEMENTS {
        assert_eq!(f(ScenePhase::Initial, 1.0).opacity, 0.0, "{enters:?}");
        assert_eq!(f(ScenePhase::Interactive, 0.0), StyleRecord::REST, "{enters:?}");
        assert_eq!(f(enters, 1.0), StyleRecord::REST, "{enters:?}");
    }
}

#[test]
fn entering_element_progresses_monotonically() {
    for (f, enters) in ELEMENTS {
        let mut last = -1.0;
        for i in 0..=20 {
            let s = f(enters, f64::from(i) / 20.0);
            assert!(s.opacity >= last, "{enters:?} at {i}");
            assert!(s.blur_px >= 0.0);
            last = s.opacity;
        }
    }
}

#[test]
fn planet_is_opaque_before_its_transition_ends() {
    let s = planet_style(ScenePhase::PlanetReveal, 0.6);
    assert_eq!(s.opacity, 1.0);
    assert!(s.scale < 1.0);
}

#[test]
fn garbage_progress_lands_on_the_rest_pose() {
    assert_eq!(
        hero_style(ScenePhase::HeroIntro, f64::NAN),
        StyleRecord::REST
    );
    assert_eq!(
        headline_style(ScenePhase::TextReveal, 7.0),
        StyleRecord::REST
    );
}
