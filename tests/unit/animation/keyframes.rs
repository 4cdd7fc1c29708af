use super::*;

fn fade_in() -> Keyframes {
    Keyframes::new(vec![
        Keyframe::new(0.2, 0.0, Ease::Linear),
        Keyframe::new(0.6, 1.0, Ease::Linear),
    ])
    .unwrap()
}

#[test]
fn holds_outside_the_keyed_range() {
    let kf = fade_in();
    assert_eq!(kf.sample(0.0), 0.0);
    assert_eq!(kf.sample(1.0), 1.0);
    assert_eq!(kf.sample(f64::NAN), 0.0);
}

#[test]
fn interpolates_between_keys() {
    let kf = fade_in();
    assert!((kf.sample(0.4) - 0.5).abs() < 1e-9);
}

#[test]
fn segment_uses_arrival_ease() {
    let kf = Keyframes::new(vec![
        Keyframe::new(0.0, 0.0, Ease::Linear),
        Keyframe::new(1.0, 1.0, Ease::Hold),
    ])
    .unwrap();
    assert_eq!(kf.sample(0.99), 0.0);
    assert_eq!(kf.sample(1.0), 1.0);
}

#[test]
fn validation_rejects_unsorted_and_empty() {
    assert!(Keyframes::new(vec![]).is_err());
    assert!(
        Keyframes::new(vec![
            Keyframe::new(0.5, 0.0, Ease::Linear),
            Keyframe::new(0.1, 1.0, Ease::Linear),
        ])
        .is_err()
    );
    assert!(Keyframes::constant(3.0).validate().is_ok());
}
