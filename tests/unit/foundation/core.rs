use super::*;

#[test]
fn surface_dims_follow_pixel_ratio() {
    let vp = Viewport::new(800.0, 600.0, 1.5);
    assert_eq!(vp.surface_dims(), (1200, 900));

    let clamped = Viewport::new(800.0, 600.0, 3.0);
    assert_eq!(clamped.surface_dims(), (1600, 1200));

    let bogus = Viewport::new(800.0, 600.0, f64::NAN);
    assert_eq!(bogus.surface_dims(), (800, 600));
}

#[test]
fn degenerate_viewport_is_rejected_but_still_sized() {
    let vp = Viewport::new(0.0, 600.0, 1.0);
    assert!(vp.validate().is_err());
    assert_eq!(vp.surface_dims(), (1, 600));
    assert_eq!(vp.area(), 0.0);
}

#[test]
fn viewport_json_uses_camel_case_and_defaults_ratio() {
    let vp: Viewport = serde_json::from_str(r#"{"width": 10, "height": 20}"#).unwrap();
    assert_eq!(vp.device_pixel_ratio, 1.0);
    let s = serde_json::to_string(&vp).unwrap();
    assert!(s.contains("devicePixelRatio"));
}

#[test]
fn opacity_scales_alpha() {
    let c = Rgba8::rgb(10, 20, 30).with_opacity(0.5);
    assert_eq!(c.a, 128);
    assert_eq!(Rgba8::WHITE.with_opacity(f64::NAN).a, 0);
    assert_eq!(Rgba8::rgba(255, 0, 0, 0).to_premul(), [0, 0, 0, 0]);
}

#[test]
fn rng_is_deterministic_and_bounded() {
    let mut a = Rng64::new(123);
    let mut b = Rng64::new(123);
    for _ in 0..32 {
        let v = a.next_f64();
        assert_eq!(v, b.next_f64());
        assert!((0.0..1.0).contains(&v));
    }
    let r = a.range(5.0, 6.0);
    assert!((5.0..6.0).contains(&r));
}
