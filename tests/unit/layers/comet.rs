use super::*;

fn at(ms: f64) -> FrameTime {
    FrameTime {
        elapsed_ms: ms,
        delta_ms: 16.0,
    }
}

fn seeded() -> CometLayer {
    let mut layer = CometLayer::new();
    layer.reseed(
        &Viewport::new(1920.0, 1080.0, 1.0),
        &LayerStyle::default(),
        &mut Rng64::new(11),
    );
    layer
}

#[test]
fn full_hd_gets_five_comets() {
    assert_eq!(seeded().entity_count(), 5);
}

#[test]
fn position_depends_only_on_elapsed_time() {
    let style = LayerStyle::default();
    let mut stepped = seeded();
    for i in 0..200 {
        stepped.update(at(f64::from(i) * 37.0), &style).unwrap();
    }
    stepped.update(at(30_000.0), &style).unwrap();

    let mut jumped = seeded();
    jumped.update(at(30_000.0), &style).unwrap();
    assert_eq!(stepped.frame, jumped.frame);
}

#[test]
fn comets_move_between_frames() {
    let style = LayerStyle::default();
    let mut layer = seeded();
    layer.update(at(100.0), &style).unwrap();
    let a = layer.frame.clone();
    layer.update(at(116.0), &style).unwrap();
    assert_ne!(a, layer.frame);
}
