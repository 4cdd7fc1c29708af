use std::{cell::RefCell, rc::Rc};

use super::*;
use crate::render::{DrawCommand, RecordingLog, RecordingSurface};

fn seeded(vp: Viewport, style: &LayerStyle) -> StarfieldLayer {
    let mut layer = StarfieldLayer::new();
    layer.reseed(&vp, style, &mut Rng64::new(42));
    layer
}

#[test]
fn full_hd_gets_345_stars() {
    let layer = seeded(Viewport::new(1920.0, 1080.0, 1.0), &LayerStyle::default());
    assert_eq!(layer.entity_count(), 345);
}

#[test]
fn same_seed_same_frame() {
    let style = LayerStyle::default();
    let vp = Viewport::new(800.0, 600.0, 1.0);
    let mut a = seeded(vp, &style);
    let mut b = seeded(vp, &style);
    let t = FrameTime {
        elapsed_ms: 1234.0,
        delta_ms: 16.0,
    };
    a.update(t, &style).unwrap();
    b.update(t, &style).unwrap();
    let pa: Vec<_> = a.frame.iter().map(|s| (s.center, s.opacity)).collect();
    let pb: Vec<_> = b.frame.iter().map(|s| (s.center, s.opacity)).collect();
    assert_eq!(pa, pb);
}

#[test]
fn stars_stay_inside_the_viewport_while_drifting() {
    let style = LayerStyle::default();
    let vp = Viewport::new(300.0, 200.0, 1.0);
    let mut layer = seeded(vp, &style);
    for ms in [0.0, 5_000.0, 60_000.0, 3_600_000.0] {
        layer
            .update(
                FrameTime {
                    elapsed_ms: ms,
                    delta_ms: 16.0,
                },
                &style,
            )
            .unwrap();
        for s in &layer.frame {
            assert!((0.0..200.0).contains(&s.center.y), "{ms}: {:?}", s.center);
            assert!((0.0..=1.0).contains(&s.opacity));
        }
    }
}

#[test]
fn reduced_motion_freezes_positions() {
    let style = LayerStyle {
        reduced_motion: true,
        ..LayerStyle::default()
    };
    let mut layer = seeded(Viewport::new(400.0, 400.0, 1.0), &style);
    layer.update(FrameTime::ZERO, &style).unwrap();
    let first: Vec<_> = layer.frame.iter().map(|s| s.center).collect();
    layer
        .update(
            FrameTime {
                elapsed_ms: 9_000.0,
                delta_ms: 16.0,
            },
            &style,
        )
        .unwrap();
    let later: Vec<_> = layer.frame.iter().map(|s| s.center).collect();
    assert_eq!(first, later);
}

#[test]
fn draw_emits_one_circle_per_star() {
    let style = LayerStyle::default();
    let mut layer = seeded(Viewport::new(600.0, 400.0, 1.0), &style);
    layer.update(FrameTime::ZERO, &style).unwrap();
    let log = Rc::new(RefCell::new(RecordingLog::default()));
    let mut surface = RecordingSurface::new(600, 400, Rc::clone(&log));
    layer.draw(&mut surface, &style).unwrap();
    let circles = log
        .borrow()
        .current
        .iter()
        .filter(|c| matches!(c, DrawCommand::Circle { .. }))
        .count();
    assert_eq!(circles, layer.entity_count());
}
