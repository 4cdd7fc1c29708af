use std::cell::RefCell;

use super::*;

fn anchor(id: u32, x: f64) -> TrailAnchor {
    TrailAnchor {
        id,
        bounds: Rect::new(x, 0.0, x + 100.0, 50.0),
        color: Rgba8::rgb(120, 200, 255),
    }
}

fn recorder(bus: &Rc<EventBus>) -> Rc<RefCell<Vec<(u32, bool)>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    bus.subscribe(THOUGHT_TRAIL_HOVER, move |e: &TrailHover| {
        sink.borrow_mut().push((e.id, e.active));
    });
    seen
}

fn active(bus: &Rc<EventBus>) -> ThoughtTrails {
    let mut trails = ThoughtTrails::new(Rc::clone(bus), vec![anchor(1, 0.0), anchor(2, 200.0)]);
    assert!(trails.init());
    assert!(trails.activate());
    trails
}

#[test]
fn enter_and_leave_are_published_once_per_change() {
    let bus = Rc::new(EventBus::new());
    let seen = recorder(&bus);
    let mut trails = active(&bus);

    assert_eq!(trails.pointer_move(Point::new(10.0, 10.0)), Some(1));
    assert_eq!(trails.pointer_move(Point::new(20.0, 10.0)), Some(1));
    assert_eq!(trails.pointer_move(Point::new(210.0, 10.0)), Some(2));
    assert_eq!(trails.pointer_move(Point::new(150.0, 10.0)), None);

    assert_eq!(
        *seen.borrow(),
        vec![(1, true), (1, false), (2, true), (2, false)]
    );
}

#[test]
fn inactive_controller_ignores_the_pointer() {
    let bus = Rc::new(EventBus::new());
    let seen = recorder(&bus);
    let mut trails = ThoughtTrails::new(Rc::clone(&bus), vec![anchor(1, 0.0)]);
    assert_eq!(trails.pointer_move(Point::new(10.0, 10.0)), None);
    assert!(!trails.activate());
    assert!(seen.borrow().is_empty());
}

#[test]
fn deactivate_releases_the_hovered_anchor() {
    let bus = Rc::new(EventBus::new());
    let seen = recorder(&bus);
    let mut trails = active(&bus);
    trails.pointer_move(Point::new(10.0, 10.0));
    assert!(trails.deactivate());
    assert_eq!(trails.hovered(), None);
    assert_eq!(seen.borrow().last(), Some(&(1, false)));

    assert!(trails.activate());
    assert_eq!(trails.pointer_move(Point::new(10.0, 10.0)), Some(1));
}

#[test]
fn removing_the_hovered_anchor_leaves_it() {
    let bus = Rc::new(EventBus::new());
    let seen = recorder(&bus);
    let mut trails = active(&bus);
    trails.pointer_move(Point::new(210.0, 10.0));
    trails.set_anchors(vec![anchor(1, 0.0)]);
    assert_eq!(trails.hovered(), None);
    assert_eq!(seen.borrow().last(), Some(&(2, false)));
}

#[test]
fn destroy_is_final() {
    let bus = Rc::new(EventBus::new());
    let mut trails = active(&bus);
    assert!(trails.destroy());
    assert_eq!(trails.state(), LifecycleState::Destroyed);
    assert!(!trails.destroy());
    assert!(!trails.init());
    assert!(!trails.activate());
    assert_eq!(trails.pointer_move(Point::new(10.0, 10.0)), None);
}

#[test]
fn lifecycle_transitions_follow_the_table() {
    use LifecycleOp::*;
    use LifecycleState::*;
    assert_eq!(Uninitialized.apply(Init), Some(Ready));
    assert_eq!(Uninitialized.apply(Activate), None);
    assert_eq!(Ready.apply(Init), None);
    assert_eq!(Ready.apply(Activate), Some(Active));
    assert_eq!(Active.apply(Activate), None);
    assert_eq!(Active.apply(Deactivate), Some(Inactive));
    assert_eq!(Inactive.apply(Deactivate), None);
    assert_eq!(Inactive.apply(Activate), Some(Active));
    assert_eq!(Uninitialized.apply(Destroy), Some(Destroyed));
    assert_eq!(Destroyed.apply(Destroy), None);
}
