use std::{cell::RefCell, rc::Rc};

use super::channels::{HORIZONTAL_PAGE_CHANGE, PageChange};
use super::*;

const PINGS: Channel<u32> = Channel::new("pings");
const PINGS_AS_STRING: Channel<String> = Channel::new("pings");

#[test]
fn publish_reaches_every_subscriber_synchronously() {
    let bus = EventBus::new();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let s1 = Rc::clone(&seen);
    bus.subscribe(PINGS, move |v| s1.borrow_mut().push(("a", *v)))
        .unwrap();
    let s2 = Rc::clone(&seen);
    bus.subscribe(PINGS, move |v| s2.borrow_mut().push(("b", *v)))
        .unwrap();

    assert_eq!(bus.publish(PINGS, &7), 2);
    assert_eq!(seen.borrow().as_slice(), &[("a", 7), ("b", 7)]);
}

#[test]
fn late_subscribers_get_no_replay() {
    let bus = EventBus::new();
    assert_eq!(bus.publish(PINGS, &1), 0);

    let seen = Rc::new(RefCell::new(0));
    let s = Rc::clone(&seen);
    bus.subscribe(PINGS, move |_| *s.borrow_mut() += 1).unwrap();
    assert_eq!(*seen.borrow(), 0);
}

#[test]
fn double_unsubscribe_is_a_no_op() {
    let bus = EventBus::new();
    let id = bus.subscribe(PINGS, |_| {}).unwrap();
    assert!(bus.unsubscribe(id));
    assert!(!bus.unsubscribe(id));
    assert_eq!(bus.subscriber_count(PINGS), 0);
    assert_eq!(bus.publish(PINGS, &3), 0);
}

#[test]
fn mismatched_payload_type_is_refused() {
    let bus = EventBus::new();
    bus.subscribe(PINGS, |_| {}).unwrap();
    assert!(bus.subscribe(PINGS_AS_STRING, |_| {}).is_none());
    assert_eq!(bus.publish(PINGS_AS_STRING, &"x".to_string()), 0);
    assert_eq!(bus.total_subscribers(), 1);
}

#[test]
fn guard_unsubscribes_on_drop_and_cancel_is_idempotent() {
    let bus = Rc::new(EventBus::new());
    let mut guard = bus
        .subscribe_guarded(HORIZONTAL_PAGE_CHANGE, |_: &PageChange| {})
        .unwrap();
    assert_eq!(bus.subscriber_count(HORIZONTAL_PAGE_CHANGE), 1);

    guard.cancel();
    guard.cancel();
    assert_eq!(bus.subscriber_count(HORIZONTAL_PAGE_CHANGE), 0);

    {
        let _scoped = bus.subscribe_guarded(PINGS, |_| {}).unwrap();
        assert_eq!(bus.total_subscribers(), 1);
    }
    assert_eq!(bus.total_subscribers(), 0);
}

#[test]
fn handlers_may_unsubscribe_during_delivery() {
    let bus = Rc::new(EventBus::new());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let victim: Rc<RefCell<Option<SubscriptionId>>> = Rc::new(RefCell::new(None));

    let b = Rc::clone(&bus);
    let v = Rc::clone(&victim);
    let s1 = Rc::clone(&seen);
    bus.subscribe(PINGS, move |_| {
        s1.borrow_mut().push("first");
        if let Some(id) = v.borrow_mut().take() {
            b.unsubscribe(id);
        }
    })
    .unwrap();

    let s2 = Rc::clone(&seen);
    let second = bus
        .subscribe(PINGS, move |_| s2.borrow_mut().push("second"))
        .unwrap();
    *victim.borrow_mut() = Some(second);

    assert_eq!(bus.publish(PINGS, &0), 1);
    assert_eq!(seen.borrow().as_slice(), &["first"]);
}
