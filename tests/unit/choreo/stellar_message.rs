use super::*;
use crate::schedule::ManualScheduler;

fn active(sched: &Rc<ManualScheduler>, bus: Option<Rc<EventBus>>) -> StellarMessage {
    let mut msg = StellarMessage::new(sched.clone(), bus);
    assert!(msg.init());
    assert!(msg.activate());
    msg
}

#[test]
fn walks_reveal_hold_fade_done() {
    let sched = Rc::new(ManualScheduler::new());
    let bus = Rc::new(EventBus::new());
    let states = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&states);
    bus.subscribe(STELLAR_MESSAGE_STATE, move |e: &MessageStateChange| {
        sink.borrow_mut().push(e.state);
    });

    let msg = active(&sched, Some(Rc::clone(&bus)));
    assert!(msg.show("hello"));
    assert_eq!(msg.message_state(), MessageState::Revealing);

    // 5 chars * 45 ms.
    sched.advance(224.0);
    assert_eq!(msg.message_state(), MessageState::Revealing);
    sched.advance(1.0);
    assert_eq!(msg.message_state(), MessageState::Holding);
    sched.advance(2500.0);
    assert_eq!(msg.message_state(), MessageState::Fading);
    sched.advance(800.0);
    assert_eq!(msg.message_state(), MessageState::Done);
    assert_eq!(sched.pending_timers(), 0);

    assert_eq!(
        *states.borrow(),
        vec![
            MessageState::Revealing,
            MessageState::Holding,
            MessageState::Fading,
            MessageState::Done
        ]
    );
}

#[test]
fn typewriter_and_fade_sampling() {
    let sched = Rc::new(ManualScheduler::new());
    let msg = active(&sched, None);
    assert_eq!(msg.visible_text(0.0), "");
    msg.show("stars");
    assert_eq!(msg.visible_text(0.0), "");
    assert_eq!(msg.visible_text(100.0), "st");
    assert_eq!(msg.visible_text(10_000.0), "stars");
    assert_eq!(msg.opacity(100.0), 1.0);

    sched.advance(225.0 + 2500.0);
    assert_eq!(msg.message_state(), MessageState::Fading);
    let start = sched.now_ms();
    assert!((msg.opacity(start + 400.0) - 0.5).abs() < 1e-9);
    assert_eq!(msg.opacity(start + 5_000.0), 0.0);
}

#[test]
fn showing_again_restarts_with_one_timer() {
    let sched = Rc::new(ManualScheduler::new());
    let msg = active(&sched, None);
    msg.show("first message");
    sched.advance(100.0);
    msg.show("second");
    assert_eq!(sched.pending_timers(), 1);
    assert_eq!(msg.message(), "second");
    assert_eq!(msg.visible_text(sched.now_ms()), "");
}

#[test]
fn inactive_message_refuses_to_show() {
    let sched = Rc::new(ManualScheduler::new());
    let msg = StellarMessage::new(sched.clone(), None);
    assert!(!msg.show("nope"));
    assert_eq!(sched.pending_timers(), 0);
}

#[test]
fn deactivate_and_destroy_leave_no_timers() {
    let sched = Rc::new(ManualScheduler::new());
    let mut msg = active(&sched, None);
    msg.show("orbit");
    assert!(msg.deactivate());
    assert_eq!(sched.pending_timers(), 0);
    assert_eq!(msg.message_state(), MessageState::Hidden);

    assert!(msg.activate());
    msg.show("orbit");
    assert!(msg.destroy());
    assert_eq!(sched.pending_timers(), 0);
    assert!(!msg.show("again"));
    assert!(!msg.activate());
}

#[test]
fn drop_cancels_the_pending_timer() {
    let sched = Rc::new(ManualScheduler::new());
    {
        let msg = active(&sched, None);
        msg.show("bye");
        assert_eq!(sched.pending_timers(), 1);
    }
    assert_eq!(sched.pending_timers(), 0);
    sched.advance(10_000.0);
}

#[test]
fn reveal_duration_scales_with_characters() {
    let timing = MessageTiming::default();
    assert_eq!(timing.reveal_ms("abcd"), 180);
    assert_eq!(timing.reveal_ms(""), 0);
    assert_eq!(timing.reveal_ms("é✓"), 90);
}
