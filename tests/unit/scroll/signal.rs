use std::{cell::RefCell, rc::Rc};

use super::*;

#[test]
fn listeners_receive_changes_in_order() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut sig = ProgressSignal::default();

    let a = Rc::clone(&seen);
    sig.subscribe(move |p| a.borrow_mut().push(("a", p.get())));
    let b = Rc::clone(&seen);
    sig.subscribe(move |p| b.borrow_mut().push(("b", p.get())));

    assert!(sig.set(Progress::new(0.25)));
    assert_eq!(*seen.borrow(), vec![("a", 0.25), ("b", 0.25)]);
    assert_eq!(sig.get(), Progress::new(0.25));
}

#[test]
fn unchanged_value_is_not_republished() {
    let count = Rc::new(RefCell::new(0));
    let mut sig = ProgressSignal::new(Progress::new(0.5));
    let c = Rc::clone(&count);
    sig.subscribe(move |_| *c.borrow_mut() += 1);

    assert!(!sig.set(Progress::new(0.5)));
    assert!(sig.set(Progress::new(0.6)));
    assert!(!sig.set(Progress::new(0.6)));
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn unsubscribed_listener_is_silent() {
    let count = Rc::new(RefCell::new(0));
    let mut sig = ProgressSignal::default();
    let c = Rc::clone(&count);
    let id = sig.subscribe(move |_| *c.borrow_mut() += 1);

    sig.set(Progress::new(0.1));
    assert!(sig.unsubscribe(id));
    assert!(!sig.unsubscribe(id));
    sig.set(Progress::new(0.2));

    assert_eq!(*count.borrow(), 1);
    assert_eq!(sig.listener_count(), 0);
}
