//! Integration tests for `ObservableField`

use std::cell::RefCell;
use std::rc::Rc;

use watchtable_containers::ObservableField;
use watchtable_foundation::{ErrorKind, UpdateKind};

use crate::{Calls, recorder};

// =============================================================================
// Values
// =============================================================================

#[test]
fn field_set_then_get() {
    let field = ObservableField::new(String::from("idle"));
    field.set(String::from("running")).unwrap();
    assert_eq!(field.get().unwrap(), "running");
}

#[test]
fn field_over_accessors_writes_through_to_owner() {
    #[derive(Default)]
    struct Player {
        gold: u32,
    }

    let player = Rc::new(RefCell::new(Player::default()));
    let reader = Rc::clone(&player);
    let writer = Rc::clone(&player);
    let gold = ObservableField::from_accessors(
        move || Ok(reader.borrow().gold),
        move |value| {
            writer.borrow_mut().gold = value;
            Ok(())
        },
    );

    gold.update(|g| *g += 25).unwrap();
    assert_eq!(player.borrow().gold, 25);
    assert_eq!(gold.get().unwrap(), 25);
}

// =============================================================================
// Notification
// =============================================================================

#[test]
fn field_notifies_on_every_set_even_when_equal() {
    let field = ObservableField::new(3u8);
    let calls: Calls<(), u8> = Rc::default();
    field
        .observe(UpdateKind::Updated, &recorder(&calls))
        .unwrap();

    field.set(3).unwrap();
    field.set(3).unwrap();

    assert_eq!(calls.borrow().len(), 2);
}

#[test]
fn field_rejects_added_and_removed_listeners() {
    let field = ObservableField::new(0i64);
    let calls: Calls<(), i64> = Rc::default();

    for kind in [UpdateKind::Added, UpdateKind::Removed] {
        let err = field.observe(kind, &recorder(&calls)).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidUpdateKind(_)));
    }
    assert_eq!(field.listener_count(), 0);
}

#[test]
fn field_fire_now_then_future_sets() {
    let field = ObservableField::new(1u32);
    let calls: Calls<(), u32> = Rc::default();
    field
        .observe_and_fire_now(UpdateKind::Updated, &recorder(&calls))
        .unwrap();
    field.set(2).unwrap();

    let seen: Vec<u32> = calls.borrow().iter().map(|(_, v)| *v).collect();
    assert_eq!(seen, vec![1, 2]);
}

#[test]
fn field_stop_observing() {
    let field = ObservableField::new(0u32);
    let calls: Calls<(), u32> = Rc::default();
    let listener = recorder(&calls);
    field.observe(UpdateKind::Updated, &listener).unwrap();

    assert!(field.stop_observing(UpdateKind::Updated, &listener));
    field.set(9).unwrap();

    assert!(calls.borrow().is_empty());
    assert!(!field.stop_observing(UpdateKind::Updated, &listener));
}
