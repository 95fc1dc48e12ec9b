//! Integration tests for `IdList`

use std::rc::Rc;

use watchtable_containers::IdList;
use watchtable_foundation::UpdateKind;

use crate::{Calls, recorder};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Item {
    id: u32,
    val: &'static str,
}

fn item(id: u32, val: &'static str) -> Item {
    Item { id, val }
}

fn items() -> IdList<u32, Item> {
    IdList::new(|v: &Item| v.id)
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn add_observe_set_scenario() {
    let list = items();
    list.add(item(1, "a")).unwrap();
    assert_eq!(list.count().unwrap(), 1);
    assert_eq!(list.get(&1).unwrap(), item(1, "a"));

    let calls: Calls<u32, Item> = Rc::default();
    list.observe(1, UpdateKind::Updated, &recorder(&calls));
    list.set(item(1, "b")).unwrap();

    assert_eq!(*calls.borrow(), vec![(Some(1), item(1, "b"))]);
    assert_eq!(list.get(&1).unwrap(), item(1, "b"));
    assert_eq!(list.count().unwrap(), 1);
}

#[test]
fn set_on_absent_key_behaves_like_add() {
    let list = items();
    let added: Calls<u32, Item> = Rc::default();
    let updated: Calls<u32, Item> = Rc::default();
    list.observe_any(UpdateKind::Added, &recorder(&added));
    list.observe_any(UpdateKind::Updated, &recorder(&updated));

    list.set(item(4, "new")).unwrap();

    assert_eq!(list.count().unwrap(), 1);
    assert_eq!(list.try_get(&4).unwrap(), Some(item(4, "new")));
    assert_eq!(added.borrow().len(), 1);
    assert!(updated.borrow().is_empty());
}

#[test]
fn duplicate_add_changes_nothing() {
    let list = items();
    list.add(item(1, "a")).unwrap();
    let calls: Calls<u32, Item> = Rc::default();
    for kind in UpdateKind::ALL {
        list.observe_any(kind, &recorder(&calls));
    }

    let err = list.add(item(1, "z")).unwrap_err();

    assert!(err.is_duplicate_key());
    assert_eq!(list.get(&1).unwrap(), item(1, "a"));
    assert!(calls.borrow().is_empty());
}

#[test]
fn removing_twice() {
    let list = items();
    list.add(item(2, "b")).unwrap();
    let calls: Calls<u32, Item> = Rc::default();
    list.observe(2, UpdateKind::Removed, &recorder(&calls));

    assert_eq!(list.remove(&2).unwrap(), item(2, "b"));
    assert!(list.remove(&2).unwrap_err().is_key_not_found());
    assert_eq!(list.try_remove(&2).unwrap(), None);

    assert_eq!(calls.borrow().len(), 1);
}

// =============================================================================
// Listener Isolation
// =============================================================================

#[test]
fn keyed_listener_sees_only_its_key_and_kind() {
    let list = items();
    let calls: Calls<u32, Item> = Rc::default();
    list.observe(1, UpdateKind::Added, &recorder(&calls));

    list.add(item(2, "other")).unwrap();
    list.add(item(1, "mine")).unwrap();
    list.set(item(1, "changed")).unwrap();
    list.remove(&1).unwrap();

    assert_eq!(*calls.borrow(), vec![(Some(1), item(1, "mine"))]);
}

#[test]
fn observe_and_fire_now_then_future_updates() {
    let list = items();
    list.add(item(7, "seven")).unwrap();
    let calls: Calls<u32, Item> = Rc::default();

    list.observe_and_fire_now(7, UpdateKind::Updated, &recorder(&calls))
        .unwrap();
    assert_eq!(calls.borrow().len(), 1);

    list.set(item(7, "SEVEN")).unwrap();
    assert_eq!(
        *calls.borrow(),
        vec![(Some(7), item(7, "seven")), (Some(7), item(7, "SEVEN"))]
    );
}

#[test]
fn observe_and_fire_now_on_absent_key_registers_nothing() {
    let list = items();
    let calls: Calls<u32, Item> = Rc::default();

    let err = list
        .observe_and_fire_now(3, UpdateKind::Updated, &recorder(&calls))
        .unwrap_err();

    assert!(err.is_key_not_found());
    assert_eq!(list.listener_count(), 0);
}

#[test]
fn stop_observing_key_drops_every_kind() {
    let list = items();
    let calls: Calls<u32, Item> = Rc::default();
    for kind in UpdateKind::ALL {
        list.observe(5, kind, &recorder(&calls));
    }

    assert_eq!(list.stop_observing_key(&5), 3);
    list.add(item(5, "five")).unwrap();
    assert!(calls.borrow().is_empty());
}

#[test]
fn keys_preserve_insertion_order() {
    let list = IdList::<u32, Item>::from_values(
        |v| v.id,
        [item(3, "c"), item(1, "a"), item(2, "b")],
    )
    .unwrap();

    list.remove(&1).unwrap();
    list.add(item(1, "again")).unwrap();

    assert_eq!(list.keys().unwrap(), vec![3, 2, 1]);
}
