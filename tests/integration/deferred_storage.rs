//! Containers whose store is owned elsewhere and installed late.

use std::cell::RefCell;
use std::rc::Rc;

use watchtable::containers::{IdList, ObservableDictionary, ObservableField, ObservableList};
use watchtable::foundation::{ErrorKind, Listener, StorageBinding, StoreSlot, UpdateKind};

use crate::init_tracing;

#[derive(Debug, Clone, PartialEq)]
struct Quest {
    id: &'static str,
    done: bool,
}

// =============================================================================
// Late Installation
// =============================================================================

#[test]
fn container_built_before_its_store_exists() {
    init_tracing();
    let slot: StoreSlot<Vec<Quest>> = StoreSlot::empty();
    let quests = IdList::bound(|q: &Quest| q.id, slot.binding());

    let err = quests.count().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::StorageUnresolved(_)));

    slot.install(vec![Quest {
        id: "intro",
        done: false,
    }]);
    assert_eq!(quests.count().unwrap(), 1);
    assert!(!quests.get(&"intro").unwrap().done);
}

#[test]
fn listeners_survive_store_replacement() {
    init_tracing();
    let slot = StoreSlot::filled(Vec::<Quest>::new());
    let quests = IdList::bound(|q: &Quest| q.id, slot.binding());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let listener: Listener<&'static str, Quest> = Listener::infallible(move |key, _| {
        sink.borrow_mut().push(key.copied());
    });
    quests.observe_any(UpdateKind::Added, &listener);

    quests
        .add(Quest {
            id: "old",
            done: true,
        })
        .unwrap();
    let previous = slot.install(Vec::new()).unwrap();
    quests
        .add(Quest {
            id: "new",
            done: false,
        })
        .unwrap();

    assert_eq!(previous.borrow().len(), 1);
    assert_eq!(quests.keys().unwrap(), vec!["new"]);
    assert_eq!(*seen.borrow(), vec![Some("old"), Some("new")]);
}

#[test]
fn taking_the_store_makes_access_fail_again() {
    let slot = StoreSlot::filled(vec![1, 2]);
    let list: ObservableList<i32> = ObservableList::bound(slot.binding());
    assert_eq!(list.count().unwrap(), 2);

    slot.take();
    assert!(list.get(0).is_err());
    assert!(list.add(3).is_err());
}

// =============================================================================
// Shared Stores
// =============================================================================

#[test]
fn two_containers_over_one_store_see_each_others_writes() {
    let store = Rc::new(RefCell::new(std::collections::HashMap::new()));
    let left: ObservableDictionary<&str, u32> =
        ObservableDictionary::bound(StorageBinding::shared(Rc::clone(&store)));
    let right: ObservableDictionary<&str, u32> =
        ObservableDictionary::bound(StorageBinding::shared(Rc::clone(&store)));

    left.add("shared", 1).unwrap();
    assert_eq!(right.get(&"shared").unwrap(), 1);
    assert!(right.add("shared", 2).unwrap_err().is_duplicate_key());
}

#[test]
fn field_bound_to_a_slot() {
    let slot = StoreSlot::empty();
    let volume = ObservableField::bound(slot.binding());
    assert!(volume.get().is_err());

    slot.install(0.5f32);
    volume.set(0.75).unwrap();
    assert!((volume.get().unwrap() - 0.75).abs() < f32::EPSILON);
}
