//! Integration tests for storage bindings
//!
//! Tests direct, shared, and deferred bindings, and store slots.

use std::cell::RefCell;
use std::rc::Rc;

use watchtable_foundation::{ErrorKind, StorageBinding, StoreSlot};

#[test]
fn deferred_accessor_is_consulted_on_every_access() {
    let calls = Rc::new(RefCell::new(0));
    let calls_clone = Rc::clone(&calls);
    let store = Rc::new(RefCell::new(vec![1, 2, 3]));
    let store_clone = Rc::clone(&store);

    let binding = StorageBinding::deferred(move || {
        *calls_clone.borrow_mut() += 1;
        Some(Rc::clone(&store_clone))
    });

    binding.read(Vec::len).unwrap();
    binding.write(|v| v.push(4)).unwrap();
    binding.read(Vec::len).unwrap();

    assert_eq!(*calls.borrow(), 3);
    assert_eq!(store.borrow().len(), 4);
}

#[test]
fn unresolved_error_names_the_store_type() {
    let slot: StoreSlot<Vec<u16>> = StoreSlot::empty();
    let err = slot.binding().resolve().unwrap_err();

    match err.kind {
        ErrorKind::StorageUnresolved(name) => assert!(name.contains("u16")),
        other => panic!("unexpected error kind: {other:?}"),
    }
}

#[test]
fn slot_clones_share_contents() {
    let slot = StoreSlot::empty();
    let owner_copy = slot.clone();
    let binding = slot.binding();

    owner_copy.install(String::from("late"));
    assert!(slot.is_installed());
    assert_eq!(binding.read(String::len).unwrap(), 4);
}

#[test]
fn writes_through_a_binding_reach_the_shared_store() {
    let store = Rc::new(RefCell::new(String::new()));
    let binding = StorageBinding::shared(Rc::clone(&store));
    let copy = binding.clone();

    copy.write(|s| s.push_str("abc")).unwrap();
    assert_eq!(*store.borrow(), "abc");
}
