//! Listeners that call back into the container that notified them.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use watchtable::containers::{IdList, ObservableDictionary, ObservableField};
use watchtable::foundation::{Error, ErrorKind, Listener, UpdateKind};

use crate::init_tracing;

// =============================================================================
// Reads and Writes from Listeners
// =============================================================================

#[test]
fn listener_reads_the_post_mutation_state() {
    init_tracing();
    let dict: ObservableDictionary<&str, i32> = ObservableDictionary::new();
    let observed = Rc::new(Cell::new(0));
    let handle = dict.clone();
    let out = Rc::clone(&observed);
    dict.observe_any(
        UpdateKind::Added,
        &Listener::new(move |_, _| {
            out.set(handle.count()?);
            Ok(())
        }),
    );

    dict.add("a", 1).unwrap();
    dict.add("b", 2).unwrap();

    assert_eq!(observed.get(), 2);
}

#[test]
fn listener_mutates_the_container_that_notified_it() {
    init_tracing();
    let log: IdList<u32, u32> = IdList::new(|v| *v);
    let handle = log.clone();
    log.observe(
        1,
        UpdateKind::Added,
        &Listener::new(move |_, _| handle.add(2)),
    );

    log.add(1).unwrap();

    assert_eq!(log.keys().unwrap(), vec![1, 2]);
}

#[test]
fn listener_unregisters_itself_during_dispatch() {
    let field = ObservableField::new(0u8);
    let calls = Rc::new(Cell::new(0));
    let slot: Rc<RefCell<Option<Listener<(), u8>>>> = Rc::default();

    let handle = field.clone();
    let counter = Rc::clone(&calls);
    let me = Rc::clone(&slot);
    let listener = Listener::infallible(move |_, _| {
        counter.set(counter.get() + 1);
        if let Some(this) = me.borrow().as_ref() {
            handle.stop_observing(UpdateKind::Updated, this);
        }
    });
    *slot.borrow_mut() = Some(listener.clone());
    field.observe(UpdateKind::Updated, &listener).unwrap();

    field.set(1).unwrap();
    field.set(2).unwrap();

    assert_eq!(calls.get(), 1);
    assert_eq!(field.listener_count(), 0);
    slot.borrow_mut().take();
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn listener_error_propagates_but_mutation_stands() {
    let dict: ObservableDictionary<&str, i32> = ObservableDictionary::new();
    dict.observe_any(
        UpdateKind::Updated,
        &Listener::new(|_, value: &i32| {
            if *value < 0 {
                Err(Error::listener("negative"))
            } else {
                Ok(())
            }
        }),
    );
    dict.set("hp", 10).unwrap();

    let err = dict.set("hp", -1).unwrap_err();

    assert!(matches!(err.kind, ErrorKind::Listener(_)));
    assert_eq!(dict.get(&"hp").unwrap(), -1);
}

#[test]
fn outside_borrow_of_store_is_an_error_not_a_panic() {
    let store = Rc::new(RefCell::new(vec![1u8]));
    let list: watchtable::containers::ObservableList<u8> =
        watchtable::containers::ObservableList::bound(
            watchtable::foundation::StorageBinding::shared(Rc::clone(&store)),
        );

    let guard = store.borrow_mut();
    let err = list.count().unwrap_err();
    drop(guard);

    assert!(matches!(err.kind, ErrorKind::Internal(_)));
    assert_eq!(list.count().unwrap(), 1);
}
