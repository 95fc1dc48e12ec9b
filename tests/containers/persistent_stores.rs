//! Integration tests for containers over `im` persistent stores
//!
//! The owner keeps cheap snapshots of the store while the container mutates it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use proptest::prelude::*;
use watchtable_containers::{IdList, ObservableDictionary};
use watchtable_foundation::{Listener, StorageBinding, UpdateKind};

// =============================================================================
// Snapshots
// =============================================================================

#[test]
fn snapshot_of_shared_ordmap_is_unaffected_by_later_writes() {
    let store = Rc::new(RefCell::new(im::OrdMap::<u32, &str>::new()));
    let dict: ObservableDictionary<u32, &str, im::OrdMap<u32, &str>> =
        ObservableDictionary::bound(StorageBinding::shared(Rc::clone(&store)));

    dict.add(2, "two").unwrap();
    dict.add(1, "one").unwrap();
    let snapshot = store.borrow().clone();
    dict.set(1, "uno").unwrap();
    dict.remove(&2).unwrap();

    assert_eq!(snapshot.get(&1), Some(&"one"));
    assert_eq!(snapshot.len(), 2);
    assert_eq!(dict.keys().unwrap(), vec![1]);
    assert_eq!(dict.get(&1).unwrap(), "uno");
}

#[test]
fn id_list_over_im_vector_keeps_order() {
    let list: IdList<char, (char, u8), im::Vector<(char, u8)>> =
        IdList::new(|pair: &(char, u8)| pair.0);
    for (key, value) in [('c', 3), ('a', 1), ('b', 2)] {
        list.add((key, value)).unwrap();
    }
    list.set(('a', 10)).unwrap();

    assert_eq!(list.keys().unwrap(), vec!['c', 'a', 'b']);
    assert_eq!(list.get(&'a').unwrap(), ('a', 10));
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #[test]
    fn im_hashmap_dictionary_matches_std_model(
        ops in prop::collection::vec((any::<bool>(), 0u8..8, any::<u16>()), 0..48)
    ) {
        let dict: ObservableDictionary<u8, u16, im::HashMap<u8, u16>> = ObservableDictionary::new();
        let fired = Rc::new(Cell::new(0usize));
        for kind in UpdateKind::ALL {
            let fired = Rc::clone(&fired);
            dict.observe_any(kind, &Listener::infallible(move |_, _| fired.set(fired.get() + 1)));
        }
        let mut model = std::collections::HashMap::new();
        let mut expected = 0usize;

        for (insert, key, value) in ops {
            if insert {
                dict.set(key, value).unwrap();
                model.insert(key, value);
                expected += 1;
            } else if dict.remove(&key).unwrap() {
                prop_assert!(model.remove(&key).is_some());
                expected += 1;
            } else {
                prop_assert!(!model.contains_key(&key));
            }
        }

        prop_assert_eq!(dict.count().unwrap(), model.len());
        prop_assert_eq!(fired.get(), expected);
    }
}
