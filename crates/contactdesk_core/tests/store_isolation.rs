use contactdesk_core::{Contact, MemoryStore, Store};

fn sample(id: &str) -> Contact {
    Contact::new(id, "Ada", "Lovelace", "1234567890", "12 Analytical Row").unwrap()
}

#[test]
fn save_stores_a_copy_not_the_callers_reference() {
    let store = MemoryStore::new();
    let mut original = sample("100");
    store.save(&original).unwrap();

    original.set_first_name("Mutated").unwrap();

    let stored = store.find_by_id("100").unwrap().unwrap();
    assert_eq!(stored.first_name(), "Ada");
}

#[test]
fn mutating_a_fetched_copy_never_changes_the_store() {
    let store = MemoryStore::new();
    store.save(&sample("100")).unwrap();

    let mut fetched = store.find_by_id("100").unwrap().unwrap();
    fetched.set_address("Elsewhere").unwrap();

    let refetched = store.find_by_id("100").unwrap().unwrap();
    assert_eq!(refetched.address(), "12 Analytical Row");
}

#[test]
fn find_all_returns_independent_copies() {
    let store = MemoryStore::new();
    store.save(&sample("100")).unwrap();
    store.save(&sample("200")).unwrap();

    let mut all = store.find_all().unwrap();
    assert_eq!(all.len(), 2);
    for contact in &mut all {
        contact.set_first_name("Changed").unwrap();
    }

    for id in ["100", "200"] {
        let stored = store.find_by_id(id).unwrap().unwrap();
        assert_eq!(stored.first_name(), "Ada");
    }
}

#[test]
fn exists_find_and_delete_agree() {
    let store = MemoryStore::new();
    assert!(!store.exists_by_id("100").unwrap());
    assert!(store.find_by_id("100").unwrap().is_none());

    store.save(&sample("100")).unwrap();
    assert!(store.exists_by_id("100").unwrap());

    assert!(store.delete_by_id("100").unwrap());
    assert!(!store.exists_by_id("100").unwrap());
    assert!(!store.delete_by_id("100").unwrap());
}

#[test]
fn delete_all_clears_every_entry() {
    let store = MemoryStore::new();
    store.save(&sample("100")).unwrap();
    store.save(&sample("200")).unwrap();

    store.delete_all().unwrap();
    assert!(store.find_all().unwrap().is_empty());
}
