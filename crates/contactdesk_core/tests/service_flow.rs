use chrono::{Duration, Utc};
use contactdesk_core::db::open_db_in_memory;
use contactdesk_core::{
    Appointment, AppointmentService, Contact, ContactService, MemoryStore, ServiceError,
    SqliteTaskStore, Task, TaskService,
};
use std::sync::Arc;
use std::thread;

fn memory_contact_service() -> ContactService {
    ContactService::new(Arc::new(MemoryStore::new()))
}

fn contact(id: &str, first: &str) -> Contact {
    Contact::new(id, first, "Lovelace", "1234567890", "12 Analytical Row").unwrap()
}

#[test]
fn duplicate_add_fails_and_keeps_the_first_payload() {
    let service = memory_contact_service();

    assert!(service.add_contact(&contact("100", "Ada")).unwrap());
    assert!(!service.add_contact(&contact("100", "Grace")).unwrap());

    let stored = service.get_contact_by_id("100").unwrap().unwrap();
    assert_eq!(stored.first_name(), "Ada");
}

#[test]
fn delete_trims_the_id_before_removal() {
    let service = memory_contact_service();
    service.add_contact(&contact("100", "Ada")).unwrap();

    assert!(service.delete_contact(" 100 ").unwrap());
    assert!(service.get_contact_by_id("100").unwrap().is_none());
}

#[test]
fn update_of_missing_id_returns_false_without_error() {
    let service = memory_contact_service();
    let updated = service
        .update_contact("missing-id", "Ada", "Lovelace", "1234567890", "Row")
        .unwrap();
    assert!(!updated);
}

#[test]
fn update_replaces_all_fields_and_persists_them() {
    let service = memory_contact_service();
    service.add_contact(&contact("100", "Ada")).unwrap();

    let updated = service
        .update_contact(" 100 ", "Grace", "Hopper", "0987654321", "7 Compiler Court")
        .unwrap();
    assert!(updated);

    let stored = service.get_contact_by_id("100").unwrap().unwrap();
    assert_eq!(stored.first_name(), "Grace");
    assert_eq!(stored.phone(), "0987654321");
}

#[test]
fn failed_update_is_invalid_argument_and_leaves_store_unchanged() {
    let service = memory_contact_service();
    service.add_contact(&contact("100", "Ada")).unwrap();

    let result = service.update_contact("100", "Grace", "Hopper", "bad-phone", "Row");
    assert!(matches!(result, Err(ServiceError::Domain(_))));

    let stored = service.get_contact_by_id("100").unwrap().unwrap();
    assert_eq!(stored.first_name(), "Ada");
    assert_eq!(stored.phone(), "1234567890");
}

#[test]
fn blank_ids_are_rejected_at_the_service_boundary() {
    let service = memory_contact_service();

    assert!(matches!(
        service.delete_contact("   "),
        Err(ServiceError::Domain(_))
    ));
    assert!(matches!(
        service.get_contact_by_id(""),
        Err(ServiceError::Domain(_))
    ));
    assert!(matches!(
        service.update_contact("  ", "Ada", "Lovelace", "1234567890", "Row"),
        Err(ServiceError::Domain(_))
    ));
}

#[test]
fn get_all_and_database_return_caller_owned_copies() {
    let service = memory_contact_service();
    service.add_contact(&contact("100", "Ada")).unwrap();
    service.add_contact(&contact("200", "Grace")).unwrap();

    let mut all = service.get_all_contacts().unwrap();
    assert_eq!(all.len(), 2);
    all[0].set_first_name("Changed").unwrap();

    let database = service.database().unwrap();
    assert_eq!(database.len(), 2);
    assert_eq!(database["100"].first_name(), "Ada");
    assert_eq!(database["200"].first_name(), "Grace");
}

#[test]
fn concurrent_adds_of_one_id_have_exactly_one_winner() {
    let service = Arc::new(memory_contact_service());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                let entry = contact("100", &format!("Caller{i}"));
                service.add_contact(&entry).unwrap()
            })
        })
        .collect();

    let outcomes: Vec<bool> = handles
        .into_iter()
        .map(|handle| handle.join().expect("add thread should not panic"))
        .collect();

    assert_eq!(outcomes.iter().filter(|added| **added).count(), 1);

    // The stored payload belongs to the single winner.
    let winner = outcomes.iter().position(|added| *added).unwrap();
    let stored = service.get_contact_by_id("100").unwrap().unwrap();
    assert_eq!(stored.first_name(), format!("Caller{winner}"));
}

#[test]
fn concurrent_adds_have_exactly_one_winner_on_the_durable_backend() {
    let store = SqliteTaskStore::try_new(open_db_in_memory().unwrap()).unwrap();
    let service = Arc::new(TaskService::new(Arc::new(store)));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                let task = Task::new("T-100", &format!("attempt {i}"), "race entry").unwrap();
                service.add_task(&task).unwrap()
            })
        })
        .collect();

    let wins = handles
        .into_iter()
        .map(|handle| handle.join().expect("add thread should not panic"))
        .filter(|added| *added)
        .count();

    assert_eq!(wins, 1);
    assert_eq!(service.get_all_tasks().unwrap().len(), 1);
}

#[test]
fn appointment_service_flow_over_the_transient_backend() {
    let service = AppointmentService::new(Arc::new(MemoryStore::new()));

    let date = Utc::now() + Duration::days(2);
    let appointment = Appointment::new("A-100", date, "dentist").unwrap();
    assert!(service.add_appointment(&appointment).unwrap());
    assert!(!service.add_appointment(&appointment).unwrap());

    let moved = date + Duration::hours(4);
    assert!(service
        .update_appointment(" A-100 ", moved, "moved back")
        .unwrap());

    let stored = service.get_appointment_by_id("A-100").unwrap().unwrap();
    assert_eq!(stored.appointment_date(), moved);
    assert_eq!(stored.description(), "moved back");

    assert!(service.delete_appointment("A-100").unwrap());
    assert!(service.get_all_appointments().unwrap().is_empty());
}

#[test]
fn clear_all_empties_the_store_for_harness_isolation() {
    let service = memory_contact_service();
    service.add_contact(&contact("100", "Ada")).unwrap();
    service.add_contact(&contact("200", "Grace")).unwrap();

    service.clear_all().unwrap();
    assert!(service.get_all_contacts().unwrap().is_empty());
}
