use chrono::{DateTime, Duration, Utc};
use contactdesk_core::{Aggregate, Appointment, ValidationError};

fn next_week() -> DateTime<Utc> {
    Utc::now() + Duration::days(7)
}

#[test]
fn new_accepts_future_date_and_trims_fields() {
    let date = next_week();
    let appointment = Appointment::new(" A-100 ", date, " dentist ").unwrap();

    assert_eq!(appointment.appointment_id(), "A-100");
    assert_eq!(appointment.appointment_date(), date);
    assert_eq!(appointment.description(), "dentist");
}

#[test]
fn new_rejects_past_date() {
    let err = Appointment::new("A-100", Utc::now() - Duration::hours(1), "dentist").unwrap_err();
    assert_eq!(
        err,
        ValidationError::PastDate {
            field: "appointment_date"
        }
    );
}

#[test]
fn update_rejects_past_date_and_leaves_fields_unchanged() {
    let mut appointment = Appointment::new("A-100", next_week(), "dentist").unwrap();
    let before = appointment.clone();

    let err = appointment
        .update(Utc::now() - Duration::hours(1), "rescheduled")
        .unwrap_err();
    assert_eq!(
        err,
        ValidationError::PastDate {
            field: "appointment_date"
        }
    );
    assert_eq!(appointment, before);
}

#[test]
fn update_replaces_both_fields_atomically() {
    let mut appointment = Appointment::new("A-100", next_week(), "dentist").unwrap();
    let before = appointment.clone();

    let err = appointment.update(next_week(), "").unwrap_err();
    assert_eq!(
        err,
        ValidationError::Blank {
            field: "description"
        }
    );
    assert_eq!(appointment, before);

    let new_date = next_week() + Duration::hours(3);
    appointment.update(new_date, "moved").unwrap();
    assert_eq!(appointment.appointment_date(), new_date);
    assert_eq!(appointment.description(), "moved");
}

#[test]
fn copy_tolerates_a_date_that_has_since_passed() {
    // A stored appointment whose date was future at creation but has passed
    // by now; materialize it through the wire path, which applies the same
    // reconstitute rules as the durable store.
    let json = serde_json::json!({
        "appointment_id": "A-100",
        "appointment_date": "2020-06-01T10:00:00Z",
        "description": "already happened"
    });
    let appointment: Appointment = serde_json::from_value(json).unwrap();

    let copied = appointment.copy().unwrap();
    assert_eq!(copied, appointment);
    assert_eq!(
        copied.appointment_date().to_rfc3339(),
        "2020-06-01T10:00:00+00:00"
    );
}

#[test]
fn deserialize_still_rejects_structurally_invalid_data() {
    let value = serde_json::json!({
        "appointment_id": "A-100",
        "appointment_date": "2020-06-01T10:00:00Z",
        "description": "x".repeat(51)
    });

    let err = serde_json::from_value::<Appointment>(value).unwrap_err();
    assert!(
        err.to_string().contains("description"),
        "unexpected error: {err}"
    );
}
