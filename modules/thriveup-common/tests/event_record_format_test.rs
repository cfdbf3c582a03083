//! Storage format tests.
//!
//! Bookmarks written by earlier app builds must keep decoding:
//! - Field names match the stored JSON (`imageName`, camelCase details)
//! - Absent optional fields are omitted, not written as null
//! - Old payloads missing newer fields still deserialize
//! - Remote feed documents keyed by `eventId` decode too

use serde_json::json;
use thriveup_common::{EventRecord, UNCATEGORIZED};

#[test]
fn serializes_with_stored_field_names() {
    let event = EventRecord::new("e1", "Tech Talk")
        .with_description("Rust on mobile")
        .with_image("tech_talk")
        .with_category("Tech");

    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(
        value,
        json!({
            "id": "e1",
            "title": "Tech Talk",
            "description": "Rust on mobile",
            "imageName": "tech_talk",
            "category": "Tech",
        })
    );
}

#[test]
fn absent_category_is_omitted_not_labelled() {
    let event = EventRecord::new("e1", "Open Mic");
    let value = serde_json::to_value(&event).unwrap();
    assert!(value.get("category").is_none());
    assert_ne!(value["title"], json!(UNCATEGORIZED));
}

#[test]
fn old_payload_without_optional_fields_decodes() {
    let event: EventRecord = serde_json::from_value(json!({
        "id": "e9",
        "title": "Robotics Expo",
    }))
    .unwrap();
    assert_eq!(event.id, "e9");
    assert_eq!(event.description, "");
    assert_eq!(event.image_ref, "");
    assert!(event.category.is_none());
    assert!(event.organizer_name.is_none());
}

#[test]
fn feed_document_with_event_id_and_details_decodes() {
    let event: EventRecord = serde_json::from_value(json!({
        "eventId": "fs-42",
        "title": "Cultural Night",
        "category": "Culture",
        "imageName": "https://cdn.example/cultural.png",
        "organizerName": "Student Council",
        "date": "2025-01-12",
        "location": "Main Auditorium",
        "attendanceCount": 120,
    }))
    .unwrap();
    assert_eq!(event.id, "fs-42");
    assert_eq!(event.organizer_name.as_deref(), Some("Student Council"));
    assert_eq!(event.date.as_deref(), Some("2025-01-12"));
    assert_eq!(event.location.as_deref(), Some("Main Auditorium"));
    assert_eq!(event.category_label(), "Culture");
}

#[test]
fn detail_fields_round_trip_in_camel_case() {
    let event = EventRecord::new("e3", "Hack Night").with_organizer("ACM");
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["organizerName"], json!("ACM"));
    let back: EventRecord = serde_json::from_value(value).unwrap();
    assert_eq!(back.organizer_name.as_deref(), Some("ACM"));
}
