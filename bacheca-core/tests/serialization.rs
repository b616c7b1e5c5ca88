use bacheca_core::*;
use serde_json::{self as json, json, Value};
use time::macros::datetime;

fn to_value<T: serde::Serialize>(v: &T) -> Value {
    json::to_value(v).expect("serialize")
}

/*
    Obiettivo test: il Message esce con la chiave `_id` (non `id`) e con `image`
    presente come null quando il messaggio non ha immagine.
*/
#[test]
fn message_uses_underscore_id_and_null_image() {
    let m = Message {
        id: "65a1f0c2e4b0a1b2c3d4e5f6".to_string(),
        text: "hi".to_string(),
        author: "bob".to_string(),
        timestamp: "2025-11-02T10:20:30.123Z".to_string(),
        image: None,
    };
    let v = to_value(&m);

    assert_eq!(v["_id"], m.id);
    assert!(v.get("id").is_none(), "id should only appear as _id");
    assert_eq!(v["text"], "hi");
    assert_eq!(v["author"], "bob");
    assert!(v.get("image").is_some_and(Value::is_null));
}

/*
    Documenti scritti senza il campo image (es. da altri client) devono
    comunque essere leggibili.
*/
#[test]
fn message_without_image_field_deserializes() {
    let m: Message = json::from_value(json!({
        "_id": "65a1f0c2e4b0a1b2c3d4e5f6",
        "text": "hi",
        "author": "bob",
        "timestamp": "2025-11-02T10:20:30.123Z"
    }))
    .expect("deserialize");
    assert_eq!(m.image, None);
}

// La risposta di creazione è in camelCase: { acknowledged, insertedId }
#[test]
fn create_response_is_camel_case() {
    let v = to_value(&CreateMessageResponse::inserted("65a1f0c2e4b0a1b2c3d4e5f6"));
    assert_eq!(v, json!({ "acknowledged": true, "insertedId": "65a1f0c2e4b0a1b2c3d4e5f6" }));
}

#[test]
fn error_and_status_bodies() {
    assert_eq!(
        to_value(&ErrorResponse::new("Invalid message ID")),
        json!({ "error": "Invalid message ID" })
    );
    assert_eq!(
        to_value(&StatusResponse::new("Message deleted")),
        json!({ "message": "Message deleted" })
    );
}

/*
    MessageFields accetta corpi parziali: i campi mancanti diventano None e
    la validazione vera e propria resta al server.
*/
#[test]
fn message_fields_tolerate_missing_keys() {
    let f: MessageFields = json::from_value(json!({ "text": "only text" })).expect("deserialize");
    assert_eq!(f.text.as_deref(), Some("only text"));
    assert_eq!(f.author, None);
    assert_eq!(f.image, None);

    let f: MessageFields = json::from_value(json!({})).expect("deserialize");
    assert_eq!(f, MessageFields::default());
}

// Il timestamp generato è ISO-8601 UTC con millisecondi (24 caratteri, suffisso Z)
#[test]
fn now_timestamp_is_iso8601_with_millis() {
    let ts = now_timestamp();
    assert_eq!(ts.len(), 24, "unexpected format: {}", ts);
    assert!(ts.ends_with('Z'));
    assert_eq!(&ts[10..11], "T");
    assert_eq!(&ts[19..20], ".");

    let parsed = parse_timestamp(&ts).expect("parse back");
    assert_eq!(format_timestamp(parsed), ts);
}

#[test]
fn parse_timestamp_rejects_garbage() {
    assert!(parse_timestamp("yesterday").is_none());
    assert!(parse_timestamp("2025-13-40T99:00:00Z").is_none());
    assert!(parse_timestamp("2025-11-02T10:20:30.123Z").is_some());
}

/*
    Obiettivo test: un istante con offset diverso da UTC viene convertito
    prima della formattazione, così il suffisso Z indica l'istante giusto.
*/
#[test]
fn format_timestamp_converts_to_utc() {
    assert_eq!(
        format_timestamp(datetime!(2025-01-01 12:00:00.250 +02:00)),
        "2025-01-01T10:00:00.250Z"
    );
    assert_eq!(
        format_timestamp(datetime!(2025-01-01 00:30:00 -01:00)),
        "2025-01-01T01:30:00.000Z"
    );
}
