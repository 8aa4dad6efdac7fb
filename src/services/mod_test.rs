use super::*;
use serde::Deserialize;

#[derive(Deserialize)]
struct Patch {
    #[serde(default, deserialize_with = "nullable")]
    location: Option<Option<String>>,
}

#[test]
fn nullable_absent_field_is_none() {
    let patch: Patch = serde_json::from_str("{}").unwrap();
    assert_eq!(patch.location, None);
}

#[test]
fn nullable_explicit_null_is_some_none() {
    let patch: Patch = serde_json::from_str(r#"{"location": null}"#).unwrap();
    assert_eq!(patch.location, Some(None));
}

#[test]
fn nullable_value_is_some_some() {
    let patch: Patch = serde_json::from_str(r#"{"location": "HS 1"}"#).unwrap();
    assert_eq!(patch.location, Some(Some("HS 1".to_owned())));
}

#[test]
fn clean_optional_trims_and_drops_blank() {
    assert_eq!(clean_optional(Some("  Keplergebäude ".into())), Some("Keplergebäude".into()));
    assert_eq!(clean_optional(Some("   ".into())), None);
    assert_eq!(clean_optional(None), None);
}

#[test]
fn require_text_rejects_blank() {
    assert!(matches!(require_text("   ", "Titel"), Err(ContentError::Invalid(ref m)) if m == "Titel darf nicht leer sein"));
    assert!(require_text("ok", "Titel").is_ok());
}
