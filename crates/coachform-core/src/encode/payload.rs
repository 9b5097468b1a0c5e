//! Turning a change-set into the gateway's field list
//!
//! The output is a flat, ordered list of (key, value) fields. Text values
//! that are empty are dropped, with two exceptions that must always reach
//! the wire: persistent ids and destroy markers. Binary values are carried
//! as raw bytes with filename and content-type metadata, never inlined as
//! text.

use crate::diff::{ChangeSet, ChangeValue};
use crate::model::Attachment;

use super::path::bracketed;

/// Value of one encoded form field
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadValue {
    /// Plain text
    Text(String),
    /// Raw bytes plus metadata, transmitted as a file part
    Binary(Attachment),
}

/// One encoded form field
#[derive(Debug, Clone, PartialEq)]
pub struct PayloadField {
    /// Full bracketed key, e.g. `root[plan][trainings][0][weekday]`
    pub key: String,
    /// The value to transmit under that key
    pub value: PayloadValue,
}

/// The complete outbound body, in deterministic field order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodedPayload {
    pub fields: Vec<PayloadField>,
}

impl EncodedPayload {
    /// Whether the payload carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// First field with the given key, if any
    pub fn field(&self, key: &str) -> Option<&PayloadField> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Text value under the given key, if present and textual
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.field(key)?.value {
            PayloadValue::Text(ref s) => Some(s),
            PayloadValue::Binary(_) => None,
        }
    }
}

/// Encode a change-set into the outbound field list
pub fn encode(changes: &ChangeSet) -> EncodedPayload {
    let mut fields = Vec::with_capacity(changes.len());
    for entry in changes.iter() {
        let key = bracketed(&entry.path);
        let value = match &entry.value {
            ChangeValue::Id(id) => PayloadValue::Text(id.to_string()),
            ChangeValue::Destroy => PayloadValue::Text("true".to_string()),
            ChangeValue::Text(s) => {
                if s.is_empty() {
                    continue;
                }
                PayloadValue::Text(s.clone())
            }
            ChangeValue::Binary(att) => PayloadValue::Binary(att.clone()),
        };
        fields.push(PayloadField { key, value });
    }
    EncodedPayload { fields }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::path::Seg;
    use coachform_core_types::PersistedId;

    #[test]
    fn test_empty_text_is_dropped() {
        let mut changes = ChangeSet::new();
        changes.push(
            &[Seg::Key("root"), Seg::Key("phone")],
            ChangeValue::Text(String::new()),
        );
        let payload = encode(&changes);
        assert!(payload.is_empty());
    }

    #[test]
    fn test_id_and_destroy_always_survive() {
        let mut changes = ChangeSet::new();
        let row = [
            Seg::Key("root"),
            Seg::Key("plan"),
            Seg::Key("meals"),
            Seg::Index(0),
        ];
        let mut id_path = row.to_vec();
        id_path.push(Seg::Key("id"));
        changes.push(&id_path, ChangeValue::Id(PersistedId::new(9)));
        let mut destroy_path = row.to_vec();
        destroy_path.push(Seg::Key("destroy"));
        changes.push(&destroy_path, ChangeValue::Destroy);

        let payload = encode(&changes);
        assert_eq!(payload.text("root[plan][meals][0][id]"), Some("9"));
        assert_eq!(payload.text("root[plan][meals][0][destroy]"), Some("true"));
    }

    #[test]
    fn test_binary_keeps_metadata() {
        let att = Attachment::new(vec![0xFF, 0xD8], "photo.jpg", "image/jpeg");
        let mut changes = ChangeSet::new();
        changes.push(
            &[Seg::Key("root"), Seg::Key("photo")],
            ChangeValue::Binary(att.clone()),
        );
        let payload = encode(&changes);
        match &payload.field("root[photo]").unwrap().value {
            PayloadValue::Binary(a) => {
                assert!(a.same_ref(&att));
                assert_eq!(a.filename(), "photo.jpg");
                assert_eq!(a.content_type(), "image/jpeg");
            }
            other => panic!("expected binary, got {:?}", other),
        }
    }

    #[test]
    fn test_field_order_follows_change_set_order() {
        let mut changes = ChangeSet::new();
        changes.push(
            &[Seg::Key("root"), Seg::Key("name")],
            ChangeValue::Text("Ana".to_string()),
        );
        changes.push(
            &[Seg::Key("root"), Seg::Key("email")],
            ChangeValue::Text("ana@x.com".to_string()),
        );
        let payload = encode(&changes);
        let keys: Vec<_> = payload.fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, ["root[name]", "root[email]"]);
    }
}
