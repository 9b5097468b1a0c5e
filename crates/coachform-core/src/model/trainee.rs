//! The root entity: one trainee record

use coachform_core_types::{PersistedId, Sensitive};
use serde::{Deserialize, Serialize};

use super::attachment::Attachment;
use super::plan::Plan;

/// The top-level edited record
///
/// Deserializable from the gateway's JSON record; locally picked binary
/// data (`photo`) and the password are never part of that record and are
/// skipped by serde.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trainee {
    /// Server-assigned id, absent for a record that was never saved
    #[serde(default)]
    pub id: Option<PersistedId>,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Contact email, doubles as the login
    #[serde(default)]
    pub email: String,

    /// New password to set on save; empty means "leave unchanged"
    #[serde(skip, default)]
    pub password: Sensitive<String>,

    /// Contact phone number
    #[serde(default)]
    pub phone: String,

    /// Locally picked profile photo awaiting upload
    #[serde(skip)]
    pub photo: Option<Attachment>,

    /// Where the server stored the last uploaded photo
    #[serde(default)]
    pub photo_url: Option<String>,

    /// The workout/meal or document plan
    #[serde(default)]
    pub plan: Plan,
}

impl Trainee {
    /// An empty record for create mode, with one placeholder row per
    /// active-arm collection
    pub fn empty() -> Self {
        Self {
            id: None,
            name: String::new(),
            email: String::new(),
            password: Sensitive::default(),
            phone: String::new(),
            photo: None,
            photo_url: None,
            plan: Plan::empty_manual(),
        }
    }

    /// Whether this record has been saved at least once
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_server_record() {
        let json = r#"{
            "id": 42,
            "name": "Ana",
            "email": "ana@x.com",
            "phone": "",
            "photo_url": "https://cdn.example/photos/42.jpg",
            "plan": {
                "variant": "manual",
                "trainings": [
                    {"id": 5, "weekday": "monday", "description": "", "exercises": []}
                ],
                "meals": []
            }
        }"#;
        let t: Trainee = serde_json::from_str(json).unwrap();
        assert_eq!(t.id, Some(PersistedId::new(42)));
        assert_eq!(t.name, "Ana");
        assert_eq!(t.plan.trainings.len(), 1);
        assert_eq!(t.plan.trainings[0].id, Some(PersistedId::new(5)));
        assert!(t.password.expose().is_empty());
    }

    #[test]
    fn test_empty_record_has_placeholders() {
        let t = Trainee::empty();
        assert!(!t.is_persisted());
        assert_eq!(t.plan.trainings.len(), 1);
        assert_eq!(t.plan.meals.len(), 1);
        assert!(t.plan.documents.is_empty());
    }
}
