use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Orderable catalog item. `machine_ids` is the current association; the
/// single-valued `machine_id` and `subcategory_id` are kept for old clients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub id: String,
    #[serde(default)]
    pub machine_id: String,
    #[serde(default)]
    pub machine_ids: Vec<String>,
    #[serde(default)]
    pub subcategory_id: String,
    pub name: String,
    pub code: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PartCreate {
    pub machine_ids: Vec<String>,
    pub name: String,
    pub code: String,
    pub description: String,
    pub price: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PartUpdate {
    pub machine_ids: Vec<String>,
    pub name: String,
    pub code: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Part {
    pub fn new(input: PartCreate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            machine_id: legacy_machine_id(&input.machine_ids),
            machine_ids: input.machine_ids,
            subcategory_id: String::new(),
            name: input.name,
            code: input.code,
            description: input.description,
            price: input.price,
            image_url: None,
            created_at: Utc::now(),
        }
    }

    /// Read-path normalization: records stored before the multi-machine
    /// field existed carry only `machine_id`, surfaced here through
    /// `machine_ids`. Storage is never rewritten.
    pub fn normalized(mut self) -> Self {
        if self.machine_ids.is_empty() {
            self.machine_ids = vec![self.machine_id.clone()];
        }
        self
    }
}

/// First machine id, or empty when the list is; the stored legacy field.
pub fn legacy_machine_id(machine_ids: &[String]) -> String {
    machine_ids.first().cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn create_sets_legacy_fields_from_machine_list() {
        let part = Part::new(PartCreate {
            machine_ids: vec!["m1".to_string(), "m2".to_string()],
            name: "Air Filter".to_string(),
            code: "AF-1".to_string(),
            description: "High-efficiency filter".to_string(),
            price: 650.0,
        });
        assert_eq!(part.machine_id, "m1");
        assert_eq!(part.subcategory_id, "");
        assert!(!part.id.is_empty());
    }

    #[test]
    fn create_with_empty_machine_list_is_accepted() {
        let part = Part::new(PartCreate {
            machine_ids: vec![],
            name: "Orphan".to_string(),
            code: "OR-1".to_string(),
            description: String::new(),
            price: 0.0,
        });
        assert_eq!(part.machine_id, "");
        assert!(part.machine_ids.is_empty());
    }

    #[test]
    fn normalized_backfills_machine_ids_from_legacy_field() {
        let legacy = Part {
            id: "p1".to_string(),
            machine_id: "m9".to_string(),
            machine_ids: vec![],
            subcategory_id: "s1".to_string(),
            name: "Clutch Plate".to_string(),
            code: "CP-1".to_string(),
            description: String::new(),
            price: 3200.0,
            image_url: None,
            created_at: Utc::now(),
        };
        assert_eq!(legacy.normalized().machine_ids, vec!["m9".to_string()]);
    }

    #[test]
    fn normalized_keeps_existing_machine_ids() {
        let part = Part::new(PartCreate {
            machine_ids: vec!["m1".to_string(), "m2".to_string()],
            name: "Oil Filter".to_string(),
            code: "OF-1".to_string(),
            description: String::new(),
            price: 450.0,
        });
        assert_eq!(
            part.normalized().machine_ids,
            vec!["m1".to_string(), "m2".to_string()]
        );
    }

    #[test]
    fn legacy_documents_deserialize_without_new_fields() {
        // Simulates a row written before machine_ids existed.
        let stored = doc! {
            "id": "p2",
            "machine_id": "m4",
            "subcategory_id": "s2",
            "name": "Gear Set",
            "code": "GS-1",
            "description": "Transmission gears",
            "price": 15000.0,
            "created_at": "2023-06-01T08:00:00+00:00",
        };
        let part: Part = crate::db::from_document(stored).unwrap();
        assert!(part.machine_ids.is_empty());
        assert_eq!(part.normalized().machine_ids, vec!["m4".to_string()]);
    }
}
