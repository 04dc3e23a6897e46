use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Legacy sub-grouping under a machine. No longer used to scope part
/// listings, but the records and their CRUD surface survive for old clients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: String,
    pub machine_id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubcategoryCreate {
    pub machine_id: String,
    pub name: String,
    pub description: String,
}

impl Subcategory {
    pub fn new(input: SubcategoryCreate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            machine_id: input.machine_id,
            name: input.name,
            description: input.description,
            created_at: Utc::now(),
        }
    }
}
