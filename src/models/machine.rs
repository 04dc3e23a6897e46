use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Top-level catalog category; parts hang off machines.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MachineCreate {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MachineUpdate {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Machine {
    pub fn new(input: MachineCreate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            description: input.description,
            image_url: None,
            created_at: Utc::now(),
        }
    }
}
