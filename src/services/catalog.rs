//! Catalog CRUD over machines, subcategories, and parts, plus the
//! idempotent sample-data bootstrap.

use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::{Collection, Database};
use tracing::info;

use crate::db;
use crate::errors::ServiceError;
use crate::models::machine::{Machine, MachineCreate, MachineUpdate};
use crate::models::part::{legacy_machine_id, Part, PartCreate, PartUpdate};
use crate::models::subcategory::{Subcategory, SubcategoryCreate};

const MACHINES: &str = "machines";
const SUBCATEGORIES: &str = "subcategories";
const PARTS: &str = "parts";

#[derive(Clone)]
pub struct CatalogService {
    db: Database,
}

impl CatalogService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn machines(&self) -> Collection<Document> {
        self.db.collection(MACHINES)
    }

    fn subcategories(&self) -> Collection<Document> {
        self.db.collection(SUBCATEGORIES)
    }

    fn parts(&self) -> Collection<Document> {
        self.db.collection(PARTS)
    }

    // Parts pass through one read-path normalization, applied uniformly
    // regardless of which listing produced the document.
    fn read_part(document: Document) -> Result<Part, ServiceError> {
        db::from_document::<Part>(document).map(Part::normalized)
    }

    pub async fn list_machines(&self) -> Result<Vec<Machine>, ServiceError> {
        let docs: Vec<Document> = self.machines().find(doc! {}, None).await?.try_collect().await?;
        docs.into_iter().map(db::from_document).collect()
    }

    pub async fn create_machine(&self, input: MachineCreate) -> Result<Machine, ServiceError> {
        let machine = Machine::new(input);
        self.machines()
            .insert_one(db::to_document(&machine)?, None)
            .await?;
        Ok(machine)
    }

    pub async fn update_machine(
        &self,
        id: &str,
        input: MachineUpdate,
    ) -> Result<Machine, ServiceError> {
        let update = db::to_document(&input)?;
        let result = self
            .machines()
            .update_one(doc! { "id": id }, doc! { "$set": update }, None)
            .await?;
        if result.matched_count == 0 {
            return Err(ServiceError::NotFound("Machine".to_string()));
        }

        let updated = self
            .machines()
            .find_one(doc! { "id": id }, None)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Machine".to_string()))?;
        db::from_document(updated)
    }

    /// Cascade runs through the legacy single-machine field only; parts
    /// associated solely via `machine_ids` survive the delete.
    pub async fn delete_machine(&self, id: &str) -> Result<(), ServiceError> {
        let result = self.machines().delete_one(doc! { "id": id }, None).await?;
        if result.deleted_count == 0 {
            return Err(ServiceError::NotFound("Machine".to_string()));
        }

        self.subcategories()
            .delete_many(doc! { "machine_id": id }, None)
            .await?;
        self.parts()
            .delete_many(doc! { "machine_id": id }, None)
            .await?;
        Ok(())
    }

    pub async fn list_subcategories_by_machine(
        &self,
        machine_id: &str,
    ) -> Result<Vec<Subcategory>, ServiceError> {
        let docs: Vec<Document> = self
            .subcategories()
            .find(doc! { "machine_id": machine_id }, None)
            .await?
            .try_collect()
            .await?;
        docs.into_iter().map(db::from_document).collect()
    }

    pub async fn list_all_subcategories(&self) -> Result<Vec<Subcategory>, ServiceError> {
        let docs: Vec<Document> = self
            .subcategories()
            .find(doc! {}, None)
            .await?
            .try_collect()
            .await?;
        docs.into_iter().map(db::from_document).collect()
    }

    pub async fn create_subcategory(
        &self,
        input: SubcategoryCreate,
    ) -> Result<Subcategory, ServiceError> {
        let subcategory = Subcategory::new(input);
        self.subcategories()
            .insert_one(db::to_document(&subcategory)?, None)
            .await?;
        Ok(subcategory)
    }

    /// Full overwrite under the same id; `created_at` is refreshed, which
    /// mirrors how updates to this legacy collection have always behaved.
    pub async fn update_subcategory(
        &self,
        id: &str,
        input: SubcategoryCreate,
    ) -> Result<Subcategory, ServiceError> {
        let mut replacement = Subcategory::new(input);
        replacement.id = id.to_string();

        let update = db::to_document(&replacement)?;
        let result = self
            .subcategories()
            .update_one(doc! { "id": id }, doc! { "$set": update }, None)
            .await?;
        if result.matched_count == 0 {
            return Err(ServiceError::NotFound("Subcategory".to_string()));
        }

        let updated = self
            .subcategories()
            .find_one(doc! { "id": id }, None)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Subcategory".to_string()))?;
        db::from_document(updated)
    }

    pub async fn delete_subcategory(&self, id: &str) -> Result<(), ServiceError> {
        let result = self
            .subcategories()
            .delete_one(doc! { "id": id }, None)
            .await?;
        if result.deleted_count == 0 {
            return Err(ServiceError::NotFound("Subcategory".to_string()));
        }

        self.parts()
            .delete_many(doc! { "subcategory_id": id }, None)
            .await?;
        Ok(())
    }

    /// Matches both the multi-machine list and the legacy single field, so
    /// rows written before the migration still show up.
    pub async fn list_parts_by_machine(&self, machine_id: &str) -> Result<Vec<Part>, ServiceError> {
        let filter = doc! {
            "$or": [
                { "machine_ids": machine_id },
                { "machine_id": machine_id },
            ]
        };
        let docs: Vec<Document> = self.parts().find(filter, None).await?.try_collect().await?;
        docs.into_iter().map(Self::read_part).collect()
    }

    pub async fn list_parts_by_subcategory(
        &self,
        subcategory_id: &str,
    ) -> Result<Vec<Part>, ServiceError> {
        let docs: Vec<Document> = self
            .parts()
            .find(doc! { "subcategory_id": subcategory_id }, None)
            .await?
            .try_collect()
            .await?;
        docs.into_iter().map(Self::read_part).collect()
    }

    pub async fn list_all_parts(&self) -> Result<Vec<Part>, ServiceError> {
        let docs: Vec<Document> = self.parts().find(doc! {}, None).await?.try_collect().await?;
        docs.into_iter().map(Self::read_part).collect()
    }

    /// No validation of name, code, price, or the machine list; writes are
    /// pass-through by contract.
    pub async fn create_part(&self, input: PartCreate) -> Result<Part, ServiceError> {
        let part = Part::new(input);
        self.parts().insert_one(db::to_document(&part)?, None).await?;
        Ok(part)
    }

    pub async fn update_part(&self, id: &str, input: PartUpdate) -> Result<Part, ServiceError> {
        let mut update = db::to_document(&input)?;
        update.insert("machine_id", legacy_machine_id(&input.machine_ids));
        update.insert("subcategory_id", "");

        let result = self
            .parts()
            .update_one(doc! { "id": id }, doc! { "$set": update }, None)
            .await?;
        if result.matched_count == 0 {
            return Err(ServiceError::NotFound("Part".to_string()));
        }

        let updated = self
            .parts()
            .find_one(doc! { "id": id }, None)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Part".to_string()))?;
        Self::read_part(updated)
    }

    /// Narrow single-field update; negative or zero prices persist as given.
    pub async fn update_part_price(&self, id: &str, price: f64) -> Result<(), ServiceError> {
        let result = self
            .parts()
            .update_one(doc! { "id": id }, doc! { "$set": { "price": price } }, None)
            .await?;
        if result.matched_count == 0 {
            return Err(ServiceError::NotFound("Part".to_string()));
        }
        Ok(())
    }

    pub async fn delete_part(&self, id: &str) -> Result<(), ServiceError> {
        let result = self.parts().delete_one(doc! { "id": id }, None).await?;
        if result.deleted_count == 0 {
            return Err(ServiceError::NotFound("Part".to_string()));
        }
        Ok(())
    }

    /// Seeds the demo catalog. No-ops when any machine already exists.
    pub async fn init_sample_data(&self) -> Result<&'static str, ServiceError> {
        let existing_machines = self.machines().count_documents(doc! {}, None).await?;
        if existing_machines > 0 {
            return Ok("Sample data already exists");
        }

        let machines: Vec<Machine> = [
            ("Tractor", "Heavy-duty agricultural tractors"),
            ("Harvester", "Combine harvesters and crop processing machines"),
            ("Water Pump", "Industrial and agricultural water pumps"),
        ]
        .into_iter()
        .map(|(name, description)| {
            Machine::new(MachineCreate {
                name: name.to_string(),
                description: description.to_string(),
            })
        })
        .collect();
        for machine in &machines {
            self.machines()
                .insert_one(db::to_document(machine)?, None)
                .await?;
        }

        let subcategory_seed: [(usize, &str, &str); 7] = [
            (0, "Engine", "Engine components and parts"),
            (0, "Gearbox", "Transmission and gearbox parts"),
            (0, "Filters", "Air, oil, and fuel filters"),
            (1, "Cutting System", "Cutting blades and mechanisms"),
            (1, "Threshing Unit", "Threshing and separation components"),
            (2, "Impeller", "Pump impellers and rotors"),
            (2, "Seals & Gaskets", "Sealing components"),
        ];
        let subcategories: Vec<Subcategory> = subcategory_seed
            .into_iter()
            .map(|(machine_index, name, description)| {
                Subcategory::new(SubcategoryCreate {
                    machine_id: machines[machine_index].id.clone(),
                    name: name.to_string(),
                    description: description.to_string(),
                })
            })
            .collect();
        for subcategory in &subcategories {
            self.subcategories()
                .insert_one(db::to_document(subcategory)?, None)
                .await?;
        }

        // (machine indexes, subcategory index, name, code, description, price)
        let part_seed: [(&[usize], usize, &str, &str, &str, f64); 10] = [
            (&[0], 0, "Piston Ring Set", "TR-ENG-001", "Complete piston ring set for diesel engine", 2500.0),
            (&[0], 1, "Clutch Plate", "TR-GB-001", "Heavy-duty clutch plate assembly", 3200.0),
            (&[0], 1, "Gear Set", "TR-GB-002", "Complete transmission gear set", 15000.0),
            (&[1], 3, "Cutting Blade", "HV-CUT-001", "Sharp cutting blade for crops", 1200.0),
            (&[1], 4, "Threshing Drum", "HV-THR-001", "Heavy-duty threshing drum", 8500.0),
            (&[2], 5, "Centrifugal Impeller", "WP-IMP-001", "High-efficiency centrifugal impeller", 2800.0),
            (&[0, 1], 2, "Air Filter", "UNI-FLT-001", "Universal high-efficiency air filter", 650.0),
            (&[0, 1, 2], 2, "Oil Filter", "UNI-FLT-002", "Universal premium oil filter", 450.0),
            (&[0, 2], 6, "Mechanical Seal", "UNI-SEL-001", "Universal water-tight mechanical seal", 950.0),
            (&[1, 2], 0, "Cylinder Head Gasket", "UNI-ENG-001", "Universal cylinder head gasket", 1800.0),
        ];
        for (machine_indexes, subcategory_index, name, code, description, price) in part_seed {
            let machine_ids: Vec<String> = machine_indexes
                .iter()
                .map(|&index| machines[index].id.clone())
                .collect();
            let mut part = Part::new(PartCreate {
                machine_ids,
                name: name.to_string(),
                code: code.to_string(),
                description: description.to_string(),
                price,
            });
            part.subcategory_id = subcategories[subcategory_index].id.clone();
            self.parts().insert_one(db::to_document(&part)?, None).await?;
        }

        info!(
            machines = machines.len(),
            subcategories = subcategories.len(),
            "sample catalog seeded"
        );
        Ok("Sample data initialized successfully")
    }
}
