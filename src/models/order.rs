use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Snapshot of a part at order time. Deliberately decoupled from live Part
/// records so historical orders stay accurate after catalog edits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub part_id: String,
    pub part_name: String,
    pub part_code: String,
    pub machine_name: String,
    pub quantity: i64,
    pub price: f64,
    #[serde(default)]
    pub comment: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub gst_number: Option<String>,
    #[serde(default)]
    pub delivery_address: Option<String>,
}

/// Immutable once created; no update or delete surface exists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub customer_info: CustomerInfo,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderCreate {
    pub customer_info: CustomerInfo,
    pub items: Vec<OrderItem>,
    /// Trusted as submitted; never recomputed against the items.
    pub total_amount: f64,
}

impl Order {
    pub fn new(input: OrderCreate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            customer_info: input.customer_info,
            items: input.items,
            total_amount: input.total_amount,
            status: "new".to_string(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order() -> Order {
        Order::new(OrderCreate {
            customer_info: CustomerInfo {
                name: "Asha Patel".to_string(),
                phone: "+91 98765 43210".to_string(),
                email: None,
                company: Some("Patel Agro".to_string()),
                gst_number: None,
                delivery_address: None,
            },
            items: vec![OrderItem {
                part_id: "p1".to_string(),
                part_name: "Air Filter".to_string(),
                part_code: "AF-1".to_string(),
                machine_name: "Tractor".to_string(),
                quantity: 2,
                price: 650.0,
                comment: String::new(),
            }],
            total_amount: 1300.0,
        })
    }

    #[test]
    fn new_orders_default_to_status_new() {
        let order = sample_order();
        assert_eq!(order.status, "new");
        assert!(!order.id.is_empty());
    }

    #[test]
    fn order_round_trips_through_storage_form() {
        let order = sample_order();
        let doc = crate::db::to_document(&order).unwrap();
        let revived: Order = crate::db::from_document(doc).unwrap();
        assert_eq!(revived.id, order.id);
        assert_eq!(revived.items, order.items);
        assert_eq!(revived.created_at.timestamp(), order.created_at.timestamp());
    }

    #[test]
    fn items_comment_defaults_to_empty() {
        let raw = serde_json::json!({
            "part_id": "p1",
            "part_name": "Air Filter",
            "part_code": "AF-1",
            "machine_name": "Tractor",
            "quantity": 1,
            "price": 650.0
        });
        let item: OrderItem = serde_json::from_value(raw).unwrap();
        assert_eq!(item.comment, "");
    }
}
