use std::sync::Arc;

use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::FindOptions;
use mongodb::{Collection, Database};
use tracing::{info, warn};

use crate::db;
use crate::errors::ServiceError;
use crate::models::order::{Order, OrderCreate};
use crate::notifications::OrderNotifier;

const ORDERS: &str = "orders";

#[derive(Clone)]
pub struct OrderService {
    db: Database,
    notifier: Arc<dyn OrderNotifier>,
}

impl OrderService {
    pub fn new(db: Database, notifier: Arc<dyn OrderNotifier>) -> Self {
        Self { db, notifier }
    }

    fn orders(&self) -> Collection<Document> {
        self.db.collection(ORDERS)
    }

    /// Persists the order, then fires the notification from a detached task.
    /// The notification outcome is logged and discarded; it can never fail
    /// or delay order creation.
    pub async fn create_order(&self, input: OrderCreate) -> Result<Order, ServiceError> {
        let order = Order::new(input);
        self.orders()
            .insert_one(db::to_document(&order)?, None)
            .await?;
        info!(order_id = %order.id, total = order.total_amount, "order created");

        let notifier = self.notifier.clone();
        let created = order.clone();
        tokio::spawn(async move {
            if let Err(err) = notifier.notify_order_created(&created).await {
                warn!(order_id = %created.id, error = %err, "order notification failed");
            }
        });

        Ok(order)
    }

    /// All orders, newest first.
    pub async fn list_orders(&self) -> Result<Vec<Order>, ServiceError> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let docs: Vec<Document> = self
            .orders()
            .find(doc! {}, options)
            .await?
            .try_collect()
            .await?;
        docs.into_iter().map(db::from_document).collect()
    }
}
