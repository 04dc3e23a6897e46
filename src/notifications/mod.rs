//! Best-effort order notifications.
//!
//! The notifier is fired from a detached task after an order persists; its
//! outcome is logged and discarded, never surfaced to the caller.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::models::order::{Order, OrderItem};

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Message build error: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("Invalid mailbox address: {0}")]
    Address(#[from] lettre::address::AddressError),
}

#[async_trait]
pub trait OrderNotifier: Send + Sync {
    async fn notify_order_created(&self, order: &Order) -> Result<(), NotificationError>;
}

/// SMTP-backed notifier; one plain-text message per created order.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: String,
    recipient: String,
}

/// Stand-in when SMTP credentials are not configured.
pub struct DisabledNotifier;

#[async_trait]
impl OrderNotifier for DisabledNotifier {
    async fn notify_order_created(&self, order: &Order) -> Result<(), NotificationError> {
        debug!(order_id = %order.id, "email credentials not configured, skipping notification");
        Ok(())
    }
}

#[async_trait]
impl OrderNotifier for SmtpNotifier {
    async fn notify_order_created(&self, order: &Order) -> Result<(), NotificationError> {
        let email = Message::builder()
            .from(self.sender.parse()?)
            .to(self.recipient.parse()?)
            .subject(order_subject(order))
            .header(ContentType::TEXT_PLAIN)
            .body(render_order_email(order))?;

        self.transport.send(email).await?;
        info!(order_id = %order.id, "order notification sent");
        Ok(())
    }
}

/// Builds the notifier from configuration; a missing SMTP host or
/// credentials disables notifications rather than failing startup.
pub fn build_notifier(cfg: &AppConfig) -> Result<Arc<dyn OrderNotifier>, NotificationError> {
    let (host, username, password) = match (&cfg.smtp_host, &cfg.smtp_username, &cfg.smtp_password)
    {
        (Some(host), Some(user), Some(pass))
            if !host.is_empty() && !user.is_empty() && !pass.is_empty() =>
        {
            (host.clone(), user.clone(), pass.clone())
        }
        _ => {
            info!("SMTP not configured; order notifications disabled");
            return Ok(Arc::new(DisabledNotifier));
        }
    };

    let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)?
        .port(cfg.smtp_port)
        .credentials(Credentials::new(username.clone(), password))
        .build();

    Ok(Arc::new(SmtpNotifier {
        transport,
        sender: username,
        recipient: cfg.notification_email.clone(),
    }))
}

fn order_subject(order: &Order) -> String {
    let short_id: String = order.id.chars().take(8).collect();
    format!("New Order Received - QuickParts (Order #{})", short_id)
}

fn line_total(item: &OrderItem) -> f64 {
    item.price * item.quantity as f64
}

fn or_not_provided(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("Not provided")
}

fn render_order_email(order: &Order) -> String {
    let items = order
        .items
        .iter()
        .map(|item| {
            format!(
                "• {} ({}) - Qty: {} - ₹{}",
                item.part_name,
                item.part_code,
                item.quantity,
                line_total(item)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "A new order has been received on QuickParts!\n\n\
         Order Details:\n\
         Order ID: {id}\n\
         Customer: {name}\n\
         Phone: {phone}\n\
         Email: {email}\n\
         Company: {company}\n\n\
         Items Ordered:\n\
         {items}\n\n\
         Total Amount: ₹{total}\n\
         Order Date: {date}\n\n\
         Please log in to the admin dashboard to view complete order details and process the order.\n\n\
         Best regards,\n\
         QuickParts System\n",
        id = order.id,
        name = order.customer_info.name,
        phone = order.customer_info.phone,
        email = or_not_provided(&order.customer_info.email),
        company = or_not_provided(&order.customer_info.company),
        items = items,
        total = order.total_amount,
        date = order.created_at.format("%Y-%m-%d %H:%M:%S"),
    )
}
