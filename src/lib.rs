//! QuickParts API Library
//!
//! Catalog-and-ordering backend for a spare-parts storefront: public
//! machine/part browsing, order submission, and a token-authenticated
//! admin surface over a single MongoDB database.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod notifications;
pub mod services;

use std::sync::Arc;

use crate::auth::AuthService;
use crate::services::catalog::CatalogService;
use crate::services::orders::OrderService;

/// Shared application state handed to every handler.
///
/// Every service holds its own clone of the database handle constructed
/// once in `main`; nothing reaches for a global.
#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    pub auth: Arc<AuthService>,
    pub catalog: CatalogService,
    pub orders: OrderService,
}
