//! # ecofinds-store
//!
//! Persistence and data-access layer for the EcoFinds second-hand
//! marketplace.
//!
//! ## Features
//!
//! - **Whole-collection storage:** users, products, purchases and carts are
//!   stored as JSON lists under fixed keys and rewritten in full on change
//! - **Backend agnostic:** in-memory (`DashMap`) by default, Redis behind the
//!   `redis` feature, or any [`StorageBackend`] you implement
//! - **Marketplace operations:** accounts, listings with filtering, carts,
//!   checkout into per-item purchase records
//! - **Mock API:** the same operations with simulated network latency
//!
//! ## Quick Start
//!
//! ```
//! use ecofinds_store::backend::InMemoryBackend;
//! use ecofinds_store::model::{Category, ProductDraft, ProductFilter};
//! use ecofinds_store::Marketplace;
//! use rust_decimal::Decimal;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> ecofinds_store::Result<()> {
//! let market = Marketplace::new(InMemoryBackend::new());
//!
//! let seller = market.register("sam@example.com", "pw", "sam").await?;
//! let buyer = market.register("bea@example.com", "pw", "bea").await?;
//!
//! let lamp = market
//!     .create_product(
//!         seller.id,
//!         ProductDraft::new(
//!             "Desk Lamp",
//!             "LED, barely used",
//!             Category::Furniture,
//!             Decimal::new(45, 0),
//!         ),
//!     )
//!     .await?;
//!
//! let cart = market.add_to_cart(buyer.id, &lamp).await?;
//! let purchases = market.checkout(&cart, buyer.id).await?;
//! assert_eq!(purchases.len(), 1);
//!
//! // Bought listings leave the catalog.
//! assert!(market.list_products(&ProductFilter::default()).await?.is_empty());
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate log;

pub mod api;
pub mod backend;
pub mod catalog;
pub mod config;
pub mod error;
pub mod key;
pub mod marketplace;
pub mod model;
pub mod observability;
pub mod record;
pub mod serialization;
pub mod store;

// Re-exports for convenience
pub use api::{AuthSession, MockApi};
pub use backend::StorageBackend;
pub use config::{CartScope, LatencyPolicy, StoreConfig};
pub use error::{Error, Result};
pub use key::CollectionKey;
pub use marketplace::Marketplace;
pub use record::Record;
pub use store::CollectionStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
