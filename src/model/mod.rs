//! Marketplace records: users, listings, carts and purchases.

pub mod cart;
pub mod credential;
pub mod id;
pub mod product;
pub mod purchase;
pub mod user;

pub use cart::{Cart, CartLineItem};
pub use credential::PasswordDigest;
pub use id::{OrderId, ProductId, UserId};
pub use product::{
    Category, ImageRef, Product, ProductDraft, ProductFilter, ProductPatch, ProductSort,
};
pub use purchase::{order_total, Purchase, PurchaseStatus};
pub use user::{ProfileUpdate, User};
