//! # shelf-core
//!
//! Core types and traits for the bookshelf backend.
//!
//! This crate provides:
//! - The domain documents: `User`, `Book`, `CartItem`, `DonatedBook`,
//!   `Review`, `Payment`
//! - The `DocumentStore` trait, equality `Filter`, and the typed collection
//!   wrapper handlers use
//! - The `PaymentIntentProvider` trait for the external payment seam
//! - `ShelfError` for typed error handling
//! - An in-memory store backend for tests and local runs

pub mod book;
pub mod cart;
pub mod error;
pub mod memory;
pub mod money;
pub mod payment;
pub mod review;
pub mod store;
pub mod user;

// Re-exports for convenience
pub use book::Book;
pub use cart::{CartItem, DonatedBook};
pub use error::{ShelfError, ShelfResult};
pub use memory::MemoryStore;
pub use money::{minor_units, MAX_CHARGE_MINOR};
pub use payment::{
    BoxedPaymentIntentProvider, Payment, PaymentIntent, PaymentIntentProvider, PaymentStatus,
};
pub use review::Review;
pub use store::{
    ensure_document_id, Collection, DocumentStore, Filter, TypedCollection, UpdateOutcome,
};
pub use user::{Role, User};
