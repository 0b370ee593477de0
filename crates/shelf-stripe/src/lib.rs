//! # shelf-stripe
//!
//! Stripe payment-intent bridge for the bookshelf backend.
//!
//! This crate provides:
//! - `StripeConfig` loaded from the environment
//! - `StripeIntentClient`, a [`shelf_core::PaymentIntentProvider`] backed by
//!   the Stripe PaymentIntents REST API

pub mod config;
pub mod intent;

pub use config::StripeConfig;
pub use intent::StripeIntentClient;
