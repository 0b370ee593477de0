//! # shelf-api
//!
//! HTTP API layer for the bookshelf backend.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Bearer-token authentication and the admin gate
//! - REST endpoints for users, books, carts, donations, reviews, payments,
//!   and aggregate statistics
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | POST | `/jwt` | Issue a token for an identity payload |
//! | GET | `/users` | List users (admin) |
//! | GET | `/users/admin/{email}` | Admin flag (self-only) |
//! | POST | `/users` | Register-or-noop by email |
//! | PATCH | `/users/admin/{id}` | Promote to admin (admin) |
//! | DELETE | `/users/{id}` | Delete user (admin) |
//! | GET | `/books`, `/books/{id}` | Catalog reads |
//! | POST/GET/DELETE | `/carts`... | Cart CRUD |
//! | POST/GET | `/oldBook` | Donations |
//! | POST/GET | `/review` | Reviews |
//! | POST | `/create-payment-intent` | Provider intent for a price |
//! | GET | `/payments/{email}` | Payment history (self-only) |
//! | POST | `/payments` | Record payment, clear cart items |
//! | GET | `/user-stats`, `/admin-stats` | Approximate counts |

pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
