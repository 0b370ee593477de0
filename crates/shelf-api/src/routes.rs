//! # Routes
//!
//! Router configuration. Paths and verbs match the original API exactly so
//! existing clients keep working; authentication and admin gating live in
//! the handler signatures via the extractors in [`crate::auth`].

use crate::auth;
use crate::handlers::{self, books, carts, donations, payments, reviews, stats, users};
use crate::state::{AppConfig, AppState};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the main application router
///
/// | Method | Path | Auth |
/// |--------|------|------|
/// | POST | `/jwt` | none |
/// | GET | `/users` | admin |
/// | GET, PATCH | `/users/admin/{..}` | self / admin |
/// | POST | `/users` | none |
/// | DELETE | `/users/{id}` | admin |
/// | GET | `/books`, `/books/{id}` | none |
/// | POST, GET | `/carts` | none / authenticated |
/// | DELETE | `/carts/{id}` | none |
/// | POST, GET | `/oldBook` | none / authenticated |
/// | POST, GET | `/review` | none |
/// | POST | `/create-payment-intent` | none |
/// | GET | `/payments/{email}` | authenticated, self-only |
/// | POST | `/payments` | none |
/// | GET | `/user-stats`, `/admin-stats` | none |
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(handlers::health))
        .route("/health", get(handlers::health))
        .route("/jwt", post(auth::issue_jwt))
        // users
        .route("/users", get(users::list_users).post(users::register_user))
        .route(
            "/users/admin/{id}",
            get(users::is_admin).patch(users::promote_admin),
        )
        .route("/users/{id}", delete(users::delete_user))
        // books
        .route("/books", get(books::list_books))
        .route("/books/{id}", get(books::get_book))
        // carts
        .route("/carts", post(carts::add_to_cart).get(carts::list_cart))
        .route("/carts/{id}", delete(carts::remove_from_cart))
        // donations
        .route(
            "/oldBook",
            post(donations::add_donation).get(donations::list_donations),
        )
        // reviews
        .route(
            "/review",
            post(reviews::add_review).get(reviews::list_reviews),
        )
        // payments
        .route(
            "/create-payment-intent",
            post(payments::create_payment_intent),
        )
        .route("/payments", post(payments::record_payment))
        .route("/payments/{email}", get(payments::list_payments))
        // statistics
        .route("/user-stats", get(stats::user_stats))
        .route("/admin-stats", get(stats::admin_stats))
        // middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // state
        .with_state(state)
}

/// CORS restricted to the configured client origins, with credentials
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true)
}
