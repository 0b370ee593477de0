//! # Application State
//!
//! Configuration loaded from the environment and the shared state injected
//! into every handler: one typed collection per entity over the store handle,
//! the payment-intent provider, and the token keys. The store connection is
//! created once at startup and only ever reached through this state.

use crate::auth::AuthKeys;
use shelf_core::{
    Book, BoxedPaymentIntentProvider, CartItem, Collection, DocumentStore, DonatedBook, Payment,
    Review, ShelfError, ShelfResult, TypedCollection, User,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Document store connection string
    pub mongodb_uri: String,
    /// Database holding the six collections
    pub db_name: String,
    /// Shared secret for token signing
    pub access_token_secret: String,
    /// Cross-origin client origins allowed to call the API
    pub allowed_origins: Vec<String>,
    /// Deadline for each individual store call
    pub store_timeout: Duration,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables.
    ///
    /// `ACCESS_TOKEN_SECRET` is required; everything else has a development
    /// default.
    pub fn from_env() -> ShelfResult<Self> {
        dotenvy::dotenv().ok();

        let access_token_secret = std::env::var("ACCESS_TOKEN_SECRET")
            .map_err(|_| ShelfError::Configuration("ACCESS_TOKEN_SECRET not set".into()))?;

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| vec!["http://localhost:5173".to_string()]);

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            mongodb_uri: std::env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            db_name: std::env::var("DB_NAME").unwrap_or_else(|_| "eBook".to_string()),
            access_token_secret,
            allowed_origins,
            store_timeout: Duration::from_secs(
                std::env::var("STORE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> ShelfResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ShelfError::Configuration(format!("invalid listen address: {e}")))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub users: TypedCollection<User>,
    pub books: TypedCollection<Book>,
    pub carts: TypedCollection<CartItem>,
    pub donations: TypedCollection<DonatedBook>,
    pub reviews: TypedCollection<Review>,
    pub payments: TypedCollection<Payment>,
    /// Payment-intent provider
    pub intents: BoxedPaymentIntentProvider,
    /// Token signing/verification keys
    pub auth: Arc<AuthKeys>,
    /// Application config
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        intents: BoxedPaymentIntentProvider,
        config: AppConfig,
    ) -> Self {
        let auth = Arc::new(AuthKeys::from_secret(&config.access_token_secret));

        Self {
            users: TypedCollection::new(Arc::clone(&store), Collection::Users),
            books: TypedCollection::new(Arc::clone(&store), Collection::Books),
            carts: TypedCollection::new(Arc::clone(&store), Collection::Carts),
            donations: TypedCollection::new(Arc::clone(&store), Collection::OldBooks),
            reviews: TypedCollection::new(Arc::clone(&store), Collection::Reviews),
            payments: TypedCollection::new(Arc::clone(&store), Collection::Payments),
            intents,
            auth,
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            db_name: "eBook".to_string(),
            access_token_secret: "test-secret".to_string(),
            allowed_origins: vec!["http://localhost:5173".to_string()],
            store_timeout: Duration::from_secs(5),
            environment: "test".to_string(),
        }
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:3000");
        assert!(!config.is_production());
    }

    #[test]
    fn test_invalid_host_rejected() {
        let config = AppConfig {
            host: "not a host".to_string(),
            ..test_config()
        };
        assert!(config.socket_addr().is_err());
    }
}
