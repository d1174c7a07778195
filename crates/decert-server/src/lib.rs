//! DeCert Server - certificate issuance and verification API
//!
//! This crate provides the REST API server for DeCert: durable certificate
//! records in PostgreSQL, with chain proof attached through an external
//! chain gateway.

pub mod chain;
pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod store;

use decert_core::{IssuerIdentity, MintCoordinator, VerificationService};
use sqlx::PgPool;

use chain::{GatewayChainService, GatewayConfig};
use store::PgStore;

pub use config::Config;
pub use error::AppError;
pub use routes::create_router;

/// Shared state handed to every request handler.
pub struct AppState {
    /// The only writer: issuance and mint orchestration.
    pub coordinator: MintCoordinator<PgStore, GatewayChainService>,
    /// Read-only verification facade.
    pub verification: VerificationService<PgStore>,
    /// Direct store handle for plain listings.
    pub store: PgStore,
}

impl AppState {
    /// Wires the coordinator, verification service and store from a pool
    /// and the startup configuration.
    pub fn new(pool: PgPool, config: &Config) -> Self {
        let store = PgStore::new(pool);
        let chain = GatewayChainService::new(GatewayConfig {
            base_url: config.chain_gateway_url.clone(),
        });
        Self {
            coordinator: MintCoordinator::new(
                store.clone(),
                chain,
                IssuerIdentity::new(config.issuer_address.clone()),
            ),
            verification: VerificationService::new(store.clone()),
            store,
        }
    }
}
