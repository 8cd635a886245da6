//! Places directory backend: places with geocoded addresses, created by user accounts.

pub mod error;
pub mod geocode;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod security;
pub mod service;
pub mod settings;
pub mod state;
pub mod store;

pub use error::{AppError, ConfigError};
pub use geocode::{Geocoder, GoogleGeocoder, StaticGeocoder};
pub use model::{Location, Place, User, UserView};
pub use routes::{app, common_routes, place_routes, user_routes};
pub use settings::{ServerConfig, StorageBackend};
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_tables, MemoryStore, PgStore, Store, StoreError};
