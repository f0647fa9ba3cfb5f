// Adapters layer: concrete implementations of the domain ports for external systems.

pub mod auth;
pub mod sheets;
pub mod storage;

pub use auth::ServiceAccountAuth;
pub use sheets::SheetsClient;
pub use storage::LocalStorage;
