//! SQLite persistence adapters.

pub mod activity_repository;
pub mod connection;
pub mod issue_repository;
pub mod migrations;
pub mod website_repository;

pub use activity_repository::SqliteActivityLog;
pub use connection::{create_pool, create_test_pool, verify_connection, ConnectionError, PoolConfig};
pub use issue_repository::SqliteIssueStore;
pub use migrations::{all_embedded_migrations, Migration, MigrationError, Migrator};
pub use website_repository::SqliteWebsiteStore;
