//! SQLite data access for the platform's user domain.
//!
//! # Intention
//!
//! - Wrap the queries the platform runs against users, roles, permissions,
//!   services, sites and orders behind typed repositories.
//! - Derive the site builder's capability set from the permissions a user
//!   or site holds.
//!
//! # Architectural Boundaries
//!
//! - Only user-domain database code and the rule tables it needs belong
//!   here.
//! - The schema is owned elsewhere; [`schema`] only mirrors it for local
//!   databases and tests.
//!
//! # Example
//!
//! ```no_run
//! use hk_user::{Database, StoreConfig};
//!
//! let db = Database::open(StoreConfig::new("users.db"))?;
//! if let Some(profile) = db.user_info().get_user_info(42)? {
//!     println!("{} can build {} sites", profile.user_acc, profile.permissions.sitelimit);
//! }
//! # Ok::<(), hk_user::Error>(())
//! ```

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod permissions;
pub mod schema;
pub mod user_edit;
pub mod user_info;
pub mod user_order;
pub mod user_site;
pub mod value;

pub use catalog::{user_services, PurchasedServices};
pub use config::StoreConfig;
pub use db::Database;
pub use error::{Error, Result};
pub use permissions::{
    get_user_builder_permission, user_account_type, user_provider_type, AccountType,
    BuilderPermission, ProviderType,
};
pub use schema::{user_domain_schema, Schema};
pub use user_edit::UserEdit;
pub use user_info::UserInfo;
pub use user_order::UserOrder;
pub use user_site::UserSite;
pub use value::{Row, Value};
