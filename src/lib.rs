//! SQLite-backed parcel tracking.
//!
//! # Intention
//!
//! - Provide a small data-access API for parcel records stored in SQLite.
//! - Layer the parcel lifecycle rules (registered, sent, delivered) on top of it.
//!
//! # Architectural Boundaries
//!
//! - `store` only translates operations into single SQL statements.
//! - Status rules belong to `service`, never to the store.
//! - Connection setup and table creation live in `sqlite`.

pub mod error;
pub mod parcel;
pub mod service;
pub mod sqlite;
pub mod store;

pub use error::{Error, Result};
pub use parcel::{Parcel, ParcelStatus};
pub use service::ParcelService;
pub use sqlite::SqliteConfig;
pub use store::ParcelStore;
