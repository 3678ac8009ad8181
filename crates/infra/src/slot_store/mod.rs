//! Durable [`SlotStore`](equiptrack_inventory::SlotStore) backends.

mod sqlite;

pub use sqlite::{SqliteSlotStore, default_db_path};
