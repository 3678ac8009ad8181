//! Infrastructure layer: durable storage adapters.

pub mod slot_store;


pub use slot_store::{SqliteSlotStore, default_db_path};
