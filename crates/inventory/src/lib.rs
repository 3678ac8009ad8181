//! Inventory module: equipment records and the store that owns them.
//!
//! The store keeps the authoritative record list, the form draft, the edit
//! state and the filter selection. Derived views are recomputed on every
//! read; every mutation is written through to a [`SlotStore`].

pub mod draft;
pub mod error;
pub mod events;
pub mod filter;
pub mod presenter;
pub mod record;
pub mod storage;
pub mod store;

pub use draft::{DraftField, DraftPatch, FormDraft};
pub use error::{StoreError, StoreResult};
pub use events::{
    EditCancelled, EditStarted, InventoryEvent, InventoryLoaded, RecordAdded, RecordRemoved,
    RecordUpdated,
};
pub use filter::{FilterPatch, FilterSelection};
pub use presenter::{HeadlessPresenter, Presenter};
pub use record::{EquipmentRecord, STATUS_AVAILABLE, STATUS_LOANED};
pub use storage::{InMemorySlotStore, STORAGE_KEY, SlotStore, StorageError};
pub use store::{EditState, InventoryStore, InventorySummary};
