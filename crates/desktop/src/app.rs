//! Application wiring: storage + presenter + change bus -> loaded store.

use std::sync::Arc;

use anyhow::Context;

use equiptrack_events::{EventBus, InMemoryEventBus, Subscription};
use equiptrack_inventory::{InventoryEvent, InventoryStore, Presenter, SlotStore};

use crate::config::DesktopConfig;

/// A loaded store plus the subscription the presentation layer redraws from.
pub struct App<S, P> {
    pub store: InventoryStore<S, P>,
    pub changes: Subscription<InventoryEvent>,
}

/// Build the store under the configured key and load persisted records.
///
/// A slot that cannot be read or parsed aborts startup.
pub fn bootstrap<S, P>(config: &DesktopConfig, storage: S, presenter: P) -> anyhow::Result<App<S, P>>
where
    S: SlotStore,
    P: Presenter,
{
    let bus = Arc::new(InMemoryEventBus::new());
    let changes = bus.subscribe();

    let mut store = InventoryStore::new(storage, presenter)
        .with_storage_key(config.storage_key.clone())
        .with_bus(bus);

    let count = store
        .load_from_storage()
        .with_context(|| format!("failed to load inventory from slot `{}`", config.storage_key))?;
    tracing::info!(count, key = %config.storage_key, "inventory ready");

    Ok(App { store, changes })
}
