//! The inventory store: authoritative records, form draft, edit state,
//! filter selection, derived views, and persistence after every mutation.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use equiptrack_core::RecordId;
use equiptrack_events::{EventBus, InMemoryEventBus};

use crate::draft::{DraftField, DraftPatch, FormDraft};
use crate::error::{StoreError, StoreResult};
use crate::events::{
    EditCancelled, EditStarted, InventoryEvent, InventoryLoaded, RecordAdded, RecordRemoved,
    RecordUpdated,
};
use crate::filter::{FilterPatch, FilterSelection};
use crate::presenter::{Presenter, delete_prompt};
use crate::record::EquipmentRecord;
use crate::storage::{STORAGE_KEY, SlotStore, decode_snapshot, encode_snapshot};

/// Which record (if any) the draft overwrites on `save_edit`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditState {
    editing_id: Option<RecordId>,
}

impl EditState {
    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    pub fn editing_id(&self) -> Option<&RecordId> {
        self.editing_id.as_ref()
    }
}

/// Header counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySummary {
    pub total: usize,
    pub available: usize,
    pub loaned: usize,
}

/// Single-owner inventory store.
///
/// Commands take `&mut self`, so they always run to completion one after
/// another. Commands that change state return the matching
/// [`InventoryEvent`] (and publish it when a bus is attached); no-ops return
/// `None`.
///
/// When a write to storage fails the in-memory change stays applied and the
/// error is returned; whatever the command would have done after persisting
/// (draft reset, leaving edit mode, publishing) is skipped. Deleting the
/// record under edit leaves edit mode before the write.
pub struct InventoryStore<S, P> {
    records: Vec<EquipmentRecord>,
    draft: FormDraft,
    edit: EditState,
    filter: FilterSelection,
    storage: S,
    storage_key: String,
    presenter: P,
    bus: Option<Arc<InMemoryEventBus<InventoryEvent>>>,
}

impl<S, P> core::fmt::Debug for InventoryStore<S, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InventoryStore")
            .field("records", &self.records.len())
            .field("draft", &self.draft)
            .field("edit", &self.edit)
            .field("filter", &self.filter)
            .field("storage_key", &self.storage_key)
            .finish_non_exhaustive()
    }
}

impl<S, P> InventoryStore<S, P>
where
    S: SlotStore,
    P: Presenter,
{
    /// Empty store over `storage`. Call [`load_from_storage`](Self::load_from_storage)
    /// once before handing it to the presentation layer.
    pub fn new(storage: S, presenter: P) -> Self {
        Self {
            records: Vec::new(),
            draft: FormDraft::default(),
            edit: EditState::default(),
            filter: FilterSelection::default(),
            storage,
            storage_key: STORAGE_KEY.to_string(),
            presenter,
            bus: None,
        }
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Publish every applied command on `bus`.
    pub fn with_bus(mut self, bus: Arc<InMemoryEventBus<InventoryEvent>>) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Give back the storage handle and presenter.
    pub fn into_parts(self) -> (S, P) {
        (self.storage, self.presenter)
    }

    // ---------------------------------------------------------------------
    // Read side
    // ---------------------------------------------------------------------

    pub fn records(&self) -> &[EquipmentRecord] {
        &self.records
    }

    pub fn record(&self, id: &RecordId) -> Option<&EquipmentRecord> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn edit(&self) -> &EditState {
        &self.edit
    }

    pub fn is_editing(&self) -> bool {
        self.edit.is_editing()
    }

    pub fn filter(&self) -> &FilterSelection {
        &self.filter
    }

    pub fn total_count(&self) -> usize {
        self.records.len()
    }

    pub fn available_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_available()).count()
    }

    pub fn loaned_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_loaned()).count()
    }

    pub fn summary(&self) -> InventorySummary {
        InventorySummary {
            total: self.total_count(),
            available: self.available_count(),
            loaned: self.loaned_count(),
        }
    }

    /// Records matching the current filter, in insertion order.
    pub fn filtered_records(&self) -> Vec<&EquipmentRecord> {
        self.records.iter().filter(|r| self.filter.matches(r)).collect()
    }

    pub fn is_draft_valid(&self) -> bool {
        self.draft.is_valid()
    }

    // ---------------------------------------------------------------------
    // Binding (no validation until a command runs)
    // ---------------------------------------------------------------------

    pub fn update_draft(&mut self, patch: DraftPatch) {
        patch.apply(&mut self.draft);
    }

    pub fn set_draft_field(&mut self, field: DraftField, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    pub fn update_filter(&mut self, patch: FilterPatch) {
        patch.apply(&mut self.filter);
    }

    pub fn clear_filter(&mut self) {
        self.filter.clear();
    }

    // ---------------------------------------------------------------------
    // Commands
    // ---------------------------------------------------------------------

    /// Replace `records` with the persisted collection, if any.
    ///
    /// An absent slot leaves `records` as is. A slot that does not parse
    /// fails with [`StoreError::CorruptSnapshot`] and leaves `records`
    /// untouched.
    pub fn load_from_storage(&mut self) -> StoreResult<usize> {
        let Some(raw) = self.storage.get(&self.storage_key)? else {
            tracing::info!(key = %self.storage_key, "no persisted inventory; starting empty");
            return Ok(self.records.len());
        };

        let records = decode_snapshot(&raw).map_err(|e| StoreError::CorruptSnapshot {
            key: self.storage_key.clone(),
            reason: e.to_string(),
        })?;

        self.records = records;
        let count = self.records.len();
        tracing::info!(key = %self.storage_key, count, "inventory loaded");

        self.publish(InventoryEvent::InventoryLoaded(InventoryLoaded {
            count,
            occurred_at: Utc::now(),
        }));
        Ok(count)
    }

    /// Append a record built from the draft, persist, reset the draft.
    pub fn add_record(&mut self) -> StoreResult<Option<InventoryEvent>> {
        if !self.is_draft_valid() {
            tracing::debug!("add ignored: draft incomplete");
            return Ok(None);
        }

        let record = self.draft.to_record(self.fresh_id())?;
        self.records.push(record.clone());
        self.persist()?;
        self.draft.clear();

        tracing::info!(record_id = %record.id(), "record added");
        let event = InventoryEvent::RecordAdded(RecordAdded {
            record,
            occurred_at: Utc::now(),
        });
        self.publish(event.clone());
        Ok(Some(event))
    }

    /// Load a record into the draft and enter edit mode.
    pub fn begin_edit(&mut self, id: &RecordId) -> Option<InventoryEvent> {
        let Some(record) = self.record(id) else {
            tracing::debug!(record_id = %id, "edit ignored: no such record");
            return None;
        };

        let draft = FormDraft::from_record(record);
        self.draft = draft;
        self.edit.editing_id = Some(id.clone());
        self.presenter.focus_after_render(DraftField::Name);

        let event = InventoryEvent::EditStarted(EditStarted {
            record_id: id.clone(),
            occurred_at: Utc::now(),
        });
        self.publish(event.clone());
        Some(event)
    }

    /// Write the draft over the record being edited, persist, leave edit mode.
    pub fn save_edit(&mut self) -> StoreResult<Option<InventoryEvent>> {
        if !self.is_draft_valid() {
            tracing::debug!("save ignored: draft incomplete");
            return Ok(None);
        }
        let Some(index) = self.edit.editing_id.as_ref().and_then(|id| self.position(id)) else {
            tracing::debug!("save ignored: not editing an existing record");
            return Ok(None);
        };

        let before = self.records[index].clone();
        self.draft.write_into(&mut self.records[index])?;
        let after = self.records[index].clone();
        self.persist()?;

        tracing::info!(record_id = %after.id(), "record updated");
        let event = InventoryEvent::RecordUpdated(RecordUpdated {
            before,
            after,
            occurred_at: Utc::now(),
        });
        self.publish(event.clone());
        self.cancel_edit();
        Ok(Some(event))
    }

    /// Leave edit mode and reset the draft. Nothing is persisted.
    pub fn cancel_edit(&mut self) -> InventoryEvent {
        let record_id = self.edit.editing_id.take();
        self.draft.clear();

        let event = InventoryEvent::EditCancelled(EditCancelled {
            record_id,
            occurred_at: Utc::now(),
        });
        self.publish(event.clone());
        event
    }

    /// Remove a record after the presenter confirms.
    pub fn delete_record(&mut self, id: &RecordId) -> StoreResult<Option<InventoryEvent>> {
        let Some(index) = self.position(id) else {
            tracing::debug!(record_id = %id, "delete ignored: no such record");
            return Ok(None);
        };

        let prompt = delete_prompt(self.records[index].name());
        if !self.presenter.confirm(&prompt) {
            tracing::debug!(record_id = %id, "delete declined");
            return Ok(None);
        }

        let record = self.records.remove(index);
        // Edit mode must never point at a record that is gone, even when the
        // write below fails.
        let was_editing = self.edit.editing_id() == Some(id);
        if was_editing {
            self.edit.editing_id = None;
            self.draft.clear();
        }
        self.persist()?;

        tracing::info!(record_id = %id, "record removed");
        let event = InventoryEvent::RecordRemoved(RecordRemoved {
            record,
            position: index,
            occurred_at: Utc::now(),
        });
        self.publish(event.clone());

        if was_editing {
            self.publish(InventoryEvent::EditCancelled(EditCancelled {
                record_id: Some(id.clone()),
                occurred_at: Utc::now(),
            }));
        }
        Ok(Some(event))
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    /// Overwrite the slot with the full collection.
    fn persist(&self) -> StoreResult<()> {
        let payload = encode_snapshot(&self.records).map_err(StoreError::Encode)?;
        self.storage.put(&self.storage_key, &payload).map_err(|e| {
            tracing::error!(key = %self.storage_key, error = %e, "failed to persist inventory");
            StoreError::from(e)
        })
    }

    fn position(&self, id: &RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    fn fresh_id(&self) -> RecordId {
        loop {
            let id = RecordId::generate();
            if self.position(&id).is_none() {
                return id;
            }
        }
    }

    fn publish(&self, event: InventoryEvent) {
        let Some(bus) = &self.bus else {
            return;
        };
        if let Err(err) = bus.publish(event) {
            tracing::warn!(?err, "failed to publish inventory event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::HeadlessPresenter;
    use crate::storage::{InMemorySlotStore, StorageError};
    use equiptrack_events::Event;

    type TestStore = InventoryStore<Arc<InMemorySlotStore>, HeadlessPresenter>;

    fn store() -> TestStore {
        InventoryStore::new(Arc::new(InMemorySlotStore::new()), HeadlessPresenter::accepting())
    }

    fn fill(store: &mut TestStore, name: &str, category: &str, tag: &str, status: &str) {
        store.update_draft(DraftPatch {
            name: Some(name.into()),
            category: Some(category.into()),
            asset_tag: Some(tag.into()),
            status: Some(status.into()),
        });
    }

    fn add(store: &mut TestStore, name: &str, category: &str, tag: &str, status: &str) -> RecordId {
        fill(store, name, category, tag, status);
        store.add_record().unwrap().expect("record added");
        store.records().last().unwrap().id().clone()
    }

    #[test]
    fn drill_scenario_counts_follow_every_command() {
        let mut store = store();
        let id = add(&mut store, "Drill", "Tools", "T-001", "available");
        assert_eq!(store.summary(), InventorySummary { total: 1, available: 1, loaned: 0 });

        store.begin_edit(&id).unwrap();
        store.set_draft_field(DraftField::Status, "loaned");
        store.save_edit().unwrap().unwrap();
        assert_eq!(store.available_count(), 0);
        assert_eq!(store.loaned_count(), 1);

        store.delete_record(&id).unwrap().unwrap();
        assert_eq!(store.total_count(), 0);
    }

    #[test]
    fn category_filter_selects_only_matching_records() {
        let mut store = store();
        add(&mut store, "Drill", "Tools", "T-001", "available");
        add(&mut store, "Laptop", "Electronics", "E-001", "loaned");

        store.update_filter(FilterPatch::category("Tools"));
        let names: Vec<_> = store.filtered_records().iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["Drill"]);

        store.clear_filter();
        assert_eq!(store.filtered_records().len(), 2);
    }

    #[test]
    fn add_trims_persists_and_resets_draft() {
        let mut store = store();
        fill(&mut store, "  Drill  ", "Tools", " T-001 ", "available");
        let event = store.add_record().unwrap().unwrap();
        assert_eq!(event.event_type(), "inventory.record.added");

        let r = &store.records()[0];
        assert_eq!(r.name(), "Drill");
        assert_eq!(r.asset_tag(), "T-001");
        assert_eq!(store.draft(), &FormDraft::default());

        let raw = store.storage().get(STORAGE_KEY).unwrap().unwrap();
        assert_eq!(decode_snapshot(&raw).unwrap(), store.records());
    }

    #[test]
    fn add_with_incomplete_draft_is_silent_noop() {
        let mut store = store();
        fill(&mut store, "Drill", "", "T-001", "available");
        assert!(!store.is_draft_valid());
        assert!(store.add_record().unwrap().is_none());
        assert!(store.records().is_empty());
        assert_eq!(store.storage().get(STORAGE_KEY).unwrap(), None);
        // Draft is kept so the user can complete it.
        assert_eq!(store.draft().name, "Drill");
    }

    #[test]
    fn begin_edit_copies_fields_and_requests_name_focus() {
        let mut store = store();
        let id = add(&mut store, "Drill", "Tools", "T-001", "available");

        assert!(store.begin_edit(&id).is_some());
        assert!(store.is_editing());
        assert_eq!(store.edit().editing_id(), Some(&id));
        assert_eq!(store.draft().name, "Drill");
        assert_eq!(store.draft().asset_tag, "T-001");
        assert_eq!(store.presenter().focus_requests(), vec![DraftField::Name]);
    }

    #[test]
    fn begin_edit_unknown_id_is_noop() {
        let mut store = store();
        let missing = RecordId::parse("nope").unwrap();
        assert!(store.begin_edit(&missing).is_none());
        assert!(!store.is_editing());
        assert!(store.presenter().focus_requests().is_empty());
    }

    #[test]
    fn save_edit_keeps_id_and_position() {
        let mut store = store();
        add(&mut store, "A", "Tools", "T-1", "available");
        let id = add(&mut store, "B", "Tools", "T-2", "available");
        add(&mut store, "C", "Tools", "T-3", "available");

        store.begin_edit(&id);
        store.update_draft(DraftPatch {
            name: Some(" B2 ".into()),
            category: Some("Electronics".into()),
            ..DraftPatch::default()
        });
        store.save_edit().unwrap().unwrap();

        let r = &store.records()[1];
        assert_eq!(r.id(), &id);
        assert_eq!(r.name(), "B2");
        assert_eq!(r.category(), "Electronics");
        assert!(!store.is_editing());
        assert_eq!(store.draft(), &FormDraft::default());
    }

    #[test]
    fn save_edit_without_edit_mode_is_noop() {
        let mut store = store();
        add(&mut store, "A", "Tools", "T-1", "available");
        fill(&mut store, "B", "Tools", "T-2", "available");
        assert!(store.save_edit().unwrap().is_none());
        assert_eq!(store.records()[0].name(), "A");
    }

    #[test]
    fn save_edit_with_vanished_target_is_noop() {
        let mut store = store();
        let id = add(&mut store, "A", "Tools", "T-1", "available");
        store.begin_edit(&id);
        store.records.clear();

        assert!(store.save_edit().unwrap().is_none());
        assert!(store.records().is_empty());
        // Still editing: a no-op leaves every piece of state as it was.
        assert!(store.is_editing());
    }

    #[test]
    fn save_edit_with_blank_field_is_noop() {
        let mut store = store();
        let id = add(&mut store, "A", "Tools", "T-1", "available");
        store.begin_edit(&id);
        store.set_draft_field(DraftField::Name, "   ");
        assert!(store.save_edit().unwrap().is_none());
        assert_eq!(store.records()[0].name(), "A");
        assert!(store.is_editing());
    }

    #[test]
    fn cancel_edit_resets_draft_and_state() {
        let mut store = store();
        let id = add(&mut store, "A", "Tools", "T-1", "available");
        store.begin_edit(&id);
        store.set_draft_field(DraftField::Name, "changed");

        store.cancel_edit();
        assert!(!store.is_editing());
        assert_eq!(store.draft(), &FormDraft::default());
        assert_eq!(store.records()[0].name(), "A");
    }

    #[test]
    fn delete_prompts_with_record_name() {
        let mut store = store();
        let id = add(&mut store, "Drill", "Tools", "T-1", "available");
        store.delete_record(&id).unwrap();
        assert_eq!(
            store.presenter().prompts(),
            vec!["Are you sure you want to remove \"Drill\"?".to_string()]
        );
    }

    #[test]
    fn declined_delete_changes_nothing() {
        let storage = Arc::new(InMemorySlotStore::new());
        let mut store = InventoryStore::new(storage, HeadlessPresenter::declining());
        store.update_draft(DraftPatch {
            name: Some("Drill".into()),
            category: Some("Tools".into()),
            asset_tag: Some("T-1".into()),
            status: Some("available".into()),
        });
        store.add_record().unwrap();
        let id = store.records()[0].id().clone();

        assert!(store.delete_record(&id).unwrap().is_none());
        assert_eq!(store.total_count(), 1);
        assert_eq!(store.presenter().prompts().len(), 1);
    }

    #[test]
    fn delete_unknown_id_does_not_prompt() {
        let mut store = store();
        add(&mut store, "Drill", "Tools", "T-1", "available");
        let missing = RecordId::parse("missing").unwrap();
        assert!(store.delete_record(&missing).unwrap().is_none());
        assert!(store.presenter().prompts().is_empty());
        assert_eq!(store.total_count(), 1);
    }

    #[test]
    fn deleting_the_edited_record_leaves_edit_mode() {
        let mut store = store();
        let keep = add(&mut store, "A", "Tools", "T-1", "available");
        let gone = add(&mut store, "B", "Tools", "T-2", "available");

        store.begin_edit(&gone);
        store.delete_record(&gone).unwrap().unwrap();
        assert!(!store.is_editing());
        assert_eq!(store.draft(), &FormDraft::default());

        let other = add(&mut store, "C", "Tools", "T-3", "available");
        store.begin_edit(&keep);
        store.delete_record(&other).unwrap().unwrap();
        assert_eq!(store.edit().editing_id(), Some(&keep));
    }

    #[test]
    fn missing_slot_loads_as_empty() {
        let mut store = store();
        assert_eq!(store.load_from_storage().unwrap(), 0);
        assert!(store.records().is_empty());
    }

    #[test]
    fn malformed_slot_fails_fast_and_keeps_records_empty() {
        let storage = Arc::new(InMemorySlotStore::with_value(STORAGE_KEY, "[{\"id\":"));
        let mut store = InventoryStore::new(storage, HeadlessPresenter::accepting());

        let err = store.load_from_storage().unwrap_err();
        match err {
            StoreError::CorruptSnapshot { key, .. } => assert_eq!(key, STORAGE_KEY),
            other => panic!("expected CorruptSnapshot, got {other:?}"),
        }
        assert!(store.records().is_empty());
    }

    #[test]
    fn legacy_snapshot_loads() {
        let raw = r#"[
            {"id":"1700000000001","nome":"Dom Casmurro","categoria":"Romance","patrimonio":"L-1","status":"available"},
            {"id":"1700000000002","nome":"Iracema","categoria":"Romance","patrimonio":"L-2","status":"loaned"}
        ]"#;
        let storage = Arc::new(InMemorySlotStore::with_value("equipamentos", raw));
        let mut store = InventoryStore::new(storage, HeadlessPresenter::accepting())
            .with_storage_key("equipamentos");

        assert_eq!(store.load_from_storage().unwrap(), 2);
        assert_eq!(store.summary(), InventorySummary { total: 2, available: 1, loaned: 1 });
        assert_eq!(store.records()[1].asset_tag(), "L-2");
    }

    #[test]
    fn blank_id_in_snapshot_is_rejected() {
        let raw = r#"[{"id":"","name":"Drill","category":"Tools","assetTag":"T-1","status":"available"}]"#;
        let storage = Arc::new(InMemorySlotStore::with_value(STORAGE_KEY, raw));
        let mut store = InventoryStore::new(storage, HeadlessPresenter::accepting());

        assert!(matches!(
            store.load_from_storage(),
            Err(StoreError::CorruptSnapshot { .. })
        ));
        assert!(store.records().is_empty());
    }

    #[test]
    fn write_failure_is_reported_and_draft_kept() {
        let storage = Arc::new(InMemorySlotStore::new());
        let mut store = InventoryStore::new(storage.clone(), HeadlessPresenter::accepting());
        storage.set_fail_writes(true);

        fill(&mut store, "Drill", "Tools", "T-1", "available");
        let err = store.add_record().unwrap_err();
        assert!(matches!(err, StoreError::Storage(StorageError::QuotaExceeded)));
        assert!(err.is_storage());

        // In-memory list stays authoritative; the next good write catches up.
        assert_eq!(store.total_count(), 1);
        assert_eq!(store.draft().name, "Drill");

        storage.set_fail_writes(false);
        add(&mut store, "Saw", "Tools", "T-2", "available");
        let raw = storage.get(STORAGE_KEY).unwrap().unwrap();
        assert_eq!(decode_snapshot(&raw).unwrap().len(), 2);
    }

    #[test]
    fn failed_save_keeps_edit_mode_and_publishes_nothing() {
        let storage = Arc::new(InMemorySlotStore::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let mut store = InventoryStore::new(storage.clone(), HeadlessPresenter::accepting())
            .with_bus(bus.clone());
        let id = add(&mut store, "Drill", "Tools", "T-1", "available");
        store.begin_edit(&id);
        store.set_draft_field(DraftField::Status, "loaned");

        let sub = bus.subscribe();
        storage.set_fail_writes(true);
        let err = store.save_edit().unwrap_err();
        assert!(err.is_storage());

        // Overwrite applied in memory, edit mode and draft untouched.
        assert_eq!(store.records()[0].status(), "loaned");
        assert_eq!(store.edit().editing_id(), Some(&id));
        assert_eq!(store.draft().status, "loaned");
        assert!(sub.drain().is_empty());

        let raw = storage.get(STORAGE_KEY).unwrap().unwrap();
        assert_eq!(decode_snapshot(&raw).unwrap()[0].status(), "available");
    }

    #[test]
    fn failed_delete_of_edited_record_leaves_edit_mode() {
        let storage = Arc::new(InMemorySlotStore::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let mut store = InventoryStore::new(storage.clone(), HeadlessPresenter::accepting())
            .with_bus(bus.clone());
        let id = add(&mut store, "Drill", "Tools", "T-1", "available");
        store.begin_edit(&id);

        let sub = bus.subscribe();
        storage.set_fail_writes(true);
        let err = store.delete_record(&id).unwrap_err();
        assert!(matches!(err, StoreError::Storage(StorageError::QuotaExceeded)));

        assert_eq!(store.total_count(), 0);
        assert!(!store.is_editing());
        assert_eq!(store.draft(), &FormDraft::default());
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn failed_delete_of_other_record_keeps_edit_mode() {
        let storage = Arc::new(InMemorySlotStore::new());
        let mut store = InventoryStore::new(storage.clone(), HeadlessPresenter::accepting());
        let keep = add(&mut store, "Drill", "Tools", "T-1", "available");
        let gone = add(&mut store, "Saw", "Tools", "T-2", "available");
        store.begin_edit(&keep);

        storage.set_fail_writes(true);
        assert!(store.delete_record(&gone).is_err());
        assert_eq!(store.total_count(), 1);
        assert_eq!(store.edit().editing_id(), Some(&keep));
        assert_eq!(store.draft().name, "Drill");
    }

    #[test]
    fn bus_subscribers_see_applied_commands_only() {
        let bus = Arc::new(InMemoryEventBus::new());
        let sub = bus.subscribe();
        let mut store = store().with_bus(bus);

        store.add_record().unwrap(); // incomplete draft: no event
        let id = add(&mut store, "Drill", "Tools", "T-1", "available");
        store.begin_edit(&id);
        store.save_edit().unwrap();

        let types: Vec<_> = sub.drain().iter().map(|e| e.event_type()).collect();
        assert_eq!(
            types,
            vec![
                "inventory.record.added",
                "inventory.edit.started",
                "inventory.record.updated",
                "inventory.edit.cancelled",
            ]
        );
    }

    #[test]
    fn custom_storage_key_is_used() {
        let mut store = store().with_storage_key("books");
        add(&mut store, "Drill", "Tools", "T-1", "available");
        assert!(store.storage().get("books").unwrap().is_some());
        assert!(store.storage().get(STORAGE_KEY).unwrap().is_none());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn category() -> impl Strategy<Value = String> {
            prop::sample::select(vec!["Tools", "Electronics", "Books"]).prop_map(String::from)
        }

        fn status() -> impl Strategy<Value = String> {
            prop::sample::select(vec!["available", "loaned", "repair"]).prop_map(String::from)
        }

        fn valid_draft() -> impl Strategy<Value = FormDraft> {
            (
                "[ ]{0,2}[A-Za-z][A-Za-z0-9 ]{0,15}",
                category(),
                "[ ]{0,2}[A-Z]-[0-9]{1,4}[ ]{0,2}",
                status(),
            )
                .prop_map(|(name, category, asset_tag, status)| FormDraft {
                    name,
                    category,
                    asset_tag,
                    status,
                })
        }

        fn seeded(drafts: &[FormDraft]) -> TestStore {
            let mut store = store();
            for d in drafts {
                store.update_draft(DraftPatch {
                    name: Some(d.name.clone()),
                    category: Some(d.category.clone()),
                    asset_tag: Some(d.asset_tag.clone()),
                    status: Some(d.status.clone()),
                });
                store.add_record().unwrap();
            }
            store
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: a valid draft adds exactly one trimmed record at the end.
            #[test]
            fn add_appends_exactly_one_trimmed_record(
                existing in prop::collection::vec(valid_draft(), 0..5),
                draft in valid_draft(),
            ) {
                let mut store = seeded(&existing);
                let before = store.total_count();

                store.update_draft(DraftPatch {
                    name: Some(draft.name.clone()),
                    category: Some(draft.category.clone()),
                    asset_tag: Some(draft.asset_tag.clone()),
                    status: Some(draft.status.clone()),
                });
                store.add_record().unwrap();

                prop_assert_eq!(store.total_count(), before + 1);
                let last = store.records().last().unwrap();
                prop_assert_eq!(last.name(), draft.name.trim());
                prop_assert_eq!(last.asset_tag(), draft.asset_tag.trim());
                prop_assert_eq!(last.category(), draft.category.as_str());
                prop_assert_eq!(last.status(), draft.status.as_str());
            }

            /// Property: any blank required field blocks add.
            #[test]
            fn incomplete_draft_never_adds(draft in valid_draft(), blank in 0usize..4) {
                let mut store = store();
                let mut draft = draft;
                match blank {
                    0 => draft.name = "  ".into(),
                    1 => draft.category = String::new(),
                    2 => draft.asset_tag = " ".into(),
                    _ => draft.status = String::new(),
                }
                store.update_draft(DraftPatch {
                    name: Some(draft.name),
                    category: Some(draft.category),
                    asset_tag: Some(draft.asset_tag),
                    status: Some(draft.status),
                });

                prop_assert!(store.add_record().unwrap().is_none());
                prop_assert!(store.records().is_empty());
            }

            /// Property: edit + save with an untouched draft is observably a no-op.
            #[test]
            fn unmodified_edit_round_trip_preserves_records(
                drafts in prop::collection::vec(valid_draft(), 1..6),
                pick in any::<prop::sample::Index>(),
            ) {
                let mut store = seeded(&drafts);
                let before = store.records().to_vec();
                let id = before[pick.index(before.len())].id().clone();

                store.begin_edit(&id);
                store.save_edit().unwrap();

                prop_assert_eq!(store.records(), before.as_slice());
                prop_assert!(!store.is_editing());
            }

            /// Property: confirmed delete removes exactly the target, order preserved.
            #[test]
            fn confirmed_delete_removes_only_target(
                drafts in prop::collection::vec(valid_draft(), 1..6),
                pick in any::<prop::sample::Index>(),
                confirm in any::<bool>(),
            ) {
                let mut store = seeded(&drafts);
                store.presenter.set_answer(confirm);
                let before = store.records().to_vec();
                let target = pick.index(before.len());
                let id = before[target].id().clone();

                store.delete_record(&id).unwrap();

                if confirm {
                    let mut expected = before.clone();
                    expected.remove(target);
                    prop_assert_eq!(store.records(), expected.as_slice());
                } else {
                    prop_assert_eq!(store.records(), before.as_slice());
                }
            }

            /// Property: filtered view is an order-preserving subsequence that
            /// keeps exactly the matching records.
            #[test]
            fn filtered_view_is_exact(
                drafts in prop::collection::vec(valid_draft(), 0..8),
                cat in prop::option::of(category()),
                st in prop::option::of(status()),
            ) {
                let mut store = seeded(&drafts);
                store.update_filter(FilterPatch {
                    category: Some(cat.clone().unwrap_or_default()),
                    status: Some(st.clone().unwrap_or_default()),
                });

                let filtered: Vec<EquipmentRecord> =
                    store.filtered_records().into_iter().cloned().collect();
                let expected: Vec<EquipmentRecord> = store
                    .records()
                    .iter()
                    .filter(|r| {
                        cat.as_deref().is_none_or(|c| r.category() == c)
                            && st.as_deref().is_none_or(|s| r.status() == s)
                    })
                    .cloned()
                    .collect();
                prop_assert_eq!(filtered, expected);
            }

            /// Property: persist then load reproduces the collection.
            #[test]
            fn persist_then_load_round_trips(drafts in prop::collection::vec(valid_draft(), 0..6)) {
                let store = seeded(&drafts);
                let storage = Arc::clone(store.storage());

                let mut reloaded = InventoryStore::new(storage, HeadlessPresenter::accepting());
                reloaded.load_from_storage().unwrap();
                prop_assert_eq!(reloaded.records(), store.records());
            }
        }
    }
}
