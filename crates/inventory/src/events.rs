use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use equiptrack_core::RecordId;
use equiptrack_events::Event;

use crate::record::EquipmentRecord;

/// Event: RecordAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordAdded {
    pub record: EquipmentRecord,
    pub occurred_at: DateTime<Utc>,
}

/// Event: RecordUpdated (fields replaced in place, same id and position).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordUpdated {
    pub before: EquipmentRecord,
    pub after: EquipmentRecord,
    pub occurred_at: DateTime<Utc>,
}

/// Event: RecordRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRemoved {
    pub record: EquipmentRecord,
    pub position: usize,
    pub occurred_at: DateTime<Utc>,
}

/// Event: EditStarted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditStarted {
    pub record_id: RecordId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: EditCancelled (draft and edit state reset).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditCancelled {
    pub record_id: Option<RecordId>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: InventoryLoaded (records replaced from storage).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryLoaded {
    pub count: usize,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryEvent {
    RecordAdded(RecordAdded),
    RecordUpdated(RecordUpdated),
    RecordRemoved(RecordRemoved),
    EditStarted(EditStarted),
    EditCancelled(EditCancelled),
    InventoryLoaded(InventoryLoaded),
}

impl Event for InventoryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::RecordAdded(_) => "inventory.record.added",
            InventoryEvent::RecordUpdated(_) => "inventory.record.updated",
            InventoryEvent::RecordRemoved(_) => "inventory.record.removed",
            InventoryEvent::EditStarted(_) => "inventory.edit.started",
            InventoryEvent::EditCancelled(_) => "inventory.edit.cancelled",
            InventoryEvent::InventoryLoaded(_) => "inventory.loaded",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            InventoryEvent::RecordAdded(e) => e.occurred_at,
            InventoryEvent::RecordUpdated(e) => e.occurred_at,
            InventoryEvent::RecordRemoved(e) => e.occurred_at,
            InventoryEvent::EditStarted(e) => e.occurred_at,
            InventoryEvent::EditCancelled(e) => e.occurred_at,
            InventoryEvent::InventoryLoaded(e) => e.occurred_at,
        }
    }
}
