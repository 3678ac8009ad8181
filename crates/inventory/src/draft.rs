//! Form draft: the scratch copy of the editable fields.

use serde::{Deserialize, Serialize};

use equiptrack_core::{DomainResult, RecordId};

use crate::record::EquipmentRecord;

/// One of the four editable fields. Used for focus requests and by
/// presentation layers that bind inputs individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DraftField {
    Name,
    Category,
    AssetTag,
    Status,
}

impl DraftField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftField::Name => "name",
            DraftField::Category => "category",
            DraftField::AssetTag => "assetTag",
            DraftField::Status => "status",
        }
    }
}

impl core::str::FromStr for DraftField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(DraftField::Name),
            "category" => Ok(DraftField::Category),
            "assetTag" | "asset_tag" | "tag" => Ok(DraftField::AssetTag),
            "status" => Ok(DraftField::Status),
            other => Err(format!("unknown field `{other}`")),
        }
    }
}

/// Unvalidated form state. Written freely by the presentation layer and
/// only checked when a command runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDraft {
    pub name: String,
    pub category: String,
    pub asset_tag: String,
    pub status: String,
}

impl FormDraft {
    /// Draft pre-filled from an existing record.
    pub fn from_record(record: &EquipmentRecord) -> Self {
        Self {
            name: record.name().to_string(),
            category: record.category().to_string(),
            asset_tag: record.asset_tag().to_string(),
            status: record.status().to_string(),
        }
    }

    /// `name` and `asset_tag` are checked trimmed; `category` and `status`
    /// come from select inputs and are checked as-is.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.category.is_empty()
            && !self.asset_tag.trim().is_empty()
            && !self.status.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn field(&self, field: DraftField) -> &str {
        match field {
            DraftField::Name => &self.name,
            DraftField::Category => &self.category,
            DraftField::AssetTag => &self.asset_tag,
            DraftField::Status => &self.status,
        }
    }

    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        match field {
            DraftField::Name => self.name = value,
            DraftField::Category => self.category = value,
            DraftField::AssetTag => self.asset_tag = value,
            DraftField::Status => self.status = value,
        }
    }

    /// Materialize the draft as a new record.
    pub fn to_record(&self, id: RecordId) -> DomainResult<EquipmentRecord> {
        EquipmentRecord::new(id, &self.name, &self.category, &self.asset_tag, &self.status)
    }

    /// Write the draft over an existing record (id and position untouched).
    pub fn write_into(&self, record: &mut EquipmentRecord) -> DomainResult<()> {
        record.overwrite(&self.name, &self.category, &self.asset_tag, &self.status)
    }
}

/// Partial draft update: `Some` fields overwrite, `None` fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub asset_tag: Option<String>,
    pub status: Option<String>,
}

impl DraftPatch {
    /// Patch touching a single field.
    pub fn field(field: DraftField, value: impl Into<String>) -> Self {
        let mut patch = Self::default();
        let value = Some(value.into());
        match field {
            DraftField::Name => patch.name = value,
            DraftField::Category => patch.category = value,
            DraftField::AssetTag => patch.asset_tag = value,
            DraftField::Status => patch.status = value,
        }
        patch
    }

    pub fn apply(self, draft: &mut FormDraft) {
        if let Some(v) = self.name {
            draft.name = v;
        }
        if let Some(v) = self.category {
            draft.category = v;
        }
        if let Some(v) = self.asset_tag {
            draft.asset_tag = v;
        }
        if let Some(v) = self.status {
            draft.status = v;
        }
    }
}
