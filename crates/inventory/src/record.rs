use serde::{Deserialize, Serialize};

use equiptrack_core::{DomainError, DomainResult, RecordId};

/// Status value counted by `available_count`.
pub const STATUS_AVAILABLE: &str = "available";

/// Status value counted by `loaned_count`.
pub const STATUS_LOANED: &str = "loaned";

/// A tracked piece of equipment (or book).
///
/// `category` and `status` are open sets: any non-empty value is accepted and
/// only [`STATUS_AVAILABLE`] / [`STATUS_LOANED`] feed the derived counters.
///
/// The serialized form uses `assetTag`; the keys written by the first
/// browser-based release (`nome`, `categoria`, `patrimonio`) are accepted on
/// read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentRecord {
    id: RecordId,
    #[serde(alias = "nome")]
    name: String,
    #[serde(alias = "categoria")]
    category: String,
    #[serde(alias = "patrimonio")]
    asset_tag: String,
    status: String,
}

impl EquipmentRecord {
    /// Build a record, trimming `name` and `asset_tag`.
    ///
    /// Every field must be non-empty afterwards.
    pub fn new(
        id: RecordId,
        name: &str,
        category: &str,
        asset_tag: &str,
        status: &str,
    ) -> DomainResult<Self> {
        let mut record = Self {
            id,
            name: String::new(),
            category: String::new(),
            asset_tag: String::new(),
            status: String::new(),
        };
        record.overwrite(name, category, asset_tag, status)?;
        Ok(record)
    }

    /// Replace the four editable fields in place; `id` is untouched.
    ///
    /// On error the record is left unchanged.
    pub fn overwrite(
        &mut self,
        name: &str,
        category: &str,
        asset_tag: &str,
        status: &str,
    ) -> DomainResult<()> {
        let name = name.trim();
        let asset_tag = asset_tag.trim();

        if name.is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if category.is_empty() {
            return Err(DomainError::validation("category cannot be empty"));
        }
        if asset_tag.is_empty() {
            return Err(DomainError::validation("asset tag cannot be empty"));
        }
        if status.is_empty() {
            return Err(DomainError::validation("status cannot be empty"));
        }

        self.name = name.to_string();
        self.category = category.to_string();
        self.asset_tag = asset_tag.to_string();
        self.status = status.to_string();
        Ok(())
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn asset_tag(&self) -> &str {
        &self.asset_tag
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_available(&self) -> bool {
        self.status == STATUS_AVAILABLE
    }

    pub fn is_loaned(&self) -> bool {
        self.status == STATUS_LOANED
    }
}
