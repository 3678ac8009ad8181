//! Filter selection over category and status.

use serde::{Deserialize, Serialize};

use crate::record::EquipmentRecord;

/// Active filter. `None` (or an empty string) means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub category: Option<String>,
    pub status: Option<String>,
}

impl FilterSelection {
    pub fn matches(&self, record: &EquipmentRecord) -> bool {
        dimension_matches(self.category.as_deref(), record.category())
            && dimension_matches(self.status.as_deref(), record.status())
    }

    pub fn is_empty(&self) -> bool {
        constraint(self.category.as_deref()).is_none() && constraint(self.status.as_deref()).is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Partial filter update. A `Some("")` value clears that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPatch {
    pub category: Option<String>,
    pub status: Option<String>,
}

impl FilterPatch {
    pub fn category(value: impl Into<String>) -> Self {
        Self {
            category: Some(value.into()),
            status: None,
        }
    }

    pub fn status(value: impl Into<String>) -> Self {
        Self {
            category: None,
            status: Some(value.into()),
        }
    }

    pub fn apply(self, filter: &mut FilterSelection) {
        if let Some(v) = self.category {
            filter.category = normalize(v);
        }
        if let Some(v) = self.status {
            filter.status = normalize(v);
        }
    }
}

fn normalize(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

fn constraint(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn dimension_matches(wanted: Option<&str>, actual: &str) -> bool {
    constraint(wanted).is_none_or(|w| w == actual)
}
