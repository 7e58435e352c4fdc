//! Sidebar geographic filter selections.
//!
//! DESIGN
//! ======
//! Selections are kept in insertion order and keyed by `(kind, id)`; adding
//! an entity twice is a no-op.

#[cfg(test)]
#[path = "geography_test.rs"]
mod geography_test;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::GEOGRAPHY_KEY;
use crate::util::storage::{KeyValueStore, StorageError, load_json, save_json};

/// Administrative level of a selectable area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoKind {
    Country,
    Region,
    Province,
    Department,
}

impl GeoKind {
    pub const ALL: [Self; 4] = [Self::Country, Self::Region, Self::Province, Self::Department];

    pub fn label(self) -> &'static str {
        match self {
            Self::Country => "Pays",
            Self::Region => "Région",
            Self::Province => "Province",
            Self::Department => "Département",
        }
    }
}

impl fmt::Display for GeoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Country => "country",
            Self::Region => "region",
            Self::Province => "province",
            Self::Department => "department",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoSelection {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: GeoKind,
    pub name: String,
}

impl GeoSelection {
    pub fn new(kind: GeoKind, id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), kind, name: name.into() }
    }

    fn is(&self, kind: GeoKind, id: &str) -> bool {
        self.kind == kind && self.id == id
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoSelections {
    #[serde(rename = "selectedEntities")]
    entities: Vec<GeoSelection>,
}

impl GeoSelections {
    /// Restore persisted selections; missing or corrupt data yields none.
    pub fn load(store: &impl KeyValueStore) -> Self {
        load_json(store, GEOGRAPHY_KEY).unwrap_or_default()
    }

    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    pub fn save(&self, store: &impl KeyValueStore) -> Result<(), StorageError> {
        save_json(store, GEOGRAPHY_KEY, self)
    }

    pub fn entities(&self) -> &[GeoSelection] {
        &self.entities
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, kind: GeoKind, id: &str) -> bool {
        self.entities.iter().any(|e| e.is(kind, id))
    }

    /// Append `entity` unless an entity with the same kind and id is present.
    /// Returns whether it was added.
    pub fn add(&mut self, entity: GeoSelection) -> bool {
        if self.contains(entity.kind, &entity.id) {
            log::debug!("geography: {} {} already selected", entity.kind, entity.id);
            return false;
        }
        self.entities.push(entity);
        true
    }

    pub fn remove(&mut self, kind: GeoKind, id: &str) {
        self.entities.retain(|e| !e.is(kind, id));
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }
}
