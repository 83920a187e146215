use cinder_core::{Entity, EntityId};
use serde::{Deserialize, Serialize};

/// Contents of an entity folder's `meta.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityMeta {
    /// Falls back to the folder name.
    #[serde(default)]
    pub id: Option<EntityId>,
    pub name: String,
    #[serde(default)]
    pub age: f64,
    #[serde(default, alias = "breed")]
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Image file names relative to the folder. Scanned from disk when absent.
    #[serde(default)]
    pub images: Option<Vec<String>>,
}

impl EntityMeta {
    pub fn into_entity(self, folder: &str, images: Vec<String>) -> Entity {
        Entity {
            id: self.id.unwrap_or_else(|| EntityId::new(folder)),
            name: self.name,
            age: self.age,
            category: self.category,
            description: self.description,
            images,
        }
    }
}

/// Optional `catalog.json` fixing which folders load and in what order.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CatalogIndex {
    Folders(Vec<String>),
    Object { folders: Vec<String> },
}

impl CatalogIndex {
    pub fn folders(self) -> Vec<String> {
        match self {
            Self::Folders(folders) | Self::Object { folders } => folders,
        }
    }
}
