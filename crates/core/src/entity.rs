use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawEntityId", into = "String")]
pub struct EntityId(String);

/// Catalog files carry ids as either numbers or strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntityId {
    Number(u64),
    Text(String),
}

impl From<RawEntityId> for EntityId {
    fn from(value: RawEntityId) -> Self {
        match value {
            RawEntityId::Number(num) => Self(num.to_string()),
            RawEntityId::Text(text) => Self(text),
        }
    }
}

impl From<EntityId> for String {
    fn from(value: EntityId) -> Self {
        value.0
    }
}

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    /// Years; fractional for kittens.
    pub age: f64,
    #[serde(default, alias = "breed")]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Entity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(id),
            name: name.into(),
            age: 0.0,
            category: String::new(),
            description: String::new(),
            images: Vec::new(),
        }
    }

    pub fn with_images<I, S>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.images = images.into_iter().map(Into::into).collect();
        self
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }
}

/// Identity handed to the renderer so a re-shown entity still gets a fresh card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RenderId(pub u64);

impl fmt::Display for RenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub entity: Arc<Entity>,
    /// `None` when the entity has no images and the card is shown degraded.
    pub image: Option<usize>,
    pub render_id: RenderId,
}

impl Card {
    pub fn image_path(&self) -> Option<&str> {
        self.image
            .and_then(|idx| self.entity.images.get(idx))
            .map(String::as_str)
    }

    pub fn is_degraded(&self) -> bool {
        self.image.is_none()
    }
}
