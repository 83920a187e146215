use crate::Entity;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("io error: {0}")]
    Io(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("{0}")]
    Message(String),
}

/// Supplies the entity catalog. Implementations may block; the shell runs
/// them off the UI thread and hands the result to
/// [`Controller::finish_load`](crate::Controller::finish_load).
pub trait CatalogSource: Send {
    fn load_catalog(&self) -> Result<Vec<Entity>, LoadError>;
}

/// In-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entities: Vec<Entity>,
}

impl StaticCatalog {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }
}

impl CatalogSource for StaticCatalog {
    fn load_catalog(&self) -> Result<Vec<Entity>, LoadError> {
        Ok(self.entities.clone())
    }
}
