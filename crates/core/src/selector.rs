use crate::{Entity, RngState, UsedSet};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("entity {0} has no images")]
    NoImageAvailable(String),
}

/// Picks which image of `entity` the next card shows.
///
/// Prefers indices that are neither recorded in `used` nor equal to
/// `exclude`. Once every image is used it falls back to any index except
/// `exclude`, and to index 0 when that is the only image there is. `used` is
/// only read; the caller records the result.
pub fn select_image(
    entity: &Entity,
    used: &UsedSet,
    exclude: Option<usize>,
    rng: &mut RngState,
) -> Result<usize, SelectError> {
    let count = entity.image_count();
    if count == 0 {
        return Err(SelectError::NoImageAvailable(entity.id.to_string()));
    }
    let not_excluded = |idx: &usize| Some(*idx) != exclude;

    let fresh: Vec<usize> = (0..count)
        .filter(not_excluded)
        .filter(|idx| !used.contains(&entity.id, *idx))
        .collect();
    if let Some(idx) = rng.pick(&fresh) {
        return Ok(idx);
    }

    let fallback: Vec<usize> = (0..count).filter(not_excluded).collect();
    Ok(rng.pick(&fallback).unwrap_or(0))
}
