use crate::{Card, RenderId};

/// Display-only browsing through the front card's images.
///
/// Follows the card by render id and snaps back to the card's selected image
/// whenever a different card reaches the front. Never feeds back into the
/// controller's used history.
#[derive(Debug, Clone, Default)]
pub struct ImageCarousel {
    render_id: Option<RenderId>,
    index: usize,
}

impl ImageCarousel {
    pub fn sync(&mut self, card: Option<&Card>) {
        let render_id = card.map(|card| card.render_id);
        if render_id == self.render_id {
            return;
        }
        self.render_id = render_id;
        self.index = card.and_then(|card| card.image).unwrap_or(0);
    }

    /// Steps to the next image, wrapping around. No-op with fewer than two images.
    pub fn next_image(&mut self, card: &Card) {
        self.sync(Some(card));
        let count = card.entity.image_count();
        if count > 1 {
            self.index = (self.index + 1) % count;
        }
    }

    pub fn current<'a>(&self, card: &'a Card) -> Option<&'a str> {
        if self.render_id != Some(card.render_id) {
            return card.image_path();
        }
        card.entity
            .images
            .get(self.index)
            .map(String::as_str)
            .or_else(|| card.image_path())
    }

    /// One-based position and total for an "i/n" badge.
    pub fn position(&self, card: &Card) -> (usize, usize) {
        let total = card.entity.image_count().max(1);
        let index = if self.render_id == Some(card.render_id) {
            self.index
        } else {
            card.image.unwrap_or(0)
        };
        (index.min(total - 1) + 1, total)
    }
}
