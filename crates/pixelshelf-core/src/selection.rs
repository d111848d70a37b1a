//! Multi-select state for batch actions in the gallery

use std::collections::HashSet;

use uuid::Uuid;

use crate::error::ValidationError;
use crate::models::{BatchDelete, BatchUpdate};

/// Most images the backend accepts in one batch request
pub const MAX_BATCH: usize = 100;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionSet {
    selected: HashSet<Uuid>,
    selection_mode: bool,
}

impl SelectionSet {
    pub fn is_selection_mode(&self) -> bool {
        self.selection_mode
    }

    pub fn is_selected(&self, id: &Uuid) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &Uuid> {
        self.selected.iter()
    }

    pub fn toggle(&mut self, id: Uuid) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    /// Replace the selection with exactly `ids`
    pub fn select_all(&mut self, ids: impl IntoIterator<Item = Uuid>) {
        self.selected = ids.into_iter().collect();
    }

    /// Empty the selection and leave selection mode
    pub fn clear(&mut self) {
        self.selected.clear();
        self.selection_mode = false;
    }

    /// Selected ids in a stable order, checked against the batch limits
    pub fn batch_ids(&self) -> Result<Vec<Uuid>, ValidationError> {
        let len = self.selected.len();
        if len == 0 {
            return Err(ValidationError::EmptySelection);
        }
        if len > MAX_BATCH {
            return Err(ValidationError::SelectionTooLarge { len, max: MAX_BATCH });
        }
        let mut ids: Vec<Uuid> = self.selected.iter().copied().collect();
        ids.sort();
        Ok(ids)
    }

    /// Set the star rating of every selected image; 0 clears it
    pub fn rate(&self, rating: u8) -> Result<BatchUpdate, ValidationError> {
        Ok(BatchUpdate {
            ids: self.batch_ids()?,
            rating: Some(rating.min(5)),
            ..Default::default()
        })
    }

    pub fn favorite(&self, favorite: bool) -> Result<BatchUpdate, ValidationError> {
        Ok(BatchUpdate {
            ids: self.batch_ids()?,
            is_favorite: Some(favorite),
            ..Default::default()
        })
    }

    /// Tag every selected image. Tags are lowercased like the backend stores them.
    pub fn add_tag(&self, tag: &str) -> Result<Option<BatchUpdate>, ValidationError> {
        let tag = tag.trim().to_lowercase();
        if tag.is_empty() {
            return Ok(None);
        }
        Ok(Some(BatchUpdate {
            ids: self.batch_ids()?,
            add_tags: Some(vec![tag]),
            ..Default::default()
        }))
    }

    /// Move the selection to the trash
    pub fn trash(&self) -> Result<BatchDelete, ValidationError> {
        Ok(BatchDelete {
            ids: self.batch_ids()?,
            permanent: false,
        })
    }

    /// Leaving selection mode drops the selection
    pub fn set_selection_mode(&mut self, enabled: bool) {
        self.selection_mode = enabled;
        if !enabled {
            self.selected.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    #[test]
    fn test_toggle() {
        let mut selection = SelectionSet::default();
        selection.toggle(id(1));
        selection.toggle(id(2));
        selection.toggle(id(1));
        assert!(!selection.is_selected(&id(1)));
        assert!(selection.is_selected(&id(2)));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_select_all_replaces() {
        let mut selection = SelectionSet::default();
        selection.toggle(id(9));
        selection.select_all([id(1), id(2), id(3)]);
        assert_eq!(selection.len(), 3);
        assert!(!selection.is_selected(&id(9)));
    }

    #[test]
    fn test_batch_requests_use_sorted_ids() {
        let mut selection = SelectionSet::default();
        selection.toggle(id(3));
        selection.toggle(id(1));
        let update = selection.rate(9).unwrap();
        assert_eq!(update.ids, vec![id(1), id(3)]);
        assert_eq!(update.rating, Some(5));
        assert_eq!(update.is_favorite, None);

        assert_eq!(selection.favorite(true).unwrap().is_favorite, Some(true));
        assert_eq!(selection.trash().unwrap().ids.len(), 2);
    }

    #[test]
    fn test_batch_tag_is_lowercased_and_blank_is_skipped() {
        let mut selection = SelectionSet::default();
        selection.toggle(id(1));
        let update = selection.add_tag("  Sunset ").unwrap().unwrap();
        assert_eq!(update.add_tags, Some(vec!["sunset".to_string()]));
        assert_eq!(selection.add_tag("   ").unwrap(), None);
    }

    #[test]
    fn test_batch_limits() {
        let mut selection = SelectionSet::default();
        assert_eq!(selection.trash(), Err(ValidationError::EmptySelection));

        selection.select_all((0..=MAX_BATCH as u128).map(id));
        assert_eq!(
            selection.rate(3),
            Err(ValidationError::SelectionTooLarge { len: MAX_BATCH + 1, max: MAX_BATCH })
        );
    }

    #[test]
    fn test_clear_and_mode() {
        let mut selection = SelectionSet::default();
        selection.set_selection_mode(true);
        selection.toggle(id(1));
        selection.set_selection_mode(true);
        assert_eq!(selection.len(), 1);

        selection.clear();
        assert!(selection.is_empty());
        assert!(!selection.is_selection_mode());

        selection.set_selection_mode(true);
        selection.toggle(id(4));
        selection.set_selection_mode(false);
        assert!(selection.is_empty());
    }
}
