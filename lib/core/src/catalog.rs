use crate::{Error, Item, ItemId, Result};
use ahash::{AHashMap, AHashSet};

/// The fixed, ordered list of recommendable items
///
/// Built once and never mutated. Positions are `0..len()` in storage order.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<Item>,
    /// title -> first position carrying that title
    by_title: AHashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from `(id, title)` records in storage order
    pub fn new(records: Vec<(ItemId, String)>) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::DataCorrupt("catalog contains no items".to_string()));
        }

        let mut seen_ids = AHashSet::with_capacity(records.len());
        let mut by_title = AHashMap::with_capacity(records.len());
        let mut items = Vec::with_capacity(records.len());

        for (position, (id, title)) in records.into_iter().enumerate() {
            if !seen_ids.insert(id.clone()) {
                return Err(Error::DataCorrupt(format!(
                    "duplicate item id {} at position {}",
                    id, position
                )));
            }
            // First occurrence wins for duplicate titles
            by_title.entry(title.clone()).or_insert(position);
            items.push(Item { id, title, position });
        }

        Ok(Self { items, by_title })
    }

    /// First position whose title matches exactly
    pub fn find_position(&self, title: &str) -> Result<usize> {
        self.by_title
            .get(title)
            .copied()
            .ok_or_else(|| Error::NotFound(title.to_string()))
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item_at(&self, position: usize) -> Result<&Item> {
        self.items.get(position).ok_or(Error::OutOfRange {
            position,
            len: self.items.len(),
        })
    }

    /// Titles in position order
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.title.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::new(vec![
            (ItemId::Integer(1), "A".to_string()),
            (ItemId::Integer(2), "B".to_string()),
            (ItemId::Integer(3), "A".to_string()),
        ])
        .unwrap()
    }

    #[test]
    fn test_positions_follow_storage_order() {
        let catalog = sample();
        assert_eq!(catalog.size(), 3);
        for (i, item) in catalog.iter().enumerate() {
            assert_eq!(item.position, i);
        }
        assert_eq!(catalog.titles().collect::<Vec<_>>(), vec!["A", "B", "A"]);
    }

    #[test]
    fn test_find_position_first_match_wins() {
        let catalog = sample();
        assert_eq!(catalog.find_position("A").unwrap(), 0);
        assert_eq!(catalog.find_position("B").unwrap(), 1);
    }

    #[test]
    fn test_find_position_is_exact() {
        let catalog = sample();
        assert_eq!(catalog.find_position("a"), Err(Error::NotFound("a".to_string())));
        assert!(catalog.find_position("A ").is_err());
    }

    #[test]
    fn test_item_at_out_of_range() {
        let catalog = sample();
        assert_eq!(catalog.item_at(2).unwrap().id, ItemId::Integer(3));
        assert_eq!(catalog.item_at(3), Err(Error::OutOfRange { position: 3, len: 3 }));
    }

    #[test]
    fn test_rejects_duplicate_ids_and_empty() {
        let dup = Catalog::new(vec![
            (ItemId::Integer(1), "A".to_string()),
            (ItemId::Integer(1), "B".to_string()),
        ]);
        assert!(matches!(dup, Err(Error::DataCorrupt(_))));
        assert!(matches!(Catalog::new(Vec::new()), Err(Error::DataCorrupt(_))));
    }
}
