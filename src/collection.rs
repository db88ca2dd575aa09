use serde::{Deserialize, Serialize};

use crate::item::{Item, ItemId};

/// Every learnable item, in insertion order. The engine reads and replaces
/// items here but never removes one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    items: Vec<Item>,
}

impl Collection {
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Swaps in a new version of an existing item. Hands the item back if its
    /// id is unknown.
    pub fn replace(&mut self, item: Item) -> Result<(), Item> {
        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => {
                *existing = item;
                Ok(())
            }
            None => Err(item),
        }
    }

    pub fn append(&mut self, item: Item) {
        self.items.push(item);
    }
}

impl From<Vec<Item>> for Collection {
    fn from(items: Vec<Item>) -> Self {
        Self { items }
    }
}

impl From<Collection> for Vec<Item> {
    fn from(collection: Collection) -> Self {
        collection.items
    }
}
