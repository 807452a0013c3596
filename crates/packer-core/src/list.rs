use tracing::{debug, info, warn};

use crate::item::{Item, ItemId};
use crate::storage::{KeyValueStore, StoredCell};

pub const CLEAR_PROMPT: &str = "Are you sure you want to delete all items?";

pub fn add(items: &[Item], item: Item) -> Vec<Item> {
    let mut next = items.to_vec();
    next.push(item);
    next
}

pub fn edit(items: &[Item], id: ItemId, description: &str, quantity: u32) -> Vec<Item> {
    items
        .iter()
        .map(|item| {
            if item.id == id {
                Item {
                    description: description.to_string(),
                    quantity,
                    ..item.clone()
                }
            } else {
                item.clone()
            }
        })
        .collect()
}

pub fn delete(items: &[Item], id: ItemId) -> Vec<Item> {
    items.iter().filter(|item| item.id != id).cloned().collect()
}

pub fn toggle(items: &[Item], id: ItemId) -> Vec<Item> {
    items
        .iter()
        .map(|item| {
            if item.id == id {
                Item {
                    packed: !item.packed,
                    ..item.clone()
                }
            } else {
                item.clone()
            }
        })
        .collect()
}

pub fn clear(_items: &[Item]) -> Vec<Item> {
    Vec::new()
}

pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug)]
pub struct PackingList<S> {
    items: Vec<Item>,
    cell: StoredCell<S, Vec<Item>>,
}

impl<S: KeyValueStore> PackingList<S> {
    #[tracing::instrument(skip(store))]
    pub fn load(store: S, key: &str) -> Self {
        let mut cell = StoredCell::new(store, key);
        let items = cell.read_or_backup(Vec::new());
        info!(count = items.len(), "loaded packing list");
        Self { items, cell }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cell(&self) -> &StoredCell<S, Vec<Item>> {
        &self.cell
    }

    #[tracing::instrument(skip(self, item), fields(id = item.id))]
    pub fn add(&mut self, item: Item) -> anyhow::Result<()> {
        let next = add(&self.items, item);
        self.commit(next)
    }

    #[tracing::instrument(skip(self, description))]
    pub fn edit(&mut self, id: ItemId, description: &str, quantity: u32) -> anyhow::Result<()> {
        if !self.contains(id) {
            warn!("edit target not found; ignoring");
        }
        let next = edit(&self.items, id, description, quantity);
        self.commit(next)
    }

    #[tracing::instrument(skip(self))]
    pub fn delete(&mut self, id: ItemId) -> anyhow::Result<()> {
        if !self.contains(id) {
            warn!("delete target not found; ignoring");
        }
        let next = delete(&self.items, id);
        self.commit(next)
    }

    #[tracing::instrument(skip(self))]
    pub fn toggle(&mut self, id: ItemId) -> anyhow::Result<()> {
        if !self.contains(id) {
            warn!("toggle target not found; ignoring");
        }
        let next = toggle(&self.items, id);
        self.commit(next)
    }

    #[tracing::instrument(skip(self))]
    pub fn clear(&mut self) -> anyhow::Result<()> {
        let next = clear(&self.items);
        self.commit(next)
    }

    #[tracing::instrument(skip(self, confirm))]
    pub fn clear_with(&mut self, confirm: &mut impl Confirm) -> anyhow::Result<bool> {
        if !confirm.confirm(CLEAR_PROMPT) {
            info!("clear declined");
            return Ok(false);
        }
        self.clear()?;
        Ok(true)
    }

    fn commit(&mut self, next: Vec<Item>) -> anyhow::Result<()> {
        self.items = next;
        self.cell.write(&self.items)?;
        debug!(count = self.items.len(), key = self.cell.key(), "persisted packing list");
        Ok(())
    }
}
