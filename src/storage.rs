//! Ingredient storage: an arena of lots with an index by identity key.
//!
//! Lots live in `slots`; `index` maps each identity key to the slot ids of the
//! lots stored under it, in insertion order. A freed slot is reused by the next
//! insert. Within one key no two lots share an expiry date: an incoming lot with
//! a known date is merged into the held one instead.

use crate::converter;
use crate::error::StorageError;
use crate::ingredient::{Ingredient, Measurement, capitalize_each_word, identity_key};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

type EntryId = usize;

/// Result of sweeping a storage for expired lots.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpirySweep {
    /// The storage held no lots at all.
    NothingToCheck,
    /// The lots that were removed, possibly none.
    Removed(Vec<Ingredient>),
}

#[derive(Debug, Clone)]
pub struct IngredientStorage {
    name: String,
    slots: Vec<Option<Ingredient>>,
    free: Vec<EntryId>,
    index: BTreeMap<String, Vec<EntryId>>,
}

impl IngredientStorage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slots: Vec::new(),
            free: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of stored lots.
    pub fn len(&self) -> usize {
        self.index.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Store `ingredient`, merging it into a lot with the same key and expiry
    /// date when one exists.
    pub fn add_ingredient(&mut self, ingredient: Ingredient) -> Result<(), StorageError> {
        let key = ingredient.key();
        if key.is_empty() {
            return Err(StorageError::NullIngredient);
        }

        if let Some(id) = self.entry_on(&key, ingredient.expiry_date()) {
            if let Some(held) = self.slots[id].as_mut() {
                held.merge(&ingredient)?;
                debug!(storage = %self.name, %key, amount = held.amount(), "merged ingredient");
                return Ok(());
            }
        }

        let id = self.allocate(ingredient);
        self.index.entry(key).or_default().push(id);
        Ok(())
    }

    /// Remove the first lot equal to `ingredient`.
    ///
    /// Returns `false` when no such lot is stored. A key whose last lot is
    /// removed disappears from the index.
    pub fn remove_ingredient(&mut self, ingredient: &Ingredient) -> bool {
        let key = ingredient.key();
        let Some(ids) = self.index.get_mut(&key) else {
            return false;
        };
        let Some(position) = ids
            .iter()
            .position(|id| self.slots[*id].as_ref() == Some(ingredient))
        else {
            return false;
        };

        let id = ids.remove(position);
        if ids.is_empty() {
            self.index.remove(&key);
        }
        self.release(id);
        true
    }

    /// All lots stored under `name`, in insertion order.
    pub fn find_ingredient(&self, name: &str) -> Option<Vec<&Ingredient>> {
        self.index
            .get(&identity_key(name))
            .map(|ids| ids.iter().filter_map(|id| self.slots[*id].as_ref()).collect())
    }

    /// The lot stored under `name` that expires on `date`.
    pub fn find_ingredient_on(&self, name: &str, date: NaiveDate) -> Option<&Ingredient> {
        self.entry_on(&identity_key(name), date)
            .and_then(|id| self.slots[id].as_ref())
    }

    pub fn is_ingredient_present(&self, name: &str) -> bool {
        self.index.contains_key(&identity_key(name))
    }

    /// Whether every requirement can be met from this storage.
    ///
    /// Stops at the first requirement that is missing or short. Lots are summed
    /// in the requirement's unit; a lot in another unit family is an error.
    pub fn is_ingredient_enough(&self, requirements: &[Measurement]) -> Result<bool, StorageError> {
        for requirement in requirements {
            let Some(ids) = self.index.get(&requirement.key()) else {
                return Ok(false);
            };
            let mut available = 0.0;
            for ingredient in ids.iter().filter_map(|id| self.slots[*id].as_ref()) {
                available +=
                    converter::convert(ingredient.amount(), ingredient.unit(), requirement.unit())?;
            }
            if available < requirement.amount() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Remove every lot that expired before `today`.
    pub fn remove_expired(&mut self, today: NaiveDate) -> ExpirySweep {
        if self.is_empty() {
            return ExpirySweep::NothingToCheck;
        }

        let mut removed = Vec::new();
        let mut released = Vec::new();
        for ids in self.index.values_mut() {
            ids.retain(|id| match self.slots[*id].as_ref() {
                Some(ingredient) if ingredient.is_expired(today) => {
                    removed.push(ingredient.clone());
                    released.push(*id);
                    false
                }
                _ => true,
            });
        }
        self.index.retain(|_, ids| !ids.is_empty());
        for id in released {
            self.release(id);
        }

        debug!(storage = %self.name, removed = removed.len(), "swept expired ingredients");
        ExpirySweep::Removed(removed)
    }

    /// Lots that expired before `today`, without removing them.
    pub fn all_expired(&self, today: NaiveDate) -> Vec<&Ingredient> {
        self.iter().filter(|i| i.is_expired(today)).collect()
    }

    /// Sum of the value of every lot.
    pub fn total_value(&self) -> f64 {
        converter::round_two_decimals(self.iter().map(Ingredient::value).sum())
    }

    /// Display names of the stored ingredients, one per key.
    pub fn overview(&self) -> Vec<String> {
        self.index.keys().map(|key| capitalize_each_word(key)).collect()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.index.clear();
    }

    /// Every lot, grouped by key in key order.
    pub fn iter(&self) -> impl Iterator<Item = &Ingredient> {
        self.index
            .values()
            .flatten()
            .filter_map(|id| self.slots[*id].as_ref())
    }

    fn entry_on(&self, key: &str, date: NaiveDate) -> Option<EntryId> {
        self.index.get(key)?.iter().copied().find(|id| {
            self.slots[*id]
                .as_ref()
                .is_some_and(|i| i.expiry_date() == date)
        })
    }

    fn allocate(&mut self, ingredient: Ingredient) -> EntryId {
        match self.free.pop() {
            Some(id) => {
                self.slots[id] = Some(ingredient);
                id
            }
            None => {
                self.slots.push(Some(ingredient));
                self.slots.len() - 1
            }
        }
    }

    fn release(&mut self, id: EntryId) {
        self.slots[id] = None;
        self.free.push(id);
    }
}
