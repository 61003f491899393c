//! Mutable state of one shell session.
//!
//! A [`Session`] is created once by the interpreter and lent to every command
//! through [`crate::command::Context`]. Fields are public; commands read and
//! mutate them directly.

use crate::error::CommandError;
use crate::ingredient::identity_key;
use crate::recipe::RecipeBook;
use crate::storage::IngredientStorage;
use chrono::{Local, NaiveDate};
use std::collections::BTreeMap;
use tracing::info;

/// Source of "today" for expiry checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    /// The local calendar date.
    #[default]
    System,
    /// A pinned date, for tests and reproducible runs.
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(self) -> NaiveDate {
        match self {
            Clock::System => Local::now().date_naive(),
            Clock::Fixed(date) => date,
        }
    }
}

#[derive(Debug, Default)]
pub struct Session {
    pub inventory: InventoryManager,
    pub recipes: RecipeBook,
    /// Set by `exit`; the read loop stops once it is true.
    pub should_exit: bool,
    pub clock: Clock,
}

impl Session {
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            ..Self::default()
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}

/// Named storages, the one currently selected, and the trail of previously
/// selected ones.
#[derive(Debug, Default)]
pub struct InventoryManager {
    storages: BTreeMap<String, IngredientStorage>,
    active: Option<String>,
    history: Vec<String>,
}

impl InventoryManager {
    pub fn create_storage(&mut self, name: &str) -> Result<(), CommandError> {
        let key = identity_key(name);
        if self.storages.contains_key(&key) {
            return Err(CommandError::DuplicateStorage(name.to_string()));
        }
        info!(storage = %key, "created storage");
        self.storages.insert(key, IngredientStorage::new(name.trim()));
        Ok(())
    }

    /// Delete a storage. Deleting the active storage leaves none selected.
    pub fn remove_storage(&mut self, name: &str) -> Result<IngredientStorage, CommandError> {
        let key = identity_key(name);
        let removed = self
            .storages
            .remove(&key)
            .ok_or_else(|| CommandError::UnknownStorage(name.to_string()))?;
        if self.active.as_deref() == Some(key.as_str()) {
            self.active = None;
        }
        self.history.retain(|visited| *visited != key);
        self.history.dedup();
        while self.history.last().is_some() && self.history.last() == self.active.as_ref() {
            self.history.pop();
        }
        info!(storage = %key, "removed storage");
        Ok(removed)
    }

    /// Make `name` the active storage, remembering the previous one.
    pub fn select(&mut self, name: &str) -> Result<&IngredientStorage, CommandError> {
        let key = identity_key(name);
        if !self.storages.contains_key(&key) {
            return Err(CommandError::UnknownStorage(name.to_string()));
        }
        if let Some(previous) = self.active.take() {
            if previous != key {
                self.history.push(previous);
            }
        }
        self.active = Some(key.clone());
        self.storages
            .get(&key)
            .ok_or(CommandError::UnknownStorage(key))
    }

    /// Return to the most recently left storage.
    ///
    /// `None` when the history is empty; the active storage is unchanged then.
    pub fn go_back(&mut self) -> Option<&IngredientStorage> {
        let previous = self.history.pop()?;
        self.active = Some(previous);
        self.active.as_ref().and_then(|key| self.storages.get(key))
    }

    /// Forget the trail of previously selected storages, returning how many
    /// entries it held.
    pub fn clear_history(&mut self) -> usize {
        let forgotten = self.history.len();
        self.history.clear();
        forgotten
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn active(&self) -> Result<&IngredientStorage, CommandError> {
        self.active
            .as_ref()
            .and_then(|key| self.storages.get(key))
            .ok_or(CommandError::NoActiveStorage)
    }

    pub fn active_mut(&mut self) -> Result<&mut IngredientStorage, CommandError> {
        self.active
            .as_ref()
            .and_then(|key| self.storages.get_mut(key))
            .ok_or(CommandError::NoActiveStorage)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IngredientStorage> {
        self.storages.values()
    }

    pub fn is_empty(&self) -> bool {
        self.storages.is_empty()
    }
}
