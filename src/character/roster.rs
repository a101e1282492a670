//! The in-memory collection of character records.
//!
//! A [`Roster`] keeps records in creation order and tracks which one is
//! active (the editor's current tab). Names are compared case-insensitively
//! and must be unique; nothing else about a record is constrained here.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::character::record::CharacterRecord;
use crate::utils::input::squash_whitespace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    EmptyName,
    DuplicateName(String),
    NotFound(String),
}

impl fmt::Display for RosterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RosterError::EmptyName => write!(f, "Character name cannot be empty"),
            RosterError::DuplicateName(name) => {
                write!(f, "A character named '{name}' already exists")
            }
            RosterError::NotFound(name) => write!(f, "Character '{name}' not found"),
        }
    }
}

impl std::error::Error for RosterError {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    characters: Vec<CharacterRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    active: Option<String>,
}

/// Names compare case-insensitively with runs of whitespace collapsed.
fn names_match(a: &str, b: &str) -> bool {
    squash_whitespace(a).eq_ignore_ascii_case(&squash_whitespace(b))
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CharacterRecord> {
        self.characters.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.characters.iter().map(|c| c.name.clone()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.characters.iter().position(|c| names_match(&c.name, name))
    }

    pub fn get(&self, name: &str) -> Option<&CharacterRecord> {
        self.position(name).map(|idx| &self.characters[idx])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut CharacterRecord> {
        let idx = self.position(name)?;
        self.characters.get_mut(idx)
    }

    /// Create a blank record. The first character added becomes active.
    pub fn create(&mut self, name: &str) -> Result<&mut CharacterRecord, RosterError> {
        self.insert(CharacterRecord::new(&squash_whitespace(name)))
    }

    /// Add a complete record, enforcing name uniqueness.
    pub fn insert(&mut self, mut record: CharacterRecord) -> Result<&mut CharacterRecord, RosterError> {
        record.name = squash_whitespace(&record.name);
        if record.name.is_empty() {
            return Err(RosterError::EmptyName);
        }
        if self.contains(&record.name) {
            return Err(RosterError::DuplicateName(record.name));
        }
        if self.active.is_none() {
            self.active = Some(record.name.clone());
        }
        self.characters.push(record);
        let last = self.characters.len() - 1;
        Ok(&mut self.characters[last])
    }

    /// Remove a record. When the active record goes away the next one (or
    /// the previous one, at the end of the list) becomes active.
    pub fn remove(&mut self, name: &str) -> Result<CharacterRecord, RosterError> {
        let idx = self
            .position(name)
            .ok_or_else(|| RosterError::NotFound(name.to_string()))?;
        let removed = self.characters.remove(idx);

        let was_active = self
            .active
            .as_deref()
            .is_some_and(|active| names_match(active, &removed.name));
        if was_active {
            let next = idx.min(self.characters.len().saturating_sub(1));
            self.active = self.characters.get(next).map(|c| c.name.clone());
        }
        Ok(removed)
    }

    pub fn rename(&mut self, from: &str, to: &str) -> Result<(), RosterError> {
        let to = squash_whitespace(to);
        let to = to.as_str();
        if to.is_empty() {
            return Err(RosterError::EmptyName);
        }
        let idx = self
            .position(from)
            .ok_or_else(|| RosterError::NotFound(from.to_string()))?;
        if let Some(existing) = self.position(to) {
            if existing != idx {
                return Err(RosterError::DuplicateName(to.to_string()));
            }
        }

        let old = std::mem::replace(&mut self.characters[idx].name, to.to_string());
        if self
            .active
            .as_deref()
            .is_some_and(|active| names_match(active, &old))
        {
            self.active = Some(to.to_string());
        }
        Ok(())
    }

    pub fn set_active(&mut self, name: &str) -> Result<(), RosterError> {
        let record = self
            .get(name)
            .ok_or_else(|| RosterError::NotFound(name.to_string()))?;
        self.active = Some(record.name.clone());
        Ok(())
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active().map(|c| c.name.as_str())
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active.as_deref().and_then(|name| self.position(name))
    }

    /// The active record, falling back to the first one if the stored
    /// active name no longer resolves.
    pub fn active(&self) -> Option<&CharacterRecord> {
        self.active_index()
            .and_then(|idx| self.characters.get(idx))
            .or_else(|| self.characters.first())
    }

    pub fn active_mut(&mut self) -> Option<&mut CharacterRecord> {
        let idx = self.active_index().unwrap_or(0);
        self.characters.get_mut(idx)
    }

    /// Move the active tab by `delta`, wrapping at both ends.
    pub fn cycle_active(&mut self, delta: isize) {
        if self.characters.is_empty() {
            return;
        }
        let len = self.characters.len() as isize;
        let current = self.active_index().unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.active = Some(self.characters[next].name.clone());
    }
}
