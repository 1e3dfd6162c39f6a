//! Key ring: registered keys and their purposes
//!
//! Keys live in a lookup map and an append-only list of ids. Removing a key
//! leaves a tombstone (empty purposes) in the map and keeps its id listed, so
//! enumeration indices never shift and ids are never recycled.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IdentityError, Result};
use crate::purpose::{Purpose, Purposes};
use crate::types::{KeyId, KeyType};

/// A registered key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Key {
    /// Capabilities granted to this key
    pub purposes: Purposes,

    /// Credential scheme of the key
    pub key_type: KeyType,

    /// Identifier of the key (zero for absent keys)
    pub id: KeyId,
}

impl Key {
    pub fn new(id: KeyId, purposes: Purposes, key_type: KeyType) -> Self {
        Self {
            purposes,
            key_type,
            id,
        }
    }

    /// Zero-valued key returned for unknown or removed ids
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        !self.purposes.is_empty()
    }

    pub fn has_purpose(&self, purpose: Purpose) -> bool {
        self.purposes.has(purpose)
    }
}

/// Keys registered with one identity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyRing {
    /// Lookup by id; removed keys stay as tombstones
    keys: HashMap<KeyId, Key>,

    /// Every id ever added, in insertion order
    ids: Vec<KeyId>,
}

impl KeyRing {
    /// Create a ring holding the bootstrap key with MANAGEMENT and ACTION
    pub fn new(bootstrap: KeyId, key_type: KeyType) -> Self {
        let mut ring = Self::default();
        ring.keys
            .insert(bootstrap, Key::new(bootstrap, Purposes::BOOTSTRAP, key_type));
        ring.ids.push(bootstrap);
        ring
    }

    /// Set the purposes and type of a key, listing it if it was never seen
    pub fn add_key(&mut self, id: KeyId, purposes: Purposes, key_type: KeyType) -> Result<Key> {
        if id.is_zero() {
            return Err(IdentityError::InvalidKey);
        }

        let key = Key::new(id, purposes, key_type);
        if self.keys.insert(id, key).is_none() {
            self.ids.push(id);
        }

        debug!("Key {} set to {} ({})", id.short(), purposes, key_type);
        Ok(key)
    }

    /// Clear a key, returning what it held before removal
    pub fn remove_key(&mut self, id: KeyId) -> Result<Key> {
        if id.is_zero() {
            return Err(IdentityError::InvalidKey);
        }

        let previous = self.get_key(&id);
        if let Some(entry) = self.keys.get_mut(&id) {
            entry.purposes = Purposes::empty();
            entry.key_type = KeyType::NONE;
        }

        debug!("Key {} removed", id.short());
        Ok(previous)
    }

    /// Look up a key; absent and removed keys come back zero-valued
    pub fn get_key(&self, id: &KeyId) -> Key {
        match self.keys.get(id) {
            Some(key) if key.is_active() => *key,
            _ => Key::absent(),
        }
    }

    /// Check a raw purpose value against a key
    pub fn key_has_purpose(&self, id: &KeyId, purpose: u64) -> Result<bool> {
        let purpose = Purpose::new(purpose)?;
        Ok(self.has_purpose(id, purpose))
    }

    /// Check a validated purpose against a key
    pub fn has_purpose(&self, id: &KeyId, purpose: Purpose) -> bool {
        self.keys
            .get(id)
            .map(|key| key.has_purpose(purpose))
            .unwrap_or(false)
    }

    /// Number of listed ids, removed keys included
    pub fn key_count(&self) -> usize {
        self.ids.len()
    }

    /// Id at a position of the enumerable list
    pub fn key_id_at(&self, index: usize) -> Option<KeyId> {
        self.ids.get(index).copied()
    }

    /// Active keys holding a purpose, in list order
    pub fn keys_by_purpose(&self, purpose: Purpose) -> Vec<KeyId> {
        self.ids
            .iter()
            .filter(|id| self.has_purpose(id, purpose))
            .copied()
            .collect()
    }

    /// Whether any active key holds a purpose
    pub fn any_with_purpose(&self, purpose: Purpose) -> bool {
        self.keys.values().any(|key| key.has_purpose(purpose))
    }
}
