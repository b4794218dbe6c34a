//! Name-keyed registry of attributes.
//!
//! In-process, attributes compare by identity. Across a persistence boundary
//! only the name survives, so a snapshot is restored by looking each name up
//! here and getting back the canonical in-process attribute.

use crate::attribute::{Attribute, AttributeKey};
use crate::error::{AttrError, Result};
use crate::types::AttrType;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

static GLOBAL: Lazy<AttributeRegistry> = Lazy::new(AttributeRegistry::new);

#[derive(Debug, Default)]
pub struct AttributeRegistry {
    by_name: RwLock<HashMap<String, AttributeKey>>,
}

impl AttributeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static AttributeRegistry {
        &GLOBAL
    }

    pub fn register<T: AttrType>(&self, attr: &Attribute<T>) -> Result<()> {
        self.register_key(attr.key())
    }

    /// Registering the same attribute again is a no-op. Registering a
    /// different attribute under a taken name fails.
    pub fn register_key(&self, key: &AttributeKey) -> Result<()> {
        let mut by_name = self.by_name.write().unwrap_or_else(PoisonError::into_inner);
        match by_name.get(key.name()) {
            Some(existing) if existing == key => Ok(()),
            Some(_) => Err(AttrError::DuplicateName(key.name().to_string())),
            None => {
                tracing::debug!(name = key.name(), kind = %key.kind(), "registered attribute");
                by_name.insert(key.name().to_string(), key.clone());
                Ok(())
            }
        }
    }

    /// Registers every key or none of them. A name clash with an existing
    /// entry, or between two different keys in `keys`, leaves the registry
    /// untouched.
    pub fn register_all(&self, keys: &[AttributeKey]) -> Result<()> {
        let mut by_name = self.by_name.write().unwrap_or_else(PoisonError::into_inner);
        let mut pending: HashMap<&str, &AttributeKey> = HashMap::with_capacity(keys.len());
        for key in keys {
            let taken = by_name
                .get(key.name())
                .or_else(|| pending.get(key.name()).copied());
            match taken {
                Some(existing) if existing == key => {}
                Some(_) => return Err(AttrError::DuplicateName(key.name().to_string())),
                None => {
                    pending.insert(key.name(), key);
                }
            }
        }
        for (name, key) in pending {
            tracing::debug!(name, kind = %key.kind(), "registered attribute");
            by_name.insert(name.to_string(), key.clone());
        }
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Option<AttributeKey> {
        let by_name = self.by_name.read().unwrap_or_else(PoisonError::into_inner);
        let found = by_name.get(name).cloned();
        if found.is_none() {
            tracing::trace!(name, "attribute not registered");
        }
        found
    }

    pub fn require(&self, name: &str) -> Result<AttributeKey> {
        self.resolve(name)
            .ok_or_else(|| AttrError::UnknownAttribute(name.to_string()))
    }

    /// Resolves `name` and recovers the typed attribute.
    pub fn resolve_typed<T: AttrType>(&self, name: &str) -> Result<Attribute<T>> {
        let key = self.require(name)?;
        key.downcast::<T>().ok_or_else(|| AttrError::TypeMismatch {
            attribute: name.to_string(),
            expected: T::KIND,
            actual: key.kind(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.by_name
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered keys sorted by name.
    pub fn keys(&self) -> Vec<AttributeKey> {
        let by_name = self.by_name.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<_> = by_name.values().cloned().collect();
        keys.sort_by(|a, b| a.name().cmp(b.name()));
        keys
    }
}
