use super::{AttributeMap, Entries, Strategy};
use crate::attribute::{AttributeId, AttributeKey};
use crate::error::Result;
use crate::value::Value;
use std::collections::hash_map::Entry as Slot;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Entry {
    key: AttributeKey,
    value: Value,
}

/// The general-purpose mutable map.
///
/// Bindings are keyed by attribute identity, so two attributes that share a
/// name never collide. Not synchronized: wrap it in a lock to share it
/// mutably across threads.
#[derive(Debug, Clone, Default)]
pub struct DefaultAttributeMap {
    entries: HashMap<AttributeId, Entry>,
}

impl DefaultAttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
        }
    }

    /// Copies every binding of `map`, whatever its strategy.
    pub fn copy_of<M: AttributeMap + ?Sized>(map: &M) -> Self {
        let entries = map
            .entries()
            .map(|(key, value)| {
                let entry = Entry {
                    key: key.clone(),
                    value: value.clone(),
                };
                (key.id(), entry)
            })
            .collect();
        Self { entries }
    }
}

impl AttributeMap for DefaultAttributeMap {
    fn strategy(&self) -> Strategy {
        Strategy::Default
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn value(&self, key: &AttributeKey) -> Option<&Value> {
        self.entries.get(&key.id()).map(|entry| &entry.value)
    }

    fn insert(&mut self, key: &AttributeKey, value: Value) -> Result<Option<Value>> {
        key.check_value(&value)?;
        match self.entries.entry(key.id()) {
            Slot::Occupied(mut slot) => {
                let previous = std::mem::replace(&mut slot.get_mut().value, value);
                Ok(Some(previous))
            }
            Slot::Vacant(slot) => {
                slot.insert(Entry {
                    key: key.clone(),
                    value,
                });
                Ok(None)
            }
        }
    }

    fn remove_key(&mut self, key: &AttributeKey) -> Result<Option<Value>> {
        Ok(self.entries.remove(&key.id()).map(|entry| entry.value))
    }

    fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }

    fn entries(&self) -> Entries<'_> {
        Box::new(self.entries.values().map(|entry| (&entry.key, &entry.value)))
    }
}

structural_eq!(DefaultAttributeMap);
