//! Persistence for attribute maps.
//!
//! A [`MapSnapshot`] records a map's strategy and its bound entries keyed by
//! attribute name:
//!
//! ```text
//! {
//!   "strategy": "default",
//!   "entries": { "count": 5, "label": "primary" }
//! }
//! ```
//!
//! Restoring resolves each name through an [`AttributeRegistry`], so the
//! rebuilt map is keyed by the canonical in-process attributes. An `empty`
//! snapshot restores to the shared canonical Empty map rather than a copy.
//! An immutable view is restored as a view over a fresh Default map.

use crate::attribute::AttributeKey;
use crate::attributes::Attributes;
use crate::error::{AttrError, Result};
use crate::map::{
    AttributeMap, DefaultAttributeMap, SharedAttributeMap, SingletonAttributeMap, Strategy,
};
use crate::registry::AttributeRegistry;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSnapshot {
    pub strategy: Strategy,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub entries: BTreeMap<String, JsonValue>,
}

impl MapSnapshot {
    /// Encodes every bound entry. Fails if two bound attributes share a name,
    /// since the snapshot could not tell them apart.
    pub fn capture<M: AttributeMap + ?Sized>(map: &M) -> Result<Self> {
        let mut entries = BTreeMap::new();
        for (key, value) in map.entries() {
            let encoded = key.encode(value)?;
            if entries.insert(key.name().to_string(), encoded).is_some() {
                return Err(AttrError::DuplicateName(key.name().to_string()));
            }
        }
        Ok(Self {
            strategy: map.strategy(),
            entries,
        })
    }

    pub fn restore(&self, registry: &AttributeRegistry) -> Result<SharedAttributeMap> {
        tracing::debug!(
            strategy = %self.strategy,
            entries = self.entries.len(),
            "restoring attribute map"
        );
        let map: SharedAttributeMap = match self.strategy {
            Strategy::Empty => {
                if !self.entries.is_empty() {
                    return Err(AttrError::MalformedSnapshot(format!(
                        "empty map with {} entries",
                        self.entries.len()
                    )));
                }
                return Ok(Attributes::shared_empty());
            }
            Strategy::Singleton => {
                let mut entries = self.entries.iter();
                match (entries.next(), entries.next()) {
                    (Some((name, json)), None) => {
                        let (key, value) = decode_entry(registry, name, json)?;
                        Arc::new(SingletonAttributeMap::from_entry(key, value)?)
                    }
                    _ => {
                        return Err(AttrError::MalformedSnapshot(format!(
                            "singleton map with {} entries",
                            self.entries.len()
                        )))
                    }
                }
            }
            Strategy::Default => Arc::new(self.restore_default(registry)?),
            Strategy::Immutable => Arc::new(Attributes::unmodifiable(
                self.restore_default(registry)?,
            )),
        };
        Ok(map)
    }

    /// Restores the entries into a mutable map, ignoring the recorded strategy.
    pub fn restore_default(&self, registry: &AttributeRegistry) -> Result<DefaultAttributeMap> {
        let mut map = DefaultAttributeMap::with_capacity(self.entries.len());
        for (name, json) in &self.entries {
            let (key, value) = decode_entry(registry, name, json)?;
            map.insert(&key, value)?;
        }
        Ok(map)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(AttrError::Io)?;
        Self::from_json(&content)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json()?).map_err(AttrError::Io)?;
        Ok(())
    }
}

fn decode_entry(
    registry: &AttributeRegistry,
    name: &str,
    json: &JsonValue,
) -> Result<(AttributeKey, Value)> {
    let key = registry.require(name)?;
    let value = key.decode(json.clone())?;
    Ok((key, value))
}
