use super::{AttributeMap, Entries, Strategy};
use crate::attribute::AttributeKey;
use crate::error::{AttrError, Result};
use crate::value::Value;

/// A read-only map holding exactly one binding, fixed at construction.
#[derive(Debug, Clone)]
pub struct SingletonAttributeMap {
    key: AttributeKey,
    value: Value,
}

impl SingletonAttributeMap {
    /// Binds an already validated value.
    pub(crate) fn bind(key: AttributeKey, value: Value) -> Self {
        Self { key, value }
    }

    /// Validates `value` against `key` first.
    pub fn from_entry(key: AttributeKey, value: Value) -> Result<Self> {
        key.check_value(&value)?;
        Ok(Self::bind(key, value))
    }

    pub fn key(&self) -> &AttributeKey {
        &self.key
    }

    pub fn bound_value(&self) -> &Value {
        &self.value
    }
}

impl AttributeMap for SingletonAttributeMap {
    fn strategy(&self) -> Strategy {
        Strategy::Singleton
    }

    fn len(&self) -> usize {
        1
    }

    fn value(&self, key: &AttributeKey) -> Option<&Value> {
        (self.key == *key).then_some(&self.value)
    }

    fn contains_key(&self, key: &AttributeKey) -> bool {
        self.key == *key
    }

    fn insert(&mut self, _key: &AttributeKey, _value: Value) -> Result<Option<Value>> {
        Err(AttrError::unsupported(Strategy::Singleton, "put"))
    }

    fn remove_key(&mut self, _key: &AttributeKey) -> Result<Option<Value>> {
        Err(AttrError::unsupported(Strategy::Singleton, "remove"))
    }

    fn clear(&mut self) -> Result<()> {
        Err(AttrError::unsupported(Strategy::Singleton, "clear"))
    }

    fn entries(&self) -> Entries<'_> {
        Box::new(std::iter::once((&self.key, &self.value)))
    }
}

structural_eq!(SingletonAttributeMap);
