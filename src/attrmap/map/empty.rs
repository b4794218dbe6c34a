use super::{AttributeMap, Entries, Strategy};
use crate::attribute::AttributeKey;
use crate::error::{AttrError, Result};
use crate::value::Value;

/// A map with no bindings that can never gain any.
///
/// Every read answers with the queried attribute's default. Obtain the
/// canonical instance from [`Attributes::empty`](crate::Attributes::empty)
/// or [`Attributes::shared_empty`](crate::Attributes::shared_empty).
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyAttributeMap;

impl AttributeMap for EmptyAttributeMap {
    fn strategy(&self) -> Strategy {
        Strategy::Empty
    }

    fn len(&self) -> usize {
        0
    }

    fn value(&self, _key: &AttributeKey) -> Option<&Value> {
        None
    }

    fn contains_key(&self, _key: &AttributeKey) -> bool {
        false
    }

    fn insert(&mut self, _key: &AttributeKey, _value: Value) -> Result<Option<Value>> {
        Err(AttrError::unsupported(Strategy::Empty, "put"))
    }

    fn remove_key(&mut self, _key: &AttributeKey) -> Result<Option<Value>> {
        Err(AttrError::unsupported(Strategy::Empty, "remove"))
    }

    fn clear(&mut self) -> Result<()> {
        Err(AttrError::unsupported(Strategy::Empty, "clear"))
    }

    fn entries(&self) -> Entries<'_> {
        Box::new(std::iter::empty())
    }
}

structural_eq!(EmptyAttributeMap);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{DoubleAttribute, IntAttribute};
    use crate::map::{AttributeMapExt, DefaultAttributeMap};

    #[test]
    fn reads_return_defaults() {
        let count = IntAttribute::named("count", 4).unwrap();
        let ratio = DoubleAttribute::named("ratio", 0.5).unwrap();
        let map = EmptyAttributeMap;
        assert_eq!(map.get(&count), 4);
        assert_eq!(map.get_or(&count, 9), 9);
        assert_eq!(map.get(&ratio), 0.5);
        assert!(!map.contains(&count));
        assert!(map.is_empty());
        assert_eq!(map.entries().count(), 0);
    }

    #[test]
    fn every_mutator_fails() {
        let count = IntAttribute::named("count", 0).unwrap();
        let mut map = EmptyAttributeMap;

        let err = map.put(&count, 1).unwrap_err();
        assert!(err.is_unsupported_mutation());
        assert!(map.remove(&count).unwrap_err().is_unsupported_mutation());
        assert!(map.clear().unwrap_err().is_unsupported_mutation());
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn equals_empty_default_map() {
        let default = DefaultAttributeMap::new();
        assert_eq!(EmptyAttributeMap, default);
        assert_eq!(EmptyAttributeMap.hash_code(), default.hash_code());
    }
}
