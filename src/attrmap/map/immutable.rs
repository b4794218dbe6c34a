use super::{AttributeMap, Entries, SharedAttributeMap, Strategy};
use crate::attribute::AttributeKey;
use crate::error::{AttrError, Result};
use crate::value::Value;
use std::sync::Arc;

/// A read-through view that forbids mutation.
///
/// Reads delegate to the wrapped map; mutators fail. Wrapping an already
/// immutable map adds another layer rather than returning it unchanged.
#[derive(Debug, Clone)]
pub struct ImmutableAttributeMap {
    inner: SharedAttributeMap,
}

impl ImmutableAttributeMap {
    pub fn new(inner: SharedAttributeMap) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &dyn AttributeMap {
        self.inner.as_ref()
    }

    pub fn shared_inner(&self) -> SharedAttributeMap {
        Arc::clone(&self.inner)
    }
}

impl AttributeMap for ImmutableAttributeMap {
    fn strategy(&self) -> Strategy {
        Strategy::Immutable
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn value(&self, key: &AttributeKey) -> Option<&Value> {
        self.inner.value(key)
    }

    fn contains_key(&self, key: &AttributeKey) -> bool {
        self.inner.contains_key(key)
    }

    fn insert(&mut self, _key: &AttributeKey, _value: Value) -> Result<Option<Value>> {
        Err(AttrError::unsupported(Strategy::Immutable, "put"))
    }

    fn remove_key(&mut self, _key: &AttributeKey) -> Result<Option<Value>> {
        Err(AttrError::unsupported(Strategy::Immutable, "remove"))
    }

    fn clear(&mut self) -> Result<()> {
        Err(AttrError::unsupported(Strategy::Immutable, "clear"))
    }

    fn entries(&self) -> Entries<'_> {
        self.inner.entries()
    }
}

structural_eq!(ImmutableAttributeMap);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{BoolAttribute, IntAttribute};
    use crate::map::{AttributeMapExt, DefaultAttributeMap};
    use crate::Attributes;

    fn sample() -> (IntAttribute, BoolAttribute, DefaultAttributeMap) {
        let count = IntAttribute::named("count", 0).unwrap();
        let flag = BoolAttribute::named("flag", false).unwrap();
        let mut map = DefaultAttributeMap::new();
        map.put(&count, 3).unwrap();
        (count, flag, map)
    }

    #[test]
    fn reads_delegate() {
        let (count, flag, map) = sample();
        let view = Attributes::unmodifiable(map.clone());
        assert_eq!(view.len(), 1);
        assert_eq!(view.get(&count), 3);
        assert!(view.contains(&count));
        assert!(!view.get(&flag));
        assert!(!view.contains(&flag));
        assert_eq!(view, map);
        assert_eq!(view.strategy(), Strategy::Immutable);
        assert_eq!(view.inner().strategy(), Strategy::Default);
    }

    #[test]
    fn mutators_fail_and_leave_state() {
        let (count, flag, map) = sample();
        let mut view = Attributes::unmodifiable(map);
        assert!(view.put(&count, 4).unwrap_err().is_unsupported_mutation());
        assert!(view.put(&flag, true).unwrap_err().is_unsupported_mutation());
        assert!(view.remove(&count).unwrap_err().is_unsupported_mutation());
        assert!(view.clear().unwrap_err().is_unsupported_mutation());
        assert_eq!(view.len(), 1);
        assert_eq!(view.get(&count), 3);
    }

    #[test]
    fn wrapping_twice_adds_a_layer() {
        let (count, _, map) = sample();
        let once = Attributes::unmodifiable(map);
        let twice = Attributes::unmodifiable(once.clone());
        assert_eq!(twice.inner().strategy(), Strategy::Immutable);
        assert_eq!(twice.get(&count), 3);
        assert_eq!(twice, once);
    }

    #[test]
    fn shares_the_wrapped_map() {
        let (count, _, map) = sample();
        let shared: SharedAttributeMap = Arc::new(map);
        let view = Attributes::unmodifiable_shared(Arc::clone(&shared));
        assert!(Arc::ptr_eq(&view.shared_inner(), &shared));
        assert_eq!(view.get(&count), 3);
    }
}
