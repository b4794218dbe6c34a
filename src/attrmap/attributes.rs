//! Construction helpers for the read-only strategies.

use crate::attribute::Attribute;
use crate::error::Result;
use crate::map::{
    AttributeMap, EmptyAttributeMap, ImmutableAttributeMap, SharedAttributeMap,
    SingletonAttributeMap,
};
use crate::types::AttrType;
use once_cell::sync::Lazy;
use std::sync::Arc;

static EMPTY: Lazy<Arc<EmptyAttributeMap>> = Lazy::new(|| Arc::new(EmptyAttributeMap));

/// Factory for the canonical empty map, singleton maps and unmodifiable views.
pub struct Attributes;

impl Attributes {
    /// The canonical empty map. Borrows the same instance that
    /// [`shared_empty`](Self::shared_empty) hands out.
    pub fn empty() -> &'static EmptyAttributeMap {
        &**EMPTY
    }

    /// The canonical empty map as a shared handle. Every call returns the
    /// same allocation.
    pub fn shared_empty() -> SharedAttributeMap {
        Arc::clone(&*EMPTY) as SharedAttributeMap
    }

    pub fn is_shared_empty(map: &SharedAttributeMap) -> bool {
        Arc::as_ptr(map) as *const () == Arc::as_ptr(&*EMPTY) as *const ()
    }

    /// Validates `value` and returns a map binding only `attr`.
    pub fn singleton<T: AttrType>(attr: &Attribute<T>, value: T) -> Result<SingletonAttributeMap> {
        attr.singleton(value)
    }

    pub fn unmodifiable<M: AttributeMap + 'static>(map: M) -> ImmutableAttributeMap {
        ImmutableAttributeMap::new(Arc::new(map))
    }

    pub fn unmodifiable_shared(map: SharedAttributeMap) -> ImmutableAttributeMap {
        ImmutableAttributeMap::new(map)
    }
}
