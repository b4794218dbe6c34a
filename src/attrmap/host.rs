//! Carrier traits for types that embed an attribute map.
//!
//! Configuration objects and metadata holders implement these to get typed,
//! schema-free extension points: `attr.get_from(&config)`,
//! `attr.set_on(&mut config, value)`, `attr.is_set(&config)` and
//! `attr.compare(&a, &b)` for sorting.

use crate::map::AttributeMap;

pub trait WithAttributes {
    fn attributes(&self) -> &dyn AttributeMap;
}

pub trait WithAttributesMut: WithAttributes {
    fn attributes_mut(&mut self) -> &mut dyn AttributeMap;
}
