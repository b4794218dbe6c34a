//! # Attrmap
//!
//! Attrmap is a **typesafe heterogeneous container**: a map whose keys are
//! typed [`Attribute`] tokens and whose values are whatever type the token
//! declares. Reading `map.get(&count)` with an `IntAttribute` hands back an
//! `i32`, never a boxed or casted value.
//!
//! ## The Pieces
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Attribute<T>  (attribute.rs, types.rs)                     │
//! │  - Identity-compared token: name, default, validator        │
//! │  - Eight primitive aliases plus ObjectAttribute<T>          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  AttributeMap  (map/)                                       │
//! │  - Object-safe contract over erased keys and Values         │
//! │  - Empty, Singleton, Default and Immutable strategies       │
//! │  - Typed access via AttributeMapExt                         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Persistence  (registry.rs, snapshot.rs, config.rs)         │
//! │  - Name registry restores identities across a boundary      │
//! │  - JSON snapshots and a declarative attribute schema        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use attrmap::{AttributeMapExt, Attributes, DefaultAttributeMap, IntAttribute};
//!
//! let retries = IntAttribute::named("retries", 3).unwrap();
//!
//! let mut map = DefaultAttributeMap::new();
//! assert_eq!(map.get(&retries), 3);
//! assert_eq!(map.put(&retries, 5).unwrap(), 3);
//! assert_eq!(map.get(&retries), 5);
//!
//! let mut frozen = Attributes::unmodifiable(map);
//! assert!(frozen.put(&retries, 6).is_err());
//! assert_eq!(frozen.get(&retries), 5);
//! ```
//!
//! ## Identity
//!
//! Two attributes built with the same name and default are still different
//! keys. Only the token you hold reads the value you stored with it. Names
//! matter only when a map crosses a process boundary, see [`snapshot`].

pub mod attribute;
pub mod attributes;
pub mod config;
pub mod error;
pub mod host;
pub mod kind;
pub mod map;
pub mod registry;
pub mod snapshot;
pub mod types;
pub mod value;
pub mod visit;

pub use attribute::{
    Attribute, AttributeBuilder, AttributeId, AttributeKey, BoolAttribute, ByteAttribute,
    CharAttribute, DoubleAttribute, FloatAttribute, IntAttribute, LongAttribute,
    ObjectAttribute, ShortAttribute,
};
pub use attributes::Attributes;
pub use config::{AttributeDef, AttributeSchema};
pub use error::{AttrError, Result};
pub use host::{WithAttributes, WithAttributesMut};
pub use kind::AttrKind;
pub use map::{
    AttributeMap, AttributeMapExt, DefaultAttributeMap, EmptyAttributeMap,
    ImmutableAttributeMap, SharedAttributeMap, SingletonAttributeMap, Strategy,
};
pub use registry::AttributeRegistry;
pub use snapshot::MapSnapshot;
pub use types::{AttrType, Ordered};
pub use value::{ObjectValue, Value};
pub use visit::{visit, AttributeVisitor};
