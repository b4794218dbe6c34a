//! # Attribute Maps
//!
//! This module defines the [`AttributeMap`] contract and its storage
//! strategies. A map is a finite set of `(attribute, value)` bindings where
//! bindings are distinguished by attribute identity.
//!
//! ## The Contract
//!
//! [`AttributeMap`] is object safe and works on erased keys and [`Value`]s.
//! Typed access goes through [`AttributeMapExt`], which every map (including
//! `dyn AttributeMap`) gets for free:
//!
//! - `get(attr)` returns the bound value or the attribute's default. Reading
//!   never creates a binding.
//! - `put(attr, value)` validates, stores, and returns the previous value or
//!   the default if there was none.
//! - `remove(attr)` returns the removed value or the default. Removing an
//!   unbound attribute changes nothing.
//!
//! ## Strategies
//!
//! | Strategy | Bindings | Mutable | Notes |
//! |----------|----------|---------|-------|
//! | [`EmptyAttributeMap`] | 0 | no | canonical shared instance via [`Attributes`](crate::Attributes) |
//! | [`SingletonAttributeMap`] | 1 | no | single identity comparison per lookup |
//! | [`DefaultAttributeMap`] | 0..N | yes | identity-keyed hash map |
//! | [`ImmutableAttributeMap`] | delegates | no | read-through wrapper over any map |
//!
//! Every mutator on a read-only strategy fails with `UnsupportedMutation` and
//! leaves the map untouched, including `clear()` on an already empty map.
//! There is no in-place promotion from Empty or Singleton to Default; use
//! [`DefaultAttributeMap::copy_of`].
//!
//! ## Equality
//!
//! Equality is structural over the binding set regardless of strategy: an
//! Empty map equals an empty Default map, a Singleton equals a Default map
//! holding the same single binding. Hashes follow the same rule.
//!
//! ## Concurrency
//!
//! No internal synchronization. The read-only strategies are never mutated
//! after construction and can be shared freely (`Arc<dyn AttributeMap>`).

use crate::attribute::{Attribute, AttributeKey};
use crate::error::Result;
use crate::types::AttrType;
use crate::value::Value;
use crate::visit::{self, AttributeVisitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Implements structural `PartialEq`/`Eq`/`Hash` for a strategy type.
macro_rules! structural_eq {
    ($ty:ty) => {
        impl<M: $crate::map::AttributeMap + ?Sized> PartialEq<M> for $ty {
            fn eq(&self, other: &M) -> bool {
                $crate::map::same_bindings(self, other)
            }
        }

        impl Eq for $ty {}

        impl std::hash::Hash for $ty {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                state.write_u64($crate::map::hash_code(self));
            }
        }
    };
}

mod default;
mod empty;
mod immutable;
mod singleton;

pub use default::DefaultAttributeMap;
pub use empty::EmptyAttributeMap;
pub use immutable::ImmutableAttributeMap;
pub use singleton::SingletonAttributeMap;

pub type Entries<'a> = Box<dyn Iterator<Item = (&'a AttributeKey, &'a Value)> + 'a>;

/// A map shared behind a reference count.
pub type SharedAttributeMap = Arc<dyn AttributeMap>;

/// The storage strategy behind a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Empty,
    Singleton,
    Default,
    Immutable,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Empty => "empty",
            Strategy::Singleton => "singleton",
            Strategy::Default => "default",
            Strategy::Immutable => "immutable",
        }
    }

    pub fn is_mutable(&self) -> bool {
        matches!(self, Strategy::Default)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The polymorphic map interface every strategy implements.
pub trait AttributeMap: fmt::Debug + Send + Sync {
    fn strategy(&self) -> Strategy;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The value physically bound for `key`. Never the default.
    fn value(&self, key: &AttributeKey) -> Option<&Value>;

    fn contains_key(&self, key: &AttributeKey) -> bool {
        self.value(key).is_some()
    }

    /// Validates `value` against `key` and binds it, returning the replaced value.
    fn insert(&mut self, key: &AttributeKey, value: Value) -> Result<Option<Value>>;

    fn remove_key(&mut self, key: &AttributeKey) -> Result<Option<Value>>;

    fn clear(&mut self) -> Result<()>;

    /// Bound entries only, in no particular order.
    fn entries(&self) -> Entries<'_>;
}

impl PartialEq for dyn AttributeMap + '_ {
    fn eq(&self, other: &Self) -> bool {
        same_bindings(self, other)
    }
}

/// True if both maps bind the same attributes to equal values.
pub fn same_bindings<A, B>(a: &A, b: &B) -> bool
where
    A: AttributeMap + ?Sized,
    B: AttributeMap + ?Sized,
{
    a.len() == b.len() && a.entries().all(|(key, value)| b.value(key) == Some(value))
}

/// Order-independent hash of the binding set.
pub fn hash_code<M: AttributeMap + ?Sized>(map: &M) -> u64 {
    map.entries().fold(0u64, |acc, (key, value)| {
        acc.wrapping_add(key.identity_hash() ^ value.hash_code())
    })
}

macro_rules! specialized_accessors {
    ($($ty:ty => $get:ident, $get_or:ident, $put:ident, $remove:ident;)*) => {
        $(
            fn $get(&self, attr: &Attribute<$ty>) -> $ty {
                self.get(attr)
            }

            fn $get_or(&self, attr: &Attribute<$ty>, default: $ty) -> $ty {
                self.get_or(attr, default)
            }

            fn $put(&mut self, attr: &Attribute<$ty>, value: $ty) -> Result<$ty> {
                self.put(attr, value)
            }

            fn $remove(&mut self, attr: &Attribute<$ty>) -> Result<$ty> {
                self.remove(attr)
            }
        )*
    };
}

/// Typed access on top of [`AttributeMap`].
///
/// Primitive values travel unboxed: `get` on an `IntAttribute` reads the
/// `i32` straight out of the stored [`Value::Int`].
pub trait AttributeMapExt: AttributeMap {
    fn get<T: AttrType>(&self, attr: &Attribute<T>) -> T {
        self.value(attr.key())
            .and_then(T::from_value)
            .unwrap_or_else(|| attr.default_value())
    }

    fn get_or<T: AttrType>(&self, attr: &Attribute<T>, default: T) -> T {
        self.value(attr.key())
            .and_then(T::from_value)
            .unwrap_or(default)
    }

    fn put<T: AttrType>(&mut self, attr: &Attribute<T>, value: T) -> Result<T> {
        let previous = self.insert(attr.key(), value.into_value())?;
        Ok(previous
            .as_ref()
            .and_then(T::from_value)
            .unwrap_or_else(|| attr.default_value()))
    }

    fn remove<T: AttrType>(&mut self, attr: &Attribute<T>) -> Result<T> {
        let removed = self.remove_key(attr.key())?;
        Ok(removed
            .as_ref()
            .and_then(T::from_value)
            .unwrap_or_else(|| attr.default_value()))
    }

    fn contains<T: AttrType>(&self, attr: &Attribute<T>) -> bool {
        self.contains_key(attr.key())
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &AttributeKey> + '_> {
        Box::new(self.entries().map(|(key, _)| key))
    }

    fn values(&self) -> Box<dyn Iterator<Item = &Value> + '_> {
        Box::new(self.entries().map(|(_, value)| value))
    }

    /// The bound value for `key`, or the key's default.
    fn effective_value(&self, key: &AttributeKey) -> Value {
        self.value(key)
            .cloned()
            .unwrap_or_else(|| key.default_value())
    }

    fn hash_code(&self) -> u64 {
        hash_code(self)
    }

    fn accept<V: AttributeVisitor + ?Sized>(&self, visitor: &mut V) {
        visit::visit(self, visitor)
    }

    specialized_accessors! {
        bool => get_bool, get_bool_or, put_bool, remove_bool;
        i8 => get_byte, get_byte_or, put_byte, remove_byte;
        char => get_char, get_char_or, put_char, remove_char;
        f64 => get_double, get_double_or, put_double, remove_double;
        f32 => get_float, get_float_or, put_float, remove_float;
        i32 => get_int, get_int_or, put_int, remove_int;
        i64 => get_long, get_long_or, put_long, remove_long;
        i16 => get_short, get_short_or, put_short, remove_short;
    }
}

impl<M: AttributeMap + ?Sized> AttributeMapExt for M {}
