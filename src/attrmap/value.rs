//! Stored value representation.
//!
//! Maps store every bound value as a [`Value`]: primitives live inline in the
//! enum, anything else is boxed inside an [`ObjectValue`]. Typed accessors on
//! [`Attribute`](crate::Attribute) convert at the boundary so callers never see
//! this type unless they walk a map generically.

use crate::kind::AttrKind;
use crate::types::AttrType;
use std::any::Any;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Type-erased object storage. Blanket-implemented for every [`AttrType`].
pub(crate) trait DynObject: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn clone_box(&self) -> Box<dyn DynObject>;
    fn dyn_eq(&self, other: &dyn DynObject) -> bool;
    fn debug_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
    fn type_name(&self) -> &'static str;
}

impl<T: AttrType> DynObject for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_box(&self) -> Box<dyn DynObject> {
        Box::new(self.clone())
    }

    fn dyn_eq(&self, other: &dyn DynObject) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn debug_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// A boxed value of the `Object` category.
pub struct ObjectValue(Box<dyn DynObject>);

impl ObjectValue {
    pub fn new<T: AttrType>(value: T) -> Self {
        ObjectValue(Box::new(value))
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }
}

impl Clone for ObjectValue {
    fn clone(&self) -> Self {
        ObjectValue(self.0.clone_box())
    }
}

impl PartialEq for ObjectValue {
    fn eq(&self, other: &Self) -> bool {
        self.0.dyn_eq(other.0.as_ref())
    }
}

impl fmt::Debug for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.debug_fmt(f)
    }
}

/// A value bound in an attribute map, tagged by category.
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    Byte(i8),
    Char(char),
    Double(f64),
    Float(f32),
    Int(i32),
    Long(i64),
    Short(i16),
    Object(ObjectValue),
}

impl Value {
    pub fn kind(&self) -> AttrKind {
        match self {
            Value::Bool(_) => AttrKind::Bool,
            Value::Byte(_) => AttrKind::Byte,
            Value::Char(_) => AttrKind::Char,
            Value::Double(_) => AttrKind::Double,
            Value::Float(_) => AttrKind::Float,
            Value::Int(_) => AttrKind::Int,
            Value::Long(_) => AttrKind::Long,
            Value::Short(_) => AttrKind::Short,
            Value::Object(_) => AttrKind::Object,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectValue> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Hash consistent with `==`. Object payloads only contribute their category.
    pub(crate) fn hash_code(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.kind().hash(&mut hasher);
        match self {
            Value::Bool(v) => v.hash(&mut hasher),
            Value::Byte(v) => v.hash(&mut hasher),
            Value::Char(v) => v.hash(&mut hasher),
            Value::Double(v) => v.to_bits().hash(&mut hasher),
            Value::Float(v) => v.to_bits().hash(&mut hasher),
            Value::Int(v) => v.hash(&mut hasher),
            Value::Long(v) => v.hash(&mut hasher),
            Value::Short(v) => v.hash(&mut hasher),
            Value::Object(_) => {}
        }
        hasher.finish()
    }
}

// Floating values compare by bit pattern so that equality stays reflexive
// even when a custom validator admits NaN.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::Byte(v) => write!(f, "{}", v),
            Value::Char(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            Value::Short(v) => write!(f, "{}", v),
            Value::Object(v) => write!(f, "{:?}", v),
        }
    }
}
