//! The value-type abstraction behind [`Attribute`](crate::Attribute).
//!
//! [`AttrType`] captures what the map needs from a value type: its category,
//! conversion to and from the stored [`Value`], text parsing, the default
//! validity rule and an optional JSON codec. The eight primitive types
//! implement every method; other types get the object behavior for free and
//! only need an empty impl:
//!
//! ```
//! use attrmap::AttrType;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Endpoint { host: String, port: u16 }
//!
//! impl AttrType for Endpoint {}
//! ```

use crate::error::{AttrError, Result};
use crate::kind::AttrKind;
use crate::value::{ObjectValue, Value};
use serde_json::Value as JsonValue;
use std::cmp::Ordering;
use std::fmt;

/// A type that can be bound to an attribute.
pub trait AttrType: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    const KIND: AttrKind = AttrKind::Object;

    fn into_value(self) -> Value {
        Value::Object(ObjectValue::new(self))
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_object()?.downcast_ref::<Self>().cloned()
    }

    /// Locale-independent text conversion. `None` means the text is malformed.
    fn parse_text(_text: &str) -> Option<Self> {
        None
    }

    /// The validity rule used when an attribute has no custom validator.
    fn is_valid_default(&self) -> bool {
        true
    }

    fn to_json(&self) -> Result<JsonValue> {
        Err(AttrError::NotPersistable(std::any::type_name::<Self>()))
    }

    fn from_json(_json: JsonValue) -> Result<Self> {
        Err(AttrError::NotPersistable(std::any::type_name::<Self>()))
    }
}

/// Value types with a total order, usable for sorting hosts by attribute.
pub trait Ordered: AttrType {
    fn total_cmp(&self, other: &Self) -> Ordering;
}

macro_rules! integer_type {
    ($ty:ty, $kind:ident) => {
        impl AttrType for $ty {
            const KIND: AttrKind = AttrKind::$kind;

            fn into_value(self) -> Value {
                Value::$kind(self)
            }

            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::$kind(v) => Some(*v),
                    _ => None,
                }
            }

            fn parse_text(text: &str) -> Option<Self> {
                text.trim().parse().ok()
            }

            fn to_json(&self) -> Result<JsonValue> {
                Ok(serde_json::to_value(self)?)
            }

            fn from_json(json: JsonValue) -> Result<Self> {
                Ok(serde_json::from_value(json)?)
            }
        }

        impl Ordered for $ty {
            fn total_cmp(&self, other: &Self) -> Ordering {
                self.cmp(other)
            }
        }
    };
}

integer_type!(i8, Byte);
integer_type!(i16, Short);
integer_type!(i32, Int);
integer_type!(i64, Long);

const NAN_TEXT: &str = "NaN";
const INFINITY_TEXT: &str = "inf";
const NEG_INFINITY_TEXT: &str = "-inf";

macro_rules! floating_type {
    ($ty:ty, $kind:ident) => {
        impl AttrType for $ty {
            const KIND: AttrKind = AttrKind::$kind;

            fn into_value(self) -> Value {
                Value::$kind(self)
            }

            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::$kind(v) => Some(*v),
                    _ => None,
                }
            }

            fn parse_text(text: &str) -> Option<Self> {
                text.trim().parse().ok()
            }

            /// NaN and both infinities are rejected unless a validator says otherwise.
            fn is_valid_default(&self) -> bool {
                self.is_finite()
            }

            // JSON numbers cannot hold NaN or infinities, so those travel as strings.
            fn to_json(&self) -> Result<JsonValue> {
                let text = if self.is_nan() {
                    NAN_TEXT
                } else if *self == <$ty>::INFINITY {
                    INFINITY_TEXT
                } else if *self == <$ty>::NEG_INFINITY {
                    NEG_INFINITY_TEXT
                } else {
                    return Ok(serde_json::to_value(self)?);
                };
                Ok(JsonValue::String(text.to_string()))
            }

            fn from_json(json: JsonValue) -> Result<Self> {
                let special = match json.as_str() {
                    Some(NAN_TEXT) => Some(<$ty>::NAN),
                    Some(INFINITY_TEXT) => Some(<$ty>::INFINITY),
                    Some(NEG_INFINITY_TEXT) => Some(<$ty>::NEG_INFINITY),
                    _ => None,
                };
                match special {
                    Some(value) => Ok(value),
                    None => Ok(serde_json::from_value(json)?),
                }
            }
        }

        impl Ordered for $ty {
            fn total_cmp(&self, other: &Self) -> Ordering {
                <$ty>::total_cmp(self, other)
            }
        }
    };
}

floating_type!(f32, Float);
floating_type!(f64, Double);

impl AttrType for bool {
    const KIND: AttrKind = AttrKind::Bool;

    fn into_value(self) -> Value {
        Value::Bool(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    fn parse_text(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("true") {
            Some(true)
        } else if text.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }

    fn to_json(&self) -> Result<JsonValue> {
        Ok(JsonValue::Bool(*self))
    }

    fn from_json(json: JsonValue) -> Result<Self> {
        Ok(serde_json::from_value(json)?)
    }
}

impl Ordered for bool {
    fn total_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl AttrType for char {
    const KIND: AttrKind = AttrKind::Char;

    fn into_value(self) -> Value {
        Value::Char(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Char(v) => Some(*v),
            _ => None,
        }
    }

    // Not trimmed: a single space is a valid char.
    fn parse_text(text: &str) -> Option<Self> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }

    fn to_json(&self) -> Result<JsonValue> {
        Ok(serde_json::to_value(self)?)
    }

    fn from_json(json: JsonValue) -> Result<Self> {
        Ok(serde_json::from_value(json)?)
    }
}

impl Ordered for char {
    fn total_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl AttrType for String {
    fn parse_text(text: &str) -> Option<Self> {
        Some(text.to_string())
    }

    fn to_json(&self) -> Result<JsonValue> {
        Ok(JsonValue::String(self.clone()))
    }

    fn from_json(json: JsonValue) -> Result<Self> {
        Ok(serde_json::from_value(json)?)
    }
}

impl Ordered for String {
    fn total_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    impl AttrType for Point {}

    #[test]
    fn primitive_kinds() {
        assert_eq!(<bool as AttrType>::KIND, AttrKind::Bool);
        assert_eq!(<i8 as AttrType>::KIND, AttrKind::Byte);
        assert_eq!(<char as AttrType>::KIND, AttrKind::Char);
        assert_eq!(<f64 as AttrType>::KIND, AttrKind::Double);
        assert_eq!(<f32 as AttrType>::KIND, AttrKind::Float);
        assert_eq!(<i32 as AttrType>::KIND, AttrKind::Int);
        assert_eq!(<i64 as AttrType>::KIND, AttrKind::Long);
        assert_eq!(<i16 as AttrType>::KIND, AttrKind::Short);
        assert_eq!(<String as AttrType>::KIND, AttrKind::Object);
        assert_eq!(<Point as AttrType>::KIND, AttrKind::Object);
    }

    #[test]
    fn primitives_are_stored_inline() {
        assert!(matches!(7i32.into_value(), Value::Int(7)));
        assert!(matches!(3i16.into_value(), Value::Short(3)));
        assert_eq!(i64::from_value(&Value::Long(9)), Some(9));
        assert_eq!(i64::from_value(&Value::Int(9)), None);
    }

    #[test]
    fn objects_round_trip_through_value() {
        let point = Point { x: 1, y: 2 };
        let value = point.clone().into_value();
        assert_eq!(value.kind(), AttrKind::Object);
        assert_eq!(Point::from_value(&value), Some(point));
        assert_eq!(String::from_value(&value), None);
    }

    #[test]
    fn integer_parsing() {
        assert_eq!(i32::parse_text(" 42 "), Some(42));
        assert_eq!(i32::parse_text("4x2"), None);
        assert_eq!(i8::parse_text("128"), None);
        assert_eq!(i16::parse_text("-32768"), Some(i16::MIN));
    }

    #[test]
    fn floating_parsing_and_validity() {
        assert_eq!(f64::parse_text("2.5"), Some(2.5));
        assert_eq!(f32::parse_text("abc"), None);
        assert!(f64::parse_text("NaN").is_some());
        assert!(!f64::NAN.is_valid_default());
        assert!(!f64::INFINITY.is_valid_default());
        assert!(!f32::NEG_INFINITY.is_valid_default());
        assert!(1.0f32.is_valid_default());
    }

    #[test]
    fn bool_parsing_is_strict() {
        assert_eq!(bool::parse_text("TRUE"), Some(true));
        assert_eq!(bool::parse_text("false"), Some(false));
        assert_eq!(bool::parse_text("yes"), None);
    }

    #[test]
    fn char_parsing_needs_exactly_one_char() {
        assert_eq!(char::parse_text("x"), Some('x'));
        assert_eq!(char::parse_text(" "), Some(' '));
        assert_eq!(char::parse_text(""), None);
        assert_eq!(char::parse_text("xy"), None);
    }

    #[test]
    fn objects_without_codec_are_not_persistable() {
        let err = Point { x: 0, y: 0 }.to_json().unwrap_err();
        assert!(matches!(err, AttrError::NotPersistable(_)));
        assert!(Point::parse_text("1,2").is_none());
    }

    #[test]
    fn float_ordering_is_total() {
        assert_eq!(f64::NAN.total_cmp(&1.0), Ordering::Greater);
        assert_eq!((-0.0f64).total_cmp(&0.0), Ordering::Less);
        assert_eq!(Ordered::total_cmp(&2i32, &2i32), Ordering::Equal);
    }

    #[test]
    fn json_codec_for_primitives() {
        assert_eq!(5i64.to_json().unwrap(), serde_json::json!(5));
        assert_eq!(char::from_json(serde_json::json!("z")).unwrap(), 'z');
        assert!(i8::from_json(serde_json::json!(1000)).is_err());
    }

    #[test]
    fn non_finite_floats_use_string_json() {
        assert_eq!(f64::NAN.to_json().unwrap(), serde_json::json!("NaN"));
        assert_eq!(f32::INFINITY.to_json().unwrap(), serde_json::json!("inf"));
        assert_eq!(f64::NEG_INFINITY.to_json().unwrap(), serde_json::json!("-inf"));
        assert_eq!(2.5f64.to_json().unwrap(), serde_json::json!(2.5));

        assert!(f64::from_json(serde_json::json!("NaN")).unwrap().is_nan());
        assert_eq!(f32::from_json(serde_json::json!("inf")).unwrap(), f32::INFINITY);
        assert_eq!(
            f64::from_json(serde_json::json!("-inf")).unwrap(),
            f64::NEG_INFINITY
        );
        assert_eq!(f64::from_json(serde_json::json!(0.25)).unwrap(), 0.25);
        assert!(f64::from_json(serde_json::json!("nan?")).is_err());
        assert!(f64::from_json(serde_json::Value::Null).is_err());
    }
}
