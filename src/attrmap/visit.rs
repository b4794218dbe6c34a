//! Per-category traversal of a map's bindings.
//!
//! [`visit`] walks every bound entry and calls the visitor method matching the
//! value's category, so a consumer can handle `i32`s, `f64`s and objects
//! without matching on [`Value`] itself. Unhandled categories are skipped.

use crate::attribute::AttributeKey;
use crate::map::AttributeMap;
use crate::value::{ObjectValue, Value};

pub trait AttributeVisitor {
    fn visit_bool(&mut self, _key: &AttributeKey, _value: bool) {}
    fn visit_byte(&mut self, _key: &AttributeKey, _value: i8) {}
    fn visit_char(&mut self, _key: &AttributeKey, _value: char) {}
    fn visit_double(&mut self, _key: &AttributeKey, _value: f64) {}
    fn visit_float(&mut self, _key: &AttributeKey, _value: f32) {}
    fn visit_int(&mut self, _key: &AttributeKey, _value: i32) {}
    fn visit_long(&mut self, _key: &AttributeKey, _value: i64) {}
    fn visit_short(&mut self, _key: &AttributeKey, _value: i16) {}
    fn visit_object(&mut self, _key: &AttributeKey, _value: &ObjectValue) {}
}

pub fn visit<M, V>(map: &M, visitor: &mut V)
where
    M: AttributeMap + ?Sized,
    V: AttributeVisitor + ?Sized,
{
    for (key, value) in map.entries() {
        match value {
            Value::Bool(v) => visitor.visit_bool(key, *v),
            Value::Byte(v) => visitor.visit_byte(key, *v),
            Value::Char(v) => visitor.visit_char(key, *v),
            Value::Double(v) => visitor.visit_double(key, *v),
            Value::Float(v) => visitor.visit_float(key, *v),
            Value::Int(v) => visitor.visit_int(key, *v),
            Value::Long(v) => visitor.visit_long(key, *v),
            Value::Short(v) => visitor.visit_short(key, *v),
            Value::Object(v) => visitor.visit_object(key, v),
        }
    }
}
