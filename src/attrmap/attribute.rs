//! Attribute tokens.
//!
//! An [`Attribute<T>`] is an immutable, identity-compared descriptor: a name,
//! a value type `T`, a default value and a validity rule. Two attributes are
//! equal only if one is a clone of the other; constructing a second attribute
//! with the same name, type and default yields a distinct key. Attributes are
//! meant to be created once and shared, typically as `Lazy` statics:
//!
//! ```
//! use attrmap::{AttributeMapExt, DefaultAttributeMap, IntAttribute};
//! use once_cell::sync::Lazy;
//!
//! static COUNT: Lazy<IntAttribute> =
//!     Lazy::new(|| IntAttribute::named("count", 0).expect("valid default"));
//!
//! let mut map = DefaultAttributeMap::new();
//! assert_eq!(map.get(&COUNT), 0);
//! map.put(&COUNT, 5).unwrap();
//! assert_eq!(map.get(&COUNT), 5);
//! ```
//!
//! Cloning an attribute is cheap (one reference count) and preserves identity.
//! The erased form, [`AttributeKey`], is what maps actually store.

use crate::error::{AttrError, Result};
use crate::host::{WithAttributes, WithAttributesMut};
use crate::kind::AttrKind;
use crate::map::{AttributeMap, AttributeMapExt, SingletonAttributeMap};
use crate::types::{AttrType, Ordered};
use crate::value::Value;
use serde_json::Value as JsonValue;
use std::any::{Any, TypeId};
use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

type Validator<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;
type Parser<T> = Arc<dyn Fn(&str) -> Option<T> + Send + Sync>;

/// Process-unique identity of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttributeId(u64);

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Core<T: AttrType> {
    id: AttributeId,
    name: String,
    identity_hash: u64,
    default: T,
    validator: Option<Validator<T>>,
    parser: Option<Parser<T>>,
}

impl<T: AttrType> Core<T> {
    fn is_valid(&self, value: &T) -> bool {
        match &self.validator {
            Some(validator) => validator(value),
            None => value.is_valid_default(),
        }
    }

    fn invalid(&self, value: impl fmt::Debug) -> AttrError {
        AttrError::InvalidValue {
            attribute: self.name.clone(),
            value: format!("{:?}", value),
        }
    }

    fn mismatch(&self, actual: AttrKind) -> AttrError {
        AttrError::TypeMismatch {
            attribute: self.name.clone(),
            expected: T::KIND,
            actual,
        }
    }

    fn parse(&self, text: &str) -> Result<T> {
        let parsed = match &self.parser {
            Some(parser) => parser(text),
            None => T::parse_text(text),
        };
        parsed.ok_or_else(|| AttrError::Parse {
            attribute: self.name.clone(),
            kind: T::KIND,
            text: text.to_string(),
        })
    }
}

/// Type-erased operations on an attribute, used by maps and the registry.
pub(crate) trait Descriptor: Send + Sync {
    fn id(&self) -> AttributeId;
    fn name(&self) -> &str;
    fn kind(&self) -> AttrKind;
    fn type_name(&self) -> &'static str;
    fn identity_hash(&self) -> u64;
    fn default_value(&self) -> Value;
    fn check_value(&self, value: &Value) -> Result<()>;
    fn parse_value(&self, text: &str) -> Result<Value>;
    fn encode(&self, value: &Value) -> Result<JsonValue>;
    fn decode(&self, json: JsonValue) -> Result<Value>;
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: AttrType> Descriptor for Core<T> {
    fn id(&self) -> AttributeId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> AttrKind {
        T::KIND
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn identity_hash(&self) -> u64 {
        self.identity_hash
    }

    fn default_value(&self) -> Value {
        self.default.clone().into_value()
    }

    fn check_value(&self, value: &Value) -> Result<()> {
        if value.kind() != T::KIND {
            return Err(self.mismatch(value.kind()));
        }
        let valid = match value {
            Value::Object(object) => object.downcast_ref::<T>().map(|v| self.is_valid(v)),
            primitive => T::from_value(primitive).map(|v| self.is_valid(&v)),
        };
        match valid {
            Some(true) => Ok(()),
            Some(false) => Err(AttrError::InvalidValue {
                attribute: self.name.clone(),
                value: value.to_string(),
            }),
            None => Err(self.mismatch(value.kind())),
        }
    }

    fn parse_value(&self, text: &str) -> Result<Value> {
        self.parse(text).map(AttrType::into_value)
    }

    fn encode(&self, value: &Value) -> Result<JsonValue> {
        let typed = match value {
            Value::Object(object) => object.downcast_ref::<T>().cloned(),
            primitive => T::from_value(primitive),
        };
        typed
            .ok_or_else(|| self.mismatch(value.kind()))?
            .to_json()
    }

    fn decode(&self, json: JsonValue) -> Result<Value> {
        Ok(T::from_json(json)?.into_value())
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// The erased, identity-compared form of an attribute.
///
/// Equality and hashing follow the originating [`Attribute`]: keys obtained
/// from clones of the same attribute are equal, keys from independently
/// constructed attributes never are.
#[derive(Clone)]
pub struct AttributeKey {
    inner: Arc<dyn Descriptor>,
}

impl AttributeKey {
    pub fn id(&self) -> AttributeId {
        self.inner.id()
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn kind(&self) -> AttrKind {
        self.inner.kind()
    }

    pub fn type_name(&self) -> &'static str {
        self.inner.type_name()
    }

    /// Hash derived from the name and value type, computed at construction.
    pub fn identity_hash(&self) -> u64 {
        self.inner.identity_hash()
    }

    pub fn default_value(&self) -> Value {
        self.inner.default_value()
    }

    /// Fails with `TypeMismatch` for a value of the wrong type and with
    /// `InvalidValue` when the attribute's validity rule rejects it.
    pub fn check_value(&self, value: &Value) -> Result<()> {
        self.inner.check_value(value)
    }

    pub fn parse_value(&self, text: &str) -> Result<Value> {
        self.inner.parse_value(text)
    }

    pub fn encode(&self, value: &Value) -> Result<JsonValue> {
        self.inner.encode(value)
    }

    pub fn decode(&self, json: JsonValue) -> Result<Value> {
        self.inner.decode(json)
    }

    /// Recovers the typed attribute this key was taken from.
    pub fn downcast<T: AttrType>(&self) -> Option<Attribute<T>> {
        let core = Arc::clone(&self.inner).into_any().downcast::<Core<T>>().ok()?;
        Some(Attribute::from_core(core))
    }
}

impl PartialEq for AttributeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for AttributeKey {}

impl Hash for AttributeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.identity_hash());
    }
}

impl fmt::Debug for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeKey")
            .field("id", &self.id())
            .field("name", &self.name())
            .field("kind", &self.kind())
            .finish()
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed attribute token. See the [module docs](self).
pub struct Attribute<T: AttrType> {
    core: Arc<Core<T>>,
    key: AttributeKey,
}

pub type BoolAttribute = Attribute<bool>;
pub type ByteAttribute = Attribute<i8>;
pub type CharAttribute = Attribute<char>;
pub type DoubleAttribute = Attribute<f64>;
pub type FloatAttribute = Attribute<f32>;
pub type IntAttribute = Attribute<i32>;
pub type LongAttribute = Attribute<i64>;
pub type ShortAttribute = Attribute<i16>;
pub type ObjectAttribute<T> = Attribute<T>;

impl<T: AttrType> Attribute<T> {
    /// Creates an attribute with a generated, process-unique name.
    pub fn new(default: T) -> Result<Self> {
        AttributeBuilder::new(default).build()
    }

    /// Creates an attribute with an explicit name.
    ///
    /// The name is what persistence and the registry use to find the attribute
    /// again; it plays no part in in-process equality.
    pub fn named(name: impl Into<String>, default: T) -> Result<Self> {
        AttributeBuilder::new(default).name(name).build()
    }

    pub fn builder(default: T) -> AttributeBuilder<T> {
        AttributeBuilder::new(default)
    }

    fn from_core(core: Arc<Core<T>>) -> Self {
        let erased: Arc<dyn Descriptor> = core.clone();
        Self {
            core,
            key: AttributeKey { inner: erased },
        }
    }

    pub fn id(&self) -> AttributeId {
        self.core.id
    }

    pub fn name(&self) -> &str {
        &self.core.name
    }

    pub fn kind(&self) -> AttrKind {
        T::KIND
    }

    pub fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    pub fn key(&self) -> &AttributeKey {
        &self.key
    }

    pub fn default_value(&self) -> T {
        self.core.default.clone()
    }

    pub fn default_ref(&self) -> &T {
        &self.core.default
    }

    pub fn is_valid(&self, value: &T) -> bool {
        self.core.is_valid(value)
    }

    pub fn check_valid(&self, value: &T) -> Result<()> {
        if self.core.is_valid(value) {
            Ok(())
        } else {
            Err(self.core.invalid(value))
        }
    }

    /// Parses `text` with the attribute's parser. Does not validate.
    pub fn from_string(&self, text: &str) -> Result<T> {
        self.core.parse(text)
    }

    /// A read-only map binding only this attribute.
    pub fn singleton(&self, value: T) -> Result<SingletonAttributeMap> {
        self.check_valid(&value)?;
        Ok(SingletonAttributeMap::bind(self.key.clone(), value.into_value()))
    }

    pub fn get<M: AttributeMap + ?Sized>(&self, map: &M) -> T {
        map.get(self)
    }

    pub fn get_or<M: AttributeMap + ?Sized>(&self, map: &M, default: T) -> T {
        map.get_or(self, default)
    }

    /// Validates and stores `value`, returning the previous value.
    pub fn set<M: AttributeMap + ?Sized>(&self, map: &mut M, value: T) -> Result<T> {
        map.put(self, value)
    }

    pub fn get_from<H: WithAttributes + ?Sized>(&self, host: &H) -> T {
        host.attributes().get(self)
    }

    pub fn get_from_or<H: WithAttributes + ?Sized>(&self, host: &H, default: T) -> T {
        host.attributes().get_or(self, default)
    }

    pub fn set_on<H: WithAttributesMut + ?Sized>(&self, host: &mut H, value: T) -> Result<T> {
        host.attributes_mut().put(self, value)
    }

    /// True if the host's map binds this attribute, even to its default value.
    pub fn is_set<H: WithAttributes + ?Sized>(&self, host: &H) -> bool {
        host.attributes().contains(self)
    }
}

impl<T: Ordered> Attribute<T> {
    /// Orders two hosts by the value each binds for this attribute.
    /// Unbound hosts sort as if bound to the default.
    pub fn compare<H: WithAttributes + ?Sized>(&self, first: &H, second: &H) -> Ordering {
        self.get_from(first).total_cmp(&self.get_from(second))
    }
}

impl<T: AttrType> Clone for Attribute<T> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
            key: self.key.clone(),
        }
    }
}

impl<T: AttrType> PartialEq for Attribute<T> {
    fn eq(&self, other: &Self) -> bool {
        self.core.id == other.core.id
    }
}

impl<T: AttrType> Eq for Attribute<T> {}

impl<T: AttrType> Hash for Attribute<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.core.identity_hash);
    }
}

impl<T: AttrType> fmt::Debug for Attribute<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("id", &self.core.id)
            .field("name", &self.core.name)
            .field("kind", &T::KIND)
            .field("default", &self.core.default)
            .finish()
    }
}

impl<T: AttrType> fmt::Display for Attribute<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.core.name)
    }
}

/// Fluent construction of an [`Attribute`].
///
/// A validator replaces the type's default validity rule entirely, so a
/// `DoubleAttribute` with `.validator(|_| true)` accepts NaN.
pub struct AttributeBuilder<T: AttrType> {
    name: Option<String>,
    default: T,
    validator: Option<Validator<T>>,
    parser: Option<Parser<T>>,
}

impl<T: AttrType> AttributeBuilder<T> {
    pub fn new(default: T) -> Self {
        Self {
            name: None,
            default,
            validator: None,
            parser: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn validator(mut self, validator: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    pub fn parser(mut self, parser: impl Fn(&str) -> Option<T> + Send + Sync + 'static) -> Self {
        self.parser = Some(Arc::new(parser));
        self
    }

    /// Fails if the name is empty or the default is not valid.
    pub fn build(self) -> Result<Attribute<T>> {
        let id = AttributeId(NEXT_ID.fetch_add(1, AtomicOrdering::Relaxed));
        let name = match self.name {
            Some(name) if name.trim().is_empty() => return Err(AttrError::MissingArgument("name")),
            Some(name) => name,
            None => format!("{}{}", T::KIND, id),
        };

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        TypeId::of::<T>().hash(&mut hasher);

        let core = Core {
            id,
            name,
            identity_hash: hasher.finish(),
            default: self.default,
            validator: self.validator,
            parser: self.parser,
        };
        if !core.is_valid(&core.default) {
            return Err(core.invalid(&core.default));
        }
        Ok(Attribute::from_core(Arc::new(core)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::DefaultAttributeMap;

    struct Host {
        attributes: DefaultAttributeMap,
    }

    impl WithAttributes for Host {
        fn attributes(&self) -> &dyn AttributeMap {
            &self.attributes
        }
    }

    impl WithAttributesMut for Host {
        fn attributes_mut(&mut self) -> &mut dyn AttributeMap {
            &mut self.attributes
        }
    }

    fn host() -> Host {
        Host {
            attributes: DefaultAttributeMap::new(),
        }
    }

    #[test]
    fn attributes_compare_by_identity() {
        let a = IntAttribute::named("count", 0).unwrap();
        let b = IntAttribute::named("count", 0).unwrap();
        assert_ne!(a, b);
        assert_ne!(a.key(), b.key());
        assert_eq!(a, a.clone());
        assert_eq!(a.key(), a.clone().key());
    }

    #[test]
    fn generated_names_are_unique() {
        let a = LongAttribute::new(0).unwrap();
        let b = LongAttribute::new(0).unwrap();
        assert_ne!(a.name(), b.name());
        assert!(a.name().starts_with("long#"));
    }

    #[test]
    fn accessors_report_declaration() {
        let attr = ShortAttribute::named("retries", 3).unwrap();
        assert_eq!(attr.name(), "retries");
        assert_eq!(attr.kind(), AttrKind::Short);
        assert_eq!(attr.default_value(), 3);
        assert_eq!(attr.key().default_value(), Value::Short(3));
        assert_eq!(attr.to_string(), "retries");
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = IntAttribute::named("  ", 0).unwrap_err();
        assert!(matches!(err, AttrError::MissingArgument("name")));
    }

    #[test]
    fn invalid_default_fails_construction() {
        let err = Attribute::builder(-1i32)
            .name("size")
            .validator(|v| *v >= 0)
            .build()
            .unwrap_err();
        assert!(matches!(err, AttrError::InvalidValue { .. }));

        assert!(DoubleAttribute::named("ratio", f64::NAN).is_err());
    }

    #[test]
    fn floating_attributes_reject_non_finite_values() {
        let attr = DoubleAttribute::named("ratio", 0.0).unwrap();
        assert!(!attr.is_valid(&f64::NAN));
        assert!(!attr.is_valid(&f64::INFINITY));
        assert!(!attr.is_valid(&f64::NEG_INFINITY));
        assert!(attr.is_valid(&1.5));
        assert!(matches!(
            attr.check_valid(&f64::NAN),
            Err(AttrError::InvalidValue { .. })
        ));

        let float = FloatAttribute::named("scale", 1.0).unwrap();
        assert!(float.check_valid(&f32::INFINITY).is_err());
        assert!(float.check_valid(&f32::NEG_INFINITY).is_err());
        assert!(float.check_valid(&f32::NAN).is_err());
    }

    #[test]
    fn validator_overrides_default_rule() {
        let attr = Attribute::builder(0.0f64)
            .name("anything")
            .validator(|_| true)
            .build()
            .unwrap();
        assert!(attr.is_valid(&f64::NAN));

        let floor = Attribute::builder(1i64)
            .validator(|v| *v > 0)
            .build()
            .unwrap();
        assert!(floor.check_valid(&0).is_err());
        assert!(floor.check_valid(&10).is_ok());
    }

    #[test]
    fn from_string_parses_or_fails() {
        let attr = IntAttribute::named("count", 0).unwrap();
        assert_eq!(attr.from_string("17").unwrap(), 17);
        let err = attr.from_string("seventeen").unwrap_err();
        match err {
            AttrError::Parse {
                attribute, kind, ..
            } => {
                assert_eq!(attribute, "count");
                assert_eq!(kind, AttrKind::Int);
            }
            other => panic!("Expected Parse, got {:?}", other),
        }
    }

    #[test]
    fn custom_parser_is_used() {
        let attr = Attribute::builder(false)
            .name("enabled")
            .parser(|text| match text {
                "on" => Some(true),
                "off" => Some(false),
                _ => None,
            })
            .build()
            .unwrap();
        assert!(attr.from_string("on").unwrap());
        assert!(attr.from_string("true").is_err());
    }

    #[test]
    fn singleton_validates_first() {
        let attr = Attribute::builder(5i32)
            .validator(|v| *v < 10)
            .build()
            .unwrap();
        assert!(attr.singleton(20).is_err());
        let map = attr.singleton(7).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(attr.get(&map), 7);
    }

    #[test]
    fn is_set_distinguishes_explicit_default() {
        let attr = IntAttribute::named("level", 0).unwrap();
        let mut h = host();
        assert!(!attr.is_set(&h));
        assert_eq!(attr.get_from(&h), 0);

        attr.set_on(&mut h, 0).unwrap();
        assert!(attr.is_set(&h));
        assert_eq!(attr.get_from(&h), 0);
    }

    #[test]
    fn host_accessors() {
        let attr = CharAttribute::named("grade", 'C').unwrap();
        let mut h = host();
        assert_eq!(attr.get_from_or(&h, 'Z'), 'Z');
        assert_eq!(attr.set_on(&mut h, 'A').unwrap(), 'C');
        assert_eq!(attr.get_from(&h), 'A');
        assert_eq!(attr.get_from_or(&h, 'Z'), 'A');
    }

    #[test]
    fn compare_orders_hosts() {
        let attr = IntAttribute::named("priority", 5).unwrap();
        let mut low = host();
        let mut high = host();
        let unset = host();
        attr.set_on(&mut low, 1).unwrap();
        attr.set_on(&mut high, 9).unwrap();

        assert_eq!(attr.compare(&low, &high), Ordering::Less);
        assert_eq!(attr.compare(&high, &low), Ordering::Greater);
        assert_eq!(attr.compare(&unset, &unset), Ordering::Equal);

        let mut hosts = vec![high, unset, low];
        hosts.sort_by(|a, b| attr.compare(a, b));
        let order: Vec<i32> = hosts.iter().map(|h| attr.get_from(h)).collect();
        assert_eq!(order, vec![1, 5, 9]);
    }

    #[test]
    fn key_downcast_preserves_identity() {
        let attr = ByteAttribute::named("flags", 0).unwrap();
        let key = attr.key().clone();
        let back: ByteAttribute = key.downcast().unwrap();
        assert_eq!(back, attr);
        assert!(key.downcast::<i32>().is_none());
    }

    #[test]
    fn erased_check_value() {
        let attr = Attribute::builder(1i32)
            .name("positive")
            .validator(|v| *v > 0)
            .build()
            .unwrap();
        let key = attr.key();
        assert!(key.check_value(&Value::Int(3)).is_ok());
        assert!(matches!(
            key.check_value(&Value::Int(-3)),
            Err(AttrError::InvalidValue { .. })
        ));
        assert!(matches!(
            key.check_value(&Value::Long(3)),
            Err(AttrError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn object_attribute_encoding() {
        let attr = ObjectAttribute::named("label", "none".to_string()).unwrap();
        assert_eq!(attr.kind(), AttrKind::Object);
        let value = attr.key().parse_value("hello").unwrap();
        assert_eq!(
            attr.key().encode(&value).unwrap(),
            JsonValue::String("hello".into())
        );
        let decoded = attr.key().decode(JsonValue::String("back".into())).unwrap();
        assert_eq!(String::from_value(&decoded).as_deref(), Some("back"));
    }
}
