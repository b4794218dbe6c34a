use crate::attribute::{Attribute, AttributeKey};
use crate::error::{AttrError, Result};
use crate::kind::AttrKind;
use crate::registry::AttributeRegistry;
use crate::types::AttrType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const SCHEMA_FILENAME: &str = "schema.json";

/// Declared attributes, stored in `<config dir>/schema.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttributeSchema {
    #[serde(default)]
    pub attributes: Vec<AttributeDef>,
}

/// One declared attribute. Object attributes declared here hold text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttributeDef {
    pub name: String,
    pub kind: AttrKind,

    /// Textual default, parsed the same way as `from_string`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// Accept NaN and infinities for double/float attributes
    #[serde(default, skip_serializing_if = "is_false")]
    pub allow_non_finite: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl AttributeDef {
    pub fn new(name: impl Into<String>, kind: AttrKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
            allow_non_finite: false,
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Builds a fresh attribute for this definition.
    pub fn build(&self) -> Result<AttributeKey> {
        if self.name.trim().is_empty() {
            return Err(AttrError::MissingArgument("name"));
        }
        match self.kind {
            AttrKind::Bool => self.build_typed::<bool>(),
            AttrKind::Byte => self.build_typed::<i8>(),
            AttrKind::Char => self.build_typed::<char>(),
            AttrKind::Double => self.build_typed::<f64>(),
            AttrKind::Float => self.build_typed::<f32>(),
            AttrKind::Int => self.build_typed::<i32>(),
            AttrKind::Long => self.build_typed::<i64>(),
            AttrKind::Short => self.build_typed::<i16>(),
            AttrKind::Object => self.build_typed::<String>(),
        }
    }

    fn build_typed<T: AttrType + Default>(&self) -> Result<AttributeKey> {
        let default = match &self.default {
            Some(text) => T::parse_text(text).ok_or_else(|| AttrError::Parse {
                attribute: self.name.clone(),
                kind: self.kind,
                text: text.clone(),
            })?,
            None => T::default(),
        };

        let mut builder = Attribute::builder(default).name(self.name.as_str());
        if self.allow_non_finite && self.kind.is_floating() {
            builder = builder.validator(|_| true);
        }
        Ok(builder.build()?.key().clone())
    }
}

impl AttributeSchema {
    /// Load the schema from the given directory, or an empty schema if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let schema_path = config_dir.as_ref().join(SCHEMA_FILENAME);

        if !schema_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&schema_path).map_err(AttrError::Io)?;
        let schema: AttributeSchema =
            serde_json::from_str(&content).map_err(AttrError::Serialization)?;
        tracing::debug!(
            path = %schema_path.display(),
            attributes = schema.attributes.len(),
            "loaded attribute schema"
        );
        Ok(schema)
    }

    /// Save the schema to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(AttrError::Io)?;
        }

        let schema_path = config_dir.join(SCHEMA_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(AttrError::Serialization)?;
        fs::write(schema_path, content).map_err(AttrError::Io)?;
        Ok(())
    }

    pub fn push(&mut self, def: AttributeDef) {
        self.attributes.push(def);
    }

    /// Builds every declared attribute, then registers them together.
    /// If any definition fails to build or any name clashes, nothing is
    /// registered.
    pub fn install(&self, registry: &AttributeRegistry) -> Result<Vec<AttributeKey>> {
        let keys = self
            .attributes
            .iter()
            .map(AttributeDef::build)
            .collect::<Result<Vec<_>>>()?;
        registry.register_all(&keys)?;
        Ok(keys)
    }
}
