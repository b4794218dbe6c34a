//! Value categories.
//!
//! Every attribute belongs to exactly one category. The eight primitive
//! categories are stored unboxed; everything else is an `Object`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The category of value an attribute holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttrKind {
    Bool,
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    /// Any other `'static` value type.
    Object,
}

impl AttrKind {
    pub const ALL: [AttrKind; 9] = [
        AttrKind::Bool,
        AttrKind::Byte,
        AttrKind::Char,
        AttrKind::Double,
        AttrKind::Float,
        AttrKind::Int,
        AttrKind::Long,
        AttrKind::Short,
        AttrKind::Object,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttrKind::Bool => "bool",
            AttrKind::Byte => "byte",
            AttrKind::Char => "char",
            AttrKind::Double => "double",
            AttrKind::Float => "float",
            AttrKind::Int => "int",
            AttrKind::Long => "long",
            AttrKind::Short => "short",
            AttrKind::Object => "object",
        }
    }

    pub fn is_primitive(&self) -> bool {
        !matches!(self, AttrKind::Object)
    }

    /// Floating point categories reject NaN and infinities by default.
    pub fn is_floating(&self) -> bool {
        matches!(self, AttrKind::Double | AttrKind::Float)
    }
}

impl fmt::Display for AttrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttrKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        AttrKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == lowered)
            .ok_or_else(|| format!("Unknown attribute kind: {}", s))
    }
}
