//! Closed enumerations of the metadata model
//!
//! - [`InfoKind`]: the discriminant of every info node
//! - [`InfoFamily`]: kind families tested by `is_<family>` predicates
//! - [`TypeTag`]: low-level tag of a type expression
//! - [`ArrayType`]: representation of an array type expression

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// InfoKind
// ============================================================================

/// Discriminant of an info node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoKind {
    Function,
    Callback,
    Struct,
    Boxed,
    Enum,
    Flags,
    Object,
    Interface,
    Constant,
    ErrorDomain,
    Union,
    Value,
    Signal,
    VFunc,
    Property,
    Field,
    Arg,
    Type,
    Unresolved,
}

impl InfoKind {
    /// Every kind, in declaration order
    pub const ALL: [InfoKind; 19] = [
        InfoKind::Function,
        InfoKind::Callback,
        InfoKind::Struct,
        InfoKind::Boxed,
        InfoKind::Enum,
        InfoKind::Flags,
        InfoKind::Object,
        InfoKind::Interface,
        InfoKind::Constant,
        InfoKind::ErrorDomain,
        InfoKind::Union,
        InfoKind::Value,
        InfoKind::Signal,
        InfoKind::VFunc,
        InfoKind::Property,
        InfoKind::Field,
        InfoKind::Arg,
        InfoKind::Type,
        InfoKind::Unresolved,
    ];

    /// Canonical name, as reported by the `type` attribute
    pub const fn name(self) -> &'static str {
        match self {
            InfoKind::Function => "function",
            InfoKind::Callback => "callback",
            InfoKind::Struct => "struct",
            InfoKind::Boxed => "boxed",
            InfoKind::Enum => "enum",
            InfoKind::Flags => "flags",
            InfoKind::Object => "object",
            InfoKind::Interface => "interface",
            InfoKind::Constant => "constant",
            InfoKind::ErrorDomain => "error_domain",
            InfoKind::Union => "union",
            InfoKind::Value => "value",
            InfoKind::Signal => "signal",
            InfoKind::VFunc => "vfunc",
            InfoKind::Property => "property",
            InfoKind::Field => "field",
            InfoKind::Arg => "arg",
            InfoKind::Type => "type",
            InfoKind::Unresolved => "unresolved",
        }
    }
}

impl fmt::Display for InfoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// InfoFamily
// ============================================================================

/// Family of kinds; some families span several kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoFamily {
    Arg,
    Callable,
    Function,
    Signal,
    VFunc,
    Constant,
    ErrorDomain,
    Field,
    Property,
    RegisteredType,
    Enum,
    Interface,
    Object,
    Struct,
    Union,
    Type,
    Value,
}

impl InfoFamily {
    /// Every family
    pub const ALL: [InfoFamily; 17] = [
        InfoFamily::Arg,
        InfoFamily::Callable,
        InfoFamily::Function,
        InfoFamily::Signal,
        InfoFamily::VFunc,
        InfoFamily::Constant,
        InfoFamily::ErrorDomain,
        InfoFamily::Field,
        InfoFamily::Property,
        InfoFamily::RegisteredType,
        InfoFamily::Enum,
        InfoFamily::Interface,
        InfoFamily::Object,
        InfoFamily::Struct,
        InfoFamily::Union,
        InfoFamily::Type,
        InfoFamily::Value,
    ];

    /// Family name, as used in `is_<name>`
    pub const fn name(self) -> &'static str {
        match self {
            InfoFamily::Arg => "arg",
            InfoFamily::Callable => "callable",
            InfoFamily::Function => "function",
            InfoFamily::Signal => "signal",
            InfoFamily::VFunc => "vfunc",
            InfoFamily::Constant => "constant",
            InfoFamily::ErrorDomain => "error_domain",
            InfoFamily::Field => "field",
            InfoFamily::Property => "property",
            InfoFamily::RegisteredType => "registered_type",
            InfoFamily::Enum => "enum",
            InfoFamily::Interface => "interface",
            InfoFamily::Object => "object",
            InfoFamily::Struct => "struct",
            InfoFamily::Union => "union",
            InfoFamily::Type => "type",
            InfoFamily::Value => "value",
        }
    }

    /// Check if `kind` belongs to this family
    pub fn contains(self, kind: InfoKind) -> bool {
        use InfoKind as K;
        match self {
            InfoFamily::Arg => kind == K::Arg,
            InfoFamily::Callable => {
                matches!(kind, K::Function | K::Callback | K::Signal | K::VFunc)
            }
            InfoFamily::Function => kind == K::Function,
            InfoFamily::Signal => kind == K::Signal,
            InfoFamily::VFunc => kind == K::VFunc,
            InfoFamily::Constant => kind == K::Constant,
            InfoFamily::ErrorDomain => kind == K::ErrorDomain,
            InfoFamily::Field => kind == K::Field,
            InfoFamily::Property => kind == K::Property,
            InfoFamily::RegisteredType => matches!(
                kind,
                K::Struct | K::Boxed | K::Enum | K::Flags | K::Object | K::Interface | K::Union
            ),
            InfoFamily::Enum => matches!(kind, K::Enum | K::Flags),
            InfoFamily::Interface => kind == K::Interface,
            InfoFamily::Object => kind == K::Object,
            InfoFamily::Struct => kind == K::Struct,
            InfoFamily::Union => kind == K::Union,
            InfoFamily::Type => kind == K::Type,
            InfoFamily::Value => kind == K::Value,
        }
    }
}

// ============================================================================
// TypeTag
// ============================================================================

/// Low-level tag of a type expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    #[serde(rename = "void")]
    Void,
    #[serde(rename = "gboolean", alias = "boolean")]
    Boolean,
    #[serde(rename = "gint8", alias = "int8")]
    Int8,
    #[serde(rename = "guint8", alias = "uint8")]
    UInt8,
    #[serde(rename = "gint16", alias = "int16")]
    Int16,
    #[serde(rename = "guint16", alias = "uint16")]
    UInt16,
    #[serde(rename = "gint32", alias = "int32")]
    Int32,
    #[serde(rename = "guint32", alias = "uint32")]
    UInt32,
    #[serde(rename = "gint64", alias = "int64")]
    Int64,
    #[serde(rename = "guint64", alias = "uint64")]
    UInt64,
    #[serde(rename = "gfloat", alias = "float")]
    Float,
    #[serde(rename = "gdouble", alias = "double")]
    Double,
    #[serde(rename = "GType", alias = "gtype")]
    GType,
    #[serde(rename = "utf8")]
    Utf8,
    #[serde(rename = "filename")]
    Filename,
    #[serde(rename = "array")]
    Array,
    #[serde(rename = "interface")]
    Interface,
    #[serde(rename = "glist")]
    GList,
    #[serde(rename = "gslist")]
    GSList,
    #[serde(rename = "ghash")]
    GHash,
    #[serde(rename = "error")]
    Error,
    #[serde(rename = "gunichar", alias = "unichar")]
    Unichar,
}

impl TypeTag {
    /// Canonical tag string, as reported by the `tag` attribute
    pub const fn as_str(self) -> &'static str {
        match self {
            TypeTag::Void => "void",
            TypeTag::Boolean => "gboolean",
            TypeTag::Int8 => "gint8",
            TypeTag::UInt8 => "guint8",
            TypeTag::Int16 => "gint16",
            TypeTag::UInt16 => "guint16",
            TypeTag::Int32 => "gint32",
            TypeTag::UInt32 => "guint32",
            TypeTag::Int64 => "gint64",
            TypeTag::UInt64 => "guint64",
            TypeTag::Float => "gfloat",
            TypeTag::Double => "gdouble",
            TypeTag::GType => "GType",
            TypeTag::Utf8 => "utf8",
            TypeTag::Filename => "filename",
            TypeTag::Array => "array",
            TypeTag::Interface => "interface",
            TypeTag::GList => "glist",
            TypeTag::GSList => "gslist",
            TypeTag::GHash => "ghash",
            TypeTag::Error => "error",
            TypeTag::Unichar => "gunichar",
        }
    }

    /// Number of contained type parameters for container tags
    pub const fn param_count(self) -> usize {
        match self {
            TypeTag::Array | TypeTag::GList | TypeTag::GSList => 1,
            TypeTag::GHash => 2,
            _ => 0,
        }
    }

    /// Check if this tag is a container with type parameters
    pub const fn is_container(self) -> bool {
        self.param_count() > 0
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ArrayType
// ============================================================================

/// Representation of an array type expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrayType {
    #[default]
    C,
    Array,
    PtrArray,
    ByteArray,
}

impl ArrayType {
    /// Canonical name, as reported by the `array_type` attribute
    pub const fn as_str(self) -> &'static str {
        match self {
            ArrayType::C => "c",
            ArrayType::Array => "array",
            ArrayType::PtrArray => "ptr_array",
            ArrayType::ByteArray => "byte_array",
        }
    }
}
