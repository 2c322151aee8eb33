//! Typelib files and loaded typelibs
//!
//! A typelib holds one namespace's metadata. On disk it is a JSON document
//! named `<Namespace>-<Version>.typelib.json`:
//!
//! ```json
//! {
//!   "namespace": "Demo",
//!   "version": "1.0",
//!   "dependencies": ["GObject-2.0"],
//!   "infos": [
//!     { "kind": "object", "name": "Widget", "type_name": "DemoWidget",
//!       "parent": "GObject.Object",
//!       "properties": [{ "name": "label", "type": "utf8" }] }
//!   ]
//! }
//! ```
//!
//! Type expressions are either a bare tag (`"utf8"`) or an object
//! (`{"tag": "array", "params": ["gint32"], "array_type": "c"}`).
//! Loading validates the document, then builds the [`InfoNode`] graph and
//! binds runtime type identifiers for registered types. Keys the reflection
//! surface never reads (symbols, sizes, ownership annotations) are accepted
//! and ignored.

use std::path::Path;
use std::sync::{Arc, Weak};

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::RepositoryError;
use crate::gtype::{GType, GTypeRegistry};
use crate::info::*;
use crate::kind::{ArrayType, TypeTag};

/// File name suffix of typelib documents
pub const TYPELIB_SUFFIX: &str = ".typelib.json";

// ============================================================================
// File schema
// ============================================================================

/// Typelib document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypelibFile {
    /// Namespace name
    pub namespace: String,

    /// Namespace version
    pub version: String,

    /// Required namespaces, as `"Namespace-Version"`
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Top-level infos, in namespace order
    #[serde(default)]
    pub infos: Vec<InfoDef>,
}

/// Top-level info definition, tagged by `"kind"`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InfoDef {
    Function(CallableDef),
    Callback(CallableDef),
    Struct(StructDef),
    Boxed(BoxedDef),
    Enum(EnumDef),
    Flags(EnumDef),
    Object(ObjectDef),
    Interface(InterfaceDef),
    Constant(ConstantDef),
    ErrorDomain(ErrorDomainDef),
    Union(UnionDef),
}

impl InfoDef {
    /// Name of the defined info
    pub fn name(&self) -> &str {
        match self {
            InfoDef::Function(d) | InfoDef::Callback(d) => &d.name,
            InfoDef::Struct(d) => &d.name,
            InfoDef::Boxed(d) => &d.name,
            InfoDef::Enum(d) | InfoDef::Flags(d) => &d.name,
            InfoDef::Object(d) => &d.name,
            InfoDef::Interface(d) => &d.name,
            InfoDef::Constant(d) => &d.name,
            InfoDef::ErrorDomain(d) => &d.name,
            InfoDef::Union(d) => &d.name,
        }
    }
}

/// Function, callback, signal or vfunc
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallableDef {
    pub name: String,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub args: Vec<ArgDef>,
    #[serde(default = "void_type")]
    pub return_type: TypeDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArgDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StructDef {
    pub name: String,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub is_gtype_struct: bool,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub methods: Vec<CallableDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoxedDef {
    pub name: String,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub type_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnionDef {
    pub name: String,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub methods: Vec<CallableDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnumDef {
    pub name: String,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub values: Vec<ValueDef>,
    #[serde(default)]
    pub methods: Vec<CallableDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValueDef {
    pub name: String,
    pub value: i64,
    #[serde(default)]
    pub deprecated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObjectDef {
    pub name: String,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub type_name: Option<String>,
    /// Base type reference
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub methods: Vec<CallableDef>,
    #[serde(default)]
    pub constants: Vec<ConstantDef>,
    #[serde(default)]
    pub properties: Vec<PropertyDef>,
    #[serde(default)]
    pub signals: Vec<CallableDef>,
    #[serde(default)]
    pub vfuncs: Vec<CallableDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InterfaceDef {
    pub name: String,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub methods: Vec<CallableDef>,
    #[serde(default)]
    pub constants: Vec<ConstantDef>,
    #[serde(default)]
    pub properties: Vec<PropertyDef>,
    #[serde(default)]
    pub signals: Vec<CallableDef>,
    #[serde(default)]
    pub vfuncs: Vec<CallableDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConstantDef {
    pub name: String,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(rename = "type")]
    pub ty: TypeDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorDomainDef {
    pub name: String,
    #[serde(default)]
    pub deprecated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyDef {
    pub name: String,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(rename = "type")]
    pub ty: TypeDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldDef {
    pub name: String,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(rename = "type")]
    pub ty: TypeDef,
}

/// Type expression: a bare tag or a full description
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TypeDef {
    Tag(TypeTag),
    Expr(Box<TypeExprDef>),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeExprDef {
    pub tag: TypeTag,
    #[serde(default)]
    pub params: Vec<TypeDef>,
    /// Registered type reference, for the `interface` tag
    #[serde(default)]
    pub interface: Option<String>,
    #[serde(default)]
    pub array_type: Option<ArrayType>,
}

impl TypeDef {
    /// Tag of the expression
    pub fn tag(&self) -> TypeTag {
        match self {
            TypeDef::Tag(tag) => *tag,
            TypeDef::Expr(expr) => expr.tag,
        }
    }
}

fn void_type() -> TypeDef {
    TypeDef::Tag(TypeTag::Void)
}

impl TypelibFile {
    /// Parse a typelib document
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Read and parse a typelib file
    pub fn from_file(path: &Path) -> Result<Self, RepositoryError> {
        let text = std::fs::read_to_string(path).map_err(|source| RepositoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
            .map_err(|e| RepositoryError::invalid(path.display().to_string(), e.to_string()))
    }

    /// Canonical file name, `<Namespace>-<Version>.typelib.json`
    pub fn file_name(&self) -> String {
        format!("{}-{}{}", self.namespace, self.version, TYPELIB_SUFFIX)
    }

    /// Check internal consistency: unique names, well-formed type expressions
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = FxHashSet::default();
        for def in &self.infos {
            if !seen.insert(def.name()) {
                return Err(format!("duplicate info '{}'", def.name()));
            }
            validate_info(def).map_err(|e| format!("{}: {}", def.name(), e))?;
        }
        for dependency in &self.dependencies {
            split_dependency(dependency)
                .ok_or_else(|| format!("malformed dependency '{}'", dependency))?;
        }
        Ok(())
    }
}

/// Split `"Namespace-Version"` into its parts
pub fn split_dependency(dependency: &str) -> Option<(&str, &str)> {
    dependency
        .rsplit_once('-')
        .filter(|(namespace, version)| !namespace.is_empty() && !version.is_empty())
}

fn validate_info(def: &InfoDef) -> Result<(), String> {
    match def {
        InfoDef::Function(c) | InfoDef::Callback(c) => validate_callable(c),
        InfoDef::Struct(s) => {
            s.fields.iter().try_for_each(|f| validate_type(&f.ty))?;
            s.methods.iter().try_for_each(validate_callable)
        }
        InfoDef::Union(u) => {
            u.fields.iter().try_for_each(|f| validate_type(&f.ty))?;
            u.methods.iter().try_for_each(validate_callable)
        }
        InfoDef::Enum(e) | InfoDef::Flags(e) => e.methods.iter().try_for_each(validate_callable),
        InfoDef::Object(o) => {
            o.fields.iter().try_for_each(|f| validate_type(&f.ty))?;
            o.constants.iter().try_for_each(|c| validate_type(&c.ty))?;
            o.properties.iter().try_for_each(|p| validate_type(&p.ty))?;
            o.methods
                .iter()
                .chain(&o.signals)
                .chain(&o.vfuncs)
                .try_for_each(validate_callable)
        }
        InfoDef::Interface(i) => {
            i.constants.iter().try_for_each(|c| validate_type(&c.ty))?;
            i.properties.iter().try_for_each(|p| validate_type(&p.ty))?;
            i.methods
                .iter()
                .chain(&i.signals)
                .chain(&i.vfuncs)
                .try_for_each(validate_callable)
        }
        InfoDef::Constant(c) => validate_type(&c.ty),
        InfoDef::Boxed(_) | InfoDef::ErrorDomain(_) => Ok(()),
    }
}

fn validate_callable(def: &CallableDef) -> Result<(), String> {
    def.args.iter().try_for_each(|a| validate_type(&a.ty))?;
    validate_type(&def.return_type)
}

fn validate_type(def: &TypeDef) -> Result<(), String> {
    let expr = match def {
        TypeDef::Tag(tag) if tag.is_container() => {
            return Err(format!("'{}' type requires params", tag));
        }
        TypeDef::Tag(TypeTag::Interface) => {
            return Err("'interface' type requires a target".to_string());
        }
        TypeDef::Tag(_) => return Ok(()),
        TypeDef::Expr(expr) => expr,
    };
    if expr.params.len() != expr.tag.param_count() {
        return Err(format!(
            "'{}' type takes {} params, found {}",
            expr.tag,
            expr.tag.param_count(),
            expr.params.len()
        ));
    }
    if (expr.tag == TypeTag::Interface) != expr.interface.is_some() {
        return Err(format!("'{}' type has a misplaced interface target", expr.tag));
    }
    expr.params.iter().try_for_each(validate_type)
}

// ============================================================================
// Node construction
// ============================================================================

/// Builds the node graph of one namespace
struct NodeBuilder<'a> {
    namespace: &'a str,
    gtypes: &'a mut GTypeRegistry,
}

impl NodeBuilder<'_> {
    fn node<F>(&mut self, name: Option<&str>, deprecated: bool, container: &Weak<InfoNode>, data: F) -> InfoRef
    where
        F: FnOnce(&mut Self, &Weak<InfoNode>) -> InfoData,
    {
        Arc::new_cyclic(|this| {
            let data = data(self, this);
            InfoNode::new(
                name.map(str::to_string),
                self.namespace,
                deprecated,
                container.clone(),
                data,
            )
        })
    }

    fn info(&mut self, def: &InfoDef) -> InfoRef {
        let top = Weak::new();
        match def {
            InfoDef::Function(d) => self.callable(d, &top, CallableKind::Function),
            InfoDef::Callback(d) => self.callable(d, &top, CallableKind::Callback),
            InfoDef::Struct(d) => self.node(Some(d.name.as_str()), d.deprecated, &top, |b, this| {
                InfoData::Struct(StructInfo {
                    gtype: b.gtype(&d.name, d.type_name.as_deref()),
                    is_gtype_struct: d.is_gtype_struct,
                    fields: d.fields.iter().map(|f| b.field(f, this)).collect(),
                    methods: b.methods(&d.methods, this),
                })
            }),
            InfoDef::Boxed(d) => self.node(Some(d.name.as_str()), d.deprecated, &top, |b, _| {
                InfoData::Boxed(b.gtype(&d.name, d.type_name.as_deref()))
            }),
            InfoDef::Enum(d) => self.node(Some(d.name.as_str()), d.deprecated, &top, |b, this| {
                InfoData::Enum(b.enumeration(d, this))
            }),
            InfoDef::Flags(d) => self.node(Some(d.name.as_str()), d.deprecated, &top, |b, this| {
                InfoData::Flags(b.enumeration(d, this))
            }),
            InfoDef::Object(d) => self.node(Some(d.name.as_str()), d.deprecated, &top, |b, this| {
                InfoData::Object(ObjectInfo {
                    gtype: b.gtype(&d.name, d.type_name.as_deref()),
                    parent: d.parent.as_deref().map(|p| b.reference(p)),
                    interfaces: d.interfaces.iter().map(|i| b.reference(i)).collect(),
                    fields: d.fields.iter().map(|f| b.field(f, this)).collect(),
                    methods: b.methods(&d.methods, this),
                    constants: d.constants.iter().map(|c| b.constant(c, this)).collect(),
                    properties: d.properties.iter().map(|p| b.property(p, this)).collect(),
                    signals: b.callables(&d.signals, this, CallableKind::Signal),
                    vfuncs: b.callables(&d.vfuncs, this, CallableKind::VFunc),
                })
            }),
            InfoDef::Interface(d) => self.node(Some(d.name.as_str()), d.deprecated, &top, |b, this| {
                InfoData::Interface(InterfaceInfo {
                    gtype: b.gtype(&d.name, d.type_name.as_deref()),
                    prerequisites: d.prerequisites.iter().map(|p| b.reference(p)).collect(),
                    methods: b.methods(&d.methods, this),
                    constants: d.constants.iter().map(|c| b.constant(c, this)).collect(),
                    properties: d.properties.iter().map(|p| b.property(p, this)).collect(),
                    signals: b.callables(&d.signals, this, CallableKind::Signal),
                    vfuncs: b.callables(&d.vfuncs, this, CallableKind::VFunc),
                })
            }),
            InfoDef::Constant(d) => self.constant(d, &top),
            InfoDef::ErrorDomain(d) => {
                self.node(Some(d.name.as_str()), d.deprecated, &top, |_, _| InfoData::ErrorDomain)
            }
            InfoDef::Union(d) => self.node(Some(d.name.as_str()), d.deprecated, &top, |b, this| {
                InfoData::Union(UnionInfo {
                    gtype: b.gtype(&d.name, d.type_name.as_deref()),
                    fields: d.fields.iter().map(|f| b.field(f, this)).collect(),
                    methods: b.methods(&d.methods, this),
                })
            }),
        }
    }

    fn gtype(&mut self, info_name: &str, type_name: Option<&str>) -> GType {
        match type_name {
            Some(type_name) => self.gtypes.register(type_name, self.namespace, info_name),
            None => GType::NONE,
        }
    }

    fn reference(&self, text: &str) -> TypeRef {
        TypeRef::parse(text, self.namespace)
    }

    fn enumeration(&mut self, d: &EnumDef, this: &Weak<InfoNode>) -> EnumInfo {
        EnumInfo {
            gtype: self.gtype(&d.name, d.type_name.as_deref()),
            values: d
                .values
                .iter()
                .map(|v| {
                    self.node(Some(v.name.as_str()), v.deprecated, this, |_, _| {
                        InfoData::Value(ValueInfo { value: v.value })
                    })
                })
                .collect(),
            methods: self.methods(&d.methods, this),
        }
    }

    fn methods(&mut self, defs: &[CallableDef], container: &Weak<InfoNode>) -> Vec<InfoRef> {
        self.callables(defs, container, CallableKind::Function)
    }

    fn callables(
        &mut self,
        defs: &[CallableDef],
        container: &Weak<InfoNode>,
        kind: CallableKind,
    ) -> Vec<InfoRef> {
        defs.iter().map(|d| self.callable(d, container, kind)).collect()
    }

    fn callable(&mut self, d: &CallableDef, container: &Weak<InfoNode>, kind: CallableKind) -> InfoRef {
        self.node(Some(d.name.as_str()), d.deprecated, container, |b, this| {
            let callable = CallableInfo {
                args: d.args.iter().map(|a| b.arg(a, this)).collect(),
                return_type: b.type_expr(&d.return_type, this),
            };
            match kind {
                CallableKind::Function => InfoData::Function(callable),
                CallableKind::Callback => InfoData::Callback(callable),
                CallableKind::Signal => InfoData::Signal(callable),
                CallableKind::VFunc => InfoData::VFunc(callable),
            }
        })
    }

    fn arg(&mut self, d: &ArgDef, container: &Weak<InfoNode>) -> InfoRef {
        self.node(Some(d.name.as_str()), false, container, |b, this| {
            InfoData::Arg(TypedInfo {
                type_info: b.type_expr(&d.ty, this),
            })
        })
    }

    fn field(&mut self, d: &FieldDef, container: &Weak<InfoNode>) -> InfoRef {
        self.node(Some(d.name.as_str()), d.deprecated, container, |b, this| {
            InfoData::Field(TypedInfo {
                type_info: b.type_expr(&d.ty, this),
            })
        })
    }

    fn property(&mut self, d: &PropertyDef, container: &Weak<InfoNode>) -> InfoRef {
        self.node(Some(d.name.as_str()), d.deprecated, container, |b, this| {
            InfoData::Property(TypedInfo {
                type_info: b.type_expr(&d.ty, this),
            })
        })
    }

    fn constant(&mut self, d: &ConstantDef, container: &Weak<InfoNode>) -> InfoRef {
        self.node(Some(d.name.as_str()), d.deprecated, container, |b, this| {
            InfoData::Constant(TypedInfo {
                type_info: b.type_expr(&d.ty, this),
            })
        })
    }

    fn type_expr(&mut self, d: &TypeDef, container: &Weak<InfoNode>) -> InfoRef {
        self.node(None, false, container, |b, this| {
            let data = match d {
                TypeDef::Tag(tag) => TypeInfo {
                    tag: *tag,
                    params: Vec::new(),
                    interface: None,
                    array_type: None,
                },
                TypeDef::Expr(expr) => TypeInfo {
                    tag: expr.tag,
                    params: expr.params.iter().map(|p| b.type_expr(p, this)).collect(),
                    interface: expr.interface.as_deref().map(|i| b.reference(i)),
                    array_type: (expr.tag == TypeTag::Array)
                        .then(|| expr.array_type.unwrap_or_default()),
                },
            };
            InfoData::Type(data)
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum CallableKind {
    Function,
    Callback,
    Signal,
    VFunc,
}

// ============================================================================
// Typelib
// ============================================================================

/// A loaded namespace
#[derive(Debug)]
pub struct Typelib {
    namespace: String,
    version: String,
    dependencies: Vec<String>,
    infos: Vec<InfoRef>,
    by_name: FxHashMap<String, usize>,
}

impl Typelib {
    /// Validate `file` and build its node graph, binding runtime types in `gtypes`
    pub fn load(
        file: TypelibFile,
        path: Option<&Path>,
        gtypes: &mut GTypeRegistry,
    ) -> Result<Self, RepositoryError> {
        let source_name = path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| format!("<{}>", file.file_name()));
        file.validate()
            .map_err(|message| RepositoryError::invalid(source_name, message))?;

        let mut builder = NodeBuilder {
            namespace: &file.namespace,
            gtypes,
        };
        let infos: Vec<InfoRef> = file.infos.iter().map(|def| builder.info(def)).collect();
        let by_name = file
            .infos
            .iter()
            .enumerate()
            .map(|(index, def)| (def.name().to_string(), index))
            .collect();

        Ok(Self {
            namespace: file.namespace,
            version: file.version,
            dependencies: file.dependencies,
            infos,
            by_name,
        })
    }

    /// Namespace name
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Namespace version
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Required namespaces, as `"Namespace-Version"`
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Number of top-level infos
    pub fn n_infos(&self) -> usize {
        self.infos.len()
    }

    /// Acquire the `index`-th top-level info
    pub fn info(&self, index: usize) -> Option<InfoRef> {
        self.infos.get(index).cloned()
    }

    /// Acquire a top-level info by name
    pub fn find(&self, name: &str) -> Option<InfoRef> {
        self.by_name.get(name).map(|&index| self.infos[index].clone())
    }
}
