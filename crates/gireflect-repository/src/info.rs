//! Info nodes - the metadata graph
//!
//! An [`InfoNode`] describes one entry of a namespace: a function, a struct,
//! one of its fields, the type expression of that field, and so on. Nodes are
//! shared through [`InfoRef`] (`Arc<InfoNode>`); holding an `InfoRef` is
//! holding one reference on the node, and dropping it releases that reference.
//!
//! ## Ownership
//!
//! - A node owns its children (methods, fields, args, type expressions).
//! - A child points back at its container weakly.
//! - Registered types refer to each other by [`TypeRef`] and are resolved
//!   through the [`Repository`] when read, so a reference into a namespace
//!   that is not loaded yields an `unresolved` node instead of dangling.

use std::fmt;
use std::sync::{Arc, Weak};

use crate::gtype::GType;
use crate::kind::{ArrayType, InfoKind, TypeTag};
use crate::repository::Repository;

/// Owned reference to an info node
pub type InfoRef = Arc<InfoNode>;

// ============================================================================
// TypeRef
// ============================================================================

/// Reference to a registered type by namespace and name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    /// Namespace of the target
    pub namespace: String,
    /// Name of the target within its namespace
    pub name: String,
}

impl TypeRef {
    /// Create a reference
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Parse `"Namespace.Name"`, or `"Name"` relative to `current_namespace`
    pub fn parse(text: &str, current_namespace: &str) -> Self {
        match text.split_once('.') {
            Some((namespace, name)) => Self::new(namespace, name),
            None => Self::new(current_namespace, text),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

// ============================================================================
// Kind payloads
// ============================================================================

/// Shared data of functions, callbacks, signals and vfuncs
#[derive(Debug)]
pub struct CallableInfo {
    /// Argument infos, in declaration order
    pub args: Vec<InfoRef>,
    /// Return type expression
    pub return_type: InfoRef,
}

/// Struct-specific data
#[derive(Debug)]
pub struct StructInfo {
    pub gtype: GType,
    /// Whether this struct is the class/interface struct of another type
    pub is_gtype_struct: bool,
    pub fields: Vec<InfoRef>,
    pub methods: Vec<InfoRef>,
}

/// Union-specific data
#[derive(Debug)]
pub struct UnionInfo {
    pub gtype: GType,
    pub fields: Vec<InfoRef>,
    pub methods: Vec<InfoRef>,
}

/// Enum- and flags-specific data
#[derive(Debug)]
pub struct EnumInfo {
    pub gtype: GType,
    pub values: Vec<InfoRef>,
    pub methods: Vec<InfoRef>,
}

/// Object-specific data
#[derive(Debug)]
pub struct ObjectInfo {
    pub gtype: GType,
    /// Base type; root objects have none
    pub parent: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    pub fields: Vec<InfoRef>,
    pub methods: Vec<InfoRef>,
    pub constants: Vec<InfoRef>,
    pub properties: Vec<InfoRef>,
    pub signals: Vec<InfoRef>,
    pub vfuncs: Vec<InfoRef>,
}

/// Interface-specific data
#[derive(Debug)]
pub struct InterfaceInfo {
    pub gtype: GType,
    pub prerequisites: Vec<TypeRef>,
    pub methods: Vec<InfoRef>,
    pub constants: Vec<InfoRef>,
    pub properties: Vec<InfoRef>,
    pub signals: Vec<InfoRef>,
    pub vfuncs: Vec<InfoRef>,
}

/// Enum/flags member
#[derive(Debug)]
pub struct ValueInfo {
    pub value: i64,
}

/// Args, constants, properties and fields: a name bound to a type expression
#[derive(Debug)]
pub struct TypedInfo {
    pub type_info: InfoRef,
}

/// Type-expression-specific data
#[derive(Debug)]
pub struct TypeInfo {
    pub tag: TypeTag,
    /// Contained types: one for array/glist/gslist, key then value for ghash
    pub params: Vec<InfoRef>,
    /// Referenced registered type, for the `interface` tag
    pub interface: Option<TypeRef>,
    /// Representation, for the `array` tag
    pub array_type: Option<ArrayType>,
}

/// Kind-specific data of a node
#[derive(Debug)]
pub enum InfoData {
    Function(CallableInfo),
    Callback(CallableInfo),
    Struct(StructInfo),
    Boxed(GType),
    Enum(EnumInfo),
    Flags(EnumInfo),
    Object(ObjectInfo),
    Interface(InterfaceInfo),
    Constant(TypedInfo),
    ErrorDomain,
    Union(UnionInfo),
    Value(ValueInfo),
    Signal(CallableInfo),
    VFunc(CallableInfo),
    Property(TypedInfo),
    Field(TypedInfo),
    Arg(TypedInfo),
    Type(TypeInfo),
    Unresolved,
}

// ============================================================================
// ChildGroup
// ============================================================================

/// A homogeneous list of children under a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildGroup {
    Fields,
    Methods,
    Constants,
    Properties,
    Signals,
    VFuncs,
    Args,
    Values,
    Prerequisites,
    Interfaces,
}

impl ChildGroup {
    /// Group name for diagnostics
    pub const fn as_str(self) -> &'static str {
        match self {
            ChildGroup::Fields => "fields",
            ChildGroup::Methods => "methods",
            ChildGroup::Constants => "constants",
            ChildGroup::Properties => "properties",
            ChildGroup::Signals => "signals",
            ChildGroup::VFuncs => "vfuncs",
            ChildGroup::Args => "args",
            ChildGroup::Values => "values",
            ChildGroup::Prerequisites => "prerequisites",
            ChildGroup::Interfaces => "interfaces",
        }
    }
}

enum Children<'a> {
    Owned(&'a [InfoRef]),
    Referenced(&'a [TypeRef]),
}

// ============================================================================
// InfoNode
// ============================================================================

/// One node of the metadata graph
#[derive(Debug)]
pub struct InfoNode {
    name: Option<String>,
    namespace: String,
    deprecated: bool,
    container: Weak<InfoNode>,
    data: InfoData,
}

impl InfoNode {
    /// Create a node. `container` may be `Weak::new()` for top-level infos.
    pub fn new(
        name: Option<String>,
        namespace: impl Into<String>,
        deprecated: bool,
        container: Weak<InfoNode>,
        data: InfoData,
    ) -> Self {
        Self {
            name,
            namespace: namespace.into(),
            deprecated,
            container,
            data,
        }
    }

    /// Placeholder for a reference that does not resolve
    pub fn unresolved(target: &TypeRef) -> InfoRef {
        Arc::new(Self::new(
            Some(target.name.clone()),
            target.namespace.clone(),
            false,
            Weak::new(),
            InfoData::Unresolved,
        ))
    }

    /// Discriminant of this node
    pub fn kind(&self) -> InfoKind {
        match &self.data {
            InfoData::Function(_) => InfoKind::Function,
            InfoData::Callback(_) => InfoKind::Callback,
            InfoData::Struct(_) => InfoKind::Struct,
            InfoData::Boxed(_) => InfoKind::Boxed,
            InfoData::Enum(_) => InfoKind::Enum,
            InfoData::Flags(_) => InfoKind::Flags,
            InfoData::Object(_) => InfoKind::Object,
            InfoData::Interface(_) => InfoKind::Interface,
            InfoData::Constant(_) => InfoKind::Constant,
            InfoData::ErrorDomain => InfoKind::ErrorDomain,
            InfoData::Union(_) => InfoKind::Union,
            InfoData::Value(_) => InfoKind::Value,
            InfoData::Signal(_) => InfoKind::Signal,
            InfoData::VFunc(_) => InfoKind::VFunc,
            InfoData::Property(_) => InfoKind::Property,
            InfoData::Field(_) => InfoKind::Field,
            InfoData::Arg(_) => InfoKind::Arg,
            InfoData::Type(_) => InfoKind::Type,
            InfoData::Unresolved => InfoKind::Unresolved,
        }
    }

    /// Name; type expressions have none
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Namespace the node belongs to
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Whether the node is marked deprecated
    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    /// Acquire the containing node, if any and still alive
    pub fn container(&self) -> Option<InfoRef> {
        self.container.upgrade()
    }

    // ========================================================================
    // Typed views
    // ========================================================================

    /// Callable data of functions, callbacks, signals and vfuncs
    pub fn as_callable(&self) -> Option<&CallableInfo> {
        match &self.data {
            InfoData::Function(c)
            | InfoData::Callback(c)
            | InfoData::Signal(c)
            | InfoData::VFunc(c) => Some(c),
            _ => None,
        }
    }

    /// Struct data
    pub fn as_struct(&self) -> Option<&StructInfo> {
        match &self.data {
            InfoData::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Object data
    pub fn as_object(&self) -> Option<&ObjectInfo> {
        match &self.data {
            InfoData::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Type-expression data
    pub fn as_type(&self) -> Option<&TypeInfo> {
        match &self.data {
            InfoData::Type(t) => Some(t),
            _ => None,
        }
    }

    /// Enum-member data
    pub fn as_value(&self) -> Option<&ValueInfo> {
        match &self.data {
            InfoData::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Runtime type identifier of a registered type
    pub fn gtype(&self) -> Option<GType> {
        match &self.data {
            InfoData::Struct(s) => Some(s.gtype),
            InfoData::Boxed(gtype) => Some(*gtype),
            InfoData::Enum(e) | InfoData::Flags(e) => Some(e.gtype),
            InfoData::Object(o) => Some(o.gtype),
            InfoData::Interface(i) => Some(i.gtype),
            InfoData::Union(u) => Some(u.gtype),
            _ => None,
        }
    }

    /// Type expression attached to args, constants, properties and fields
    pub fn type_info(&self) -> Option<InfoRef> {
        match &self.data {
            InfoData::Arg(t) | InfoData::Constant(t) | InfoData::Property(t) | InfoData::Field(t) => {
                Some(t.type_info.clone())
            }
            _ => None,
        }
    }

    // ========================================================================
    // Cross references
    // ========================================================================

    /// Resolve the base type of an object; `None` for root objects
    pub fn parent(&self, repository: &dyn Repository) -> Option<InfoRef> {
        let parent = self.as_object()?.parent.as_ref()?;
        Some(repository.resolve(parent))
    }

    /// Resolve the registered type an `interface` type expression refers to
    pub fn interface(&self, repository: &dyn Repository) -> Option<InfoRef> {
        let target = self.as_type()?.interface.as_ref()?;
        Some(repository.resolve(target))
    }

    /// Acquire the `index`-th contained type of a container type expression
    pub fn param_type(&self, index: usize) -> Option<InfoRef> {
        self.as_type()?.params.get(index).cloned()
    }

    // ========================================================================
    // Child groups
    // ========================================================================

    fn children(&self, group: ChildGroup) -> Option<Children<'_>> {
        use ChildGroup as G;
        use InfoData as D;
        let owned = match (group, &self.data) {
            (G::Fields, D::Struct(s)) => &s.fields,
            (G::Fields, D::Union(u)) => &u.fields,
            (G::Fields, D::Object(o)) => &o.fields,
            (G::Methods, D::Struct(s)) => &s.methods,
            (G::Methods, D::Union(u)) => &u.methods,
            (G::Methods, D::Enum(e) | D::Flags(e)) => &e.methods,
            (G::Methods, D::Object(o)) => &o.methods,
            (G::Methods, D::Interface(i)) => &i.methods,
            (G::Constants, D::Object(o)) => &o.constants,
            (G::Constants, D::Interface(i)) => &i.constants,
            (G::Properties, D::Object(o)) => &o.properties,
            (G::Properties, D::Interface(i)) => &i.properties,
            (G::Signals, D::Object(o)) => &o.signals,
            (G::Signals, D::Interface(i)) => &i.signals,
            (G::VFuncs, D::Object(o)) => &o.vfuncs,
            (G::VFuncs, D::Interface(i)) => &i.vfuncs,
            (G::Values, D::Enum(e) | D::Flags(e)) => &e.values,
            (G::Args, _) => &self.as_callable()?.args,
            (G::Prerequisites, D::Interface(i)) => {
                return Some(Children::Referenced(&i.prerequisites))
            }
            (G::Interfaces, D::Object(o)) => return Some(Children::Referenced(&o.interfaces)),
            _ => return None,
        };
        Some(Children::Owned(owned))
    }

    /// Number of children in `group`; 0 when the kind has no such group
    pub fn child_count(&self, group: ChildGroup) -> usize {
        match self.children(group) {
            Some(Children::Owned(items)) => items.len(),
            Some(Children::Referenced(items)) => items.len(),
            None => 0,
        }
    }

    /// Acquire the `index`-th child (0-based) of `group`
    pub fn child(
        &self,
        repository: &dyn Repository,
        group: ChildGroup,
        index: usize,
    ) -> Option<InfoRef> {
        match self.children(group)? {
            Children::Owned(items) => items.get(index).cloned(),
            Children::Referenced(items) => items.get(index).map(|target| repository.resolve(target)),
        }
    }
}
