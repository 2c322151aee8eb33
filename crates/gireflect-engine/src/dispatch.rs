//! Property dispatch for info nodes
//!
//! Resolves `node.attribute` through a table built once from an ordered rule
//! list. Each rule names an attribute, the kinds it applies to, an optional
//! guard on the node, and an accessor. For every kind the table keeps the
//! first rule claiming a name, so rule order is precedence. An attribute with
//! no entry for the node's kind (or whose guard rejects the node) is an
//! "unsupported info property" argument error, the only error the
//! dispatcher raises.
//!
//! # Rules
//!
//! | Scope | Attributes |
//! |-------|------------|
//! | every kind | `type`, `name`, `namespace`, `deprecated`, `container`, `is_<family>` |
//! | arg, constant, property, field | `typeinfo` |
//! | registered types | `gtype` |
//! | value | `value` |
//! | struct | `is_gtype_struct`, `fields`, `methods` |
//! | union | `fields`, `methods` |
//! | interface | `prerequisites`, `methods`, `constants`, `properties`, `signals`, `vfuncs` |
//! | object | `parent`, `interfaces`, `fields`, `methods`, `constants`, `properties`, `signals`, `vfuncs` |
//! | type | `tag`, `param` (container tags), `interface` (interface tag), `array_type` (array tag) |
//! | callables | `args`, `return_type` |
//! | enum, flags | `values`, `methods` |
//!
//! # Extensions
//!
//! `args` and `return_type` on callables, `values` and `methods` on enums and
//! flags, and `vfuncs` on objects and interfaces are extensions. They make
//! `arg` and `value` nodes reachable from a namespace lookup. Every other
//! (kind, attribute) pair outside the table is still unsupported.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use gireflect_repository::{ChildGroup, InfoFamily, InfoKind, InfoNode, TypeTag};
use gireflect_sdk::{HostError, HostResult, HostValue, ToHost};

use crate::collection::InfoCollection;
use crate::handle::InfoHandle;

// ============================================================================
// Rules
// ============================================================================

/// Produces a scalar or node attribute
type Getter = fn(&InfoHandle) -> HostValue;

/// Extra applicability test beyond the node kind
type Guard = fn(&InfoNode) -> bool;

/// How an attribute value is produced
#[derive(Clone, Copy)]
enum Accessor {
    /// Computed from the node
    Scalar(Getter),
    /// `is_<family>` predicate
    Family(InfoFamily),
    /// Fresh collection over a child group
    Collection(ChildGroup),
}

/// Kinds a rule applies to
#[derive(Debug, Clone, Copy)]
enum Scope {
    Any,
    Family(InfoFamily),
    Kinds(&'static [InfoKind]),
}

impl Scope {
    fn contains(self, kind: InfoKind) -> bool {
        match self {
            Scope::Any => true,
            Scope::Family(family) => family.contains(kind),
            Scope::Kinds(kinds) => kinds.contains(&kind),
        }
    }
}

struct Rule {
    name: &'static str,
    scope: Scope,
    guard: Option<Guard>,
    accessor: Accessor,
}

const fn scalar(name: &'static str, scope: Scope, get: Getter) -> Rule {
    Rule {
        name,
        scope,
        guard: None,
        accessor: Accessor::Scalar(get),
    }
}

const fn guarded(name: &'static str, scope: Scope, guard: Guard, get: Getter) -> Rule {
    Rule {
        name,
        scope,
        guard: Some(guard),
        accessor: Accessor::Scalar(get),
    }
}

const fn collection(name: &'static str, scope: Scope, group: ChildGroup) -> Rule {
    Rule {
        name,
        scope,
        guard: None,
        accessor: Accessor::Collection(group),
    }
}

const TYPED: Scope = Scope::Kinds(&[InfoKind::Arg, InfoKind::Constant, InfoKind::Property, InfoKind::Field]);
const VALUE: Scope = Scope::Kinds(&[InfoKind::Value]);
const STRUCT: Scope = Scope::Kinds(&[InfoKind::Struct]);
const UNION: Scope = Scope::Kinds(&[InfoKind::Union]);
const INTERFACE: Scope = Scope::Kinds(&[InfoKind::Interface]);
const OBJECT: Scope = Scope::Kinds(&[InfoKind::Object]);
const TYPE: Scope = Scope::Kinds(&[InfoKind::Type]);

/// Ordered rules; `is_<family>` rules are inserted after the universal ones
const UNIVERSAL: &[Rule] = &[
    scalar("type", Scope::Any, |h| h.info().kind().name().to_host()),
    scalar("name", Scope::Any, |h| h.info().name().to_host()),
    scalar("namespace", Scope::Any, |h| h.info().namespace().to_host()),
    scalar("deprecated", Scope::Any, |h| h.info().is_deprecated().to_host()),
    scalar("container", Scope::Any, |h| {
        InfoHandle::host_value(h.repository(), h.info().container())
    }),
];

const RULES: &[Rule] = &[
    scalar("typeinfo", TYPED, |h| InfoHandle::host_value(h.repository(), h.info().type_info())),
    scalar("gtype", Scope::Family(InfoFamily::RegisteredType), |h| {
        h.info().gtype().map(|g| g.0 as i64).to_host()
    }),
    scalar("value", VALUE, |h| h.info().as_value().map(|v| v.value).to_host()),
    // struct
    scalar("is_gtype_struct", STRUCT, |h| {
        h.info().as_struct().is_some_and(|s| s.is_gtype_struct).to_host()
    }),
    collection("fields", STRUCT, ChildGroup::Fields),
    collection("methods", STRUCT, ChildGroup::Methods),
    // union
    collection("fields", UNION, ChildGroup::Fields),
    collection("methods", UNION, ChildGroup::Methods),
    // interface
    collection("prerequisites", INTERFACE, ChildGroup::Prerequisites),
    collection("methods", INTERFACE, ChildGroup::Methods),
    collection("constants", INTERFACE, ChildGroup::Constants),
    collection("properties", INTERFACE, ChildGroup::Properties),
    collection("signals", INTERFACE, ChildGroup::Signals),
    collection("vfuncs", INTERFACE, ChildGroup::VFuncs),
    // object
    scalar("parent", OBJECT, |h| {
        InfoHandle::host_value(h.repository(), h.info().parent(&**h.repository()))
    }),
    collection("interfaces", OBJECT, ChildGroup::Interfaces),
    collection("fields", OBJECT, ChildGroup::Fields),
    collection("methods", OBJECT, ChildGroup::Methods),
    collection("constants", OBJECT, ChildGroup::Constants),
    collection("properties", OBJECT, ChildGroup::Properties),
    collection("signals", OBJECT, ChildGroup::Signals),
    collection("vfuncs", OBJECT, ChildGroup::VFuncs),
    // type expressions
    scalar("tag", TYPE, |h| type_tag(h.info()).map(TypeTag::as_str).to_host()),
    guarded("param", TYPE, has_params, |h| {
        let info = h.info();
        let count = type_tag(info).map_or(0, TypeTag::param_count);
        (0..count)
            .map(|i| InfoHandle::host_value(h.repository(), info.param_type(i)))
            .collect::<Vec<_>>()
            .to_host()
    }),
    guarded("interface", TYPE, |n| type_tag(n) == Some(TypeTag::Interface), |h| {
        InfoHandle::host_value(h.repository(), h.info().interface(&**h.repository()))
    }),
    guarded("array_type", TYPE, |n| type_tag(n) == Some(TypeTag::Array), |h| {
        let array_type = h.info().as_type().and_then(|t| t.array_type);
        array_type.unwrap_or_default().as_str().to_host()
    }),
    // callables
    collection("args", Scope::Family(InfoFamily::Callable), ChildGroup::Args),
    scalar("return_type", Scope::Family(InfoFamily::Callable), |h| {
        let return_type = h.info().as_callable().map(|c| c.return_type.clone());
        InfoHandle::host_value(h.repository(), return_type)
    }),
    // enums and flags
    collection("values", Scope::Family(InfoFamily::Enum), ChildGroup::Values),
    collection("methods", Scope::Family(InfoFamily::Enum), ChildGroup::Methods),
];

fn type_tag(node: &InfoNode) -> Option<TypeTag> {
    node.as_type().map(|t| t.tag)
}

fn has_params(node: &InfoNode) -> bool {
    type_tag(node).is_some_and(TypeTag::is_container)
}

fn family_rules() -> impl Iterator<Item = (String, Scope, Option<Guard>, Accessor)> {
    InfoFamily::ALL.into_iter().map(|family| {
        (
            format!("is_{}", family.name()),
            Scope::Any,
            None,
            Accessor::Family(family),
        )
    })
}

// ============================================================================
// PropertyDispatcher
// ============================================================================

#[derive(Clone, Copy)]
struct Entry {
    guard: Option<Guard>,
    accessor: Accessor,
}

#[derive(Default)]
struct KindTable {
    names: Vec<String>,
    entries: FxHashMap<String, Entry>,
}

impl KindTable {
    fn insert(&mut self, name: String, entry: Entry) {
        if !self.entries.contains_key(&name) {
            self.names.push(name.clone());
            self.entries.insert(name, entry);
        }
    }
}

/// Per-kind attribute table
pub struct PropertyDispatcher {
    tables: FxHashMap<InfoKind, KindTable>,
}

impl Default for PropertyDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyDispatcher {
    /// Build the table from the rule list
    pub fn new() -> Self {
        let static_rules = |rules: &'static [Rule]| {
            rules
                .iter()
                .map(|r| (r.name.to_string(), r.scope, r.guard, r.accessor))
        };
        let ordered: Vec<_> = static_rules(UNIVERSAL)
            .chain(family_rules())
            .chain(static_rules(RULES))
            .collect();

        let tables = InfoKind::ALL
            .into_iter()
            .map(|kind| {
                let mut table = KindTable::default();
                for (name, scope, guard, accessor) in &ordered {
                    if scope.contains(kind) {
                        let entry = Entry {
                            guard: *guard,
                            accessor: *accessor,
                        };
                        table.insert(name.clone(), entry);
                    }
                }
                (kind, table)
            })
            .collect();
        Self { tables }
    }

    /// Shared dispatcher
    pub fn global() -> &'static PropertyDispatcher {
        static DISPATCHER: OnceLock<PropertyDispatcher> = OnceLock::new();
        DISPATCHER.get_or_init(PropertyDispatcher::new)
    }

    fn entry(&self, node: &InfoNode, name: &str) -> Option<Entry> {
        let entry = *self.tables.get(&node.kind())?.entries.get(name)?;
        match entry.guard {
            Some(guard) if !guard(node) => None,
            _ => Some(entry),
        }
    }

    /// Check whether `name` is readable on `node`
    pub fn supports(&self, node: &InfoNode, name: &str) -> bool {
        self.entry(node, name).is_some()
    }

    /// Every attribute name the table lists for `kind`, in precedence order.
    ///
    /// Guarded attributes are included even though a given node may reject them.
    pub fn property_names(&self, kind: InfoKind) -> Vec<&str> {
        self.tables
            .get(&kind)
            .map(|t| t.names.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Attributes readable on this particular node
    pub fn readable_names(&self, node: &InfoNode) -> Vec<&str> {
        self.property_names(node.kind())
            .into_iter()
            .filter(|name| self.supports(node, name))
            .collect()
    }

    /// Resolve `handle.name`
    pub fn get(&self, handle: &InfoHandle, name: &str) -> HostResult<HostValue> {
        let node = handle.info();
        let Some(entry) = self.entry(node, name) else {
            tracing::trace!(kind = %node.kind(), property = name, "unsupported property");
            return Err(HostError::argument(
                2,
                format!("unsupported info property `{}'", name),
            ));
        };
        tracing::trace!(kind = %node.kind(), property = name, "dispatch");
        Ok(match entry.accessor {
            Accessor::Scalar(get) => get(handle),
            Accessor::Family(family) => HostValue::Bool(family.contains(node.kind())),
            Accessor::Collection(group) => {
                HostValue::object(InfoCollection::new(handle.clone(), group))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::demo_repository;
    use gireflect_repository::Repository;

    fn handle(name: &str) -> InfoHandle {
        let repo = demo_repository();
        let info = repo.find_by_name("Demo", name);
        InfoHandle::wrap(&repo, info).unwrap()
    }

    fn unsupported(handle: &InfoHandle, name: &str) -> bool {
        match handle.get(name) {
            Err(HostError::ArgumentError { position: 2, message }) => {
                message == format!("unsupported info property `{}'", name)
            }
            _ => false,
        }
    }

    #[test]
    fn test_universal_attributes() {
        let point = handle("Point");
        assert_eq!(point.get("type").unwrap(), HostValue::from("struct"));
        assert_eq!(point.get("name").unwrap(), HostValue::from("Point"));
        assert_eq!(point.get("namespace").unwrap(), HostValue::from("Demo"));
        assert_eq!(point.get("deprecated").unwrap(), HostValue::Bool(false));
        assert!(point.get("container").unwrap().is_nil());
    }

    #[test]
    fn test_struct_exposes_gtype_and_fields() {
        let point = handle("Point");
        assert!(point.get("gtype").unwrap().is_number());
        assert_eq!(point.get("is_gtype_struct").unwrap(), HostValue::Bool(false));
        let fields = point.get("fields").unwrap();
        assert_eq!(fields.downcast::<InfoCollection>().unwrap().count(), 2);
    }

    #[test]
    fn test_family_predicates() {
        let point = handle("Point");
        assert_eq!(point.get("is_struct").unwrap(), HostValue::Bool(true));
        assert_eq!(point.get("is_registered_type").unwrap(), HostValue::Bool(true));
        assert_eq!(point.get("is_callable").unwrap(), HostValue::Bool(false));
        assert!(unsupported(&point, "is_boxed"));
    }

    #[test]
    fn test_unsupported_names_attribute() {
        let point = handle("Point");
        assert!(unsupported(&point, "parent"));
        assert!(unsupported(&point, "signals"));
        assert!(unsupported(&point, "typeinfo"));
        assert!(unsupported(&point, "Name"));
        assert!(unsupported(&point, ""));
    }

    #[test]
    fn test_guards_on_type_tag() {
        let sum = handle("sum");
        let args = sum.get("args").unwrap();
        let items = args.downcast::<InfoCollection>().unwrap().get(1).unwrap().unwrap();
        let ty = items.get("typeinfo").unwrap();
        let ty = ty.downcast::<InfoHandle>().unwrap();

        assert_eq!(ty.get("tag").unwrap(), HostValue::from("array"));
        assert_eq!(ty.get("array_type").unwrap(), HostValue::from("c"));
        assert!(unsupported(ty, "interface"));

        let param = ty.get("param").unwrap();
        let param = param.as_sequence().unwrap();
        assert_eq!(param.len(), 1);
        let element = param[0].downcast::<InfoHandle>().unwrap();
        assert_eq!(element.get("tag").unwrap(), HostValue::from("gint32"));
        assert!(unsupported(element, "param"));
        assert!(unsupported(element, "array_type"));
    }

    #[test]
    fn test_property_names() {
        let dispatcher = PropertyDispatcher::global();
        let object = dispatcher.property_names(InfoKind::Object);
        assert_eq!(&object[..5], ["type", "name", "namespace", "deprecated", "container"]);
        assert!(object.contains(&"is_registered_type"));
        assert!(object.contains(&"properties"));
        assert!(!object.contains(&"property"));
        assert!(!object.contains(&"prerequisites"));

        let unresolved = dispatcher.property_names(InfoKind::Unresolved);
        assert_eq!(unresolved.len(), 5 + InfoFamily::ALL.len());
    }

    #[test]
    fn test_every_listed_name_is_readable() {
        let dispatcher = PropertyDispatcher::global();
        for name in ["Point", "Widget", "Sizable", "Mode", "sum", "Shape", "VERSION"] {
            let h = handle(name);
            for property in dispatcher.readable_names(h.info()) {
                assert!(h.get(property).is_ok(), "{}.{}", name, property);
            }
        }
    }
}
