//! Integration tests for reflective access over the fixture typelibs
//!
//! Loads GLib-2.0, GObject-2.0 and Demo-1.0 from `tests/fixtures` and walks
//! them the way a scripting host would: through `HostValue` indexing only.

use std::path::PathBuf;
use std::sync::Arc;

use gireflect_engine::{Gi, InfoCollection, InfoHandle, NamespaceHandle, PropertyDispatcher};
use gireflect_repository::{
    InfoFamily, InfoKind, Repository, SharedRepository, TypelibRepository,
};
use gireflect_sdk::{index_path, HostError, HostObject, HostValue};

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn repository() -> SharedRepository {
    Arc::new(TypelibRepository::with_search_paths([fixtures()]))
}

/// Root object with Demo (and through it GObject and GLib) loaded
fn gi() -> HostValue {
    let gi = Gi::new(repository());
    gi.require("Demo", None, None).unwrap();
    HostValue::object(gi)
}

/// Index a dotted path; numeric segments index as integers
fn get(root: &HostValue, path: &str) -> HostValue {
    try_get(root, path).unwrap()
}

fn try_get(root: &HostValue, path: &str) -> Result<HostValue, HostError> {
    let keys: Vec<HostValue> = path
        .split('.')
        .map(|segment| match segment.parse::<i64>() {
            Ok(i) => HostValue::Integer(i),
            Err(_) => HostValue::from(segment),
        })
        .collect();
    index_path(root, &keys)
}

fn len(value: &HostValue) -> i64 {
    value.as_object().unwrap().len().unwrap()
}

fn unsupported(value: &HostValue, property: &str) -> bool {
    let err = value.as_object().unwrap().index(&property.into()).unwrap_err();
    err == HostError::ArgumentError {
        position: 2,
        message: format!("unsupported info property `{}'", property),
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_require_missing_namespace() {
    let gi = Gi::new(repository());
    let values = gi.require_values(&["Gio".into(), HostValue::Nil, HostValue::Nil]).unwrap();
    assert_eq!(values[0], HostValue::Bool(false));
    assert!(values[1].as_str().unwrap().contains("Gio"));
    assert_ne!(values[2].as_integer().unwrap(), 0);
}

#[test]
fn test_namespace_ordinal_and_length() {
    let gi = gi();
    let glib = get(&gi, "GLib");
    let first = get(&glib, "1");
    assert!(first.downcast::<InfoHandle>().is_some());

    let ns = glib.downcast::<NamespaceHandle>().unwrap();
    assert!(ns.n_infos() > 0);
    assert_eq!(len(&glib), ns.n_infos() as i64 + 1);
}

#[test]
fn test_array_param_and_array_type() {
    let gi = gi();
    let ty = get(&gi, "Demo.sum.args.1.typeinfo");
    assert_eq!(get(&ty, "type"), HostValue::from("type"));
    assert_eq!(get(&ty, "tag"), HostValue::from("array"));

    let param = get(&ty, "param");
    let items = param.as_sequence().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(get(&items[0], "type"), HostValue::from("type"));
    assert_eq!(get(&items[0], "tag"), HostValue::from("gint32"));

    let array_type = get(&ty, "array_type");
    assert!(["c", "array", "ptr_array", "byte_array"].contains(&array_type.as_str().unwrap()));
    assert_eq!(get(&gi, "Demo.dump_bytes.args.1.typeinfo.array_type"), HostValue::from("byte_array"));
}

#[test]
fn test_object_parent() {
    let gi = gi();
    assert!(get(&gi, "Demo.Root.parent").is_nil());
    assert!(get(&gi, "GObject.Object.parent").is_nil());

    let parent = get(&gi, "Demo.Widget.parent");
    assert_eq!(get(&parent, "name"), HostValue::from("InitiallyUnowned"));
    assert_eq!(get(&parent, "namespace"), HostValue::from("GObject"));
    assert_eq!(get(&parent, "parent.name"), HostValue::from("Object"));
}

#[test]
fn test_interface_properties_count() {
    let gi = gi();
    let sizable = get(&gi, "Demo.Sizable");
    let properties = get(&sizable, "properties");
    let methods = get(&sizable, "methods");
    assert_eq!(len(&properties), 4);
    assert_eq!(len(&methods), 2);
    assert_eq!(get(&properties, "3.name"), HostValue::from("depth"));
    assert_eq!(get(&properties, "1.type"), HostValue::from("property"));
    assert!(unsupported(&sizable, "property"));
}

// ============================================================================
// Dispatch table
// ============================================================================

/// One node of every kind reachable from the fixtures
fn sample_nodes(gi: &HostValue) -> Vec<(InfoKind, HostValue)> {
    let paths = [
        (InfoKind::Function, "Demo.sum"),
        (InfoKind::Callback, "Demo.ForeachFunc"),
        (InfoKind::Struct, "Demo.Rect"),
        (InfoKind::Boxed, "GLib.Bytes"),
        (InfoKind::Enum, "Demo.Orientation"),
        (InfoKind::Flags, "Demo.Features"),
        (InfoKind::Object, "Demo.Widget"),
        (InfoKind::Interface, "Demo.Sizable"),
        (InfoKind::Constant, "Demo.VERSION_STRING"),
        (InfoKind::ErrorDomain, "Demo.widget_error"),
        (InfoKind::Union, "Demo.Shape"),
        (InfoKind::Value, "Demo.Features.values.2"),
        (InfoKind::Signal, "Demo.Widget.signals.1"),
        (InfoKind::VFunc, "Demo.Widget.vfuncs.1"),
        (InfoKind::Property, "Demo.Widget.properties.1"),
        (InfoKind::Field, "Demo.Rect.fields.1"),
        (InfoKind::Arg, "Demo.sum.args.1"),
        (InfoKind::Type, "Demo.sum.args.1.typeinfo"),
        (InfoKind::Unresolved, "Demo.find_display.return_type.interface"),
    ];
    paths
        .iter()
        .map(|(kind, path)| (*kind, get(gi, path)))
        .collect()
}

#[test]
fn test_sample_covers_every_kind() {
    let gi = gi();
    let nodes = sample_nodes(&gi);
    assert_eq!(nodes.len(), InfoKind::ALL.len());
    for (kind, node) in &nodes {
        assert_eq!(get(node, "type"), HostValue::from(kind.name()), "{}", kind);
    }
}

#[test]
fn test_legal_attributes_resolve() {
    let gi = gi();
    let dispatcher = PropertyDispatcher::global();
    for (kind, node) in sample_nodes(&gi) {
        let handle = node.downcast::<InfoHandle>().unwrap();
        for property in dispatcher.readable_names(handle.info()) {
            let value = handle.get(property);
            assert!(value.is_ok(), "{}.{}: {:?}", kind, property, value);
        }
    }
}

#[test]
fn test_illegal_attributes_name_the_property() {
    let gi = gi();
    let dispatcher = PropertyDispatcher::global();
    let every_name: Vec<&str> = InfoKind::ALL
        .iter()
        .flat_map(|kind| dispatcher.property_names(*kind))
        .chain(["bogus", "property", "is_boxed", "Type"])
        .collect();

    for (kind, node) in sample_nodes(&gi) {
        let handle = node.downcast::<InfoHandle>().unwrap();
        let legal = dispatcher.readable_names(handle.info());
        for name in &every_name {
            if !legal.contains(name) {
                assert!(unsupported(&node, name), "{}.{} should be unsupported", kind, name);
            }
        }
    }
}

/// Attributes each kind accepts, written out by hand
fn expected_attributes(kind: InfoKind) -> Vec<&'static str> {
    use InfoKind as K;
    let mut names = vec!["type", "name", "namespace", "deprecated", "container"];
    names.extend([
        "is_arg",
        "is_callable",
        "is_function",
        "is_signal",
        "is_vfunc",
        "is_constant",
        "is_error_domain",
        "is_field",
        "is_property",
        "is_registered_type",
        "is_enum",
        "is_interface",
        "is_object",
        "is_struct",
        "is_union",
        "is_type",
        "is_value",
    ]);
    let specific: &[&str] = match kind {
        K::Arg | K::Constant | K::Property | K::Field => &["typeinfo"],
        K::Value => &["value"],
        K::Struct => &["gtype", "is_gtype_struct", "fields", "methods"],
        K::Boxed => &["gtype"],
        K::Union => &["gtype", "fields", "methods"],
        K::Enum | K::Flags => &["gtype", "values", "methods"],
        K::Interface => &[
            "gtype",
            "prerequisites",
            "methods",
            "constants",
            "properties",
            "signals",
            "vfuncs",
        ],
        K::Object => &[
            "gtype",
            "parent",
            "interfaces",
            "fields",
            "methods",
            "constants",
            "properties",
            "signals",
            "vfuncs",
        ],
        K::Type => &["tag", "param", "interface", "array_type"],
        K::Function | K::Callback | K::Signal | K::VFunc => &["args", "return_type"],
        K::ErrorDomain | K::Unresolved => &[],
    };
    names.extend(specific);
    names
}

#[test]
fn test_attribute_table_per_kind() {
    let dispatcher = PropertyDispatcher::global();
    for kind in InfoKind::ALL {
        let mut actual = dispatcher.property_names(kind);
        actual.sort_unstable();
        let mut expected = expected_attributes(kind);
        expected.sort_unstable();
        assert_eq!(actual, expected, "attributes of {}", kind);
    }
}

#[test]
fn test_attribute_scoping_on_fixture_nodes() {
    let gi = gi();
    let sizable = get(&gi, "Demo.Sizable");
    assert!(unsupported(&sizable, "fields"));
    assert!(unsupported(&sizable, "parent"));
    assert!(unsupported(&get(&gi, "Demo.Rect"), "properties"));
    assert!(unsupported(&get(&gi, "Demo.Orientation"), "fields"));
    assert!(unsupported(&get(&gi, "Demo.sum"), "gtype"));
    assert!(unsupported(&get(&gi, "Demo.VERSION_STRING"), "value"));
    assert!(unsupported(&get(&gi, "Demo.widget_error"), "gtype"));
}

#[test]
fn test_family_predicates_match_kind() {
    let gi = gi();
    for (kind, node) in sample_nodes(&gi) {
        for family in InfoFamily::ALL {
            let value = get(&node, &format!("is_{}", family.name()));
            assert_eq!(value, HostValue::Bool(family.contains(kind)), "{} is_{}", kind, family.name());
        }
    }
}

#[test]
fn test_struct_is_registered_type() {
    let gi = gi();
    let variant = get(&gi, "GLib.Variant");
    assert!(get(&variant, "gtype").as_integer().unwrap() > 4);
    assert_eq!(get(&gi, "Demo.Rect.gtype"), HostValue::Integer(4));
    assert_eq!(get(&variant, "is_gtype_struct"), HostValue::Bool(false));
    assert_eq!(get(&gi, "Demo.WidgetClass.is_gtype_struct"), HostValue::Bool(true));
    assert_eq!(len(&get(&variant, "methods")), 3);
}

#[test]
fn test_typeinfo_on_typed_kinds() {
    let gi = gi();
    assert_eq!(get(&gi, "Demo.VERSION_STRING.typeinfo.tag"), HostValue::from("utf8"));
    assert_eq!(get(&gi, "Demo.Widget.properties.1.typeinfo.tag"), HostValue::from("utf8"));
    assert_eq!(get(&gi, "Demo.Rect.fields.3.typeinfo.tag"), HostValue::from("gint32"));
    assert_eq!(get(&gi, "GLib.get_user_name.return_type.tag"), HostValue::from("filename"));
    assert!(unsupported(&get(&gi, "Demo.sum"), "typeinfo"));
}

#[test]
fn test_enum_values() {
    let gi = gi();
    let features = get(&gi, "Demo.Features");
    let values = get(&features, "values");
    assert_eq!(len(&values), 5);
    assert_eq!(get(&values, "3.name"), HostValue::from("safe"));
    assert_eq!(get(&values, "3.value"), HostValue::Integer(2));
    assert_eq!(get(&values, "4.deprecated"), HostValue::Bool(true));
    assert_eq!(get(&values, "1.container.name"), HostValue::from("Features"));
    assert_eq!(get(&gi, "Demo.Orientation.methods.1.name"), HostValue::from("to_string"));
}

#[test]
fn test_type_expression_guards() {
    let gi = gi();
    let hash = get(&gi, "Demo.lookup_labels.args.1.typeinfo");
    let param = get(&hash, "param");
    let params = param.as_sequence().unwrap();
    assert_eq!(params.len(), 2);
    assert_eq!(get(&params[0], "tag"), HostValue::from("utf8"));
    assert_eq!(get(&params[1], "interface.name"), HostValue::from("Widget"));
    assert!(unsupported(&hash, "array_type"));
    assert!(unsupported(&hash, "interface"));

    let list = get(&gi, "Demo.list_widgets.return_type");
    assert_eq!(get(&list, "tag"), HostValue::from("gslist"));
    assert_eq!(get(&list, "param").as_sequence().unwrap().len(), 1);

    let scalar = get(&gi, "Demo.sum.return_type");
    assert!(unsupported(&scalar, "param"));
    assert!(get(&scalar, "name").is_nil());
}

#[test]
fn test_unresolved_reference() {
    let gi = gi();
    let display = get(&gi, "Demo.find_display.return_type.interface");
    assert_eq!(get(&display, "type"), HostValue::from("unresolved"));
    assert_eq!(get(&display, "name"), HostValue::from("Display"));
    assert_eq!(get(&display, "namespace"), HostValue::from("Gdk"));
    assert!(unsupported(&display, "gtype"));
}

#[test]
fn test_object_collections() {
    let gi = gi();
    let widget = get(&gi, "Demo.Widget");
    assert_eq!(len(&get(&widget, "interfaces")), 3);
    assert_eq!(get(&widget, "interfaces.1.name"), HostValue::from("Sizable"));
    assert_eq!(get(&widget, "interfaces.2.namespace"), HostValue::from("GObject"));
    assert_eq!(get(&widget, "fields.1.name"), HostValue::from("parent_instance"));
    assert_eq!(get(&widget, "methods.2.name"), HostValue::from("set_label"));
    assert_eq!(get(&widget, "constants.1.name"), HostValue::from("DEFAULT_WIDTH"));
    assert_eq!(get(&widget, "signals.1.args.1.name"), HostValue::from("button"));
    assert_eq!(get(&widget, "vfuncs.1.name"), HostValue::from("draw"));
    assert_eq!(get(&widget, "methods.1.container.name"), HostValue::from("Widget"));
    assert_eq!(get(&gi, "GObject.TypePlugin.prerequisites.1.name"), HostValue::from("Object"));
    assert_eq!(len(&get(&gi, "GObject.TypeCValue.fields")), 4);
}

#[test]
fn test_collection_bounds() {
    let gi = gi();
    let fields = get(&gi, "Demo.Rect.fields");
    let count = fields.downcast::<InfoCollection>().unwrap().count() as i64;
    assert_eq!(len(&fields), count + 1);
    for i in 1..=count {
        assert!(try_get(&fields, &i.to_string()).is_ok());
    }
    for bad in [0, count + 1] {
        let err = try_get(&fields, &bad.to_string()).unwrap_err();
        assert_eq!(err, HostError::argument(2, "out of bounds"));
    }
}

#[test]
fn test_collections_are_not_cached() {
    let gi = gi();
    let widget = get(&gi, "Demo.Widget");
    let first = get(&widget, "methods");
    let second = get(&widget, "methods");
    assert_ne!(first, second);

    let a = get(&first, "1");
    let b = get(&second, "1");
    let a = a.downcast::<InfoHandle>().unwrap();
    let b = b.downcast::<InfoHandle>().unwrap();
    assert!(Arc::ptr_eq(a.info(), b.info()));
}

#[test]
fn test_symbol_miss_is_absent() {
    let gi = gi();
    assert!(get(&gi, "Demo.NoSuchSymbol").is_nil());
    assert!(get(&gi, "Demo.0").is_nil());
    assert!(get(&gi, "Gio.File").is_nil());
    assert!(get(&gi, "Demo.Widget.container").is_nil());
}

#[test]
fn test_version_and_dependencies() {
    let gi = gi();
    assert_eq!(get(&gi, "Demo.version"), HostValue::from("1.0"));
    assert_eq!(get(&gi, "GObject.dependencies.1"), HostValue::from("GLib-2.0"));
    assert!(get(&gi, "GLib.dependencies").is_nil());
    assert!(get(&gi, "Gio.version").is_nil());
}

#[test]
fn test_index_by_gtype() {
    let gi = gi();
    let gtype = get(&gi, "GObject.Object.gtype");
    let found = gi.as_object().unwrap().index(&gtype).unwrap();
    assert_eq!(get(&found, "name"), HostValue::from("Object"));
}

#[test]
fn test_deprecated_flag() {
    let gi = gi();
    assert_eq!(get(&gi, "Demo.old_api.deprecated"), HostValue::Bool(true));
    assert_eq!(get(&gi, "Demo.sum.deprecated"), HostValue::Bool(false));
}

// ============================================================================
// Ownership
// ============================================================================

#[test]
fn test_wrapper_reference_discipline() {
    let repo = repository();
    repo.require("Demo", None).unwrap();
    let node = repo.find_by_name("Demo", "Widget").unwrap();
    let base = Arc::strong_count(&node);

    let wrappers: Vec<HostValue> = (0..8)
        .map(|_| InfoHandle::host_value(&repo, Some(node.clone())))
        .collect();
    assert_eq!(Arc::strong_count(&node), base + 8);
    drop(wrappers);
    assert_eq!(Arc::strong_count(&node), base);
}

#[test]
fn test_collection_releases_parent() {
    let repo = repository();
    let gi = HostValue::object(Gi::new(repo.clone()));
    repo.require("Demo", None).unwrap();
    let node = repo.find_by_name("Demo", "Widget").unwrap();
    let base = Arc::strong_count(&node);

    let methods = get(&gi, "Demo.Widget.methods");
    assert_eq!(Arc::strong_count(&node), base + 1);

    let method = get(&methods, "1");
    drop(methods);
    assert_eq!(Arc::strong_count(&node), base);
    assert_eq!(get(&method, "container.name"), HostValue::from("Widget"));
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_require_loads_dependencies() {
    let repo = repository();
    let gi = Gi::new(repo.clone());
    let ns = gi.require("Demo", Some("1.0"), None).unwrap();
    assert_eq!(ns.name(), "Demo");
    assert_eq!(repo.loaded_namespaces(), ["GLib", "GObject", "Demo"]);
}

#[test]
fn test_require_version_conflict() {
    let gi = Gi::new(repository());
    gi.require("GLib", None, None).unwrap();
    let failure = gi.require("GLib", Some("3.0"), None).unwrap_err();
    assert!(failure.message.contains("GLib"));
    assert_eq!(failure.code, 3);
}

#[test]
fn test_require_private_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::copy(
        fixtures().join("GLib-2.0.typelib.json"),
        dir.path().join("GLib-2.0.typelib.json"),
    )
    .unwrap();

    let gi = Gi::new(Arc::new(TypelibRepository::with_search_paths(Vec::new())));
    let args = [
        HostValue::from("GLib"),
        HostValue::Nil,
        HostValue::from(dir.path().to_string_lossy().into_owned()),
    ];
    let values = gi.require_values(&args).unwrap();
    assert_eq!(values.len(), 1);
    assert_eq!(get(&values[0], "version"), HostValue::from("2.0"));

    let failure = gi.require("GObject", None, Some(dir.path())).unwrap_err();
    assert_eq!(failure.code, 1);
}
