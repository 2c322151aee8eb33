//! `gireflect show` - attribute walk from a namespace
//!
//! A path such as `Widget.fields.1.name` is split on dots; numeric segments
//! index by ordinal, the rest are attribute or symbol names. The value at the
//! end of the path is printed: an info with every attribute it supports, a
//! collection item by item, anything else on one line.

use std::io::Write;

use termcolor::WriteColor;

use gireflect_engine::{Gi, InfoCollection, InfoHandle, NamespaceHandle, PropertyDispatcher};
use gireflect_sdk::{index_path, HostValue};

use super::RequireArgs;
use crate::output::{styled, Style};

/// Resolve `path` and print what it names
pub fn execute(
    gi: &Gi,
    args: &RequireArgs,
    path: Option<&str>,
    out: &mut dyn WriteColor,
) -> anyhow::Result<()> {
    let ns = args.require(gi)?;
    let value = resolve(&ns, path.unwrap_or_default())?;

    if let Some(handle) = value.downcast::<InfoHandle>() {
        styled(out, Style::Heading, &describe(&value))?;
        writeln!(out)?;
        let names = PropertyDispatcher::global().readable_names(handle.info());
        let width = names.iter().map(|n| n.len()).max().unwrap_or(0);
        for name in names {
            let attribute = handle.get(name)?;
            write!(out, "  ")?;
            styled(out, Style::Kind, &format!("{:<width$}", name))?;
            writeln!(out, " = {}", describe(&attribute))?;
        }
    } else if let Some(collection) = value.downcast::<InfoCollection>() {
        styled(out, Style::Heading, &describe(&value))?;
        writeln!(out)?;
        for (ordinal, item) in collection.iter().enumerate() {
            styled(out, Style::Dim, &format!("  {}", ordinal + 1))?;
            writeln!(out, " {}", describe(&HostValue::object(item)))?;
        }
    } else if let Some(ns) = value.downcast::<NamespaceHandle>() {
        styled(out, Style::Heading, ns.name())?;
        writeln!(out, " {}", ns.version().unwrap_or_default())?;
        writeln!(out, "  {} infos", ns.n_infos())?;
    } else {
        writeln!(out, "{}", describe(&value))?;
    }
    Ok(())
}

/// Walk `path` from the namespace object
pub fn resolve(ns: &NamespaceHandle, path: &str) -> anyhow::Result<HostValue> {
    let keys: Vec<HostValue> = path
        .split('.')
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.parse::<i64>() {
            Ok(index) => HostValue::Integer(index),
            Err(_) => HostValue::from(segment),
        })
        .collect();
    Ok(index_path(&HostValue::object(ns.clone()), &keys)?)
}

/// One-line rendering of a host value
pub fn describe(value: &HostValue) -> String {
    match value {
        HostValue::Nil => "nil".to_string(),
        HostValue::Bool(b) => b.to_string(),
        HostValue::Integer(i) => i.to_string(),
        HostValue::Number(n) => n.to_string(),
        HostValue::String(s) => format!("{:?}", s),
        HostValue::Sequence(items) => {
            let items: Vec<String> = items.iter().map(describe).collect();
            format!("[{}]", items.join(", "))
        }
        HostValue::Object(_) => {
            if let Some(handle) = value.downcast::<InfoHandle>() {
                let info = handle.info();
                match info.name() {
                    Some(name) => format!("<{} {}.{}>", info.kind(), info.namespace(), name),
                    None => format!("<{}>", info.kind()),
                }
            } else if let Some(collection) = value.downcast::<InfoCollection>() {
                format!("<{} {}>", collection.count(), collection.group().as_str())
            } else if let Some(ns) = value.downcast::<NamespaceHandle>() {
                format!("<namespace {}>", ns.name())
            } else {
                format!("<{}>", value.as_object().map_or("userdata", |o| o.type_name()))
            }
        }
    }
}
