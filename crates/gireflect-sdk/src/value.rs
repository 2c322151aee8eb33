//! HostValue - dynamically-typed values crossing the host boundary
//!
//! Scalars are carried inline. Native handles are attached as
//! `HostValue::Object`, an `Arc<dyn HostObject>`: cloning the value shares the
//! wrapper, and the wrapper's `Drop` runs when the last host reference goes
//! away, which is the finalizer contract a garbage-collected host provides.
//!
//! Sequences are plain host tables. The host indexes them from 1.

use std::fmt;
use std::sync::Arc;

use crate::object::HostObject;

/// Dynamically-typed host value
#[derive(Clone, Default)]
pub enum HostValue {
    /// Absent value (`nil`)
    #[default]
    Nil,
    /// Boolean
    Bool(bool),
    /// Integral number
    Integer(i64),
    /// Floating point number
    Number(f64),
    /// String
    String(String),
    /// Ordered sequence (host table with keys 1..=n)
    Sequence(Vec<HostValue>),
    /// Opaque native object with host-visible dispatch hooks
    Object(Arc<dyn HostObject>),
}

impl HostValue {
    /// Wrap a native object
    pub fn object<T: HostObject + 'static>(object: T) -> Self {
        HostValue::Object(Arc::new(object))
    }

    /// Wrap an optional native object; `None` becomes `Nil`
    pub fn optional<T: HostObject + 'static>(object: Option<T>) -> Self {
        object.map_or(HostValue::Nil, HostValue::object)
    }

    /// Host type name, as shown in argument errors
    pub fn type_name(&self) -> &'static str {
        match self {
            HostValue::Nil => "nil",
            HostValue::Bool(_) => "boolean",
            HostValue::Integer(_) | HostValue::Number(_) => "number",
            HostValue::String(_) => "string",
            HostValue::Sequence(_) => "table",
            HostValue::Object(_) => "userdata",
        }
    }

    /// Check if value is nil
    pub fn is_nil(&self) -> bool {
        matches!(self, HostValue::Nil)
    }

    /// Check if value is a number (integral or not)
    pub fn is_number(&self) -> bool {
        matches!(self, HostValue::Integer(_) | HostValue::Number(_))
    }

    /// Get as integer; non-integral numbers truncate toward zero
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            HostValue::Integer(i) => Some(*i),
            HostValue::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            _ => None,
        }
    }

    /// Get as string slice if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            HostValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get sequence items if this is a sequence
    pub fn as_sequence(&self) -> Option<&[HostValue]> {
        match self {
            HostValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Get the attached native object
    pub fn as_object(&self) -> Option<&Arc<dyn HostObject>> {
        match self {
            HostValue::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Recover the concrete native object type
    pub fn downcast<T: HostObject + 'static>(&self) -> Option<&T> {
        self.as_object()?.as_any().downcast_ref::<T>()
    }
}

impl PartialEq for HostValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (HostValue::Nil, HostValue::Nil) => true,
            (HostValue::Bool(a), HostValue::Bool(b)) => a == b,
            (HostValue::Integer(a), HostValue::Integer(b)) => a == b,
            (HostValue::Number(a), HostValue::Number(b)) => a == b,
            (HostValue::Integer(a), HostValue::Number(b))
            | (HostValue::Number(b), HostValue::Integer(a)) => (*a as f64) == *b,
            (HostValue::String(a), HostValue::String(b)) => a == b,
            (HostValue::Sequence(a), HostValue::Sequence(b)) => a == b,
            // Userdata compares by identity
            (HostValue::Object(a), HostValue::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::Nil => write!(f, "nil"),
            HostValue::Bool(b) => write!(f, "{}", b),
            HostValue::Integer(i) => write!(f, "{}", i),
            HostValue::Number(n) => write!(f, "{}", n),
            HostValue::String(s) => write!(f, "{:?}", s),
            HostValue::Sequence(items) => f.debug_list().entries(items).finish(),
            HostValue::Object(object) => write!(f, "{}: {:p}", object.type_name(), Arc::as_ptr(object)),
        }
    }
}

impl fmt::Display for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::String(s) => f.write_str(s),
            other => fmt::Debug::fmt(other, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_accessors() {
        assert!(HostValue::Nil.is_nil());
        assert_eq!(HostValue::Integer(7).as_integer(), Some(7));
        assert_eq!(HostValue::Number(3.9).as_integer(), Some(3));
        assert_eq!(HostValue::Number(f64::NAN).as_integer(), None);
        assert_eq!(HostValue::String("utf8".into()).as_str(), Some("utf8"));
        assert_eq!(HostValue::String("1".into()).as_integer(), None);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(HostValue::Nil.type_name(), "nil");
        assert_eq!(HostValue::Number(1.5).type_name(), "number");
        assert_eq!(HostValue::Integer(1).type_name(), "number");
        assert_eq!(HostValue::Sequence(vec![]).type_name(), "table");
    }

    #[test]
    fn test_number_equality_across_representations() {
        assert_eq!(HostValue::Integer(3), HostValue::Number(3.0));
        assert_ne!(HostValue::Integer(3), HostValue::String("3".into()));
    }

    #[test]
    fn test_display() {
        assert_eq!(HostValue::String("GLib".into()).to_string(), "GLib");
        let seq = HostValue::Sequence(vec![HostValue::Integer(1), HostValue::Nil]);
        assert_eq!(seq.to_string(), "[1, nil]");
    }
}
