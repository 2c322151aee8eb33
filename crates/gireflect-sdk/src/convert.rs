//! Conversions between host values and Rust types.
//!
//! `FromHost` extracts a typed argument, reporting the argument position on a
//! type mismatch. `ToHost` converts a Rust result back into a host value.
//! The `check_*` / `opt_*` helpers read positional call arguments.

use crate::error::{HostError, HostResult};
use crate::value::HostValue;

/// Convert from HostValue to a Rust type.
pub trait FromHost: Sized {
    /// Host type name expected by this conversion
    const EXPECTED: &'static str;

    /// Convert, or `None` when the dynamic type does not match
    fn from_host(value: &HostValue) -> Option<Self>;
}

/// Convert from a Rust type to HostValue.
pub trait ToHost {
    /// Convert to HostValue
    fn to_host(self) -> HostValue;
}

impl FromHost for String {
    const EXPECTED: &'static str = "string";

    fn from_host(value: &HostValue) -> Option<Self> {
        match value {
            HostValue::String(s) => Some(s.clone()),
            // Numbers coerce to strings, as hosts with string coercion do
            HostValue::Integer(i) => Some(i.to_string()),
            HostValue::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl FromHost for i64 {
    const EXPECTED: &'static str = "number";

    fn from_host(value: &HostValue) -> Option<Self> {
        value.as_integer()
    }
}

impl ToHost for HostValue {
    fn to_host(self) -> HostValue {
        self
    }
}

impl ToHost for bool {
    fn to_host(self) -> HostValue {
        HostValue::Bool(self)
    }
}

impl ToHost for i64 {
    fn to_host(self) -> HostValue {
        HostValue::Integer(self)
    }
}

impl ToHost for String {
    fn to_host(self) -> HostValue {
        HostValue::String(self)
    }
}

impl ToHost for &str {
    fn to_host(self) -> HostValue {
        HostValue::String(self.to_string())
    }
}

impl<T: ToHost> ToHost for Option<T> {
    fn to_host(self) -> HostValue {
        self.map_or(HostValue::Nil, ToHost::to_host)
    }
}

impl<T: ToHost> ToHost for Vec<T> {
    fn to_host(self) -> HostValue {
        HostValue::Sequence(self.into_iter().map(ToHost::to_host).collect())
    }
}

/// Read a required argument (`position` is 1-based)
fn check_arg<T: FromHost>(args: &[HostValue], position: usize) -> HostResult<T> {
    let value = arg_at(args, position);
    T::from_host(value).ok_or(HostError::TypeMismatch {
        position,
        expected: T::EXPECTED,
        got: value.type_name(),
    })
}

/// Read an optional argument; missing or `nil` yields `None`
fn opt_arg<T: FromHost>(args: &[HostValue], position: usize) -> HostResult<Option<T>> {
    if arg_at(args, position).is_nil() {
        return Ok(None);
    }
    check_arg(args, position).map(Some)
}

/// Read a required string argument
pub fn check_string(args: &[HostValue], position: usize) -> HostResult<String> {
    check_arg(args, position)
}

/// Read an optional string argument
pub fn opt_string(args: &[HostValue], position: usize) -> HostResult<Option<String>> {
    opt_arg(args, position)
}

static NIL: HostValue = HostValue::Nil;

fn arg_at(args: &[HostValue], position: usize) -> &HostValue {
    position
        .checked_sub(1)
        .and_then(|i| args.get(i))
        .unwrap_or(&NIL)
}
