//! Gireflect SDK - host boundary for native reflective objects
//!
//! This crate provides the minimal types a scripting host needs to carry
//! gireflect objects without depending on the repository or engine crates:
//!
//! - [`HostValue`]: dynamically-typed values, with native handles attached as
//!   opaque objects
//! - [`HostObject`]: the attribute-read and length-probe dispatch hooks
//! - [`HostError`]: argument errors raised back to the caller
//! - [`FromHost`] / [`ToHost`]: argument extraction and result conversion
//!
//! # Example
//!
//! ```ignore
//! use gireflect_sdk::{HostValue, index_path};
//!
//! let gi = HostValue::object(gireflect_engine::Gi::new(repository));
//! let name = index_path(&gi, &["GLib".into(), "Variant".into(), "name".into()])?;
//! ```

#![warn(missing_docs)]

pub mod convert;
pub mod error;
pub mod object;
pub mod value;

pub use convert::{check_string, opt_string, FromHost, ToHost};
pub use error::{HostError, HostResult};
pub use object::{index_path, HostObject};
pub use value::HostValue;

impl From<&str> for HostValue {
    fn from(s: &str) -> Self {
        HostValue::String(s.to_string())
    }
}

impl From<String> for HostValue {
    fn from(s: String) -> Self {
        HostValue::String(s)
    }
}

impl From<i64> for HostValue {
    fn from(i: i64) -> Self {
        HostValue::Integer(i)
    }
}

impl From<bool> for HostValue {
    fn from(b: bool) -> Self {
        HostValue::Bool(b)
    }
}
