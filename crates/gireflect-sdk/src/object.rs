//! HostObject trait - dispatch hooks for native objects
//!
//! A native object attached to a `HostValue` is only ever reached through
//! this trait. The host invokes `index` on attribute or element reads and
//! `len` on length probes. Finalization is `Drop`.

use std::any::Any;

use crate::error::{HostError, HostResult};
use crate::value::HostValue;

/// Native object exposed to the host.
pub trait HostObject: Send + Sync {
    /// Name of the object class, used in diagnostics
    fn type_name(&self) -> &'static str;

    /// Attribute / element read hook (`object[key]`)
    fn index(&self, key: &HostValue) -> HostResult<HostValue>;

    /// Length probe hook (`#object`)
    fn len(&self) -> HostResult<i64> {
        Err(HostError::NoLength(self.type_name()))
    }

    /// Downcast support
    fn as_any(&self) -> &dyn Any;
}

/// Walk a chain of keys from `root`, indexing one step at a time.
///
/// Every intermediate value must be an object; reading through `nil` or a
/// scalar fails with an argument error at the offending step.
pub fn index_path(root: &HostValue, keys: &[HostValue]) -> HostResult<HostValue> {
    let mut current = root.clone();
    for (step, key) in keys.iter().enumerate() {
        current = match &current {
            HostValue::Object(object) => object.index(key)?,
            HostValue::Sequence(items) => key
                .as_integer()
                .and_then(|i| i.checked_sub(1))
                .and_then(|i| usize::try_from(i).ok())
                .and_then(|i| items.get(i).cloned())
                .unwrap_or(HostValue::Nil),
            other => {
                return Err(HostError::argument(
                    step + 1,
                    format!("attempt to index a {} value with {:?}", other.type_name(), key),
                ))
            }
        };
    }
    Ok(current)
}
