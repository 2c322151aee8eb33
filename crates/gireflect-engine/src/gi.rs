//! Module root
//!
//! `Gi` is the object the host sees as `gi`: `gi.require(...)` loads a
//! namespace, `gi[number]` looks a type up by its runtime identifier, and any
//! other key names a namespace.

use std::any::Any;
use std::fmt;
use std::path::Path;

use gireflect_repository::{GType, SharedRepository};
use gireflect_sdk::{
    check_string, opt_string, FromHost, HostError, HostObject, HostResult, HostValue,
};

use crate::error::RequireFailure;
use crate::handle::InfoHandle;
use crate::namespace::NamespaceHandle;

/// Entry point over one repository
///
/// Indexing treats every non-numeric key as a namespace name, so
/// `gi["require"]` is the namespace called `require`. The host binding
/// exposes the loader by calling [`Gi::require_values`] directly.
#[derive(Clone)]
pub struct Gi {
    repository: SharedRepository,
}

impl fmt::Debug for Gi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gi").finish_non_exhaustive()
    }
}

impl Gi {
    /// Create the root over `repository`
    pub fn new(repository: SharedRepository) -> Self {
        Self { repository }
    }

    /// Repository every handle created from this root uses
    pub fn repository(&self) -> &SharedRepository {
        &self.repository
    }

    /// Load `namespace`, searching only `typelib_dir` when given
    pub fn require(
        &self,
        namespace: &str,
        version: Option<&str>,
        typelib_dir: Option<&Path>,
    ) -> Result<NamespaceHandle, RequireFailure> {
        let loaded = match typelib_dir {
            Some(dir) => self.repository.require_private(dir, namespace, version),
            None => self.repository.require(namespace, version),
        };
        loaded.map_err(RequireFailure::from)?;
        Ok(self.namespace(namespace))
    }

    /// Host form of `require(namespace, version?, typelib_dir?)`.
    ///
    /// Returns the namespace object on success and `false, message, code`
    /// on failure. Only malformed arguments raise.
    pub fn require_values(&self, args: &[HostValue]) -> HostResult<Vec<HostValue>> {
        let namespace = check_string(args, 1)?;
        let version = opt_string(args, 2)?;
        let typelib_dir = opt_string(args, 3)?;
        let result = self.require(&namespace, version.as_deref(), typelib_dir.as_deref().map(Path::new));
        Ok(match result {
            Ok(ns) => vec![HostValue::object(ns)],
            Err(failure) => vec![
                HostValue::Bool(false),
                HostValue::String(failure.message),
                HostValue::Integer(failure.code.into()),
            ],
        })
    }

    /// Handle for `name`; does not load anything
    pub fn namespace(&self, name: &str) -> NamespaceHandle {
        NamespaceHandle::new(self.repository.clone(), name)
    }

    /// Info declaring the runtime type `gtype`
    pub fn find_by_gtype(&self, gtype: GType) -> Option<InfoHandle> {
        InfoHandle::wrap(&self.repository, self.repository.find_by_gtype(gtype))
    }
}

impl HostObject for Gi {
    fn type_name(&self) -> &'static str {
        "gireflect.gi"
    }

    fn index(&self, key: &HostValue) -> HostResult<HostValue> {
        if key.is_number() {
            let info = key
                .as_integer()
                .and_then(|n| u64::try_from(n).ok())
                .and_then(|n| self.find_by_gtype(GType(n)));
            return Ok(HostValue::optional(info));
        }
        let name = String::from_host(key).ok_or(HostError::TypeMismatch {
            position: 2,
            expected: String::EXPECTED,
            got: key.type_name(),
        })?;
        Ok(HostValue::object(self.namespace(&name)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
