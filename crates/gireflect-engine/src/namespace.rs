//! NamespaceHandle - host wrapper around a namespace name

use std::any::Any;
use std::fmt;

use gireflect_repository::SharedRepository;
use gireflect_sdk::{FromHost, HostError, HostObject, HostResult, HostValue, ToHost};

use crate::handle::InfoHandle;

/// A namespace by name.
///
/// Holding a handle does not imply the namespace is loaded; lookups on a
/// namespace that was never required come back empty.
#[derive(Clone)]
pub struct NamespaceHandle {
    name: String,
    repository: SharedRepository,
}

impl NamespaceHandle {
    /// Create a handle for `name`
    pub fn new(repository: SharedRepository, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            repository,
        }
    }

    /// Namespace name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of top-level infos
    pub fn n_infos(&self) -> usize {
        self.repository.n_infos(&self.name)
    }

    /// Get the info at 1-based `index`; out of range is absent
    pub fn info(&self, index: i64) -> Option<InfoHandle> {
        let ordinal = usize::try_from(index.checked_sub(1)?).ok()?;
        InfoHandle::wrap(&self.repository, self.repository.info(&self.name, ordinal))
    }

    /// Look up a top-level info by name; a miss is absent
    pub fn find(&self, name: &str) -> Option<InfoHandle> {
        InfoHandle::wrap(&self.repository, self.repository.find_by_name(&self.name, name))
    }

    /// Loaded version
    pub fn version(&self) -> Option<String> {
        self.repository.version(&self.name)
    }

    /// Dependencies as `"Namespace-Version"`
    pub fn dependencies(&self) -> Option<Vec<String>> {
        self.repository.dependencies(&self.name)
    }

    /// Iterate over all top-level infos in order
    pub fn iter(&self) -> impl Iterator<Item = InfoHandle> + '_ {
        (1..=self.n_infos() as i64).filter_map(|i| self.info(i))
    }
}

impl fmt::Debug for NamespaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NamespaceHandle").field(&self.name).finish()
    }
}

impl HostObject for NamespaceHandle {
    fn type_name(&self) -> &'static str {
        "gireflect.namespace"
    }

    fn index(&self, key: &HostValue) -> HostResult<HostValue> {
        if key.is_number() {
            let info = key.as_integer().and_then(|index| self.info(index));
            return Ok(HostValue::optional(info));
        }
        let name = String::from_host(key).ok_or(HostError::TypeMismatch {
            position: 2,
            expected: String::EXPECTED,
            got: key.type_name(),
        })?;
        Ok(match name.as_str() {
            "dependencies" => self.dependencies().to_host(),
            "version" => self.version().to_host(),
            symbol => HostValue::optional(self.find(symbol)),
        })
    }

    /// One past the last valid index
    fn len(&self) -> HostResult<i64> {
        Ok(self.n_infos() as i64 + 1)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
