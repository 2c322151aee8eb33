//! InfoHandle - host wrapper around one info node

use std::any::Any;
use std::fmt;

use gireflect_repository::{InfoRef, SharedRepository};
use gireflect_sdk::{FromHost, HostError, HostObject, HostResult, HostValue};

use crate::dispatch::PropertyDispatcher;

/// Host-visible wrapper holding one reference on an info node.
///
/// Creating a handle acquires a reference, dropping it releases that
/// reference. Cloning acquires another one, so two handles over the same
/// node are independent.
#[derive(Clone)]
pub struct InfoHandle {
    info: InfoRef,
    repository: SharedRepository,
}

impl InfoHandle {
    /// Wrap an owned node reference; `None` yields `None`, never a handle
    pub fn wrap(repository: &SharedRepository, info: Option<InfoRef>) -> Option<Self> {
        let info = info?;
        tracing::trace!(kind = %info.kind(), name = ?info.name(), "wrap info");
        Some(Self {
            info,
            repository: repository.clone(),
        })
    }

    /// Wrap for the host: a handle object, or `nil` for `None`
    pub fn host_value(repository: &SharedRepository, info: Option<InfoRef>) -> HostValue {
        HostValue::optional(Self::wrap(repository, info))
    }

    /// Underlying node
    pub fn info(&self) -> &InfoRef {
        &self.info
    }

    /// Repository the node was obtained from
    pub fn repository(&self) -> &SharedRepository {
        &self.repository
    }

    /// Read an attribute, as the host does with `handle.name`
    pub fn get(&self, name: &str) -> HostResult<HostValue> {
        PropertyDispatcher::global().get(self, name)
    }
}

impl Drop for InfoHandle {
    fn drop(&mut self) {
        tracing::trace!(kind = %self.info.kind(), name = ?self.info.name(), "release info");
    }
}

impl fmt::Debug for InfoHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfoHandle")
            .field("kind", &self.info.kind())
            .field("namespace", &self.info.namespace())
            .field("name", &self.info.name())
            .finish()
    }
}

impl HostObject for InfoHandle {
    fn type_name(&self) -> &'static str {
        "gireflect.info"
    }

    fn index(&self, key: &HostValue) -> HostResult<HostValue> {
        let name = String::from_host(key).ok_or(HostError::TypeMismatch {
            position: 2,
            expected: String::EXPECTED,
            got: key.type_name(),
        })?;
        self.get(&name)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::demo_repository;
    use gireflect_repository::Repository;
    use std::sync::Arc;

    #[test]
    fn test_wrap_none_is_absent() {
        let repo = demo_repository();
        assert!(InfoHandle::wrap(&repo, None).is_none());
        assert!(InfoHandle::host_value(&repo, None).is_nil());
    }

    #[test]
    fn test_wrap_and_release_balance() {
        let repo = demo_repository();
        let node = repo.find_by_name("Demo", "Point").unwrap();
        let before = Arc::strong_count(&node);

        let handles: Vec<_> = (0..5)
            .map(|_| InfoHandle::wrap(&repo, Some(node.clone())).unwrap())
            .collect();
        assert_eq!(Arc::strong_count(&node), before + 5);

        drop(handles);
        assert_eq!(Arc::strong_count(&node), before);
    }

    #[test]
    fn test_clone_acquires() {
        let repo = demo_repository();
        let node = repo.find_by_name("Demo", "Point").unwrap();
        let handle = InfoHandle::wrap(&repo, Some(node.clone())).unwrap();
        let count = Arc::strong_count(&node);
        let copy = handle.clone();
        assert_eq!(Arc::strong_count(&node), count + 1);
        drop(copy);
        assert_eq!(Arc::strong_count(&node), count);
    }

    #[test]
    fn test_index_requires_string_key() {
        let repo = demo_repository();
        let handle = InfoHandle::wrap(&repo, repo.find_by_name("Demo", "Point")).unwrap();
        let err = handle.index(&HostValue::Bool(true)).unwrap_err();
        assert_eq!(err.to_string(), "bad argument #2 (string expected, got boolean)");
        assert_eq!(handle.index(&"name".into()).unwrap(), HostValue::from("Point"));
    }

    #[test]
    fn test_no_length() {
        let repo = demo_repository();
        let handle = InfoHandle::wrap(&repo, repo.find_by_name("Demo", "Point")).unwrap();
        assert!(matches!(handle.len(), Err(HostError::NoLength("gireflect.info"))));
    }
}
