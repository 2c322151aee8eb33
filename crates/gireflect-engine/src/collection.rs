//! InfoCollection - sequence view over one child group of a node

use std::any::Any;

use gireflect_repository::ChildGroup;
use gireflect_sdk::{FromHost, HostError, HostObject, HostResult, HostValue};

use crate::handle::InfoHandle;

/// The `group` children of a parent node, indexed 1-based by the host.
///
/// The collection pins its parent for its own lifetime. It is built on every
/// read of a collection attribute and never cached.
#[derive(Debug)]
pub struct InfoCollection {
    parent: InfoHandle,
    group: ChildGroup,
    count: usize,
}

impl InfoCollection {
    /// Create a view over `group` under `parent`
    pub fn new(parent: InfoHandle, group: ChildGroup) -> Self {
        let count = parent.info().child_count(group);
        Self {
            parent,
            group,
            count,
        }
    }

    /// Node whose children are listed
    pub fn parent(&self) -> &InfoHandle {
        &self.parent
    }

    /// Child group
    pub fn group(&self) -> ChildGroup {
        self.group
    }

    /// Number of children
    pub fn count(&self) -> usize {
        self.count
    }

    /// Get the child at 1-based `index`; anything outside `[1, count]` is an error
    pub fn get(&self, index: i64) -> HostResult<Option<InfoHandle>> {
        let ordinal = index
            .checked_sub(1)
            .and_then(|i| usize::try_from(i).ok())
            .filter(|&i| i < self.count)
            .ok_or_else(|| HostError::argument(2, "out of bounds"))?;
        let info = self.parent.info();
        let child = info.child(&**self.parent.repository(), self.group, ordinal);
        Ok(InfoHandle::wrap(self.parent.repository(), child))
    }

    /// Iterate over all children in order
    pub fn iter(&self) -> impl Iterator<Item = InfoHandle> + '_ {
        (1..=self.count as i64).filter_map(|i| self.get(i).ok().flatten())
    }
}

impl HostObject for InfoCollection {
    fn type_name(&self) -> &'static str {
        "gireflect.infos"
    }

    fn index(&self, key: &HostValue) -> HostResult<HostValue> {
        let index = i64::from_host(key).ok_or(HostError::TypeMismatch {
            position: 2,
            expected: i64::EXPECTED,
            got: key.type_name(),
        })?;
        Ok(HostValue::optional(self.get(index)?))
    }

    /// One past the last valid index
    fn len(&self) -> HostResult<i64> {
        Ok(self.count as i64 + 1)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
