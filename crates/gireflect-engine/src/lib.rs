//! Gireflect engine
//!
//! Projects the repository's info graph into host-visible objects:
//!
//! - [`InfoHandle`]: one info node; attribute reads go through the
//!   [`PropertyDispatcher`]
//! - [`InfoCollection`]: a 1-based sequence view over one child group
//! - [`NamespaceHandle`]: ordinal and by-name access to a namespace
//! - [`Gi`]: the module root with `require`
//!
//! Every object carries the repository it was created from; there is no
//! process-global state.

pub mod collection;
pub mod dispatch;
pub mod error;
pub mod gi;
pub mod handle;
pub mod namespace;

pub use collection::InfoCollection;
pub use dispatch::PropertyDispatcher;
pub use error::RequireFailure;
pub use gi::Gi;
pub use handle::InfoHandle;
pub use namespace::NamespaceHandle;
