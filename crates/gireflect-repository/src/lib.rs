//! Gireflect repository
//!
//! Loads typelibs and exposes their metadata as a graph of reference-counted
//! [`InfoNode`]s:
//!
//! - **kind**: closed enumerations of node kinds, kind families and type tags
//! - **info**: the node graph and its typed views
//! - **typelib**: the on-disk format and loaded namespaces
//! - **repository**: the [`Repository`] trait and its file-backed implementation
//! - **gtype**: runtime type identifiers bound at load time
//! - **config**: search path configuration

pub mod config;
pub mod error;
pub mod gtype;
pub mod info;
pub mod kind;
pub mod repository;
pub mod typelib;

pub use config::{ConfigError, RepositoryConfig, TYPELIB_PATH_ENV};
pub use error::RepositoryError;
pub use gtype::{GType, GTypeEntry, GTypeRegistry};
pub use info::{ChildGroup, InfoData, InfoNode, InfoRef, TypeRef};
pub use kind::{ArrayType, InfoFamily, InfoKind, TypeTag};
pub use repository::{Repository, SharedRepository, TypelibRepository};
pub use typelib::{Typelib, TypelibFile, TYPELIB_SUFFIX};
