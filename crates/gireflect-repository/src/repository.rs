//! Repository service
//!
//! The [`Repository`] trait is the context every reflective operation runs
//! against. [`TypelibRepository`] implements it over typelib files found on a
//! search path. Namespaces stay loaded for the lifetime of the repository.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::config::RepositoryConfig;
use crate::error::RepositoryError;
use crate::gtype::{GType, GTypeRegistry};
use crate::info::{InfoNode, InfoRef, TypeRef};
use crate::typelib::{split_dependency, Typelib, TypelibFile, TYPELIB_SUFFIX};

// ============================================================================
// Repository trait
// ============================================================================

/// Loaded namespaces and their metadata
pub trait Repository: Send + Sync {
    /// Load `namespace` (and its dependencies) from the search path.
    ///
    /// Without a version the highest available one is chosen. Requiring an
    /// already loaded namespace returns it, unless a different version is asked for.
    fn require(&self, namespace: &str, version: Option<&str>)
        -> Result<Arc<Typelib>, RepositoryError>;

    /// Like [`require`](Repository::require), but look for the namespace only in `typelib_dir`
    fn require_private(
        &self,
        typelib_dir: &Path,
        namespace: &str,
        version: Option<&str>,
    ) -> Result<Arc<Typelib>, RepositoryError>;

    /// Get a loaded namespace
    fn typelib(&self, namespace: &str) -> Option<Arc<Typelib>>;

    /// Acquire the info declaring a runtime type
    fn find_by_gtype(&self, gtype: GType) -> Option<InfoRef>;

    /// Names of loaded namespaces, in load order
    fn loaded_namespaces(&self) -> Vec<String>;

    /// Acquire a top-level info by name
    fn find_by_name(&self, namespace: &str, name: &str) -> Option<InfoRef> {
        self.typelib(namespace)?.find(name)
    }

    /// Number of top-level infos; 0 for namespaces that are not loaded
    fn n_infos(&self, namespace: &str) -> usize {
        self.typelib(namespace).map_or(0, |t| t.n_infos())
    }

    /// Acquire the `index`-th (0-based) top-level info
    fn info(&self, namespace: &str, index: usize) -> Option<InfoRef> {
        self.typelib(namespace)?.info(index)
    }

    /// Direct dependencies as `"Namespace-Version"`; `None` when not loaded or when there are none
    fn dependencies(&self, namespace: &str) -> Option<Vec<String>> {
        let typelib = self.typelib(namespace)?;
        let dependencies = typelib.dependencies();
        (!dependencies.is_empty()).then(|| dependencies.to_vec())
    }

    /// Loaded version of a namespace
    fn version(&self, namespace: &str) -> Option<String> {
        self.typelib(namespace).map(|t| t.version().to_string())
    }

    /// Acquire the target of a cross reference, or an `unresolved` placeholder
    fn resolve(&self, target: &TypeRef) -> InfoRef {
        self.find_by_name(&target.namespace, &target.name)
            .unwrap_or_else(|| InfoNode::unresolved(target))
    }
}

/// Repository shared between handles
pub type SharedRepository = Arc<dyn Repository>;

// ============================================================================
// TypelibRepository
// ============================================================================

#[derive(Debug, Default)]
struct State {
    typelibs: FxHashMap<String, Arc<Typelib>>,
    order: Vec<String>,
    gtypes: GTypeRegistry,
}

/// Repository backed by `<Namespace>-<Version>.typelib.json` files
#[derive(Debug, Default)]
pub struct TypelibRepository {
    search_path: Vec<PathBuf>,
    state: RwLock<State>,
}

impl TypelibRepository {
    /// Create a repository using the effective search path of `config`
    pub fn new(config: &RepositoryConfig) -> Self {
        Self::with_search_paths(config.search_path())
    }

    /// Create a repository searching exactly `paths`
    pub fn with_search_paths(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            search_path: paths.into_iter().collect(),
            state: RwLock::new(State::default()),
        }
    }

    /// Directories searched by [`Repository::require`]
    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    /// Register an in-memory typelib and require its dependencies from the search path
    pub fn load_typelib(&self, file: TypelibFile) -> Result<Arc<Typelib>, RepositoryError> {
        if let Some(loaded) = self.loaded(&file.namespace, Some(&file.version))? {
            return Ok(loaded);
        }
        let mut loading = vec![file.namespace.clone()];
        self.require_dependencies(&file, None, &mut loading)?;
        self.insert(file, None)
    }

    fn loaded(
        &self,
        namespace: &str,
        version: Option<&str>,
    ) -> Result<Option<Arc<Typelib>>, RepositoryError> {
        let state = self.state.read();
        let Some(typelib) = state.typelibs.get(namespace) else {
            return Ok(None);
        };
        match version {
            Some(version) if version != typelib.version() => Err(RepositoryError::VersionConflict {
                namespace: namespace.to_string(),
                requested: version.to_string(),
                loaded: typelib.version().to_string(),
            }),
            _ => Ok(Some(typelib.clone())),
        }
    }

    fn require_in(
        &self,
        private_dir: Option<&Path>,
        namespace: &str,
        version: Option<&str>,
        loading: &mut Vec<String>,
    ) -> Result<Arc<Typelib>, RepositoryError> {
        if let Some(loaded) = self.loaded(namespace, version)? {
            return Ok(loaded);
        }

        let dirs: Vec<&Path> = match private_dir {
            Some(dir) if loading.is_empty() => vec![dir],
            Some(dir) => std::iter::once(dir)
                .chain(self.search_path.iter().map(PathBuf::as_path))
                .collect(),
            None => self.search_path.iter().map(PathBuf::as_path).collect(),
        };
        let (file_version, path) = locate(&dirs, namespace, version).ok_or_else(|| {
            RepositoryError::TypelibNotFound {
                namespace: namespace.to_string(),
                version: version.map(str::to_string),
            }
        })?;

        let file = TypelibFile::from_file(&path)?;
        if file.namespace != namespace || file.version != file_version {
            return Err(RepositoryError::NamespaceMismatch {
                expected: format!("{}-{}", namespace, file_version),
                found: format!("{}-{}", file.namespace, file.version),
                path,
            });
        }

        loading.push(namespace.to_string());
        let dependencies = self.require_dependencies(&file, private_dir, loading);
        loading.pop();
        dependencies?;

        self.insert(file, Some(path))
    }

    fn require_dependencies(
        &self,
        file: &TypelibFile,
        private_dir: Option<&Path>,
        loading: &mut Vec<String>,
    ) -> Result<(), RepositoryError> {
        for dependency in &file.dependencies {
            let Some((namespace, version)) = split_dependency(dependency) else {
                return Err(RepositoryError::invalid(
                    file.file_name(),
                    format!("malformed dependency '{}'", dependency),
                ));
            };
            // Cycles are broken by the namespace currently being loaded
            if loading.iter().any(|n| n == namespace) {
                continue;
            }
            tracing::debug!(namespace = %file.namespace, dependency = %dependency, "requiring dependency");
            self.require_in(private_dir, namespace, Some(version), loading)?;
        }
        Ok(())
    }

    fn insert(
        &self,
        file: TypelibFile,
        path: Option<PathBuf>,
    ) -> Result<Arc<Typelib>, RepositoryError> {
        let mut state = self.state.write();
        if let Some(existing) = state.typelibs.get(&file.namespace) {
            return Ok(existing.clone());
        }
        let typelib = Arc::new(Typelib::load(file, path.as_deref(), &mut state.gtypes)?);
        tracing::debug!(
            namespace = typelib.namespace(),
            version = typelib.version(),
            infos = typelib.n_infos(),
            "loaded typelib"
        );
        state
            .typelibs
            .insert(typelib.namespace().to_string(), typelib.clone());
        state.order.push(typelib.namespace().to_string());
        Ok(typelib)
    }
}

impl Repository for TypelibRepository {
    #[tracing::instrument(level = "debug", skip(self))]
    fn require(
        &self,
        namespace: &str,
        version: Option<&str>,
    ) -> Result<Arc<Typelib>, RepositoryError> {
        self.require_in(None, namespace, version, &mut Vec::new())
            .inspect_err(|e| tracing::debug!(error = %e, "require failed"))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn require_private(
        &self,
        typelib_dir: &Path,
        namespace: &str,
        version: Option<&str>,
    ) -> Result<Arc<Typelib>, RepositoryError> {
        self.require_in(Some(typelib_dir), namespace, version, &mut Vec::new())
            .inspect_err(|e| tracing::debug!(error = %e, "require failed"))
    }

    fn typelib(&self, namespace: &str) -> Option<Arc<Typelib>> {
        self.state.read().typelibs.get(namespace).cloned()
    }

    fn find_by_gtype(&self, gtype: GType) -> Option<InfoRef> {
        let (namespace, name) = {
            let state = self.state.read();
            let entry = state.gtypes.entry(gtype)?;
            (entry.namespace.clone(), entry.info_name.clone())
        };
        self.find_by_name(&namespace, &name)
    }

    fn loaded_namespaces(&self) -> Vec<String> {
        self.state.read().order.clone()
    }
}

// ============================================================================
// Search
// ============================================================================

/// Find the typelib file for `namespace` in `dirs`.
///
/// With a version the first directory holding that exact file wins. Without
/// one the highest version across all directories wins, ties going to the
/// earlier directory. Returns the version named by the file alongside its path.
fn locate(dirs: &[&Path], namespace: &str, version: Option<&str>) -> Option<(String, PathBuf)> {
    if let Some(version) = version {
        let file_name = format!("{}-{}{}", namespace, version, TYPELIB_SUFFIX);
        return dirs
            .iter()
            .map(|dir| dir.join(&file_name))
            .find(|path| path.is_file())
            .map(|path| (version.to_string(), path));
    }

    let prefix = format!("{}-", namespace);
    let mut best: Option<(String, PathBuf)> = None;
    for dir in dirs {
        // Unreadable or missing directories are skipped
        let Ok(entries) = std::fs::read_dir(dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let file_name = entry.file_name();
            let Some(candidate) = file_name
                .to_str()
                .and_then(|n| n.strip_prefix(&prefix))
                .and_then(|n| n.strip_suffix(TYPELIB_SUFFIX))
            else {
                continue;
            };
            // "Gtk-" must not match "Gtk-Source-..." style names
            if candidate.is_empty() || candidate.contains('-') {
                continue;
            }
            let newer = best
                .as_ref()
                .map_or(true, |(v, _)| compare_versions(candidate, v) == Ordering::Greater);
            if newer {
                best = Some((candidate.to_string(), entry.path()));
            }
        }
    }
    best
}

/// Compare dotted versions component-wise, numerically where possible
fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (Some(_), None) => return Ordering::Greater,
            (None, Some(_)) => return Ordering::Less,
            (Some(x), Some(y)) => {
                let ordering = match (x.parse::<u64>(), y.parse::<u64>()) {
                    (Ok(x), Ok(y)) => x.cmp(&y),
                    _ => x.cmp(y),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}
