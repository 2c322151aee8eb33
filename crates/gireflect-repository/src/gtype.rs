//! Runtime type identifiers
//!
//! Registered types carry a `type_name` in their typelib. When the typelib is
//! loaded each such name is bound to a process-unique [`GType`], and the
//! registry remembers which info declared it so `find_by_gtype` can map back.

use rustc_hash::FxHashMap;

/// Runtime type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GType(pub u64);

impl GType {
    /// Type of registered infos that declare no runtime type
    pub const NONE: GType = GType(4);
}

/// First identifier handed out; everything below is reserved for fundamentals
const FIRST_DYNAMIC: u64 = 0x100;
/// Identifiers are multiples of four, as fundamental ids are
const STEP: u64 = 4;

/// Declaration site of a registered type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GTypeEntry {
    /// Namespace of the declaring info
    pub namespace: String,
    /// Name of the declaring info within its namespace
    pub info_name: String,
}

/// Binding of runtime type names to identifiers
#[derive(Debug)]
pub struct GTypeRegistry {
    by_name: FxHashMap<String, GType>,
    entries: FxHashMap<GType, GTypeEntry>,
    next: u64,
}

impl Default for GTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GTypeRegistry {
    /// Create new empty registry
    pub fn new() -> Self {
        Self {
            by_name: FxHashMap::default(),
            entries: FxHashMap::default(),
            next: FIRST_DYNAMIC,
        }
    }

    /// Register `type_name` for an info, returning its identifier.
    ///
    /// A name registered twice keeps its first identifier.
    pub fn register(&mut self, type_name: &str, namespace: &str, info_name: &str) -> GType {
        if let Some(gtype) = self.by_name.get(type_name) {
            return *gtype;
        }
        let gtype = GType(self.next);
        self.next += STEP;
        self.by_name.insert(type_name.to_string(), gtype);
        self.entries.insert(
            gtype,
            GTypeEntry {
                namespace: namespace.to_string(),
                info_name: info_name.to_string(),
            },
        );
        gtype
    }

    /// Get declaration site of an identifier
    pub fn entry(&self, gtype: GType) -> Option<&GTypeEntry> {
        self.entries.get(&gtype)
    }
}
