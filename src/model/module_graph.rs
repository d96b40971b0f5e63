//! Import edges between modules: who imports what, under which local
//! alias, so the receiver-type resolver can follow a name back to the
//! module it was declared in.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEntry {
    /// Name as it appears at the use site in the importing file.
    pub local_name: String,
    /// Name exported by the source module, before any `as` rename.
    pub imported_name: String,
    /// Unnormalized source module path as written in the import statement.
    pub source_module: String,
    pub is_default_import: bool,
    pub is_namespace_import: bool,
}

/// Per-file import table plus a reverse lookup the hierarchy builder
/// uses to find every class declared under a given module path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleGraph {
    imports_by_file: HashMap<PathBuf, Vec<ImportEntry>>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_import(&mut self, file: impl Into<PathBuf>, entry: ImportEntry) {
        self.imports_by_file.entry(file.into()).or_default().push(entry);
    }

    pub fn imports_for(&self, file: &std::path::Path) -> &[ImportEntry] {
        self.imports_by_file
            .get(file)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Resolves a locally-used name to the module path it was imported from,
    /// if any.
    pub fn resolve_local_name<'a>(&'a self, file: &std::path::Path, local_name: &str) -> Option<&'a str> {
        self.imports_for(file)
            .iter()
            .find(|e| e.local_name == local_name)
            .map(|e| e.source_module.as_str())
    }
}
