//! Core identifier and location types shared across the pipeline: small,
//! `Copy`-friendly newtypes rather than bare `String`/`usize` plumbing.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Zero-based line/column position in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A half-open source span: start(line, column) to end(line, column), both
/// zero-based. Stable across the whole pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: PathBuf,
    pub start: Position,
    pub end: Position,
}

impl Location {
    pub fn new(file: impl Into<PathBuf>, start: Position, end: Position) -> Self {
        Self {
            file: file.into(),
            start,
            end,
        }
    }

    /// Ordering key for deterministic sort by (file_path, start_line, start_column).
    pub fn sort_key(&self) -> (&Path, u32, u32) {
        (&self.file, self.start.line, self.start.column)
    }
}

/// Globally unique symbol identifier of the form `<normalized-module-path>#<name>`.
/// Two SymbolIds compare equal iff their textual form is equal; textual
/// equality is defined to imply identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(String);

impl SymbolId {
    /// Builds a SymbolId from a (possibly unnormalized) module path and a name.
    pub fn new(module_path: &str, name: &str) -> Self {
        Self(format!("{}#{}", normalize_module_path(module_path), name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strips file extension suffixes and collapses `./` prefixes so that
/// textual equality of the normalized path implies identity.
pub fn normalize_module_path(path: &str) -> String {
    let mut p = path.replace('\\', "/");

    while let Some(stripped) = p.strip_prefix("./") {
        p = stripped.to_string();
    }

    const EXTENSIONS: &[&str] = &[".d.ts", ".tsx", ".ts", ".mts", ".cts", ".jsx", ".mjs", ".cjs", ".js", ".py", ".pyi", ".rs"];
    for ext in EXTENSIONS {
        if let Some(stripped) = p.strip_suffix(ext) {
            p = stripped.to_string();
            break;
        }
    }

    p
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_extension_and_dot_slash() {
        assert_eq!(normalize_module_path("./services/user.ts"), "services/user");
        assert_eq!(normalize_module_path("services/user.py"), "services/user");
        assert_eq!(normalize_module_path("./a/b.rs"), "a/b");
    }

    #[test]
    fn symbol_id_textual_equality() {
        let a = SymbolId::new("./services/user", "UserService");
        let b = SymbolId::new("services/user.ts", "UserService");
        assert_eq!(a.as_str(), "services/user#UserService");
        assert_eq!(b.as_str(), "services/user#UserService");
        assert_eq!(a, b);
    }

    #[test]
    fn location_sort_key_orders_by_position() {
        let a = Location::new("a.rs", Position::new(1, 0), Position::new(1, 5));
        let b = Location::new("a.rs", Position::new(2, 0), Position::new(2, 5));
        assert!(a.sort_key() < b.sort_key());
    }
}
