//! Structured error types using `thiserror`, in the same shape the rest of
//! the ecosystem reaches for: one enum per concern, recovery suggestions
//! attached where the user can actually act on them.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while analyzing a single file or a whole run.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to initialize the {language} grammar: {source}")]
    GrammarInit {
        language: String,
        source: tree_sitter::LanguageError,
    },

    #[error("{language} file '{path}' failed to parse: {reason}")]
    ParseFailure {
        path: PathBuf,
        language: String,
        reason: String,
    },

    #[error(
        "unsupported file extension '{extension}' for file '{path}'; supported languages are javascript, typescript, python, rust"
    )]
    UnsupportedLanguage { path: PathBuf, extension: String },

    #[error("definition '{name}' in '{path}' has no enclosing body scope")]
    MissingBodyScope { name: String, path: PathBuf },

    #[error("invalid configuration: {reason}")]
    Config { reason: String },

    #[error("{0}")]
    Other(String),
}

impl AnalysisError {
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::FileRead { .. } => vec![
                "check that the file exists and is readable",
                "make sure no other process holds an exclusive lock on it",
            ],
            Self::UnsupportedLanguage { .. } => vec![
                "only .js/.jsx/.mjs/.cjs, .ts/.tsx/.mts/.cts, .py/.pyi, and .rs are analyzed",
            ],
            Self::ParseFailure { .. } => vec![
                "the file's syntax tree could not be produced; check for invalid syntax",
            ],
            Self::GrammarInit { .. } => vec!["this indicates a version mismatch between tree-sitter and a grammar crate"],
            _ => vec![],
        }
    }
}

/// Errors raised while building or querying the global class hierarchy.
/// Cycles are diagnostics, not panics: every traversal that can loop
/// carries a visited set and reports a `Cycle` instead of recursing
/// forever.
#[derive(Error, Debug)]
pub enum HierarchyError {
    #[error("cycle detected while linearizing the MRO of '{class}': {path}")]
    MroCycle { class: String, path: String },

    #[error("C3 linearization of '{class}' is inconsistent: no valid merge order exists")]
    InconsistentC3 { class: String },

    #[error("cycle detected while resolving method '{method}' starting at '{class}'")]
    ResolutionCycle { class: String, method: String },

    #[error("duplicate SymbolId '{symbol_id}' encountered during insertion from a different file than its last writer")]
    DuplicateSymbol { symbol_id: String },
}

/// A non-fatal, user-facing diagnostic collected during a run — distinct
/// from `AnalysisError`/`HierarchyError`, which abort the unit of work they
/// occur in. Diagnostics accumulate and are reported alongside a
/// successful result.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Diagnostic {
    pub file: PathBuf,
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

impl Diagnostic {
    pub fn warning(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    pub fn error(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
pub type HierarchyResult<T> = Result<T, HierarchyError>;

/// Adds file-path context to a foreign error on the way into an
/// `AnalysisError`.
pub trait ErrorContext<T> {
    fn with_path(self, path: &std::path::Path) -> AnalysisResult<T>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_path(self, path: &std::path::Path) -> AnalysisResult<T> {
        self.map_err(|e| AnalysisError::Other(format!("{}: {}", path.display(), e)))
    }
}
