//! Tree-sitter-backed per-file extraction: language detection, the shared
//! configuration table, and the generic class/call detectors plus their
//! per-language bespoke extenders.

pub mod call_detector;
pub mod class_detector;
pub mod language;
pub mod language_config;
mod javascript_lang;
mod parser;
mod python_lang;
mod rust_lang;
mod typescript_lang;

pub use call_detector::CallDetector;
pub use class_detector::ClassDetector;
pub use language::Language;
pub use language_config::LanguageConfig;
pub use parser::{
    check_recursion_depth, node_text, safe_substring_window, safe_truncate_str,
    truncate_for_display, HandledNode, NodeTracker, NodeTrackingState, ParserFactory,
    MAX_AST_DEPTH,
};

/// Parses `source` as `language` and returns the root tree.
pub fn parse_source(source: &str, language: Language) -> Result<tree_sitter::Tree, crate::error::AnalysisError> {
    let mut parser = ParserFactory::create(language)?;
    parser
        .parse(source, None)
        .ok_or_else(|| crate::error::AnalysisError::ParseFailure {
            path: std::path::PathBuf::new(),
            language: language.name().to_string(),
            reason: "tree-sitter returned no tree".to_string(),
        })
}
