//! UTF-8-safe text helpers and the tree-sitter parser factory.
//!
//! The byte-slicing helpers here are load-bearing: every extractor in
//! `class_detector`/`call_detector` slices source text by tree-sitter byte
//! offsets, and source text is not guaranteed ASCII.

use crate::parsing::Language;
use std::collections::HashSet;
use tree_sitter::{Node, Parser};

/// Builds a tree-sitter `Parser` for one of the four supported languages.
pub struct ParserFactory;

impl ParserFactory {
    pub fn create(language: Language) -> Result<Parser, crate::error::AnalysisError> {
        let mut parser = Parser::new();
        let ts_language = match language {
            Language::Rust => tree_sitter_rust::LANGUAGE.into(),
            Language::Python => tree_sitter_python::LANGUAGE.into(),
            Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        };
        parser
            .set_language(&ts_language)
            .map_err(|e| crate::error::AnalysisError::GrammarInit {
                language: language.name().to_string(),
                source: e,
            })?;
        Ok(parser)
    }
}

/// Information about a handled AST node, used only for debug-mode coverage
/// logging (which node types a given file's parse actually touched).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandledNode {
    pub name: String,
    pub id: u16,
}

pub trait NodeTracker {
    fn get_handled_nodes(&self) -> &HashSet<HandledNode>;
    fn register_handled_node(&mut self, node_kind: &str, node_id: u16);
}

#[derive(Debug, Default)]
pub struct NodeTrackingState {
    handled_nodes: HashSet<HandledNode>,
}

impl NodeTracker for NodeTrackingState {
    fn get_handled_nodes(&self) -> &HashSet<HandledNode> {
        &self.handled_nodes
    }

    #[inline]
    fn register_handled_node(&mut self, node_kind: &str, node_id: u16) {
        self.handled_nodes.insert(HandledNode {
            name: node_kind.to_string(),
            id: node_id,
        });
    }
}

/// Safely truncate a UTF-8 string at a character boundary.
#[inline]
pub fn safe_truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut boundary = max_bytes;
    while boundary > 0 && !s.is_char_boundary(boundary) {
        boundary -= 1;
    }
    &s[..boundary]
}

/// Safely extract a window of up to `window_size` bytes ending at `end_byte`,
/// never slicing mid-character.
pub fn safe_substring_window(code: &str, end_byte: usize, window_size: usize) -> &str {
    let end = end_byte.min(code.len());
    let start_raw = end.saturating_sub(window_size);
    let start = if start_raw > 0 && !code.is_char_boundary(start_raw) {
        (start_raw..=start_raw.saturating_add(3).min(end))
            .find(|&i| code.is_char_boundary(i))
            .unwrap_or(end)
    } else {
        start_raw
    };
    &code[start..end]
}

#[inline]
pub fn truncate_for_display(s: &str, max_bytes: usize) -> String {
    let truncated = safe_truncate_str(s, max_bytes);
    if truncated.len() < s.len() {
        format!("{truncated}...")
    } else {
        truncated.to_string()
    }
}

/// Byte-range slice of source text for a node, UTF-8 safe by construction
/// since tree-sitter byte offsets always fall on character boundaries for
/// well-formed parses; `safe_truncate_str` guards the pathological case of a
/// parse error node with an out-of-range byte offset.
pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    let start = node.start_byte().min(source.len());
    let end = node.end_byte().min(source.len());
    if start >= end {
        return "";
    }
    let slice = &source[start..end];
    safe_truncate_str(slice, slice.len())
}

/// Maximum recursion depth for AST traversal, guarding against stack
/// overflow on pathologically nested input.
pub const MAX_AST_DEPTH: usize = 500;

#[inline]
pub fn check_recursion_depth(depth: usize, node: Node, debug: bool) -> bool {
    if depth > MAX_AST_DEPTH {
        if debug {
            tracing::warn!(
                depth = MAX_AST_DEPTH,
                line = node.start_position().row + 1,
                column = node.start_position().column + 1,
                "maximum AST depth exceeded, skipping subtree"
            );
        }
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_truncate_avoids_emoji_panic() {
        let text = "Status: 🔍 Active";
        let result = safe_truncate_str(text, 10);
        assert_eq!(result, "Status: ");
        assert!(result.len() <= 10);
    }

    #[test]
    fn safe_truncate_multi_byte_chars() {
        let text = "Café is nice";
        assert_eq!(safe_truncate_str(text, 4), "Caf");
    }

    #[test]
    fn truncate_for_display_appends_ellipsis() {
        let text = "This is a very long string that needs truncation";
        assert_eq!(truncate_for_display(text, 10), "This is a ...");
        assert_eq!(truncate_for_display("Short", 10), "Short");
    }

    #[test]
    fn factory_builds_all_four_languages() {
        for lang in [Language::Rust, Language::Python, Language::JavaScript, Language::TypeScript] {
            assert!(ParserFactory::create(lang).is_ok());
        }
    }
}
