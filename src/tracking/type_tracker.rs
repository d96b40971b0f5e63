//! Per-file variable→type bindings, import table, and export set.
//!
//! A local scope may be layered over a file-level tracker: lookups fall
//! through to the parent when a name isn't bound locally. Binding history
//! is strictly position-sorted so `get_variable_type` can binary-search for
//! "the latest binding at or before this position".

use crate::model::{BindingConfidence, BindingSource, ImportEntry, TypeInfo};
use crate::types::Position;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct ImportedClass {
    source_module: String,
    imported_name: String,
}

/// Append-only, mutable tracker built during the per-file phase.
#[derive(Debug, Default)]
pub struct TypeTracker {
    bindings: HashMap<String, Vec<(Position, TypeInfo)>>,
    imported_classes: HashMap<String, ImportedClass>,
    exported: std::collections::HashSet<String>,
    parent: Option<Box<TypeTracker>>,
}

impl TypeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A child scope whose lookups fall through to `self` when not found
    /// locally.
    pub fn child_scope(self) -> Self {
        Self {
            bindings: HashMap::new(),
            imported_classes: HashMap::new(),
            exported: std::collections::HashSet::new(),
            parent: Some(Box::new(self)),
        }
    }

    pub fn set_variable_type(&mut self, name: &str, type_name: &str, position: Position, confidence: BindingConfidence, source: BindingSource) {
        let entry = self.bindings.entry(name.to_string()).or_default();
        entry.push((position, TypeInfo::new(name, type_name, confidence, source)));
        entry.sort_by_key(|(pos, _)| (pos.line, pos.column));
    }

    /// Returns the latest binding with position ≤ `at`, falling through to
    /// the parent scope if unbound locally. Without `at`, returns the
    /// latest binding overall.
    pub fn get_variable_type(&self, name: &str, at: Option<Position>) -> Option<&TypeInfo> {
        if let Some(history) = self.bindings.get(name) {
            let found = match at {
                Some(pos) => history
                    .iter()
                    .rev()
                    .find(|(p, _)| (p.line, p.column) <= (pos.line, pos.column))
                    .map(|(_, t)| t),
                None => history.last().map(|(_, t)| t),
            };
            if found.is_some() {
                return found;
            }
        }
        self.parent.as_ref().and_then(|p| p.get_variable_type(name, at))
    }

    pub fn set_imported_class(&mut self, local_name: &str, source_module: &str, imported_name: &str) {
        self.imported_classes.insert(
            local_name.to_string(),
            ImportedClass {
                source_module: source_module.to_string(),
                imported_name: imported_name.to_string(),
            },
        );
    }

    pub fn get_imported_class(&self, local_name: &str) -> Option<(&str, &str)> {
        if let Some(c) = self.imported_classes.get(local_name) {
            return Some((c.source_module.as_str(), c.imported_name.as_str()));
        }
        self.parent.as_ref().and_then(|p| p.get_imported_class(local_name))
    }

    pub fn mark_as_exported(&mut self, name: &str) {
        self.exported.insert(name.to_string());
    }

    pub fn is_exported(&self, name: &str) -> bool {
        self.exported.contains(name) || self.parent.as_ref().is_some_and(|p| p.is_exported(name))
    }

    pub fn exported_names(&self) -> impl Iterator<Item = &str> {
        self.exported.iter().map(|s| s.as_str())
    }

    /// An immutable snapshot safe to share across the rayon pool's tasks
    /// once per-file analysis of this file is complete.
    pub fn freeze(self) -> FrozenTypeTracker {
        FrozenTypeTracker { inner: self }
    }
}

/// Read-only view of a `TypeTracker`, handed to the receiver-type resolver.
#[derive(Debug)]
pub struct FrozenTypeTracker {
    inner: TypeTracker,
}

impl FrozenTypeTracker {
    pub fn get_variable_type(&self, name: &str, at: Option<Position>) -> Option<&TypeInfo> {
        self.inner.get_variable_type(name, at)
    }

    pub fn get_imported_class(&self, name: &str) -> Option<(&str, &str)> {
        self.inner.get_imported_class(name)
    }

    pub fn is_exported(&self, name: &str) -> bool {
        self.inner.is_exported(name)
    }
}

/// Builds the variable-type bindings for one file: explicit
/// annotations and constructor-call evidence only; inferred propagation
/// (e.g. through return types) is left to the enricher.
pub fn build_bindings(source: &str, language: crate::parsing::Language, root: tree_sitter::Node) -> TypeTracker {
    use crate::parsing::Language;
    let mut tracker = TypeTracker::new();

    walk(root, &mut |node| {
        let pos = Position::new(node.start_position().row as u32, node.start_position().column as u32);
        match language {
            Language::JavaScript | Language::TypeScript => {
                if node.kind() != "variable_declarator" {
                    return;
                }
                let Some(name_node) = node.child_by_field_name("name") else { return };
                let name = crate::parsing::node_text(&name_node, source);
                if let Some(type_node) = node.child_by_field_name("type") {
                    let type_text = crate::parsing::node_text(&type_node, source).trim_start_matches(':').trim();
                    tracker.set_variable_type(name, type_text, pos, BindingConfidence::Explicit, BindingSource::Annotation);
                } else if let Some(value_node) = node.child_by_field_name("value") {
                    if value_node.kind() == "new_expression" {
                        if let Some(ctor) = value_node.child_by_field_name("constructor") {
                            let type_text = crate::parsing::node_text(&ctor, source);
                            tracker.set_variable_type(name, type_text, pos, BindingConfidence::Explicit, BindingSource::Constructor);
                        }
                    }
                }
            }
            Language::Python => {
                if node.kind() != "assignment" {
                    return;
                }
                let Some(left) = node.child_by_field_name("left") else { return };
                if left.kind() != "identifier" {
                    return;
                }
                let name = crate::parsing::node_text(&left, source);
                if let Some(type_node) = node.child_by_field_name("type") {
                    let type_text = crate::parsing::node_text(&type_node, source);
                    tracker.set_variable_type(name, type_text, pos, BindingConfidence::Explicit, BindingSource::Annotation);
                } else if let Some(right) = node.child_by_field_name("right") {
                    if right.kind() == "call" {
                        if let Some(callee) = right.child_by_field_name("function") {
                            let callee_text = crate::parsing::node_text(&callee, source);
                            if callee_text.chars().next().is_some_and(|c| c.is_uppercase()) {
                                tracker.set_variable_type(name, callee_text, pos, BindingConfidence::Explicit, BindingSource::Constructor);
                            }
                        }
                    }
                }
            }
            Language::Rust => {
                if node.kind() != "let_declaration" {
                    return;
                }
                let Some(pattern) = node.child_by_field_name("pattern") else { return };
                if pattern.kind() != "identifier" {
                    return;
                }
                let name = crate::parsing::node_text(&pattern, source);
                if let Some(type_node) = node.child_by_field_name("type") {
                    let type_text = crate::parsing::node_text(&type_node, source);
                    tracker.set_variable_type(name, type_text, pos, BindingConfidence::Explicit, BindingSource::Annotation);
                } else if let Some(value) = node.child_by_field_name("value") {
                    if value.kind() == "call_expression" {
                        if let Some(callee) = value.child_by_field_name("function") {
                            if callee.kind() == "scoped_identifier" {
                                let path_text = crate::parsing::node_text(&callee, source);
                                if let Some(stripped) = path_text.strip_suffix("::new") {
                                    tracker.set_variable_type(name, stripped, pos, BindingConfidence::Explicit, BindingSource::Constructor);
                                }
                            }
                        }
                    }
                }
            }
        }
    });

    tracker
}

/// Builds the module-level import table for one file: records what each
/// file imports and under what local alias. Kept separate from
/// variable-binding extraction since import syntax is entirely
/// language-specific.
pub fn extract_imports(source: &str, language: crate::parsing::Language, root: tree_sitter::Node) -> Vec<ImportEntry> {
    match language {
        crate::parsing::Language::JavaScript | crate::parsing::Language::TypeScript => {
            extract_js_imports(source, root)
        }
        crate::parsing::Language::Python => extract_python_imports(source, root),
        crate::parsing::Language::Rust => extract_rust_imports(source, root),
    }
}

fn extract_js_imports(source: &str, root: tree_sitter::Node) -> Vec<ImportEntry> {
    let mut out = Vec::new();
    walk(root, &mut |node| {
        if node.kind() != "import_statement" {
            return;
        }
        let Some(source_node) = node.child_by_field_name("source") else { return };
        let source_module = crate::parsing::node_text(&source_node, source).trim_matches(['"', '\'']).to_string();

        let mut cursor = node.walk();
        for clause in node.named_children(&mut cursor) {
            match clause.kind() {
                "import_clause" => {
                    let mut clause_cursor = clause.walk();
                    for child in clause.named_children(&mut clause_cursor) {
                        match child.kind() {
                            "identifier" => out.push(ImportEntry {
                                local_name: crate::parsing::node_text(&child, source).to_string(),
                                imported_name: "default".to_string(),
                                source_module: source_module.clone(),
                                is_default_import: true,
                                is_namespace_import: false,
                            }),
                            "namespace_import" => {
                                if let Some(name) = child.named_child(0) {
                                    out.push(ImportEntry {
                                        local_name: crate::parsing::node_text(&name, source).to_string(),
                                        imported_name: "*".to_string(),
                                        source_module: source_module.clone(),
                                        is_default_import: false,
                                        is_namespace_import: true,
                                    });
                                }
                            }
                            "named_imports" => {
                                let mut named_cursor = child.walk();
                                for spec in child.named_children(&mut named_cursor) {
                                    if spec.kind() != "import_specifier" {
                                        continue;
                                    }
                                    let name_node = spec.child_by_field_name("name");
                                    let alias_node = spec.child_by_field_name("alias");
                                    if let Some(name_node) = name_node {
                                        let imported = crate::parsing::node_text(&name_node, source).to_string();
                                        let local = alias_node
                                            .map(|a| crate::parsing::node_text(&a, source).to_string())
                                            .unwrap_or_else(|| imported.clone());
                                        out.push(ImportEntry {
                                            local_name: local,
                                            imported_name: imported,
                                            source_module: source_module.clone(),
                                            is_default_import: false,
                                            is_namespace_import: false,
                                        });
                                    }
                                }
                            }
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
        }
    });
    out
}

fn extract_python_imports(source: &str, root: tree_sitter::Node) -> Vec<ImportEntry> {
    let mut out = Vec::new();
    walk(root, &mut |node| match node.kind() {
        "import_from_statement" => {
            let Some(module_node) = node.child_by_field_name("module_name") else { return };
            let source_module = crate::parsing::node_text(&module_node, source).to_string();
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                match child.kind() {
                    "dotted_name" if child != module_node => {
                        let name = crate::parsing::node_text(&child, source).to_string();
                        out.push(ImportEntry {
                            local_name: name.clone(),
                            imported_name: name,
                            source_module: source_module.clone(),
                            is_default_import: false,
                            is_namespace_import: false,
                        });
                    }
                    "aliased_import" => {
                        let Some(name_node) = child.child_by_field_name("name") else { continue };
                        let Some(alias_node) = child.child_by_field_name("alias") else { continue };
                        out.push(ImportEntry {
                            local_name: crate::parsing::node_text(&alias_node, source).to_string(),
                            imported_name: crate::parsing::node_text(&name_node, source).to_string(),
                            source_module: source_module.clone(),
                            is_default_import: false,
                            is_namespace_import: false,
                        });
                    }
                    _ => {}
                }
            }
        }
        "import_statement" => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                if child.kind() == "dotted_name" {
                    let name = crate::parsing::node_text(&child, source).to_string();
                    out.push(ImportEntry {
                        local_name: name.clone(),
                        imported_name: name.clone(),
                        source_module: name,
                        is_default_import: false,
                        is_namespace_import: true,
                    });
                }
            }
        }
        _ => {}
    });
    out
}

fn extract_rust_imports(source: &str, root: tree_sitter::Node) -> Vec<ImportEntry> {
    let mut out = Vec::new();
    walk(root, &mut |node| {
        if node.kind() != "use_declaration" {
            return;
        }
        let Some(tree) = node.named_child(0) else { return };
        collect_use_tree(source, tree, String::new(), &mut out);
    });
    out
}

fn collect_use_tree(source: &str, node: tree_sitter::Node, prefix: String, out: &mut Vec<ImportEntry>) {
    match node.kind() {
        "scoped_identifier" | "identifier" => {
            let text = crate::parsing::node_text(&node, source);
            let full = if prefix.is_empty() { text.to_string() } else { format!("{prefix}::{text}") };
            let local = text.rsplit("::").next().unwrap_or(text).to_string();
            out.push(ImportEntry {
                local_name: local.clone(),
                imported_name: local,
                source_module: full,
                is_default_import: false,
                is_namespace_import: false,
            });
        }
        "use_as_clause" => {
            let Some(path) = node.child_by_field_name("path") else { return };
            let Some(alias) = node.child_by_field_name("alias") else { return };
            let path_text = crate::parsing::node_text(&path, source);
            let full = if prefix.is_empty() { path_text.to_string() } else { format!("{prefix}::{path_text}") };
            out.push(ImportEntry {
                local_name: crate::parsing::node_text(&alias, source).to_string(),
                imported_name: path_text.rsplit("::").next().unwrap_or(path_text).to_string(),
                source_module: full,
                is_default_import: false,
                is_namespace_import: false,
            });
        }
        "use_wildcard" => {
            if let Some(path) = node.named_child(0) {
                let path_text = crate::parsing::node_text(&path, source);
                let full = if prefix.is_empty() { path_text.to_string() } else { format!("{prefix}::{path_text}") };
                out.push(ImportEntry {
                    local_name: "*".to_string(),
                    imported_name: "*".to_string(),
                    source_module: full,
                    is_default_import: false,
                    is_namespace_import: true,
                });
            }
        }
        "use_list" => {
            let new_prefix = prefix;
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                collect_use_tree(source, child, new_prefix.clone(), out);
            }
        }
        "scoped_use_list" => {
            let Some(path) = node.child_by_field_name("path") else { return };
            let path_text = crate::parsing::node_text(&path, source);
            let new_prefix = if prefix.is_empty() { path_text.to_string() } else { format!("{prefix}::{path_text}") };
            if let Some(list) = node.child_by_field_name("list") {
                collect_use_tree(source, list, new_prefix, out);
            }
        }
        _ => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                collect_use_tree(source, child, prefix.clone(), out);
            }
        }
    }
}

fn walk<'a>(node: tree_sitter::Node<'a>, visit: &mut impl FnMut(tree_sitter::Node<'a>)) {
    visit(node);
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk(child, visit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_binding_at_or_before_position_wins() {
        let mut tracker = TypeTracker::new();
        tracker.set_variable_type("x", "Foo", Position::new(1, 0), BindingConfidence::Explicit, BindingSource::Annotation);
        tracker.set_variable_type("x", "Bar", Position::new(5, 0), BindingConfidence::Inferred, BindingSource::Constructor);

        let at_line_3 = tracker.get_variable_type("x", Some(Position::new(3, 0))).unwrap();
        assert_eq!(at_line_3.resolved_type, "Foo");

        let at_line_10 = tracker.get_variable_type("x", Some(Position::new(10, 0))).unwrap();
        assert_eq!(at_line_10.resolved_type, "Bar");
    }

    #[test]
    fn child_scope_falls_through_to_parent() {
        let mut parent = TypeTracker::new();
        parent.set_variable_type("x", "Foo", Position::new(0, 0), BindingConfidence::Explicit, BindingSource::Annotation);
        let child = parent.child_scope();
        assert_eq!(child.get_variable_type("x", None).unwrap().resolved_type, "Foo");
    }

    #[test]
    fn extracts_renamed_js_named_import() {
        let source = "import { UserService as US } from './services/user';";
        let tree = crate::parsing::parse_source(source, crate::parsing::Language::JavaScript).unwrap();
        let imports = extract_imports(source, crate::parsing::Language::JavaScript, tree.root_node());
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].local_name, "US");
        assert_eq!(imports[0].imported_name, "UserService");
        assert_eq!(imports[0].source_module, "./services/user");
    }

    #[test]
    fn extracts_rust_use_list() {
        let source = "use std::collections::{HashMap, HashSet as Set};";
        let tree = crate::parsing::parse_source(source, crate::parsing::Language::Rust).unwrap();
        let imports = extract_imports(source, crate::parsing::Language::Rust, tree.root_node());
        assert!(imports.iter().any(|i| i.local_name == "HashMap"));
        assert!(imports.iter().any(|i| i.local_name == "Set" && i.imported_name == "HashSet"));
    }
}
