//! Generic class/struct/interface/trait extractor plus dispatch to
//! the four per-language bespoke enhancers.

use crate::config::AnalyzerConfig;
use crate::error::Diagnostic;
use crate::model::{ClassDefinition, ClassFlags, MethodDefinition, MethodFlags, Parameter, PropertyDefinition, PropertyFlags};
use crate::parsing::language_config::LanguageConfig;
use crate::parsing::{check_recursion_depth, node_text, Language};
use crate::types::{Location, Position};
use std::path::Path;
use tree_sitter::Node;

pub struct ClassDetector<'a> {
    source: &'a str,
    file: &'a Path,
    language: Language,
    cfg: &'static LanguageConfig,
    debug: bool,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> ClassDetector<'a> {
    pub fn new(source: &'a str, file: &'a Path, language: Language, config: &AnalyzerConfig) -> Self {
        Self {
            source,
            file,
            language,
            cfg: LanguageConfig::for_language(language),
            debug: config.logging.debug,
            diagnostics: Vec::new(),
        }
    }

    /// Runs the detector over the whole file, returning classes in the
    /// order their defining node appears in the source.
    pub fn detect(mut self, tree: &tree_sitter::Tree) -> (Vec<ClassDefinition>, Vec<Diagnostic>) {
        if self.language == Language::Rust {
            let classes = crate::parsing::rust_lang::detect_classes(self.source, self.file, tree.root_node());
            return (classes, self.diagnostics);
        }

        let mut classes = Vec::new();
        self.walk(tree.root_node(), 0, &mut classes);
        (classes, self.diagnostics)
    }

    fn walk(&mut self, node: Node, depth: usize, out: &mut Vec<ClassDefinition>) {
        if !check_recursion_depth(depth, node, self.debug) {
            return;
        }

        if self.cfg.class_nodes.node_types.contains(&node.kind()) && !self.is_nested_duplicate(node) {
            if let Some(class) = self.extract_class(node) {
                out.push(class);
            }
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.walk(child, depth + 1, out);
        }
    }

    /// True when an ancestor class-body member chain leads straight back
    /// to another class node without crossing a function boundary — the
    /// only legitimate way to nest a *new*, independent class is inside a
    /// method body.
    fn is_nested_duplicate(&self, node: Node) -> bool {
        let mut current = node.parent();
        while let Some(p) = current {
            if self.cfg.class_nodes.node_types.contains(&p.kind()) {
                return true;
            }
            if p.kind().contains("function") || p.kind().contains("method") {
                return false;
            }
            current = p.parent();
        }
        false
    }

    pub(crate) fn location(&self, node: Node) -> Location {
        Location::new(
            self.file.to_path_buf(),
            Position::new(node.start_position().row as u32, node.start_position().column as u32),
            Position::new(node.end_position().row as u32, node.end_position().column as u32),
        )
    }

    fn resolve_class_name(&self, node: Node) -> String {
        if let Some(name_node) = node.child_by_field_name(self.cfg.class_nodes.name_field) {
            return node_text(&name_node, self.source).to_string();
        }

        // JS class-expression naming heuristic: fall back to the enclosing
        // `variable_declarator`/`assignment_expression`.
        if let Some(parent) = node.parent() {
            match parent.kind() {
                "variable_declarator" => {
                    if let Some(name) = parent.child_by_field_name("name") {
                        return node_text(&name, self.source).to_string();
                    }
                }
                "assignment_expression" => {
                    if let Some(left) = parent.child_by_field_name("left") {
                        return node_text(&left, self.source).to_string();
                    }
                }
                _ => {}
            }
        }

        "AnonymousClass".to_string()
    }

    fn extract_heritage(&self, node: Node) -> (Vec<String>, Vec<String>) {
        let mut extends = Vec::new();
        let mut implements = Vec::new();

        if let Some(field) = self.cfg.class_nodes.superclass_field {
            if let Some(super_node) = node.child_by_field_name(field) {
                extends.extend(self.collect_identifiers(super_node));
            }
        }

        if let Some(field) = self.cfg.class_nodes.heritage_field {
            if let Some(heritage) = node.child_by_field_name(field).or_else(|| find_child_of_kind(node, field)) {
                let mut cursor = heritage.walk();
                for child in heritage.children(&mut cursor) {
                    match child.kind() {
                        "extends_clause" | "extends" => extends.extend(self.collect_identifiers(child)),
                        "implements_clause" => implements.extend(self.collect_identifiers(child)),
                        "identifier" | "member_expression" | "type_identifier" | "generic_type" => {
                            extends.push(node_text(&child, self.source).to_string())
                        }
                        _ => {}
                    }
                }
            }
        }

        (extends, implements)
    }

    pub(crate) fn collect_identifiers(&self, node: Node) -> Vec<String> {
        let mut names = Vec::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "identifier" | "type_identifier" | "generic_type" | "member_expression" | "dotted_name" => {
                    names.push(node_text(&child, self.source).to_string());
                }
                "keyword_argument" => {} // e.g. Python `metaclass=...`, not a base class
                _ => names.extend(self.collect_identifiers(child)),
            }
        }
        if names.is_empty() && matches!(node.kind(), "identifier" | "type_identifier") {
            names.push(node_text(&node, self.source).to_string());
        }
        names
    }

    fn extract_class(&mut self, node: Node) -> Option<ClassDefinition> {
        let name = self.resolve_class_name(node);
        let (extends, implements) = self.extract_heritage(node);

        let mut class = ClassDefinition::new(name, self.location(node), self.file.to_path_buf(), self.language);
        class.extends = extends;
        class.implements = implements;

        if node.kind().contains("interface") {
            class.flags |= ClassFlags::INTERFACE;
        }
        if node.kind().contains("abstract") {
            class.flags |= ClassFlags::ABSTRACT;
        }

        if let Some(body) = node.child_by_field_name(self.cfg.class_nodes.body_field) {
            self.extract_members(body, &mut class);
        }

        match self.language {
            Language::JavaScript => crate::parsing::javascript_lang::enhance_class(self, node, &mut class),
            Language::TypeScript => crate::parsing::typescript_lang::enhance_class(self, node, &mut class),
            Language::Python => crate::parsing::python_lang::enhance_class(self, node, &mut class),
            Language::Rust => unreachable!("Rust classes never reach the generic extractor"),
        }

        Some(class)
    }

    fn extract_members(&mut self, body: Node, class: &mut ClassDefinition) {
        let mut cursor = body.walk();
        for member in body.children(&mut cursor) {
            if self.cfg.method_node_types.contains(&member.kind()) {
                if let Some(method) = self.extract_method(member) {
                    class.methods.push(method);
                }
            } else if self.cfg.property_node_types.contains(&member.kind()) {
                if let Some(prop) = self.extract_property(member) {
                    class.properties.push(prop);
                }
            }
        }
    }

    fn extract_method(&mut self, node: Node) -> Option<MethodDefinition> {
        let name_node = node.child_by_field_name("name")?;
        let name = node_text(&name_node, self.source).to_string();
        let mut method = MethodDefinition::new(name.clone(), self.location(node));

        if name == self.cfg.constructor_name {
            method.flags |= MethodFlags::CONSTRUCTOR;
        }

        // Modifiers detected via a linear scan of preceding children
        //.
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match node_text(&child, self.source) {
                "static" => method.flags |= MethodFlags::STATIC,
                "async" => method.flags |= MethodFlags::ASYNC,
                "abstract" => method.flags |= MethodFlags::ABSTRACT,
                _ => {}
            }
        }

        if let Some(prefix) = self.cfg.private_prefixes.iter().find(|p| name.starts_with(**p)) {
            if !name.starts_with(&format!("{prefix}{prefix}")) {
                method.flags |= MethodFlags::PRIVATE;
            }
        }
        if self.cfg.protected_prefixes.iter().any(|p| name.starts_with(*p))
            && !self.cfg.private_prefixes.iter().any(|p| name.starts_with(*p))
        {
            method.flags |= MethodFlags::PROTECTED;
        }

        if let Some(params_node) = node.child_by_field_name("parameters") {
            method.parameters = self.extract_parameters(params_node);
        }

        if let Some(return_type) = node.child_by_field_name("return_type") {
            method.return_type = Some(node_text(&return_type, self.source).trim_start_matches(':').trim().to_string());
        }

        if self.language == Language::Python {
            crate::parsing::python_lang::enhance_method_decorators(self, node, &mut method);
        }

        Some(method)
    }

    pub(crate) fn extract_parameters(&self, params_node: Node) -> Vec<Parameter> {
        let mut out = Vec::new();
        let mut cursor = params_node.walk();
        for child in params_node.children(&mut cursor) {
            let kind = child.kind();
            let is_regular = self.cfg.parameters.regular.contains(&kind);
            let is_optional = self.cfg.parameters.optional.contains(&kind);
            let is_rest = self.cfg.parameters.rest.contains(&kind);
            let is_typed = self.cfg.parameters.typed.contains(&kind);

            if !(is_regular || is_optional || is_rest || is_typed) {
                continue;
            }

            let name_node = child
                .child_by_field_name("pattern")
                .or_else(|| child.child_by_field_name("name"))
                .unwrap_or(child);
            let name = node_text(&name_node, self.source).to_string();

            if name == "self" || name == "cls" {
                continue;
            }

            let mut param = Parameter::new(name);
            param.is_optional = is_optional;
            param.is_rest = is_rest;

            if let Some(type_node) = child.child_by_field_name("type") {
                param.type_annotation = Some(node_text(&type_node, self.source).to_string());
            }
            if let Some(default_node) = child.child_by_field_name("value").or_else(|| child.child_by_field_name("default_value")) {
                param.default_value = Some(node_text(&default_node, self.source).to_string());
            }

            out.push(param);
        }
        out
    }

    fn extract_property(&self, node: Node) -> Option<PropertyDefinition> {
        let name_node = node
            .child_by_field_name("name")
            .or_else(|| node.child_by_field_name("property"))?;
        let name = node_text(&name_node, self.source).to_string();

        let mut flags = PropertyFlags::empty();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if node_text(&child, self.source) == "static" {
                flags |= PropertyFlags::STATIC;
            }
            if node_text(&child, self.source) == "readonly" {
                flags |= PropertyFlags::READONLY;
            }
        }
        if let Some(prefix) = self.cfg.private_prefixes.iter().find(|p| name.starts_with(**p)) {
            if !name.starts_with(&format!("{prefix}{prefix}")) {
                flags |= PropertyFlags::PRIVATE;
            }
        }

        let type_annotation = node
            .child_by_field_name("type")
            .map(|t| node_text(&t, self.source).trim_start_matches(':').trim().to_string());
        let initial_value = node
            .child_by_field_name("value")
            .map(|v| node_text(&v, self.source).to_string());

        Some(PropertyDefinition {
            name,
            location: self.location(node),
            type_annotation,
            initial_value,
            flags,
        })
    }

    pub(crate) fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn source(&self) -> &'a str {
        self.source
    }
}

fn find_child_of_kind<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).find(|c| c.kind() == kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfig;

    fn detect(source: &str, language: Language) -> Vec<ClassDefinition> {
        let tree = crate::parsing::parse_source(source, language).unwrap();
        let cfg = AnalyzerConfig::default();
        let detector = ClassDetector::new(source, Path::new("test"), language, &cfg);
        detector.detect(&tree).0
    }

    #[test]
    fn detects_plain_js_class() {
        let classes = detect("class Foo { bar() {} }", Language::JavaScript);
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].name, "Foo");
        assert_eq!(classes[0].methods.len(), 1);
        assert_eq!(classes[0].methods[0].name, "bar");
    }

    #[test]
    fn detects_js_class_extends() {
        let classes = detect("class Dog extends Animal { speak() {} }", Language::JavaScript);
        assert_eq!(classes[0].extends, vec!["Animal"]);
    }

    #[test]
    fn detects_python_class_with_bases() {
        let classes = detect("class Dog(Animal):\n    def speak(self):\n        pass\n", Language::Python);
        assert_eq!(classes[0].name, "Dog");
        assert_eq!(classes[0].extends, vec!["Animal"]);
        assert_eq!(classes[0].methods[0].name, "speak");
    }

    #[test]
    fn empty_class_has_empty_member_lists() {
        let classes = detect("class Empty {}", Language::JavaScript);
        assert!(classes[0].methods.is_empty());
        assert!(classes[0].properties.is_empty());
    }
}
