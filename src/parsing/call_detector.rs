//! Generic method/function/constructor call extractor plus dispatch
//! to the four per-language bespoke detectors and enhancers.

use crate::config::AnalyzerConfig;
use crate::error::Diagnostic;
use crate::model::{
    CallInfo, ConstructorCallInfo, FunctionCallInfo, MethodCallFlags, MethodCallInfo,
};
use crate::parsing::language_config::LanguageConfig;
use crate::parsing::{check_recursion_depth, node_text, Language};
use crate::tracking::{resolve_receiver_type, TypeTracker};
use crate::types::{Location, Position};
use std::path::Path;
use tree_sitter::Node;

pub struct CallDetector<'a> {
    source: &'a str,
    file: &'a Path,
    language: Language,
    cfg: &'static LanguageConfig,
    debug: bool,
    tracker: TypeTracker,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> CallDetector<'a> {
    pub fn new(source: &'a str, file: &'a Path, language: Language, config: &AnalyzerConfig) -> Self {
        Self {
            source,
            file,
            language,
            cfg: LanguageConfig::for_language(language),
            debug: config.logging.debug,
            tracker: TypeTracker::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Runs the detector over the whole file, returning calls in source
    /// order.
    pub fn detect(mut self, tree: &tree_sitter::Tree) -> (Vec<CallInfo>, Vec<Diagnostic>) {
        self.tracker = crate::tracking::type_tracker::build_bindings(self.source, self.language, tree.root_node());

        let mut out = Vec::new();
        let mut class_stack: Vec<String> = Vec::new();
        let mut caller_stack: Vec<String> = Vec::new();
        self.walk(tree.root_node(), 0, &mut class_stack, &mut caller_stack, &mut out);
        (out, self.diagnostics)
    }

    fn walk(
        &mut self,
        node: Node,
        depth: usize,
        class_stack: &mut Vec<String>,
        caller_stack: &mut Vec<String>,
        out: &mut Vec<CallInfo>,
    ) {
        if !check_recursion_depth(depth, node, self.debug) {
            return;
        }

        let pushed_class = self.enter_class(node, class_stack);
        let pushed_caller = self.enter_function(node, class_stack, caller_stack);

        if self.is_call_node(node) {
            let caller_name = caller_stack.last().cloned().unwrap_or_else(|| "<module>".to_string());
            let self_type = class_stack.last().map(|s| s.as_str());
            if let Some(call) = self.handle_call(node, &caller_name, self_type) {
                out.push(call);
            }
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.walk(child, depth + 1, class_stack, caller_stack, out);
        }

        if pushed_caller {
            caller_stack.pop();
        }
        if pushed_class {
            class_stack.pop();
        }
    }

    fn enter_class(&self, node: Node, class_stack: &mut Vec<String>) -> bool {
        if self.language == Language::Rust {
            if node.kind() == "impl_item" {
                if let Some(type_node) = node.child_by_field_name("type") {
                    class_stack.push(node_text(&type_node, self.source).to_string());
                    return true;
                }
            }
            return false;
        }
        if !self.cfg.class_nodes.node_types.contains(&node.kind()) {
            return false;
        }
        let name = node
            .child_by_field_name(self.cfg.class_nodes.name_field)
            .map(|n| node_text(&n, self.source).to_string())
            .unwrap_or_else(|| "AnonymousClass".to_string());
        class_stack.push(name);
        true
    }

    fn function_like_kinds(&self) -> &'static [&'static str] {
        match self.language {
            Language::JavaScript | Language::TypeScript => {
                &["function_declaration", "function_expression", "arrow_function", "generator_function_declaration", "method_definition"]
            }
            Language::Python => &["function_definition"],
            Language::Rust => &["function_item"],
        }
    }

    fn enter_function(&self, node: Node, class_stack: &[String], caller_stack: &mut Vec<String>) -> bool {
        if !self.function_like_kinds().contains(&node.kind()) {
            return false;
        }

        let name = node
            .child_by_field_name("name")
            .map(|n| node_text(&n, self.source).to_string())
            .unwrap_or_else(|| self.anonymous_function_name(node));

        let qualified = match (self.language, class_stack.last()) {
            (Language::Rust, Some(ty)) => format!("{ty}::{name}"),
            (_, Some(class)) => format!("{class}.{name}"),
            (_, None) => name,
        };
        caller_stack.push(qualified);
        true
    }

    /// JS/TS arrow functions and expressions gain a name from the enclosing
    /// `variable_declarator`/assignment, else stay anonymous.
    fn anonymous_function_name(&self, node: Node) -> String {
        if let Some(parent) = node.parent() {
            match parent.kind() {
                "variable_declarator" => {
                    if let Some(name) = parent.child_by_field_name("name") {
                        return node_text(&name, self.source).to_string();
                    }
                }
                "pair" | "property_identifier" => {
                    if let Some(key) = parent.child_by_field_name("key") {
                        return node_text(&key, self.source).to_string();
                    }
                }
                _ => {}
            }
        }
        "<anonymous>".to_string()
    }

    fn is_call_node(&self, node: Node) -> bool {
        self.cfg.call_node_types.contains(&node.kind())
            || ((self.language == Language::JavaScript || self.language == Language::TypeScript) && node.kind() == "new_expression")
    }

    fn handle_call(&mut self, call_node: Node, caller_name: &str, self_type: Option<&str>) -> Option<CallInfo> {
        if call_node.kind() == "new_expression" {
            return Some(self.build_constructor_call_js(call_node, caller_name));
        }

        let callee = call_node.child_by_field_name("function")?;

        if self.language == Language::Rust {
            if let Some(ctor) = self.try_rust_constructor(call_node, callee, caller_name) {
                return Some(ctor);
            }
        }
        if self.language == Language::Python {
            if let Some(ctor) = self.try_python_constructor(call_node, callee, caller_name) {
                return Some(ctor);
            }
        }

        if self.is_member_access(callee) {
            if let Some(bespoke) = self.try_bespoke_call(call_node, callee, caller_name) {
                return Some(bespoke);
            }
            return Some(self.build_generic_method_call(call_node, callee, caller_name, self_type));
        }

        Some(CallInfo::Function(FunctionCallInfo {
            caller_name: caller_name.to_string(),
            function_name: node_text(&callee, self.source).to_string(),
            location: self.location(call_node),
            file: self.file.to_path_buf(),
            arguments_count: self.count_arguments(call_node),
            is_chained_call: self.cfg.call_node_types.contains(&callee.kind()),
        }))
    }

    fn is_member_access(&self, callee: Node) -> bool {
        if self.language == Language::Rust {
            matches!(callee.kind(), "field_expression" | "scoped_identifier" | "generic_function")
        } else {
            self.cfg.member_access.node_types.contains(&callee.kind())
        }
    }

    /// Returns (object_node, property_node) for a member-access callee,
    /// special-casing Rust's three distinct node shapes — the shared
    /// configuration table doesn't extend to field-name uniformity within
    /// a single language's own alternates.
    fn member_access_parts<'b>(&self, callee: Node<'b>) -> Option<(Node<'b>, Node<'b>)> {
        if self.language == Language::Rust {
            return match callee.kind() {
                "field_expression" => Some((callee.child_by_field_name("value")?, callee.child_by_field_name("field")?)),
                "scoped_identifier" => Some((callee.child_by_field_name("path")?, callee.child_by_field_name("name")?)),
                "generic_function" => self.member_access_parts(callee.child_by_field_name("function")?),
                _ => None,
            };
        }
        Some((
            callee.child_by_field_name(self.cfg.member_access.object_field)?,
            callee.child_by_field_name(self.cfg.member_access.property_field)?,
        ))
    }

    fn try_bespoke_call(&self, call_node: Node, callee: Node, caller_name: &str) -> Option<CallInfo> {
        match self.language {
            Language::JavaScript | Language::TypeScript => {
                crate::parsing::javascript_lang::detect_bespoke_call(self.source, self.file, caller_name, call_node, callee)
            }
            Language::Python => crate::parsing::python_lang::detect_super_call(self.source, self.file, caller_name, call_node, callee),
            Language::Rust => None,
        }
    }

    fn build_generic_method_call(&mut self, call_node: Node, callee: Node, caller_name: &str, self_type: Option<&str>) -> CallInfo {
        let (object, property) = self
            .member_access_parts(callee)
            .unwrap_or((callee, callee));
        let method_name = node_text(&property, self.source).to_string();
        let receiver_text = node_text(&object, self.source).to_string();

        let is_chained = self.cfg.call_node_types.contains(&object.kind()) || object.kind() == "new_expression";
        let is_static = self.cfg.static_receiver_literals.contains(&receiver_text.as_str())
            || (self.cfg.uppercase_is_static && receiver_text.chars().next().is_some_and(|c| c.is_uppercase()))
            || callee.kind() == "scoped_identifier";

        let at = Position::new(call_node.start_position().row as u32, call_node.start_position().column as u32);
        let mut receiver_type = resolve_receiver_type(object, &self.tracker, self.source, self.language, at);
        if receiver_type.is_none() {
            let is_self_keyword = matches!(receiver_text.as_str(), "self" | "this" | "cls");
            if is_self_keyword {
                receiver_type = self_type.map(|s| s.to_string());
            }
        }

        let is_classmethod = self.language == Language::Python && receiver_text == "cls";
        let mut info = MethodCallInfo {
            caller_name: caller_name.to_string(),
            method_name,
            receiver: receiver_text,
            receiver_type,
            location: self.location(call_node),
            file: self.file.to_path_buf(),
            arguments_count: self.count_arguments(call_node),
            flags: MethodCallFlags {
                is_static_method: is_static,
                is_chained_call: is_chained,
                is_classmethod,
                ..Default::default()
            },
            type_arguments: None,
            turbofish_types: None,
            trait_impl: None,
            impl_type: None,
        };

        match self.language {
            Language::TypeScript => {
                info.type_arguments = crate::parsing::typescript_lang::type_arguments(call_node, self.source);
            }
            Language::Python => {
                info.flags.is_magic_method = crate::parsing::python_lang::is_magic_method(&info.method_name);
            }
            Language::Rust => {
                crate::parsing::rust_lang::enhance_call(self.source, call_node, &mut info);
                crate::parsing::rust_lang::detect_ref_receiver(self.source, object, &mut info);
            }
            Language::JavaScript => {}
        }

        CallInfo::Method(info)
    }

    fn try_rust_constructor(&mut self, call_node: Node, callee: Node, caller_name: &str) -> Option<CallInfo> {
        if callee.kind() != "scoped_identifier" {
            return None;
        }
        let path = callee.child_by_field_name("path")?;
        if path.kind() == "bracketed_type" {
            return None; // UFCS, not a constructor convention.
        }
        let name = callee.child_by_field_name("name")?;
        if node_text(&name, self.source) != self.cfg.constructor_name {
            return None;
        }
        let class_name = node_text(&path, self.source).to_string();
        Some(CallInfo::Constructor(ConstructorCallInfo {
            caller_name: caller_name.to_string(),
            class_name,
            location: self.location(call_node),
            file: self.file.to_path_buf(),
            arguments_count: self.count_arguments(call_node),
            type_arguments: None,
        }))
    }

    fn try_python_constructor(&mut self, call_node: Node, callee: Node, caller_name: &str) -> Option<CallInfo> {
        if callee.kind() != "identifier" {
            return None;
        }
        let name = node_text(&callee, self.source);
        if !name.chars().next().is_some_and(|c| c.is_uppercase()) {
            return None;
        }
        Some(CallInfo::Constructor(ConstructorCallInfo {
            caller_name: caller_name.to_string(),
            class_name: name.to_string(),
            location: self.location(call_node),
            file: self.file.to_path_buf(),
            arguments_count: self.count_arguments(call_node),
            type_arguments: None,
        }))
    }

    fn build_constructor_call_js(&mut self, call_node: Node, caller_name: &str) -> CallInfo {
        let class_name = call_node
            .child_by_field_name("constructor")
            .map(|n| node_text(&n, self.source).to_string())
            .unwrap_or_default();
        let type_arguments = crate::parsing::typescript_lang::type_arguments(call_node, self.source);
        CallInfo::Constructor(ConstructorCallInfo {
            caller_name: caller_name.to_string(),
            class_name,
            location: self.location(call_node),
            file: self.file.to_path_buf(),
            arguments_count: self.count_arguments(call_node),
            type_arguments,
        })
    }

    /// "arguments_count ≥ 0 ... excludes leading self/cls actually passed".
    fn count_arguments(&self, call_node: Node) -> usize {
        let Some(args) = call_node.child_by_field_name("arguments") else {
            return 0;
        };
        let mut cursor = args.walk();
        let mut named: Vec<Node> = args
            .named_children(&mut cursor)
            .filter(|c| !self.cfg.argument_skip_types.contains(&c.kind()))
            .collect();
        if self.language == Language::Python {
            if let Some(first) = named.first() {
                if first.kind() == "identifier" && matches!(node_text(first, self.source), "self" | "cls") {
                    named.remove(0);
                }
            }
        }
        named.len()
    }

    fn location(&self, node: Node) -> Location {
        Location::new(
            self.file.to_path_buf(),
            Position::new(node.start_position().row as u32, node.start_position().column as u32),
            Position::new(node.end_position().row as u32, node.end_position().column as u32),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfig;

    fn detect(source: &str, language: Language) -> Vec<CallInfo> {
        let tree = crate::parsing::parse_source(source, language).unwrap();
        let cfg = AnalyzerConfig::default();
        let detector = CallDetector::new(source, Path::new("test"), language, &cfg);
        detector.detect(&tree).0
    }

    #[test]
    fn js_prototype_static_call() {
        let calls = detect("Array.prototype.slice.call(arguments);", Language::JavaScript);
        assert_eq!(calls.len(), 1);
        let CallInfo::Method(m) = &calls[0] else { panic!("expected method call") };
        assert_eq!(m.receiver, "Array.prototype");
        assert_eq!(m.method_name, "slice");
        assert!(m.flags.is_static_method);
        assert_eq!(m.arguments_count, 1);
    }

    #[test]
    fn js_optional_chaining_call() {
        let calls = detect("data?.process();", Language::JavaScript);
        let CallInfo::Method(m) = &calls[0] else { panic!("expected method call") };
        assert_eq!(m.method_name, "process");
        assert_eq!(m.receiver, "data");
        assert!(m.flags.is_optional);
    }

    #[test]
    fn ts_type_arguments_attach_to_call() {
        let calls = detect("service.get<User>(url);", Language::TypeScript);
        let CallInfo::Method(m) = &calls[0] else { panic!("expected method call") };
        assert_eq!(m.method_name, "get");
        assert_eq!(m.type_arguments, Some(vec!["User".to_string()]));
        assert_eq!(m.arguments_count, 1);
    }

    #[test]
    fn python_super_init_is_magic_and_super_call() {
        let source = "class Foo(Bar):\n    def __init__(self):\n        super().__init__()\n";
        let calls = detect(source, Language::Python);
        let CallInfo::Method(m) = calls.iter().find(|c| matches!(c, CallInfo::Method(m) if m.flags.is_super_call)).unwrap() else {
            panic!("expected super call")
        };
        assert_eq!(m.method_name, "__init__");
        assert!(m.flags.is_magic_method);
        assert!(m.flags.is_super_call);
    }

    #[test]
    fn rust_ufcs_call() {
        let calls = detect("fn main() { <Vec<T> as IntoIterator>::into_iter(vec); }", Language::Rust);
        let CallInfo::Method(m) = calls.iter().find(|c| matches!(c, CallInfo::Method(_))).unwrap() else {
            panic!("expected method call")
        };
        assert_eq!(m.method_name, "into_iter");
        assert_eq!(m.trait_impl.as_deref(), Some("IntoIterator"));
        assert_eq!(m.impl_type.as_deref(), Some("Vec<T>"));
        assert!(m.flags.is_static_method);
    }

    #[test]
    fn rust_constructor_convention() {
        let calls = detect("fn main() { let v = Foo::new(1); }", Language::Rust);
        let CallInfo::Constructor(c) = calls.iter().find(|c| matches!(c, CallInfo::Constructor(_))).unwrap() else {
            panic!("expected constructor call")
        };
        assert_eq!(c.class_name, "Foo");
        assert_eq!(c.arguments_count, 1);
    }

    #[test]
    fn python_uppercase_call_is_constructor() {
        let calls = detect("x = Foo(1, 2)", Language::Python);
        assert!(matches!(&calls[0], CallInfo::Constructor(c) if c.class_name == "Foo" && c.arguments_count == 2));
    }

    #[test]
    fn js_new_expression_is_constructor() {
        let calls = detect("const x = new Foo(1);", Language::JavaScript);
        assert!(matches!(&calls[0], CallInfo::Constructor(c) if c.class_name == "Foo" && c.arguments_count == 1));
    }

    #[test]
    fn caller_name_is_qualified_by_class() {
        let source = "class Foo { bar() { this.baz(); } }";
        let calls = detect(source, Language::JavaScript);
        let CallInfo::Method(m) = &calls[0] else { panic!("expected method call") };
        assert_eq!(m.caller_name, "Foo.bar");
    }

    #[test]
    fn top_level_caller_is_module() {
        let calls = detect("helper();", Language::JavaScript);
        assert_eq!(calls[0].caller_name(), "<module>");
    }
}
