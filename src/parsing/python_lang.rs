//! Python bespoke extenders.

use crate::model::{CallInfo, ClassDefinition, ClassFlags, MethodCallFlags, MethodCallInfo, MethodFlags, PropertyDefinition, PropertyFlags};
use crate::parsing::class_detector::ClassDetector;
use crate::parsing::node_text;
use tree_sitter::Node;

pub(crate) fn enhance_class(detector: &mut ClassDetector, node: Node, class: &mut ClassDefinition) {
    // `metaclass=...` is a keyword argument in the superclass list and must
    // not be treated as a base class; the generic extractor's
    // `collect_identifiers` already skips `keyword_argument` nodes, so
    // nothing to strip here beyond re-deriving decorators and visibility.
    if let Some(decorated) = node.parent().filter(|p| p.kind() == "decorated_definition") {
        collect_decorators(decorated, detector, class);
    }

    apply_decorator_semantics(class);

    // derive instance properties from `__init__` parameter names.
    if let Some(init) = class.methods.iter().find(|m| m.name == "__init__").cloned() {
        for param in &init.parameters {
            if class.properties.iter().any(|p| p.name == param.name) {
                continue;
            }
            let mut flags = PropertyFlags::empty();
            if param.name.starts_with("__") {
                flags |= PropertyFlags::PRIVATE;
            } else if param.name.starts_with('_') {
                flags |= PropertyFlags::PROTECTED;
            }
            class.properties.push(PropertyDefinition {
                name: param.name.clone(),
                location: init.location.clone(),
                type_annotation: param.type_annotation.clone(),
                initial_value: None,
                flags,
            });
        }
    }
}

fn collect_decorators(decorated: Node, detector: &ClassDetector, class: &mut ClassDefinition) {
    let mut cursor = decorated.walk();
    for child in decorated.named_children(&mut cursor) {
        if child.kind() == "decorator" {
            let text = node_text(&child, detector.source());
            class.decorators.push(text.trim_start_matches('@').to_string());
        }
    }
}

fn apply_decorator_semantics(class: &mut ClassDefinition) {
    for method in &mut class.methods {
        for decorator in &method.decorators {
            if decorator.contains("staticmethod") {
                method.flags |= MethodFlags::STATIC;
            }
            if decorator.contains("abstractmethod") {
                method.flags |= MethodFlags::ABSTRACT;
            }
        }
    }
    if class.decorators.iter().any(|d| d.contains("abstractmethod")) {
        class.flags |= ClassFlags::ABSTRACT;
    }
}

/// Applies Python's per-method decorators; called by the class detector
/// right after building each `MethodDefinition` so `staticmethod`/
/// `classmethod`/`abstractmethod`/`property` are visible before
/// `apply_decorator_semantics` runs over the whole class.
pub(crate) fn enhance_method_decorators(detector: &ClassDetector, node: Node, method: &mut crate::model::MethodDefinition) {
    if let Some(decorated) = node.parent().filter(|p| p.kind() == "decorated_definition") {
        let mut cursor = decorated.walk();
        for child in decorated.named_children(&mut cursor) {
            if child.kind() == "decorator" {
                let text = node_text(&child, detector.source());
                method.decorators.push(text.trim_start_matches('@').to_string());
            }
        }
    }
    for decorator in method.decorators.clone() {
        if decorator.contains("classmethod") {
            method.flags |= MethodFlags::STATIC;
        }
    }
}

/// `super(...).m(...)`: callee is an `attribute` whose object is a
/// `call` to the identifier `super`.
pub(crate) fn detect_super_call(
    source: &str,
    file: &std::path::Path,
    caller_name: &str,
    call_node: Node,
    callee: Node,
) -> Option<CallInfo> {
    if callee.kind() != "attribute" {
        return None;
    }
    let object = callee.child_by_field_name("object")?;
    if object.kind() != "call" {
        return None;
    }
    let inner_callee = object.child_by_field_name("function")?;
    if node_text(&inner_callee, source) != "super" {
        return None;
    }
    let method_name_node = callee.child_by_field_name("attribute")?;
    let method_name = node_text(&method_name_node, source).to_string();
    let is_magic = is_magic_method(&method_name);

    Some(CallInfo::Method(MethodCallInfo {
        caller_name: caller_name.to_string(),
        method_name,
        receiver: node_text(&object, source).to_string(),
        receiver_type: None,
        location: crate::parsing::javascript_lang::node_location(file, call_node),
        file: file.to_path_buf(),
        arguments_count: count_py_arguments(call_node, source),
        flags: MethodCallFlags {
            is_super_call: true,
            is_magic_method: is_magic,
            ..Default::default()
        },
        type_arguments: None,
        turbofish_types: None,
        trait_impl: None,
        impl_type: None,
    }))
}

pub(crate) fn is_magic_method(name: &str) -> bool {
    name.len() >= 5 && name.starts_with("__") && name.ends_with("__")
}

pub(crate) fn count_py_arguments(call_node: Node, _source: &str) -> usize {
    let Some(args) = call_node.child_by_field_name("arguments") else {
        return 0;
    };
    let cfg = crate::parsing::LanguageConfig::for_language(crate::parsing::Language::Python);
    let mut cursor = args.walk();
    args.named_children(&mut cursor)
        .filter(|c| !cfg.argument_skip_types.contains(&c.kind()))
        .count()
}

