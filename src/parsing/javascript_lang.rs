//! JavaScript bespoke extenders.

use crate::model::{CallInfo, ClassDefinition, FunctionCallInfo, MethodCallInfo, MethodCallFlags};
use crate::parsing::class_detector::ClassDetector;
use crate::parsing::node_text;
use crate::types::Location;
use tree_sitter::Node;

/// heritage already comes from `class_heritage` in the generic
/// pass; this enhancer only recognizes `#`-prefixed privates (handled by
/// the shared prefix config) and leaves the rest to the generic extractor.
pub(crate) fn enhance_class(_detector: &mut ClassDetector, node: Node, class: &mut ClassDefinition) {
    if node.kind() == "class_declaration" || node.kind() == "class" {
        // `get`/`set` accessor siblings are recognizable by their leading
        // keyword token; stamp an informal type annotation so downstream
        // consumers can distinguish an accessor from a plain method.
        for method in &mut class.methods {
            if method.name.starts_with("get ") || method.name.starts_with("set ") {
                method.decorators.push("accessor".to_string());
            }
        }
    }
}

/// The three JS-specific call-site detectors, run in priority order before
/// falling back to the generic method-call record. Returns `Some`
/// only when a bespoke pattern matched; the caller must not also emit a
/// generic record for the same call node.
pub(crate) fn detect_bespoke_call(
    source: &str,
    file: &std::path::Path,
    caller_name: &str,
    call_node: Node,
    callee: Node,
) -> Option<CallInfo> {
    if let Some(info) = detect_prototype_method(source, file, caller_name, call_node, callee) {
        return Some(info);
    }
    if let Some(info) = detect_indirect_call(source, file, caller_name, call_node, callee) {
        return Some(info);
    }
    detect_optional_chaining(source, file, caller_name, call_node, callee)
}

/// `X.prototype.m(...)` or `X.prototype.m.call(...)`/`.apply(...)`/`.bind(...)`.
/// The second form wraps the first in an extra `member_expression` layer, so
/// the `call`/`apply`/`bind` indirection has to be unwrapped before the
/// `prototype` check, rather than bailing out to `detect_indirect_call` and
/// losing both the real method name and `is_static_method`.
fn detect_prototype_method(
    source: &str,
    file: &std::path::Path,
    caller_name: &str,
    call_node: Node,
    callee: Node,
) -> Option<CallInfo> {
    if callee.kind() != "member_expression" {
        return None;
    }
    let object = callee.child_by_field_name("object")?;
    let outer_property = callee.child_by_field_name("property")?;
    let outer_name = node_text(&outer_property, source);

    let (method_name, proto_holder) = if matches!(outer_name, "call" | "apply" | "bind") {
        if object.kind() != "member_expression" {
            return None;
        }
        let inner_method_node = object.child_by_field_name("property")?;
        let inner_holder = object.child_by_field_name("object")?;
        (node_text(&inner_method_node, source), inner_holder)
    } else {
        (outer_name, object)
    };

    if proto_holder.kind() != "member_expression" {
        return None;
    }
    let proto_property = proto_holder.child_by_field_name("property")?;
    if node_text(&proto_property, source) != "prototype" {
        return None;
    }
    let class_name_node = proto_holder.child_by_field_name("object")?;
    let class_name = node_text(&class_name_node, source);

    Some(CallInfo::Method(MethodCallInfo {
        caller_name: caller_name.to_string(),
        method_name: method_name.to_string(),
        receiver: format!("{class_name}.prototype"),
        receiver_type: None,
        location: node_location(file, call_node),
        file: file.to_path_buf(),
        arguments_count: count_arguments(call_node, source),
        flags: MethodCallFlags {
            is_static_method: true,
            ..Default::default()
        },
        type_arguments: None,
        turbofish_types: None,
        trait_impl: None,
        impl_type: None,
    }))
}

/// `f.call(...)`/`f.apply(...)`/`f.bind(...)`: the actual method is encoded
/// as `"<method>.<call|apply|bind>"`.
fn detect_indirect_call(
    source: &str,
    file: &std::path::Path,
    caller_name: &str,
    call_node: Node,
    callee: Node,
) -> Option<CallInfo> {
    if callee.kind() != "member_expression" {
        return None;
    }
    let indirect = callee.child_by_field_name("property")?;
    let indirect_name = node_text(&indirect, source);
    if !matches!(indirect_name, "call" | "apply" | "bind") {
        return None;
    }
    let object = callee.child_by_field_name("object")?;
    if object.kind() != "member_expression" {
        return None;
    }
    let method_name_node = object.child_by_field_name("property")?;
    let method_name = node_text(&method_name_node, source);
    let receiver_node = object.child_by_field_name("object")?;

    Some(CallInfo::Method(MethodCallInfo {
        caller_name: caller_name.to_string(),
        method_name: format!("{method_name}.{indirect_name}"),
        receiver: node_text(&receiver_node, source).to_string(),
        receiver_type: None,
        location: node_location(file, call_node),
        file: file.to_path_buf(),
        arguments_count: count_arguments(call_node, source),
        flags: MethodCallFlags::default(),
        type_arguments: None,
        turbofish_types: None,
        trait_impl: None,
        impl_type: None,
    }))
}

/// `obj?.m()`.
fn detect_optional_chaining(
    source: &str,
    file: &std::path::Path,
    caller_name: &str,
    call_node: Node,
    callee: Node,
) -> Option<CallInfo> {
    if callee.kind() != "member_expression" && callee.kind() != "optional_chain" {
        return None;
    }
    let text = node_text(&callee, source);
    if !text.contains("?.") {
        return None;
    }
    let object = callee.child_by_field_name("object")?;
    let method_name_node = callee.child_by_field_name("property")?;

    let receiver = node_text(&object, source).to_string();

    Some(CallInfo::Method(MethodCallInfo {
        caller_name: caller_name.to_string(),
        method_name: node_text(&method_name_node, source).to_string(),
        receiver,
        receiver_type: None,
        location: node_location(file, call_node),
        file: file.to_path_buf(),
        arguments_count: count_arguments(call_node, source),
        flags: MethodCallFlags {
            is_optional: true,
            is_chained_call: object.kind() == "call_expression",
            ..Default::default()
        },
        type_arguments: None,
        turbofish_types: None,
        trait_impl: None,
        impl_type: None,
    }))
}

pub(crate) fn node_location(file: &std::path::Path, node: Node) -> Location {
    Location::new(
        file.to_path_buf(),
        crate::types::Position::new(node.start_position().row as u32, node.start_position().column as u32),
        crate::types::Position::new(node.end_position().row as u32, node.end_position().column as u32),
    )
}

pub(crate) fn count_arguments(call_node: Node, _source: &str) -> usize {
    let Some(args) = call_node.child_by_field_name("arguments") else {
        return 0;
    };
    let cfg = crate::parsing::LanguageConfig::for_language(crate::parsing::Language::JavaScript);
    let mut cursor = args.walk();
    args.named_children(&mut cursor)
        .filter(|c| !cfg.argument_skip_types.contains(&c.kind()))
        .count()
}

pub(crate) fn function_call(
    source: &str,
    file: &std::path::Path,
    caller_name: &str,
    call_node: Node,
    function_name: Node,
    is_chained: bool,
) -> CallInfo {
    CallInfo::Function(FunctionCallInfo {
        caller_name: caller_name.to_string(),
        function_name: node_text(&function_name, source).to_string(),
        location: node_location(file, call_node),
        file: file.to_path_buf(),
        arguments_count: count_arguments(call_node, source),
        is_chained_call: is_chained,
    })
}

