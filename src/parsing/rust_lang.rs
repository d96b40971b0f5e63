//! Rust is structurally unlike the other three languages: there is no
//! single "class" node, so class detection is a bespoke two-pass algorithm
//! rather than an enhancer layered on the generic extractor.
//! Call detection is likewise mostly bespoke: UFCS, turbofish,
//! `unsafe` blocks, and trait-impl context have no analogue in the shared
//! configuration table.

use crate::model::{
    ClassDefinition, ClassFlags, MethodCallInfo, MethodDefinition, MethodFlags, Parameter,
    PropertyDefinition, PropertyFlags,
};
use crate::parsing::node_text;
use crate::types::{Location, Position};
use std::collections::HashMap;
use std::path::Path;
use tree_sitter::Node;

fn location(file: &Path, node: Node) -> Location {
    Location::new(
        file.to_path_buf(),
        Position::new(node.start_position().row as u32, node.start_position().column as u32),
        Position::new(node.end_position().row as u32, node.end_position().column as u32),
    )
}

struct ImplBlock<'a> {
    target_type: String,
    trait_name: Option<String>,
    node: Node<'a>,
}

pub(crate) fn detect_classes(source: &str, file: &Path, root: Node) -> Vec<ClassDefinition> {
    let mut structs: Vec<ClassDefinition> = Vec::new();
    let mut struct_index: HashMap<String, usize> = HashMap::new();
    let mut traits: Vec<ClassDefinition> = Vec::new();
    let mut impls: Vec<ImplBlock> = Vec::new();

    // Pass 1: collect every struct_item, trait_item, enum_item, and impl_item.
    walk(root, &mut |node| match node.kind() {
        "struct_item" => {
            if let Some(def) = extract_struct(source, file, node) {
                struct_index.insert(def.name.clone(), structs.len());
                structs.push(def);
            }
        }
        "trait_item" => {
            if let Some(def) = extract_trait(source, file, node) {
                traits.push(def);
            }
        }
        "impl_item" => {
            if let Some(block) = extract_impl_header(source, node) {
                impls.push(block);
            }
        }
        _ => {}
    });

    // Pass 2: merge impl-block methods into the matching struct; synthesize
    // a partial struct for an impl targeting an unknown type.
    for block in &impls {
        let idx = *struct_index.entry(block.target_type.clone()).or_insert_with(|| {
            let mut synthesized = ClassDefinition::new(
                block.target_type.clone(),
                location(file, block.node),
                file.to_path_buf(),
                crate::parsing::Language::Rust,
            );
            synthesized.flags |= ClassFlags::empty();
            structs.push(synthesized);
            structs.len() - 1
        });

        let methods = extract_impl_methods(source, file, block.node);
        let struct_def = &mut structs[idx];
        for method in methods {
            struct_def.methods.push(method);
        }
        if let Some(trait_name) = &block.trait_name {
            if !struct_def.implements.contains(trait_name) {
                struct_def.implements.push(trait_name.clone());
            }
        }
    }

    let mut out = structs;
    out.extend(traits);
    out.sort_by(|a, b| a.location.sort_key().cmp(&b.location.sort_key()));
    out
}

fn walk<'a>(node: Node<'a>, visit: &mut impl FnMut(Node<'a>)) {
    visit(node);
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk(child, visit);
    }
}

fn extract_struct(source: &str, file: &Path, node: Node) -> Option<ClassDefinition> {
    let name_node = node.child_by_field_name("name")?;
    let name = node_text(&name_node, source).to_string();
    let mut class = ClassDefinition::new(name, location(file, node), file.to_path_buf(), crate::parsing::Language::Rust);

    class.generics = extract_generics(source, node);
    class.decorators = extract_derive_macros(source, node);
    class.properties = extract_fields(source, file, node);

    Some(class)
}

fn extract_trait(source: &str, file: &Path, node: Node) -> Option<ClassDefinition> {
    let name_node = node.child_by_field_name("name")?;
    let name = node_text(&name_node, source).to_string();
    let mut class = ClassDefinition::new(name, location(file, node), file.to_path_buf(), crate::parsing::Language::Rust);
    class.flags |= ClassFlags::TRAIT;
    class.generics = extract_generics(source, node);

    if let Some(body) = node.child_by_field_name("body") {
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            if member.kind() == "function_signature_item" || member.kind() == "function_item" {
                if let Some(m) = extract_fn(source, file, member) {
                    class.methods.push(m);
                }
            }
        }
    }

    Some(class)
}

fn extract_impl_header<'a>(source: &str, node: Node<'a>) -> Option<ImplBlock<'a>> {
    let type_node = node.child_by_field_name("type")?;
    let target_type = node_text(&type_node, source).to_string();
    let trait_name = node
        .child_by_field_name("trait")
        .map(|t| node_text(&t, source).to_string());
    Some(ImplBlock {
        target_type,
        trait_name,
        node,
    })
}

fn extract_impl_methods(source: &str, file: &Path, impl_node: Node) -> Vec<MethodDefinition> {
    let Some(body) = impl_node.child_by_field_name("body") else {
        return Vec::new();
    };
    let mut out = Vec::new();
    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        if member.kind() != "function_item" {
            continue;
        }
        if let Some(mut method) = extract_fn(source, file, member) {
            if let Some(trait_name) = impl_node.child_by_field_name("trait") {
                method.decorators.push(format!("impl {}", node_text(&trait_name, source)));
            }
            out.push(method);
        }
    }
    out
}

fn extract_fn(source: &str, file: &Path, node: Node) -> Option<MethodDefinition> {
    let name_node = node.child_by_field_name("name")?;
    let name = node_text(&name_node, source).to_string();
    let mut method = MethodDefinition::new(name.clone(), location(file, node));

    if name == "new" {
        method.flags |= MethodFlags::CONSTRUCTOR;
    }

    let has_self = node
        .child_by_field_name("parameters")
        .map(|params| {
            let mut cursor = params.walk();
            params.named_children(&mut cursor).any(|p| p.kind() == "self_parameter")
        })
        .unwrap_or(false);
    if !has_self {
        method.flags |= MethodFlags::STATIC;
    }

    if let Some(params_node) = node.child_by_field_name("parameters") {
        method.parameters = extract_rust_parameters(source, params_node);
    }

    if let Some(return_type) = node.child_by_field_name("return_type") {
        method.return_type = Some(node_text(&return_type, source).to_string());
    }

    // Lifetimes and type parameters are both generics.
    if let Some(type_params) = node.child_by_field_name("type_parameters") {
        let mut cursor = type_params.walk();
        for child in type_params.named_children(&mut cursor) {
            if matches!(child.kind(), "type_parameter" | "lifetime" | "constrained_type_parameter") {
                method.generics.push(crate::model::Generic::new(node_text(&child, source)));
            }
        }
    }

    Some(method)
}

fn extract_rust_parameters(source: &str, params_node: Node) -> Vec<Parameter> {
    let mut out = Vec::new();
    let mut cursor = params_node.walk();
    for child in params_node.named_children(&mut cursor) {
        if child.kind() == "self_parameter" {
            continue;
        }
        if child.kind() != "parameter" {
            continue;
        }
        let Some(pattern) = child.child_by_field_name("pattern") else { continue };
        let mut param = Parameter::new(node_text(&pattern, source));
        if let Some(type_node) = child.child_by_field_name("type") {
            param.type_annotation = Some(node_text(&type_node, source).to_string());
        }
        out.push(param);
    }
    out
}

fn extract_generics(source: &str, node: Node) -> Vec<crate::model::Generic> {
    let Some(type_params) = node.child_by_field_name("type_parameters") else {
        return Vec::new();
    };
    let mut out = Vec::new();
    let mut cursor = type_params.walk();
    for child in type_params.named_children(&mut cursor) {
        match child.kind() {
            "type_parameter" | "constrained_type_parameter" => {
                let name_node = child.child_by_field_name("name").unwrap_or(child);
                let mut generic = crate::model::Generic::new(node_text(&name_node, source));
                if let Some(bounds) = child.child_by_field_name("bounds") {
                    generic.constraint = Some(node_text(&bounds, source).to_string());
                }
                out.push(generic);
            }
            "lifetime" => out.push(crate::model::Generic::new(node_text(&child, source))),
            _ => {}
        }
    }
    out
}

fn extract_derive_macros(source: &str, node: Node) -> Vec<String> {
    let mut decorators = Vec::new();
    let mut sibling = node.prev_sibling();
    while let Some(s) = sibling {
        if s.kind() == "attribute_item" {
            let text = node_text(&s, source);
            if let Some(derive_start) = text.find("derive(") {
                let inner = &text[derive_start + "derive(".len()..];
                if let Some(end) = inner.find(')') {
                    for name in inner[..end].split(',') {
                        decorators.push(name.trim().to_string());
                    }
                }
            } else {
                decorators.push(text.trim_start_matches('#').trim_matches(['[', ']']).to_string());
            }
            sibling = s.prev_sibling();
        } else {
            break;
        }
    }
    decorators.reverse();
    decorators
}

fn extract_fields(source: &str, file: &Path, node: Node) -> Vec<PropertyDefinition> {
    let Some(body) = node.child_by_field_name("body") else {
        return Vec::new();
    };
    let mut out = Vec::new();
    let mut cursor = body.walk();
    for (idx, field) in body.named_children(&mut cursor).enumerate() {
        if field.kind() != "field_declaration" {
            continue;
        }
        let name = field
            .child_by_field_name("name")
            .map(|n| node_text(&n, source).to_string())
            .unwrap_or_else(|| idx.to_string());
        let mut flags = PropertyFlags::empty();
        if !node_text(&field, source).trim_start().starts_with("pub") {
            flags |= PropertyFlags::PRIVATE;
        }
        let type_annotation = field.child_by_field_name("type").map(|t| node_text(&t, source).to_string());
        out.push(PropertyDefinition {
            name,
            location: location(file, field),
            type_annotation,
            initial_value: None,
            flags,
        });
    }
    out
}

/// bespoke call-site detectors: UFCS, turbofish, `unsafe`, trait
/// impl context, and `&`/`&mut` receiver prefixes.
pub(crate) fn enhance_call(source: &str, call_node: Node, info: &mut MethodCallInfo) {
    detect_ufcs(source, call_node, info);
    detect_turbofish(source, call_node, info);
    detect_unsafe_context(call_node, info);
    detect_impl_context(source, call_node, info);
}

fn detect_ufcs(source: &str, call_node: Node, info: &mut MethodCallInfo) {
    let Some(callee) = call_node.child_by_field_name("function") else { return };
    if callee.kind() != "scoped_identifier" {
        return;
    }
    let Some(path) = callee.child_by_field_name("path") else { return };
    if path.kind() != "bracketed_type" {
        return;
    }
    let text = node_text(&path, source);
    if let Some(rest) = text.strip_prefix('<') {
        if let Some(as_idx) = rest.find(" as ") {
            let impl_type = rest[..as_idx].trim().to_string();
            let trait_part = rest[as_idx + 4..].trim_end_matches('>').trim().to_string();
            info.receiver = impl_type.clone();
            info.impl_type = Some(impl_type);
            info.trait_impl = Some(trait_part);
            info.flags.is_static_method = true;
        }
    }
}

fn detect_turbofish(source: &str, call_node: Node, info: &mut MethodCallInfo) {
    let Some(callee) = call_node.child_by_field_name("function") else { return };
    if callee.kind() != "generic_function" {
        return;
    }
    let Some(type_args) = callee.child_by_field_name("type_arguments") else { return };
    let text = node_text(&type_args, source);
    let inner = text.trim_start_matches("::<").trim_start_matches('<').trim_end_matches('>');
    let types: Vec<String> = split_generic_args(inner);
    if !types.is_empty() {
        info.turbofish_types = Some(types);
    }
}

/// Splits comma-separated generic arguments while keeping `'a`-style
/// lifetime parameters intact (no nested-angle-bracket awareness needed
/// beyond simple depth tracking).
fn split_generic_args(inner: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();
    for ch in inner.chars() {
        match ch {
            '<' => {
                depth += 1;
                current.push(ch);
            }
            '>' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => {
                let trimmed = current.trim().to_string();
                if !trimmed.is_empty() {
                    out.push(trimmed);
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    let trimmed = current.trim().to_string();
    if !trimmed.is_empty() {
        out.push(trimmed);
    }
    out
}

fn detect_unsafe_context(call_node: Node, info: &mut MethodCallInfo) {
    let mut current = call_node.parent();
    while let Some(p) = current {
        if p.kind() == "unsafe_block" {
            info.flags.is_unsafe = true;
            return;
        }
        if p.kind() == "function_item" {
            return;
        }
        current = p.parent();
    }
}

fn detect_impl_context(source: &str, call_node: Node, info: &mut MethodCallInfo) {
    if info.trait_impl.is_some() {
        return;
    }
    let mut current = call_node.parent();
    while let Some(p) = current {
        if p.kind() == "impl_item" {
            if let Some(trait_name) = p.child_by_field_name("trait") {
                info.trait_impl = Some(node_text(&trait_name, source).to_string());
                if let Some(type_node) = p.child_by_field_name("type") {
                    info.impl_type = Some(node_text(&type_node, source).to_string());
                }
            }
            return;
        }
        current = p.parent();
    }
}

pub(crate) fn detect_ref_receiver(source: &str, receiver_node: Node, info: &mut MethodCallInfo) {
    let text = node_text(&receiver_node, source);
    if let Some(rest) = text.strip_prefix("&mut ") {
        info.flags.is_mut_ref = true;
        info.flags.is_ref_method = true;
        info.receiver = rest.trim().to_string();
    } else if let Some(rest) = text.strip_prefix('&') {
        info.flags.is_ref_method = true;
        info.receiver = rest.trim().to_string();
    }
}

