//! TypeScript bespoke extenders, layered on top of the JavaScript enhancer
//! rather than re-deriving class/member extraction.

use crate::model::{ClassDefinition, ClassFlags};
use crate::parsing::class_detector::ClassDetector;
use crate::parsing::node_text;
use tree_sitter::Node;

pub(crate) fn enhance_class(detector: &mut ClassDetector, node: Node, class: &mut ClassDefinition) {
    crate::parsing::javascript_lang::enhance_class(detector, node, class);

    if node.kind() == "abstract_class_declaration" {
        class.flags |= ClassFlags::ABSTRACT;
    }

    if let Some(type_params) = node.child_by_field_name("type_parameters") {
        let mut cursor = type_params.walk();
        for child in type_params.named_children(&mut cursor) {
            if child.kind() != "type_parameter" {
                continue;
            }
            let Some(name_node) = child.child_by_field_name("name") else { continue };
            let mut generic = crate::model::Generic::new(node_text(&name_node, detector.source()));
            if let Some(constraint) = child.child_by_field_name("constraint") {
                generic.constraint = Some(node_text(&constraint, detector.source()).to_string());
            }
            if let Some(default) = child.child_by_field_name("value") {
                generic.default = Some(node_text(&default, detector.source()).to_string());
            }
            class.generics.push(generic);
        }
    }

    if let Some(heritage) = find_child(node, "class_heritage") {
        if let Some(implements_clause) = find_child(heritage, "implements_clause") {
            for name in detector.collect_identifiers(implements_clause) {
                if !class.implements.contains(&name) {
                    class.implements.push(name);
                }
            }
        }
    }

    // `interface Foo extends Bar, Baz { ... }` — interfaces have no
    // `class_heritage` wrapper of their own, just a direct `extends_type_clause`.
    if let Some(extends_clause) = find_child(node, "extends_type_clause") {
        for name in detector.collect_identifiers(extends_clause) {
            if !class.extends.contains(&name) {
                class.extends.push(name);
            }
        }
    }

    // Decorators precede the declaration in document order.
    let mut sibling = node.prev_sibling();
    let mut decorators = Vec::new();
    while let Some(s) = sibling {
        if s.kind() == "decorator" {
            decorators.push(node_text(&s, detector.source()).trim_start_matches('@').to_string());
            sibling = s.prev_sibling();
        } else {
            break;
        }
    }
    decorators.reverse();
    for d in decorators {
        if !class.decorators.contains(&d) {
            class.decorators.push(d);
        }
    }

}

fn find_child<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).find(|c| c.kind() == kind)
}

/// the only TS-specific call enhancement is attaching the tree-sitter
/// `type_arguments` field verbatim, in order.
pub(crate) fn type_arguments(call_node: Node, source: &str) -> Option<Vec<String>> {
    let type_args = call_node.child_by_field_name("type_arguments")?;
    let mut out = Vec::new();
    let mut cursor = type_args.walk();
    for child in type_args.named_children(&mut cursor) {
        out.push(node_text(&child, source).to_string());
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}
