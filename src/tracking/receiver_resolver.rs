//! Pure receiver-type resolution: same inputs always yield the same
//! output, and adding bindings after the call site never changes what a
//! site resolved to earlier.

use crate::parsing::{node_text, Language, LanguageConfig};
use crate::tracking::type_tracker::TypeTracker;
use crate::types::Position;
use tree_sitter::Node;

/// The language-specific keyword that refers to "the current instance".
fn self_keyword(language: Language) -> &'static str {
    match language {
        Language::Python => "self",
        Language::Rust => "self",
        Language::JavaScript | Language::TypeScript => "this",
    }
}

fn builtin_literal_type(language: Language, node: Node) -> Option<&'static str> {
    match (language, node.kind()) {
        (Language::JavaScript | Language::TypeScript, "string" | "template_string") => Some("string"),
        (Language::JavaScript | Language::TypeScript, "number") => Some("number"),
        (Language::JavaScript | Language::TypeScript, "array") => Some("Array"),
        (Language::JavaScript | Language::TypeScript, "object") => Some("Object"),
        (Language::Python, "string") => Some("str"),
        (Language::Python, "integer" | "float") => Some("number"),
        (Language::Python, "list") => Some("list"),
        (Language::Python, "dictionary") => Some("dict"),
        (Language::Rust, "string_literal") => Some("&str"),
        (Language::Rust, "integer_literal" | "float_literal") => Some("i32"),
        (Language::Rust, "array_expression") => Some("Vec"),
        _ => None,
    }
}

/// Resolves the type of a receiver AST node, per 's five-step order.
pub fn resolve_receiver_type(
    receiver_node: Node,
    tracker: &TypeTracker,
    source: &str,
    language: Language,
    at: Position,
) -> Option<String> {
    let text = node_text(&receiver_node, source);

    // Step 1: direct variable lookup.
    if let Some(info) = tracker.get_variable_type(text, Some(at)) {
        return Some(info.resolved_type.clone());
    }

    // Step 2: self/this/cls — looked up by the same name, so step 1 already
    // covers it when the tracker records a binding for that keyword; nothing
    // further to do here beyond the explicit self/cls literal check.
    if text == self_keyword(language) || text == "cls" {
        return None;
    }

    // Step 3: literal receivers.
    if let Some(builtin) = builtin_literal_type(language, receiver_node) {
        return Some(builtin.to_string());
    }

    // Step 4: chained call receiver — return-type inference is out of scope.
    let cfg = LanguageConfig::for_language(language);
    if cfg.call_node_types.contains(&receiver_node.kind()) || receiver_node.kind() == "new_expression" {
        return None;
    }

    // Step 5: member access — recurse on the base, un-refined.
    if cfg.member_access.node_types.contains(&receiver_node.kind()) {
        let object_field = if language == Language::Rust && receiver_node.kind() == "scoped_identifier" {
            "path"
        } else {
            cfg.member_access.object_field
        };
        if let Some(base) = receiver_node.child_by_field_name(object_field) {
            return resolve_receiver_type(base, tracker, source, language, at);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BindingConfidence, BindingSource};

    #[test]
    fn resolves_direct_variable_binding() {
        let source = "user.save()";
        let tree = crate::parsing::parse_source(source, Language::JavaScript).unwrap();
        let call = tree.root_node().descendant_for_byte_range(0, source.len()).unwrap();
        let mut cursor = call.walk();
        let call_expr = call
            .children(&mut cursor)
            .find(|n| n.kind() == "expression_statement")
            .and_then(|n| n.named_child(0))
            .unwrap();
        let callee = call_expr.child_by_field_name("function").unwrap();
        let object = callee.child_by_field_name("object").unwrap();

        let mut tracker = TypeTracker::new();
        tracker.set_variable_type("user", "UserService", Position::new(0, 0), BindingConfidence::Explicit, BindingSource::Constructor);

        let resolved = resolve_receiver_type(object, &tracker, source, Language::JavaScript, Position::new(0, 5));
        assert_eq!(resolved, Some("UserService".to_string()));
    }

    #[test]
    fn unresolved_receiver_yields_none() {
        let source = "mystery.save()";
        let tree = crate::parsing::parse_source(source, Language::JavaScript).unwrap();
        let call_expr = tree
            .root_node()
            .named_child(0)
            .unwrap()
            .named_child(0)
            .unwrap();
        let callee = call_expr.child_by_field_name("function").unwrap();
        let object = callee.child_by_field_name("object").unwrap();

        let tracker = TypeTracker::new();
        let resolved = resolve_receiver_type(object, &tracker, source, Language::JavaScript, Position::new(0, 5));
        assert_eq!(resolved, None);
    }
}
