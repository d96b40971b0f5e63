//! CallInfo: the `FunctionCall | MethodCall | ConstructorCall` sum type.
//!
//! Deliberately modeled as an enum rather than a trait-object hierarchy: the
//! enrichment pass is a pure function from one variant to an enriched
//! variant of the same tag, not virtual dispatch on a shared base type.

use crate::types::Location;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallKind {
    Function,
    Method,
    Constructor,
}

/// A plain function call: `foo(args)`, no receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCallInfo {
    /// Enclosing function/method, qualified by class (`MyClass.m`), or
    /// `<module>` for top-level, `<anonymous>` for unnamed closures.
    pub caller_name: String,
    pub function_name: String,
    pub location: Location,
    pub file: std::path::PathBuf,
    pub arguments_count: usize,
    pub is_chained_call: bool,
}

/// A method call: `receiver.method(args)` or a language-specific dispatch
/// variant of the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MethodCallFlags {
    pub is_static_method: bool,
    pub is_chained_call: bool,
    pub is_optional: bool,
    pub is_super_call: bool,
    pub is_magic_method: bool,
    pub is_classmethod: bool,
    pub is_unsafe: bool,
    pub is_ref_method: bool,
    pub is_mut_ref: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodCallInfo {
    pub caller_name: String,
    pub method_name: String,
    /// Textual receiver, e.g. `"self"`, `"vec"`, `"Array.prototype"`.
    pub receiver: String,
    /// Resolved receiver type, when local evidence permits.
    pub receiver_type: Option<String>,
    pub location: Location,
    pub file: std::path::PathBuf,
    pub arguments_count: usize,
    pub flags: MethodCallFlags,
    /// TypeScript `service.get<User>(url)` — the TS `type_arguments` field,
    /// verbatim and ordered.
    pub type_arguments: Option<Vec<String>>,
    /// Rust turbofish `::<T>` parameters, kept distinct from TS
    /// `type_arguments` since they come from a different AST shape.
    pub turbofish_types: Option<Vec<String>>,
    /// Rust UFCS `<TYPE as TRAIT>::METHOD` / enclosing trait impl.
    pub trait_impl: Option<String>,
    pub impl_type: Option<String>,
}

impl MethodCallInfo {
    pub fn qualified_name(&self) -> String {
        if self.flags.is_static_method {
            format!("{}::{}", self.receiver, self.method_name)
        } else {
            format!("{}.{}", self.receiver, self.method_name)
        }
    }
}

/// A constructor call: `new Foo(args)`, `Foo(args)` (Python), `Foo::new(args)`
/// (Rust convention).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorCallInfo {
    pub caller_name: String,
    pub class_name: String,
    pub location: Location,
    pub file: std::path::PathBuf,
    pub arguments_count: usize,
    pub type_arguments: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallInfo {
    Function(FunctionCallInfo),
    Method(MethodCallInfo),
    Constructor(ConstructorCallInfo),
}

impl CallInfo {
    pub fn kind(&self) -> CallKind {
        match self {
            CallInfo::Function(_) => CallKind::Function,
            CallInfo::Method(_) => CallKind::Method,
            CallInfo::Constructor(_) => CallKind::Constructor,
        }
    }

    pub fn location(&self) -> &Location {
        match self {
            CallInfo::Function(f) => &f.location,
            CallInfo::Method(m) => &m.location,
            CallInfo::Constructor(c) => &c.location,
        }
    }

    pub fn caller_name(&self) -> &str {
        match self {
            CallInfo::Function(f) => &f.caller_name,
            CallInfo::Method(m) => &m.caller_name,
            CallInfo::Constructor(c) => &c.caller_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Position;

    fn loc() -> Location {
        Location::new("a.ts", Position::new(0, 0), Position::new(0, 10))
    }

    #[test]
    fn qualified_name_static_vs_instance() {
        let mut m = MethodCallInfo {
            caller_name: "<module>".into(),
            method_name: "new".into(),
            receiver: "HashMap".into(),
            receiver_type: None,
            location: loc(),
            file: "a.ts".into(),
            arguments_count: 0,
            flags: MethodCallFlags::default(),
            type_arguments: None,
            turbofish_types: None,
            trait_impl: None,
            impl_type: None,
        };
        m.flags.is_static_method = true;
        assert_eq!(m.qualified_name(), "HashMap::new");
        m.flags.is_static_method = false;
        assert_eq!(m.qualified_name(), "HashMap.new");
    }
}
