//! Local variable-to-type bindings produced by the type tracker and
//! consumed by the receiver-type resolver.

use serde::{Deserialize, Serialize};

/// How sure the tracker is of a binding. Explicit annotations and `new Foo()`
/// constructor calls are `Explicit`; everything else derived by heuristic
/// (e.g. propagating a return type) is `Inferred`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingConfidence {
    Explicit,
    Inferred,
}

/// What evidence produced a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingSource {
    /// `let x: Foo`, `x: Foo` parameter annotation, Rust `let x: Foo = ...`.
    Annotation,
    /// `new Foo()`, `Foo()` (Python), `Foo::new()` (Rust convention).
    Constructor,
    /// A literal whose type is unambiguous, e.g. `[]`, `{}`, `""`.
    Literal,
}

/// A single name-to-type binding local to one scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub variable_name: String,
    pub resolved_type: String,
    pub confidence: BindingConfidence,
    pub source: BindingSource,
}

impl TypeInfo {
    pub fn new(
        variable_name: impl Into<String>,
        resolved_type: impl Into<String>,
        confidence: BindingConfidence,
        source: BindingSource,
    ) -> Self {
        Self {
            variable_name: variable_name.into(),
            resolved_type: resolved_type.into(),
            confidence,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructs_binding() {
        let t = TypeInfo::new("user", "UserService", BindingConfidence::Explicit, BindingSource::Constructor);
        assert_eq!(t.variable_name, "user");
        assert_eq!(t.confidence, BindingConfidence::Explicit);
    }
}
