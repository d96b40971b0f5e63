//! Per-language configuration table: the single source of truth the
//! generic class/call detectors read before handing off to a bespoke
//! extender for the ~15% of behavior that is truly language-unique.

use crate::parsing::Language;

/// Field names tree-sitter uses on a member-access node to yield the
/// receiver and method name, plus any alternate node types carrying the
/// same information under a different shape (Rust's `scoped_identifier`
/// and `generic_function`).
#[derive(Debug, Clone, Copy)]
pub struct MemberAccessConfig {
    pub node_types: &'static [&'static str],
    pub object_field: &'static str,
    pub property_field: &'static str,
}

/// Field names for a class/struct-like node: name, body, generics,
/// superclass(es), heritage.
#[derive(Debug, Clone, Copy)]
pub struct ClassNodeConfig {
    pub node_types: &'static [&'static str],
    pub name_field: &'static str,
    pub body_field: &'static str,
    pub generics_field: Option<&'static str>,
    pub superclass_field: Option<&'static str>,
    pub heritage_field: Option<&'static str>,
}

#[derive(Debug, Clone, Copy)]
pub struct ParameterNodeConfig {
    pub regular: &'static [&'static str],
    pub optional: &'static [&'static str],
    pub rest: &'static [&'static str],
    pub typed: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct LanguageConfig {
    pub language: Language,
    pub call_node_types: &'static [&'static str],
    pub member_access: MemberAccessConfig,
    pub class_nodes: ClassNodeConfig,
    pub method_node_types: &'static [&'static str],
    pub property_node_types: &'static [&'static str],
    pub parameters: ParameterNodeConfig,
    /// Node types skipped when counting call arguments (punctuation/comments).
    pub argument_skip_types: &'static [&'static str],
    /// Prefix conventions for access modifiers, e.g. `#` for JS private
    /// fields, `_`/`__` for Python.
    pub private_prefixes: &'static [&'static str],
    pub protected_prefixes: &'static [&'static str],
    pub constructor_name: &'static str,
    /// `PascalCase` identifiers are treated as static receivers (class
    /// references) rather than instance variables.
    pub uppercase_is_static: bool,
    /// Literal receiver tokens that always mean "static method call",
    /// e.g. Python's `cls`.
    pub static_receiver_literals: &'static [&'static str],
}

const JS_MEMBER_ACCESS: MemberAccessConfig = MemberAccessConfig {
    node_types: &["member_expression"],
    object_field: "object",
    property_field: "property",
};

const JS_PARAMS: ParameterNodeConfig = ParameterNodeConfig {
    regular: &["identifier", "required_parameter"],
    optional: &["optional_parameter"],
    rest: &["rest_pattern", "rest_parameter"],
    typed: &["required_parameter", "optional_parameter"],
};

const JS_ARG_SKIP: &[&str] = &[",", "(", ")", "comment"];

const JAVASCRIPT_CONFIG: LanguageConfig = LanguageConfig {
    language: Language::JavaScript,
    call_node_types: &["call_expression", "new_expression"],
    member_access: JS_MEMBER_ACCESS,
    class_nodes: ClassNodeConfig {
        node_types: &["class_declaration", "class"],
        name_field: "name",
        body_field: "body",
        generics_field: None,
        superclass_field: None,
        heritage_field: Some("class_heritage"),
    },
    method_node_types: &["method_definition"],
    property_node_types: &["field_definition", "public_field_definition"],
    parameters: JS_PARAMS,
    argument_skip_types: JS_ARG_SKIP,
    private_prefixes: &["#"],
    protected_prefixes: &[],
    constructor_name: "constructor",
    uppercase_is_static: false,
    static_receiver_literals: &[],
};

const TYPESCRIPT_CONFIG: LanguageConfig = LanguageConfig {
    language: Language::TypeScript,
    call_node_types: &["call_expression", "new_expression"],
    member_access: JS_MEMBER_ACCESS,
    class_nodes: ClassNodeConfig {
        node_types: &["class_declaration", "class", "abstract_class_declaration", "interface_declaration"],
        name_field: "name",
        body_field: "body",
        generics_field: Some("type_parameters"),
        superclass_field: None,
        heritage_field: Some("class_heritage"),
    },
    method_node_types: &["method_definition", "method_signature"],
    property_node_types: &["public_field_definition", "field_definition", "property_signature"],
    parameters: JS_PARAMS,
    argument_skip_types: JS_ARG_SKIP,
    private_prefixes: &["#"],
    protected_prefixes: &[],
    constructor_name: "constructor",
    uppercase_is_static: false,
    static_receiver_literals: &[],
};

const PYTHON_CONFIG: LanguageConfig = LanguageConfig {
    language: Language::Python,
    call_node_types: &["call"],
    member_access: MemberAccessConfig {
        node_types: &["attribute"],
        object_field: "object",
        property_field: "attribute",
    },
    class_nodes: ClassNodeConfig {
        node_types: &["class_definition"],
        name_field: "name",
        body_field: "body",
        generics_field: None,
        superclass_field: Some("superclasses"),
        heritage_field: None,
    },
    method_node_types: &["function_definition"],
    property_node_types: &["expression_statement"],
    parameters: ParameterNodeConfig {
        regular: &["identifier"],
        optional: &["default_parameter", "typed_default_parameter"],
        rest: &["list_splat_pattern", "dictionary_splat_pattern"],
        typed: &["typed_parameter", "typed_default_parameter"],
    },
    argument_skip_types: &[",", "(", ")", "comment"],
    private_prefixes: &["__"],
    protected_prefixes: &["_"],
    constructor_name: "__init__",
    uppercase_is_static: false,
    static_receiver_literals: &["cls"],
};

const RUST_CONFIG: LanguageConfig = LanguageConfig {
    language: Language::Rust,
    call_node_types: &["call_expression"],
    member_access: MemberAccessConfig {
        node_types: &["field_expression", "scoped_identifier", "generic_function"],
        object_field: "value",
        property_field: "field",
    },
    class_nodes: ClassNodeConfig {
        node_types: &["struct_item", "trait_item", "enum_item"],
        name_field: "name",
        body_field: "body",
        generics_field: Some("type_parameters"),
        superclass_field: None,
        heritage_field: None,
    },
    method_node_types: &["function_item"],
    property_node_types: &["field_declaration"],
    parameters: ParameterNodeConfig {
        regular: &["parameter", "self_parameter"],
        optional: &[],
        rest: &[],
        typed: &["parameter"],
    },
    argument_skip_types: &[",", "(", ")", "line_comment", "block_comment"],
    private_prefixes: &[],
    protected_prefixes: &[],
    constructor_name: "new",
    uppercase_is_static: true,
    static_receiver_literals: &[],
};

impl LanguageConfig {
    pub fn for_language(language: Language) -> &'static LanguageConfig {
        match language {
            Language::JavaScript => &JAVASCRIPT_CONFIG,
            Language::TypeScript => &TYPESCRIPT_CONFIG,
            Language::Python => &PYTHON_CONFIG,
            Language::Rust => &RUST_CONFIG,
        }
    }
}
