//! ClassDefinition, MethodDefinition, PropertyDefinition.

use crate::parsing::Language;
use crate::types::Location;
use serde::{Deserialize, Serialize};

/// A single generic/type parameter: `{name, constraint?, default?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generic {
    pub name: String,
    pub constraint: Option<String>,
    pub default: Option<String>,
}

impl Generic {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraint: None,
            default: None,
        }
    }
}

bitflags::bitflags! {
    /// Class-level flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ClassFlags: u16 {
        const ABSTRACT = 1 << 0;
        const INTERFACE = 1 << 1;
        const TRAIT = 1 << 2;
        const MIXIN = 1 << 3;
        const FINAL = 1 << 4;
        const EXPORTED = 1 << 5;
    }
}

impl Default for ClassFlags {
    fn default() -> Self {
        ClassFlags::empty()
    }
}

bitflags::bitflags! {
    /// Method-level flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct MethodFlags: u16 {
        const STATIC = 1 << 0;
        const ABSTRACT = 1 << 1;
        const PRIVATE = 1 << 2;
        const PROTECTED = 1 << 3;
        const CONSTRUCTOR = 1 << 4;
        const ASYNC = 1 << 5;
        const OVERRIDE = 1 << 6;
    }
}

impl Default for MethodFlags {
    fn default() -> Self {
        MethodFlags::empty()
    }
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct PropertyFlags: u8 {
        const STATIC = 1 << 0;
        const PRIVATE = 1 << 1;
        const PROTECTED = 1 << 2;
        const READONLY = 1 << 3;
    }
}

impl Default for PropertyFlags {
    fn default() -> Self {
        PropertyFlags::empty()
    }
}

/// A single parameter with `self`/`cls` already filtered out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub type_annotation: Option<String>,
    pub is_optional: bool,
    pub is_rest: bool,
    pub default_value: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_annotation: None,
            is_optional: false,
            is_rest: false,
            default_value: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub name: String,
    pub location: Location,
    pub type_annotation: Option<String>,
    pub initial_value: Option<String>,
    pub flags: PropertyFlags,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDefinition {
    pub name: String,
    pub location: Location,
    pub flags: MethodFlags,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<String>,
    pub generics: Vec<Generic>,
    pub decorators: Vec<String>,
    /// Populated in the global phase: classes further along the
    /// chain that override this method.
    pub overridden_by: Vec<String>,
}

impl MethodDefinition {
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            location,
            flags: MethodFlags::empty(),
            parameters: Vec::new(),
            return_type: None,
            generics: Vec::new(),
            decorators: Vec::new(),
            overridden_by: Vec::new(),
        }
    }

    pub fn is_constructor(&self) -> bool {
        self.flags.contains(MethodFlags::CONSTRUCTOR)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDefinition {
    pub name: String,
    pub location: Location,
    pub file: std::path::PathBuf,
    pub language: Language,
    /// Ordered parent-type names; empty if none. Python may have several,
    /// other languages at most one (invariant).
    pub extends: Vec<String>,
    /// Interface/trait names this class implements (may be empty).
    pub implements: Vec<String>,
    pub generics: Vec<Generic>,
    pub decorators: Vec<String>,
    pub methods: Vec<MethodDefinition>,
    pub properties: Vec<PropertyDefinition>,
    pub flags: ClassFlags,
}

impl ClassDefinition {
    pub fn new(name: impl Into<String>, location: Location, file: impl Into<std::path::PathBuf>, language: Language) -> Self {
        Self {
            name: name.into(),
            location,
            file: file.into(),
            language,
            extends: Vec::new(),
            implements: Vec::new(),
            generics: Vec::new(),
            decorators: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
            flags: ClassFlags::empty(),
        }
    }

    pub fn method(&self, name: &str) -> Option<&MethodDefinition> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn is_abstract(&self) -> bool {
        self.flags.contains(ClassFlags::ABSTRACT)
    }

    pub fn is_interface_or_trait(&self) -> bool {
        self.flags.intersects(ClassFlags::INTERFACE | ClassFlags::TRAIT)
    }
}
