//! The data model shared by every phase of the pipeline.
//!
//! Records are produced once by the per-file phase and never mutated
//! afterward; enrichment produces new, separate records
//! layered on top rather than patching these in place.

mod call;
mod class;
mod module_graph;
mod type_info;

pub use call::{
    CallInfo, CallKind, ConstructorCallInfo, FunctionCallInfo, MethodCallInfo,
};
pub use class::{
    ClassDefinition, ClassFlags, Generic, MethodDefinition, MethodFlags, Parameter,
    PropertyDefinition, PropertyFlags,
};
pub use module_graph::{ImportEntry, ModuleGraph};
pub use type_info::{BindingConfidence, BindingSource, TypeInfo};
