//! Global, cross-file class hierarchy assembly: a barrier phase that runs
//! once every file's per-file output is available.

pub mod builder;
pub mod method_resolver;

pub use builder::{ClassHierarchy, ClassNode};
pub use method_resolver::{MethodResolution, VirtualCallAnalysis};
