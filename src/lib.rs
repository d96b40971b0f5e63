//! Multi-language static call-graph and class-hierarchy analyzer for
//! JavaScript, TypeScript, Python, and Rust.
//!
//! The pipeline runs in two phases: an embarrassingly parallel
//! per-file phase (`parsing`, `tracking`) followed by a single barrier —
//! assembling the global class hierarchy (`hierarchy`) — after which
//! enrichment (`enrich`) is parallelizable again.

pub mod config;
pub mod enrich;
pub mod error;
pub mod hierarchy;
pub mod logging;
pub mod model;
pub mod parsing;
pub mod pipeline;
pub mod tracking;
pub mod types;

pub use config::{AnalysisConfig, AnalyzerConfig, LoggingConfig};
pub use enrich::{enrich_calls, DispatchType, EnrichedConstructorCall, EnrichedFunctionCall, EnrichedMethodCall};
pub use error::{AnalysisError, AnalysisResult, Diagnostic, HierarchyError, HierarchyResult, Severity};
pub use hierarchy::{ClassHierarchy, ClassNode, MethodResolution, VirtualCallAnalysis};
pub use model::{CallInfo, CallKind, ClassDefinition, ConstructorCallInfo, FunctionCallInfo, MethodCallInfo, ModuleGraph};
pub use parsing::Language;
pub use pipeline::{analyze_project, AnalysisReport, FileAnalysis};
pub use types::{normalize_module_path, Location, Position, SymbolId};
