//! Call enrichment: the final, parallelizable pass once the class
//! hierarchy is frozen. Turns each raw call record into its enriched
//! counterpart — resolved target, dispatch classification, confidence —
//! scored by accumulating evidence. Every `enrich_*` function is a pure
//! projection from one raw call record to its enriched counterpart; no
//! call record is ever mutated in place.

use crate::hierarchy::ClassHierarchy;
use crate::model::{CallInfo, ClassFlags, ConstructorCallInfo, FunctionCallInfo, MethodCallInfo, ModuleGraph};
use crate::types::SymbolId;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchType {
    /// No statically known target (receiver type unresolved).
    Dynamic,
    /// Exactly one possible target anywhere in the hierarchy.
    Static,
    /// More than one possible target, at least one reached through an
    /// interface/trait contract.
    Interface,
    /// More than one possible target, none of them interface-mediated.
    Virtual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedFunctionCall {
    pub call: FunctionCallInfo,
    /// `<module>#<function_name>`, qualified by the import source when one
    /// is known, otherwise by the calling file itself.
    pub resolved_function: String,
    pub is_imported: bool,
    pub return_type: Option<String>,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedMethodCall {
    pub call: MethodCallInfo,
    pub dispatch_type: DispatchType,
    pub defining_class: Option<SymbolId>,
    pub is_override: bool,
    pub is_interface_method: bool,
    pub possible_targets: Vec<SymbolId>,
    /// Per-target dispatch-probability estimate (depth heuristic),
    /// populated only when more than one target is possible.
    pub target_probabilities: Vec<(SymbolId, f64)>,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedConstructorCall {
    pub call: ConstructorCallInfo,
    pub is_valid: bool,
    pub is_abstract: bool,
    pub resolved_type_arguments: Option<Vec<String>>,
}

fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

/// function-call resolution: confidence 0.5 (resolved at all) + 0.3
/// (import known) + 0.2 (return type known), clamped.
fn enrich_function_call(call: &FunctionCallInfo, file: &Path, module_graph: &ModuleGraph) -> EnrichedFunctionCall {
    let source_module = module_graph.resolve_local_name(file, &call.function_name);
    let is_imported = source_module.is_some();
    let module_path = source_module.unwrap_or_else(|| file.to_str().unwrap_or_default());
    let resolved_function = SymbolId::new(module_path, &call.function_name).as_str().to_string();

    // No propagated-return-type channel exists yet in this pipeline (the
    // type tracker records variable bindings, not call return types), so
    // this term of the confidence sum is currently always absent.
    let return_type: Option<String> = None;

    let mut confidence = 0.5;
    if is_imported {
        confidence += 0.3;
    }
    if return_type.is_some() {
        confidence += 0.2;
    }

    EnrichedFunctionCall {
        call: call.clone(),
        resolved_function,
        is_imported,
        return_type,
        confidence: clamp01(confidence),
    }
}

/// method-call dispatch classification. The spec's own open question
/// admits the textual `"interface"`/`"trait"` substring check as a stand-in
/// for real flag data; here the `ClassNode::is_interface_or_trait` flag is
/// checked first since it is exact, falling back to the textual heuristic
/// for nodes reached only as unresolved names.
fn classify_dispatch(hierarchy: &ClassHierarchy, targets: &[SymbolId], is_interface_method: bool) -> DispatchType {
    match targets.len() {
        0 => DispatchType::Dynamic,
        1 => DispatchType::Static,
        _ => {
            let via_interface = is_interface_method
                || targets.iter().any(|t| {
                    hierarchy
                        .get(t)
                        .map(|n| {
                            n.is_interface_or_trait()
                                || n.name.to_lowercase().contains("interface")
                                || n.name.to_lowercase().contains("trait")
                        })
                        .unwrap_or(false)
                });
            if via_interface {
                DispatchType::Interface
            } else {
                DispatchType::Virtual
            }
        }
    }
}

fn enrich_method_call(call: &MethodCallInfo, hierarchy: &ClassHierarchy) -> EnrichedMethodCall {
    let receiver_class = call.receiver_type.as_ref().and_then(|t| hierarchy.find_by_name(t));

    let resolution = receiver_class
        .as_ref()
        .map(|c| hierarchy.resolve_method(c, &call.method_name))
        .unwrap_or_default();

    let virtual_analysis = receiver_class
        .as_ref()
        .map(|c| hierarchy.analyze_virtual_call(c, &call.method_name))
        .unwrap_or_default();

    let dispatch_type = classify_dispatch(hierarchy, &virtual_analysis.possible_targets, resolution.is_interface_method);

    let target_probabilities = if virtual_analysis.possible_targets.len() > 1 {
        virtual_analysis
            .possible_targets
            .iter()
            .map(|t| (t.clone(), hierarchy.dispatch_probability(t)))
            .collect()
    } else {
        Vec::new()
    };

    let mut confidence = 0.0;
    if call.receiver_type.is_some() {
        confidence += 0.3;
    }
    if receiver_class.is_some() {
        confidence += 0.3;
    }
    if resolution.defining_class.is_some() {
        confidence += 0.3;
    }
    if virtual_analysis.possible_targets.len() == 1 {
        confidence += 0.1;
    }

    EnrichedMethodCall {
        call: call.clone(),
        dispatch_type,
        defining_class: resolution.defining_class,
        is_override: resolution.is_override,
        is_interface_method: resolution.is_interface_method,
        possible_targets: virtual_analysis.possible_targets,
        target_probabilities,
        confidence: clamp01(confidence),
    }
}

/// constructor-call resolution: reject abstract classes, attach any
/// generic parameters declared on the target class when the call site left
/// its own type arguments unspecified.
fn enrich_constructor_call(call: &ConstructorCallInfo, file: &Path, hierarchy: &ClassHierarchy) -> EnrichedConstructorCall {
    let file_local = SymbolId::new(file.to_str().unwrap_or_default(), &call.class_name);
    let symbol = if hierarchy.get(&file_local).is_some() {
        Some(file_local)
    } else {
        hierarchy.find_by_name(&call.class_name)
    };

    let node = symbol.as_ref().and_then(|s| hierarchy.get(s));
    let is_abstract = node.map(|n| n.flags.contains(ClassFlags::ABSTRACT)).unwrap_or(false);

    let resolved_type_arguments = call.type_arguments.clone().or_else(|| {
        node.filter(|n| !n.generics.is_empty())
            .map(|n| n.generics.iter().map(|g| g.name.clone()).collect())
    });

    EnrichedConstructorCall {
        call: call.clone(),
        is_valid: !is_abstract,
        is_abstract,
        resolved_type_arguments,
    }
}

/// Runs every call in a file's per-file output through the rules.
/// Safe to call once per file, in parallel with every other file, once
/// `ClassHierarchy::finalize` has returned (barrier).
pub fn enrich_calls(
    calls: &[CallInfo],
    file: &Path,
    module_graph: &ModuleGraph,
    hierarchy: &ClassHierarchy,
) -> (Vec<EnrichedFunctionCall>, Vec<EnrichedMethodCall>, Vec<EnrichedConstructorCall>) {
    let mut functions = Vec::new();
    let mut methods = Vec::new();
    let mut constructors = Vec::new();

    for call in calls {
        match call {
            CallInfo::Function(f) => functions.push(enrich_function_call(f, file, module_graph)),
            CallInfo::Method(m) => methods.push(enrich_method_call(m, hierarchy)),
            CallInfo::Constructor(c) => constructors.push(enrich_constructor_call(c, file, hierarchy)),
        }
    }

    (functions, methods, constructors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassDefinition, MethodCallFlags, MethodDefinition};
    use crate::parsing::Language;
    use crate::types::{Location, Position};
    use std::path::PathBuf;

    fn loc(file: &str) -> Location {
        Location::new(file, Position::new(0, 0), Position::new(0, 1))
    }

    #[test]
    fn function_call_resolved_through_import_scores_higher() {
        let mut graph = ModuleGraph::new();
        graph.add_import(
            "a.ts",
            crate::model::ImportEntry {
                local_name: "helper".into(),
                imported_name: "helper".into(),
                source_module: "./lib/helper".into(),
                is_default_import: false,
                is_namespace_import: false,
            },
        );
        let call = FunctionCallInfo {
            caller_name: "<module>".into(),
            function_name: "helper".into(),
            location: loc("a.ts"),
            file: PathBuf::from("a.ts"),
            arguments_count: 0,
            is_chained_call: false,
        };
        let enriched = enrich_function_call(&call, Path::new("a.ts"), &graph);
        assert!(enriched.is_imported);
        assert_eq!(enriched.resolved_function, "lib/helper#helper");
        assert!((enriched.confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn function_call_without_import_falls_back_to_local_module() {
        let call = FunctionCallInfo {
            caller_name: "<module>".into(),
            function_name: "localFn".into(),
            location: loc("a.ts"),
            file: PathBuf::from("a.ts"),
            arguments_count: 0,
            is_chained_call: false,
        };
        let enriched = enrich_function_call(&call, Path::new("a.ts"), &ModuleGraph::new());
        assert!(!enriched.is_imported);
        assert_eq!(enriched.resolved_function, "a#localFn");
        assert!((enriched.confidence - 0.5).abs() < 1e-9);
    }

    fn method_call(receiver_type: Option<&str>) -> MethodCallInfo {
        MethodCallInfo {
            caller_name: "<module>".into(),
            method_name: "log".into(),
            receiver: "logger".into(),
            receiver_type: receiver_type.map(str::to_string),
            location: loc("a.ts"),
            file: PathBuf::from("a.ts"),
            arguments_count: 0,
            flags: MethodCallFlags::default(),
            type_arguments: None,
            turbofish_types: None,
            trait_impl: None,
            impl_type: None,
        }
    }

    #[test]
    fn unresolved_receiver_yields_dynamic_dispatch() {
        let call = method_call(None);
        let enriched = enrich_method_call(&call, &ClassHierarchy::new());
        assert_eq!(enriched.dispatch_type, DispatchType::Dynamic);
        assert_eq!(enriched.confidence, 0.0);
    }

    #[test]
    fn single_target_is_static_dispatch() {
        let mut h = ClassHierarchy::new();
        let mut c = ClassDefinition::new("ConsoleLogger", loc("a.ts"), "a.ts", Language::TypeScript);
        c.methods.push(MethodDefinition::new("log", loc("a.ts")));
        h.insert_file(Path::new("a.ts"), &[c]);
        h.finalize(&ModuleGraph::new());

        let call = method_call(Some("ConsoleLogger"));
        let enriched = enrich_method_call(&call, &h);
        assert_eq!(enriched.dispatch_type, DispatchType::Static);
        assert_eq!(enriched.defining_class, Some(SymbolId::new("a", "ConsoleLogger")));
        assert!((enriched.confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn interface_mediated_call_classified_as_interface_dispatch() {
        let mut h = ClassHierarchy::new();
        let mut iface = ClassDefinition::new("ILogger", loc("a.ts"), "a.ts", Language::TypeScript);
        iface.flags |= ClassFlags::INTERFACE;
        iface.methods.push(MethodDefinition::new("log", loc("a.ts")));
        let mut console_logger = ClassDefinition::new("ConsoleLogger", loc("a.ts"), "a.ts", Language::TypeScript);
        console_logger.implements = vec!["ILogger".into()];
        let mut file_logger = ClassDefinition::new("FileLogger", loc("a.ts"), "a.ts", Language::TypeScript);
        file_logger.implements = vec!["ILogger".into()];
        file_logger.methods.push(MethodDefinition::new("log", loc("a.ts")));
        h.insert_file(Path::new("a.ts"), &[iface, console_logger, file_logger]);
        h.finalize(&ModuleGraph::new());

        let call = method_call(Some("ConsoleLogger"));
        let enriched = enrich_method_call(&call, &h);
        assert!(enriched.is_interface_method);
        assert_eq!(enriched.defining_class, Some(SymbolId::new("a", "ILogger")));
    }

    #[test]
    fn abstract_class_rejects_construction() {
        let mut h = ClassHierarchy::new();
        let mut base = ClassDefinition::new("Shape", loc("a.ts"), "a.ts", Language::TypeScript);
        base.flags |= ClassFlags::ABSTRACT;
        h.insert_file(Path::new("a.ts"), &[base]);
        h.finalize(&ModuleGraph::new());

        let call = ConstructorCallInfo {
            caller_name: "<module>".into(),
            class_name: "Shape".into(),
            location: loc("a.ts"),
            file: PathBuf::from("a.ts"),
            arguments_count: 0,
            type_arguments: None,
        };
        let enriched = enrich_constructor_call(&call, Path::new("a.ts"), &h);
        assert!(enriched.is_abstract);
        assert!(!enriched.is_valid);
    }

    #[test]
    fn constructor_call_inherits_class_generics_when_unspecified() {
        let mut h = ClassHierarchy::new();
        let mut container = ClassDefinition::new("Box", loc("a.ts"), "a.ts", Language::TypeScript);
        container.generics = vec![crate::model::Generic::new("T")];
        h.insert_file(Path::new("a.ts"), &[container]);
        h.finalize(&ModuleGraph::new());

        let call = ConstructorCallInfo {
            caller_name: "<module>".into(),
            class_name: "Box".into(),
            location: loc("a.ts"),
            file: PathBuf::from("a.ts"),
            arguments_count: 1,
            type_arguments: None,
        };
        let enriched = enrich_constructor_call(&call, Path::new("a.ts"), &h);
        assert_eq!(enriched.resolved_type_arguments, Some(vec!["T".to_string()]));
    }
}
