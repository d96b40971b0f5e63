//! Method-Hierarchy Resolver: per-(class, method) resolution plus
//! virtual-call analysis, both walking the already-linearized MRO so no
//! separate cycle guard is needed here (cycles are caught at MRO-build time).

use crate::hierarchy::builder::{ClassHierarchy, ClassNode};
use crate::types::SymbolId;
use std::collections::{HashSet, VecDeque};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodResolution {
    pub defining_class: Option<SymbolId>,
    pub is_override: bool,
    /// Ancestor-to-subclass order of every class on the MRO that defines
    /// the method.
    pub override_chain: Vec<SymbolId>,
    pub is_interface_method: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VirtualCallAnalysis {
    pub possible_targets: Vec<SymbolId>,
    pub is_virtual: bool,
}

impl ClassHierarchy {
    fn defines_method_on(node: &ClassNode, name: &str) -> bool {
        node.methods.iter().any(|m| m.name == name)
    }

    fn defines_method(&self, symbol: &SymbolId, name: &str) -> bool {
        self.get(symbol).is_some_and(|n| Self::defines_method_on(n, name))
    }

    /// DFS the MRO; at each node, direct interfaces are checked
    /// *before* accepting that node's own definition, so an interface
    /// contract always wins over an inherited default.
    pub fn resolve_method(&self, class: &SymbolId, method_name: &str) -> MethodResolution {
        let Some(start) = self.get(class) else {
            return MethodResolution::default();
        };

        let mut definers = Vec::new();
        for symbol in &start.mro {
            let Some(node) = self.get(symbol) else { continue };

            if let Some(iface) = node.implements.iter().find(|i| self.defines_method(i, method_name)) {
                return MethodResolution {
                    defining_class: Some(iface.clone()),
                    is_override: false,
                    override_chain: Vec::new(),
                    is_interface_method: true,
                };
            }

            if Self::defines_method_on(node, method_name) {
                definers.push(symbol.clone());
            }
        }

        if let Some(defining_class) = definers.first().cloned() {
            let is_override = definers.len() > 1 && definers[0] == *class;
            let mut override_chain = definers;
            override_chain.reverse();
            return MethodResolution {
                defining_class: Some(defining_class),
                is_override,
                override_chain,
                is_interface_method: false,
            };
        }

        // no ancestor defines it — fall back to the class's
        // own declared interfaces.
        if let Some(iface) = start.implements.iter().find(|i| self.defines_method(i, method_name)) {
            return MethodResolution {
                defining_class: Some(iface.clone()),
                is_override: false,
                override_chain: Vec::new(),
                is_interface_method: true,
            };
        }

        MethodResolution::default()
    }

    /// `possible_targets = {defining_class} ∪ {subclass that redefines
    /// method}`, via a cycle-safe BFS over `derived` edges.
    pub fn analyze_virtual_call(&self, class: &SymbolId, method_name: &str) -> VirtualCallAnalysis {
        let resolution = self.resolve_method(class, method_name);
        let Some(defining) = resolution.defining_class else {
            return VirtualCallAnalysis::default();
        };

        let mut possible = vec![defining.clone()];
        let mut visited: HashSet<SymbolId> = HashSet::from([defining.clone()]);
        let mut queue = VecDeque::from([defining]);

        while let Some(current) = queue.pop_front() {
            let Some(node) = self.get(&current) else { continue };
            for child in &node.derived {
                if !visited.insert(child.clone()) {
                    continue;
                }
                if let Some(child_node) = self.get(child) {
                    if Self::defines_method_on(child_node, method_name) {
                        possible.push(child.clone());
                    }
                }
                queue.push_back(child.clone());
            }
        }

        let is_virtual = possible.len() > 1;
        VirtualCallAnalysis { possible_targets: possible, is_virtual }
    }

    /// Placeholder depth-based decay (open question: admitted as a
    /// heuristic, not a statically-known runtime probability).
    pub fn dispatch_probability(&self, symbol: &SymbolId) -> f64 {
        let depth = self.get(symbol).map(|n| n.mro.len().saturating_sub(1)).unwrap_or(0) as f64;
        (1.0 - 0.2 * depth).max(0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassDefinition, ClassFlags, MethodDefinition};
    use crate::model::ModuleGraph;
    use crate::parsing::Language;
    use crate::types::{Location, Position};
    use std::path::Path;

    fn class_with_method(name: &str, extends: &[&str], implements: &[&str], method: Option<&str>, language: Language) -> ClassDefinition {
        let loc = Location::new("a", Position::new(0, 0), Position::new(0, 1));
        let mut c = ClassDefinition::new(name, loc.clone(), "a", language);
        c.extends = extends.iter().map(|s| s.to_string()).collect();
        c.implements = implements.iter().map(|s| s.to_string()).collect();
        if let Some(m) = method {
            c.methods.push(MethodDefinition::new(m, loc));
        }
        c
    }

    #[test]
    fn python_override_detected_across_hierarchy() {
        let mut h = ClassHierarchy::new();
        h.insert_file(
            Path::new("a.py"),
            &[
                class_with_method("Base", &[], &[], Some("method"), Language::Python),
                class_with_method("Mixin", &[], &[], Some("helper"), Language::Python),
                class_with_method("Derived", &["Base", "Mixin"], &[], Some("method"), Language::Python),
            ],
        );
        h.finalize(&ModuleGraph::new());

        let derived = SymbolId::new("a", "Derived");
        let method_res = h.resolve_method(&derived, "method");
        assert_eq!(method_res.defining_class, Some(SymbolId::new("a", "Derived")));
        assert!(method_res.is_override);

        let helper_res = h.resolve_method(&derived, "helper");
        assert_eq!(helper_res.defining_class, Some(SymbolId::new("a", "Mixin")));
        assert!(!helper_res.is_override);
    }

    #[test]
    fn interface_method_detected_over_concrete_class() {
        let mut h = ClassHierarchy::new();
        let mut ilogger = class_with_method("ILogger", &[], &[], Some("log"), Language::TypeScript);
        ilogger.flags |= ClassFlags::INTERFACE;
        h.insert_file(
            Path::new("a.ts"),
            &[ilogger, class_with_method("ConsoleLogger", &[], &["ILogger"], Some("log"), Language::TypeScript)],
        );
        h.finalize(&ModuleGraph::new());

        let logger = SymbolId::new("a", "ConsoleLogger");
        let res = h.resolve_method(&logger, "log");
        assert_eq!(res.defining_class, Some(SymbolId::new("a", "ILogger")));
        assert!(res.is_interface_method);
    }

    #[test]
    fn virtual_dispatch_collects_redefining_subclasses() {
        let mut h = ClassHierarchy::new();
        h.insert_file(
            Path::new("a.ts"),
            &[
                class_with_method("Base", &[], &[], None, Language::TypeScript),
                class_with_method("Derived", &["Base"], &[], Some("method3"), Language::TypeScript),
                class_with_method("Concrete", &["Derived"], &[], Some("method3"), Language::TypeScript),
            ],
        );
        h.finalize(&ModuleGraph::new());

        let derived = SymbolId::new("a", "Derived");
        let analysis = h.analyze_virtual_call(&derived, "method3");
        assert!(analysis.is_virtual);
        let mut names: Vec<String> = analysis.possible_targets.iter().map(|s| s.as_str().to_string()).collect();
        names.sort();
        assert_eq!(names, vec!["a#Concrete".to_string(), "a#Derived".to_string()]);
    }
}
