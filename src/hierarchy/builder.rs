//! Class Hierarchy Builder: merges per-file `ClassDefinition`s into a
//! single arena-style graph keyed by `SymbolId`, with derived-class edges
//! stored as index lists rather than owning references.

use crate::error::{Diagnostic, HierarchyError};
use crate::model::{ClassDefinition, ClassFlags, Generic, MethodDefinition, ModuleGraph};
use crate::parsing::Language;
use crate::types::SymbolId;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// One class/struct/interface/trait node in the hierarchy.
#[derive(Debug, Clone)]
pub struct ClassNode {
    pub symbol_id: SymbolId,
    pub name: String,
    pub file: PathBuf,
    pub language: Language,
    pub flags: ClassFlags,
    pub methods: Vec<MethodDefinition>,
    pub generics: Vec<Generic>,
    /// Raw, as-written parent/interface names, before resolution.
    extends_raw: Vec<String>,
    implements_raw: Vec<String>,
    /// Resolved after `finalize`.
    pub extends: Vec<SymbolId>,
    pub unresolved_extends: Vec<String>,
    pub implements: Vec<SymbolId>,
    pub unresolved_implements: Vec<String>,
    /// Inverse of `extends`: classes that directly extend this one.
    pub derived: Vec<SymbolId>,
    /// Computed by `finalize`.
    pub mro: Vec<SymbolId>,
}

impl ClassNode {
    pub fn is_interface_or_trait(&self) -> bool {
        self.flags.intersects(ClassFlags::INTERFACE | ClassFlags::TRAIT)
    }
}

/// The merged, global view of every class seen across all files. Build-only
/// during assembly, then frozen for enrichment.
#[derive(Debug, Default)]
pub struct ClassHierarchy {
    nodes: HashMap<SymbolId, ClassNode>,
    by_file: HashMap<PathBuf, Vec<SymbolId>>,
    name_index: HashMap<String, Vec<SymbolId>>,
}

impl ClassHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, symbol: &SymbolId) -> Option<&ClassNode> {
        self.nodes.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn interface_nodes(&self) -> impl Iterator<Item = &ClassNode> {
        self.nodes.values().filter(|n| n.is_interface_or_trait())
    }

    /// First class registered under this simple name, used by the call
    /// enricher to turn a resolved receiver-type name back into a
    /// `SymbolId`. Ambiguous when two files declare the same class name;
    /// callers that need file-scoped precision should build a `SymbolId`
    /// directly and call `get`.
    pub fn find_by_name(&self, name: &str) -> Option<SymbolId> {
        self.name_index.get(name).and_then(|v| v.first()).cloned()
    }

    /// Clears all nodes previously contributed by this file, then
    /// re-inserts the given classes — makes re-indexing a file idempotent.
    pub fn insert_file(&mut self, file: &Path, classes: &[ClassDefinition]) {
        self.remove_file(file);

        let mut symbols = Vec::with_capacity(classes.len());
        for class in classes {
            let symbol_id = SymbolId::new(&file.to_string_lossy(), &class.name);
            let node = ClassNode {
                symbol_id: symbol_id.clone(),
                name: class.name.clone(),
                file: file.to_path_buf(),
                language: class.language,
                flags: class.flags,
                methods: class.methods.clone(),
                generics: class.generics.clone(),
                extends_raw: class.extends.clone(),
                implements_raw: class.implements.clone(),
                extends: Vec::new(),
                unresolved_extends: Vec::new(),
                implements: Vec::new(),
                unresolved_implements: Vec::new(),
                derived: Vec::new(),
                mro: Vec::new(),
            };
            self.name_index.entry(class.name.clone()).or_default().push(symbol_id.clone());
            self.nodes.insert(symbol_id.clone(), node);
            symbols.push(symbol_id);
        }
        self.by_file.insert(file.to_path_buf(), symbols);
    }

    pub fn remove_file(&mut self, file: &Path) {
        let Some(symbols) = self.by_file.remove(file) else { return };
        for symbol in &symbols {
            self.nodes.remove(symbol);
            for bucket in self.name_index.values_mut() {
                bucket.retain(|s| s != symbol);
            }
        }
        for node in self.nodes.values_mut() {
            node.derived.retain(|s| !symbols.contains(s));
        }
    }

    /// Resolves a raw parent/interface name from `file` to a `SymbolId`:
    /// first via the file's own imports, then by a unique name match across
    /// the whole hierarchy; otherwise the name is recorded verbatim as an
    /// unresolved external (invariant).
    fn resolve_name(&self, file: &Path, name: &str, module_graph: &ModuleGraph) -> Option<SymbolId> {
        if let Some(module) = module_graph.resolve_local_name(file, name) {
            let candidate = SymbolId::new(module, name);
            if self.nodes.contains_key(&candidate) {
                return Some(candidate);
            }
        }
        match self.name_index.get(name).map(Vec::as_slice) {
            Some([only]) => Some(only.clone()),
            _ => None,
        }
    }

    /// Global phase barrier: resolves every node's extends/implements
    /// now that all files have been inserted, rebuilds derived edges, and
    /// computes each node's MRO.
    pub fn finalize(&mut self, module_graph: &ModuleGraph) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        let symbols: Vec<SymbolId> = self.nodes.keys().cloned().collect();
        for symbol in &symbols {
            let (file, extends_raw, implements_raw) = {
                let node = &self.nodes[symbol];
                (node.file.clone(), node.extends_raw.clone(), node.implements_raw.clone())
            };
            let mut extends = Vec::new();
            let mut unresolved_extends = Vec::new();
            for name in &extends_raw {
                match self.resolve_name(&file, name, module_graph) {
                    Some(resolved) => extends.push(resolved),
                    None => unresolved_extends.push(name.clone()),
                }
            }
            let mut implements = Vec::new();
            let mut unresolved_implements = Vec::new();
            for name in &implements_raw {
                match self.resolve_name(&file, name, module_graph) {
                    Some(resolved) => implements.push(resolved),
                    None => unresolved_implements.push(name.clone()),
                }
            }
            let node = self.nodes.get_mut(symbol).unwrap();
            node.extends = extends;
            node.unresolved_extends = unresolved_extends;
            node.implements = implements;
            node.unresolved_implements = unresolved_implements;
            node.derived.clear();
        }

        for symbol in &symbols {
            let parents = self.nodes[symbol].extends.clone();
            for parent in parents {
                if let Some(parent_node) = self.nodes.get_mut(&parent) {
                    if !parent_node.derived.contains(symbol) {
                        parent_node.derived.push(symbol.clone());
                    }
                }
            }
        }

        for symbol in &symbols {
            match self.compute_mro(symbol) {
                Ok(mro) => {
                    self.nodes.get_mut(symbol).unwrap().mro = mro;
                }
                Err(err) => {
                    let file = self.nodes[symbol].file.clone();
                    diagnostics.push(Diagnostic::error(file, err.to_string()));
                    self.nodes.get_mut(symbol).unwrap().mro = vec![symbol.clone()];
                }
            }
        }

        diagnostics
    }

    fn compute_mro(&self, start: &SymbolId) -> Result<Vec<SymbolId>, HierarchyError> {
        let Some(start_node) = self.nodes.get(start) else {
            return Ok(vec![start.clone()]);
        };

        match start_node.language {
            Language::Python => {
                let mut visiting = HashSet::new();
                self.c3_linearize(start, &mut visiting)
            }
            Language::Rust => {
                // Rust has no real inheritance; MRO here is impl order:
                // inherent impl first (implicit, the struct itself), then
                // trait impls in declaration order.
                let mut mro = vec![start.clone()];
                mro.extend(start_node.implements.iter().cloned());
                Ok(mro)
            }
            Language::JavaScript | Language::TypeScript => {
                let mut mro = vec![start.clone()];
                let mut visited: HashSet<SymbolId> = HashSet::from([start.clone()]);
                let mut current = start.clone();
                loop {
                    let Some(node) = self.nodes.get(&current) else { break };
                    let Some(parent) = node.extends.first() else { break };
                    if visited.contains(parent) {
                        return Err(HierarchyError::MroCycle {
                            class: start_node.name.clone(),
                            path: mro.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(" -> "),
                        });
                    }
                    visited.insert(parent.clone());
                    mro.push(parent.clone());
                    current = parent.clone();
                }
                Ok(mro)
            }
        }
    }

    /// C3 linearization (Python MRO): `L[C] = C + merge(L[B1], ..., L[Bn], [B1, ..., Bn])`.
    fn c3_linearize(&self, symbol: &SymbolId, visiting: &mut HashSet<SymbolId>) -> Result<Vec<SymbolId>, HierarchyError> {
        let Some(node) = self.nodes.get(symbol) else {
            return Ok(vec![symbol.clone()]);
        };
        if node.extends.is_empty() {
            return Ok(vec![symbol.clone()]);
        }
        if !visiting.insert(symbol.clone()) {
            return Err(HierarchyError::MroCycle {
                class: node.name.clone(),
                path: symbol.as_str().to_string(),
            });
        }

        let mut lists: Vec<Vec<SymbolId>> = Vec::new();
        for base in &node.extends {
            lists.push(self.c3_linearize(base, visiting)?);
        }
        lists.push(node.extends.clone());
        visiting.remove(symbol);

        let mut result = vec![symbol.clone()];
        loop {
            lists.retain(|l| !l.is_empty());
            if lists.is_empty() {
                break;
            }
            let candidate = lists
                .iter()
                .map(|l| l[0].clone())
                .find(|head| !lists.iter().any(|l| l[1..].contains(head)));
            let Some(candidate) = candidate else {
                return Err(HierarchyError::InconsistentC3 { class: node.name.clone() });
            };
            result.push(candidate.clone());
            for l in lists.iter_mut() {
                l.retain(|s| s != &candidate);
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Location;

    fn class(name: &str, extends: &[&str], language: Language) -> ClassDefinition {
        let loc = Location::new("a", crate::types::Position::new(0, 0), crate::types::Position::new(0, 1));
        let mut c = ClassDefinition::new(name, loc, "a", language);
        c.extends = extends.iter().map(|s| s.to_string()).collect();
        c
    }

    #[test]
    fn reindex_is_idempotent() {
        let mut h = ClassHierarchy::new();
        let classes = vec![class("Foo", &[], Language::JavaScript)];
        let graph = ModuleGraph::new();
        h.insert_file(Path::new("a.js"), &classes);
        h.insert_file(Path::new("a.js"), &classes);
        assert_eq!(h.len(), 1);
        h.finalize(&graph);
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn single_inheritance_mro_is_parent_chain() {
        let mut h = ClassHierarchy::new();
        h.insert_file(
            Path::new("a.js"),
            &[class("Animal", &[], Language::JavaScript), class("Dog", &["Animal"], Language::JavaScript)],
        );
        let graph = ModuleGraph::new();
        let diags = h.finalize(&graph);
        assert!(diags.is_empty());
        let dog = SymbolId::new("a", "Dog");
        let mro: Vec<String> = h.get(&dog).unwrap().mro.iter().map(|s| s.as_str().to_string()).collect();
        assert_eq!(mro, vec!["a#Dog", "a#Animal"]);
    }

    #[test]
    fn python_diamond_c3_linearizes() {
        let mut h = ClassHierarchy::new();
        h.insert_file(
            Path::new("a.py"),
            &[
                class("Base", &[], Language::Python),
                class("Mixin", &[], Language::Python),
                class("Derived", &["Base", "Mixin"], Language::Python),
            ],
        );
        let graph = ModuleGraph::new();
        let diags = h.finalize(&graph);
        assert!(diags.is_empty());
        let derived = SymbolId::new("a", "Derived");
        let mro: Vec<String> = h.get(&derived).unwrap().mro.iter().map(|s| s.as_str().to_string()).collect();
        assert_eq!(mro, vec!["a#Derived", "a#Base", "a#Mixin"]);
    }
}
