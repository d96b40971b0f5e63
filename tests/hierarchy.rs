//! concrete scenario 9: virtual dispatch across a three-level hierarchy,
//! exercised through the public `ClassDetector` + `ClassHierarchy` API
//! rather than hand-built `ClassDefinition` fixtures.

use callweave::config::AnalyzerConfig;
use callweave::hierarchy::ClassHierarchy;
use callweave::model::ModuleGraph;
use callweave::parsing::{parse_source, ClassDetector, Language};
use std::path::Path;

#[test]
fn virtual_call_on_middle_class_collects_overriding_subclass() {
    let source = r#"
class Base:
    pass

class Derived(Base):
    def render(self):
        pass

class Concrete(Derived):
    def render(self):
        pass
"#;
    let config = AnalyzerConfig::default();
    let tree = parse_source(source, Language::Python).unwrap();
    let (classes, _) = ClassDetector::new(source, Path::new("shapes.py"), Language::Python, &config).detect(&tree);

    let mut hierarchy = ClassHierarchy::new();
    hierarchy.insert_file(Path::new("shapes.py"), &classes);
    hierarchy.finalize(&ModuleGraph::new());

    let derived = hierarchy.find_by_name("Derived").unwrap();
    let analysis = hierarchy.analyze_virtual_call(&derived, "render");
    assert!(analysis.is_virtual);

    let mut names: Vec<String> = analysis.possible_targets.iter().map(|s| s.as_str().to_string()).collect();
    names.sort();
    assert_eq!(names, vec!["shapes#Concrete".to_string(), "shapes#Derived".to_string()]);

    let derived_probability = hierarchy.dispatch_probability(&derived);
    let concrete = hierarchy.find_by_name("Concrete").unwrap();
    let concrete_probability = hierarchy.dispatch_probability(&concrete);
    assert!(concrete_probability <= derived_probability);
}

#[test]
fn finalize_is_idempotent_across_repeated_file_reindex() {
    let source = "class A:\n    def m(self):\n        pass\n";
    let config = AnalyzerConfig::default();
    let tree = parse_source(source, Language::Python).unwrap();
    let (classes, _) = ClassDetector::new(source, Path::new("a.py"), Language::Python, &config).detect(&tree);

    let mut hierarchy = ClassHierarchy::new();
    hierarchy.insert_file(Path::new("a.py"), &classes);
    hierarchy.insert_file(Path::new("a.py"), &classes);
    hierarchy.finalize(&ModuleGraph::new());

    assert_eq!(hierarchy.len(), 1);
}
