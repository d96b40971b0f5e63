//! concrete scenarios 4 and 6 (Python).

use callweave::config::AnalyzerConfig;
use callweave::hierarchy::ClassHierarchy;
use callweave::model::ModuleGraph;
use callweave::parsing::{parse_source, CallDetector, ClassDetector, Language};
use callweave::CallInfo;
use std::path::Path;

fn detect_calls(source: &str) -> Vec<CallInfo> {
    let tree = parse_source(source, Language::Python).unwrap();
    let config = AnalyzerConfig::default();
    CallDetector::new(source, Path::new("models.py"), Language::Python, &config)
        .detect(&tree)
        .0
}

#[test]
fn super_init_call_is_flagged_super_and_magic() {
    let source = "class Dog(Animal):\n    def __init__(self, name):\n        super().__init__(name)\n";
    let calls = detect_calls(source);
    let CallInfo::Method(m) = calls.iter().find(|c| matches!(c, CallInfo::Method(_))).unwrap() else {
        panic!("expected a method call")
    };
    assert_eq!(m.method_name, "__init__");
    assert_eq!(m.receiver, "super()");
    assert!(m.flags.is_super_call);
    assert!(m.flags.is_magic_method);
    assert_eq!(m.arguments_count, 1);
}

#[test]
fn multiple_inheritance_resolves_through_mro_not_declaration_order() {
    let source = r#"
class Animal:
    def speak(self):
        pass

class Mixin:
    def helper(self):
        pass

class Dog(Animal, Mixin):
    def speak(self):
        pass
    def bark(self):
        self.speak()
"#;
    let config = AnalyzerConfig::default();
    let tree = parse_source(source, Language::Python).unwrap();
    let (classes, _) = ClassDetector::new(source, Path::new("models.py"), Language::Python, &config).detect(&tree);

    let mut hierarchy = ClassHierarchy::new();
    hierarchy.insert_file(Path::new("models.py"), &classes);
    hierarchy.finalize(&ModuleGraph::new());

    let dog = hierarchy.find_by_name("Dog").unwrap();

    let speak = hierarchy.resolve_method(&dog, "speak");
    assert!(speak.is_override);
    assert_eq!(speak.defining_class.as_ref().map(|s| s.as_str()), Some("models#Dog"));
    assert_eq!(
        speak.override_chain.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
        vec!["models#Animal", "models#Dog"]
    );

    let helper = hierarchy.resolve_method(&dog, "helper");
    assert_eq!(helper.defining_class.as_ref().map(|s| s.as_str()), Some("models#Mixin"));
    assert!(!helper.is_override);
}
