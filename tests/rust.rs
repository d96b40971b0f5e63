//! concrete scenarios 5 and 8 (Rust).

use callweave::config::AnalyzerConfig;
use callweave::hierarchy::ClassHierarchy;
use callweave::model::ModuleGraph;
use callweave::parsing::{parse_source, CallDetector, ClassDetector, Language};
use callweave::CallInfo;
use std::path::Path;

fn detect_calls(source: &str) -> Vec<CallInfo> {
    let tree = parse_source(source, Language::Rust).unwrap();
    let config = AnalyzerConfig::default();
    CallDetector::new(source, Path::new("lib.rs"), Language::Rust, &config)
        .detect(&tree)
        .0
}

#[test]
fn ufcs_call_carries_trait_and_impl_type() {
    let calls = detect_calls("fn main() { <Vec<T> as IntoIterator>::into_iter(vec); }");
    let CallInfo::Method(m) = calls.iter().find(|c| matches!(c, CallInfo::Method(_))).unwrap() else {
        panic!("expected a method call")
    };
    assert_eq!(m.method_name, "into_iter");
    assert_eq!(m.trait_impl.as_deref(), Some("IntoIterator"));
    assert_eq!(m.impl_type.as_deref(), Some("Vec<T>"));
    assert!(m.flags.is_static_method);
}

/// A trait impl resolves to the trait as `defining_class` only when the
/// trait itself is declared in the analyzed codebase — external traits
/// (std library, third-party crates) are recorded as unresolved implements
/// and the method is attributed to the implementing type instead.
#[test]
fn trait_impl_method_resolves_to_trait_when_trait_is_in_repo() {
    let source = r#"
        trait Display {
            fn fmt(&self);
        }
        struct Point { x: i32, y: i32 }
        impl Point {
            fn distance(&self) -> i32 { self.x + self.y }
        }
        impl Display for Point {
            fn fmt(&self) {}
        }
    "#;
    let config = AnalyzerConfig::default();
    let tree = parse_source(source, Language::Rust).unwrap();
    let (classes, _) = ClassDetector::new(source, Path::new("lib.rs"), Language::Rust, &config).detect(&tree);

    let mut hierarchy = ClassHierarchy::new();
    hierarchy.insert_file(Path::new("lib.rs"), &classes);
    hierarchy.finalize(&ModuleGraph::new());

    let point = hierarchy.find_by_name("Point").unwrap();

    let fmt_resolution = hierarchy.resolve_method(&point, "fmt");
    assert!(fmt_resolution.is_interface_method);
    assert_eq!(fmt_resolution.defining_class.as_ref().map(|s| s.as_str()), Some("lib#Display"));

    let distance_resolution = hierarchy.resolve_method(&point, "distance");
    assert!(!distance_resolution.is_interface_method);
    assert_eq!(distance_resolution.defining_class.as_ref().map(|s| s.as_str()), Some("lib#Point"));
}
