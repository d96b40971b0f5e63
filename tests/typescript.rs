//! concrete scenarios 3 and 7 (TypeScript).

use callweave::config::AnalyzerConfig;
use callweave::hierarchy::ClassHierarchy;
use callweave::model::ModuleGraph;
use callweave::parsing::{parse_source, CallDetector, ClassDetector, Language};
use callweave::CallInfo;
use std::path::Path;

fn detect_calls(source: &str) -> Vec<CallInfo> {
    let tree = parse_source(source, Language::TypeScript).unwrap();
    let config = AnalyzerConfig::default();
    CallDetector::new(source, Path::new("app.ts"), Language::TypeScript, &config)
        .detect(&tree)
        .0
}

#[test]
fn generic_method_call_carries_type_arguments() {
    let calls = detect_calls("service.get<User>(url);");
    let CallInfo::Method(m) = &calls[0] else { panic!("expected a method call") };
    assert_eq!(m.method_name, "get");
    assert_eq!(m.type_arguments, Some(vec!["User".to_string()]));
    assert_eq!(m.arguments_count, 1);
}

#[test]
fn interface_method_resolves_through_implements() {
    let source = "interface ILogger { log(msg: string): void }\nclass ConsoleLogger implements ILogger { log(msg: string) {} }\n";
    let config = AnalyzerConfig::default();
    let tree = parse_source(source, Language::TypeScript).unwrap();
    let (classes, _) = ClassDetector::new(source, Path::new("app.ts"), Language::TypeScript, &config).detect(&tree);

    let mut hierarchy = ClassHierarchy::new();
    hierarchy.insert_file(Path::new("app.ts"), &classes);
    hierarchy.finalize(&ModuleGraph::new());

    let console_logger = hierarchy.find_by_name("ConsoleLogger").unwrap();
    let resolution = hierarchy.resolve_method(&console_logger, "log");
    assert!(resolution.is_interface_method);
    assert_eq!(resolution.defining_class.as_ref().map(|s| s.as_str()), Some("app#ILogger"));
}
