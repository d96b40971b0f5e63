//! concrete scenarios 1-2 (JavaScript).

use callweave::config::AnalyzerConfig;
use callweave::parsing::{parse_source, CallDetector, Language};
use callweave::CallInfo;
use std::path::Path;

fn detect_calls(source: &str) -> Vec<CallInfo> {
    let tree = parse_source(source, Language::JavaScript).unwrap();
    let config = AnalyzerConfig::default();
    CallDetector::new(source, Path::new("app.js"), Language::JavaScript, &config)
        .detect(&tree)
        .0
}

#[test]
fn prototype_call_is_static_method_call() {
    let calls = detect_calls("Array.prototype.slice.call(arguments);");
    assert_eq!(calls.len(), 1);
    let CallInfo::Method(m) = &calls[0] else { panic!("expected a method call") };
    assert_eq!(m.receiver, "Array.prototype");
    assert_eq!(m.method_name, "slice");
    assert!(m.flags.is_static_method);
    assert_eq!(m.arguments_count, 1);
}

#[test]
fn optional_chaining_call_sets_is_optional() {
    let calls = detect_calls("data?.process();");
    let CallInfo::Method(m) = &calls[0] else { panic!("expected a method call") };
    assert_eq!(m.method_name, "process");
    assert_eq!(m.receiver, "data");
    assert!(m.flags.is_optional);
}
