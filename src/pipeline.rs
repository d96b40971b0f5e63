//! Orchestrates the full run: an embarrassingly parallel per-file
//! phase, a single-threaded barrier that assembles the global class
//! hierarchy, and a parallel enrichment pass over the frozen hierarchy.

use crate::config::AnalyzerConfig;
use crate::enrich::{enrich_calls, EnrichedConstructorCall, EnrichedFunctionCall, EnrichedMethodCall};
use crate::error::{AnalysisError, AnalysisResult, Diagnostic};
use crate::hierarchy::ClassHierarchy;
use crate::model::{CallInfo, ClassDefinition, ModuleGraph};
use crate::parsing::{CallDetector, ClassDetector, Language};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Everything extracted from a single file before the global hierarchy
/// exists (output, per file).
#[derive(Debug, Clone)]
pub struct FileAnalysis {
    pub file: PathBuf,
    pub language: Language,
    pub classes: Vec<ClassDefinition>,
    pub calls: Vec<CallInfo>,
}

/// The full result of one `analyze_project` run.
#[derive(Debug)]
pub struct AnalysisReport {
    pub files: Vec<FileAnalysis>,
    pub hierarchy: ClassHierarchy,
    pub module_graph: ModuleGraph,
    pub function_calls: Vec<EnrichedFunctionCall>,
    pub method_calls: Vec<EnrichedMethodCall>,
    pub constructor_calls: Vec<EnrichedConstructorCall>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Walks every path in `roots` (files are taken as-is, directories walked
/// recursively), skipping anything matching `config.analysis.ignore_patterns`
/// or whose language isn't in `config.analysis.enabled_languages`.
fn discover_files(roots: &[PathBuf], config: &AnalyzerConfig) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for root in roots {
        collect(root, config, &mut out);
    }
    out
}

fn collect(path: &Path, config: &AnalyzerConfig, out: &mut Vec<PathBuf>) {
    if is_ignored(path, &config.analysis.ignore_patterns) {
        return;
    }

    if path.is_dir() {
        let Ok(entries) = std::fs::read_dir(path) else {
            return;
        };
        for entry in entries.flatten() {
            collect(&entry.path(), config, out);
        }
        return;
    }

    if let Some(language) = Language::from_path(path) {
        if config.is_language_enabled(language) {
            out.push(path.to_path_buf());
        }
    }
}

/// Lightweight glob-lite: the ignore list only ever contains
/// `"<directory-name>/**"` entries, so a match is "some path component
/// equals the part before `/**`".
fn is_ignored(path: &Path, patterns: &[String]) -> bool {
    let dirs: Vec<&str> = patterns
        .iter()
        .filter_map(|p| p.strip_suffix("/**"))
        .collect();
    path.components().any(|c| {
        let Some(name) = c.as_os_str().to_str() else { return false };
        dirs.contains(&name)
    })
}

fn analyze_one_file(path: &Path, config: &AnalyzerConfig) -> AnalysisResult<(FileAnalysis, Vec<crate::model::ImportEntry>, Vec<Diagnostic>)> {
    let source = std::fs::read_to_string(path).map_err(|source| AnalysisError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let language = Language::from_path(path).ok_or_else(|| AnalysisError::UnsupportedLanguage {
        path: path.to_path_buf(),
        extension: path.extension().and_then(|e| e.to_str()).unwrap_or("").to_string(),
    })?;

    let tree = crate::parsing::parse_source(&source, language)?;

    let (classes, mut diagnostics) = ClassDetector::new(&source, path, language, config).detect(&tree);
    let (calls, call_diagnostics) = CallDetector::new(&source, path, language, config).detect(&tree);
    diagnostics.extend(call_diagnostics);

    let imports = crate::tracking::type_tracker::extract_imports(&source, language, tree.root_node());

    tracing::debug!(file = %path.display(), classes = classes.len(), calls = calls.len(), "analyzed file");

    Ok((
        FileAnalysis {
            file: path.to_path_buf(),
            language,
            classes,
            calls,
        },
        imports,
        diagnostics,
    ))
}

/// Runs the whole pipeline over `roots` and returns a fully enriched report.
pub fn analyze_project(roots: &[PathBuf], config: &AnalyzerConfig) -> AnalysisResult<AnalysisReport> {
    let files = discover_files(roots, config);
    tracing::info!(count = files.len(), "discovered files");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.resolved_parallelism())
        .build()
        .map_err(|e| AnalysisError::Other(format!("failed to build thread pool: {e}")))?;

    // phase 1: per-file extraction, embarrassingly parallel.
    let per_file: Vec<AnalysisResult<(FileAnalysis, Vec<crate::model::ImportEntry>, Vec<Diagnostic>)>> =
        pool.install(|| files.par_iter().map(|path| analyze_one_file(path, config)).collect());

    let mut analyses = Vec::with_capacity(per_file.len());
    let mut module_graph = ModuleGraph::new();
    let mut diagnostics = Vec::new();

    // A single file's failure to read/parse degrades the run, it never
    // aborts it — surfaced as an error-severity diagnostic instead.
    for (path, result) in files.iter().zip(per_file) {
        match result {
            Ok((analysis, imports, file_diagnostics)) => {
                for import in imports {
                    module_graph.add_import(analysis.file.clone(), import);
                }
                diagnostics.extend(file_diagnostics);
                analyses.push(analysis);
            }
            Err(e) => diagnostics.push(Diagnostic::error(path.clone(), e.to_string())),
        }
    }

    // phase 2: the barrier. Single-threaded, once every file's classes
    // are available.
    let mut hierarchy = ClassHierarchy::new();
    for analysis in &analyses {
        hierarchy.insert_file(&analysis.file, &analysis.classes);
    }
    diagnostics.extend(hierarchy.finalize(&module_graph));

    // phase 3: enrichment, parallelizable again now the hierarchy is frozen.
    let enriched: Vec<(Vec<EnrichedFunctionCall>, Vec<EnrichedMethodCall>, Vec<EnrichedConstructorCall>)> = pool.install(|| {
        analyses
            .par_iter()
            .map(|analysis| enrich_calls(&analysis.calls, &analysis.file, &module_graph, &hierarchy))
            .collect()
    });

    let mut function_calls = Vec::new();
    let mut method_calls = Vec::new();
    let mut constructor_calls = Vec::new();
    for (f, m, c) in enriched {
        function_calls.extend(f);
        method_calls.extend(m);
        constructor_calls.extend(c);
    }

    // deterministic sort by (file_path, start_line, start_column).
    function_calls.sort_by(|a, b| a.call.location.sort_key().cmp(&b.call.location.sort_key()));
    method_calls.sort_by(|a, b| a.call.location.sort_key().cmp(&b.call.location.sort_key()));
    constructor_calls.sort_by(|a, b| a.call.location.sort_key().cmp(&b.call.location.sort_key()));
    analyses.sort_by(|a, b| a.file.cmp(&b.file));

    Ok(AnalysisReport {
        files: analyses,
        hierarchy,
        module_graph,
        function_calls,
        method_calls,
        constructor_calls,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn ignores_node_modules_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("node_modules")).unwrap();
        write_file(&dir, "node_modules/vendored.js", "class Vendored {}");
        write_file(&dir, "app.js", "class App {}");

        let config = AnalyzerConfig::default();
        let files = discover_files(&[dir.path().to_path_buf()], &config);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name().unwrap(), "app.js");
    }

    #[test]
    fn unreadable_file_is_reported_as_diagnostic_not_aborted() {
        let dir = TempDir::new().unwrap();
        let good = write_file(&dir, "good.py", "class Good:\n    def m(self):\n        pass\n");
        let missing = dir.path().join("missing.py");

        let config = AnalyzerConfig::default();
        let report = analyze_project(&[good, missing.clone()], &config).unwrap();

        assert_eq!(report.files.len(), 1);
        assert!(report
            .diagnostics
            .iter()
            .any(|d| d.file == missing && d.severity == crate::error::Severity::Error));
    }

    #[test]
    fn full_run_links_python_inheritance_across_files() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "base.py", "class Animal:\n    def speak(self):\n        pass\n");
        write_file(
            &dir,
            "dog.py",
            "from base import Animal\n\nclass Dog(Animal):\n    def speak(self):\n        pass\n\n    def bark(self):\n        self.speak()\n",
        );

        let config = AnalyzerConfig::default();
        let report = analyze_project(&[dir.path().to_path_buf()], &config).unwrap();

        assert_eq!(report.files.len(), 2);
        assert!(!report.method_calls.is_empty());
        let speak_call = report
            .method_calls
            .iter()
            .find(|c| c.call.method_name == "speak")
            .expect("self.speak() call should be detected");
        assert!(speak_call.is_override);
    }
}
