//! Layered configuration: defaults → TOML file → environment variables.
//!
//! # Environment variables
//!
//! Prefixed with `CALLWEAVE_`, double underscore separates nested levels:
//! - `CALLWEAVE_ANALYSIS__MAX_AST_DEPTH=750`
//! - `CALLWEAVE_ANALYSIS__PARALLELISM=4`
//! - `CALLWEAVE_LOGGING__DEBUG=true`

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Guards AST traversal against pathologically nested input.
    #[serde(default = "default_max_ast_depth")]
    pub max_ast_depth: usize,

    /// Worker count for the per-file phase's work-stealing pool; `0` means
    /// "let rayon pick", which defaults to the number of logical CPUs.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,

    /// Languages enabled for this run, keyed by `Language::config_key()`.
    #[serde(default = "default_enabled_languages")]
    pub enabled_languages: Vec<String>,

    /// Glob patterns excluded from file discovery.
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_false")]
    pub debug: bool,
    /// Overrides `RUST_LOG` style filtering when set; otherwise the
    /// environment variable takes precedence (logging.rs).
    pub filter: Option<String>,
}

fn default_max_ast_depth() -> usize {
    500
}
fn default_parallelism() -> usize {
    0
}
fn default_enabled_languages() -> Vec<String> {
    vec!["javascript".into(), "typescript".into(), "python".into(), "rust".into()]
}
fn default_ignore_patterns() -> Vec<String> {
    vec![
        "node_modules/**".into(),
        "target/**".into(),
        ".git/**".into(),
        "dist/**".into(),
        "build/**".into(),
    ]
}
fn default_false() -> bool {
    false
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_ast_depth: default_max_ast_depth(),
            parallelism: default_parallelism(),
            enabled_languages: default_enabled_languages(),
            ignore_patterns: default_ignore_patterns(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            debug: false,
            filter: None,
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Loads defaults, then `callweave.toml` in the current directory (if
    /// present), then `CALLWEAVE_`-prefixed environment variables.
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(PathBuf::from("callweave.toml"))
    }

    pub fn load_from(path: impl AsRef<std::path::Path>) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Serialized::defaults(AnalyzerConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("CALLWEAVE_").map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
            .extract()
    }

    pub fn resolved_parallelism(&self) -> usize {
        if self.analysis.parallelism == 0 {
            num_cpus::get()
        } else {
            self.analysis.parallelism
        }
    }

    pub fn is_language_enabled(&self, language: crate::parsing::Language) -> bool {
        self.analysis
            .enabled_languages
            .iter()
            .any(|l| l == language.config_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_enable_all_four_languages() {
        let cfg = AnalyzerConfig::default();
        assert_eq!(cfg.analysis.enabled_languages.len(), 4);
        assert_eq!(cfg.analysis.max_ast_depth, 500);
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("callweave.toml");
        fs::write(
            &path,
            r#"
[analysis]
max_ast_depth = 750
enabled_languages = ["rust"]

[logging]
debug = true
"#,
        )
        .unwrap();

        let cfg = AnalyzerConfig::load_from(&path).unwrap();
        assert_eq!(cfg.analysis.max_ast_depth, 750);
        assert_eq!(cfg.analysis.enabled_languages, vec!["rust"]);
        assert!(cfg.logging.debug);
        assert_eq!(cfg.analysis.parallelism, 0);
    }

    #[test]
    fn resolved_parallelism_defaults_to_cpu_count() {
        let cfg = AnalyzerConfig::default();
        assert_eq!(cfg.resolved_parallelism(), num_cpus::get());
    }
}
