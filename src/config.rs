use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use cross_xdg::BaseDirs;
use serde::Deserialize;

use crate::codegen::{TargetKind, DEFAULT_INDENT};

/// Settings read from `bfc.toml` in the user's config directory.
///
/// ```toml
/// [run]
/// max_steps = 10000000
///
/// [codegen]
/// target = "rust"
/// indent = 2
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub run: RunConfig,
    pub codegen: CodegenConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub max_steps: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CodegenConfig {
    pub target: TargetKind,
    pub indent: usize,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            target: TargetKind::default(),
            indent: DEFAULT_INDENT,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// The user's config, loaded once. A missing or broken file falls back to
/// defaults; a broken one is logged.
pub fn config() -> &'static Config {
    CONFIG.get_or_init(|| {
        let Some(path) = config_path() else {
            return Config::default();
        };
        if !path.exists() {
            return Config::default();
        }
        match load_from(&path) {
            Ok(cfg) => {
                tracing::debug!(path = %path.display(), "loaded config");
                cfg
            }
            Err(e) => {
                tracing::warn!("{e}; using defaults");
                Config::default()
            }
        }
    })
}

/// `$XDG_CONFIG_HOME/bfc.toml`, or the platform equivalent.
pub fn config_path() -> Option<PathBuf> {
    // On Linux: resolves to /home/<user>/.config
    // On Windows: resolves to C:\Users\<user>\.config
    // On macOS: resolves to /Users/<user>/.config
    let base_dirs = BaseDirs::new().ok()?;
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push("bfc.toml");
    Some(path)
}

pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(content)
}

/// Resolve the step limit: flag -> `BFC_MAX_STEPS` -> config file -> unlimited.
pub fn resolve_max_steps(flag: Option<usize>) -> Option<usize> {
    flag.or_else(|| env_usize("BFC_MAX_STEPS"))
        .or(config().run.max_steps)
}

/// Resolve the codegen indent: flag -> `BFC_INDENT` -> config file -> 4.
pub fn resolve_indent(flag: Option<usize>) -> usize {
    flag.or_else(|| env_usize("BFC_INDENT"))
        .unwrap_or(config().codegen.indent)
}

/// Resolve the codegen target: flag -> config file -> C.
pub fn resolve_target(flag: Option<TargetKind>) -> TargetKind {
    flag.unwrap_or(config().codegen.target)
}

fn env_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|s| s.parse::<usize>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = parse("").expect("empty config parses");
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.codegen.indent, 4);
        assert_eq!(cfg.codegen.target, TargetKind::C);
        assert_eq!(cfg.run.max_steps, None);
    }

    #[test]
    fn reads_all_sections() {
        let cfg = parse(
            r#"
            [run]
            max_steps = 500

            [codegen]
            target = "rust"
            indent = 2
            "#,
        )
        .expect("config parses");
        assert_eq!(cfg.run.max_steps, Some(500));
        assert_eq!(cfg.codegen.target, TargetKind::Rust);
        assert_eq!(cfg.codegen.indent, 2);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let cfg = parse("[codegen]\nindent = 8\n").expect("config parses");
        assert_eq!(cfg.codegen.indent, 8);
        assert_eq!(cfg.codegen.target, TargetKind::C);
    }

    #[test]
    fn unknown_target_is_rejected() {
        assert!(parse("[codegen]\ntarget = \"cobol\"\n").is_err());
    }

    #[test]
    fn load_from_reports_path() {
        let mut tf = tempfile::NamedTempFile::new().expect("tempfile");
        write!(tf, "[run]\nmax_steps = \"lots\"\n").unwrap();
        let err = load_from(tf.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(&tf.path().display().to_string()));
    }
}
