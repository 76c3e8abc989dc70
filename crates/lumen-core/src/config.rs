use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global user configuration loaded from `~/.lumen/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub compiler: CompilerConfig,
}

/// Build settings from `[build]` in global config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Worker thread count for parallel compilation.
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            jobs: default_jobs(),
        }
    }
}

fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Compiler settings from `[compiler]` in global config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Overrides the compiler binary for every project on this machine.
    #[serde(default)]
    pub binary: Option<PathBuf>,
}

impl GlobalConfig {
    /// Load the global configuration, or return defaults if the file
    /// doesn't exist.
    pub fn load() -> miette::Result<Self> {
        Self::load_from(&Self::default_path())
    }

    pub fn load_from(path: &PathBuf) -> miette::Result<Self> {
        if path.is_file() {
            let content = std::fs::read_to_string(path).map_err(|e| {
                lumen_util::errors::BuildError::Generic {
                    message: format!("Failed to read global config: {e}"),
                }
            })?;
            toml::from_str(&content).map_err(|e| {
                lumen_util::errors::BuildError::Generic {
                    message: format!("Failed to parse global config: {e}"),
                }
                .into()
            })
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default path to the global config file.
    pub fn default_path() -> PathBuf {
        lumen_util::home_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_file_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = GlobalConfig::load_from(&tmp.path().join("config.toml")).unwrap();
        assert!(cfg.build.jobs >= 1);
        assert!(cfg.compiler.binary.is_none());
    }

    #[test]
    fn parses_overrides() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[build]\njobs = 2\n\n[compiler]\nbinary = \"/opt/lumenc\"\n")
            .unwrap();
        let cfg = GlobalConfig::load_from(&path).unwrap();
        assert_eq!(cfg.build.jobs, 2);
        assert_eq!(cfg.compiler.binary, Some(PathBuf::from("/opt/lumenc")));
    }
}
