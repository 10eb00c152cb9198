use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::HdlDocError;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "hdldoc.toml";

const DEFAULT_INSTANCE_PREFIX: &str = "u_";

const DEFAULT_WAVEDROM_SCRIPTS: &[&str] = &[
    "https://cdnjs.cloudflare.com/ajax/libs/wavedrom/3.1.0/skins/default.js",
    "https://cdnjs.cloudflare.com/ajax/libs/wavedrom/3.1.0/wavedrom.min.js",
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Testbench template; the built-in one is used when unset.
    #[serde(default)]
    pub testbench_template: Option<PathBuf>,

    /// Documentation page template; the built-in one is used when unset.
    #[serde(default)]
    pub html_template: Option<PathBuf>,

    #[serde(default = "default_instance_prefix")]
    pub instance_prefix: String,

    #[serde(default = "default_wavedrom_scripts")]
    pub wavedrom_scripts: Vec<String>,
}

fn default_instance_prefix() -> String {
    DEFAULT_INSTANCE_PREFIX.to_string()
}

fn default_wavedrom_scripts() -> Vec<String> {
    DEFAULT_WAVEDROM_SCRIPTS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            testbench_template: None,
            html_template: None,
            instance_prefix: default_instance_prefix(),
            wavedrom_scripts: default_wavedrom_scripts(),
        }
    }
}

impl Config {
    pub fn from_toml(path: &Path, content: &str) -> Result<Self, HdlDocError> {
        toml::from_str(content).map_err(|e| HdlDocError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Read an explicitly requested configuration file. A missing file is an error.
    pub fn load(path: &Path) -> Result<Self, HdlDocError> {
        let content = std::fs::read_to_string(path).map_err(|e| HdlDocError::io(path, e))?;
        let config = Self::from_toml(path, &content)?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `hdldoc.toml` from `dir` if it exists, defaults otherwise.
    pub fn discover(dir: &Path) -> Result<Self, HdlDocError> {
        let path = dir.join(DEFAULT_CONFIG_FILE);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Explicit path when given, otherwise discovery in the working directory.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, HdlDocError> {
        match explicit {
            Some(path) => Self::load(path),
            None => Self::discover(Path::new(".")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml(Path::new("hdldoc.toml"), "").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.instance_prefix, "u_");
        assert_eq!(config.wavedrom_scripts.len(), 2);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::from_toml(Path::new("hdldoc.toml"), "prefix = \"i_\"").unwrap_err();
        assert!(matches!(err, HdlDocError::Config { .. }));
    }

    #[test]
    fn fields_are_read() {
        let config = Config::from_toml(
            Path::new("hdldoc.toml"),
            "testbench_template = \"tb.v\"\ninstance_prefix = \"inst_\"\nwavedrom_scripts = []\n",
        )
        .unwrap();
        assert_eq!(config.testbench_template, Some(PathBuf::from("tb.v")));
        assert_eq!(config.html_template, None);
        assert_eq!(config.instance_prefix, "inst_");
        assert!(config.wavedrom_scripts.is_empty());
    }
}
