use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{CONFIG_FILENAME, CONFIG_SECTION, PACKAGE_JSON_FILENAME};
use crate::options::{PartialOptions, Syntax};
use crate::rules::ImportRule;

#[derive(Debug, Deserialize, Default, Clone)]
/// Top-level configuration struct.
pub struct Config {
    #[serde(default)]
    /// The `[importshift]` section.
    pub importshift: ImportShiftConfig,
    /// The path to the configuration file this was loaded from.
    /// `None` if using defaults or programmatic config.
    #[serde(skip)]
    pub config_file_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default, Clone)]
/// Configuration options for importshift.
pub struct ImportShiftConfig {
    /// Source dialect.
    pub syntax: Option<Syntax>,
    /// Whether comments survive regeneration.
    #[serde(alias = "preserveComments")]
    pub preserve_comments: Option<bool>,
    /// Destination convention.
    pub target: Option<String>,
    /// Project rules, tried before the built-in presets.
    #[serde(default)]
    pub rules: Vec<ImportRule>,
}

impl ImportShiftConfig {
    /// Options layer contributed by the config file.
    #[must_use]
    pub fn options(&self) -> PartialOptions {
        PartialOptions {
            syntax: self.syntax,
            preserve_comments: self.preserve_comments,
            target: self.target.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PackageJson {
    importshift: Option<ImportShiftConfig>,
}

impl Config {
    /// Loads configuration from the current directory upward.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from_path(Path::new("."))
    }

    /// Loads configuration starting from a specific path and traversing up.
    ///
    /// In each directory `.importshift.toml` wins over `package.json`.
    /// Files that fail to parse are skipped.
    #[must_use]
    pub fn load_from_path(path: &Path) -> Self {
        let mut current = path.to_path_buf();
        if current.is_file() {
            current.pop();
        }

        loop {
            for candidate in [CONFIG_FILENAME, PACKAGE_JSON_FILENAME] {
                let file = current.join(candidate);
                if !file.is_file() {
                    continue;
                }
                match Self::read_candidate(&file) {
                    Ok(Some(config)) => return config,
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(path = %file.display(), error = %format!("{e:#}"), "skipping config file");
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        Config::default()
    }

    /// Loads one explicit file (`.toml` or `package.json`).
    pub fn load_file(path: &Path) -> Result<Self> {
        Self::read_candidate(path)?.with_context(|| {
            format!(
                "{} has no \"{CONFIG_SECTION}\" section",
                path.display()
            )
        })
    }

    /// `Ok(None)` when the file parses but carries no importshift section.
    fn read_candidate(path: &Path) -> Result<Option<Self>> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let section = if path.extension().is_some_and(|ext| ext == "json") {
            let manifest: PackageJson = serde_json::from_str(&content)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            manifest.importshift
        } else {
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            Some(config.importshift)
        };

        Ok(section.map(|importshift| Config {
            importshift,
            config_file_path: Some(path.to_path_buf()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::MatchKind;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_path_no_config() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from_path(dir.path());
        assert!(config.importshift.target.is_none());
        assert!(config.importshift.rules.is_empty());
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_load_from_path_toml() {
        let dir = TempDir::new().unwrap();
        let mut file = std::fs::File::create(dir.path().join(".importshift.toml")).unwrap();
        writeln!(
            file,
            r#"[importshift]
target = "react-vite"
syntax = "tsx"

[[importshift.rules]]
from = "old-lib"
to = "new-lib"
"#
        )
        .unwrap();

        let config = Config::load_from_path(dir.path());
        assert_eq!(config.importshift.target.as_deref(), Some("react-vite"));
        assert_eq!(config.importshift.syntax, Some(Syntax::Tsx));
        assert_eq!(config.importshift.rules.len(), 1);
        assert_eq!(config.importshift.rules[0].match_kind, MatchKind::Exact);
    }

    #[test]
    fn test_load_from_path_package_json() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("package.json"),
            r#"{
  "name": "app",
  "importshift": {
    "preserveComments": false,
    "rules": [{ "from": "lodash", "to": "lodash-es", "match": "prefix" }]
  }
}"#,
        )
        .unwrap();

        let config = Config::load_from_path(dir.path());
        assert_eq!(config.importshift.preserve_comments, Some(false));
        assert_eq!(config.importshift.rules[0].match_kind, MatchKind::Prefix);
    }

    #[test]
    fn test_toml_wins_over_package_json() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("package.json"),
            r#"{"importshift": {"target": "from-json"}}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join(".importshift.toml"),
            "[importshift]\ntarget = \"from-toml\"\n",
        )
        .unwrap();

        let config = Config::load_from_path(dir.path());
        assert_eq!(config.importshift.target.as_deref(), Some("from-toml"));
    }

    #[test]
    fn test_package_json_without_section_keeps_searching() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("packages").join("web");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("package.json"), r#"{"name": "web"}"#).unwrap();
        std::fs::write(
            dir.path().join(".importshift.toml"),
            "[importshift]\ntarget = \"root\"\n",
        )
        .unwrap();

        let config = Config::load_from_path(&nested);
        assert_eq!(config.importshift.target.as_deref(), Some("root"));
        assert_eq!(
            config.config_file_path,
            Some(dir.path().join(".importshift.toml"))
        );
    }

    #[test]
    fn test_malformed_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("src");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join(".importshift.toml"), "[importshift\n").unwrap();
        std::fs::write(
            dir.path().join(".importshift.toml"),
            "[importshift]\ntarget = \"outer\"\n",
        )
        .unwrap();

        let config = Config::load_from_path(&nested);
        assert_eq!(config.importshift.target.as_deref(), Some("outer"));
    }

    #[test]
    fn test_load_from_file_path() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(".importshift.toml"),
            "[importshift]\ntarget = \"react-vite\"\n",
        )
        .unwrap();
        let source_file = dir.path().join("index.ts");
        std::fs::write(&source_file, "export {};").unwrap();

        let config = Config::load_from_path(&source_file);
        assert_eq!(config.importshift.target.as_deref(), Some("react-vite"));
    }

    #[test]
    fn test_load_file_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load_file(&missing).is_err());

        let manifest = dir.path().join("package.json");
        std::fs::write(&manifest, r#"{"name": "x"}"#).unwrap();
        let err = Config::load_file(&manifest).unwrap_err();
        assert!(err.to_string().contains("no \"importshift\" section"));
    }

    #[test]
    fn test_options_layer() {
        let config = ImportShiftConfig {
            target: Some("node-esm".to_owned()),
            ..ImportShiftConfig::default()
        };
        let options = config.options();
        assert_eq!(options.target.as_deref(), Some("node-esm"));
        assert!(options.syntax.is_none());
    }
}
