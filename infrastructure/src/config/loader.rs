//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["aicore.toml", ".aicore.toml"];
const ENV_PREFIX: &str = "AICORE_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `AICORE_` environment variables, `__` separating sections
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./aicore.toml` or `./.aicore.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/sap-aicore/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::files(Self::global_config_path(), Path::new("."), config_path)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)
    }

    /// Load from files only, resolving the project file against `project_dir`.
    ///
    /// Environment variables and the global file are ignored.
    pub fn load_from(
        project_dir: &Path,
        config_path: Option<&PathBuf>,
    ) -> Result<FileConfig, Box<figment::Error>> {
        Self::files(None, project_dir, config_path)
            .extract()
            .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    fn files(global: Option<PathBuf>, project_dir: &Path, config_path: Option<&PathBuf>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = global
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_in(project_dir) {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/sap-aicore/config.toml if set,
    /// otherwise the platform config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("sap-aicore").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        Self::project_config_in(Path::new("."))
    }

    fn project_config_in(dir: &Path) -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Describe the config sources being used (for debugging)
    pub fn describe_sources() -> Vec<String> {
        let mut lines = vec!["Configuration sources (in priority order):".to_string()];

        lines.push(format!("  [ENV  ] {}* (sections split by __)", ENV_PREFIX));

        match Self::project_config_path() {
            Some(path) => lines.push(format!("  [FOUND] Project: {}", path.display())),
            None => lines.push("  [     ] Project: ./aicore.toml or ./.aicore.toml".to_string()),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            lines.push(format!("  [{}] Global:  {}", mark, path.display()));
        }

        lines.push("  [     ] Default: built-in defaults".to_string());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert!(config.credentials.client_id.is_none());
        assert!(config.tools.enforce_unique_names);
        assert!(config.telemetry.enabled);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        // Should return a path (even if file doesn't exist)
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("sap-aicore"));
    }

    #[test]
    fn test_project_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(".aicore.toml"),
            "[deployment]\nid = \"d-project\"\n\n[tools]\nmax_rounds = 4\n",
        )
        .unwrap();

        let config = ConfigLoader::load_from(dir.path(), None).unwrap();
        assert_eq!(config.deployment.id.as_deref(), Some("d-project"));
        assert_eq!(config.tools.max_rounds, 4);
        // Untouched sections keep their defaults
        assert!(config.tools.convert_native_tools);
    }

    #[test]
    fn test_explicit_file_overrides_project_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("aicore.toml"),
            "[deployment]\nid = \"d-project\"\nmodel = \"gpt-4o\"\n",
        )
        .unwrap();
        let explicit = dir.path().join("explicit.toml");
        fs::write(&explicit, "[deployment]\nid = \"d-explicit\"\n").unwrap();

        let config = ConfigLoader::load_from(dir.path(), Some(&explicit)).unwrap();
        assert_eq!(config.deployment.id.as_deref(), Some("d-explicit"));
        assert_eq!(config.deployment.model.as_deref(), Some("gpt-4o"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("aicore.toml"), "[tools]\nmax_rounds = \"many\"\n").unwrap();

        assert!(ConfigLoader::load_from(dir.path(), None).is_err());
    }

    #[test]
    fn test_describe_sources_lists_env_prefix() {
        let lines = ConfigLoader::describe_sources();
        assert!(lines.iter().any(|l| l.contains("AICORE_")));
    }
}
