use std::path::{Path, PathBuf};
use std::result::Result as StdResult;
use std::time::Duration;

use anyhow::Context as _;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip)]
    pub source_config_file: Option<PathBuf>,
    pub grading: GradingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GradingConfig {
    /// Wall-clock bound for every external command.
    pub timeout_secs: u64,
    pub report_filename: String,
    pub submissions_dirname: String,
    /// Relative to each submission's working tree.
    pub tests_dir: PathBuf,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            report_filename: "grades.csv".to_owned(),
            submissions_dirname: "submissions".to_owned(),
            tests_dir: PathBuf::from("../../tests"),
        }
    }
}

impl GradingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    pub const FILENAME: &str = "pagrade.toml";

    pub fn from_toml(s: &str) -> StdResult<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn from_toml_file(filepath: PathBuf) -> anyhow::Result<Self> {
        let toml = fsutil::read_to_string(&filepath).context("Cannot read a file")?;
        let mut cfg = Self::from_toml(&toml)
            .with_context(|| format!("Invalid config TOML: {:?}", filepath))?;
        cfg.source_config_file = Some(filepath);
        Ok(cfg)
    }

    /// Find config file in ancestor dirs, including current dir.
    pub fn find_file_in_ancestors(cur_dir: impl AsRef<Path>) -> Option<PathBuf> {
        cur_dir
            .as_ref()
            .ancestors()
            .map(|dir| dir.join(Self::FILENAME))
            .find(|path| path.is_file())
    }

    /// Defaults apply when no config file is found.
    pub fn load(cur_dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        match Self::find_file_in_ancestors(cur_dir) {
            Some(path) => Self::from_toml_file(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let cfg = Config::from_toml("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.grading.timeout(), Duration::from_secs(30));
        assert_eq!(cfg.grading.report_filename, "grades.csv");
        assert_eq!(cfg.grading.tests_dir, Path::new("../../tests"));
    }

    #[test]
    fn partial_override() {
        let cfg = Config::from_toml(
            r#"
            [grading]
            timeout_secs = 120
            tests_dir = "/srv/cs164/tests"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.grading.timeout_secs, 120);
        assert_eq!(cfg.grading.tests_dir, Path::new("/srv/cs164/tests"));
        assert_eq!(cfg.grading.submissions_dirname, "submissions");
    }

    #[test]
    fn unknown_value_type_is_rejected() {
        assert!(Config::from_toml("[grading]\ntimeout_secs = \"soon\"").is_err());
    }

    #[test]
    fn found_in_ancestors() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("pa1").join("submissions");
        std::fs::create_dir_all(&nested).unwrap();
        assert_eq!(Config::load(&nested).unwrap(), Config::default());

        std::fs::write(
            tmp.path().join(Config::FILENAME),
            "[grading]\nreport_filename = \"out.csv\"\n",
        )
        .unwrap();
        let cfg = Config::load(&nested).unwrap();
        assert_eq!(cfg.grading.report_filename, "out.csv");
        assert_eq!(
            cfg.source_config_file,
            Some(tmp.path().join(Config::FILENAME))
        );
    }
}
