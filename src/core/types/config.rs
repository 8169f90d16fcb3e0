use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::warn;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::types::SortKey;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct LogConfig {
    pub level: Option<String>,
    pub color: Option<bool>, // None = auto-detect (semantic)
}

impl LogConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    pub fn color(&self) -> Option<bool> {
        self.color // None has semantic meaning (auto-detect)
    }

    pub fn to_effective(&self) -> Self {
        Self {
            level: Some(self.level().to_string()),
            color: self.color,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PitestConfig {
    pub cmd: Option<String>,
    pub reports_dir: Option<String>, // None = derived from the cwd name (semantic)
}

impl PitestConfig {
    pub fn cmd(&self) -> &str {
        self.cmd.as_deref().unwrap_or("pitest")
    }

    pub fn reports_dir(&self) -> Option<&str> {
        self.reports_dir.as_deref()
    }

    pub fn to_effective(&self) -> Self {
        Self {
            cmd: Some(self.cmd().to_string()),
            reports_dir: self.reports_dir.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SourceConfig {
    pub root: Option<String>,
    pub extension: Option<String>,
    pub test_suffix: Option<String>,
    pub equivalence_marker: Option<String>,
    pub ignore_file: Option<String>,
}

impl SourceConfig {
    pub fn root(&self) -> &str {
        self.root.as_deref().unwrap_or("src/main/java")
    }

    pub fn extension(&self) -> &str {
        self.extension.as_deref().unwrap_or("java")
    }

    pub fn test_suffix(&self) -> &str {
        self.test_suffix.as_deref().unwrap_or("Test")
    }

    pub fn equivalence_marker(&self) -> &str {
        self.equivalence_marker.as_deref().unwrap_or(r"//\s+EQMU:")
    }

    pub fn ignore_file(&self) -> &str {
        self.ignore_file.as_deref().unwrap_or("pitest.ignore")
    }

    pub fn to_effective(&self) -> Self {
        Self {
            root: Some(self.root().to_string()),
            extension: Some(self.extension().to_string()),
            test_suffix: Some(self.test_suffix().to_string()),
            equivalence_marker: Some(self.equivalence_marker().to_string()),
            ignore_file: Some(self.ignore_file().to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ReportConfig {
    pub sort: Option<String>,
}

impl ReportConfig {
    /// Sort key from the config file; unknown keys fall back to the default
    pub fn sort(&self) -> SortKey {
        match self.sort.as_deref() {
            Some(key) => SortKey::from_str(key.trim()).unwrap_or_else(|_| {
                warn!("Unknown sort key '{key}' in config; using the default");
                SortKey::default()
            }),
            None => SortKey::default(),
        }
    }

    pub fn to_effective(&self) -> Self {
        Self {
            sort: Some(self.sort().to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    pub log: Option<LogConfig>,
    pub pitest: Option<PitestConfig>,
    pub source: Option<SourceConfig>,
    pub report: Option<ReportConfig>,
}

impl Config {
    pub fn log(&self) -> LogConfig {
        self.log.clone().unwrap_or_default()
    }

    pub fn pitest(&self) -> PitestConfig {
        self.pitest.clone().unwrap_or_default()
    }

    pub fn source(&self) -> SourceConfig {
        self.source.clone().unwrap_or_default()
    }

    pub fn report(&self) -> ReportConfig {
        self.report.clone().unwrap_or_default()
    }

    pub fn to_effective(&self) -> Self {
        Self {
            log: Some(self.log().to_effective()),
            pitest: Some(self.pitest().to_effective()),
            source: Some(self.source().to_effective()),
            report: Some(self.report().to_effective()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub log_level: Option<String>,
    pub log_color: Option<String>, // "on" | "off"
    pub pitest_cmd: Option<String>,
    pub reports_dir: Option<String>,
}

pub const CONFIG_FILENAME: &str = "sharpen.toml";

static CONFIG: OnceCell<Config> = OnceCell::new();

pub fn config() -> &'static Config {
    CONFIG.get_or_init(|| {
        let mut cfg = Config::default();
        if let Some(path) = find_nearest_config_file()
            && let Some(file_cfg) = read_config_file(&path)
        {
            apply_file_config(&mut cfg, &file_cfg);
        }
        cfg
    })
}

pub fn init_with_overrides(overrides: &CliOverrides) {
    let _ = CONFIG.set(load_with_overrides(overrides));
}

/// Build a config from the nearest config file and the CLI, without touching the global
pub fn load_with_overrides(overrides: &CliOverrides) -> Config {
    let mut cfg = Config::default();

    // 1) Config file: walk up from cwd and use the first config file found
    if let Some(path) = find_nearest_config_file()
        && let Some(file_cfg) = read_config_file(&path)
    {
        apply_file_config(&mut cfg, &file_cfg);
    }

    // 2) CLI arguments (highest priority). Only override if user specified.
    apply_cli_overrides(&mut cfg, overrides);

    cfg
}

fn read_config_file(path: &Path) -> Option<Config> {
    match fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<Config>(&contents) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                // Logging is not up yet at this point
                eprintln!("Ignoring malformed {}: {e}", path.display());
                None
            }
        },
        Err(_) => None,
    }
}

fn apply_file_config(cfg: &mut Config, file: &Config) {
    if let Some(file_log) = &file.log {
        let mut log = cfg.log.clone().unwrap_or_default();
        if file_log.level.is_some() {
            log.level = file_log.level.clone();
        }
        if file_log.color.is_some() {
            log.color = file_log.color;
        }
        cfg.log = Some(log);
    }

    if let Some(file_pitest) = &file.pitest {
        let mut pitest = cfg.pitest.clone().unwrap_or_default();
        if file_pitest.cmd.as_ref().is_some_and(|c| !c.trim().is_empty()) {
            pitest.cmd = file_pitest.cmd.clone();
        }
        if file_pitest.reports_dir.is_some() {
            pitest.reports_dir = file_pitest.reports_dir.clone();
        }
        cfg.pitest = Some(pitest);
    }

    if let Some(file_source) = &file.source {
        let mut source = cfg.source.clone().unwrap_or_default();
        if file_source.root.is_some() {
            source.root = file_source.root.clone();
        }
        if file_source.extension.is_some() {
            source.extension = file_source.extension.clone();
        }
        if file_source.test_suffix.is_some() {
            source.test_suffix = file_source.test_suffix.clone();
        }
        if file_source.equivalence_marker.is_some() {
            source.equivalence_marker = file_source.equivalence_marker.clone();
        }
        if file_source.ignore_file.is_some() {
            source.ignore_file = file_source.ignore_file.clone();
        }
        cfg.source = Some(source);
    }

    if let Some(file_report) = &file.report {
        if file_report.sort.is_some() {
            cfg.report = Some(file_report.clone());
        }
    }
}

fn apply_cli_overrides(cfg: &mut Config, overrides: &CliOverrides) {
    // Log overrides
    let mut log = cfg.log.clone().unwrap_or_default();
    if let Some(level) = &overrides.log_level
        && !level.trim().is_empty()
    {
        log.level = Some(level.trim().to_string());
    }
    if let Some(color_str) = &overrides.log_color {
        match color_str.to_lowercase().as_str() {
            "on" => log.color = Some(true),
            "off" => log.color = Some(false),
            _ => {}
        }
    }
    if overrides.log_level.is_some() || overrides.log_color.is_some() {
        cfg.log = Some(log);
    }

    // Pitest overrides
    let mut pitest = cfg.pitest.clone().unwrap_or_default();
    if let Some(cmd) = &overrides.pitest_cmd
        && !cmd.trim().is_empty()
    {
        pitest.cmd = Some(cmd.clone());
    }
    if overrides.reports_dir.is_some() {
        pitest.reports_dir = overrides.reports_dir.clone();
    }
    if overrides.pitest_cmd.is_some() || overrides.reports_dir.is_some() {
        cfg.pitest = Some(pitest);
    }
}

fn find_nearest_config_file() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    for dir in cwd.ancestors() {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
    }
    None
}

pub fn colors_enabled() -> bool {
    match config().log().color() {
        Some(force) => force,
        None => console::colors_enabled(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_a_plain_maven_layout() {
        let cfg = Config::default();
        assert_eq!(cfg.pitest().cmd(), "pitest");
        assert_eq!(cfg.source().root(), "src/main/java");
        assert_eq!(cfg.source().test_suffix(), "Test");
        assert_eq!(cfg.source().ignore_file(), "pitest.ignore");
        assert_eq!(cfg.report().sort(), SortKey::SurvivorsAscending);
        assert_eq!(cfg.log().level(), "info");
    }

    #[test]
    fn file_values_are_merged_section_by_section() {
        let file: Config = toml::from_str(
            r#"
            [pitest]
            cmd = "mvn -q pitest"

            [source]
            extension = "kt"

            [report]
            sort = "p"
            "#,
        )
        .unwrap();
        let mut cfg = Config::default();
        apply_file_config(&mut cfg, &file);
        assert_eq!(cfg.pitest().cmd(), "mvn -q pitest");
        assert_eq!(cfg.source().extension(), "kt");
        assert_eq!(cfg.source().root(), "src/main/java");
        assert_eq!(cfg.report().sort(), SortKey::PercentageDescending);
    }

    #[test]
    fn cli_overrides_win_over_file_values() {
        let mut cfg = Config {
            pitest: Some(PitestConfig {
                cmd: Some("pitest".to_string()),
                reports_dir: Some("../a".to_string()),
            }),
            ..Config::default()
        };
        apply_cli_overrides(
            &mut cfg,
            &CliOverrides {
                log_level: Some(" debug ".to_string()),
                log_color: Some("OFF".to_string()),
                pitest_cmd: Some("./pit.sh".to_string()),
                reports_dir: None,
            },
        );
        assert_eq!(cfg.pitest().cmd(), "./pit.sh");
        assert_eq!(cfg.pitest().reports_dir(), Some("../a"));
        assert_eq!(cfg.log().level(), "debug");
        assert_eq!(cfg.log().color(), Some(false));
    }

    #[test]
    fn blank_cli_command_keeps_the_configured_one() {
        let mut cfg = Config::default();
        apply_cli_overrides(
            &mut cfg,
            &CliOverrides {
                pitest_cmd: Some("   ".to_string()),
                ..CliOverrides::default()
            },
        );
        assert_eq!(cfg.pitest().cmd(), "pitest");
    }
}
