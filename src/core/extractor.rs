use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::core::ignore::{EquivalenceMarker, IgnoreMap, source_path};
use crate::core::locator::{ReportLayout, latest_report_dir};
use crate::core::runner::{MutationRunner, RunScope};
use crate::core::scraper::CoverageScraper;
use crate::types::config::Config;
use crate::types::{AppResult, ClassCoverage, ReportError};

/// Paths and conventions that locate reports and sources for a project
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub layout: ReportLayout,
    pub source_root: PathBuf,
    pub test_suffix: String,
    pub ignore_file: PathBuf,
    pub marker: EquivalenceMarker,
}

impl ReportSettings {
    /// Resolve the effective config against the project directory
    pub fn from_config(cfg: &Config, project_dir: &Path) -> AppResult<Self> {
        let pitest = cfg.pitest();
        let source = cfg.source();
        let reports_root = match pitest.reports_dir() {
            Some(dir) => project_dir.join(dir),
            None => project_dir.join(ReportLayout::default_root(project_dir)),
        };
        Ok(Self {
            layout: ReportLayout::new(reports_root, source.extension()),
            source_root: project_dir.join(source.root()),
            test_suffix: source.test_suffix().to_string(),
            ignore_file: project_dir.join(source.ignore_file()),
            marker: EquivalenceMarker::new(source.equivalence_marker())?,
        })
    }

    pub fn test_name(&self, class_name: &str) -> String {
        format!("{class_name}{}", self.test_suffix)
    }
}

/// Produces the coverage of one class from its dedicated test report
pub struct Extractor<'a, R, S> {
    pub settings: &'a ReportSettings,
    pub ignore: &'a IgnoreMap,
    pub runner: &'a R,
    pub scraper: &'a S,
    pub report_only: bool,
}

impl<R: MutationRunner, S: CoverageScraper> Extractor<'_, R, S> {
    /// `Ok(None)` when the report has no row for the class.
    ///
    /// A missing report, a malformed row or an unreadable source file aborts the run.
    pub async fn extract(&self, class_name: &str, package: &str) -> AppResult<Option<ClassCoverage>> {
        let test_name = self.settings.test_name(class_name);
        let scope = RunScope::TestClass(test_name.clone());
        if !self.report_only {
            self.runner.run(&scope).await?;
        }

        let missing = |path: PathBuf| ReportError::MissingReport {
            test_name: test_name.clone(),
            path,
            remediation: self.runner.command_line(&scope),
        };

        let family = self.settings.layout.test_family(&test_name);
        let Some(report_dir) = latest_report_dir(&family)? else {
            return Err(missing(family).into());
        };
        let fragment_path = self.settings.layout.fragment_path(&report_dir, package);
        if !fragment_path.is_file() {
            return Err(missing(fragment_path).into());
        }
        let fragment = fs::read_to_string(&fragment_path)?;

        let extension = &self.settings.layout.extension;
        let file_name = format!("{class_name}.{extension}");
        let fraction = match self.scraper.scrape(&fragment, &file_name) {
            Ok(Some(fraction)) => fraction,
            Ok(None) => {
                warn!(
                    "No row for {file_name} in {}; skipping {class_name}",
                    fragment_path.display()
                );
                return Ok(None);
            }
            Err(_) => {
                return Err(ReportError::MalformedRow {
                    class_name: class_name.to_string(),
                    path: fragment_path,
                }
                .into());
            }
        };

        let source = source_path(&self.settings.source_root, package, class_name, extension);
        let equivalent = self.settings.marker.count_in_file(&source)?;
        let credited = self.ignore.credit(class_name);
        let killed = fraction
            .killed
            .saturating_add(equivalent)
            .saturating_add(credited);
        debug!(
            "{class_name}: {}/{} killed, {equivalent} equivalent, {credited} ignored",
            fraction.killed, fraction.total
        );

        let coverage = ClassCoverage::new(class_name, killed, fraction.total);
        if coverage.is_over_credited() {
            warn!(
                "{class_name} is credited with {killed} killed mutants out of {}; check {}",
                fraction.total,
                self.settings.ignore_file.display()
            );
        }
        Ok(Some(coverage))
    }
}
