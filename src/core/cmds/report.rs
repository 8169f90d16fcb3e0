use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, info};

use crate::core::extractor::{Extractor, ReportSettings};
use crate::core::ignore::IgnoreMap;
use crate::core::locator::{PackageIndex, latest_report_dir};
use crate::core::logging::attach_progress;
use crate::core::runner::{MutationRunner, RunScope};
use crate::core::scraper::CoverageScraper;
use crate::core::summary::Summary;
use crate::types::{AppResult, ClassCoverage, CoverageTotals, OutputFormat, ReportOptions};

pub const NO_CLASSES: &str = "No classes found in the reports, or no reports generated.";

/// Generate (unless report-only) and summarize per-class mutation coverage.
///
/// Returns `None` when the reports list no classes at all.
pub async fn build_summary<R: MutationRunner, S: CoverageScraper>(
    options: &ReportOptions,
    settings: &ReportSettings,
    runner: &R,
    scraper: &S,
) -> AppResult<Option<Summary>> {
    if !options.report_only {
        debug!("Running {}", runner.command_line(&RunScope::Project));
        runner.run(&RunScope::Project).await?;
    }

    let Some(project_report) = latest_report_dir(&settings.layout.root)? else {
        debug!("No reports under {}", settings.layout.root.display());
        return Ok(None);
    };
    let index = PackageIndex::scan(
        &project_report,
        &settings.layout,
        options.package_filter.as_deref(),
    )?;
    if index.is_empty() {
        return Ok(None);
    }
    debug!(
        "Found {} classes in {} packages",
        index.len(),
        index.packages().len()
    );

    let ignore = IgnoreMap::load(&settings.ignore_file)?;
    let extractor = Extractor {
        settings,
        ignore: &ignore,
        runner,
        scraper,
        report_only: options.report_only,
    };

    let progress = progress_bar(index.len() as u64, options.report_only);
    let collected = {
        let _attached = attach_progress(&progress);
        collect(&extractor, &index, &progress).await
    };
    progress.finish_and_clear();

    Ok(Some(Summary::build(
        collected?,
        options.sort_key,
        options.survivors_only,
    )))
}

async fn collect<R: MutationRunner, S: CoverageScraper>(
    extractor: &Extractor<'_, R, S>,
    index: &PackageIndex,
    progress: &ProgressBar,
) -> AppResult<Vec<ClassCoverage>> {
    let mut classes = Vec::with_capacity(index.len());
    for (class_name, package) in index.classes() {
        progress.set_message(class_name.to_string());
        if let Some(coverage) = extractor.extract(class_name, package).await? {
            classes.push(coverage);
        }
        progress.inc(1);
    }
    Ok(classes)
}

fn progress_bar(len: u64, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::stderr());
    if let Ok(style) = ProgressStyle::with_template("{spinner} [{pos}/{len}] {wide_msg}") {
        bar.set_style(style);
    }
    bar
}

/// Print the summary as a table through the logger, or as JSON on stdout
pub async fn execute_report<R: MutationRunner, S: CoverageScraper>(
    options: ReportOptions,
    settings: ReportSettings,
    runner: R,
    scraper: S,
) -> AppResult<()> {
    let summary = build_summary(&options, &settings, &runner, &scraper).await?;

    match options.format {
        OutputFormat::Json => println!("{}", render_json(summary.as_ref())?),
        OutputFormat::Table => {
            for line in render_table(summary.as_ref()) {
                info!("{line}");
            }
        }
    }

    Ok(())
}

/// Table lines, or the notice printed when the reports list no classes
pub fn render_table(summary: Option<&Summary>) -> Vec<String> {
    match summary {
        Some(summary) => summary.table_lines(),
        None => vec![NO_CLASSES.to_string()],
    }
}

/// `{"classes": [...], "totals": {...}}`, with an empty document when nothing was found
pub fn render_json(summary: Option<&Summary>) -> AppResult<String> {
    let json = match summary {
        Some(summary) => serde_json::to_string_pretty(summary)?,
        None => serde_json::to_string_pretty(&Summary {
            classes: vec![],
            totals: CoverageTotals::default(),
        })?,
    };
    Ok(json)
}
