use std::env;
use std::path::PathBuf;

use clap::Parser;
use log::{debug, error};

use crate::core::cli::Args;
use crate::core::cmds;
use crate::core::extractor::ReportSettings;
use crate::core::logging::init_logging;
use crate::core::runner::PitestRunner;
use crate::core::scraper::PitHtmlScraper;
use crate::types::config::{CliOverrides, config, init_with_overrides};
use crate::types::{AppError, AppResult, ReportError};

pub async fn run_main() -> AppResult<()> {
    let args = Args::parse();

    // Handle global arguments
    if let Some(cwd_arg) = args.cwd.as_ref() {
        let cwd = PathBuf::from(cwd_arg).canonicalize()?;
        env::set_current_dir(&cwd)?;
    }
    let cwd = env::current_dir()?;

    // Build CLI overrides for config precedence
    let cli_overrides = CliOverrides {
        log_level: args.log_level.clone(),
        log_color: args.log_color.clone(),
        pitest_cmd: args.pitest_cmd.clone(),
        reports_dir: args.reports_dir.clone(),
    };

    // Initialize configuration (file, then CLI overrides)
    init_with_overrides(&cli_overrides);

    // Initialize logging after config so level/color are applied
    init_logging();
    debug!("Current working directory: {}", cwd.display());

    if args.print_config {
        return cmds::execute_print_config(config(), args.format);
    }

    let options = args.report_options(config().report().sort());
    let settings = ReportSettings::from_config(config(), &cwd)?;
    let runner = PitestRunner::new(config().pitest().cmd())?;
    debug!("Reading reports from {}", settings.layout.root.display());

    let exit_code = match cmds::execute_report(options, settings, runner, PitHtmlScraper).await {
        Ok(()) => 0,
        Err(AppError::Report(err)) => {
            for line in abort_diagnostic(&err) {
                error!("{line}");
            }
            1
        }
        Err(err) => return Err(err),
    };

    // Exit with appropriate code
    if exit_code != 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}

/// Lines explaining why the report was abandoned and how to produce what was missing
fn abort_diagnostic(err: &ReportError) -> Vec<String> {
    let mut lines = vec![err.to_string()];
    if let Some(remediation) = err.remediation() {
        lines.push("Consider running the following command to remediate the problem:".to_string());
        lines.push(format!("        {remediation}"));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_report_diagnostic_names_the_command() {
        let err = ReportError::MissingReport {
            test_name: "BetaTest".to_string(),
            path: PathBuf::from("shop-pit-reports/BetaTest"),
            remediation: "pitest BetaTest".to_string(),
        };
        let lines = abort_diagnostic(&err);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("BetaTest"));
        assert_eq!(lines[2], "        pitest BetaTest");
    }

    #[test]
    fn malformed_row_has_no_remediation() {
        let err = ReportError::MalformedRow {
            class_name: "Alpha".to_string(),
            path: PathBuf::from("AlphaTest/202101011300/com.example/index.html"),
        };
        assert_eq!(abort_diagnostic(&err), vec![err.to_string()]);
    }
}
