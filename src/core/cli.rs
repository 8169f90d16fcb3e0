use clap::Parser;

use crate::types::{OutputFormat, ReportOptions, SortKey};

/// Runs PIT one test class at a time and summarizes the mutation coverage
/// between each class and its own test class.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Consider classes in the provided package only
    #[arg(short = 'p', long, value_name = "PACKAGE")]
    pub package: Option<String>,

    /// Do not run PIT but report based on the current PIT reports
    #[arg(short = 'r', long)]
    pub report_only: bool,

    /// Do not output classes without full mutation coverage
    #[arg(short = 's', long, visible_short_alias = 'v')]
    pub survivors_only: bool,

    /// Sort classes according to sorting key.
    /// Replaces config [report].sort if provided (default: s).
    #[arg(short = 't', long = "sort", value_enum, value_name = "KEY")]
    pub sort: Option<SortKey>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// All relative paths will be interpreted relative to this directory.
    /// PIT will be run in this directory.
    #[arg(long)]
    pub cwd: Option<String>,

    /// Command that runs PIT; the test class name is appended for scoped runs.
    /// Replaces config [pitest].cmd if provided.
    #[arg(long = "pitest.cmd")]
    pub pitest_cmd: Option<String>,

    /// Directory PIT writes its reports to.
    /// Replaces config [pitest].reports_dir if provided.
    #[arg(long = "reports-dir")]
    pub reports_dir: Option<String>,

    /// Logging level (overrides config). One of: trace, debug, info, warn, error
    #[arg(long = "log.level")]
    pub log_level: Option<String>,

    /// Logging color control: "on" to force colors, "off" to disable; omit for auto
    #[arg(long = "log.color")]
    pub log_color: Option<String>,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Args {
    /// Report options, falling back to `default_sort` when `--sort` is absent
    pub fn report_options(&self, default_sort: SortKey) -> ReportOptions {
        ReportOptions {
            package_filter: self.package.clone(),
            report_only: self.report_only,
            survivors_only: self.survivors_only,
            sort_key: self.sort.unwrap_or(default_sort),
            format: self.format,
        }
    }
}
