use log::info;

use crate::types::config::{CONFIG_FILENAME, Config};
use crate::types::{AppResult, OutputFormat};

pub fn execute_print_config(cfg: &Config, format: OutputFormat) -> AppResult<()> {
    let effective = cfg.to_effective();

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&effective)?);
        return Ok(());
    }

    let log = effective.log();
    let pitest = effective.pitest();
    let source = effective.source();

    info!("Effective Configuration ({CONFIG_FILENAME}):");
    info!("");
    info!("Log:");
    info!("  level: {}", log.level());
    match log.color() {
        Some(true) => info!("  color: on"),
        Some(false) => info!("  color: off"),
        None => info!("  color: auto"),
    }

    info!("");
    info!("Pitest:");
    info!("  cmd: {}", pitest.cmd());
    match pitest.reports_dir() {
        Some(dir) => info!("  reports_dir: {dir}"),
        None => info!("  reports_dir: (derived from project directory)"),
    }

    info!("");
    info!("Source:");
    info!("  root: {}", source.root());
    info!("  extension: {}", source.extension());
    info!("  test_suffix: {}", source.test_suffix());
    info!("  equivalence_marker: {}", source.equivalence_marker());
    info!("  ignore_file: {}", source.ignore_file());

    info!("");
    info!("Report:");
    info!("  sort: {}", effective.report().sort());

    Ok(())
}
