use std::str::FromStr;
use std::sync::Mutex;

use console::style;
use indicatif::ProgressBar;
use log::{Level, LevelFilter};
use once_cell::sync::Lazy;

use crate::types::config::{colors_enabled, config};

// Bar currently drawn on stderr; log lines are written while it is suspended
static ACTIVE_PROGRESS: Lazy<Mutex<Option<ProgressBar>>> = Lazy::new(|| Mutex::new(None));

/// Install the global logger using the resolved `[log]` configuration.
///
/// Info records are printed bare since they carry the report itself; every other
/// level gets a level tag so diagnostics stand out from the table.
pub fn init_logging() {
    let level = LevelFilter::from_str(config().log().level()).unwrap_or(LevelFilter::Info);
    console::set_colors_enabled(colors_enabled());

    let result = fern::Dispatch::new()
        .format(|out, message, record| match record.level() {
            Level::Info => out.finish(format_args!("{message}")),
            Level::Warn => out.finish(format_args!("{} {message}", style("WARNING:").yellow())),
            Level::Error => out.finish(format_args!("{} {message}", style("ERROR:").red())),
            other => out.finish(format_args!(
                "{} {message}",
                style(format!("[{other}]")).dim()
            )),
        })
        .level(level)
        // Subprocess plumbing from dependencies is never interesting here
        .level_for("tokio", LevelFilter::Warn)
        .chain(fern::Output::call(|record| {
            write_line(&record.args().to_string())
        }))
        .apply();

    if let Err(e) = result {
        eprintln!("Logger already initialized: {e}");
    }
}

/// Keeps log output clear of `bar` until the guard is dropped
pub fn attach_progress(bar: &ProgressBar) -> ProgressGuard {
    if let Ok(mut slot) = ACTIVE_PROGRESS.lock() {
        *slot = Some(bar.clone());
    }
    ProgressGuard
}

pub struct ProgressGuard;

impl Drop for ProgressGuard {
    fn drop(&mut self) {
        if let Ok(mut slot) = ACTIVE_PROGRESS.lock() {
            *slot = None;
        }
    }
}

fn active_progress() -> Option<ProgressBar> {
    ACTIVE_PROGRESS.lock().ok().and_then(|slot| slot.clone())
}

fn write_line(line: &str) {
    match active_progress() {
        Some(bar) => bar.suspend(|| println!("{line}")),
        None => println!("{line}"),
    }
}
