pub mod core;

// Re-export key items for easy importing in this crate
pub use core::types;

// Re-export key items for easy importing in other crates
pub use core::cmds::report::{NO_CLASSES, build_summary, render_json, render_table};
pub use core::extractor::ReportSettings;
pub use core::main_shared::run_main;
pub use core::runner::{MutationRunner, PitestRunner, RunScope};
pub use core::scraper::{CoverageScraper, PitHtmlScraper};
pub use core::summary::Summary;
