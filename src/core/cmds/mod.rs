pub mod config;
pub mod report;

pub use config::execute_print_config;
pub use report::execute_report;
