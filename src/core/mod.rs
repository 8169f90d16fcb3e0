pub mod cli;
pub mod cmds;
pub mod extractor;
pub mod ignore;
pub mod locator;
pub mod logging;
pub mod main_shared;
pub mod runner;
pub mod scraper;
pub mod summary;
pub mod types;
