pub mod config;
mod coverage;
mod error;
mod options;

pub use coverage::*;
pub use error::*;
pub use options::*;
